//! Font commands.
//!
//! `\mathrm{..}` and friends parse their argument with the font set and
//! letter runs read as single identifiers. The old-style switches `\rm`,
//! `\bf`, ... change the font of the rest of the group.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::{CommandHandler, FunctionDefSpec};
use crate::mathml_tree::{MathNode, MathNodeType};
use crate::parser::Parser;
use crate::stack::Env;
use crate::types::{MathVariant, Package, ParseError};

/// `\mathrm` and friends.
#[derive(Debug, Clone, Copy)]
struct MathFont {
    variant: Option<MathVariant>,
}

impl CommandHandler for MathFont {
    fn apply(&self, parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
        let text = parser.get_argument()?;
        let env = Env {
            font: self.variant,
            multi_letter: true,
            ..parser.stack.env().clone()
        };
        let (node, _) = parser.sub_parse_with_globals(&text, env)?;
        parser.push_node(MathNode::container(MathNodeType::TeXAtom, vec![node]))
    }
}

/// `\rm` and friends.
#[derive(Debug, Clone, Copy)]
struct SetFont {
    variant: MathVariant,
}

impl CommandHandler for SetFont {
    fn apply(&self, parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
        if let Some(env) = parser.stack.env_mut() {
            env.font = Some(self.variant);
        }
        Ok(())
    }
}

fn boldsymbol(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let text = parser.get_argument()?;
    let env = Env {
        font: Some(MathVariant::BoldItalic),
        ..parser.stack.env().clone()
    };
    let (node, _) = parser.sub_parse_with_globals(&text, env)?;
    parser.push_node(MathNode::container(MathNodeType::TeXAtom, vec![node]))
}

const MATH_FONTS: [(&str, Option<MathVariant>); 20] = [
    ("mathrm", Some(MathVariant::Normal)),
    ("mathup", Some(MathVariant::Normal)),
    ("mathnormal", None),
    ("mathbf", Some(MathVariant::Bold)),
    ("mathbfup", Some(MathVariant::Bold)),
    ("mathit", Some(MathVariant::Italic)),
    ("mathbfit", Some(MathVariant::BoldItalic)),
    ("mathbb", Some(MathVariant::DoubleStruck)),
    ("Bbb", Some(MathVariant::DoubleStruck)),
    ("mathfrak", Some(MathVariant::Fraktur)),
    ("mathbffrak", Some(MathVariant::BoldFraktur)),
    ("mathscr", Some(MathVariant::Script)),
    ("mathbfscr", Some(MathVariant::BoldScript)),
    ("mathsf", Some(MathVariant::SansSerif)),
    ("mathsfup", Some(MathVariant::SansSerif)),
    ("mathbfsf", Some(MathVariant::BoldSansSerif)),
    ("mathsfit", Some(MathVariant::SansSerifItalic)),
    ("mathtt", Some(MathVariant::Monospace)),
    ("mathcal", Some(MathVariant::TexCalligraphic)),
    ("mathbfcal", Some(MathVariant::TexBoldCalligraphic)),
];

const SET_FONTS: [(&str, MathVariant); 11] = [
    ("rm", MathVariant::Normal),
    ("mit", MathVariant::Italic),
    ("oldstyle", MathVariant::Normal),
    ("cal", MathVariant::TexCalligraphic),
    ("it", MathVariant::Italic),
    ("bf", MathVariant::Bold),
    ("bbFont", MathVariant::DoubleStruck),
    ("scr", MathVariant::Script),
    ("frak", MathVariant::Fraktur),
    ("sf", MathVariant::SansSerif),
    ("tt", MathVariant::Monospace),
];

/// Register the font commands.
pub fn define_font(ctx: &mut TexContext) {
    for (name, variant) in MATH_FONTS {
        ctx.define_command(Package::Base, name, MathFont { variant });
    }
    for (name, variant) in SET_FONTS {
        ctx.define_command(Package::Base, name, SetFont { variant });
    }
    ctx.define_function(FunctionDefSpec {
        package: Package::Ams,
        names: &["boldsymbol"],
        handler: Arc::new(boldsymbol),
    });
}
