//! Accents and material stacked over or under a base.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::{CommandHandler, FunctionDefSpec};
use crate::mathml_tree::{MathNode, MathNodeType, OVER, TexClass, UNDER, embellished_core};
use crate::parser::Parser;
use crate::parser::parse_util::check_movable_limits;
use crate::types::{Package, ParseError};

/// `\hat` and friends.
#[derive(Debug, Clone, Copy)]
struct Accent {
    glyph: &'static str,
    stretchy: bool,
}

impl CommandHandler for Accent {
    fn apply(&self, parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
        let mut base = parser.parse_arg()?;
        let mut accent = MathNode::token(MathNodeType::Mo, self.glyph)
            .with_attr("accent", "true")
            .with_attr("stretchy", if self.stretchy { "true" } else { "false" });
        if let Some(font) = parser.stack.env().font {
            accent.set_attribute("mathvariant", font.as_ref());
        }
        check_movable_limits(&mut base);
        let mut node = MathNode::container(MathNodeType::Munderover, vec![base]);
        node.set_child(OVER, Some(accent));
        parser.push_node(MathNode::container(MathNodeType::TeXAtom, vec![node]))
    }
}

/// `\overline`, `\underbrace` and friends. Braces stack like a large
/// operator, so their scripts become limits.
#[derive(Debug, Clone, Copy)]
struct UnderOver {
    glyph: &'static str,
    stack: bool,
}

impl CommandHandler for UnderOver {
    fn apply(&self, parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
        let mut base = parser.parse_arg()?;
        check_movable_limits(&mut base);
        if base.is(MathNodeType::Munderover) && embellished_core(&base).is_some() {
            let spacer = MathNode::token(MathNodeType::Mo, "").with_attr("rspace", "0");
            base = MathNode::row(vec![spacer, base]);
        }
        let mark = MathNode::token(MathNodeType::Mo, self.glyph)
            .with_attr("stretchy", "true")
            .with_attr("accent", "true");
        let slot = if name.starts_with(r"\over") { OVER } else { UNDER };
        let mut node = MathNode::container(MathNodeType::Munderover, vec![base]);
        node.set_child(slot, Some(mark));
        if self.stack {
            node = MathNode::atom(TexClass::Op, vec![node]);
            node.properties.movesupsub = Some(true);
        }
        node.properties.subsup_ok = true;
        parser.push_node(node)
    }
}

/// `\overset{top}{base}` and `\underset{bottom}{base}`.
fn overset(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let mut script = parser.parse_arg()?;
    let mut base = parser.parse_arg()?;
    check_movable_limits(&mut base);
    let (kind, accent) = if name == r"\overset" {
        (MathNodeType::Mover, "accent")
    } else {
        (MathNodeType::Munder, "accentunder")
    };
    if script.is(MathNodeType::Mo) {
        script.set_attribute("accent", "false");
    }
    let node = MathNode::container(kind, vec![base, script]).with_attr(accent, "false");
    parser.push_node(node)
}

/// `\buildrel top \over base`: a relation with `top` over it.
fn buildrel(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let top = parser.parse_up_to(r"\over")?;
    let base = parser.parse_arg()?;
    let mut node = MathNode::container(MathNodeType::Munderover, vec![base]);
    node.set_child(OVER, Some(top));
    parser.push_node(MathNode::atom(TexClass::Rel, vec![node]))
}

const ACCENTS: [(&str, &str, bool); 15] = [
    ("acute", "\u{b4}", false),
    ("grave", "\u{60}", false),
    ("ddot", "\u{a8}", false),
    ("tilde", "\u{7e}", false),
    ("bar", "\u{af}", false),
    ("breve", "\u{2d8}", false),
    ("check", "\u{2c7}", false),
    ("hat", "\u{5e}", false),
    ("vec", "\u{2192}", false),
    ("dot", "\u{2d9}", false),
    ("mathring", "\u{2da}", false),
    ("widetilde", "\u{7e}", true),
    ("widehat", "\u{5e}", true),
    ("dddot", "\u{20db}", false),
    ("ddddot", "\u{20dc}", false),
];

const UNDER_OVER: [(&str, &str, bool); 12] = [
    ("overline", "\u{2015}", false),
    ("underline", "\u{2015}", false),
    ("overbrace", "\u{23de}", true),
    ("underbrace", "\u{23df}", true),
    ("overparen", "\u{23dc}", false),
    ("underparen", "\u{23dd}", false),
    ("overrightarrow", "\u{2192}", false),
    ("underrightarrow", "\u{2192}", false),
    ("overleftarrow", "\u{2190}", false),
    ("underleftarrow", "\u{2190}", false),
    ("overleftrightarrow", "\u{2194}", false),
    ("underleftrightarrow", "\u{2194}", false),
];

/// Register accents and the over/under constructions.
pub fn define_accent(ctx: &mut TexContext) {
    for (name, glyph, stretchy) in ACCENTS {
        ctx.define_command(Package::Base, name, Accent { glyph, stretchy });
    }
    for (name, glyph, stack) in UNDER_OVER {
        ctx.define_command(Package::Base, name, UnderOver { glyph, stack });
    }
    ctx.define_function(FunctionDefSpec {
        package: Package::Ams,
        names: &["overset", "underset"],
        handler: Arc::new(overset),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["buildrel"],
        handler: Arc::new(buildrel),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Settings;

    #[test]
    fn test_stacked_forms() {
        let stacked: Vec<&str> = UNDER_OVER
            .iter()
            .filter(|(_, _, stack)| *stack)
            .map(|(name, _, _)| *name)
            .collect();
        assert_eq!(stacked, ["overbrace", "underbrace"]);
    }

    #[test]
    fn test_overset_needs_ams() {
        let ctx = TexContext::default();
        let base = Settings::builder().packages(vec![Package::Base]).build();
        assert!(ctx.function("overset", &base).is_none());
        assert!(ctx.function("hat", &base).is_some());
    }
}
