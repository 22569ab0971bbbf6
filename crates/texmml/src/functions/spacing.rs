//! Explicit spaces.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::{CommandHandler, FunctionDefSpec};
use crate::mathml_tree::{MathNode, MathNodeType};
use crate::parser::Parser;
use crate::types::{Package, ParseError};
use crate::units::make_em;

/// A fixed space in ems, kept at script level 0 so it does not shrink.
#[derive(Debug, Clone, Copy)]
struct Spacer {
    width: f64,
}

impl CommandHandler for Spacer {
    fn apply(&self, parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
        let space = MathNode::token(MathNodeType::Mspace, "").with_attr("width", make_em(self.width));
        let node = MathNode::container(MathNodeType::Mstyle, vec![space]).with_attr("scriptlevel", "0");
        parser.push_node(node)
    }
}

/// `\hskip`, `\kern`, `\hspace` and the other skips read their width.
fn skip(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    if name == r"\hspace" {
        parser.get_star();
    }
    let width = parser.get_dimen()?;
    parser.push_node(MathNode::token(MathNodeType::Mspace, "").with_attr("width", width))
}

fn control_space(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    parser.push_node(MathNode::text("\u{a0}"))
}

const SPACERS: [(&str, f64); 7] = [
    (",", 3.0 / 18.0),
    (":", 4.0 / 18.0),
    (">", 4.0 / 18.0),
    (";", 5.0 / 18.0),
    ("!", -3.0 / 18.0),
    ("quad", 1.0),
    ("qquad", 2.0),
];

/// Register the spacing commands.
pub fn define_spacing(ctx: &mut TexContext) {
    for (name, width) in SPACERS {
        ctx.define_command(Package::Base, name, Spacer { width });
    }
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["hskip", "hspace", "kern", "mskip", "mkern", "mspace"],
        handler: Arc::new(skip),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &[" "],
        handler: Arc::new(control_space),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacer_widths() {
        let widths: Vec<String> = SPACERS.iter().map(|(_, w)| make_em(*w)).collect();
        assert_eq!(widths[0], "0.167em");
        assert_eq!(widths[3], "0.278em");
        assert_eq!(widths[4], "-0.167em");
        assert_eq!(widths[6], "2em");
    }
}
