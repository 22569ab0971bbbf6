use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::mathml_tree::{MathNode, MathNodeType, TexClass};
use crate::parser::Parser;
use crate::stack::{DotsItem, ItemFactory, ItemKind, StackItem};
use crate::types::{Package, ParseError};

fn dots_mo(text: &str) -> MathNode {
    MathNode::token(MathNodeType::Mo, text)
        .with_attr("stretchy", "false")
        .with_class(TexClass::Inner)
}

fn not(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    parser.push(ItemFactory::create(ItemKind::Not))
}

fn dots(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    parser.push(StackItem::Dots(DotsItem {
        ldots: Some(dots_mo("\u{2026}")),
        cdots: Some(dots_mo("\u{22ef}")),
    }))
}

const fn relax(_parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    Ok(())
}

/// Register `\not`, `\dots` and `\relax`.
pub fn define_chars(ctx: &mut TexContext) {
    // \not negates the next relation
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["not"],
        handler: Arc::new(not),
    });

    // \dots picks its height from what follows
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["dots"],
        handler: Arc::new(dots),
    });

    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["relax"],
        handler: Arc::new(relax),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dots_are_inner() {
        let mo = dots_mo("\u{2026}");
        assert_eq!(mo.properties.tex_class, Some(TexClass::Inner));
        assert_eq!(mo.attribute("stretchy"), Some("false"));
    }
}
