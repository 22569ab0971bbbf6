//! Stretchy fences and fixed-size delimiters.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::{CommandHandler, FunctionDefSpec};
use crate::mathml_tree::TexClass;
use crate::parser::Parser;
use crate::parser::parse_util::sized_delimiter;
use crate::stack::{FenceItem, LeftItem, StackItem};
use crate::types::{Package, ParseError};

fn left_right(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let delim = parser.get_delimiter(false)?;
    let color = parser.stack.env().color.clone();
    let item = match name {
        r"\left" => StackItem::Left(LeftItem {
            delim,
            color,
            ..LeftItem::default()
        }),
        r"\middle" => StackItem::Middle(FenceItem { delim, color }),
        _ => StackItem::Right(FenceItem { delim, color }),
    };
    parser.push(item)
}

/// `\big` and its relatives.
#[derive(Debug, Clone, Copy)]
struct BigDelimiter {
    class: TexClass,
    size: &'static str,
}

impl CommandHandler for BigDelimiter {
    fn apply(&self, parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
        let delim = parser.get_delimiter(false)?;
        parser.push_node(sized_delimiter(&delim, self.class, self.size))
    }
}

/// Register `\left`, `\middle`, `\right` and the `\big` family.
pub fn define_delimsizing(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["left", "middle", "right"],
        handler: Arc::new(left_right),
    });
    let sizes = [
        ("big", "1.2em"),
        ("Big", "1.623em"),
        ("bigg", "2.047em"),
        ("Bigg", "2.470em"),
    ];
    let suffixes = [
        ("", TexClass::Ord),
        ("l", TexClass::Open),
        ("r", TexClass::Close),
        ("m", TexClass::Rel),
    ];
    for (base, size) in sizes {
        for (suffix, class) in suffixes {
            ctx.define_command(
                Package::Base,
                &format!("{base}{suffix}"),
                BigDelimiter { class, size },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Settings;

    #[test]
    fn test_every_size_is_registered() {
        let ctx = TexContext::default();
        let settings = Settings::default();
        for name in ["big", "Bigl", "biggr", "Biggm", "left", "middle"] {
            assert!(ctx.function(name, &settings).is_some(), "{name}");
        }
    }
}
