//! Fractions and binomials.
//!
//! `\frac`, `\genfrac` and `\cfrac` read their parts as arguments. The
//! infix forms (`\over`, `\atop`, `\choose`, ...) push an `over` frame
//! that takes everything before it in the group as the numerator and
//! everything after it as the denominator.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::{CommandHandler, FunctionDefSpec};
use crate::mathml_tree::{MathNode, MathNodeType};
use crate::parser::Parser;
use crate::parser::parse_util::{fixed_fence, is_display, trim_spaces};
use crate::stack::{OverItem, StackItem};
use crate::types::{Package, ParseError, ParseErrorKind};

fn frac(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let num = parser.parse_arg()?;
    let den = parser.parse_arg()?;
    parser.push_node(MathNode::container(MathNodeType::Mfrac, vec![num, den]))
}

/// Infix fractions. Without fixed delimiters the `withdelims` forms read
/// theirs from the source.
#[derive(Debug, Clone, Copy, Default)]
struct Over {
    open: Option<&'static str>,
    close: Option<&'static str>,
}

impl CommandHandler for Over {
    fn apply(&self, parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
        let mut item = OverItem {
            name: parser.current_cs.clone(),
            display: is_display(parser.stack.env()),
            ..OverItem::default()
        };
        let fixed = self.open.is_some() || self.close.is_some();
        if fixed {
            item.open = self.open.map(str::to_owned);
            item.close = self.close.map(str::to_owned);
        } else if name.ends_with("withdelims") {
            item.open = Some(parser.get_delimiter(false)?);
            item.close = Some(parser.get_delimiter(false)?);
        }
        if name.starts_with(r"\above") {
            item.thickness = Some(parser.get_dimen()?);
        } else if name.starts_with(r"\atop") || fixed {
            item.thickness = Some("0".to_owned());
        }
        parser.push(StackItem::Over(item))
    }
}

/// `\genfrac` with some of its parameters fixed.
#[derive(Debug, Clone, Copy, Default)]
struct Genfrac {
    left: Option<&'static str>,
    right: Option<&'static str>,
    thickness: Option<&'static str>,
    style: Option<&'static str>,
}

/// Wrap `node` in the style given by a `\genfrac` style digit.
fn genfrac_style(node: MathNode, style: &str, name: &str) -> Result<MathNode, ParseError> {
    let level = match style {
        "0" => None,
        "1" => Some(0),
        "2" => Some(1),
        "3" => Some(2),
        _ => {
            return Err(ParseErrorKind::BadMathStyleFor {
                name: name.to_owned(),
            }
            .into());
        }
    };
    let node = MathNode::container(MathNodeType::Mstyle, vec![node]);
    Ok(match level {
        None => node.with_attr("displaystyle", "true").with_attr("scriptlevel", "0"),
        Some(level) => node
            .with_attr("displaystyle", "false")
            .with_attr("scriptlevel", level.to_string()),
    })
}

impl CommandHandler for Genfrac {
    fn apply(&self, parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
        let left = match self.left {
            Some(left) => left.to_owned(),
            None => parser.get_delimiter(true)?,
        };
        let right = match self.right {
            Some(right) => right.to_owned(),
            None => parser.get_delimiter(true)?,
        };
        let thickness = match self.thickness {
            Some(thickness) => thickness.to_owned(),
            None => parser.get_argument()?,
        };
        let style = match self.style {
            Some(style) => style.to_owned(),
            None => trim_spaces(&parser.get_argument()?),
        };
        let num = parser.parse_arg()?;
        let den = parser.parse_arg()?;
        let mut node = MathNode::container(MathNodeType::Mfrac, vec![num, den]);
        if !thickness.trim().is_empty() {
            node.set_attribute("linethickness", thickness.trim());
        }
        if !left.is_empty() || !right.is_empty() {
            let display = self.style.map_or_else(|| is_display(parser.stack.env()), |style| style == "0");
            node = fixed_fence(&left, node, &right, display);
        }
        if !style.is_empty() {
            node = genfrac_style(node, &style, name)?;
        }
        parser.push_node(node)
    }
}

fn cfrac(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let align = trim_spaces(&parser.get_brackets()?.unwrap_or_default());
    let num = parser.get_argument()?;
    let den = parser.get_argument()?;
    let align = match align.as_str() {
        "" => None,
        "l" => Some("left"),
        "r" => Some("right"),
        _ => {
            return Err(ParseErrorKind::IllegalAlign {
                name: name.to_owned(),
            }
            .into());
        }
    };
    let num = parser.sub_parse(&format!(r"\strut\textstyle{{{num}}}"))?;
    let den = parser.sub_parse(&format!(r"\strut\textstyle{{{den}}}"))?;
    let mut node = MathNode::container(MathNodeType::Mfrac, vec![num, den]);
    if let Some(align) = align {
        node.set_attribute("numalign", align);
    }
    parser.push_node(node)
}

/// Register the fraction commands.
pub fn define_genfrac(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["frac"],
        handler: Arc::new(frac),
    });
    let infix = [
        ("over", Over::default()),
        ("atop", Over::default()),
        ("above", Over::default()),
        ("overwithdelims", Over::default()),
        ("atopwithdelims", Over::default()),
        ("abovewithdelims", Over::default()),
        ("choose", Over { open: Some("("), close: Some(")") }),
        ("brace", Over { open: Some("{"), close: Some("}") }),
        ("brack", Over { open: Some("["), close: Some("]") }),
    ];
    for (name, over) in infix {
        ctx.define_command(Package::Base, name, over);
    }

    let binom = Genfrac {
        left: Some("("),
        right: Some(")"),
        thickness: Some("0"),
        style: None,
    };
    let ams = [
        ("genfrac", Genfrac::default()),
        ("binom", Genfrac { style: Some(""), ..binom }),
        ("dbinom", Genfrac { style: Some("0"), ..binom }),
        ("tbinom", Genfrac { style: Some("1"), ..binom }),
    ];
    for (name, genfrac) in ams {
        ctx.define_command(Package::Ams, name, genfrac);
    }
    ctx.define_function(FunctionDefSpec {
        package: Package::Ams,
        names: &["cfrac"],
        handler: Arc::new(cfrac),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genfrac_style_levels() {
        let x = MathNode::token(MathNodeType::Mi, "x");
        let display = genfrac_style(x.clone(), "0", r"\genfrac").unwrap();
        assert_eq!(display.attribute("displaystyle"), Some("true"));
        let script = genfrac_style(x.clone(), "2", r"\genfrac").unwrap();
        assert_eq!(script.attribute("scriptlevel"), Some("1"));
        let err = genfrac_style(x, "4", r"\genfrac").unwrap_err();
        assert_eq!(err.id(), "BadMathStyleFor");
    }
}
