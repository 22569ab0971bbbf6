//! `\color`, `\textcolor`, `\colorbox` and `\fcolorbox`.
//!
//! Colors are given by name or, after an optional model in brackets, as
//! `rgb` (three fractions), `RGB` (three bytes), `HTML` (six hex digits)
//! or `gray` (one fraction). Values that do not fit their model are
//! errors.

use alloc::sync::Arc;
use core::mem;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::mathml_tree::{MathNode, MathNodeType};
use crate::parser::Parser;
use crate::parser::parse_util::internal_math;
use crate::stack::{StackItem, StyleItem};
use crate::types::{Package, ParseError, ParseErrorKind};

fn hex(value: f64) -> String {
    format!("{:02X}", value.round().clamp(0.0, 255.0) as u8)
}

fn is_decimal(value: &str) -> bool {
    let (int, frac) = value.split_once('.').unwrap_or((value, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    digits(int) && digits(frac) && !(int.is_empty() && frac.is_empty())
}

/// A numeric color model: `count` values, each read by `integer` or
/// decimal syntax and bounded by `max`.
struct Model {
    name: &'static str,
    count: usize,
    integer: bool,
    max: f64,
}

const RGB: Model = Model {
    name: "rgb",
    count: 3,
    integer: false,
    max: 1.0,
};

const RGB_BYTES: Model = Model {
    name: "RGB",
    count: 3,
    integer: true,
    max: 255.0,
};

const GRAY: Model = Model {
    name: "gray",
    count: 1,
    integer: false,
    max: 1.0,
};

impl Model {
    fn component(&self, part: &str) -> Result<f64, ParseError> {
        let part = part.trim();
        let valid = if self.integer {
            !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
        } else {
            is_decimal(part)
        };
        let value = part.parse::<f64>().ok().filter(|_| valid).ok_or_else(|| {
            let value = part.to_owned();
            if self.integer {
                ParseErrorKind::InvalidNumber { value }
            } else {
                ParseErrorKind::InvalidDecimalNumber { value }
            }
        })?;
        if value > self.max {
            return Err(ParseErrorKind::ModelArg2 {
                model: self.name.to_owned(),
                min: "0".to_owned(),
                max: self.max.to_string(),
            }
            .into());
        }
        Ok(value * 255.0 / self.max)
    }

    fn color(&self, def: &str) -> Result<String, ParseError> {
        let parts: Vec<&str> = def.split(',').collect();
        if parts.len() != self.count {
            return Err(ParseErrorKind::ModelArg1 {
                model: self.name.to_owned(),
                count: self.count.to_string(),
            }
            .into());
        }
        let mut color = "#".to_owned();
        for part in parts {
            color.push_str(&hex(self.component(part)?));
        }
        if self.count == 1 {
            let level = color[1..].to_owned();
            color.push_str(&level);
            color.push_str(&level);
        }
        Ok(color)
    }
}

/// The MathML color for `def` in `model`. Without a model `def` is a
/// color name and is used as written.
pub fn get_color(model: &str, def: &str) -> Result<String, ParseError> {
    let def = def.trim();
    match model.trim() {
        "" => Ok(def.to_owned()),
        "rgb" => RGB.color(def),
        "RGB" => RGB_BYTES.color(def),
        "gray" => GRAY.color(def),
        "HTML" => {
            if def.len() == 6 && def.bytes().all(|b| b.is_ascii_hexdigit()) {
                Ok(format!("#{def}"))
            } else {
                Err(ParseErrorKind::InvalidHTMLColor {
                    value: def.to_owned(),
                }
                .into())
            }
        }
        other => Err(ParseErrorKind::InvalidModel {
            model: other.to_owned(),
        }
        .into()),
    }
}

fn read_color(parser: &mut Parser<'_, '_>) -> Result<String, ParseError> {
    let model = parser.get_brackets()?.unwrap_or_default();
    let def = parser.get_argument()?;
    get_color(&model, &def)
}

fn color(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let color = read_color(parser)?;
    if let Some(env) = parser.stack.env_mut() {
        env.color = Some(color.clone());
    }
    parser.push(StackItem::Style(StyleItem {
        nodes: Vec::new(),
        attributes: vec![("mathcolor".to_owned(), color)],
    }))
}

fn text_color(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let color = read_color(parser)?;
    let old = parser
        .stack
        .env_mut()
        .and_then(|env| mem::replace(&mut env.color, Some(color.clone())));
    let body = parser.parse_arg();
    if let Some(env) = parser.stack.env_mut() {
        env.color = old;
    }
    let node = MathNode::container(MathNodeType::Mstyle, vec![body?]).with_attr("mathcolor", color);
    parser.push_node(node)
}

fn color_box(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let frame = if name == r"\fcolorbox" {
        Some(read_color(parser)?)
    } else {
        None
    };
    let background = read_color(parser)?;
    let text = parser.get_argument()?;
    let nodes = internal_math(parser, &text, None, None)?;
    let mut node = MathNode::container(MathNodeType::Mpadded, nodes)
        .with_attr("mathbackground", background)
        .with_attr("width", "+6pt")
        .with_attr("height", "+3pt")
        .with_attr("depth", "+3pt")
        .with_attr("lspace", "3pt");
    if let Some(frame) = frame {
        node.set_attribute("style", format!("border: .5px solid {frame}"));
    }
    parser.push_node(node)
}

/// Register the color commands.
pub fn define_color(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["color"],
        handler: Arc::new(color),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["textcolor"],
        handler: Arc::new(text_color),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["colorbox", "fcolorbox"],
        handler: Arc::new(color_box),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_models() {
        assert_eq!(get_color("", "red").unwrap(), "red");
        assert_eq!(get_color("rgb", "1, 0, 0.5").unwrap(), "#FF0080");
        assert_eq!(get_color("rgb", ".5,0,1.").unwrap(), "#8000FF");
        assert_eq!(get_color("RGB", "0,128,255").unwrap(), "#0080FF");
        assert_eq!(get_color("gray", "0").unwrap(), "#000000");
        assert_eq!(get_color("HTML", "00ff00").unwrap(), "#00ff00");
    }

    #[test]
    fn test_wrong_component_count() {
        let err = get_color("rgb", "1,0").unwrap_err();
        assert_eq!(err.id(), "ModelArg1");
        assert_eq!(
            err.message(),
            "Color values for the rgb model require 3 numbers"
        );
        assert_eq!(get_color("gray", "0,0").unwrap_err().id(), "ModelArg1");
    }

    #[test]
    fn test_component_out_of_range() {
        let err = get_color("rgb", "2,0,0").unwrap_err();
        assert_eq!(err.id(), "ModelArg2");
        assert_eq!(
            err.message(),
            "Color values for the rgb model must be between 0 and 1"
        );
        assert_eq!(get_color("RGB", "0,0,256").unwrap_err().id(), "ModelArg2");
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(get_color("rgb", "1,-0.5,0").unwrap_err().id(), "InvalidDecimalNumber");
        assert_eq!(get_color("rgb", "1,.,0").unwrap_err().id(), "InvalidDecimalNumber");
        assert_eq!(get_color("RGB", "1.5,0,0").unwrap_err().id(), "InvalidNumber");
        assert_eq!(get_color("HTML", "GG0000").unwrap_err().id(), "InvalidHTMLColor");
    }

    #[test]
    fn test_unknown_model() {
        let err = get_color("cmyk", "0,0,0,1").unwrap_err();
        assert_eq!(err.id(), "InvalidModel");
        assert_eq!(err.message(), "Undefined color model 'cmyk'");
    }
}
