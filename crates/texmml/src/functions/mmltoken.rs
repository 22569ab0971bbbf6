//! `\mmlToken{kind}[attributes]{text}`: a token element built by hand.
//!
//! Attributes are a comma- or space-separated list of `name=value`, the
//! value optionally quoted. Each is checked with
//! [`attributes::validate`].

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::mathml_tree::{MathNode, MathNodeType, attributes};
use crate::parser::Parser;
use crate::types::{Package, ParseError, ParseErrorKind};

/// Split the next `name=value` off `list`, returning both and the rest.
fn next_attribute(list: &str) -> Option<(&str, &str, &str)> {
    let name_len = list.bytes().take_while(u8::is_ascii_alphabetic).count();
    if name_len == 0 {
        return None;
    }
    let (name, rest) = list.split_at(name_len);
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let (value, rest) = match rest.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let end = rest[1..].find(quote)? + 1;
            (&rest[1..end], &rest[end + 1..])
        }
        _ => {
            let end = rest.find([' ', ',']).unwrap_or(rest.len());
            rest.split_at(end)
        }
    };
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(',').unwrap_or(rest).trim_start();
    Some((name, value, rest))
}

/// Parse and check an attribute list for an element of kind `kind`.
fn parse_attributes(kind: MathNodeType, list: &str) -> Result<Vec<(String, String)>, ParseError> {
    let mut parsed = Vec::new();
    let mut list = list.trim_start();
    while !list.is_empty() {
        let Some((name, value, rest)) = next_attribute(list) else {
            return Err(ParseErrorKind::InvalidMathMLAttr {
                attr: list.to_owned(),
            }
            .into());
        };
        if attributes::attribute_type(kind, name).is_none() {
            return Err(ParseErrorKind::UnknownAttrForElement {
                attr: name.to_owned(),
                kind: kind.as_ref().to_owned(),
            }
            .into());
        }
        if !value.is_empty() {
            attributes::validate(kind, name, value)?;
            parsed.push((name.to_owned(), value.to_owned()));
        }
        list = rest;
    }
    Ok(parsed)
}

fn mml_token(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let kind_name = parser.get_argument()?;
    let list = parser.get_brackets()?.unwrap_or_default();
    let text = parser.get_argument()?;
    let kind = kind_name
        .trim()
        .parse::<MathNodeType>()
        .ok()
        .filter(|kind| kind.is_token())
        .ok_or_else(|| ParseErrorKind::NotMathMLToken {
            kind: kind_name.clone(),
        })?;
    let mut node = MathNode::token(kind, text);
    for (name, value) in parse_attributes(kind, &list)? {
        node.set_attribute(name, value);
    }
    parser.push_node(node)
}

/// Register `\mmlToken`.
pub fn define_mmltoken(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["mmlToken"],
        handler: Arc::new(mml_token),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_list() {
        let parsed =
            parse_attributes(MathNodeType::Mo, r#"stretchy="false", lspace=0pt rspace='1em'"#).unwrap();
        assert_eq!(
            parsed,
            [
                ("stretchy".to_owned(), "false".to_owned()),
                ("lspace".to_owned(), "0pt".to_owned()),
                ("rspace".to_owned(), "1em".to_owned()),
            ]
        );
    }

    #[test]
    fn test_attribute_errors() {
        let err = parse_attributes(MathNodeType::Mi, "=x").unwrap_err();
        assert_eq!(err.id(), "InvalidMathMLAttr");
        let err = parse_attributes(MathNodeType::Mi, "stretchy=true").unwrap_err();
        assert_eq!(err.id(), "UnknownAttrForElement");
        let err = parse_attributes(MathNodeType::Mo, "fence=maybe").unwrap_err();
        assert_eq!(err.id(), "InvalidAttrValue");
        assert!(parse_attributes(MathNodeType::Mi, "class=big").is_ok());
    }
}
