//! Square roots and roots with a degree.
//!
//! The degree is parsed on its own with `in_root` set, which is what
//! allows `\leftroot` and `\uproot` inside it. Those two record an offset
//! in the degree parser's globals; a degree with offsets is wrapped in an
//! `mpadded` that moves it. The degree always sits in an `mstyle` one
//! script level down.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::mathml_tree::{MathNode, MathNodeType};
use crate::parser::Parser;
use crate::stack::Env;
use crate::types::{Package, ParseError, ParseErrorKind};
use crate::units::make_em;

/// `mroot` of `base` with degree `index`.
fn make_root(parser: &mut Parser<'_, '_>, base: MathNode, index: &str) -> Result<MathNode, ParseError> {
    let env = Env {
        in_root: true,
        ..parser.stack.env().clone()
    };
    let (mut degree, global) = parser.sub_parse_with_globals(index, env)?;
    if global.left_root.is_some() || global.up_root.is_some() {
        degree = MathNode::container(MathNodeType::Mpadded, vec![degree]);
        if let Some(left) = global.left_root {
            degree.set_attribute("width", left);
        }
        if let Some(up) = global.up_root {
            degree.set_attribute("voffset", up.clone());
            degree.set_attribute("height", up);
        }
    }
    let degree = MathNode::container(MathNodeType::Mstyle, vec![degree]).with_attr("scriptlevel", "+1");
    Ok(MathNode::container(MathNodeType::Mroot, vec![base, degree]))
}

fn sqrt(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let index = parser.get_brackets()?;
    let mut arg = parser.get_argument()?;
    if arg == r"\frac" {
        let num = parser.get_argument()?;
        let den = parser.get_argument()?;
        arg = format!(r"\frac{{{num}}}{{{den}}}");
    }
    let body = parser.sub_parse(&arg)?;
    let node = match index {
        Some(index) => make_root(parser, body, &index)?,
        None => MathNode::container(MathNodeType::Msqrt, vec![body]),
    };
    parser.push_node(node)
}

/// `\root n \of x`
fn root(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let index = parser.get_up_to(r"\of")?;
    let body = parser.parse_arg()?;
    let node = make_root(parser, body, &index)?;
    parser.push_node(node)
}

/// Offset of `\leftroot{n}` and `\uproot{n}`: `n`/15 em, signed.
fn root_offset(text: &str, name: &str) -> Result<String, ParseError> {
    let n: i32 = text.trim().parse().map_err(|_| ParseErrorKind::IntegerArg {
        name: name.to_owned(),
    })?;
    let em = make_em(f64::from(n) / 15.0);
    Ok(if em.starts_with('-') { em } else { format!("+{em}") })
}

fn move_root(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    if !parser.stack.env().in_root {
        return Err(ParseErrorKind::MisplacedMoveRoot {
            name: name.to_owned(),
        }
        .into());
    }
    let left = name == r"\leftroot";
    let set = if left {
        parser.stack.global.left_root.is_some()
    } else {
        parser.stack.global.up_root.is_some()
    };
    if set {
        return Err(ParseErrorKind::MultipleMoveRoot {
            name: name.to_owned(),
        }
        .into());
    }
    let offset = root_offset(&parser.get_argument()?, name)?;
    if left {
        parser.stack.global.left_root = Some(offset);
    } else {
        parser.stack.global.up_root = Some(offset);
    }
    Ok(())
}

/// Register the root commands.
pub fn define_sqrt(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["sqrt"],
        handler: Arc::new(sqrt),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["root"],
        handler: Arc::new(root),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["leftroot", "uproot"],
        handler: Arc::new(move_root),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_offset() {
        assert_eq!(root_offset("3", r"\uproot").unwrap(), "+0.2em");
        assert_eq!(root_offset(" -3 ", r"\leftroot").unwrap(), "-0.2em");
        assert_eq!(root_offset("x", r"\uproot").unwrap_err().id(), "IntegerArg");
    }
}
