//! Named functions, named operators, limits and class atoms.
//!
//! `\sin` and its relatives become an upright identifier in a `fn` frame,
//! which puts an invisible function application after the name when an
//! argument follows. `\lim`, `\max` and the other operators whose scripts
//! become limits in display style are pushed as operators directly.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::{CommandHandler, FunctionDefSpec};
use crate::mathml_tree::{
    BASE, MathNode, MathNodeType, TexClass, declared_class, embellished_core,
};
use crate::parser::Parser;
use crate::parser::parse_util::trim_spaces;
use crate::stack::{Env, FnItem, StackItem};
use crate::types::{MathVariant, Package, ParseError, ParseErrorKind};

/// Operator text for a named operator, `\liminf` -> `lim inf`.
fn op_text(name: &str) -> String {
    let name = name.trim_start_matches('\\');
    match name {
        "liminf" => "lim\u{2006}inf".to_owned(),
        "limsup" => "lim\u{2006}sup".to_owned(),
        "injlim" => "inj\u{2006}lim".to_owned(),
        "projlim" => "proj\u{2006}lim".to_owned(),
        _ => name.to_owned(),
    }
}

fn named_fn(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let mut node = MathNode::token(MathNodeType::Mi, op_text(name)).with_class(TexClass::Op);
    node.properties.fn_op = true;
    parser.push(StackItem::Fn(FnItem { nodes: vec![node] }))
}

fn named_op(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let mut node = MathNode::token(MathNodeType::Mo, op_text(name))
        .with_attr("movablelimits", "true")
        .with_attr("form", "prefix")
        .with_class(TexClass::Op);
    node.properties.movesupsub = Some(true);
    parser.push_node(node)
}

/// `\operatorname{name}`; the starred form takes limits.
fn operator_name(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let star = parser.get_star();
    let text = trim_spaces(&parser.get_argument()?);
    let env = Env {
        font: Some(MathVariant::Normal),
        multi_letter: true,
        ..parser.stack.env().clone()
    };
    let (node, _) = parser.sub_parse_with_globals(&text, env)?;
    let mut node = if node.is(MathNodeType::Mi) {
        node.with_class(TexClass::Op)
    } else {
        MathNode::atom(TexClass::Op, vec![node])
    };
    node.properties.fn_op = true;
    if star {
        node.properties.movesupsub = Some(true);
    } else {
        // a \limits right after the unstarred form is dropped
        let start = parser.scanner.position();
        if parser.get_next() == Some('\\') {
            parser.scanner.advance(1);
            if parser.get_cs() != "limits" {
                parser.scanner.set_position(start);
            }
        }
    }
    parser.push(StackItem::Fn(FnItem { nodes: vec![node] }))
}

/// The `mo` an operator node is built on.
fn core_mo_mut(node: &mut MathNode) -> Option<&mut MathNode> {
    match node.node_type {
        MathNodeType::Mo => Some(node),
        MathNodeType::Msubsup | MathNodeType::Munderover => {
            node.child_mut(BASE).and_then(core_mo_mut)
        }
        MathNodeType::TeXAtom | MathNodeType::Mrow if node.children.len() == 1 => {
            node.child_mut(0).and_then(core_mo_mut)
        }
        _ => None,
    }
}

fn limits(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let to_limits = name == r"\limits";
    let is_op = parser.stack.last().is_some_and(|op| {
        op.properties.movesupsub.is_some()
            || declared_class(op) == Some(TexClass::Op)
            || embellished_core(op).and_then(declared_class) == Some(TexClass::Op)
    });
    let Some(mut op) = parser.stack.prev().filter(|_| is_op) else {
        return Err(ParseErrorKind::MisplacedLimits {
            name: name.to_owned(),
        }
        .into());
    };
    if op.is(MathNodeType::Munderover) && !to_limits {
        op.node_type = MathNodeType::Msubsup;
    } else if op.is(MathNodeType::Msubsup) && to_limits {
        op.node_type = MathNodeType::Munderover;
    }
    op.properties.movesupsub = Some(to_limits);
    if let Some(mo) = core_mo_mut(&mut op) {
        mo.set_attribute("movablelimits", "false");
    }
    if op.attribute("movablelimits").is_some() {
        op.set_attribute("movablelimits", "false");
    }
    parser.push_node(op)
}

/// `\mathord` and the other explicit-class atoms.
#[derive(Debug, Clone, Copy)]
struct ClassAtom {
    class: TexClass,
}

impl CommandHandler for ClassAtom {
    fn apply(&self, parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
        if self.class != TexClass::Op {
            let body = parser.parse_arg()?;
            return parser.push_node(MathNode::atom(self.class, vec![body]));
        }
        let arg = parser.get_argument()?;
        let roman = arg
            .trim_start()
            .strip_prefix(r"\rm ")
            .filter(|rest| !rest.trim().is_empty())
            .filter(|rest| rest.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '));
        let mut node = match roman {
            Some(text) => MathNode::token(MathNodeType::Mi, text.trim())
                .with_attr("mathvariant", MathVariant::Normal.as_ref())
                .with_class(TexClass::Op),
            None => {
                let body = parser.sub_parse(&arg)?;
                MathNode::atom(TexClass::Op, vec![body])
            }
        };
        node.properties.movesupsub = Some(true);
        parser.push_node(node)
    }
}

const NAMED_FNS: [&str; 22] = [
    "arcsin", "arccos", "arctan", "arg", "cos", "cosh", "cot", "coth", "csc", "deg", "dim", "exp",
    "hom", "ker", "lg", "ln", "log", "sec", "sin", "sinh", "tan", "tanh",
];

const NAMED_OPS: [&str; 10] = [
    "det", "gcd", "inf", "lim", "liminf", "limsup", "max", "min", "Pr", "sup",
];

const CLASS_ATOMS: [(&str, TexClass); 8] = [
    ("mathord", TexClass::Ord),
    ("mathop", TexClass::Op),
    ("mathbin", TexClass::Bin),
    ("mathrel", TexClass::Rel),
    ("mathopen", TexClass::Open),
    ("mathclose", TexClass::Close),
    ("mathpunct", TexClass::Punct),
    ("mathinner", TexClass::Inner),
];

/// Register the operator commands.
pub fn define_op(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &NAMED_FNS,
        handler: Arc::new(named_fn),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &NAMED_OPS,
        handler: Arc::new(named_op),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Ams,
        names: &["injlim", "projlim"],
        handler: Arc::new(named_op),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Ams,
        names: &["operatorname"],
        handler: Arc::new(operator_name),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["limits", "nolimits"],
        handler: Arc::new(limits),
    });
    for (name, class) in CLASS_ATOMS {
        ctx.define_command(Package::Base, name, ClassAtom { class });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_text() {
        assert_eq!(op_text(r"\sin"), "sin");
        assert_eq!(op_text(r"\liminf"), "lim\u{2006}inf");
        assert_eq!(op_text("Pr"), "Pr");
    }

    #[test]
    fn test_core_mo_through_scripts() {
        let mo = MathNode::token(MathNodeType::Mo, "\u{2211}");
        let mut node = MathNode::container(MathNodeType::Munderover, vec![mo]);
        core_mo_mut(&mut node).unwrap().set_attribute("movablelimits", "false");
        assert_eq!(node.child(BASE).unwrap().attribute("movablelimits"), Some("false"));
        let mut mi = MathNode::token(MathNodeType::Mi, "x");
        assert!(core_mo_mut(&mut mi).is_none());
    }
}
