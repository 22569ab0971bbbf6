//! Boxes: phantoms, smashes, laps, rules and moved boxes.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::mathml_tree::{MathNode, MathNodeType};
use crate::parser::Parser;
use crate::parser::parse_util::{internal_math, trim_spaces};
use crate::stack::{PositionItem, Shift, StackItem};
use crate::types::{Package, ParseError};

fn atom(node: MathNode) -> MathNode {
    MathNode::container(MathNodeType::TeXAtom, vec![node])
}

fn phantom(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let mut node = MathNode::container(MathNodeType::Mphantom, vec![parser.parse_arg()?]);
    match name {
        r"\vphantom" => {
            node = MathNode::container(MathNodeType::Mpadded, vec![node]).with_attr("width", "0");
        }
        r"\hphantom" => {
            node = MathNode::container(MathNodeType::Mpadded, vec![node])
                .with_attr("height", "0")
                .with_attr("depth", "0");
        }
        _ => {}
    }
    parser.push_node(atom(node))
}

fn smash(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let which = trim_spaces(&parser.get_brackets()?.unwrap_or_default());
    let mut node = MathNode::container(MathNodeType::Mpadded, vec![parser.parse_arg()?]);
    match which.as_str() {
        "b" => node.set_attribute("depth", "0"),
        "t" => node.set_attribute("height", "0"),
        _ => {
            node.set_attribute("height", "0");
            node.set_attribute("depth", "0");
        }
    }
    parser.push_node(atom(node))
}

fn lap(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let mut node =
        MathNode::container(MathNodeType::Mpadded, vec![parser.parse_arg()?]).with_attr("width", "0");
    if name == r"\llap" {
        node.set_attribute("lspace", "-1width");
    }
    parser.push_node(atom(node))
}

fn strut(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let node = MathNode::container(MathNodeType::Mpadded, vec![MathNode::row(Vec::new())])
        .with_attr("height", "8.6pt")
        .with_attr("depth", "3pt")
        .with_attr("width", "0");
    parser.push_node(node)
}

fn rule_color(parser: &Parser<'_, '_>) -> String {
    parser
        .stack
        .env()
        .color
        .clone()
        .unwrap_or_else(|| "black".to_owned())
}

/// `\rule[raise]{width}{height}`
fn rule(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let raise = parser.get_brackets()?;
    let width = parser.get_dimen()?;
    let height = parser.get_dimen()?;
    let mut node = MathNode::token(MathNodeType::Mspace, "")
        .with_attr("width", width)
        .with_attr("height", height)
        .with_attr("mathbackground", rule_color(parser));
    if let Some(raise) = raise.filter(|raise| !raise.trim().is_empty()) {
        let raise = raise.trim().to_owned();
        node = MathNode::container(MathNodeType::Mpadded, vec![node]);
        match raise.strip_prefix('-') {
            Some(depth) => {
                node.set_attribute("height", raise.clone());
                node.set_attribute("depth", format!("+{depth}"));
            }
            None => node.set_attribute("height", format!("+{raise}")),
        }
        node.set_attribute("voffset", raise);
    }
    parser.push_node(node)
}

/// `\Rule{width}{height}{depth}` and its invisible form `\Space`.
fn sized_rule(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let width = parser.get_dimen()?;
    let height = parser.get_dimen()?;
    let depth = parser.get_dimen()?;
    let mut node = MathNode::token(MathNodeType::Mspace, "")
        .with_attr("width", width)
        .with_attr("height", height)
        .with_attr("depth", depth);
    if name != r"\Space" {
        node.set_attribute("mathbackground", rule_color(parser));
    }
    parser.push_node(node)
}

fn raise_lower(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let dimen = parser.get_dimen()?;
    let (lower, amount) = match dimen.strip_prefix('-') {
        Some(amount) => (name == r"\raise", amount.to_owned()),
        None => (name == r"\lower", dimen),
    };
    let (height, depth) = if lower {
        (format!("-{amount}"), format!("+{amount}"))
    } else {
        (format!("+{amount}"), format!("-{amount}"))
    };
    parser.push(StackItem::Position(PositionItem {
        name: parser.current_cs.clone(),
        shift: Shift::Vertical { height, depth },
    }))
}

fn move_left_right(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let dimen = parser.get_dimen()?;
    let negated = dimen
        .strip_prefix('-')
        .map_or_else(|| format!("-{dimen}"), str::to_owned);
    let (left, right) = if name == r"\moveleft" {
        (negated, dimen)
    } else {
        (dimen, negated)
    };
    parser.push(StackItem::Position(PositionItem {
        name: parser.current_cs.clone(),
        shift: Shift::Horizontal {
            left: MathNode::token(MathNodeType::Mspace, "").with_attr("width", left),
            right: MathNode::token(MathNodeType::Mspace, "").with_attr("width", right),
        },
    }))
}

fn fbox(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let text = parser.get_argument()?;
    let nodes = internal_math(parser, &text, None, None)?;
    let node = MathNode::container(MathNodeType::Menclose, nodes).with_attr("notation", "box");
    parser.push_node(node)
}

/// Register the box commands.
pub fn define_boxes(ctx: &mut TexContext) {
    let table: [(&[&str], fn(&mut Parser<'_, '_>, &str) -> Result<(), ParseError>); 9] = [
        (&["phantom", "vphantom", "hphantom"], phantom),
        (&["smash"], smash),
        (&["rlap", "llap"], lap),
        (&["strut"], strut),
        (&["rule"], rule),
        (&["Rule", "Space"], sized_rule),
        (&["raise", "lower"], raise_lower),
        (&["moveleft", "moveright"], move_left_right),
        (&["fbox"], fbox),
    ];
    for (names, handler) in table {
        ctx.define_function(FunctionDefSpec {
            package: Package::Base,
            names,
            handler: Arc::new(handler),
        });
    }
}
