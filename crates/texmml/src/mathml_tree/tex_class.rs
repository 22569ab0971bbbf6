//! Semantic (TeX spacing) classes.
//!
//! Every node of a finished tree receives a [`TexClass`]. Tokens take an
//! explicit class or the one the operator table gives their text, and an
//! embellished operator, such as `\sum` with limits or a primed
//! relation, takes the class of its core `mo`. Within each row the TeX
//! rule that turns a binary operator without a left operand into an
//! ordinary symbol is then applied.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

use super::{BASE, MathNode, MathNodeType};
use crate::symbols;

/// TeX atom classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TexClass {
    /// Ordinary symbol
    Ord,
    /// Large operator
    Op,
    /// Binary operator
    Bin,
    /// Relation
    Rel,
    /// Opening delimiter
    Open,
    /// Closing delimiter
    Close,
    /// Punctuation
    Punct,
    /// Fenced subformula
    Inner,
    /// Vertically centered box
    Vcenter,
    /// Invisible to spacing
    None,
}

/// Children that do not count when deciding whether a row is embellished.
fn is_space_like(node: &MathNode) -> bool {
    match node.node_type {
        MathNodeType::Mspace | MathNodeType::Mtext => true,
        MathNodeType::Mrow | MathNodeType::Mstyle | MathNodeType::Mpadded => {
            node.child_nodes().all(is_space_like)
        }
        _ => false,
    }
}

/// Whether `node` is an embellished operator: an `mo`, or a script,
/// fraction, style or atom whose base is one, or a row whose only
/// non-space child is one.
#[must_use]
pub fn is_embellished(node: &MathNode) -> bool {
    embellished_core(node).is_some()
}

/// The `mo` at the heart of an embellished operator.
#[must_use]
pub fn embellished_core(node: &MathNode) -> Option<&MathNode> {
    match node.node_type {
        MathNodeType::Mo => Some(node),
        MathNodeType::Msub
        | MathNodeType::Msup
        | MathNodeType::Msubsup
        | MathNodeType::Munder
        | MathNodeType::Mover
        | MathNodeType::Munderover
        | MathNodeType::Mfrac => node.child(BASE).and_then(embellished_core),
        MathNodeType::Math
        | MathNodeType::TeXAtom
        | MathNodeType::Mrow
        | MathNodeType::Mstyle
        | MathNodeType::Mpadded
        | MathNodeType::Mphantom => {
            let mut core = None;
            for child in node.child_nodes() {
                if is_space_like(child) {
                    continue;
                }
                if core.is_some() {
                    return None;
                }
                core = Some(embellished_core(child)?);
            }
            core
        }
        _ => None,
    }
}

/// Class an `mo` gets from its text when none was set explicitly.
#[must_use]
pub fn operator_class(text: &str) -> TexClass {
    symbols::operator_class(text).unwrap_or(TexClass::Rel)
}

/// Class of a node as the parser sees it: the explicit class, or for an
/// `mo` the one its text gives.
#[must_use]
pub fn declared_class(node: &MathNode) -> Option<TexClass> {
    node.properties.tex_class.or_else(|| {
        node.is(MathNodeType::Mo)
            .then(|| operator_class(&node.text))
    })
}

/// Assign classes to `node` and everything below it.
pub fn assign_classes(node: &mut MathNode) {
    for child in node.children.iter_mut().flatten() {
        assign_classes(child);
    }
    if node.node_type.is_row_like() {
        adjust_row(node);
    }
    node.tex_class = Some(own_class(node));
}

fn own_class(node: &MathNode) -> TexClass {
    if let Some(class) = node.properties.tex_class {
        return class;
    }
    match node.node_type {
        MathNodeType::Mo => operator_class(&node.text),
        MathNodeType::Mspace => TexClass::None,
        MathNodeType::Mrow if node.properties.open.is_some() || node.properties.close.is_some() => {
            TexClass::Inner
        }
        MathNodeType::TeXAtom => TexClass::Ord,
        _ => embellished_core(node)
            .and_then(|core| core.tex_class)
            .unwrap_or(TexClass::Ord),
    }
}

/// The TeX binary-operator adjustment over one row of siblings.
fn adjust_row(row: &mut MathNode) {
    let mut prev: Option<usize> = None;
    let count = row.children.len();
    for i in 0..count {
        let Some(class) = row.children[i].as_ref().and_then(|c| c.tex_class) else {
            continue;
        };
        if class == TexClass::None {
            continue;
        }
        let prev_class = prev
            .and_then(|p| row.children[p].as_ref())
            .map_or(TexClass::None, |p| p.tex_class.unwrap_or(TexClass::Ord));
        if class == TexClass::Bin
            && matches!(
                prev_class,
                TexClass::None
                    | TexClass::Bin
                    | TexClass::Op
                    | TexClass::Rel
                    | TexClass::Open
                    | TexClass::Punct
            )
        {
            set_class(&mut row.children[i], TexClass::Ord);
        } else if prev_class == TexClass::Bin
            && matches!(class, TexClass::Rel | TexClass::Close | TexClass::Punct)
        {
            if let Some(p) = prev {
                set_class(&mut row.children[p], TexClass::Ord);
            }
        }
        prev = Some(i);
    }
    if let Some(last) = prev {
        if row.children[last].as_ref().and_then(|c| c.tex_class) == Some(TexClass::Bin) {
            set_class(&mut row.children[last], TexClass::Ord);
        }
    }
}

fn set_class(slot: &mut Option<MathNode>, class: TexClass) {
    if let Some(node) = slot {
        node.tex_class = Some(class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mo(text: &str) -> MathNode {
        MathNode::token(MathNodeType::Mo, text)
    }

    fn mi(text: &str) -> MathNode {
        MathNode::token(MathNodeType::Mi, text)
    }

    #[test]
    fn test_scripted_operator_takes_core_class() {
        let mut node = MathNode::container(MathNodeType::Msub, vec![mo("="), mi("a")]);
        assert!(is_embellished(&node));
        assert_eq!(embellished_core(&node).map(|c| c.text.as_str()), Some("="));
        assert_eq!(embellished_core(&mi("x")), None);
        assign_classes(&mut node);
        assert_eq!(node.tex_class, Some(TexClass::Rel));
    }

    #[test]
    fn test_declared_class() {
        assert_eq!(declared_class(&mo("+")), Some(TexClass::Bin));
        assert_eq!(declared_class(&mi("x")), None);
        let op = mi("lim").with_class(TexClass::Op);
        assert_eq!(declared_class(&op), Some(TexClass::Op));
    }

    #[test]
    fn test_leading_and_trailing_bin_become_ord() {
        let mut row = MathNode::row(vec![mo("+"), mi("a"), mo("+"), mi("b"), mo("+")]);
        assign_classes(&mut row);
        let classes: Vec<_> = row.child_nodes().map(|c| c.tex_class).collect();
        assert_eq!(
            classes,
            vec![
                Some(TexClass::Ord),
                Some(TexClass::Ord),
                Some(TexClass::Bin),
                Some(TexClass::Ord),
                Some(TexClass::Ord),
            ]
        );
    }

    #[test]
    fn test_bin_before_rel_becomes_ord() {
        let mut row = MathNode::row(vec![mi("a"), mo("+"), mo("="), mi("b")]);
        assign_classes(&mut row);
        assert_eq!(row.child(1).and_then(|c| c.tex_class), Some(TexClass::Ord));
        assert_eq!(row.child(2).and_then(|c| c.tex_class), Some(TexClass::Rel));
    }

    #[test]
    fn test_atom_class_and_fenced_row() {
        let mut atom = MathNode::atom(TexClass::Rel, vec![mi("x")]);
        assign_classes(&mut atom);
        assert_eq!(atom.tex_class, Some(TexClass::Rel));
        let mut fenced = MathNode::row(vec![mo("("), mi("x"), mo(")")]);
        fenced.properties.open = Some("(".to_owned());
        assign_classes(&mut fenced);
        assert_eq!(fenced.tex_class, Some(TexClass::Inner));
    }
}
