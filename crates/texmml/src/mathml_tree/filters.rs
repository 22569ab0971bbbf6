//! Cleanup passes run once on every finished tree.

use core::mem;

use super::tex_class::assign_classes;
use super::{BASE, MathNode, MathNodeType, NodeProperties, OVER, SUB, SUP, TexClass, UNDER};

/// Turn a parse result into an output tree.
///
/// 1. Script elements with an empty slot shrink to their one-script form.
/// 2. Inferred rows dissolve into row-like parents, or become plain rows.
/// 3. Semantic classes are assigned.
/// 4. Adjacent relations are merged into one operator.
/// 5. Parser properties are cleared.
pub fn finalize(root: &mut MathNode) {
    clean_scripts(root);
    flatten_inferred(root);
    assign_classes(root);
    combine_relations(root);
    clear_properties(root);
}

/// Replace `msubsup`/`munderover` nodes that have an empty slot.
pub fn clean_scripts(node: &mut MathNode) {
    for child in node.children.iter_mut().flatten() {
        clean_scripts(child);
    }
    let (low, high, low_kind, high_kind) = match node.node_type {
        MathNodeType::Msubsup => (SUB, SUP, MathNodeType::Msub, MathNodeType::Msup),
        MathNodeType::Munderover => (UNDER, OVER, MathNodeType::Munder, MathNodeType::Mover),
        _ => return,
    };
    let has_low = node.child(low).is_some();
    let has_high = node.child(high).is_some();
    if has_low && has_high {
        return;
    }
    let mut slots = mem::take(&mut node.children);
    slots.resize(3, None);
    let base = slots[BASE].take();
    if !has_low && !has_high {
        if let Some(base) = base {
            let properties = mem::take(&mut node.properties);
            *node = base;
            if node.properties.tex_class.is_none() {
                node.properties.tex_class = properties.tex_class;
            }
        }
        return;
    }
    let (kind, script) = if has_low {
        (low_kind, slots[low].take())
    } else {
        (high_kind, slots[high].take())
    };
    node.node_type = kind;
    node.children = vec![base, script];
}

/// Dissolve inferred rows into their parents.
pub fn flatten_inferred(node: &mut MathNode) {
    for child in node.children.iter_mut().flatten() {
        flatten_inferred(child);
    }
    if node.node_type.is_row_like() {
        if node.children.iter().flatten().any(MathNode::is_inferred) {
            let mut children = Vec::with_capacity(node.children.len());
            for child in mem::take(&mut node.children) {
                match child {
                    Some(child) if child.is_inferred() => children.extend(child.children),
                    other => children.push(other),
                }
            }
            node.children = children;
        }
    } else {
        for slot in &mut node.children {
            let Some(child) = slot.as_mut() else {
                continue;
            };
            if !child.is_inferred() {
                continue;
            }
            if child.children.len() == 1 {
                *slot = child.children.pop().flatten();
            } else {
                child.properties.inferred = false;
            }
        }
    }
}

fn mergeable(a: &MathNode, b: &MathNode) -> bool {
    a.is(MathNodeType::Mo)
        && b.is(MathNodeType::Mo)
        && a.tex_class == Some(TexClass::Rel)
        && b.tex_class == Some(TexClass::Rel)
        && a.properties.variant_form == b.properties.variant_form
        && a.attributes == b.attributes
}

/// Merge runs of relation operators with identical attributes, so `:=`
/// typed as two characters becomes one operator.
pub fn combine_relations(node: &mut MathNode) {
    for child in node.children.iter_mut().flatten() {
        combine_relations(child);
    }
    if !node.node_type.is_row_like() || node.children.len() < 2 {
        return;
    }
    let mut merged: Vec<Option<MathNode>> = Vec::with_capacity(node.children.len());
    for child in mem::take(&mut node.children) {
        if let (Some(Some(last)), Some(next)) = (merged.last_mut(), child.as_ref()) {
            if mergeable(last, next) {
                last.text.push_str(&next.text);
                last.properties.relations_combined = true;
                continue;
            }
        }
        merged.push(child);
    }
    node.children = merged;
}

/// Drop parser-internal properties.
pub fn clear_properties(node: &mut MathNode) {
    node.properties = NodeProperties::default();
    for child in node.children.iter_mut().flatten() {
        clear_properties(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mi(text: &str) -> MathNode {
        MathNode::token(MathNodeType::Mi, text)
    }

    fn mo(text: &str) -> MathNode {
        MathNode::token(MathNodeType::Mo, text)
    }

    #[test]
    fn test_msubsup_with_empty_sub_becomes_msup() {
        let mut node = MathNode::container(MathNodeType::Msubsup, vec![mi("x")]);
        node.set_child(SUP, Some(mi("2")));
        clean_scripts(&mut node);
        assert_eq!(node.node_type, MathNodeType::Msup);
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.child(1).map(|c| c.text.as_str()), Some("2"));
    }

    #[test]
    fn test_munderover_with_empty_over_becomes_munder() {
        let mut node = MathNode::container(MathNodeType::Munderover, vec![mo("\u{2211}")]);
        node.set_child(UNDER, Some(mi("i")));
        clean_scripts(&mut node);
        assert_eq!(node.node_type, MathNodeType::Munder);
    }

    #[test]
    fn test_inferred_rows_dissolve() {
        let mut sqrt = MathNode::container(
            MathNodeType::Msqrt,
            vec![MathNode::inferred_row(vec![mi("a"), mi("b")])],
        );
        flatten_inferred(&mut sqrt);
        assert_eq!(sqrt.children.len(), 2);

        let mut frac = MathNode::container(
            MathNodeType::Mfrac,
            vec![
                MathNode::inferred_row(vec![mi("a")]),
                MathNode::inferred_row(vec![mi("b"), mi("c")]),
            ],
        );
        flatten_inferred(&mut frac);
        assert!(frac.child(0).is_some_and(|c| c.is(MathNodeType::Mi)));
        assert!(frac.child(1).is_some_and(|c| c.is(MathNodeType::Mrow) && !c.is_inferred()));
    }

    #[test]
    fn test_adjacent_relations_combine() {
        let mut row = MathNode::row(vec![mi("a"), mo(":"), mo("="), mi("b")]);
        finalize(&mut row);
        let texts: Vec<_> = row.child_nodes().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", ":=", "b"]);
    }
}
