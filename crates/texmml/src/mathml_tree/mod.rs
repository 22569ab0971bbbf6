//! MathML-shaped node tree produced by the parser.
//!
//! A [`MathNode`] is an element kind plus ordered child slots, token text,
//! string attributes that survive to the output, and typed
//! [`NodeProperties`] that only the parser reads. Script and under/over
//! elements keep fixed slot positions, so their children are optional:
//! `x_1` first fills slot [`SUB`] of an `msubsup` and leaves [`SUP`] empty
//! until [`filters`] turn it into an `msub`.
//!
//! # Cross-references
//! - [`tex_class`] computes the semantic class of every node.
//! - [`filters::finalize`] runs the cleanup passes on a finished tree.
//! - [`attributes`] validates attributes given to `\mmlToken`.

use bon::bon;
use core::fmt::{self, Debug};
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

use crate::namespace::KeyMap;

pub mod attributes;
pub mod filters;
pub mod tex_class;

pub use tex_class::{TexClass, declared_class, embellished_core, is_embellished};

/// Slot of the base in script and under/over elements.
pub const BASE: usize = 0;
/// Subscript slot of `msubsup`.
pub const SUB: usize = 1;
/// Superscript slot of `msubsup`.
pub const SUP: usize = 2;
/// Underscript slot of `munderover`.
pub const UNDER: usize = 1;
/// Overscript slot of `munderover`.
pub const OVER: usize = 2;

/// MathML element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MathNodeType {
    /// `<math>` element
    Math,
    /// `<mi>` element
    Mi,
    /// `<mn>` element
    Mn,
    /// `<mo>` element
    Mo,
    /// `<mtext>` element
    Mtext,
    /// `<ms>` element
    Ms,
    /// `<mspace>` element
    Mspace,
    /// `<mrow>` element
    Mrow,
    /// `<mfrac>` element
    Mfrac,
    /// `<msqrt>` element
    Msqrt,
    /// `<mroot>` element
    Mroot,
    /// `<mstyle>` element
    Mstyle,
    /// `<merror>` element
    Merror,
    /// `<mpadded>` element
    Mpadded,
    /// `<mphantom>` element
    Mphantom,
    /// `<menclose>` element
    Menclose,
    /// `<msub>` element
    Msub,
    /// `<msup>` element
    Msup,
    /// `<msubsup>` element
    Msubsup,
    /// `<munder>` element
    Munder,
    /// `<mover>` element
    Mover,
    /// `<munderover>` element
    Munderover,
    /// `<mtable>` element
    Mtable,
    /// `<mtr>` element
    Mtr,
    /// `<mlabeledtr>` element
    Mlabeledtr,
    /// `<mtd>` element
    Mtd,
    /// A group carrying an explicit TeX class
    #[strum(serialize = "TeXAtom")]
    #[serde(rename = "TeXAtom")]
    TeXAtom,
}

impl MathNodeType {
    /// Token elements hold text rather than children.
    #[must_use]
    pub const fn is_token(self) -> bool {
        matches!(
            self,
            Self::Mi | Self::Mn | Self::Mo | Self::Mtext | Self::Ms | Self::Mspace
        )
    }

    /// Elements whose children form an implicit row, so an inferred `mrow`
    /// placed in them dissolves into their child list.
    #[must_use]
    pub const fn is_row_like(self) -> bool {
        matches!(
            self,
            Self::Math
                | Self::Mrow
                | Self::Mstyle
                | Self::Merror
                | Self::Mpadded
                | Self::Mphantom
                | Self::Menclose
                | Self::Msqrt
                | Self::Mtd
                | Self::TeXAtom
        )
    }
}

/// Parser-internal facts about a node. Cleared before output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeProperties {
    /// Class set by the command that built the node.
    pub tex_class: Option<TexClass>,
    /// Scripts on this base become limits in display style.
    pub movesupsub: Option<bool>,
    /// Scripts may be attached without an extra wrapper.
    pub subsup_ok: bool,
    /// The glyph is drawn in its variant form (primes).
    pub variant_form: bool,
    /// An `mrow` that only groups siblings and dissolves into its parent.
    pub inferred: bool,
    /// Opening fence of a fenced `mrow`.
    pub open: Option<String>,
    /// Closing fence of a fenced `mrow`.
    pub close: Option<String>,
    /// An `mi` produced by a named operator such as `\sin`.
    pub fn_op: bool,
    /// Relation tokens merged into this one.
    pub relations_combined: bool,
}

/// General purpose MathML node of any type
#[derive(Clone, PartialEq, Serialize)]
pub struct MathNode {
    /// The type of MathML node
    #[serde(rename = "kind")]
    pub node_type: MathNodeType,
    /// Child slots; script elements may have empty slots
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Option<MathNode>>,
    /// Text of a token element
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Attributes of the MathML node
    #[serde(skip_serializing_if = "KeyMap::is_empty")]
    pub attributes: KeyMap<String, String>,
    /// Parser-internal properties
    #[serde(skip)]
    pub properties: NodeProperties,
    /// Semantic class, computed by [`tex_class::assign_classes`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tex_class: Option<TexClass>,
}

impl Debug for MathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("MathNode");
        s.field("node_type", &self.node_type);
        if !self.text.is_empty() {
            s.field("text", &self.text);
        }
        if !self.attributes.is_empty() {
            s.field("attributes", &self.attributes);
        }
        if !self.children.is_empty() {
            s.field("children", &self.children);
        }
        s.finish()
    }
}

#[bon]
impl MathNode {
    /// Create a new MathNode with the given type
    #[builder]
    pub fn new(
        /// Node type
        node_type: MathNodeType,
        /// Child slots
        children: Option<Vec<Option<Self>>>,
        /// Token text
        text: Option<String>,
        /// Node attributes
        attributes: Option<KeyMap<String, String>>,
        /// Parser properties
        properties: Option<NodeProperties>,
    ) -> Self {
        Self {
            node_type,
            children: children.unwrap_or_default(),
            text: text.unwrap_or_default(),
            attributes: attributes.unwrap_or_default(),
            properties: properties.unwrap_or_default(),
            tex_class: None,
        }
    }

    /// Token element holding `text`.
    #[must_use]
    pub fn token<S: Into<String>>(node_type: MathNodeType, text: S) -> Self {
        Self::builder().node_type(node_type).text(text.into()).build()
    }

    /// Container element with every slot filled.
    #[must_use]
    pub fn container(node_type: MathNodeType, children: Vec<Self>) -> Self {
        Self::builder()
            .node_type(node_type)
            .children(children.into_iter().map(Some).collect())
            .build()
    }

    /// An `mtext` holding `text`.
    #[must_use]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::token(MathNodeType::Mtext, text)
    }

    /// An explicit `mrow`.
    #[must_use]
    pub fn row(children: Vec<Self>) -> Self {
        Self::container(MathNodeType::Mrow, children)
    }

    /// An `mrow` that only groups siblings.
    #[must_use]
    pub fn inferred_row(children: Vec<Self>) -> Self {
        let mut row = Self::row(children);
        row.properties.inferred = true;
        row
    }

    /// A `TeXAtom` of the given class.
    #[must_use]
    pub fn atom(class: TexClass, children: Vec<Self>) -> Self {
        Self::container(MathNodeType::TeXAtom, children).with_class(class)
    }

    /// Set an attribute and return the node.
    #[must_use]
    pub fn with_attr<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_attribute(key, value);
        self
    }

    /// Set the declared class and return the node.
    #[must_use]
    pub const fn with_class(mut self, class: TexClass) -> Self {
        self.properties.tex_class = Some(class);
        self
    }

    /// Set an attribute on this node
    pub fn set_attribute<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes.insert(key.into(), value.into());
    }

    /// Value of an attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Whether this node is of the given kind.
    #[must_use]
    pub fn is(&self, node_type: MathNodeType) -> bool {
        self.node_type == node_type
    }

    /// Whether this is an `mrow` that only groups siblings.
    #[must_use]
    pub const fn is_inferred(&self) -> bool {
        self.properties.inferred
    }

    /// Child in `slot`, if the slot exists and is filled.
    #[must_use]
    pub fn child(&self, slot: usize) -> Option<&Self> {
        self.children.get(slot).and_then(Option::as_ref)
    }

    /// Mutable child in `slot`.
    pub fn child_mut(&mut self, slot: usize) -> Option<&mut Self> {
        self.children.get_mut(slot).and_then(Option::as_mut)
    }

    /// Put `node` in `slot`, growing the slot list as needed.
    pub fn set_child(&mut self, slot: usize, node: Option<Self>) {
        if self.children.len() <= slot {
            self.children.resize(slot + 1, None);
        }
        self.children[slot] = node;
    }

    /// Append a child.
    pub fn push_child(&mut self, node: Self) {
        self.children.push(Some(node));
    }

    /// Filled children in order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().flatten()
    }

    /// Concatenated text of all tokens below this node.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in self.child_nodes() {
            out.push_str(&child.text_content());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_child_grows_slots() {
        let mut node = MathNode::container(
            MathNodeType::Msubsup,
            vec![MathNode::token(MathNodeType::Mi, "x")],
        );
        node.set_child(SUP, Some(MathNode::token(MathNodeType::Mn, "2")));
        assert_eq!(node.children.len(), 3);
        assert!(node.child(SUB).is_none());
        assert_eq!(node.child(SUP).map(|n| n.text.as_str()), Some("2"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MathNodeType::Munderover.as_ref(), "munderover");
        assert_eq!(MathNodeType::TeXAtom.as_ref(), "TeXAtom");
        assert!(MathNodeType::Mspace.is_token());
        assert!(MathNodeType::Msqrt.is_row_like());
        assert!(!MathNodeType::Mfrac.is_row_like());
    }

    #[test]
    fn test_text_content() {
        let row = MathNode::row(vec![
            MathNode::token(MathNodeType::Mi, "a"),
            MathNode::token(MathNodeType::Mo, "+"),
        ]);
        assert_eq!(row.text_content(), "a+");
        assert!(!row.is_inferred());
        assert!(MathNode::inferred_row(vec![]).is_inferred());
    }

    #[test]
    fn test_attributes() {
        let mo = MathNode::token(MathNodeType::Mo, "(").with_attr("stretchy", "false");
        assert_eq!(mo.attribute("stretchy"), Some("false"));
        assert_eq!(mo.attribute("fence"), None);
    }
}
