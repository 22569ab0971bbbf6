//! Table frames.
//!
//! A table collects the nodes of its current cell, the finished cells of
//! its current row and the finished rows. Cell and row ends arrive as
//! [`StackItem::Cell`] frames; any other closing frame ends the table and
//! turns it into an `mtable`.
//!
//! Three flavors share the frame:
//!
//! | Kind | Cells | Rows | Tags |
//! |------|-------|------|------|
//! | [`ArrayKind::Array`] | `\hfill` alignment | optional label column | none |
//! | [`ArrayKind::EqnArray`] | leading relations padded | one tag per row | per row |
//! | [`ArrayKind::Multline`] | shoved alignment | exactly one cell | first or last row |

use core::mem;

use super::{Checked, Env, ItemKind, StackGlobal, StackItem};
use crate::context::ParseContext;
use crate::mathml_tree::{MathNode, MathNodeType};
use crate::namespace::KeyMap;
use crate::parser::parse_util::{fenced, fix_initial_mo};
use crate::types::{ParseError, ParseErrorKind};
use crate::units::{dimen_to_em, make_em};

/// Table flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayKind {
    /// `array`, matrices, `cases`
    #[default]
    Array,
    /// `align`, `gather` and the other numbered alignments
    EqnArray,
    /// `multline`
    Multline,
}

/// A table under construction.
#[derive(Debug, Clone, Default)]
pub struct ArrayItem {
    /// Flavor.
    pub kind: ArrayKind,
    /// Scope settings of the current cell.
    pub env: Env,
    /// Nodes of the current cell.
    pub nodes: Vec<MathNode>,
    /// Finished cells of the current row.
    pub row: Vec<MathNode>,
    /// Finished rows.
    pub table: Vec<MathNode>,
    /// Frame sides and their line styles.
    pub frame: Vec<(&'static str, &'static str)>,
    /// Positions of `\hfill` in the current cell.
    pub hfill: Vec<usize>,
    /// Attributes of the `mtable`.
    pub arraydef: KeyMap<String, String>,
    /// The full frame is dashed.
    pub dashed: bool,
    /// Fence opened before the table.
    pub open: Option<String>,
    /// Fence closed after the table.
    pub close: Option<String>,
    /// Ended by `}` rather than `\end`.
    pub require_close: bool,
    /// Text after the first `&` of a row is read as text.
    pub is_cases: bool,
    /// A third cell holds the row label.
    pub is_numbered: bool,
    /// Base row spacing in em, once a row has requested extra space.
    pub row_spacing: Option<f64>,
    /// Widest row seen.
    pub max_row: usize,
    /// This table opened the numbered equation structure.
    pub owns_eqn_env: bool,
    /// Alignment of the next `multline` cell.
    pub shove: Option<&'static str>,
    /// Environment or command name.
    pub name: String,
}

impl ArrayItem {
    /// An empty table of the given flavor.
    #[must_use]
    pub fn new(kind: ArrayKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Stack kind reported for this table.
    #[must_use]
    pub const fn item_kind(&self) -> ItemKind {
        match self.kind {
            ArrayKind::EqnArray => ItemKind::Eqnarray,
            ArrayKind::Array | ArrayKind::Multline => ItemKind::Array,
        }
    }

    /// Set a `mtable` attribute.
    pub fn set<V: Into<String>>(&mut self, key: &str, value: V) {
        self.arraydef.insert(key.to_owned(), value.into());
    }

    fn end_entry(&mut self) {
        let mut nodes = mem::take(&mut self.nodes);
        match self.kind {
            ArrayKind::Array => {
                let size = nodes.len();
                let mut mtd = MathNode::container(MathNodeType::Mtd, nodes);
                if let (Some(first), Some(last)) = (self.hfill.first(), self.hfill.last()) {
                    if *first == 0 {
                        mtd.set_attribute("columnalign", "right");
                    }
                    if *last == size {
                        let align = if mtd.attribute("columnalign").is_some() {
                            "center"
                        } else {
                            "left"
                        };
                        mtd.set_attribute("columnalign", align);
                    }
                }
                self.row.push(mtd);
            }
            ArrayKind::EqnArray => {
                if !self.row.is_empty() {
                    fix_initial_mo(&mut nodes);
                }
                self.row.push(MathNode::container(MathNodeType::Mtd, nodes));
            }
            ArrayKind::Multline => {
                if !self.table.is_empty() {
                    fix_initial_mo(&mut nodes);
                }
                let mut mtd = MathNode::container(MathNodeType::Mtd, nodes);
                if let Some(shove) = self.shove.take() {
                    mtd.set_attribute("columnalign", shove);
                }
                self.row.push(mtd);
            }
        }
        self.hfill.clear();
    }

    fn end_row(&mut self, ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
        let mut row = mem::take(&mut self.row);
        let node = match self.kind {
            ArrayKind::Array if self.is_numbered && row.len() == 3 => {
                row.rotate_right(1);
                MathNode::container(MathNodeType::Mlabeledtr, row)
            }
            ArrayKind::Array => MathNode::container(MathNodeType::Mtr, row),
            ArrayKind::EqnArray => {
                self.max_row = self.max_row.max(row.len());
                let node = match ctx.tags.get_tag(false) {
                    Some(tag) => {
                        row.insert(0, tag);
                        MathNode::container(MathNodeType::Mlabeledtr, row)
                    }
                    None => MathNode::container(MathNodeType::Mtr, row),
                };
                ctx.tags.clear_tag();
                node
            }
            ArrayKind::Multline => {
                if row.len() != 1 {
                    return Err(ParseErrorKind::MultlineRowsOneCol {
                        env: "multline".to_owned(),
                    }
                    .into());
                }
                MathNode::container(MathNodeType::Mtr, row)
            }
        };
        self.table.push(node);
        Ok(())
    }

    fn end_table(&mut self, ctx: &mut ParseContext<'_>, global: &mut StackGlobal) -> Result<(), ParseError> {
        if !self.nodes.is_empty() || !self.row.is_empty() {
            self.end_entry();
            self.end_row(ctx)?;
        }
        self.check_lines();
        if self.owns_eqn_env {
            global.eqn_env = false;
        }
        match self.kind {
            ArrayKind::Array => {}
            ArrayKind::EqnArray => {
                ctx.tags.end();
                self.extend_array("columnalign", self.max_row);
                self.extend_array("columnwidth", self.max_row);
                self.extend_array("columnspacing", self.max_row.saturating_sub(1));
            }
            ArrayKind::Multline => {
                self.align_multline_ends(ctx);
                ctx.tags.end();
            }
        }
        Ok(())
    }

    fn align_multline_ends(&mut self, ctx: &mut ParseContext<'_>) {
        let Some(last) = self.table.len().checked_sub(1) else {
            return;
        };
        for (index, align) in [(0, "left"), (last, "right")] {
            if let Some(cell) = self.table[index].child_mut(0)
                && cell.attribute("columnalign").is_none()
            {
                cell.set_attribute("columnalign", align);
            }
        }
        if let Some(tag) = ctx.tags.get_tag(false) {
            let index = if self.arraydef.get("side").is_some_and(|side| side == "left") {
                0
            } else {
                last
            };
            let row = &mut self.table[index];
            row.node_type = MathNodeType::Mlabeledtr;
            row.children.insert(0, Some(tag));
        }
    }

    fn check_lines(&mut self) {
        let rows = self.table.len();
        if let Some(rowlines) = self.arraydef.get("rowlines").cloned() {
            let mut lines: Vec<&str> = rowlines.split(' ').collect();
            if lines.len() == rows {
                if let Some(bottom) = lines.pop() {
                    self.frame.push(("bottom", line_style(bottom)));
                }
                if lines.is_empty() {
                    self.arraydef.remove("rowlines");
                } else {
                    self.set("rowlines", lines.join(" "));
                }
            } else if lines.len() + 1 < rows {
                self.set("rowlines", format!("{rowlines} none"));
            }
        }
        if let Some(spacing) = self.row_spacing {
            let mut rows_spacing: Vec<String> = self
                .arraydef
                .get("rowspacing")
                .map(|value| value.split(' ').map(str::to_owned).collect())
                .unwrap_or_default();
            while rows_spacing.len() < rows {
                rows_spacing.push(make_em(spacing));
            }
            self.set("rowspacing", rows_spacing.join(" "));
        }
    }

    fn extend_array(&mut self, name: &str, max: usize) {
        let Some(value) = self.arraydef.get(name) else {
            return;
        };
        let repeat: Vec<&str> = value.split(' ').collect();
        if repeat.len() > 1 {
            let columns: Vec<&str> = repeat.iter().copied().cycle().take(max.max(1)).collect();
            let joined = columns.join(" ");
            self.set(name, joined);
        }
    }

    /// Add `spacing` below the last finished row.
    pub fn add_row_spacing(&mut self, spacing: &str) {
        let Some(current) = self.arraydef.get("rowspacing") else {
            return;
        };
        let mut rows: Vec<String> = current.split(' ').map(str::to_owned).collect();
        let base = *self
            .row_spacing
            .get_or_insert_with(|| rows.first().and_then(|row| dimen_to_em(row)).unwrap_or(0.0));
        while rows.len() < self.table.len() {
            rows.push(make_em(base));
        }
        if let Some(index) = self.table.len().checked_sub(1)
            && index < rows.len()
        {
            let extra = dimen_to_em(spacing).unwrap_or(0.0);
            rows[index] = make_em((base + extra).max(0.0));
        }
        self.set("rowspacing", rows.join(" "));
    }

    fn create_mml(mut self) -> MathNode {
        let scriptlevel = self.arraydef.remove("scriptlevel");
        if self.arraydef.get("columnalign").is_some_and(String::is_empty) {
            self.arraydef.remove("columnalign");
        }
        if !self.frame.is_empty()
            && self.frame.len() != 4
            && let Some(rowlines) = self.arraydef.get("rowlines")
        {
            let collapsed = collapse_trailing_none(rowlines);
            self.set("rowlines", collapsed);
        }
        let has_lines = ["columnlines", "rowlines"]
            .iter()
            .any(|key| self.arraydef.get(*key).is_some_and(|lines| lines != "none"));
        let mut mml = MathNode::builder()
            .node_type(MathNodeType::Mtable)
            .children(self.table.into_iter().map(Some).collect())
            .attributes(self.arraydef)
            .build();
        if self.frame.len() == 4 {
            mml.set_attribute("frame", if self.dashed { "dashed" } else { "solid" });
        } else if !self.frame.is_empty() {
            mml.set_attribute("frame", "");
            let sides: Vec<&str> = self.frame.iter().map(|(side, _)| *side).collect();
            let styles: Vec<&str> = self.frame.iter().map(|(_, style)| *style).collect();
            mml = MathNode::container(MathNodeType::Menclose, vec![mml])
                .with_attr("notation", sides.join(" "))
                .with_attr("data-frame-styles", styles.join(" "));
            if has_lines {
                mml.set_attribute("data-padding", "0");
            }
        }
        if let Some(level) = scriptlevel {
            mml = MathNode::container(MathNodeType::Mstyle, vec![mml]).with_attr("scriptlevel", level);
        }
        if self.open.is_some() || self.close.is_some() {
            mml = fenced(
                self.open.as_deref().unwrap_or_default(),
                mml,
                self.close.as_deref().unwrap_or_default(),
                None,
            );
        }
        mml
    }

    fn clear_env(&mut self) {
        self.env = Env::default();
    }

    /// Combine `item` with this table.
    pub fn check_item(
        mut self: Box<Self>,
        item: StackItem,
        ctx: &mut ParseContext<'_>,
        global: &mut StackGlobal,
    ) -> Result<Checked, ParseError> {
        if !item.is_close() || matches!(item, StackItem::Over(_)) {
            return StackItem::Array(self).check_base(item);
        }
        if let StackItem::Cell(cell) = &item {
            if cell.is_entry {
                self.end_entry();
                self.clear_env();
                return Ok(Checked::Fail(StackItem::Array(self)));
            }
            if cell.is_cr {
                self.end_entry();
                self.end_row(ctx)?;
                self.clear_env();
                return Ok(Checked::Fail(StackItem::Array(self)));
            }
        }
        self.end_table(ctx, global)?;
        self.clear_env();
        let require_close = self.require_close;
        let mml = StackItem::Mml(self.create_mml());
        if require_close {
            if matches!(item, StackItem::Close) {
                return Ok(Checked::Replace(vec![mml]));
            }
            return Err(ParseErrorKind::MissingCloseBrace.into());
        }
        Ok(Checked::Replace(vec![mml, item]))
    }
}

fn line_style(line: &str) -> &'static str {
    match line {
        "dashed" => "dashed",
        "none" => "none",
        _ => "solid",
    }
}

fn collapse_trailing_none(lines: &str) -> String {
    let mut parts: Vec<&str> = lines.split(' ').collect();
    while parts.len() > 1 && parts.ends_with(&["none", "none"]) {
        parts.pop();
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mi(text: &str) -> MathNode {
        MathNode::token(MathNodeType::Mi, text)
    }

    #[test]
    fn test_hfill_alignment() {
        let mut array = ArrayItem::new(ArrayKind::Array);
        array.nodes = vec![mi("x")];
        array.hfill = vec![0];
        array.end_entry();
        assert_eq!(array.row[0].attribute("columnalign"), Some("right"));

        array.nodes = vec![mi("y")];
        array.hfill = vec![0, 1];
        array.end_entry();
        assert_eq!(array.row[1].attribute("columnalign"), Some("center"));
    }

    #[test]
    fn test_extend_array_repeats_pattern() {
        let mut array = ArrayItem::new(ArrayKind::EqnArray);
        array.set("columnalign", "right left");
        array.extend_array("columnalign", 3);
        assert_eq!(array.arraydef["columnalign"], "right left right");
        array.set("columnspacing", "1em");
        array.extend_array("columnspacing", 4);
        assert_eq!(array.arraydef["columnspacing"], "1em");
    }

    #[test]
    fn test_collapse_trailing_none() {
        assert_eq!(collapse_trailing_none("solid none none none"), "solid none");
        assert_eq!(collapse_trailing_none("none"), "none");
        assert_eq!(collapse_trailing_none("solid dashed"), "solid dashed");
    }

    #[test]
    fn test_four_sided_frame() {
        let mut array = ArrayItem::new(ArrayKind::Array);
        array.frame = vec![("left", "solid"), ("right", "solid"), ("top", "solid"), ("bottom", "solid")];
        let mml = array.create_mml();
        assert!(mml.is(MathNodeType::Mtable));
        assert_eq!(mml.attribute("frame"), Some("solid"));
    }

    #[test]
    fn test_partial_frame_uses_menclose() {
        let mut array = ArrayItem::new(ArrayKind::Array);
        array.frame = vec![("left", "solid"), ("right", "dashed")];
        let mml = array.create_mml();
        assert!(mml.is(MathNodeType::Menclose));
        assert_eq!(mml.attribute("notation"), Some("left right"));
        assert_eq!(mml.attribute("data-frame-styles"), Some("solid dashed"));
        assert!(mml.attribute("data-padding").is_none());
    }

    #[test]
    fn test_empty_columnalign_is_dropped() {
        let mut array = ArrayItem::new(ArrayKind::Array);
        array.set("columnalign", "");
        let mml = array.create_mml();
        assert!(mml.attribute("columnalign").is_none());
    }
}
