//! Equation numbers, labels and references.
//!
//! A [`TagRegistry`] lives as long as its document. Each top-level parse is
//! bracketed by [`TagRegistry::start_equation`] and
//! [`TagRegistry::finish_equation`]; labels defined by a parse that fails
//! are discarded, those of a successful one become visible to later
//! expressions. Inside an expression every numbered environment opens a
//! [`TagInfo`] with [`TagRegistry::start`] and closes it with
//! [`TagRegistry::end`].
//!
//! References are resolved in one pass: `\ref` to a label that has not
//! been defined yet shows the placeholder `???` and is never revisited.

use core::fmt;
use core::mem;

use crate::mathml_tree::{MathNode, MathNodeType};
use crate::namespace::Mapping;
use crate::types::{Settings, TagMode, TagSide};

/// Where a label points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The tag text, e.g. `1`.
    pub tag: String,
    /// Anchor id of the tagged row.
    pub id: String,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            tag: "???".to_owned(),
            id: String::new(),
        }
    }
}

/// Tag state of one equation or numbered environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInfo {
    /// Environment name; empty at the top level.
    pub env: String,
    /// Whether `\tag` is allowed.
    pub taggable: bool,
    /// Whether rows are numbered automatically.
    pub default_tags: bool,
    /// The tag text, if any.
    pub tag: Option<String>,
    /// The tag as displayed.
    pub tag_format: String,
    /// Label of the current row.
    pub label: String,
    /// Anchor id of the current row.
    pub tag_id: String,
    /// `\notag` was given.
    pub no_tag: bool,
}

impl TagInfo {
    fn new(env: &str, taggable: bool, default_tags: bool) -> Self {
        Self {
            env: env.to_owned(),
            taggable,
            default_tags,
            ..Self::default()
        }
    }
}

/// Presentation of tags, ids and links.
pub trait TagFormatter: Send + Sync {
    /// Displayed form of a tag.
    fn format_tag(&self, tag: &str) -> String {
        format!("({tag})")
    }

    /// Displayed form of a tag inside `\eqref`.
    fn format_ref(&self, tag: &str) -> String {
        self.format_tag(tag)
    }

    /// Anchor id for a tag or label.
    fn format_id(&self, id: &str) -> String {
        let id: String = id
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        format!("eqn:{id}")
    }

    /// Link target for an anchor.
    fn format_url(&self, id: &str, base: &str) -> String {
        format!("{base}#{}", urlencoding::encode(id))
    }

    /// Text of an automatic number.
    fn format_number(&self, n: usize) -> String {
        n.to_string()
    }
}

/// `(n)` tags and `eqn:` ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTagFormatter;

impl TagFormatter for DefaultTagFormatter {}

/// Counter, labels and the stack of open tag scopes.
pub struct TagRegistry {
    mode: TagMode,
    side: TagSide,
    indent: String,
    use_label_ids: bool,
    base_url: String,
    formatter: Box<dyn TagFormatter>,
    counter: usize,
    all_counter: usize,
    labels: Mapping<Label>,
    all_labels: Mapping<Label>,
    current: TagInfo,
    stack: Vec<TagInfo>,
    history: Vec<TagInfo>,
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("mode", &self.mode)
            .field("counter", &self.counter)
            .field("current", &self.current)
            .field("labels", &self.all_labels.len())
            .finish_non_exhaustive()
    }
}

impl TagRegistry {
    /// Registry configured from `settings`, with the default formatter.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: settings.tags,
            side: settings.tag_side,
            indent: settings.tag_indent.clone(),
            use_label_ids: settings.use_label_ids,
            base_url: settings.base_url.clone(),
            formatter: Box::new(DefaultTagFormatter),
            counter: 0,
            all_counter: 0,
            labels: Mapping::default(),
            all_labels: Mapping::default(),
            current: TagInfo::default(),
            stack: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Replace the formatter.
    #[must_use]
    pub fn with_formatter<F: TagFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// The formatter in use.
    #[must_use]
    pub fn formatter(&self) -> &dyn TagFormatter {
        self.formatter.as_ref()
    }

    /// Automatic numbering mode.
    #[must_use]
    pub const fn mode(&self) -> TagMode {
        self.mode
    }

    /// Side of tagged tables.
    #[must_use]
    pub const fn side(&self) -> TagSide {
        self.side
    }

    /// Minimum label spacing of tagged tables.
    #[must_use]
    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// The innermost tag scope.
    #[must_use]
    pub const fn current(&self) -> &TagInfo {
        &self.current
    }

    /// Name of the innermost numbered environment; empty at the top level.
    #[must_use]
    pub fn env(&self) -> &str {
        &self.current.env
    }

    /// Number of equations numbered so far.
    #[must_use]
    pub const fn counter(&self) -> usize {
        self.counter
    }

    /// Open a tag scope for an environment.
    pub fn start(&mut self, env: &str, taggable: bool, default_tags: bool) {
        let info = TagInfo::new(env, taggable, default_tags);
        self.stack.push(mem::replace(&mut self.current, info));
    }

    /// Close the innermost tag scope.
    pub fn end(&mut self) {
        let outer = self.stack.pop().unwrap_or_default();
        self.history.push(mem::replace(&mut self.current, outer));
    }

    /// Set the tag of the current row; `no_format` keeps `tag` as written.
    pub fn tag(&mut self, tag: &str, no_format: bool) {
        self.current.tag = Some(tag.to_owned());
        self.current.tag_format = if no_format {
            tag.to_owned()
        } else {
            self.formatter.format_tag(tag)
        };
        self.current.no_tag = false;
    }

    /// Suppress the tag of the current row.
    pub fn no_tag(&mut self) {
        self.tag("", true);
        self.current.no_tag = true;
    }

    /// Label of the current row.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.current.label
    }

    /// Set the label of the current row and reserve its name.
    pub fn set_label(&mut self, label: &str) {
        self.current.label = label.to_owned();
        self.labels.insert(label.to_owned(), Label::default());
    }

    /// Whether `label` is defined in this expression or an earlier one.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains_key(label) || self.all_labels.contains_key(label)
    }

    /// Target of `label`. A label reserved by this expression but not yet
    /// tagged points at the placeholder.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<&Label> {
        self.all_labels.get(label).or_else(|| self.labels.get(label))
    }

    /// Link target for a label.
    #[must_use]
    pub fn format_url(&self, id: &str) -> String {
        self.formatter.format_url(id, &self.base_url)
    }

    /// Give the current row the next number unless it has a tag already.
    pub fn auto_tag(&mut self) {
        if self.mode == TagMode::None || self.current.tag.is_some() {
            return;
        }
        self.counter += 1;
        let number = self.formatter.format_number(self.counter);
        self.tag(&number, false);
    }

    /// Forget the tag and label of the current row.
    pub fn clear_tag(&mut self) {
        self.current.label.clear();
        self.current.tag = None;
        self.current.tag_format.clear();
        self.current.tag_id.clear();
        self.current.no_tag = false;
    }

    /// The tag cell for the current row, numbering it first when the scope
    /// numbers rows automatically. `force` numbers it regardless.
    pub fn get_tag(&mut self, force: bool) -> Option<MathNode> {
        if force {
            self.auto_tag();
            return self.current.tag.is_some().then(|| self.make_tag());
        }
        if !self.current.taggable || self.current.no_tag {
            return None;
        }
        if self.current.default_tags {
            self.auto_tag();
        }
        self.current
            .tag
            .as_ref()
            .is_some_and(|tag| !tag.is_empty())
            .then(|| self.make_tag())
    }

    fn make_tag(&mut self) -> MathNode {
        let tag = self.current.tag.clone().unwrap_or_default();
        let source = if self.use_label_ids && !self.current.label.is_empty() {
            self.current.label.as_str()
        } else {
            tag.as_str()
        };
        self.current.tag_id = self.formatter.format_id(source);
        if !self.current.label.is_empty() {
            self.labels.insert(
                self.current.label.clone(),
                Label {
                    tag,
                    id: self.current.tag_id.clone(),
                },
            );
        }
        MathNode::container(
            MathNodeType::Mtd,
            vec![MathNode::text(self.current.tag_format.clone())],
        )
        .with_attr("id", self.current.tag_id.clone())
    }

    /// Wrap `node` in a one-row labeled table.
    #[must_use]
    pub fn en_tag(&self, node: MathNode, tag: MathNode) -> MathNode {
        let cell = MathNode::container(MathNodeType::Mtd, vec![node]);
        let row = MathNode::container(MathNodeType::Mlabeledtr, vec![tag, cell]);
        MathNode::container(MathNodeType::Mtable, vec![row])
            .with_attr("side", self.side.as_ref())
            .with_attr("minlabelspacing", self.indent.clone())
            .with_attr("displaystyle", "true")
    }

    /// Attach a top-level tag to a finished display equation.
    pub fn finalize(&mut self, node: MathNode, display: bool) -> MathNode {
        if !display {
            return node;
        }
        let tag = if self.mode == TagMode::All {
            if self.history.iter().any(|info| info.taggable) {
                return node;
            }
            self.get_tag(true)
        } else {
            if !self.current.env.is_empty() || self.current.tag.is_none() || self.current.no_tag {
                return node;
            }
            Some(self.make_tag())
        };
        match tag {
            Some(tag) => self.en_tag(node, tag),
            None => node,
        }
    }

    /// Reset the per-expression state before a top-level parse.
    pub fn start_equation(&mut self) {
        self.history.clear();
        self.stack.clear();
        self.current = TagInfo::default();
        self.labels.clear();
        self.counter = self.all_counter;
    }

    /// Commit numbers and labels of a successful top-level parse.
    pub fn finish_equation(&mut self) {
        self.all_counter = self.counter;
        self.all_labels.extend(self.labels.drain());
    }

    /// Forget every number and label, restarting the count at `offset`.
    pub fn reset(&mut self, offset: usize) {
        self.start_equation();
        self.counter = offset;
        self.all_counter = offset;
        self.all_labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(mode: TagMode) -> TagRegistry {
        TagRegistry::new(&Settings::builder().tags(mode).build())
    }

    #[test]
    fn test_numbered_environment_counts() {
        let mut tags = registry(TagMode::Ams);
        tags.start_equation();
        tags.start("equation", true, true);
        let tag = tags.get_tag(false).unwrap();
        assert_eq!(tag.text_content(), "(1)");
        assert_eq!(tag.attribute("id"), Some("eqn:1"));
        tags.end();
        tags.finish_equation();
        assert_eq!(tags.counter(), 1);
    }

    #[test]
    fn test_label_ids_use_label_name() {
        let mut tags = registry(TagMode::Ams);
        tags.start_equation();
        tags.start("equation", true, true);
        tags.set_label("euler id");
        let tag = tags.get_tag(false).unwrap();
        assert_eq!(tag.attribute("id"), Some("eqn:euler_id"));
        tags.end();
        tags.finish_equation();
        let label = tags.lookup("euler id").unwrap();
        assert_eq!(label.tag, "1");
        assert_eq!(tags.format_url(&label.id), "#eqn%3Aeuler_id");
    }

    #[test]
    fn test_failed_equation_discards_labels() {
        let mut tags = registry(TagMode::Ams);
        tags.start_equation();
        tags.set_label("a");
        assert!(tags.has_label("a"));
        tags.start_equation();
        assert!(!tags.has_label("a"));
    }

    #[test]
    fn test_none_mode_only_uses_explicit_tags() {
        let mut tags = registry(TagMode::None);
        tags.start_equation();
        tags.start("equation", true, true);
        assert!(tags.get_tag(false).is_none());
        tags.tag("A", false);
        assert_eq!(tags.get_tag(false).map(|t| t.text_content()), Some("(A)".to_owned()));
    }

    #[test]
    fn test_finalize_top_level_tag() {
        let mut tags = registry(TagMode::None);
        tags.start_equation();
        tags.tag("x", true);
        let node = tags.finalize(MathNode::token(MathNodeType::Mi, "a"), true);
        assert!(node.is(MathNodeType::Mtable));
        assert_eq!(node.attribute("side"), Some("right"));
        let row = node.child(0).unwrap();
        assert!(row.is(MathNodeType::Mlabeledtr));
        assert_eq!(row.child(0).map(MathNode::text_content), Some("x".to_owned()));
    }

    struct Bracketed;

    impl TagFormatter for Bracketed {
        fn format_tag(&self, tag: &str) -> String {
            format!("[{tag}]")
        }

        fn format_ref(&self, tag: &str) -> String {
            tag.to_owned()
        }
    }

    #[test]
    fn test_custom_formatter() {
        let mut tags = registry(TagMode::Ams).with_formatter(Bracketed);
        tags.start_equation();
        tags.start("equation", true, true);
        let tag = tags.get_tag(false).unwrap();
        assert_eq!(tag.text_content(), "[1]");
        assert_eq!(tags.formatter().format_ref("1"), "1");
    }

    #[test]
    fn test_all_mode_numbers_display_equations() {
        let mut tags = registry(TagMode::All);
        tags.start_equation();
        let node = tags.finalize(MathNode::token(MathNodeType::Mi, "a"), true);
        assert!(node.is(MathNodeType::Mtable));
        let inline = tags.finalize(MathNode::token(MathNodeType::Mi, "a"), false);
        assert!(inline.is(MathNodeType::Mi));
    }
}
