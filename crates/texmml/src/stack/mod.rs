//! The parse stack.
//!
//! Every construct being assembled is a frame ([`StackItem`]) on a
//! [`Stack`]. Pushing an item first shows it to the frame on top, whose
//! [`StackItem::check_item`] decides among three outcomes:
//!
//! - [`Checked::Success`]: the item becomes the new top
//! - [`Checked::Fail`]: the item was absorbed (a node appended, a cell
//!   ended) and is dropped
//! - [`Checked::Replace`]: the top is finished and is replaced by the
//!   listed items, each pushed in turn
//!
//! Open frames (groups, fences, environments, tables) own an [`Env`]; every
//! other frame sees the env of the nearest open frame below it.
//!
//! # Examples
//!
//! ```rust
//! use texmml::stack::{ItemFactory, ItemKind};
//!
//! let item = ItemFactory::create_named("open").unwrap();
//! assert_eq!(item.kind(), ItemKind::Open);
//! assert!(item.is_open());
//! ```

mod array;
mod item;

pub use array::{ArrayItem, ArrayKind};
pub use item::{
    BeginItem, CellItem, DotsItem, EquationItem, FenceItem, FnItem, Group, LeftItem, OverItem,
    PositionItem, PrimeItem, Shift, StackItem, StyleItem, SubsupItem, to_mml,
};

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::context::ParseContext;
use crate::mathml_tree::MathNode;
use crate::types::{MathVariant, ParseError, TexStyle};

/// Scope-local settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Env {
    /// Variant applied to letters, digits and upright Greek.
    pub font: Option<MathVariant>,
    /// Style set by `\displaystyle` and friends.
    pub style: Option<TexStyle>,
    /// Size multiplier set by `\small` and friends.
    pub size: Option<f64>,
    /// Color set by `\color`.
    pub color: Option<String>,
    /// The expression is a display equation.
    pub display: bool,
    /// Parsing the degree of a root.
    pub in_root: bool,
    /// Letter runs form a single identifier.
    pub multi_letter: bool,
}

static EMPTY_ENV: Env = Env {
    font: None,
    style: None,
    size: None,
    color: None,
    display: false,
    in_root: false,
    multi_letter: false,
};

/// Flags shared by every frame of one stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackGlobal {
    /// The stack belongs to a nested parse.
    pub is_inner: bool,
    /// `\leftroot` offset, for the degree of a root.
    pub left_root: Option<String>,
    /// `\uproot` offset, for the degree of a root.
    pub up_root: Option<String>,
    /// A numbered equation structure is open.
    pub eqn_env: bool,
    /// User environments whose end text is being read, innermost last.
    pub closing: Vec<String>,
}

/// Outcome of showing an item to the top frame.
#[derive(Debug)]
pub enum Checked {
    /// Keep the top and push the item on it.
    Success(StackItem, StackItem),
    /// Keep the top; the item was absorbed.
    Fail(StackItem),
    /// Drop the top and push these instead.
    Replace(Vec<StackItem>),
}

/// Names of the frame kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
    /// Bottom of every stack
    Start,
    /// End of input
    Stop,
    /// `{`
    Open,
    /// `}`
    Close,
    /// Style or size scope
    Style,
    /// `\raise`, `\lower`, `\moveleft`, `\moveright`
    Position,
    /// Pending script
    Subsup,
    /// Pending primes
    Prime,
    /// `\not`
    Not,
    /// `\dots`
    Dots,
    /// `\over` and friends
    Over,
    /// Table
    Array,
    /// Numbered alignment table
    Eqnarray,
    /// `&`, `\\` or `\cr`
    Cell,
    /// `\left`
    Left,
    /// `\middle`
    Middle,
    /// `\right`
    Right,
    /// `\begin`
    Begin,
    /// `\end`
    End,
    /// `equation` environment
    Equation,
    /// Named function awaiting its argument
    Fn,
    /// A finished node
    Mml,
    /// Nothing
    Null,
}

/// Builds frames by kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemFactory;

impl ItemFactory {
    /// A frame of the given kind with empty contents.
    #[must_use]
    pub fn create(kind: ItemKind) -> StackItem {
        match kind {
            ItemKind::Start => StackItem::Start(Group::default()),
            ItemKind::Stop => StackItem::Stop,
            ItemKind::Open => StackItem::Open(Group::default()),
            ItemKind::Close => StackItem::Close,
            ItemKind::Style => StackItem::Style(StyleItem::default()),
            ItemKind::Position => StackItem::Position(PositionItem::default()),
            ItemKind::Subsup => StackItem::Subsup(SubsupItem::default()),
            ItemKind::Prime => StackItem::Prime(PrimeItem::default()),
            ItemKind::Not => StackItem::Not,
            ItemKind::Dots => StackItem::Dots(DotsItem::default()),
            ItemKind::Over => StackItem::Over(OverItem::default()),
            ItemKind::Array => StackItem::Array(Box::default()),
            ItemKind::Eqnarray => StackItem::Array(Box::new(ArrayItem::new(ArrayKind::EqnArray))),
            ItemKind::Cell => StackItem::Cell(CellItem::default()),
            ItemKind::Left => StackItem::Left(LeftItem::default()),
            ItemKind::Middle => StackItem::Middle(FenceItem::default()),
            ItemKind::Right => StackItem::Right(FenceItem::default()),
            ItemKind::Begin => StackItem::Begin(BeginItem::default()),
            ItemKind::End => StackItem::End(String::new()),
            ItemKind::Equation => StackItem::Equation(EquationItem::default()),
            ItemKind::Fn => StackItem::Fn(FnItem::default()),
            ItemKind::Mml => StackItem::Mml(MathNode::inferred_row(Vec::new())),
            ItemKind::Null => StackItem::Null,
        }
    }

    /// A frame named by its kind string, e.g. `"subsup"`.
    #[must_use]
    pub fn create_named(name: &str) -> Option<StackItem> {
        name.parse::<ItemKind>().ok().map(Self::create)
    }
}

/// Frames of one parse.
#[derive(Debug)]
pub struct Stack {
    items: Vec<StackItem>,
    /// Flags shared by the frames.
    pub global: StackGlobal,
}

impl Stack {
    /// A stack holding only its `start` frame.
    #[must_use]
    pub fn new(env: Env, is_inner: bool) -> Self {
        Self {
            items: vec![StackItem::Start(Group {
                env,
                nodes: Vec::new(),
            })],
            global: StackGlobal {
                is_inner,
                ..StackGlobal::default()
            },
        }
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Show `item` to the top frame and act on the outcome.
    pub fn push(&mut self, item: StackItem, ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
        if matches!(item, StackItem::Null) {
            return Ok(());
        }
        let Some(top) = self.items.pop() else {
            self.items.push(item);
            return Ok(());
        };
        match top.check_item(item, ctx, &mut self.global)? {
            Checked::Success(top, mut item) => {
                self.items.push(top);
                if item.copy_env() {
                    let env = self.env().clone();
                    if let Some(own) = item.env_mut() {
                        *own = env;
                    }
                }
                self.items.push(item);
            }
            Checked::Fail(top) => self.items.push(top),
            Checked::Replace(items) => {
                for item in items {
                    self.push(item, ctx)?;
                }
            }
        }
        Ok(())
    }

    /// Push a finished node.
    pub fn push_node(&mut self, node: MathNode, ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
        self.push(StackItem::Mml(node), ctx)
    }

    /// Remove the top frame. The bottom frame is never removed.
    pub fn pop(&mut self) -> Option<StackItem> {
        if self.items.len() > 1 {
            self.items.pop()
        } else {
            None
        }
    }

    /// The top frame.
    #[must_use]
    pub fn top(&self) -> Option<&StackItem> {
        self.items.last()
    }

    /// The top frame, mutably.
    pub fn top_mut(&mut self) -> Option<&mut StackItem> {
        self.items.last_mut()
    }

    /// Remove and return the last node of the top frame.
    pub fn prev(&mut self) -> Option<MathNode> {
        self.top_mut()?.nodes_mut()?.pop()
    }

    /// The last node of the top frame.
    #[must_use]
    pub fn last(&self) -> Option<&MathNode> {
        self.top()?.nodes()?.last()
    }

    /// The last node of the top frame, mutably.
    pub fn last_mut(&mut self) -> Option<&mut MathNode> {
        self.top_mut()?.nodes_mut()?.last_mut()
    }

    /// Env of the nearest open frame.
    #[must_use]
    pub fn env(&self) -> &Env {
        self.items
            .iter()
            .rev()
            .find_map(StackItem::env)
            .unwrap_or(&EMPTY_ENV)
    }

    /// Env of the nearest open frame, mutably.
    pub fn env_mut(&mut self) -> Option<&mut Env> {
        self.items.iter_mut().rev().find_map(StackItem::env_mut)
    }

    /// The node left on the stack once `stop` has been pushed.
    pub fn into_result(mut self) -> Option<MathNode> {
        match self.items.pop()? {
            StackItem::Mml(node) => Some(node),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator as _;

    #[test]
    fn test_every_kind_round_trips_through_its_name() {
        for kind in ItemKind::iter() {
            let item = ItemFactory::create_named(kind.as_ref()).unwrap();
            assert_eq!(item.kind(), kind);
        }
        assert!(ItemFactory::create_named("bogus").is_none());
    }

    #[test]
    fn test_only_arrays_start_with_a_fresh_env() {
        assert!(ItemFactory::create(ItemKind::Open).copy_env());
        assert!(!ItemFactory::create(ItemKind::Array).copy_env());
        assert!(ItemFactory::create(ItemKind::Array).is_open());
        assert!(!ItemFactory::create(ItemKind::Style).is_open());
    }

    #[test]
    fn test_new_stack_env() {
        let env = Env {
            display: true,
            ..Env::default()
        };
        let mut stack = Stack::new(env, false);
        assert_eq!(stack.len(), 1);
        assert!(stack.env().display);
        assert!(stack.pop().is_none());
        assert!(stack.prev().is_none());
    }
}
