//! Frame kinds and how each one reacts to the item pushed on it.

use core::mem;

use super::{ArrayItem, Checked, Env, ItemKind, StackGlobal};
use crate::context::ParseContext;
use crate::mathml_tree::{
    MathNode, MathNodeType, SUP, TexClass, declared_class, embellished_core,
};
use crate::parser::parse_util::{fenced, fixed_fence};
use crate::symbols::NOT_REMAP;
use crate::types::{ParseError, ParseErrorKind};

/// Wrap the nodes of a frame into one node.
///
/// A single node is returned as is unless `force_row` is set; otherwise the
/// nodes go into an `mrow`, inferred when `inferred` is set.
#[must_use]
pub fn to_mml(mut nodes: Vec<MathNode>, inferred: bool, force_row: bool) -> MathNode {
    if nodes.len() == 1 && !force_row
        && let Some(node) = nodes.pop()
    {
        return node;
    }
    if inferred {
        MathNode::inferred_row(nodes)
    } else {
        MathNode::row(nodes)
    }
}

/// Contents of a brace group or of the whole expression.
#[derive(Debug, Clone, Default)]
pub struct Group {
    /// Scope settings.
    pub env: Env,
    /// Finished nodes.
    pub nodes: Vec<MathNode>,
}

/// A style or size change running to the end of the enclosing group.
#[derive(Debug, Clone, Default)]
pub struct StyleItem {
    /// Nodes under the style.
    pub nodes: Vec<MathNode>,
    /// Attributes of the resulting `mstyle`.
    pub attributes: Vec<(String, String)>,
}

/// How a position frame moves its box.
#[derive(Debug, Clone)]
pub enum Shift {
    /// `\raise` and `\lower`
    Vertical {
        /// New height, e.g. `+.5ex`
        height: String,
        /// New depth, e.g. `-.5ex`
        depth: String,
    },
    /// `\moveleft` and `\moveright`
    Horizontal {
        /// Space before the box
        left: MathNode,
        /// Space after the box
        right: MathNode,
    },
}

impl Default for Shift {
    fn default() -> Self {
        Self::Vertical {
            height: String::new(),
            depth: String::new(),
        }
    }
}

/// A box-moving command waiting for its box.
#[derive(Debug, Clone, Default)]
pub struct PositionItem {
    /// Command name, for errors.
    pub name: String,
    /// The move to apply.
    pub shift: Shift,
}

/// A script command waiting for its script.
#[derive(Debug, Clone, Default)]
pub struct SubsupItem {
    /// Script element whose slot is being filled.
    pub base: Option<MathNode>,
    /// Slot to fill.
    pub position: usize,
    /// Primes already attached to the base.
    pub primes: Option<MathNode>,
    /// Limits behavior to record on the script element.
    pub movesupsub: Option<bool>,
}

/// Primes waiting to be attached to their base.
#[derive(Debug, Clone, Default)]
pub struct PrimeItem {
    /// The primed node.
    pub base: Option<MathNode>,
    /// The prime operator.
    pub primes: Option<MathNode>,
}

/// `\dots`, resolved against the following node.
#[derive(Debug, Clone, Default)]
pub struct DotsItem {
    /// Used before ordinary material.
    pub ldots: Option<MathNode>,
    /// Used before a binary operator or relation.
    pub cdots: Option<MathNode>,
}

/// A generalized fraction in infix form: `a \over b`.
#[derive(Debug, Clone, Default)]
pub struct OverItem {
    /// Denominator nodes.
    pub nodes: Vec<MathNode>,
    /// The numerator, taken from the enclosing group.
    pub num: Option<MathNode>,
    /// Command name, for errors.
    pub name: String,
    /// Rule thickness.
    pub thickness: Option<String>,
    /// Left delimiter.
    pub open: Option<String>,
    /// Right delimiter.
    pub close: Option<String>,
    /// Size delimiters for display style.
    pub display: bool,
}

/// End of a table cell or row.
#[derive(Debug, Clone, Default)]
pub struct CellItem {
    /// Command name, for errors.
    pub name: String,
    /// Ends a cell.
    pub is_entry: bool,
    /// Ends a row.
    pub is_cr: bool,
    /// Line break outside a table.
    pub linebreak: bool,
}

/// `\left` and the material after it.
#[derive(Debug, Clone, Default)]
pub struct LeftItem {
    /// Scope settings.
    pub env: Env,
    /// Enclosed nodes.
    pub nodes: Vec<MathNode>,
    /// Opening delimiter.
    pub delim: String,
    /// Color of the delimiter.
    pub color: Option<String>,
}

/// `\middle` or `\right`.
#[derive(Debug, Clone, Default)]
pub struct FenceItem {
    /// The delimiter.
    pub delim: String,
    /// Color of the delimiter.
    pub color: Option<String>,
}

/// An open `\begin{name}`.
#[derive(Debug, Clone, Default)]
pub struct BeginItem {
    /// Scope settings.
    pub env: Env,
    /// Enclosed nodes.
    pub nodes: Vec<MathNode>,
    /// Environment name.
    pub name: String,
}

/// Body of `equation` and `equation*`.
#[derive(Debug, Clone, Default)]
pub struct EquationItem {
    /// Scope settings.
    pub env: Env,
    /// Enclosed nodes.
    pub nodes: Vec<MathNode>,
    /// Environment name.
    pub name: String,
}

/// A named function such as `\sin`, waiting to see its argument.
///
/// The name node sits in `nodes` so that a script can take it as its base;
/// the scripted result lands back in the frame.
#[derive(Debug, Clone, Default)]
pub struct FnItem {
    /// The function name node, at most one.
    pub nodes: Vec<MathNode>,
}

/// A stack frame.
#[derive(Debug, Clone)]
pub enum StackItem {
    /// Bottom of the stack
    Start(Group),
    /// End of input
    Stop,
    /// `{`
    Open(Group),
    /// `}`
    Close,
    /// Style scope
    Style(StyleItem),
    /// Box move
    Position(PositionItem),
    /// Pending script
    Subsup(SubsupItem),
    /// Pending primes
    Prime(PrimeItem),
    /// `\not`
    Not,
    /// `\dots`
    Dots(DotsItem),
    /// Infix fraction
    Over(OverItem),
    /// Table
    Array(Box<ArrayItem>),
    /// Cell or row end
    Cell(CellItem),
    /// `\left`
    Left(LeftItem),
    /// `\middle`
    Middle(FenceItem),
    /// `\right`
    Right(FenceItem),
    /// `\begin{name}`
    Begin(BeginItem),
    /// `\end{name}`
    End(String),
    /// `equation`
    Equation(EquationItem),
    /// Named function
    Fn(FnItem),
    /// Finished node
    Mml(MathNode),
    /// Nothing
    Null,
}

impl StackItem {
    /// Kind of this frame.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Start(_) => ItemKind::Start,
            Self::Stop => ItemKind::Stop,
            Self::Open(_) => ItemKind::Open,
            Self::Close => ItemKind::Close,
            Self::Style(_) => ItemKind::Style,
            Self::Position(_) => ItemKind::Position,
            Self::Subsup(_) => ItemKind::Subsup,
            Self::Prime(_) => ItemKind::Prime,
            Self::Not => ItemKind::Not,
            Self::Dots(_) => ItemKind::Dots,
            Self::Over(_) => ItemKind::Over,
            Self::Array(array) => array.item_kind(),
            Self::Cell(_) => ItemKind::Cell,
            Self::Left(_) => ItemKind::Left,
            Self::Middle(_) => ItemKind::Middle,
            Self::Right(_) => ItemKind::Right,
            Self::Begin(_) => ItemKind::Begin,
            Self::End(_) => ItemKind::End,
            Self::Equation(_) => ItemKind::Equation,
            Self::Fn(_) => ItemKind::Fn,
            Self::Mml(_) => ItemKind::Mml,
            Self::Null => ItemKind::Null,
        }
    }

    /// Frames that start a scope.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(
            self,
            Self::Start(_)
                | Self::Open(_)
                | Self::Left(_)
                | Self::Begin(_)
                | Self::Array(_)
                | Self::Equation(_)
        )
    }

    /// Frames that end a scope.
    #[must_use]
    pub const fn is_close(&self) -> bool {
        matches!(
            self,
            Self::Stop
                | Self::Close
                | Self::Right(_)
                | Self::Middle(_)
                | Self::End(_)
                | Self::Cell(_)
                | Self::Over(_)
        )
    }

    /// Whether a new frame inherits the env below it. Tables start fresh.
    #[must_use]
    pub const fn copy_env(&self) -> bool {
        !matches!(self, Self::Array(_))
    }

    /// Env owned by this frame.
    #[must_use]
    pub fn env(&self) -> Option<&Env> {
        match self {
            Self::Start(group) | Self::Open(group) => Some(&group.env),
            Self::Left(left) => Some(&left.env),
            Self::Begin(begin) => Some(&begin.env),
            Self::Equation(equation) => Some(&equation.env),
            Self::Array(array) => Some(&array.env),
            _ => None,
        }
    }

    /// Env owned by this frame, mutably.
    pub fn env_mut(&mut self) -> Option<&mut Env> {
        match self {
            Self::Start(group) | Self::Open(group) => Some(&mut group.env),
            Self::Left(left) => Some(&mut left.env),
            Self::Begin(begin) => Some(&mut begin.env),
            Self::Equation(equation) => Some(&mut equation.env),
            Self::Array(array) => Some(&mut array.env),
            _ => None,
        }
    }

    /// Nodes collected by this frame.
    #[must_use]
    pub fn nodes(&self) -> Option<&Vec<MathNode>> {
        match self {
            Self::Start(group) | Self::Open(group) => Some(&group.nodes),
            Self::Style(style) => Some(&style.nodes),
            Self::Over(over) => Some(&over.nodes),
            Self::Array(array) => Some(&array.nodes),
            Self::Left(left) => Some(&left.nodes),
            Self::Begin(begin) => Some(&begin.nodes),
            Self::Equation(equation) => Some(&equation.nodes),
            Self::Fn(function) => Some(&function.nodes),
            _ => None,
        }
    }

    /// Nodes collected by this frame, mutably.
    pub fn nodes_mut(&mut self) -> Option<&mut Vec<MathNode>> {
        match self {
            Self::Start(group) | Self::Open(group) => Some(&mut group.nodes),
            Self::Style(style) => Some(&mut style.nodes),
            Self::Over(over) => Some(&mut over.nodes),
            Self::Array(array) => Some(&mut array.nodes),
            Self::Left(left) => Some(&mut left.nodes),
            Self::Begin(begin) => Some(&mut begin.nodes),
            Self::Equation(equation) => Some(&mut equation.nodes),
            Self::Fn(function) => Some(&mut function.nodes),
            _ => None,
        }
    }

    /// Name used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Position(position) => &position.name,
            Self::Over(over) => &over.name,
            Self::Cell(cell) => &cell.name,
            Self::Begin(begin) => &begin.name,
            Self::Equation(equation) => &equation.name,
            Self::End(name) => name,
            Self::Array(array) => &array.name,
            _ => "",
        }
    }

    fn close_error(&self, item: &Self) -> Option<ParseErrorKind> {
        match (self, item) {
            (Self::Open(_), Self::Stop) => Some(ParseErrorKind::ExtraOpenMissingClose),
            (Self::Left(_), Self::Stop) => Some(ParseErrorKind::ExtraLeftMissingRight),
            (Self::Subsup(_), Self::Stop) => Some(ParseErrorKind::MissingScript),
            (_, Self::End(name)) => Some(ParseErrorKind::MissingBeginExtraEnd { name: name.clone() }),
            (_, Self::Close) => Some(ParseErrorKind::ExtraCloseMissingOpen),
            (_, Self::Right(_)) => Some(ParseErrorKind::MissingLeftExtraRight),
            (_, Self::Middle(_)) => Some(ParseErrorKind::ExtraMiddle),
            _ => None,
        }
    }

    /// Behavior shared by all frames.
    pub(super) fn check_base(mut self, mut item: Self) -> Result<Checked, ParseError> {
        if self.is_open() {
            if let Self::Over(over) = &mut item
                && let Some(nodes) = self.nodes_mut()
            {
                over.num = Some(to_mml(mem::take(nodes), false, false));
            }
            if let Self::Cell(cell) = &item {
                if cell.linebreak {
                    return Ok(Checked::Fail(self));
                }
                return Err(ParseErrorKind::Misplaced {
                    name: cell.name.clone(),
                }
                .into());
            }
        }
        if item.is_close()
            && let Some(kind) = self.close_error(&item)
        {
            return Err(kind.into());
        }
        match item {
            Self::Mml(node) => match self.nodes_mut() {
                Some(nodes) => {
                    nodes.push(node);
                    Ok(Checked::Fail(self))
                }
                None => Ok(Checked::Success(self, Self::Mml(node))),
            },
            item => Ok(Checked::Success(self, item)),
        }
    }

    /// Combine `item` with this frame.
    pub fn check_item(
        self,
        item: Self,
        ctx: &mut ParseContext<'_>,
        global: &mut StackGlobal,
    ) -> Result<Checked, ParseError> {
        match self {
            Self::Start(group) => check_start(group, item, ctx, global),
            Self::Open(group) => match item {
                Self::Close => {
                    let node = MathNode::container(
                        MathNodeType::TeXAtom,
                        vec![to_mml(group.nodes, true, false)],
                    );
                    Ok(Checked::Replace(vec![Self::Mml(node)]))
                }
                item => Self::Open(group).check_base(item),
            },
            Self::Style(style) => {
                if item.is_close() {
                    let mut node = MathNode::container(MathNodeType::Mstyle, style.nodes);
                    for (key, value) in style.attributes {
                        node.set_attribute(key, value);
                    }
                    return Ok(Checked::Replace(vec![Self::Mml(node), item]));
                }
                Self::Style(style).check_base(item)
            }
            Self::Position(position) => check_position(position, item),
            Self::Subsup(subsup) => check_subsup(subsup, item),
            Self::Prime(prime) => Ok(check_prime(prime, item)),
            Self::Not => Ok(check_not(item)),
            Self::Dots(dots) => Ok(check_dots(dots, item)),
            Self::Over(over) => check_over(over, item),
            Self::Array(array) => array.check_item(item, ctx, global),
            Self::Left(left) => check_left(left, item),
            Self::Begin(begin) => check_begin(begin, item),
            Self::Equation(equation) => check_equation(equation, item, ctx, global),
            Self::Fn(function) => check_fn(function, item),
            top => top.check_base(item),
        }
    }
}

fn check_start(
    group: Group,
    item: StackItem,
    ctx: &mut ParseContext<'_>,
    global: &StackGlobal,
) -> Result<Checked, ParseError> {
    if !matches!(item, StackItem::Stop) {
        return StackItem::Start(group).check_base(item);
    }
    let mut node = to_mml(group.nodes, true, false);
    if !global.is_inner {
        node = ctx.tags.finalize(node, group.env.display);
    }
    Ok(Checked::Replace(vec![StackItem::Mml(node)]))
}

fn check_position(position: PositionItem, item: StackItem) -> Result<Checked, ParseError> {
    if item.is_close() {
        return Err(ParseErrorKind::MissingBoxFor {
            name: position.name,
        }
        .into());
    }
    let StackItem::Mml(node) = item else {
        return StackItem::Position(position).check_base(item);
    };
    Ok(Checked::Replace(match position.shift {
        Shift::Vertical { height, depth } => {
            let padded = MathNode::container(MathNodeType::Mpadded, vec![node])
                .with_attr("height", height.clone())
                .with_attr("depth", depth)
                .with_attr("voffset", height);
            vec![StackItem::Mml(padded)]
        }
        Shift::Horizontal { left, right } => vec![
            StackItem::Mml(left),
            StackItem::Mml(node),
            StackItem::Mml(right),
        ],
    }))
}

fn check_subsup(mut subsup: SubsupItem, item: StackItem) -> Result<Checked, ParseError> {
    match item {
        StackItem::Open(_) | StackItem::Left(_) => Ok(Checked::Success(StackItem::Subsup(subsup), item)),
        StackItem::Mml(mut script) => {
            let mut base = subsup.base.take().unwrap_or_else(|| MathNode::token(MathNodeType::Mi, ""));
            if let Some(mut primes) = subsup.primes.take() {
                if subsup.position == SUP {
                    primes.properties.variant_form = true;
                    script = MathNode::row(vec![primes, script]);
                } else {
                    base.set_child(SUP, Some(primes));
                }
            }
            base.set_child(subsup.position, Some(script));
            if subsup.movesupsub.is_some() {
                base.properties.movesupsub = subsup.movesupsub;
            }
            Ok(Checked::Replace(vec![StackItem::Mml(base)]))
        }
        item => {
            let position = subsup.position;
            match StackItem::Subsup(subsup).check_base(item)? {
                Checked::Success(..) if position == SUP => {
                    Err(ParseErrorKind::MissingOpenForSup.into())
                }
                Checked::Success(..) => Err(ParseErrorKind::MissingOpenForSub.into()),
                checked => Ok(checked),
            }
        }
    }
}

fn check_prime(prime: PrimeItem, item: StackItem) -> Checked {
    let base = prime.base.unwrap_or_else(|| MathNode::token(MathNodeType::Mi, ""));
    let Some(primes) = prime.primes else {
        return Checked::Replace(vec![StackItem::Mml(base), item]);
    };
    if base.is(MathNodeType::Msubsup) {
        let mut base = base;
        base.set_child(SUP, Some(primes));
        return Checked::Replace(vec![StackItem::Mml(base), item]);
    }
    let node = MathNode::container(MathNodeType::Msup, vec![base, primes]);
    Checked::Replace(vec![StackItem::Mml(node), item])
}

fn check_not(item: StackItem) -> Checked {
    match item {
        StackItem::Open(_) | StackItem::Left(_) => Checked::Success(StackItem::Not, item),
        StackItem::Mml(mut node)
            if matches!(
                node.node_type,
                MathNodeType::Mo | MathNodeType::Mi | MathNodeType::Mtext
            ) && node.text.chars().count() == 1
                && node.properties.movesupsub != Some(true) =>
        {
            match NOT_REMAP.get(node.text.as_str()) {
                Some(negated) => node.text = (*negated).to_owned(),
                None => node.text.push('\u{338}'),
            }
            Checked::Replace(vec![StackItem::Mml(node)])
        }
        item => {
            let slash = MathNode::text("\u{29f8}");
            let padded = MathNode::container(MathNodeType::Mpadded, vec![slash]).with_attr("width", "0");
            let atom = MathNode::atom(TexClass::Rel, vec![padded]);
            Checked::Replace(vec![StackItem::Mml(atom), item])
        }
    }
}

fn check_dots(dots: DotsItem, item: StackItem) -> Checked {
    if matches!(item, StackItem::Open(_) | StackItem::Left(_)) {
        return Checked::Success(StackItem::Dots(dots), item);
    }
    let centered = match &item {
        StackItem::Mml(node) => embellished_core(node)
            .and_then(declared_class)
            .is_some_and(|class| matches!(class, TexClass::Bin | TexClass::Rel)),
        _ => false,
    };
    let chosen = if centered { dots.cdots } else { dots.ldots };
    match chosen {
        Some(node) => Checked::Replace(vec![StackItem::Mml(node), item]),
        None => Checked::Replace(vec![item]),
    }
}

fn check_over(over: OverItem, item: StackItem) -> Result<Checked, ParseError> {
    if let StackItem::Over(other) = &item {
        return Err(ParseErrorKind::AmbiguousUseOf {
            name: other.name.clone(),
        }
        .into());
    }
    if !item.is_close() {
        return StackItem::Over(over).check_base(item);
    }
    let num = over.num.unwrap_or_else(|| MathNode::row(Vec::new()));
    let mut frac = MathNode::container(MathNodeType::Mfrac, vec![num, to_mml(over.nodes, false, false)]);
    if let Some(thickness) = over.thickness {
        frac.set_attribute("linethickness", thickness);
    }
    if over.open.is_some() || over.close.is_some() {
        frac = fixed_fence(
            over.open.as_deref().unwrap_or_default(),
            frac,
            over.close.as_deref().unwrap_or_default(),
            over.display,
        );
    }
    Ok(Checked::Replace(vec![StackItem::Mml(frac), item]))
}

fn check_left(mut left: LeftItem, item: StackItem) -> Result<Checked, ParseError> {
    Ok(match item {
        StackItem::Right(right) => {
            let body = to_mml(left.nodes, true, false);
            let node = fenced(&left.delim, body, &right.delim, right.color.as_deref());
            Checked::Replace(vec![StackItem::Mml(node)])
        }
        StackItem::Middle(middle) => {
            let mut mo = MathNode::token(MathNodeType::Mo, middle.delim).with_attr("stretchy", "true");
            if let Some(color) = middle.color {
                mo.set_attribute("mathcolor", color);
            }
            left.nodes.extend([
                MathNode::atom(TexClass::Close, Vec::new()),
                mo,
                MathNode::atom(TexClass::Open, Vec::new()),
            ]);
            left.env = Env::default();
            Checked::Replace(vec![StackItem::Left(left)])
        }
        item => return StackItem::Left(left).check_base(item),
    })
}

fn check_begin(begin: BeginItem, item: StackItem) -> Result<Checked, ParseError> {
    match item {
        StackItem::End(name) if name != begin.name => Err(ParseErrorKind::EnvBadEnd {
            begin: begin.name,
            end: name,
        }
        .into()),
        StackItem::End(_) => Ok(Checked::Replace(vec![StackItem::Mml(to_mml(
            begin.nodes,
            true,
            false,
        ))])),
        StackItem::Stop => Err(ParseErrorKind::EnvMissingEnd { name: begin.name }.into()),
        item => StackItem::Begin(begin).check_base(item),
    }
}

fn check_equation(
    equation: EquationItem,
    item: StackItem,
    ctx: &mut ParseContext<'_>,
    global: &mut StackGlobal,
) -> Result<Checked, ParseError> {
    match item {
        StackItem::End(_) => {
            let node = to_mml(equation.nodes, true, false);
            let tag = ctx.tags.get_tag(false);
            ctx.tags.end();
            global.eqn_env = false;
            let node = match tag {
                Some(tag) => ctx.tags.en_tag(node, tag),
                None => node,
            };
            Ok(Checked::Replace(vec![StackItem::Mml(node), item]))
        }
        StackItem::Stop => Err(ParseErrorKind::EnvMissingEnd {
            name: equation.name,
        }
        .into()),
        item => StackItem::Equation(equation).check_base(item),
    }
}

fn check_fn(mut function: FnItem, item: StackItem) -> Result<Checked, ParseError> {
    let Some(name) = function.nodes.pop() else {
        return StackItem::Fn(function).check_base(item);
    };
    if item.is_open() {
        return Ok(Checked::Success(StackItem::Fn(FnItem { nodes: vec![name] }), item));
    }
    if let StackItem::Mml(node) = &item {
        let spacing = node.is(MathNodeType::Mspace)
            || (node.is(MathNodeType::Mstyle)
                && node.child(0).is_some_and(|first| first.is(MathNodeType::Mspace)));
        let operator = embellished_core(node)
            .and_then(declared_class)
            .is_some_and(|class| {
                matches!(
                    class,
                    TexClass::Bin | TexClass::Rel | TexClass::Close | TexClass::Punct
                )
            });
        if spacing || operator {
            return Ok(Checked::Replace(vec![StackItem::Mml(name), item]));
        }
    } else if !matches!(item, StackItem::Fn(_)) {
        return Ok(Checked::Replace(vec![StackItem::Mml(name), item]));
    }
    let apply = MathNode::token(MathNodeType::Mo, "\u{2061}").with_class(TexClass::None);
    Ok(Checked::Replace(vec![StackItem::Mml(name), StackItem::Mml(apply), item]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mi(text: &str) -> MathNode {
        MathNode::token(MathNodeType::Mi, text)
    }

    #[test]
    fn test_to_mml() {
        assert!(to_mml(vec![mi("x")], true, false).is(MathNodeType::Mi));
        let forced = to_mml(vec![mi("x")], false, true);
        assert!(forced.is(MathNodeType::Mrow) && !forced.is_inferred());
        assert!(to_mml(vec![mi("x"), mi("y")], true, false).is_inferred());
        assert_eq!(to_mml(Vec::new(), false, false).children.len(), 0);
    }

    #[test]
    fn test_not_negates_single_relation() {
        let mo = MathNode::token(MathNodeType::Mo, "=");
        let Checked::Replace(items) = check_not(StackItem::Mml(mo)) else {
            panic!("expected replace");
        };
        let [StackItem::Mml(node)] = items.as_slice() else {
            panic!("expected one node");
        };
        assert_ne!(node.text, "=");
        assert!(node.text.starts_with('=') || node.text == "\u{2260}");
    }

    #[test]
    fn test_not_before_group_waits() {
        let checked = check_not(StackItem::Open(Group::default()));
        assert!(matches!(checked, Checked::Success(StackItem::Not, StackItem::Open(_))));
    }

    #[test]
    fn test_prime_builds_msup() {
        let prime = PrimeItem {
            base: Some(mi("x")),
            primes: Some(MathNode::token(MathNodeType::Mo, "\u{2032}")),
        };
        let Checked::Replace(items) = check_prime(prime, StackItem::Stop) else {
            panic!("expected replace");
        };
        assert!(matches!(&items[0], StackItem::Mml(node) if node.is(MathNodeType::Msup)));
        assert!(matches!(items[1], StackItem::Stop));
    }

    #[test]
    fn test_fn_inserts_apply_function() {
        let item = FnItem {
            nodes: vec![mi("sin")],
        };
        let Ok(Checked::Replace(items)) = check_fn(item, StackItem::Mml(mi("x"))) else {
            panic!("expected replace");
        };
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[1], StackItem::Mml(node) if node.text == "\u{2061}"));
    }

    #[test]
    fn test_fn_before_relation_has_no_apply_function() {
        let item = FnItem {
            nodes: vec![mi("sin")],
        };
        let eq = MathNode::token(MathNodeType::Mo, "=");
        let Ok(Checked::Replace(items)) = check_fn(item, StackItem::Mml(eq)) else {
            panic!("expected replace");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_position_rejects_close() {
        let position = PositionItem {
            name: r"\raise".to_owned(),
            shift: Shift::default(),
        };
        let err = check_position(position, StackItem::Close).unwrap_err();
        assert_eq!(err.id(), "MissingBoxFor");
    }

    #[test]
    fn test_begin_checks_names() {
        let begin = BeginItem {
            name: "matrix".to_owned(),
            ..BeginItem::default()
        };
        let err = check_begin(begin, StackItem::End("array".to_owned())).unwrap_err();
        assert_eq!(err.id(), "EnvBadEnd");
    }
}
