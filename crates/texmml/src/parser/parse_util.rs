//! Node builders and text helpers shared by the command handlers.

use super::Parser;
use crate::mathml_tree::{MathNode, MathNodeType, TexClass, declared_class, is_embellished};
use crate::stack::Env;
use crate::types::{MathVariant, ParseError, ParseErrorKind, TexStyle};
use crate::units::make_em;

fn fence(text: &str, class: TexClass) -> MathNode {
    MathNode::token(MathNodeType::Mo, text)
        .with_attr("fence", "true")
        .with_attr("stretchy", "true")
        .with_attr("symmetric", "true")
        .with_class(class)
}

/// `body` between stretchy delimiters, as produced by `\left ... \right`.
#[must_use]
pub fn fenced(open: &str, body: MathNode, close: &str, color: Option<&str>) -> MathNode {
    let mut row = MathNode::row(vec![fence(open, TexClass::Open)]).with_class(TexClass::Inner);
    row.properties.open = Some(open.to_owned());
    row.properties.close = Some(close.to_owned());
    if body.is(MathNodeType::Mrow) && body.is_inferred() {
        row.children.extend(body.children);
    } else {
        row.push_child(body);
    }
    let mut close_mo = fence(close, TexClass::Close);
    if let Some(color) = color {
        close_mo.set_attribute("mathcolor", color);
    }
    row.push_child(close_mo);
    row
}

/// A delimiter of fixed size, as produced by `\bigl(`.
#[must_use]
pub fn sized_delimiter(text: &str, class: TexClass, size: &str) -> MathNode {
    let mo = MathNode::token(MathNodeType::Mo, text)
        .with_attr("minsize", size)
        .with_attr("maxsize", size)
        .with_attr("fence", "true")
        .with_attr("stretchy", "true")
        .with_attr("symmetric", "true");
    MathNode::atom(class, vec![mo])
}

/// `body` between delimiters of the fixed size of `\big` (or `\bigg` in
/// display style), as used by `\binom` and `\choose`.
#[must_use]
pub fn fixed_fence(open: &str, body: MathNode, close: &str, display: bool) -> MathNode {
    let size = if display { "2.047em" } else { "1.2em" };
    let mut row = MathNode::row(Vec::new()).with_class(TexClass::Ord);
    row.properties.open = Some(open.to_owned());
    row.properties.close = Some(close.to_owned());
    if !open.is_empty() {
        row.push_child(sized_delimiter(open, TexClass::Open, size));
    }
    if body.is(MathNodeType::Mrow) {
        row.children.extend(body.children);
    } else {
        row.push_child(body);
    }
    if !close.is_empty() {
        row.push_child(sized_delimiter(close, TexClass::Close, size));
    }
    row
}

/// Put an empty `mi` in front of a cell that starts with an operator, so
/// the operator gets binary spacing on its left.
pub fn fix_initial_mo(nodes: &mut Vec<MathNode>) {
    let first = nodes.iter().find(|node| {
        !node.is(MathNodeType::Mspace)
            && !(node.is(MathNodeType::TeXAtom)
                && node.child(0).is_none_or(|child| child.children.is_empty() && child.text.is_empty()))
    });
    let Some(first) = first else {
        return;
    };
    let relation_atom =
        first.is(MathNodeType::TeXAtom) && declared_class(first) == Some(TexClass::Rel);
    if is_embellished(first) || relation_atom {
        nodes.insert(0, MathNode::token(MathNodeType::Mi, ""));
    }
}

/// Space-separated em list, e.g. `0em 2em`.
#[must_use]
pub fn cols(widths: &[f64]) -> String {
    widths.iter().map(|w| make_em(*w)).collect::<Vec<_>>().join(" ")
}

/// Read the first `n` as a non-negative integer.
pub fn parse_integer(text: &str, name: &str) -> Result<usize, ParseError> {
    text.trim().parse::<usize>().map_err(|_| {
        ParseErrorKind::IntegerArg {
            name: name.to_owned(),
        }
        .into()
    })
}

fn internal_text(text: &str, font: Option<MathVariant>) -> MathNode {
    let leading = text.len() - text.trim_start().len();
    let trailing = text.len() - text.trim_end().len();
    let mut content = String::with_capacity(text.len() + 4);
    if leading > 0 {
        content.push('\u{a0}');
    }
    content.push_str(text.trim());
    if trailing > 0 && !text.trim().is_empty() {
        content.push('\u{a0}');
    }
    let mut node = MathNode::text(content);
    if let Some(font) = font {
        node.set_attribute("mathvariant", font.as_ref());
    }
    node
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum MathMode {
    Text,
    Dollar,
    Paren,
    Reference,
}

/// Turn the text of `\text` and friends into nodes.
///
/// Math inside `$...$`, `\(...\)` and `\ref{...}`/`\eqref{...}` is parsed
/// and embedded as atoms; `\$`, `\{`, `\}` and `\\` stand for the bare
/// character. With `level` the result is wrapped in a non-display `mstyle`
/// at that script level.
pub fn internal_math(
    parser: &mut Parser<'_, '_>,
    text: &str,
    level: Option<u8>,
    font: Option<MathVariant>,
) -> Result<Vec<MathNode>, ParseError> {
    let font = font.or(parser.stack.env().font);
    let mut nodes = Vec::new();
    let mut pending = String::new();
    let mut math = String::new();
    let mut mode = MathMode::Text;
    let mut braces = 0_usize;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match (mode, ch) {
            (MathMode::Text, '$') => {
                if !pending.is_empty() {
                    nodes.push(internal_text(&pending, font));
                    pending.clear();
                }
                mode = MathMode::Dollar;
            }
            (MathMode::Dollar, '$') if braces == 0 => {
                nodes.push(embedded_math(parser, &math)?);
                math.clear();
                mode = MathMode::Text;
            }
            (MathMode::Text, '\\') => {
                let rest: String = chars.clone().collect();
                let reference = ["ref", "eqref"]
                    .iter()
                    .any(|cmd| rest.strip_prefix(*cmd).is_some_and(|r| r.trim_start().starts_with('{')));
                if reference {
                    if !pending.is_empty() {
                        nodes.push(internal_text(&pending, font));
                        pending.clear();
                    }
                    math.push('\\');
                    mode = MathMode::Reference;
                    continue;
                }
                match chars.next() {
                    Some('(') => {
                        if !pending.is_empty() {
                            nodes.push(internal_text(&pending, font));
                            pending.clear();
                        }
                        mode = MathMode::Paren;
                    }
                    Some(escaped @ ('$' | '{' | '}' | '\\')) => pending.push(escaped),
                    Some(other) => {
                        pending.push('\\');
                        pending.push(other);
                    }
                    None => pending.push('\\'),
                }
            }
            (MathMode::Paren, '\\') if braces == 0 && chars.peek() == Some(&')') => {
                chars.next();
                nodes.push(embedded_math(parser, &math)?);
                math.clear();
                mode = MathMode::Text;
            }
            (MathMode::Reference, '}') if braces == 0 => {
                math.push('}');
                let mut atom = embedded_math(parser, &math)?;
                if let Some(font) = font {
                    atom.set_attribute("mathvariant", font.as_ref());
                }
                nodes.push(atom);
                math.clear();
                mode = MathMode::Text;
            }
            (MathMode::Text, ch) => pending.push(ch),
            (_, ch) => {
                match ch {
                    '{' => braces += 1,
                    '}' => braces = braces.saturating_sub(1),
                    '\\' => {
                        math.push('\\');
                        if let Some(next) = chars.next() {
                            math.push(next);
                        }
                        continue;
                    }
                    _ => {}
                }
                math.push(ch);
            }
        }
    }
    if mode != MathMode::Text {
        return Err(ParseErrorKind::MathNotTerminated.into());
    }
    if !pending.is_empty() {
        nodes.push(internal_text(&pending, font));
    }
    Ok(match level {
        Some(level) => vec![
            MathNode::container(MathNodeType::Mstyle, nodes)
                .with_attr("displaystyle", "false")
                .with_attr("scriptlevel", level.to_string()),
        ],
        None if nodes.len() > 1 => vec![MathNode::row(nodes)],
        None => nodes,
    })
}

fn embedded_math(parser: &mut Parser<'_, '_>, text: &str) -> Result<MathNode, ParseError> {
    let (node, _) = parser.sub_parse_with_globals(text, Env::default())?;
    Ok(MathNode::container(MathNodeType::TeXAtom, vec![node]))
}

/// The underlying `mo` of a large operator may no longer move its limits.
pub fn check_movable_limits(base: &mut MathNode) {
    if base.is(MathNodeType::Mo) && base.properties.movesupsub == Some(true) {
        base.set_attribute("movablelimits", "false");
    }
}

/// Whether material in `env` is set in display style.
#[must_use]
pub fn is_display(env: &Env) -> bool {
    env.style.map_or(env.display, TexStyle::is_display)
}

/// Remove surrounding whitespace, keeping a trailing escaped space.
#[must_use]
pub fn trim_spaces(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.ends_with('\\') && text.trim_start().len() > trimmed.len() {
        format!("{trimmed} ")
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mi(text: &str) -> MathNode {
        MathNode::token(MathNodeType::Mi, text)
    }

    #[test]
    fn test_fenced_splices_inferred_rows() {
        let body = MathNode::inferred_row(vec![mi("a"), mi("b")]);
        let row = fenced("(", body, ")", Some("red"));
        assert_eq!(row.children.len(), 4);
        assert_eq!(row.properties.tex_class, Some(TexClass::Inner));
        let close = row.child(3).unwrap();
        assert_eq!(close.attribute("mathcolor"), Some("red"));
        assert_eq!(close.properties.tex_class, Some(TexClass::Close));
    }

    #[test]
    fn test_fixed_fence_without_delimiters() {
        let row = fixed_fence("", mi("x"), "", false);
        assert_eq!(row.children.len(), 1);
        let row = fixed_fence("(", mi("x"), ")", true);
        assert_eq!(row.child(0).and_then(|c| c.child(0)).and_then(|c| c.attribute("minsize")), Some("2.047em"));
    }

    #[test]
    fn test_fix_initial_mo() {
        let mut nodes = vec![MathNode::token(MathNodeType::Mo, "="), mi("x")];
        fix_initial_mo(&mut nodes);
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].is(MathNodeType::Mi) && nodes[0].text.is_empty());

        let mut nodes = vec![mi("x"), MathNode::token(MathNodeType::Mo, "=")];
        fix_initial_mo(&mut nodes);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_cols() {
        assert_eq!(cols(&[0.0, 2.0]), "0em 2em");
        assert_eq!(cols(&[]), "");
    }

    #[test]
    fn test_trim_spaces() {
        assert_eq!(trim_spaces("  t "), "t");
        assert_eq!(trim_spaces(r" a\ "), r"a\ ");
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer(" 3 ", r"\x").unwrap(), 3);
        assert_eq!(parse_integer("a", r"\x").unwrap_err().id(), "IntegerArg");
    }
}
