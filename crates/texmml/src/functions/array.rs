//! Table punctuation and the plain TeX table macros.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::{CommandHandler, FunctionDefSpec};
use crate::mathml_tree::{MathNode, MathNodeType};
use crate::parser::Parser;
use crate::parser::parse_util::{internal_math, trim_spaces};
use crate::stack::{ArrayItem, ArrayKind, CellItem, StackItem};
use crate::types::{Package, ParseError, ParseErrorKind};
use crate::units::match_dimen;

/// Handle `&`.
///
/// In a `cases` table the text after the first `&` of a row runs up to the
/// end of the row and is set as text.
pub fn entry(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    parser.push(StackItem::Cell(CellItem {
        name: name.to_owned(),
        is_entry: true,
        ..CellItem::default()
    }))?;
    let env = match parser.stack.top() {
        Some(StackItem::Array(array)) if array.is_cases => {
            (!array.name.starts_with('\\')).then(|| array.name.clone())
        }
        _ => return Ok(()),
    };
    let rest = parser.scanner.remaining();
    let len = cases_text_len(rest, env.as_deref())?;
    let text = rest[..len].to_owned();
    if is_bare_text(&text) {
        return Ok(());
    }
    let nodes = internal_math(parser, &trim_spaces(&text), Some(0), None)?;
    parser.push_all(nodes)?;
    parser.scanner.advance(len);
    Ok(())
}

/// Length of the cell text that ends a `cases` row.
fn cases_text_len(text: &str, env: Option<&str>) -> Result<usize, ParseError> {
    let bytes = text.as_bytes();
    let mut braces = 0_usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => braces += 1,
            b'}' if braces == 0 => break,
            b'}' => braces -= 1,
            b'&' if braces == 0 => return Err(ParseErrorKind::ExtraAlignTab.into()),
            b'\\' => {
                let rest = &text[i..];
                if rest.starts_with(r"\\") || is_cr(rest) || env.is_some_and(|env| ends_env(rest, env)) {
                    break;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    Ok(i.min(bytes.len()))
}

fn is_cr(text: &str) -> bool {
    text.strip_prefix(r"\cr")
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_alphabetic()))
}

fn ends_env(text: &str, env: &str) -> bool {
    text.strip_prefix(r"\end")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('{'))
        .and_then(|rest| rest.strip_prefix(env))
        .is_some_and(|rest| rest.starts_with('}'))
}

/// Byte offset of the brace closing the group that opens `text`.
fn group_end(text: &str) -> Option<usize> {
    let mut depth = 0_usize;
    let mut escaped = false;
    for (i, ch) in text.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// The cell is a single `\text{...}`, which the parser handles itself.
fn is_bare_text(text: &str) -> bool {
    let Some(rest) = text.trim().strip_prefix(r"\text") else {
        return false;
    };
    if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return false;
    }
    let rest = rest.trim_start();
    rest.starts_with('{') && group_end(rest) == Some(rest.len() - 1)
}

fn push_row_end(parser: &mut Parser<'_, '_>, name: &str, linebreak: bool) -> Result<(), ParseError> {
    parser.push(StackItem::Cell(CellItem {
        name: name.to_owned(),
        is_cr: true,
        linebreak,
        ..CellItem::default()
    }))
}

fn cr(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    push_row_end(parser, name, false)
}

fn cr_latex(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let brackets = name == r"\\";
    if brackets && parser.scanner.peek() == Some('*') {
        parser.scanner.advance(1);
    }
    let mut spacing = None;
    if brackets && parser.scanner.peek() == Some('[') {
        let dim = parser.get_brackets()?.unwrap_or_default();
        if !dim.trim().is_empty() {
            let dimen = match_dimen(&dim, false).ok_or_else(|| ParseErrorKind::BracketMustBeDimension {
                name: name.to_owned(),
            })?;
            spacing = Some(dimen.text());
        }
    }
    push_row_end(parser, name, true)?;
    if let Some(StackItem::Array(array)) = parser.stack.top_mut() {
        if let Some(spacing) = spacing {
            array.add_row_spacing(&spacing);
        }
        return Ok(());
    }
    if let Some(spacing) = spacing {
        parser.push_node(MathNode::token(MathNodeType::Mspace, "").with_attr("depth", spacing))?;
    }
    parser.push_node(MathNode::token(MathNodeType::Mspace, "").with_attr("linebreak", "newline"))
}

fn hline(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let style = if name == r"\hdashline" { "dashed" } else { "solid" };
    let Some(StackItem::Array(array)) = parser.stack.top_mut() else {
        return Err(misplaced(name));
    };
    if !array.nodes.is_empty() {
        return Err(misplaced(name));
    }
    let rows = array.table.len();
    if rows == 0 {
        array.frame.push(("top", style));
        return Ok(());
    }
    let mut lines: Vec<String> = array
        .arraydef
        .get("rowlines")
        .map(|lines| lines.split(' ').map(str::to_owned).collect())
        .unwrap_or_default();
    lines.resize(rows.max(lines.len()), "none".to_owned());
    lines[rows - 1] = style.to_owned();
    array.set("rowlines", lines.join(" "));
    Ok(())
}

fn hfill(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    match parser.stack.top_mut() {
        Some(StackItem::Array(array)) => {
            array.hfill.push(array.nodes.len());
            Ok(())
        }
        _ => Err(ParseErrorKind::UnsupportedHFill {
            name: name.to_owned(),
        }
        .into()),
    }
}

fn misplaced(name: &str) -> ParseError {
    ParseErrorKind::Misplaced {
        name: name.to_owned(),
    }
    .into()
}

fn shove(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let align = if name == r"\shoveleft" { "left" } else { "right" };
    match parser.stack.top_mut() {
        Some(StackItem::Array(array)) if array.kind == ArrayKind::Multline => {
            if !array.nodes.is_empty() {
                return Err(misplaced(name));
            }
            array.shove = Some(align);
            Ok(())
        }
        Some(StackItem::Array(array)) if !array.name.is_empty() => {
            Err(ParseErrorKind::CommandNotAllowedInEnv {
                name: name.to_owned(),
                env: array.name.clone(),
            }
            .into())
        }
        _ => Err(misplaced(name)),
    }
}

/// A plain TeX table whose body is the following brace group.
#[derive(Debug, Clone, Copy, Default)]
struct Matrix {
    open: Option<&'static str>,
    close: Option<&'static str>,
    align: Option<&'static str>,
    spacing: Option<&'static str>,
    vspacing: Option<&'static str>,
    display: bool,
    cases: bool,
    numbered: Option<&'static str>,
}

impl CommandHandler for Matrix {
    fn apply(&self, parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
        match parser.get_next() {
            None => {
                return Err(ParseErrorKind::MissingArgFor {
                    name: name.to_owned(),
                }
                .into());
            }
            Some('{') => parser.scanner.advance(1),
            Some(ch) => {
                parser.scanner.advance(ch.len_utf8());
                parser.scanner.splice(&format!("{ch}}}"));
            }
        }
        let mut array = ArrayItem::new(ArrayKind::Array);
        array.name = name.to_owned();
        array.require_close = true;
        array.set("rowspacing", self.vspacing.unwrap_or("4pt"));
        array.set("columnspacing", self.spacing.unwrap_or("1em"));
        array.is_cases = self.cases;
        if let Some(side) = self.numbered {
            array.is_numbered = true;
            array.set("side", side);
        }
        if self.open.is_some() || self.close.is_some() {
            array.open = self.open.map(str::to_owned);
            array.close = self.close.map(str::to_owned);
        }
        if self.display {
            array.set("displaystyle", "true");
        }
        if let Some(align) = self.align {
            array.set("columnalign", align);
        }
        parser.push(StackItem::Array(Box::new(array)))
    }
}

/// Register table punctuation and the plain TeX tables.
pub fn define_array(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["\\", "newline"],
        handler: Arc::new(cr_latex),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["cr"],
        handler: Arc::new(cr),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["hline"],
        handler: Arc::new(hline),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Ams,
        names: &["hdashline"],
        handler: Arc::new(hline),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["hfill"],
        handler: Arc::new(hfill),
    });
    ctx.define_function(FunctionDefSpec {
        package: Package::Ams,
        names: &["shoveleft", "shoveright"],
        handler: Arc::new(shove),
    });

    let eqalign = Matrix {
        align: Some("right left"),
        spacing: Some("0.278em"),
        vspacing: Some(".5em"),
        display: true,
        ..Matrix::default()
    };
    let tables = [
        ("matrix", Matrix::default()),
        (
            "pmatrix",
            Matrix {
                open: Some("("),
                close: Some(")"),
                ..Matrix::default()
            },
        ),
        (
            "cases",
            Matrix {
                open: Some("{"),
                close: Some(""),
                align: Some("left left"),
                vspacing: Some(".1em"),
                cases: true,
                ..Matrix::default()
            },
        ),
        ("eqalign", eqalign),
        (
            "displaylines",
            Matrix {
                align: Some("center"),
                vspacing: Some(".5em"),
                display: true,
                ..Matrix::default()
            },
        ),
        (
            "eqalignno",
            Matrix {
                numbered: Some("right"),
                ..eqalign
            },
        ),
        (
            "leqalignno",
            Matrix {
                numbered: Some("left"),
                ..eqalign
            },
        ),
    ];
    for (name, matrix) in tables {
        ctx.define_command(Package::Base, name, matrix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cases_text_stops_at_row_end() {
        assert_eq!(cases_text_len(r"if $x>0$ \\ y", None).unwrap(), 9);
        assert_eq!(cases_text_len(r"a {b} \cr", None).unwrap(), 6);
        assert_eq!(cases_text_len(r"a \crx", None).unwrap(), 6);
        assert_eq!(cases_text_len(r"a \end{cases}", Some("cases")).unwrap(), 2);
        assert_eq!(cases_text_len("a } b", None).unwrap(), 2);
    }

    #[test]
    fn test_cases_text_rejects_second_tab() {
        let err = cases_text_len("a & b", None).unwrap_err();
        assert_eq!(err.id(), "ExtraAlignTab");
        assert!(cases_text_len("{a & b}", None).is_ok());
    }

    #[test]
    fn test_bare_text() {
        assert!(is_bare_text(r" \text{if } "));
        assert!(!is_bare_text(r"\text{a} b"));
        assert!(!is_bare_text(r"\textbf{a}"));
        assert!(!is_bare_text("x"));
    }
}
