//! Table environments: `array`, the matrices, `cases` and the numbered
//! alignments.

use alloc::sync::Arc;
use core::iter::Peekable;
use core::mem;
use core::str::Chars;

use super::{EnvDefSpec, EnvironmentHandler, check_eqn_env};
use crate::context::TexContext;
use crate::parser::Parser;
use crate::parser::parse_util::{parse_integer, trim_spaces};
use crate::stack::{ArrayItem, ArrayKind, BeginItem, StackItem};
use crate::types::{Package, ParseError, ParseErrorKind, TexStyle};

/// A parsed column specification such as `|c:l|r`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Alignment of each column.
    pub align: Vec<&'static str>,
    /// Line between each pair of adjacent columns.
    pub lines: Vec<&'static str>,
    /// Line before the first column.
    pub left: Option<&'static str>,
    /// Line after the last column.
    pub right: Option<&'static str>,
}

impl ColumnSpec {
    /// Copy the specification onto `array`.
    pub fn apply(&self, array: &mut ArrayItem) {
        array.set("columnalign", self.align.join(" "));
        if self.lines.iter().any(|line| *line != "none") {
            array.set("columnlines", self.lines.join(" "));
        }
        if let Some(style) = self.left {
            array.frame.push(("left", style));
            array.dashed = style == "dashed";
        }
        if let Some(style) = self.right {
            array.frame.push(("right", style));
        }
    }
}

fn read_group(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
    if chars.peek() != Some(&'{') {
        return chars.next().map(String::from);
    }
    chars.next();
    let mut depth = 1_usize;
    let mut group = String::new();
    for ch in chars.by_ref() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(group);
                }
            }
            _ => {}
        }
        group.push(ch);
    }
    None
}

fn expand_repeats(spec: &str) -> Result<String, ParseError> {
    if !spec.contains('*') {
        return Ok(spec.to_owned());
    }
    let mut out = String::with_capacity(spec.len());
    let mut chars = spec.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '*' {
            out.push(ch);
            continue;
        }
        let count = read_group(&mut chars).ok_or_else(|| ParseErrorKind::MissingArgFor {
            name: "*".to_owned(),
        })?;
        let count = parse_integer(&count, "*")?;
        let body = read_group(&mut chars).ok_or_else(|| ParseErrorKind::MissingArgFor {
            name: "*".to_owned(),
        })?;
        let body = expand_repeats(&body)?;
        for _ in 0..count {
            out.push_str(&body);
        }
    }
    Ok(out)
}

/// Parse a column specification.
///
/// `l`, `c` and `r` are columns; `p{..}`, `m{..}` and `b{..}` are
/// left-aligned columns; `|` draws a solid and `:` a dashed line;
/// `*{n}{spec}` repeats `spec`; `@{..}`, `>{..}` and `<{..}` are skipped.
pub fn parse_column_spec(spec: &str) -> Result<ColumnSpec, ParseError> {
    let spec = expand_repeats(spec)?;
    let mut columns = ColumnSpec::default();
    let mut pending: Option<&'static str> = None;
    let mut chars = spec.chars().peekable();
    while let Some(ch) = chars.next() {
        let align = match ch {
            'l' => "left",
            'c' => "center",
            'r' => "right",
            'p' | 'm' | 'b' => {
                read_group(&mut chars);
                "left"
            }
            '|' => {
                pending = Some("solid");
                continue;
            }
            ':' => {
                pending = Some("dashed");
                continue;
            }
            '@' | '>' | '<' => {
                read_group(&mut chars);
                continue;
            }
            _ => continue,
        };
        if columns.align.is_empty() {
            columns.left = pending.take();
        } else {
            columns.lines.push(pending.take().unwrap_or("none"));
        }
        columns.align.push(align);
    }
    columns.right = pending;
    Ok(columns)
}

/// Apply the vertical alignment `t`, `b` or `c` of an `[align]` argument.
pub fn set_array_align(array: &mut ArrayItem, align: &str) {
    let value = match trim_spaces(align).as_str() {
        "" => return,
        "t" => "baseline 1".to_owned(),
        "b" => "baseline -1".to_owned(),
        "c" => "axis".to_owned(),
        other => other.to_owned(),
    };
    array.set("align", value);
}

fn align_letters(align: &str) -> String {
    align
        .chars()
        .filter_map(|c| match c {
            'l' => Some("left"),
            'c' => Some("center"),
            'r' => Some("right"),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn apply_style(array: &mut ArrayItem, style: Option<TexStyle>) {
    match style {
        Some(TexStyle::Display) => array.set("displaystyle", "true"),
        Some(TexStyle::Script | TexStyle::ScriptScript) => {
            array.set("displaystyle", "false");
            array.set("scriptlevel", "1");
        }
        Some(TexStyle::Text) => array.set("displaystyle", "false"),
        None => {}
    }
}

fn with_cs<T, F>(parser: &mut Parser<'_, '_>, name: &str, f: F) -> Result<T, ParseError>
where
    F: FnOnce(&mut Parser<'_, '_>) -> Result<T, ParseError>,
{
    let saved = mem::replace(&mut parser.current_cs, format!("\\begin{{{name}}}"));
    let result = f(parser);
    parser.current_cs = saved;
    result
}

/// `array` and its relatives: a table with the given fences, column
/// alignment and spacing. Without `align` the column specification is
/// read from the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayEnv {
    /// Left fence.
    pub open: Option<&'static str>,
    /// Right fence.
    pub close: Option<&'static str>,
    /// Fixed column specification.
    pub align: Option<&'static str>,
    /// Column spacing.
    pub spacing: Option<&'static str>,
    /// Row spacing.
    pub vspacing: Option<&'static str>,
    /// Style of the cells.
    pub style: Option<TexStyle>,
    /// Rows keep their natural height.
    pub ragged: bool,
    /// An optional `[t|c|b]` comes before the column specification.
    pub brackets: bool,
    /// Text after the first `&` of each row is text.
    pub cases: bool,
}

impl EnvironmentHandler for ArrayEnv {
    fn begin(&self, parser: &mut Parser<'_, '_>, begin: BeginItem) -> Result<StackItem, ParseError> {
        let (valign, spec) = with_cs(parser, &begin.name, |parser| {
            let valign = if self.brackets {
                parser.get_brackets()?
            } else {
                None
            };
            let spec = match self.align {
                Some(align) => align.to_owned(),
                None => parser.get_argument()?,
            };
            Ok((valign, spec))
        })?;
        let mut array = ArrayItem::new(ArrayKind::Array);
        array.name.clone_from(&begin.name);
        parse_column_spec(&spec)?.apply(&mut array);
        array.set("columnspacing", self.spacing.unwrap_or("1em"));
        array.set("rowspacing", self.vspacing.unwrap_or("4pt"));
        array.open = self.open.map(str::to_owned);
        array.close = self.close.map(str::to_owned);
        apply_style(&mut array, self.style);
        if self.ragged {
            array.set("data-useheight", "false");
        }
        array.is_cases = self.cases;
        if let Some(valign) = valign {
            set_array_align(&mut array, &valign);
        }
        parser.push(StackItem::Begin(begin))?;
        Ok(StackItem::Array(Box::new(array)))
    }
}

/// The numbered and unnumbered alignments: one tag per row.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqnArrayEnv {
    /// Rows are numbered automatically.
    pub numbered: bool,
    /// `\tag` is allowed; also marks a top-level equation structure.
    pub taggable: bool,
    /// Column alignment letters, repeated as needed.
    pub align: &'static str,
    /// Column spacing.
    pub spacing: Option<&'static str>,
    /// Row spacing.
    pub vspacing: Option<&'static str>,
    /// An optional `[t|c|b]` comes first.
    pub brackets: bool,
    /// The column count is read as an argument (`alignat`).
    pub align_at: bool,
}

impl EnvironmentHandler for EqnArrayEnv {
    fn begin(&self, parser: &mut Parser<'_, '_>, begin: BeginItem) -> Result<StackItem, ParseError> {
        let name = begin.name.clone();
        let (valign, pairs) = with_cs(parser, &name, |parser| {
            let valign = if self.brackets {
                parser.get_brackets()?
            } else {
                None
            };
            let pairs = if self.align_at {
                let arg = parser.get_argument()?;
                Some(parse_integer(&arg, &parser.current_cs)?)
            } else {
                None
            };
            Ok((valign, pairs))
        })?;
        parser.push(StackItem::Begin(begin))?;
        let owns_eqn_env = self.taggable;
        if owns_eqn_env {
            check_eqn_env(parser)?;
        }
        let (align, spacing) = match pairs {
            Some(pairs) => (
                "rl".repeat(pairs),
                Some(vec!["0em 0em"; pairs].join(" ")),
            ),
            None => (self.align.to_owned(), self.spacing.map(str::to_owned)),
        };
        parser.ctx.tags.start(&name, self.taggable, self.numbered);
        log::debug!("begin {name}");
        let mut array = ArrayItem::new(ArrayKind::EqnArray);
        array.name = name;
        array.owns_eqn_env = owns_eqn_env;
        array.set("displaystyle", "true");
        array.set("columnalign", align_letters(&align));
        array.set("columnspacing", spacing.unwrap_or_else(|| "1em".to_owned()));
        array.set("rowspacing", self.vspacing.unwrap_or("3pt"));
        array.set("side", parser.ctx.tags.side().as_ref());
        array.set("minlabelspacing", parser.ctx.tags.indent());
        if let Some(valign) = valign {
            set_array_align(&mut array, &valign);
        }
        Ok(StackItem::Array(Box::new(array)))
    }
}

/// `multline`: first line flush left, last flush right, one tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultlineEnv {
    /// The equation is numbered automatically.
    pub numbered: bool,
}

impl EnvironmentHandler for MultlineEnv {
    fn begin(&self, parser: &mut Parser<'_, '_>, begin: BeginItem) -> Result<StackItem, ParseError> {
        let name = begin.name.clone();
        parser.push(StackItem::Begin(begin))?;
        check_eqn_env(parser)?;
        parser.ctx.tags.start("multline", true, self.numbered);
        let mut array = ArrayItem::new(ArrayKind::Multline);
        array.name = name;
        array.owns_eqn_env = true;
        array.set("displaystyle", "true");
        array.set("rowspacing", ".5em");
        array.set("columnspacing", "100%");
        array.set("width", "100%");
        array.set("side", parser.ctx.tags.side().as_ref());
        array.set("minlabelspacing", parser.ctx.tags.indent());
        Ok(StackItem::Array(Box::new(array)))
    }
}

/// Register `array`.
pub fn define_array(ctx: &mut TexContext) {
    ctx.define_environment(EnvDefSpec {
        package: Package::Base,
        names: &["array"],
        handler: Arc::new(ArrayEnv {
            brackets: true,
            ..ArrayEnv::default()
        }),
    });
    for (name, numbered) in [("eqnarray", true), ("eqnarray*", false)] {
        ctx.define_environment(EnvDefSpec {
            package: Package::Base,
            names: &[name],
            handler: Arc::new(EqnArrayEnv {
                numbered,
                taggable: true,
                align: "rcl",
                spacing: Some("0em 0.278em"),
                vspacing: Some(".5em"),
                ..EqnArrayEnv::default()
            }),
        });
    }
}

/// Register the AMS matrices, `cases` and alignments.
pub fn define_ams_array(ctx: &mut TexContext) {
    let matrices: [(&str, Option<&'static str>, Option<&'static str>); 6] = [
        ("matrix", None, None),
        ("pmatrix", Some("("), Some(")")),
        ("bmatrix", Some("["), Some("]")),
        ("Bmatrix", Some("{"), Some("}")),
        ("vmatrix", Some("|"), Some("|")),
        ("Vmatrix", Some("\u{2016}"), Some("\u{2016}")),
    ];
    for (name, open, close) in matrices {
        ctx.define_environment(EnvDefSpec {
            package: Package::Ams,
            names: &[name],
            handler: Arc::new(ArrayEnv {
                open,
                close,
                align: Some("c"),
                ..ArrayEnv::default()
            }),
        });
    }
    let tables: [(&str, ArrayEnv); 3] = [
        (
            "cases",
            ArrayEnv {
                open: Some("{"),
                close: Some(""),
                align: Some("ll"),
                vspacing: Some(".2em"),
                style: Some(TexStyle::Text),
                cases: true,
                ..ArrayEnv::default()
            },
        ),
        (
            "subarray",
            ArrayEnv {
                spacing: Some("0em"),
                vspacing: Some("0.1em"),
                style: Some(TexStyle::Script),
                ragged: true,
                ..ArrayEnv::default()
            },
        ),
        (
            "smallmatrix",
            ArrayEnv {
                align: Some("c"),
                spacing: Some("0.333em"),
                vspacing: Some(".2em"),
                style: Some(TexStyle::Script),
                ragged: true,
                ..ArrayEnv::default()
            },
        ),
    ];
    for (name, env) in tables {
        ctx.define_environment(EnvDefSpec {
            package: Package::Ams,
            names: &[name],
            handler: Arc::new(env),
        });
    }

    let aligns: [(&str, EqnArrayEnv); 11] = [
        ("align", numbered_align("rl", true)),
        ("align*", numbered_align("rl", false)),
        ("gather", numbered_align("c", true)),
        ("gather*", numbered_align("c", false)),
        (
            "split",
            EqnArrayEnv {
                align: "rl",
                spacing: Some("0em"),
                ..EqnArrayEnv::default()
            },
        ),
        (
            "aligned",
            EqnArrayEnv {
                align: "rl",
                spacing: Some("0em 2em"),
                vspacing: Some(".5em"),
                brackets: true,
                ..EqnArrayEnv::default()
            },
        ),
        (
            "gathered",
            EqnArrayEnv {
                align: "c",
                vspacing: Some(".5em"),
                brackets: true,
                ..EqnArrayEnv::default()
            },
        ),
        (
            "alignat",
            EqnArrayEnv {
                align_at: true,
                ..numbered_align("", true)
            },
        ),
        (
            "alignat*",
            EqnArrayEnv {
                align_at: true,
                ..numbered_align("", false)
            },
        ),
        (
            "alignedat",
            EqnArrayEnv {
                align_at: true,
                brackets: true,
                ..EqnArrayEnv::default()
            },
        ),
        (
            "flalign",
            EqnArrayEnv {
                spacing: Some("0em 2em"),
                ..numbered_align("rl", true)
            },
        ),
    ];
    for (name, env) in aligns {
        ctx.define_environment(EnvDefSpec {
            package: Package::Ams,
            names: &[name],
            handler: Arc::new(env),
        });
    }
    for (name, numbered) in [("multline", true), ("multline*", false)] {
        ctx.define_environment(EnvDefSpec {
            package: Package::Ams,
            names: &[name],
            handler: Arc::new(MultlineEnv { numbered }),
        });
    }
}

const fn numbered_align(align: &'static str, numbered: bool) -> EqnArrayEnv {
    EqnArrayEnv {
        numbered,
        taggable: true,
        align,
        spacing: Some("0em 2em"),
        vspacing: None,
        brackets: false,
        align_at: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_column() {
        let spec = parse_column_spec("|c|").unwrap();
        assert_eq!(spec.align, ["center"]);
        assert_eq!(spec.left, Some("solid"));
        assert_eq!(spec.right, Some("solid"));
        assert!(spec.lines.is_empty());
    }

    #[test]
    fn test_dashed_interior_line() {
        let spec = parse_column_spec("c:c").unwrap();
        assert_eq!(spec.lines, ["dashed"]);
        assert_eq!(spec.left, None);
        assert_eq!(spec.right, None);

        let mut array = ArrayItem::new(ArrayKind::Array);
        spec.apply(&mut array);
        assert_eq!(array.arraydef["columnlines"], "dashed");
        assert!(array.frame.is_empty());
    }

    #[test]
    fn test_mixed_spec() {
        let spec = parse_column_spec("l|c r p{2cm}").unwrap();
        assert_eq!(spec.align, ["left", "center", "right", "left"]);
        assert_eq!(spec.lines, ["solid", "none", "none"]);
    }

    #[test]
    fn test_repeated_columns() {
        let spec = parse_column_spec("*{3}{c|}l").unwrap();
        assert_eq!(spec.align, ["center", "center", "center", "left"]);
        assert_eq!(spec.lines, ["solid", "solid", "solid"]);
        assert_eq!(parse_column_spec("*{x}{c}").unwrap_err().id(), "IntegerArg");
    }

    #[test]
    fn test_array_align() {
        let mut array = ArrayItem::new(ArrayKind::Array);
        set_array_align(&mut array, " t ");
        assert_eq!(array.arraydef["align"], "baseline 1");
        set_array_align(&mut array, "c");
        assert_eq!(array.arraydef["align"], "axis");
    }

    #[test]
    fn test_align_letters() {
        assert_eq!(align_letters("rl"), "right left");
        assert_eq!(align_letters("rcl"), "right center left");
    }
}
