//! Macro substitution.
//!
//! Expanding a macro reads its arguments from the source, substitutes
//! them for the `#n` parameters of the body and makes `body + remainder`
//! the new buffer, read from its start. Every expansion counts against the
//! per-expression ceiling of [`crate::Settings::max_macros`]; this is what
//! stops a macro that invokes itself. The expanded buffer is also capped
//! at [`crate::Settings::max_buffer`] bytes.

use core::mem;

use crate::macros::MacroDefinition;
use crate::parser::Parser;
use crate::types::{ParseError, ParseErrorKind};

/// Expand `\name` with definition `def` at the parser's cursor.
pub fn expand_macro(parser: &mut Parser<'_, '_>, name: &str, def: &MacroDefinition) -> Result<(), ParseError> {
    let saved = mem::replace(&mut parser.current_cs, format!("\\{name}"));
    let args = read_args(parser, def.num_args, def.default.as_deref());
    parser.current_cs = saved;
    let args = args?;
    let max_buffer = parser.ctx.settings.max_buffer;
    let body = substitute_args(&args, &def.body, max_buffer)?;
    let remaining = parser.scanner.remaining();
    let text = add_args(&body, remaining, max_buffer)?;
    let head = text.len() - remaining.len();
    parser.scanner.splice(&text[..head]);
    parser.ctx.check_max_macros(true)?;
    log::debug!(
        "expanded \\{name} ({} substitutions so far)",
        parser.ctx.macro_count()
    );
    Ok(())
}

/// Read `count` arguments; with a default the first one is optional and
/// read from brackets.
pub fn read_args(
    parser: &mut Parser<'_, '_>,
    count: usize,
    default: Option<&str>,
) -> Result<Vec<String>, ParseError> {
    let mut args = Vec::with_capacity(count);
    if count == 0 {
        return Ok(args);
    }
    if let Some(default) = default {
        args.push(parser.get_brackets()?.unwrap_or_else(|| default.to_owned()));
    }
    while args.len() < count {
        args.push(parser.get_argument()?);
    }
    Ok(args)
}

/// Replace the parameters of `body`: `#n` by argument `n` and `##` by `#`.
pub fn substitute_args(args: &[String], body: &str, max_buffer: usize) -> Result<String, ParseError> {
    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                text.push(ch);
                if let Some(next) = chars.next() {
                    text.push(next);
                }
            }
            '#' => match chars.next() {
                Some('#') => text.push('#'),
                Some(digit) => {
                    let arg = digit
                        .to_digit(10)
                        .and_then(|n| usize::try_from(n).ok())
                        .filter(|n| *n >= 1)
                        .and_then(|n| args.get(n - 1))
                        .ok_or(ParseErrorKind::IllegalMacroParam)?;
                    text = add_args(&text, arg, max_buffer)?;
                }
                None => return Err(ParseErrorKind::IllegalMacroParam.into()),
            },
            ch => text.push(ch),
        }
    }
    Ok(text)
}

/// Join two pieces of source, separating a trailing control word from a
/// following letter.
pub fn add_args(first: &str, second: &str, max_buffer: usize) -> Result<String, ParseError> {
    let mut text = String::with_capacity(first.len() + second.len() + 1);
    text.push_str(first);
    if second.starts_with(|c: char| c.is_ascii_alphabetic()) && ends_with_control_word(first) {
        text.push(' ');
    }
    if text.len() + second.len() > max_buffer {
        return Err(ParseErrorKind::MaxBufferSize.into());
    }
    text.push_str(second);
    Ok(text)
}

fn ends_with_control_word(text: &str) -> bool {
    let word = text.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if word.len() == text.len() {
        return false;
    }
    let slashes = word.len() - word.trim_end_matches('\\').len();
    slashes % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_substitute_args() {
        let text = substitute_args(&args(&["a", "b"]), r"\frac{#2}{#1}##", 100).unwrap();
        assert_eq!(text, r"\frac{b}{a}#");
        let text = substitute_args(&args(&["x"]), r"\#1", 100).unwrap();
        assert_eq!(text, r"\#1");
    }

    #[test]
    fn test_illegal_parameter() {
        for body in ["#2", "#0", "#x", "#"] {
            let err = substitute_args(&args(&["a"]), body, 100).unwrap_err();
            assert_eq!(err.id(), "IllegalMacroParam");
        }
    }

    #[test]
    fn test_add_args_separates_control_words() {
        assert_eq!(add_args(r"\alpha", "b", 100).unwrap(), r"\alpha b");
        assert_eq!(add_args(r"\\", "b", 100).unwrap(), r"\\b");
        assert_eq!(add_args(r"\\alpha", "b", 100).unwrap(), r"\\alphab");
        assert_eq!(add_args(r"\alpha", "{b}", 100).unwrap(), r"\alpha{b}");
    }

    #[test]
    fn test_buffer_ceiling() {
        let err = add_args("aaaa", "bbbb", 7).unwrap_err();
        assert_eq!(err.id(), "MaxBufferSize");
        assert!(add_args("aaaa", "bbbb", 8).is_ok());
    }
}
