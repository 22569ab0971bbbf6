//! User definitions: `\newcommand`, `\renewcommand`, `\newenvironment`,
//! `\renewenvironment`, `\def` and `\let`.
//!
//! Definitions go into the document's namespaces, so they stay visible to
//! later expressions of the same document. The `re` forms behave like the
//! plain ones: redefining a name replaces it, defining an existing name is
//! not an error.

use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::macros::{EnvironmentDefinition, MacroDefinition, UserCommand};
use crate::parser::Parser;
use crate::parser::parse_util::trim_spaces;
use crate::types::{Package, ParseError, ParseErrorKind};

/// Name given as the braced first argument of `\newcommand`, without the
/// backslash.
fn cs_name_argument(parser: &mut Parser<'_, '_>, name: &str) -> Result<String, ParseError> {
    let cs = trim_spaces(&parser.get_argument()?);
    let cs = cs.strip_prefix('\\').unwrap_or(&cs);
    let valid = cs.chars().count() == 1 || (!cs.is_empty() && cs.bytes().all(|b| b.is_ascii_alphabetic()));
    if !valid {
        return Err(ParseErrorKind::IllegalControlSequenceName {
            name: name.to_owned(),
        }
        .into());
    }
    Ok(cs.to_owned())
}

/// Name following `\def` or `\let`, which must be a control sequence.
fn cs_name(parser: &mut Parser<'_, '_>, name: &str) -> Result<String, ParseError> {
    if parser.get_next() != Some('\\') {
        return Err(ParseErrorKind::MissingCS {
            name: name.to_owned(),
        }
        .into());
    }
    let cs = trim_spaces(&parser.get_argument()?);
    Ok(cs.strip_prefix('\\').unwrap_or(&cs).to_owned())
}

/// Optional `[n]` parameter count.
fn arg_count(parser: &mut Parser<'_, '_>, name: &str) -> Result<usize, ParseError> {
    let Some(count) = parser.get_brackets()? else {
        return Ok(0);
    };
    let count = trim_spaces(&count);
    count
        .parse::<usize>()
        .ok()
        .filter(|n| *n <= 9 && count.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| {
            ParseErrorKind::IllegalParamNumber {
                name: name.to_owned(),
            }
            .into()
        })
}

fn new_command(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let cs = cs_name_argument(parser, name)?;
    let count = arg_count(parser, name)?;
    let default = parser.get_brackets()?;
    let body = parser.get_argument()?;
    let mut def = MacroDefinition::new(body, count);
    if let Some(default) = default {
        def = def.with_default(default);
    }
    log::debug!("defining \\{cs} with {count} parameters");
    if parser.ctx.commands.set(cs, UserCommand::Macro(def)).is_some() {
        log::debug!("previous definition replaced");
    }
    Ok(())
}

fn new_environment(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let env = trim_spaces(&parser.get_argument()?);
    let num_args = arg_count(parser, name)?;
    let default = parser.get_brackets()?;
    let begin = parser.get_argument()?;
    let end = parser.get_argument()?;
    log::debug!("defining environment {env} with {num_args} parameters");
    parser.ctx.environments.set(
        env,
        EnvironmentDefinition {
            begin,
            end,
            num_args,
            default,
        },
    );
    Ok(())
}

/// Parameter text of `\def` between the name and the body: `#1#2...`,
/// numbered in order.
fn def_params(parser: &mut Parser<'_, '_>, name: &str) -> Result<u32, ParseError> {
    let mut count = 0_u32;
    loop {
        match parser.get_next() {
            Some('{') => return Ok(count),
            Some('#') => {
                parser.scanner.advance(1);
                let expected = char::from_digit(count + 1, 10);
                if expected.is_none() || parser.scanner.peek() != expected {
                    return Err(ParseErrorKind::IllegalParamNumber {
                        name: name.to_owned(),
                    }
                    .into());
                }
                parser.scanner.advance(1);
                count += 1;
            }
            Some(_) => {
                return Err(ParseErrorKind::IllegalParamNumber {
                    name: name.to_owned(),
                }
                .into());
            }
            None => {
                return Err(ParseErrorKind::MissingArgFor {
                    name: name.to_owned(),
                }
                .into());
            }
        }
    }
}

fn def(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let cs = cs_name(parser, name)?;
    let count = def_params(parser, name)?;
    let body = parser.get_argument()?;
    log::debug!("\\def\\{cs} with {count} parameters");
    parser
        .ctx
        .commands
        .set(cs, UserCommand::Macro(MacroDefinition::new(body, count as usize)));
    Ok(())
}

fn let_command(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let cs = cs_name(parser, name)?;
    if parser.get_next() == Some('=') {
        parser.scanner.advance(1);
    }
    let meaning = if parser.get_next() == Some('\\') {
        let target = cs_name(parser, name)?;
        match parser.ctx.commands.get(&target) {
            Some(command) => command.clone(),
            None => UserCommand::Builtin(target),
        }
    } else {
        match parser.scanner.next_char() {
            Some(ch) => UserCommand::Char(ch),
            None => {
                return Err(ParseErrorKind::MissingArgFor {
                    name: name.to_owned(),
                }
                .into());
            }
        }
    };
    parser.ctx.commands.set(cs, meaning);
    Ok(())
}

/// Register the definition commands.
pub fn define_newcommand(ctx: &mut TexContext) {
    let table: [(&[&str], fn(&mut Parser<'_, '_>, &str) -> Result<(), ParseError>); 4] = [
        (&["newcommand", "renewcommand"], new_command),
        (&["newenvironment", "renewenvironment"], new_environment),
        (&["def"], def),
        (&["let"], let_command),
    ];
    for (names, handler) in table {
        ctx.define_function(FunctionDefSpec {
            package: Package::NewCommand,
            names,
            handler: Arc::new(handler),
        });
    }
}
