//! `\begin` and `\end`.
//!
//! A user environment from `\newenvironment` is text substitution: its
//! begin text replaces `\begin{name}` and its end text replaces the
//! matching `\end{name}`, followed by a second `\end{name}` that closes
//! the frame once the end text has been read. Built-in environments run
//! their handler.

use alloc::sync::Arc;
use core::mem;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::macro_expander::{add_args, read_args, substitute_args};
use crate::parser::Parser;
use crate::stack::{BeginItem, StackItem};
use crate::types::{Package, ParseError, ParseErrorKind};

/// Make `body` the next text to read.
fn splice_body(parser: &mut Parser<'_, '_>, body: &str) -> Result<(), ParseError> {
    let max_buffer = parser.ctx.settings.max_buffer;
    let remaining = parser.scanner.remaining();
    let text = add_args(body, remaining, max_buffer)?;
    let head = text.len() - remaining.len();
    parser.scanner.splice(&text[..head]);
    Ok(())
}

fn begin_user(parser: &mut Parser<'_, '_>, name: &str) -> Result<bool, ParseError> {
    let Some(def) = parser.ctx.environments.get(name).cloned() else {
        return Ok(false);
    };
    parser.ctx.check_max_macros(false)?;
    let args = read_args(parser, def.num_args, def.default.as_deref())?;
    let body = substitute_args(&args, &def.begin, parser.ctx.settings.max_buffer)?;
    splice_body(parser, &body)?;
    log::debug!("begin user environment {name}");
    parser.push(StackItem::Begin(BeginItem {
        name: name.to_owned(),
        ..BeginItem::default()
    }))?;
    Ok(true)
}

fn end_user(parser: &mut Parser<'_, '_>, name: &str) -> Result<bool, ParseError> {
    let Some(def) = parser.ctx.environments.get(name).cloned() else {
        return Ok(false);
    };
    if parser.stack.global.closing.last().map(String::as_str) == Some(name) {
        parser.stack.global.closing.pop();
        log::debug!("end user environment {name}");
        parser.push(StackItem::End(name.to_owned()))?;
        return Ok(true);
    }
    parser.ctx.check_max_macros(false)?;
    let body = substitute_args(&[], &def.end, parser.ctx.settings.max_buffer)?;
    parser.stack.global.closing.push(name.to_owned());
    splice_body(parser, &format!("{body}\\end{{{name}}}"))?;
    Ok(true)
}

fn begin_end(parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
    let env = parser.get_argument()?;
    if env.contains('\\') {
        return Err(ParseErrorKind::InvalidEnv { name: env }.into());
    }
    let begin = name == r"\begin";
    if begin && begin_user(parser, &env)? {
        return Ok(());
    }
    if !begin && end_user(parser, &env)? {
        return Ok(());
    }
    let tex = parser.ctx.tex;
    let settings = parser.ctx.settings;
    let Some(handler) = tex.environment(&env, settings) else {
        return Err(ParseErrorKind::UnknownEnv { name: env }.into());
    };
    if !begin {
        return parser.push(StackItem::End(env));
    }
    parser.ctx.check_max_macros(false)?;
    let saved = mem::replace(&mut parser.current_cs, format!("\\begin{{{env}}}"));
    let item = handler.begin(
        parser,
        BeginItem {
            name: env,
            ..BeginItem::default()
        },
    );
    parser.current_cs = saved;
    parser.push(item?)
}

/// Register `\begin` and `\end`.
pub fn define_environment(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["begin", "end"],
        handler: Arc::new(begin_end),
    });
}
