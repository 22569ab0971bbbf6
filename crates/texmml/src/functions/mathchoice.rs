use alloc::sync::Arc;

use crate::context::TexContext;
use crate::define_function::FunctionDefSpec;
use crate::parser::Parser;
use crate::stack::Env;
use crate::types::{Package, ParseError, TexStyle};

/// Style in effect for `env`.
fn current_style(env: &Env) -> TexStyle {
    env.style
        .unwrap_or(if env.display { TexStyle::Display } else { TexStyle::Text })
}

/// `\mathchoice{D}{T}{S}{SS}`: all four are parsed, the one for the
/// current style is kept.
fn mathchoice(parser: &mut Parser<'_, '_>, _name: &str) -> Result<(), ParseError> {
    let choices = [
        parser.parse_arg()?,
        parser.parse_arg()?,
        parser.parse_arg()?,
        parser.parse_arg()?,
    ];
    let index = match current_style(parser.stack.env()) {
        TexStyle::Display => 0,
        TexStyle::Text => 1,
        TexStyle::Script => 2,
        TexStyle::ScriptScript => 3,
    };
    match choices.into_iter().nth(index) {
        Some(chosen) => parser.push_node(chosen),
        None => Ok(()),
    }
}

/// Register `\mathchoice`.
pub fn define_mathchoice(ctx: &mut TexContext) {
    ctx.define_function(FunctionDefSpec {
        package: Package::Base,
        names: &["mathchoice"],
        handler: Arc::new(mathchoice),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_style() {
        assert_eq!(current_style(&Env::default()), TexStyle::Text);
        let env = Env {
            display: true,
            ..Env::default()
        };
        assert_eq!(current_style(&env), TexStyle::Display);
        let env = Env {
            display: true,
            style: Some(TexStyle::Script),
            ..Env::default()
        };
        assert_eq!(current_style(&env), TexStyle::Script);
    }
}
