use alloc::sync::Arc;

use super::{EnvDefSpec, EnvironmentHandler};
use crate::context::TexContext;
use crate::parser::Parser;
use crate::stack::{BeginItem, EquationItem, StackItem};
use crate::types::{Package, ParseError, ParseErrorKind};

/// Mark the start of a numbered equation structure; they do not nest.
pub fn check_eqn_env(parser: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    if parser.stack.global.eqn_env {
        return Err(ParseErrorKind::ErroneousNestingEq.into());
    }
    parser.stack.global.eqn_env = true;
    Ok(())
}

/// `equation`, `equation*` and `displaymath`.
#[derive(Debug, Clone, Copy)]
struct EquationEnv {
    numbered: bool,
}

impl EnvironmentHandler for EquationEnv {
    fn begin(&self, parser: &mut Parser<'_, '_>, begin: BeginItem) -> Result<StackItem, ParseError> {
        let name = begin.name.clone();
        parser.push(StackItem::Begin(begin))?;
        check_eqn_env(parser)?;
        parser.ctx.tags.start("equation", true, self.numbered);
        Ok(StackItem::Equation(EquationItem {
            name,
            ..EquationItem::default()
        }))
    }
}

/// Register the single-equation environments.
pub fn define_equation(ctx: &mut TexContext) {
    for (name, numbered) in [("equation", true), ("equation*", false), ("displaymath", false)] {
        ctx.define_environment(EnvDefSpec {
            package: Package::Base,
            names: &[name],
            handler: Arc::new(EquationEnv { numbered }),
        });
    }
}
