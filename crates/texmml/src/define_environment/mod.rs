//! Environment definition utilities.
//!
//! `\begin{name}` hands a fresh [`BeginItem`] to the handler registered for
//! `name`. The handler reads whatever arguments the environment takes and
//! returns the frame to push, usually a table or the begin frame itself.
//! Handlers that need the begin frame below a table push it themselves.

mod array;
mod equation;

pub use array::{
    ArrayEnv, ColumnSpec, EqnArrayEnv, MultlineEnv, define_ams_array, define_array,
    parse_column_spec, set_array_align,
};
pub use equation::{check_eqn_env, define_equation};

use alloc::sync::Arc;

use crate::parser::Parser;
use crate::stack::{BeginItem, StackItem};
use crate::types::{Package, ParseError};

/// Behavior of an environment.
pub trait EnvironmentHandler: Send + Sync {
    /// Start the environment and return the frame to push.
    fn begin(&self, parser: &mut Parser<'_, '_>, begin: BeginItem) -> Result<StackItem, ParseError>;
}

impl<F> EnvironmentHandler for F
where
    F: Fn(&mut Parser<'_, '_>, BeginItem) -> Result<StackItem, ParseError> + Send + Sync,
{
    fn begin(&self, parser: &mut Parser<'_, '_>, begin: BeginItem) -> Result<StackItem, ParseError> {
        self(parser, begin)
    }
}

/// Registration record for a group of environments.
pub struct EnvDefSpec<'b> {
    /// Package that provides the environments.
    pub package: Package,
    /// Environment names.
    pub names: &'b [&'b str],
    /// Handler run for every name.
    pub handler: Arc<dyn EnvironmentHandler>,
}
