//! Command definition utilities.
//!
//! Every built-in control sequence is registered on a
//! [`crate::context::TexContext`] through a [`FunctionDefSpec`] naming the
//! package it belongs to, the names it answers to and the handler that
//! runs when the parser meets it.
//!
//! A handler is anything implementing [`CommandHandler`]. Plain functions
//! and closures with the right signature qualify through a blanket impl
//! and usually match on the name they are called with; commands that only
//! differ in a few constants (a font, a width, a glyph) are structs whose
//! fields hold those constants.

use alloc::sync::Arc;
use core::fmt;

use crate::macros::MacroDefinition;
use crate::parser::Parser;
use crate::types::{Package, ParseError};

/// Behavior of a control sequence.
pub trait CommandHandler: Send + Sync {
    /// Run the command. `name` includes the leading backslash, e.g. `\frac`.
    fn apply(&self, parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError>;
}

impl<F> CommandHandler for F
where
    F: Fn(&mut Parser<'_, '_>, &str) -> Result<(), ParseError> + Send + Sync,
{
    fn apply(&self, parser: &mut Parser<'_, '_>, name: &str) -> Result<(), ParseError> {
        self(parser, name)
    }
}

/// What a registered name does.
#[derive(Clone)]
pub enum CommandEntry {
    /// Run a handler.
    Command(Arc<dyn CommandHandler>),
    /// Substitute a text macro.
    Macro(MacroDefinition),
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(_) => f.write_str("Command(..)"),
            Self::Macro(def) => f.debug_tuple("Macro").field(def).finish(),
        }
    }
}

/// Registration record for a group of control sequences.
pub struct FunctionDefSpec<'b> {
    /// Package that provides the names.
    pub package: Package,
    /// Names without the backslash.
    pub names: &'b [&'b str],
    /// Handler run for every name.
    pub handler: Arc<dyn CommandHandler>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_debug_hides_handlers() {
        fn relax(_: &mut Parser<'_, '_>, _: &str) -> Result<(), ParseError> {
            Ok(())
        }
        let entry = CommandEntry::Command(Arc::new(relax));
        assert_eq!(format!("{entry:?}"), "Command(..)");
        let entry = CommandEntry::Macro(MacroDefinition::fixed("x", 0));
        assert!(format!("{entry:?}").starts_with("Macro("));
    }
}
