//! Global and per-parse context.
//!
//! [`TexContext`] is the command table: every built-in control sequence
//! and environment, tagged with the package that provides it. It is
//! immutable once built and can be shared between threads.
//!
//! [`ParseContext`] bundles the borrowed state one parse works against:
//! the table, the settings and the mutable per-document state (tags and
//! user definitions), plus the substitution counter of the expression.

use alloc::sync::Arc;
use core::fmt;

use crate::define_environment::{self, EnvDefSpec, EnvironmentHandler};
use crate::define_function::{CommandEntry, CommandHandler, FunctionDefSpec};
use crate::functions;
use crate::macros::{AMS_MACROS, BASE_MACROS, EnvironmentDefinition, MacroDefinition, UserCommand};
use crate::namespace::{KeyMap, Namespace};
use crate::tags::TagRegistry;
use crate::types::{Package, ParseError, ParseErrorKind, Settings};

/// Command table.
///
/// Built once and then only read; it is `Send + Sync`.
///
/// A name may be registered by several packages; lookups return the entry
/// registered last among the enabled ones, so AMS definitions replace the
/// base ones when both are on.
pub struct TexContext {
    /// Control sequences, keyed without the backslash.
    pub functions: KeyMap<String, Vec<(Package, CommandEntry)>>,
    /// Environments.
    pub environments: KeyMap<String, Vec<(Package, Arc<dyn EnvironmentHandler>)>>,
}

impl fmt::Debug for TexContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TexContext")
            .field("functions", &self.functions.len())
            .field("environments", &self.environments.len())
            .finish()
    }
}

impl TexContext {
    /// Register a group of commands.
    pub fn define_function(&mut self, spec: FunctionDefSpec) {
        for name in spec.names {
            self.functions
                .entry((*name).to_owned())
                .or_default()
                .push((spec.package, CommandEntry::Command(Arc::clone(&spec.handler))));
        }
    }

    /// Register one command with its own handler instance.
    pub fn define_command<H: CommandHandler + 'static>(
        &mut self,
        package: Package,
        name: &str,
        handler: H,
    ) {
        self.functions
            .entry(name.to_owned())
            .or_default()
            .push((package, CommandEntry::Command(Arc::new(handler))));
    }

    /// Register a table of text macros.
    pub fn define_macros(
        &mut self,
        package: Package,
        table: &phf::Map<&'static str, MacroDefinition>,
    ) {
        for (name, def) in table {
            self.functions
                .entry((*name).to_owned())
                .or_default()
                .push((package, CommandEntry::Macro(def.clone())));
        }
    }

    /// Register a group of environments.
    pub fn define_environment(&mut self, spec: EnvDefSpec) {
        for name in spec.names {
            self.environments
                .entry((*name).to_owned())
                .or_default()
                .push((spec.package, Arc::clone(&spec.handler)));
        }
    }

    /// The command `name` means under `settings`.
    #[must_use]
    pub fn function(&self, name: &str, settings: &Settings) -> Option<&CommandEntry> {
        self.functions
            .get(name)?
            .iter()
            .rev()
            .find(|(package, _)| settings.has_package(*package))
            .map(|(_, entry)| entry)
    }

    /// The handler of environment `name` under `settings`.
    #[must_use]
    pub fn environment(
        &self,
        name: &str,
        settings: &Settings,
    ) -> Option<&Arc<dyn EnvironmentHandler>> {
        self.environments
            .get(name)?
            .iter()
            .rev()
            .find(|(package, _)| settings.has_package(*package))
            .map(|(_, handler)| handler)
    }
}

impl Default for TexContext {
    fn default() -> Self {
        let mut ctx = Self {
            functions: KeyMap::default(),
            environments: KeyMap::default(),
        };
        ctx.define_macros(Package::Base, &BASE_MACROS);
        ctx.define_macros(Package::Ams, &AMS_MACROS);

        functions::define_accent(&mut ctx);
        functions::define_array(&mut ctx);
        functions::define_boxes(&mut ctx);
        functions::define_chars(&mut ctx);
        functions::define_color(&mut ctx);
        functions::define_delimsizing(&mut ctx);
        functions::define_environment(&mut ctx);
        functions::define_font(&mut ctx);
        functions::define_genfrac(&mut ctx);
        functions::define_mathchoice(&mut ctx);
        functions::define_mmltoken(&mut ctx);
        functions::define_newcommand(&mut ctx);
        functions::define_op(&mut ctx);
        functions::define_scripts(&mut ctx);
        functions::define_spacing(&mut ctx);
        functions::define_sqrt(&mut ctx);
        functions::define_styling(&mut ctx);
        functions::define_tag(&mut ctx);
        functions::define_text(&mut ctx);

        define_environment::define_array(&mut ctx);
        define_environment::define_ams_array(&mut ctx);
        define_environment::define_equation(&mut ctx);
        ctx
    }
}

/// State one parse works against.
#[derive(Debug)]
pub struct ParseContext<'a> {
    /// Command table.
    pub tex: &'a TexContext,
    /// Settings.
    pub settings: &'a Settings,
    /// Equation numbers and labels of the document.
    pub tags: &'a mut TagRegistry,
    /// User control sequences of the document.
    pub commands: &'a mut Namespace<UserCommand>,
    /// User environments of the document.
    pub environments: &'a mut Namespace<EnvironmentDefinition>,
    macro_count: usize,
}

impl<'a> ParseContext<'a> {
    /// Bundle the state for one expression.
    #[must_use]
    pub const fn new(
        tex: &'a TexContext,
        settings: &'a Settings,
        tags: &'a mut TagRegistry,
        commands: &'a mut Namespace<UserCommand>,
        environments: &'a mut Namespace<EnvironmentDefinition>,
    ) -> Self {
        Self {
            tex,
            settings,
            tags,
            commands,
            environments,
            macro_count: 0,
        }
    }

    /// Substitutions performed so far in this expression.
    #[must_use]
    pub const fn macro_count(&self) -> usize {
        self.macro_count
    }

    /// Count one substitution and fail once the ceiling is passed.
    pub fn check_max_macros(&mut self, is_macro: bool) -> Result<(), ParseError> {
        self.macro_count += 1;
        if self.macro_count > self.settings.max_macros {
            log::debug!(
                "substitution ceiling of {} reached",
                self.settings.max_macros
            );
            return Err(if is_macro {
                ParseErrorKind::MaxMacroSub1
            } else {
                ParseErrorKind::MaxMacroSub2
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_filtering() {
        let ctx = TexContext::default();
        let full = Settings::default();
        let base_only = Settings::builder().packages(vec![Package::Base]).build();
        assert!(ctx.function("frac", &full).is_some());
        assert!(ctx.function("dfrac", &full).is_some());
        assert!(ctx.function("dfrac", &base_only).is_none());
        assert!(ctx.environment("align", &full).is_some());
        assert!(ctx.environment("align", &base_only).is_none());
        assert!(ctx.environment("array", &base_only).is_some());
        assert!(format!("{ctx:?}").starts_with("TexContext { functions: "));
    }

    #[test]
    fn test_ceiling_triggers_after_the_maximum() {
        let tex = TexContext::default();
        let settings = Settings::builder().max_macros(2).build();
        let mut tags = TagRegistry::new(&settings);
        let mut commands = Namespace::default();
        let mut environments = Namespace::default();
        let mut ctx = ParseContext::new(&tex, &settings, &mut tags, &mut commands, &mut environments);
        assert!(ctx.check_max_macros(true).is_ok());
        assert!(ctx.check_max_macros(true).is_ok());
        let err = ctx.check_max_macros(true).unwrap_err();
        assert_eq!(err.id(), "MaxMacroSub1");
        assert_eq!(ctx.macro_count(), 3);
    }
}
