//! Macro and environment definitions.
//!
//! A macro is a replacement body in which `#1`..`#9` stand for arguments
//! read from the source. The first argument may be optional, in which case
//! it is read from brackets and falls back to a default. Definitions come
//! from three places:
//!
//! - the built-in tables [`BASE_MACROS`] and [`AMS_MACROS`]
//! - [`crate::Settings::macros`], loaded into every new document
//! - `\newcommand`, `\def` and `\newenvironment` in the source
//!
//! # Cross-references
//! - [`crate::macro_expander`] performs the substitution.
//! - [`crate::define_function::CommandEntry::Macro`] stores the built-ins.

use alloc::borrow::Cow;

use phf::phf_map;

/// A text macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDefinition {
    /// Replacement text with `#n` parameters.
    pub body: Cow<'static, str>,
    /// Number of parameters.
    pub num_args: usize,
    /// Default of the optional first parameter; `None` when all are required.
    pub default: Option<Cow<'static, str>>,
}

impl MacroDefinition {
    /// Definition with a static body, for the built-in tables.
    #[must_use]
    pub const fn fixed(body: &'static str, num_args: usize) -> Self {
        Self {
            body: Cow::Borrowed(body),
            num_args,
            default: None,
        }
    }

    /// Definition with an owned body.
    #[must_use]
    pub fn new<S: Into<String>>(body: S, num_args: usize) -> Self {
        Self {
            body: Cow::Owned(body.into()),
            num_args,
            default: None,
        }
    }

    /// Make the first parameter optional with the given default.
    #[must_use]
    pub fn with_default<S: Into<String>>(mut self, default: S) -> Self {
        self.default = Some(Cow::Owned(default.into()));
        self
    }
}

/// A user environment from `\newenvironment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDefinition {
    /// Text substituted for `\begin{name}`; may use parameters.
    pub begin: String,
    /// Text substituted for `\end{name}`.
    pub end: String,
    /// Number of parameters of the begin text.
    pub num_args: usize,
    /// Default of the optional first parameter.
    pub default: Option<String>,
}

/// What a user-defined control sequence means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// `\newcommand` or `\def`
    Macro(MacroDefinition),
    /// `\let\a\b` where `\b` is a built-in; resolved against the packages.
    Builtin(String),
    /// `\let\a=c` for a single character
    Char(char),
}

/// Text macros available in every document.
pub static BASE_MACROS: phf::Map<&'static str, MacroDefinition> = phf_map! {
    "iff" => MacroDefinition::fixed(r"\;\Longleftrightarrow\;", 0),
    "implies" => MacroDefinition::fixed(r"\;\Longrightarrow\;", 0),
    "impliedby" => MacroDefinition::fixed(r"\;\Longleftarrow\;", 0),
    "mathstrut" => MacroDefinition::fixed(r"\vphantom{(}", 0),
    "bmod" => MacroDefinition::fixed(
        r#"\mmlToken{mo}[lspace="thickmathspace" rspace="thickmathspace"]{mod}"#,
        0,
    ),
    "pmod" => MacroDefinition::fixed(r"\pod{\mmlToken{mi}{mod}\kern 6mu #1}", 1),
    "mod" => MacroDefinition::fixed(
        r"\mathchoice{\kern18mu}{\kern12mu}{\kern12mu}{\kern12mu}\mmlToken{mi}{mod}\,\,#1",
        1,
    ),
    "pod" => MacroDefinition::fixed(
        r"\mathchoice{\kern18mu}{\kern8mu}{\kern8mu}{\kern8mu}(#1)",
        1,
    ),
    "TeX" => MacroDefinition::fixed(r"T\kern-.14em\lower.5ex{E}\kern-.115em X", 0),
    "LaTeX" => MacroDefinition::fixed(
        r"L\kern-.325em\raise.21em{\scriptstyle{A}}\kern-.17em\TeX",
        0,
    ),
    "stackrel" => MacroDefinition::fixed(r"\mathrel{\mathop{#2}\limits^{#1}}", 2),
    "pmb" => MacroDefinition::fixed(r"\rlap{#1}\kern1px{#1}", 1),
    "bgroup" => MacroDefinition::fixed("{", 0),
    "egroup" => MacroDefinition::fixed("}", 0),
    "thinspace" => MacroDefinition::fixed(r"\,", 0),
    "negthinspace" => MacroDefinition::fixed(r"\!", 0),
    "enspace" => MacroDefinition::fixed(r"\kern.5em ", 0),
    "enskip" => MacroDefinition::fixed(r"\hskip.5em\relax", 0),
};

/// Text macros of the AMS package.
pub static AMS_MACROS: phf::Map<&'static str, MacroDefinition> = phf_map! {
    "dfrac" => MacroDefinition::fixed(r"\genfrac{}{}{}{0}{#1}{#2}", 2),
    "tfrac" => MacroDefinition::fixed(r"\genfrac{}{}{}{1}{#1}{#2}", 2),
    "boxed" => MacroDefinition::fixed(r"\fbox{$\displaystyle{#1}$}", 1),
    "substack" => MacroDefinition::fixed(r"\begin{subarray}{c}#1\end{subarray}", 1),
    "negmedspace" => MacroDefinition::fixed(r"\mskip-4mu", 0),
    "negthickspace" => MacroDefinition::fixed(r"\mskip-5mu", 0),
    "varliminf" => MacroDefinition::fixed(r"\mathop{\underline{\mmlToken{mi}{lim}}}", 0),
    "varlimsup" => MacroDefinition::fixed(r"\mathop{\overline{\mmlToken{mi}{lim}}}", 0),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables() {
        let pmod = BASE_MACROS.get("pmod").unwrap();
        assert_eq!(pmod.num_args, 1);
        assert!(pmod.body.contains("#1"));
        assert_eq!(AMS_MACROS.get("dfrac").map(|m| m.num_args), Some(2));
    }

    #[test]
    fn test_optional_default() {
        let def = MacroDefinition::new(r"\sqrt[#1]{#2}", 2).with_default("3");
        assert_eq!(def.default.as_deref(), Some("3"));
        assert!(matches!(def.body, Cow::Owned(_)));
    }
}
