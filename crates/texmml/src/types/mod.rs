//! Core type definitions shared across the parser.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

mod parse_error;
pub use parse_error::{ErrorCategory, ParseError, ParseErrorKind};

mod settings;
pub use settings::{DigitGrouping, ErrorMode, Package, Settings, TagMode, TagSide};

/// MathML `mathvariant` values.
///
/// Serialized with the spelling used in the `mathvariant` attribute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
pub enum MathVariant {
    /// Upright.
    Normal,
    /// Bold upright.
    Bold,
    /// Italic.
    Italic,
    /// Bold italic.
    BoldItalic,
    /// Blackboard bold.
    DoubleStruck,
    /// Fraktur.
    Fraktur,
    /// Bold fraktur.
    BoldFraktur,
    /// Script.
    Script,
    /// Bold script.
    BoldScript,
    /// Sans serif.
    SansSerif,
    /// Bold sans serif.
    BoldSansSerif,
    /// Italic sans serif.
    SansSerifItalic,
    /// Bold italic sans serif.
    SansSerifBoldItalic,
    /// Typewriter.
    Monospace,
    /// Calligraphic capitals.
    #[strum(serialize = "-tex-calligraphic")]
    TexCalligraphic,
    /// Bold calligraphic capitals.
    #[strum(serialize = "-tex-bold-calligraphic")]
    TexBoldCalligraphic,
}

/// The four TeX math styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum TexStyle {
    /// `\displaystyle`
    #[strum(serialize = "D")]
    Display,
    /// `\textstyle`
    #[strum(serialize = "T")]
    Text,
    /// `\scriptstyle`
    #[strum(serialize = "S")]
    Script,
    /// `\scriptscriptstyle`
    #[strum(serialize = "SS")]
    ScriptScript,
}

impl TexStyle {
    /// Value of the `displaystyle` attribute for this style.
    #[must_use]
    pub const fn is_display(self) -> bool {
        matches!(self, Self::Display)
    }

    /// Value of the `scriptlevel` attribute for this style.
    #[must_use]
    pub const fn script_level(self) -> u8 {
        match self {
            Self::Display | Self::Text => 0,
            Self::Script => 1,
            Self::ScriptScript => 2,
        }
    }
}
