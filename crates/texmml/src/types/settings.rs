use bon::bon;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::macros::MacroDefinition;

/// Command-table extension sets.
///
/// `Base` is always active; the others add their commands and
/// environments on top of it, later packages overriding earlier ones.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Package {
    /// TeX primitives and the LaTeX math basics.
    Base,
    /// AMS math commands and the alignment environments.
    Ams,
    /// `\newcommand`, `\newenvironment`, `\def` and `\let`.
    #[strum(serialize = "newcommand")]
    #[serde(rename = "newcommand")]
    NewCommand,
}

/// Which equations receive automatic numbers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    AsRefStr,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TagMode {
    /// Only explicit `\tag` commands produce tags.
    #[default]
    None,
    /// Numbered AMS environments (`equation`, `align`, ...) are numbered.
    Ams,
    /// Every displayed equation is numbered.
    All,
}

/// Side on which equation tags are placed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    AsRefStr,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TagSide {
    /// Tags on the left.
    Left,
    /// Tags on the right.
    #[default]
    Right,
}

/// How a failed expression is presented by [`crate::core::render`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    AsRefStr,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Show the error message and discard the source.
    #[default]
    Strict,
    /// Echo the offending source text inside the error box.
    Verbatim,
}

/// Digit-grouping pattern used when reading numbers.
///
/// A number is a run of digits, optionally followed by further groups of
/// exactly `group_size` digits each introduced by `separator`, and an
/// optional fractional part after `decimal`. With the defaults `1{,}000.5`
/// is read as a single `mn` holding `1,000.5`. Braces in the separator are
/// dropped from the resulting text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitGrouping {
    /// Literal text separating digit groups, or `None` to disable grouping.
    pub separator: Option<String>,
    /// Number of digits in each group after the first.
    pub group_size: usize,
    /// Decimal point character.
    pub decimal: char,
}

impl Default for DigitGrouping {
    fn default() -> Self {
        Self {
            separator: Some("{,}".to_owned()),
            group_size: 3,
            decimal: '.',
        }
    }
}

impl DigitGrouping {
    /// Length in bytes of the number starting at the beginning of `text`,
    /// or `None` if `text` does not start with a number.
    #[must_use]
    pub fn match_number(&self, text: &str) -> Option<usize> {
        let bytes = text.as_bytes();
        let digits = |from: usize| {
            bytes[from..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
        };
        let mut end = digits(0);
        if end > 0 {
            if let Some(sep) = self.separator.as_deref().filter(|s| !s.is_empty()) {
                while text[end..].starts_with(sep) {
                    let run = digits(end + sep.len());
                    if run != self.group_size {
                        break;
                    }
                    end += sep.len() + run;
                }
            }
            if text[end..].starts_with(self.decimal) {
                end += self.decimal.len_utf8();
                end += digits(end);
            }
            return Some(end);
        }
        if text.starts_with(self.decimal) {
            let start = self.decimal.len_utf8();
            let run = digits(start);
            if run > 0 {
                return Some(start + run);
            }
        }
        None
    }
}

/// Configuration consumed read-only by every parse.
///
/// # Cross-references
/// - See [`Settings::builder`] for construction with defaults.
/// - [`crate::core::Document`] pairs settings with per-document state.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Whether expressions are display (block) equations.
    pub display_mode: bool,
    /// Enabled command-table extension sets.
    pub packages: Vec<Package>,
    /// Automatic numbering mode.
    pub tags: TagMode,
    /// Side on which tags are placed.
    pub tag_side: TagSide,
    /// Minimum spacing between a tag and its equation.
    pub tag_indent: String,
    /// Build anchor ids from labels instead of tag numbers.
    pub use_label_ids: bool,
    /// Silently accept a label defined twice.
    pub ignore_duplicate_labels: bool,
    /// Prefix for reference links.
    pub base_url: String,
    /// How numbers are recognised.
    pub digits: DigitGrouping,
    /// Ceiling on macro and environment substitutions per expression.
    pub max_macros: usize,
    /// Ceiling on the size of the expanded source buffer, in bytes.
    pub max_buffer: usize,
    /// How failed expressions are presented.
    pub error_mode: ErrorMode,
    /// Macros available before any `\newcommand`.
    pub macros: Vec<(String, MacroDefinition)>,
}

#[bon]
impl Settings {
    /// Creates a new [`Settings`] from optional values.
    ///
    /// # Default Values
    /// - `display_mode`: `false`
    /// - `packages`: base, ams and newcommand
    /// - `tags`: [`TagMode::None`]
    /// - `tag_side`: [`TagSide::Right`]
    /// - `tag_indent`: `"0.8em"`
    /// - `use_label_ids`: `true`
    /// - `ignore_duplicate_labels`: `false`
    /// - `base_url`: `""`
    /// - `digits`: [`DigitGrouping::default`]
    /// - `max_macros`: `1000`
    /// - `max_buffer`: `5 * 1024`
    /// - `error_mode`: [`ErrorMode::Strict`]
    /// - `macros`: none
    #[must_use]
    #[builder]
    pub fn new(
        /// Display mode (true for block, false for inline).
        display_mode: Option<bool>,
        /// Enabled packages; `Base` is implied.
        packages: Option<Vec<Package>>,
        /// Automatic numbering mode.
        tags: Option<TagMode>,
        /// Tag side.
        tag_side: Option<TagSide>,
        /// Tag indent as a length.
        tag_indent: Option<String>,
        /// Use label names for anchor ids.
        use_label_ids: Option<bool>,
        /// Accept duplicate labels.
        ignore_duplicate_labels: Option<bool>,
        /// Prefix for reference links.
        base_url: Option<String>,
        /// Digit grouping pattern.
        digits: Option<DigitGrouping>,
        /// Substitution ceiling.
        max_macros: Option<usize>,
        /// Buffer ceiling.
        max_buffer: Option<usize>,
        /// Error presentation.
        error_mode: Option<ErrorMode>,
        /// Predefined macros.
        macros: Option<Vec<(String, MacroDefinition)>>,
    ) -> Self {
        Self {
            display_mode: display_mode.unwrap_or(false),
            packages: packages
                .unwrap_or_else(|| vec![Package::Base, Package::Ams, Package::NewCommand]),
            tags: tags.unwrap_or_default(),
            tag_side: tag_side.unwrap_or_default(),
            tag_indent: tag_indent.unwrap_or_else(|| "0.8em".to_owned()),
            use_label_ids: use_label_ids.unwrap_or(true),
            ignore_duplicate_labels: ignore_duplicate_labels.unwrap_or(false),
            base_url: base_url.unwrap_or_default(),
            digits: digits.unwrap_or_default(),
            max_macros: max_macros.unwrap_or(1000),
            max_buffer: max_buffer.unwrap_or(5 * 1024),
            error_mode: error_mode.unwrap_or_default(),
            macros: macros.unwrap_or_default(),
        }
    }

    /// Whether `package` is enabled. `Base` always is.
    #[must_use]
    pub fn has_package(&self, package: Package) -> bool {
        package == Package::Base || self.packages.contains(&package)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr as _;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_macros, 1000);
        assert_eq!(settings.tag_side, TagSide::Right);
        assert_eq!(settings.error_mode, ErrorMode::Strict);
        assert!(settings.has_package(Package::Ams));
    }

    #[test]
    fn test_base_is_always_enabled() {
        let settings = Settings::builder().packages(vec![]).build();
        assert!(settings.has_package(Package::Base));
        assert!(!settings.has_package(Package::NewCommand));
    }

    #[test]
    fn test_enums_parse_from_strings() {
        assert_eq!(Package::from_str("newcommand").ok(), Some(Package::NewCommand));
        assert_eq!(TagMode::from_str("ams").ok(), Some(TagMode::Ams));
        assert_eq!(ErrorMode::from_str("verbatim").ok(), Some(ErrorMode::Verbatim));
    }

    #[test]
    fn test_digit_grouping() {
        let digits = DigitGrouping::default();
        assert_eq!(digits.match_number("123+4"), Some(3));
        assert_eq!(digits.match_number("1{,}000{,}00x"), Some(7));
        assert_eq!(digits.match_number("3.14159"), Some(7));
        assert_eq!(digits.match_number(".5"), Some(2));
        assert_eq!(digits.match_number("."), None);
        assert_eq!(digits.match_number("x1"), None);
    }
}
