//! Structured parse errors.
//!
//! Every failure raised while interpreting an expression is a
//! [`ParseError`] wrapping a [`ParseErrorKind`]. A kind carries three
//! things: a stable message id ([`ParseErrorKind::id`]), a message template
//! ([`ParseErrorKind::template`]) and the named values substituted into it
//! ([`ParseErrorKind::args`]). The rendered [`Display`](core::fmt::Display)
//! form is the template with its arguments filled in.
//!
//! Kinds are grouped into an [`ErrorCategory`] so callers can react to a
//! family of failures (for example every [`ErrorCategory::ResourceLimit`])
//! without matching individual variants.

use alloc::boxed::Box;
use alloc::vec::Vec;
#[cfg(feature = "backtrace")]
use std::backtrace::Backtrace;

use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Error raised when an expression cannot be interpreted.
///
/// Parsing never recovers from one of these mid-expression: the driver in
/// [`crate::core`] either returns it to the caller or replaces the whole
/// expression with a single error node.
///
/// # Cross-references
/// - [`ParseErrorKind`] for the individual failure reasons.
/// - [`crate::core::render`] for the error-node substitution.
#[derive(Debug, Error)]
#[error("TeX parse error: {kind}")]
pub struct ParseError {
    /// Categorised reason for the failure.
    #[source]
    pub kind: Box<ParseErrorKind>,
    /// Backtrace captured where the error was created.
    #[cfg(feature = "backtrace")]
    pub backtrace: Box<Backtrace>,
}

impl ParseError {
    /// Create a new error of the given kind.
    pub fn new<T: Into<ParseErrorKind>>(kind: T) -> Self {
        Self {
            kind: Box::new(kind.into()),
            #[cfg(feature = "backtrace")]
            backtrace: Box::new(Backtrace::force_capture()),
        }
    }

    /// Message id of the underlying kind, e.g. `"DoubleExponent"`.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    /// Category of the underlying kind.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// The rendered message without the `TeX parse error:` prefix.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Families of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorCategory {
    /// Unmatched brace, bracket, fence or environment.
    MalformedGrouping,
    /// A required argument is missing or has the wrong form.
    MalformedArgument,
    /// Double scripts, a second `\over`, a prime clashing with an exponent.
    AmbiguousConstruct,
    /// A command used outside the only context where it is valid.
    MisplacedCommand,
    /// Undefined control sequence, environment, element or attribute.
    UnknownName,
    /// The substitution or buffer ceiling was exceeded.
    ResourceLimit,
    /// A length literal could not be parsed.
    DimensionFormat,
}

macro_rules! define_error_kinds {
    ($(
        $(#[$meta:meta])*
        $variant:ident $({ $($field:ident),+ $(,)? })? => $category:ident, $template:literal;
    )+) => {
        /// Describes the specific reason for a [`ParseError`].
        ///
        /// Field values are the substitution arguments of the variant's
        /// template; see [`ParseErrorKind::args`].
        #[allow(missing_docs)]
        #[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
        pub enum ParseErrorKind {
            $(
                $(#[$meta])*
                #[error($template)]
                $variant $({ $($field: String),+ })?,
            )+
        }

        impl ParseErrorKind {
            /// Message template in format-string syntax: `{field}` marks a
            /// substitution argument, doubled braces are literal braces.
            #[must_use]
            pub const fn template(&self) -> &'static str {
                match self {
                    $( Self::$variant { .. } => $template, )+
                }
            }

            /// Category this kind belongs to.
            #[must_use]
            pub const fn category(&self) -> ErrorCategory {
                match self {
                    $( Self::$variant { .. } => ErrorCategory::$category, )+
                }
            }

            /// Named substitution arguments, in template order.
            #[must_use]
            pub fn args(&self) -> Vec<(&'static str, &str)> {
                match self {
                    $(
                        Self::$variant $({ $($field),+ })? => {
                            alloc::vec![$($( (stringify!($field), $field.as_str()) ),+)?]
                        }
                    )+
                }
            }
        }
    };
}

define_error_kinds! {
    // Grouping
    ExtraOpenMissingClose => MalformedGrouping, "Extra open brace or missing close brace";
    ExtraCloseMissingOpen => MalformedGrouping, "Extra close brace or missing open brace";
    MissingCloseBrace => MalformedGrouping, "Missing close brace";
    MissingCloseBracket { name } => MalformedGrouping,
        "Could not find closing ']' for argument to {name}";
    ExtraCloseLooking { token } => MalformedGrouping,
        "Extra close brace while looking for {token}";
    TokenNotFoundForCommand { token, name } => MalformedGrouping,
        "Could not find {token} for {name}";
    ExtraLeftMissingRight => MalformedGrouping, r"Extra \left or missing \right";
    MissingLeftExtraRight => MalformedGrouping, r"Missing \left or extra \right";
    ExtraMiddle => MalformedGrouping, r"Extra \middle";
    EnvBadEnd { begin, end } => MalformedGrouping,
        r"\begin{{{begin}}} ended with \end{{{end}}}";
    EnvMissingEnd { name } => MalformedGrouping, r"Missing \end{{{name}}}";
    MissingBeginExtraEnd { name } => MalformedGrouping,
        r"Missing \begin{{{name}}} or extra \end{{{name}}}";
    MathNotTerminated => MalformedGrouping, "Math not terminated in text box";

    // Arguments
    MissingArgFor { name } => MalformedArgument, "Missing argument for {name}";
    MissingOrUnrecognizedDelim { name } => MalformedArgument,
        "Missing or unrecognized delimiter for {name}";
    MissingScript => MalformedArgument, "Missing superscript or subscript argument";
    MissingOpenForSup => MalformedArgument, "Missing open brace for superscript";
    MissingOpenForSub => MalformedArgument, "Missing open brace for subscript";
    MissingBoxFor { name } => MalformedArgument, "Missing box for {name}";
    IntegerArg { name } => MalformedArgument, "The argument to {name} must be an integer";
    IllegalMacroParam => MalformedArgument, "Illegal macro parameter reference";
    IllegalControlSequenceName { name } => MalformedArgument,
        "Illegal control sequence name for {name}";
    IllegalParamNumber { name } => MalformedArgument,
        "Illegal number of parameters specified in {name}";
    MissingCS { name } => MalformedArgument, "{name} must be followed by a control sequence";
    InvalidEnv { name } => MalformedArgument, "Invalid environment name '{name}'";
    InvalidMathMLAttr { attr } => MalformedArgument, "Invalid MathML attribute: {attr}";
    InvalidAttrValue { value, attr } => MalformedArgument,
        "Invalid value '{value}' for attribute {attr}";
    IllegalAlign { name } => MalformedArgument, "Illegal alignment specified in {name}";
    BadMathStyleFor { name } => MalformedArgument, "Bad math style for {name}";
    ModelArg1 { model, count } => MalformedArgument,
        "Color values for the {model} model require {count} numbers";
    ModelArg2 { model, min, max } => MalformedArgument,
        "Color values for the {model} model must be between {min} and {max}";
    InvalidDecimalNumber { value } => MalformedArgument, "Invalid decimal number '{value}'";
    InvalidNumber { value } => MalformedArgument, "Invalid number '{value}'";
    InvalidHTMLColor { value } => MalformedArgument, "Invalid HTML color '{value}'";
    CantUseHash => MalformedArgument,
        "You can't use 'macro parameter character #' in math mode";

    // Ambiguity
    DoubleExponent => AmbiguousConstruct, "Double exponent: use braces to clarify";
    DoubleSubscripts => AmbiguousConstruct, "Double subscripts: use braces to clarify";
    DoubleExponentPrime => AmbiguousConstruct,
        "Prime causes double exponent: use braces to clarify";
    AmbiguousUseOf { name } => AmbiguousConstruct, "Ambiguous use of {name}";
    MultipleCommand { name } => AmbiguousConstruct, "Multiple {name}";
    MultipleLabel { label } => AmbiguousConstruct, "Label '{label}' multiply defined";
    MultipleMoveRoot { name } => AmbiguousConstruct, "Multiple use of {name}";

    // Placement
    Misplaced { name } => MisplacedCommand, "Misplaced {name}";
    MisplacedLimits { name } => MisplacedCommand, "{name} is allowed only on operators";
    MisplacedMoveRoot { name } => MisplacedCommand, "{name} can appear only within a root";
    UnsupportedHFill { name } => MisplacedCommand, "Unsupported use of {name}";
    CommandNotAllowedInEnv { name, env } => MisplacedCommand,
        "{name} not allowed in {env} environment";
    ErroneousNestingEq => MisplacedCommand, "Erroneous nesting of equation structures";
    ExtraAlignTab => MisplacedCommand, r"Extra alignment tab in \cases text";
    MultlineRowsOneCol { env } => MisplacedCommand,
        "The rows within the {env} environment must have exactly one column";

    // Names
    UndefinedControlSequence { name } => UnknownName, "Undefined control sequence {name}";
    UnknownEnv { name } => UnknownName, "Unknown environment '{name}'";
    InvalidModel { model } => UnknownName, "Undefined color model '{model}'";
    NotMathMLToken { kind } => UnknownName, "{kind} is not a token element";
    UnknownAttrForElement { attr, kind } => UnknownName,
        "{attr} is not a recognized attribute for {kind}";

    // Limits
    MaxMacroSub1 => ResourceLimit,
        "Maximum macro substitution count exceeded; is there a recursive macro call?";
    MaxMacroSub2 => ResourceLimit,
        "Maximum substitution count exceeded; is there a recursive latex environment?";
    MaxBufferSize => ResourceLimit,
        "Internal buffer size exceeded; is there a recursive macro call?";

    // Dimensions
    MissingDimOrUnits { name } => DimensionFormat, "Missing dimension or its units for {name}";
    BracketMustBeDimension { name } => DimensionFormat,
        "Bracket argument to {name} must be a dimension";
}

impl ParseErrorKind {
    /// Stable message id, identical to the variant name.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator as _;

    #[test]
    fn test_error_display_substitutes_args() {
        let error = ParseError::new(ParseErrorKind::UndefinedControlSequence {
            name: r"\foo".to_owned(),
        });
        assert_eq!(
            error.to_string(),
            r"TeX parse error: Undefined control sequence \foo"
        );
        assert_eq!(error.id(), "UndefinedControlSequence");
        assert_eq!(error.category(), ErrorCategory::UnknownName);
    }

    #[test]
    fn test_id_outlives_the_error() {
        let id = {
            let error: ParseError = ParseErrorKind::MissingScript.into();
            error.id()
        };
        assert_eq!(id, "MissingScript");
    }

    #[test]
    fn test_template_and_args_are_structured() {
        let kind = ParseErrorKind::EnvBadEnd {
            begin: "array".to_owned(),
            end: "matrix".to_owned(),
        };
        assert_eq!(kind.template(), r"\begin{{{begin}}} ended with \end{{{end}}}");
        assert_eq!(kind.args(), vec![("begin", "array"), ("end", "matrix")]);
        assert_eq!(kind.to_string(), r"\begin{array} ended with \end{matrix}");
        assert!(ParseErrorKind::DoubleExponent.args().is_empty());
    }

    #[test]
    fn test_categories_have_kebab_names() {
        let names: Vec<String> = ErrorCategory::iter().map(|c| c.to_string()).collect();
        assert!(names.contains(&"resource-limit".to_owned()));
        assert!(names.contains(&"malformed-grouping".to_owned()));
        assert_eq!(
            ParseErrorKind::MaxMacroSub1.category(),
            ErrorCategory::ResourceLimit
        );
    }
}
