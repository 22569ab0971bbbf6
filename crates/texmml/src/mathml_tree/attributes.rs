//! Attribute whitelist for explicitly constructed tokens.
//!
//! `\mmlToken{mo}[stretchy="true"]{|}` may set any attribute the element
//! defines, plus a short list of presentation attributes that every token
//! accepts. Values are checked against the attribute's type.

use phf::phf_map;

use super::MathNodeType;
use crate::types::{ParseError, ParseErrorKind};
use crate::units::is_length;

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    /// `true` or `false`
    Bool,
    /// A length, see [`is_length`]
    Length,
    /// Any string
    Text,
    /// One of the listed keywords
    Choice(&'static [&'static str]),
}

impl AttrType {
    /// Whether `value` is acceptable for this type.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Bool => matches!(value, "true" | "false"),
            Self::Length => is_length(value),
            Self::Text => true,
            Self::Choice(options) => options.contains(&value),
        }
    }
}

const VARIANTS: &[&str] = &[
    "normal",
    "bold",
    "italic",
    "bold-italic",
    "double-struck",
    "bold-fraktur",
    "script",
    "bold-script",
    "fraktur",
    "sans-serif",
    "bold-sans-serif",
    "sans-serif-italic",
    "sans-serif-bold-italic",
    "monospace",
];

const LINEBREAK: &[&str] = &["auto", "newline", "nobreak", "goodbreak", "badbreak"];

/// Attributes of every token element.
static TOKEN: phf::Map<&'static str, AttrType> = phf_map! {
    "mathbackground" => AttrType::Text,
    "mathcolor" => AttrType::Text,
    "mathsize" => AttrType::Text,
    "mathvariant" => AttrType::Choice(VARIANTS),
    "dir" => AttrType::Choice(&["ltr", "rtl"]),
};

/// Presentation attributes accepted on any token.
static ALLOWED: phf::Map<&'static str, AttrType> = phf_map! {
    "fontfamily" => AttrType::Text,
    "fontsize" => AttrType::Text,
    "fontweight" => AttrType::Text,
    "fontstyle" => AttrType::Text,
    "color" => AttrType::Text,
    "background" => AttrType::Text,
    "id" => AttrType::Text,
    "class" => AttrType::Text,
    "href" => AttrType::Text,
    "style" => AttrType::Text,
};

static MO: phf::Map<&'static str, AttrType> = phf_map! {
    "form" => AttrType::Choice(&["prefix", "infix", "postfix"]),
    "fence" => AttrType::Bool,
    "separator" => AttrType::Bool,
    "lspace" => AttrType::Length,
    "rspace" => AttrType::Length,
    "stretchy" => AttrType::Bool,
    "symmetric" => AttrType::Bool,
    "maxsize" => AttrType::Text,
    "minsize" => AttrType::Length,
    "largeop" => AttrType::Bool,
    "movablelimits" => AttrType::Bool,
    "accent" => AttrType::Bool,
    "linebreak" => AttrType::Choice(LINEBREAK),
    "lineleading" => AttrType::Length,
    "linebreakstyle" => AttrType::Choice(&["before", "after", "duplicate", "infixlinebreakstyle"]),
    "linebreakmultchar" => AttrType::Text,
    "indentalign" => AttrType::Choice(&["left", "center", "right", "auto", "id", "indentalign"]),
    "indentshift" => AttrType::Length,
    "indenttarget" => AttrType::Text,
    "indentalignfirst" => AttrType::Text,
    "indentshiftfirst" => AttrType::Text,
    "indentalignlast" => AttrType::Text,
    "indentshiftlast" => AttrType::Text,
};

static MSPACE: phf::Map<&'static str, AttrType> = phf_map! {
    "width" => AttrType::Length,
    "height" => AttrType::Length,
    "depth" => AttrType::Length,
    "linebreak" => AttrType::Choice(LINEBREAK),
};

static MS: phf::Map<&'static str, AttrType> = phf_map! {
    "lquote" => AttrType::Text,
    "rquote" => AttrType::Text,
};

/// Type of attribute `name` on a token of kind `kind`, if it may be set.
#[must_use]
pub fn attribute_type(kind: MathNodeType, name: &str) -> Option<AttrType> {
    let own = match kind {
        MathNodeType::Mo => MO.get(name),
        MathNodeType::Mspace => MSPACE.get(name),
        MathNodeType::Ms => MS.get(name),
        _ => None,
    };
    own.or_else(|| TOKEN.get(name))
        .or_else(|| ALLOWED.get(name))
        .copied()
}

/// Check one `name="value"` pair for a token of kind `kind`.
pub fn validate(kind: MathNodeType, name: &str, value: &str) -> Result<(), ParseError> {
    let Some(ty) = attribute_type(kind, name) else {
        return Err(ParseError::new(ParseErrorKind::UnknownAttrForElement {
            attr: name.to_owned(),
            kind: kind.as_ref().to_owned(),
        }));
    };
    if !ty.accepts(value) {
        return Err(ParseError::new(ParseErrorKind::InvalidAttrValue {
            value: value.to_owned(),
            attr: name.to_owned(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_specific_attributes() {
        assert_eq!(
            attribute_type(MathNodeType::Mo, "stretchy"),
            Some(AttrType::Bool)
        );
        assert_eq!(attribute_type(MathNodeType::Mi, "stretchy"), None);
        assert_eq!(
            attribute_type(MathNodeType::Mspace, "width"),
            Some(AttrType::Length)
        );
    }

    #[test]
    fn test_allow_list_applies_to_every_token() {
        for kind in [MathNodeType::Mi, MathNodeType::Mn, MathNodeType::Mtext] {
            assert!(attribute_type(kind, "color").is_some());
            assert!(attribute_type(kind, "href").is_some());
        }
    }

    #[test]
    fn test_validate() {
        assert!(validate(MathNodeType::Mo, "fence", "true").is_ok());
        let err = validate(MathNodeType::Mo, "fence", "yes").unwrap_err();
        assert_eq!(err.id(), "InvalidAttrValue");
        let err = validate(MathNodeType::Mi, "bogus", "1").unwrap_err();
        assert_eq!(err.id(), "UnknownAttrForElement");
        assert!(validate(MathNodeType::Mi, "mathvariant", "bold").is_ok());
        assert!(validate(MathNodeType::Mspace, "width", "1em").is_ok());
        assert!(validate(MathNodeType::Mspace, "width", "wide").is_err());
    }
}
