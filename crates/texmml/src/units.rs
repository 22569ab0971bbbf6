//! Dimension literals and em conversion.
//!
//! - [`match_dimen`] recognises a TeX length such as `-1.5pt` or `3mu`
//! - [`dimen_to_em`] converts a length to ems
//! - [`make_em`] formats a number as an em string rounded to 3 decimals
//! - [`is_length`] validates a MathML length attribute value

/// Ems per unit for the units a dimension may carry.
fn em_per_unit<T>(unit: &T) -> Option<f64>
where
    T: AsRef<str>,
{
    match unit.as_ref() {
        "em" => Some(1.0),
        "ex" => Some(0.43),
        "pt" => Some(1.0 / 10.0),
        "pc" => Some(1.2),
        "px" => Some(7.2 / 72.0),
        "in" => Some(7.2),
        "cm" => Some(7.2 / 2.54),
        "mm" => Some(7.2 / 25.4),
        "mu" => Some(1.0 / 18.0),
        _ => None,
    }
}

/// Check whether a unit string is a valid length unit.
pub fn valid_unit_str<T>(unit: T) -> bool
where
    T: AsRef<str>,
{
    em_per_unit(&unit).is_some()
}

/// A dimension read from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimen {
    /// The number as written, with a decimal comma turned into a point.
    pub value: String,
    /// Two-letter unit. `mu` lengths are converted to `em`.
    pub unit: String,
    /// Bytes of input consumed, including surrounding spaces.
    pub len: usize,
}

impl Dimen {
    /// `value` and `unit` joined, e.g. `"2pt"`.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}{}", self.value, self.unit)
    }
}

fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Length in bytes of a signed decimal number at the start of `bytes`.
fn number_len(bytes: &[u8]) -> usize {
    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
    i += int;
    if matches!(bytes.get(i), Some(b'.' | b',')) {
        let frac = bytes[i + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if int == 0 && frac == 0 {
            return 0;
        }
        i += 1 + frac;
    } else if int == 0 {
        return 0;
    }
    i
}

/// Match a dimension at the start of `text`.
///
/// With `rest` the dimension may be followed by more input, and one
/// trailing space is consumed. Without it the whole of `text`, apart from
/// surrounding whitespace, must be the dimension.
#[must_use]
pub fn match_dimen(text: &str, rest: bool) -> Option<Dimen> {
    let bytes = text.as_bytes();
    let start = skip_spaces(bytes, 0);
    let len = number_len(&bytes[start..]);
    if len == 0 {
        return None;
    }
    let value = text[start..start + len].replacen(',', ".", 1);
    let unit_start = skip_spaces(bytes, start + len);
    let unit = text.get(unit_start..unit_start + 2)?;
    if !valid_unit_str(unit) {
        return None;
    }
    let mut end = unit_start + 2;
    if rest {
        if bytes.get(end) == Some(&b' ') {
            end += 1;
        }
    } else {
        end = skip_spaces(bytes, end);
        if end != bytes.len() {
            return None;
        }
    }
    if unit == "mu" {
        let number: f64 = value.parse().ok()?;
        let em = make_em(number / 18.0);
        return Some(Dimen {
            value: em.trim_end_matches("em").to_owned(),
            unit: "em".to_owned(),
            len: end,
        });
    }
    Some(Dimen {
        value,
        unit: unit.to_owned(),
        len: end,
    })
}

/// Convert a complete dimension string to ems.
#[must_use]
pub fn dimen_to_em(text: &str) -> Option<f64> {
    let dimen = match_dimen(text, false)?;
    let number: f64 = dimen.value.parse().ok()?;
    Some(number * em_per_unit(&dimen.unit)?)
}

/// Format a number of ems, e.g. `0.167em`. Values too small to matter
/// print as `0em`.
#[must_use]
pub fn make_em(m: f64) -> String {
    if m.abs() < 0.0006 {
        return "0em".to_owned();
    }
    let fixed = format!("{m:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}em")
}

/// Named MathML spaces accepted where a length is expected.
const NAMED_SPACES: [&str; 7] = [
    "veryverythinmathspace",
    "verythinmathspace",
    "thinmathspace",
    "mediummathspace",
    "thickmathspace",
    "verythickmathspace",
    "veryverythickmathspace",
];

/// Whether `value` is usable as a MathML length: a dimension, a unitless
/// number or percentage, or a (possibly negated) named space.
#[must_use]
pub fn is_length(value: &str) -> bool {
    let value = value.trim();
    if match_dimen(value, false).is_some() {
        return true;
    }
    let number = value.strip_suffix('%').unwrap_or(value);
    if !number.is_empty() && number_len(number.as_bytes()) == number.len() {
        return true;
    }
    let named = value.strip_prefix("negative").unwrap_or(value);
    NAMED_SPACES.contains(&named)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_em() {
        assert_eq!(make_em(1.0), "1em");
        assert_eq!(make_em(1.0 / 6.0), "0.167em");
        assert_eq!(make_em(0.0004), "0em");
        assert_eq!(make_em(-0.5), "-0.5em");
    }

    #[test]
    fn test_match_dimen_complete() {
        let dimen = match_dimen(" 2.5pt ", false).unwrap();
        assert_eq!(dimen.text(), "2.5pt");
        assert_eq!(match_dimen("2.5pt x", false), None);
        assert_eq!(match_dimen("pt", false), None);
        assert_eq!(match_dimen("3zz", false), None);
    }

    #[test]
    fn test_match_dimen_rest_consumes_one_space() {
        let dimen = match_dimen("-1em  x", true).unwrap();
        assert_eq!(dimen.text(), "-1em");
        assert_eq!(dimen.len, 5);
    }

    #[test]
    fn test_mu_converts_to_em() {
        let dimen = match_dimen("3mu", false).unwrap();
        assert_eq!(dimen.text(), "0.167em");
        assert_eq!(match_dimen("1,5cm", false).unwrap().value, "1.5");
    }

    #[test]
    fn test_dimen_to_em() {
        assert_eq!(dimen_to_em("10pt"), Some(1.0));
        assert_eq!(dimen_to_em("18mu").map(|em| (em * 1000.0).round()), Some(1000.0));
        assert_eq!(dimen_to_em("x"), None);
    }

    #[test]
    fn test_is_length() {
        assert!(is_length("2px"));
        assert!(is_length("0"));
        assert!(is_length("50%"));
        assert!(is_length("negativethinmathspace"));
        assert!(!is_length("wide"));
    }
}
