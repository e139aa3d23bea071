#![forbid(unsafe_code)]

//! Parsed phone number value and parse failures.

use std::fmt;

/// A successfully parsed phone number.
///
/// The national number is kept as a string so that significant leading
/// zeros (Italian fixed lines, for example) survive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedNumber {
    /// Country calling code without the leading `+` (e.g. `1`, `44`).
    pub country_code: u16,
    /// National significant number, digits only.
    pub national_number: String,
}

impl ParsedNumber {
    #[must_use]
    pub fn new(country_code: u16, national_number: impl Into<String>) -> Self {
        Self {
            country_code,
            national_number: national_number.into(),
        }
    }

    /// Digit-only canonical form: `+<country_code><national_number>`.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("+{}{}", self.country_code, self.national_number)
    }
}

impl fmt::Display for ParsedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}{}", self.country_code, self.national_number)
    }
}

/// Why a piece of text did not parse as a phone number.
///
/// Failures are expected while the user is still typing; callers treat
/// them as a normal outcome rather than an exceptional one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseError {
    /// The text was empty or whitespace only.
    Empty,
    /// The text contained characters that cannot appear in a phone number.
    NotANumber,
    /// No country calling code could be determined, either because the
    /// `+` prefix was followed by an unknown code or because no default
    /// region was configured for a national number.
    InvalidCountryCode,
    /// Too few digits for the resolved region.
    TooShort,
    /// Too many digits for the resolved region.
    TooLong,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "phone number is empty"),
            Self::NotANumber => write!(f, "text is not a phone number"),
            Self::InvalidCountryCode => write!(f, "could not determine country calling code"),
            Self::TooShort => write!(f, "phone number is too short"),
            Self::TooLong => write!(f, "phone number is too long"),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_concatenates_code_and_national() {
        let n = ParsedNumber::new(1, "4155551234");
        assert_eq!(n.canonical(), "+14155551234");
        assert_eq!(n.to_string(), n.canonical());
    }

    #[test]
    fn canonical_keeps_leading_zero() {
        let n = ParsedNumber::new(39, "0612345678");
        assert_eq!(n.canonical(), "+390612345678");
    }

    #[test]
    fn parse_error_messages() {
        assert_eq!(ParseError::Empty.to_string(), "phone number is empty");
        assert_eq!(ParseError::TooLong.to_string(), "phone number is too long");
    }
}
