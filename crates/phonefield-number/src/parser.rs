#![forbid(unsafe_code)]

//! The parser contract and the built-in metadata-driven parser.
//!
//! # Accepted input
//!
//! - Digits, whitespace and the punctuation `( ) - . /`.
//! - A single leading `+` introducing a country calling code.
//! - The default region's international dialing prefix (`00`, `011`, ...)
//!   in place of `+`.
//! - An extension suffix introduced by `x`, `ext`, `#`, `;` or `,` after at
//!   least one digit. Extensions are accepted and dropped.
//!
//! # Failure Modes
//!
//! | Failure | Cause |
//! |---------|-------|
//! | `Empty` | Nothing but whitespace |
//! | `NotANumber` | Letters outside an extension, misplaced `+`, no digits |
//! | `InvalidCountryCode` | Unknown `+` code, or national number with no default region |
//! | `TooShort` / `TooLong` | National number outside the region's length range |

use crate::metadata::{self, RegionMetadata};
use crate::number::{ParseError, ParsedNumber};
use crate::region::RegionCode;

/// Longest digit run accepted before any metadata lookup (E.164 max plus
/// room for a dialing prefix).
const MAX_INPUT_DIGITS: usize = 19;

/// Turns raw field text into a [`ParsedNumber`].
///
/// Implementations must be fast and pure: the field calls `parse` on every
/// keystroke on the UI thread.
pub trait PhoneNumberParser {
    /// Parse `text`, resolving national numbers against `default_region`.
    fn parse(
        &self,
        text: &str,
        default_region: Option<RegionCode>,
    ) -> Result<ParsedNumber, ParseError>;
}

impl<F> PhoneNumberParser for F
where
    F: Fn(&str, Option<RegionCode>) -> Result<ParsedNumber, ParseError>,
{
    fn parse(
        &self,
        text: &str,
        default_region: Option<RegionCode>,
    ) -> Result<ParsedNumber, ParseError> {
        self(text, default_region)
    }
}

/// Parser driven by the built-in region metadata table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataParser;

impl MetadataParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PhoneNumberParser for MetadataParser {
    fn parse(
        &self,
        text: &str,
        default_region: Option<RegionCode>,
    ) -> Result<ParsedNumber, ParseError> {
        let extracted = extract_digits(text)?;
        let region = default_region.and_then(metadata::for_region);

        if extracted.plus {
            return parse_international(&extracted.digits);
        }

        if let Some(meta) = region {
            if let Some(rest) = extracted.digits.strip_prefix(meta.international_prefix) {
                if !rest.is_empty() {
                    return parse_international(rest);
                }
            }
            return parse_national(meta, &extracted.digits);
        }

        Err(ParseError::InvalidCountryCode)
    }
}

struct Extracted {
    plus: bool,
    digits: String,
}

fn extract_digits(text: &str) -> Result<Extracted, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let (plus, body) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut digits = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '0'..='9' => digits.push(ch),
            '(' | ')' | '-' | '.' | '/' => {}
            c if c.is_whitespace() => {}
            '#' | ';' | ',' | 'x' | 'X' if !digits.is_empty() => break,
            'e' | 'E' if !digits.is_empty() && is_ext_marker(&body[idx..]) => break,
            _ => return Err(ParseError::NotANumber),
        }
        if digits.len() > MAX_INPUT_DIGITS {
            return Err(ParseError::TooLong);
        }
    }

    if digits.is_empty() {
        return Err(ParseError::NotANumber);
    }
    Ok(Extracted { plus, digits })
}

fn is_ext_marker(rest: &str) -> bool {
    rest.get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("ext"))
}

fn parse_international(digits: &str) -> Result<ParsedNumber, ParseError> {
    let (meta, national) =
        metadata::split_calling_code(digits).ok_or(ParseError::InvalidCountryCode)?;
    parse_national(meta, national)
}

fn parse_national(meta: &RegionMetadata, digits: &str) -> Result<ParsedNumber, ParseError> {
    let lengths = &meta.national_lengths;

    // Trunk prefix written in front of the national number (`020...` in GB,
    // `1 415...` in the US, `+44 (0)20...`). Tried first so that a prefixed
    // number whose full length also fits is not kept with its prefix.
    if let Some(stripped) = meta
        .national_prefix
        .and_then(|prefix| digits.strip_prefix(prefix))
    {
        if lengths.contains(&stripped.len()) {
            return Ok(ParsedNumber::new(meta.calling_code, stripped));
        }
    }

    if lengths.contains(&digits.len()) {
        return Ok(ParsedNumber::new(meta.calling_code, digits));
    }

    // Calling code typed without the `+`.
    let code = meta.calling_code.to_string();
    if let Some(stripped) = digits.strip_prefix(code.as_str()) {
        if lengths.contains(&stripped.len()) {
            return Ok(ParsedNumber::new(meta.calling_code, stripped));
        }
    }

    if digits.len() < *lengths.start() {
        Err(ParseError::TooShort)
    } else {
        Err(ParseError::TooLong)
    }
}
