#![forbid(unsafe_code)]

//! [`PhoneNumberParser`] backed by the `phonenumber` crate, a port of
//! libphonenumber's metadata and parser.
//!
//! Enabled with the `libphonenumber` feature. Library failures map to
//! [`ParseError::NotANumber`]; callers only distinguish success from failure.

use phonenumber::country;

use crate::number::{ParseError, ParsedNumber};
use crate::parser::PhoneNumberParser;
use crate::region::RegionCode;

#[derive(Debug, Clone, Copy, Default)]
pub struct LibPhoneNumberParser;

impl PhoneNumberParser for LibPhoneNumberParser {
    fn parse(
        &self,
        text: &str,
        default_region: Option<RegionCode>,
    ) -> Result<ParsedNumber, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        // Regions unknown to the library parse as if none were configured.
        let region = default_region.and_then(|r| r.as_str().parse::<country::Id>().ok());
        let number = phonenumber::parse(region, text).map_err(|err| {
            tracing::trace!(%err, "libphonenumber rejected text");
            ParseError::NotANumber
        })?;
        Ok(ParsedNumber::new(
            number.code().value(),
            number.national().to_string(),
        ))
    }
}
