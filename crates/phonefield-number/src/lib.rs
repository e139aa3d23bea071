#![forbid(unsafe_code)]

//! Phone number parsing contract for phonefield.
//!
//! This crate provides:
//! - [`RegionCode`] for default-region configuration
//! - [`ParsedNumber`] and [`ParseError`], the two outcomes of a parse
//! - [`PhoneNumberParser`], the seam the sync coordinator depends on
//! - [`MetadataParser`], the built-in table-driven implementation
//!
//! Parsing is deliberately narrow: it resolves a country calling code and a
//! national significant number. As-you-type grouping and per-number-type
//! validation are out of scope.

pub mod metadata;
pub mod number;
pub mod parser;
pub mod region;

#[cfg(feature = "libphonenumber")]
pub mod libphonenumber;

pub use number::{ParseError, ParsedNumber};
pub use parser::{MetadataParser, PhoneNumberParser};
pub use region::{RegionCode, RegionCodeError};

#[cfg(feature = "libphonenumber")]
pub use libphonenumber::LibPhoneNumberParser;
