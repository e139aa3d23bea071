#![forbid(unsafe_code)]

//! Two-letter ISO 3166-1 region codes.

use std::fmt;
use std::str::FromStr;

/// A validated, uppercase two-letter region code (e.g. `US`, `GB`).
///
/// Region codes are `Copy` so they can live in a `Cell` inside the
/// single-threaded coordinator without borrowing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct RegionCode([u8; 2]);

/// Error returned when a string is not a two-letter region code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionCodeError {
    /// The input did not contain exactly two characters.
    InvalidLength(usize),
    /// The input contained a non-ASCII-alphabetic character.
    InvalidCharacter(char),
}

impl fmt::Display for RegionCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(n) => write!(f, "region code must be 2 letters, got {n}"),
            Self::InvalidCharacter(c) => write!(f, "invalid region code character {c:?}"),
        }
    }
}

impl std::error::Error for RegionCodeError {}

impl RegionCode {
    /// Build a region code from two ASCII letters, normalizing to uppercase.
    ///
    /// Returns `None` when either byte is not an ASCII letter.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 2]) -> Option<Self> {
        if !bytes[0].is_ascii_alphabetic() || !bytes[1].is_ascii_alphabetic() {
            return None;
        }
        Some(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
        ]))
    }

    /// The region code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII letters by construction.
        std::str::from_utf8(&self.0).unwrap_or("ZZ")
    }
}

impl FromStr for RegionCode {
    type Err = RegionCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let count = s.chars().count();
        if count != 2 {
            return Err(RegionCodeError::InvalidLength(count));
        }
        if let Some(bad) = s.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(RegionCodeError::InvalidCharacter(bad));
        }
        let bytes = s.as_bytes();
        Self::from_bytes([bytes[0], bytes[1]]).ok_or(RegionCodeError::InvalidLength(count))
    }
}

impl TryFrom<String> for RegionCode {
    type Error = RegionCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RegionCode> for String {
    fn from(code: RegionCode) -> Self {
        code.as_str().to_owned()
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionCode({})", self.as_str())
    }
}
