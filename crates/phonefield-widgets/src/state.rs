#![forbid(unsafe_code)]

//! Formatting mode and edit state.

use phonefield_number::ParsedNumber;

/// How the caller-facing value is derived from the displayed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FormattingMode {
    /// The value mirrors the displayed text byte for byte.
    #[default]
    Verbatim,
    /// The value is `+<country code><national number>`, or empty when the
    /// text does not parse.
    Canonical,
}

impl FormattingMode {
    /// External value for `text` given its parse result.
    #[must_use]
    pub fn external_value(self, text: &str, number: Option<&ParsedNumber>) -> String {
        match self {
            Self::Verbatim => text.to_owned(),
            Self::Canonical => number.map(ParsedNumber::canonical).unwrap_or_default(),
        }
    }
}

/// Whether the user is currently editing the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditState {
    #[default]
    Idle,
    Editing,
}
