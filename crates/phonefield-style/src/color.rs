#![forbid(unsafe_code)]

//! Packed RGBA colors with hex parsing.

use std::fmt;
use std::str::FromStr;

/// An sRGB color with alpha, packed as `0xRRGGBBAA`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// iOS system gray, the conventional placeholder color.
    pub const GRAY: Self = Self::rgb(142, 142, 147);
    /// iOS system blue, the conventional accent color.
    pub const BLUE: Self = Self::rgb(0, 122, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[must_use]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    ///
    /// # Errors
    ///
    /// [`ColorParseError`] when the length or a digit is invalid.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(bad));
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| ColorParseError::InvalidLength(hex.len()));
        match hex.len() {
            3 => {
                let v = value?;
                let expand = |nibble: u32| ((nibble & 0xF) * 0x11) as u8;
                Ok(Self::rgb(expand(v >> 8), expand(v >> 4), expand(v)))
            }
            6 => Ok(Self((value? << 8) | 0xFF)),
            8 => Ok(Self(value?)),
            n => Err(ColorParseError::InvalidLength(n)),
        }
    }

    /// `#RRGGBB` when opaque, `#RRGGBBAA` otherwise.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a() == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r(), self.g(), self.b())
        } else {
            format!("#{:08X}", self.0)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Error returned by [`Color::from_hex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Hex body was not 3, 6 or 8 digits long.
    InvalidLength(usize),
    /// A character was not a hex digit.
    InvalidDigit(char),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(n) => write!(f, "hex color must have 3, 6 or 8 digits, got {n}"),
            Self::InvalidDigit(c) => write!(f, "invalid hex digit {c:?}"),
        }
    }
}

impl std::error::Error for ColorParseError {}
