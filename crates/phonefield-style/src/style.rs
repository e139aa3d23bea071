#![forbid(unsafe_code)]

//! Font, alignment and border descriptors.
//!
//! These are plain values handed to the control as-is. Nothing here
//! measures or renders text.

use std::fmt;

/// Font weight on the usual 100..=900 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
}

impl FontWeight {
    /// Numeric CSS-style weight.
    #[must_use]
    pub const fn value(self) -> u16 {
        match self {
            Self::Light => 300,
            Self::Regular => 400,
            Self::Medium => 500,
            Self::Semibold => 600,
            Self::Bold => 700,
        }
    }
}

/// Font descriptor.
///
/// `family: None` means the platform system font.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Font {
    pub family: Option<String>,
    pub size: f32,
    pub weight: FontWeight,
}

impl Font {
    /// Default body text size in points.
    pub const DEFAULT_SIZE: f32 = 17.0;

    /// The system font at `size`.
    #[must_use]
    pub fn system(size: f32) -> Self {
        Self {
            family: None,
            size,
            weight: FontWeight::Regular,
        }
    }

    #[must_use]
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    #[must_use]
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Same font at another size. Non-finite or non-positive sizes keep
    /// the current size.
    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        if size.is_finite() && size > 0.0 {
            self.size = size;
        }
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(Self::DEFAULT_SIZE)
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family = self.family.as_deref().unwrap_or("system");
        write!(f, "{family} {}pt/{}", self.size, self.weight.value())
    }
}

/// Horizontal text alignment inside the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TextAlignment {
    Leading,
    Center,
    Trailing,
    /// Follows the writing direction of the current locale.
    #[default]
    Natural,
}

/// Border drawn around the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BorderStyle {
    #[default]
    None,
    Line,
    Bezel,
    RoundedRect,
}

impl BorderStyle {
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_font_is_system_body() {
        let font = Font::default();
        assert_eq!(font.family, None);
        assert_eq!(font.size, Font::DEFAULT_SIZE);
        assert_eq!(font.weight, FontWeight::Regular);
        assert_eq!(font.to_string(), "system 17pt/400");
    }

    #[test]
    fn font_builder() {
        let font = Font::system(14.0).family("Menlo").weight(FontWeight::Bold);
        assert_eq!(font.family.as_deref(), Some("Menlo"));
        assert_eq!(font.weight.value(), 700);
    }

    #[test]
    fn with_size_rejects_nonsense() {
        let font = Font::system(12.0);
        assert_eq!(font.clone().with_size(-1.0).size, 12.0);
        assert_eq!(font.clone().with_size(f32::NAN).size, 12.0);
        assert_eq!(font.with_size(20.0).size, 20.0);
    }

    #[test]
    fn weights_are_ordered() {
        assert!(FontWeight::Light < FontWeight::Bold);
        assert!(FontWeight::Medium.value() < FontWeight::Semibold.value());
    }

    #[test]
    fn border_visibility() {
        assert!(!BorderStyle::None.is_visible());
        assert!(BorderStyle::RoundedRect.is_visible());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&BorderStyle::RoundedRect).unwrap(), "\"rounded_rect\"");
        let align: TextAlignment = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(align, TextAlignment::Center);
        let font: Font = serde_json::from_str(r#"{"size": 12.0}"#).unwrap();
        assert_eq!(font, Font::system(12.0));
    }
}
