#![forbid(unsafe_code)]

//! Pass-through field configuration.
//!
//! [`FieldConfig`] is copied onto the control on every refresh. Apart from
//! `default_region`, which also feeds the parser, nothing here affects
//! reconciliation.
//!
//! # Example
//!
//! ```
//! use phonefield_style::{BorderStyle, Color};
//! use phonefield_widgets::{FieldConfig, FieldFlags};
//!
//! let config = FieldConfig::default()
//!     .max_digits(15)
//!     .border(BorderStyle::RoundedRect)
//!     .text_color(Color::BLACK)
//!     .flag(FieldFlags::CLEAR_ON_BEGIN_EDITING, true);
//!
//! assert!(config.flags.contains(FieldFlags::CLEAR_ON_BEGIN_EDITING));
//! assert!(config.is_enabled());
//! ```

use bitflags::bitflags;
use phonefield_number::{RegionCode, metadata};
use phonefield_style::{BorderStyle, Color, Font, TextAlignment};

bitflags! {
    /// Boolean toggles forwarded to the control.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct FieldFlags: u8 {
        /// Show the country flag next to the text.
        const FLAG_VISIBLE = 1 << 0;
        /// Tapping the flag opens a country picker.
        const FLAG_SELECTABLE = 1 << 1;
        /// Clear the text when editing begins.
        const CLEAR_ON_BEGIN_EDITING = 1 << 2;
        /// The first insertion after editing begins replaces the text.
        const CLEAR_ON_INSERTION = 1 << 3;
        /// Accept user input.
        const ENABLED = 1 << 4;
        /// Use an example number as the placeholder when none is set.
        const EXAMPLE_PLACEHOLDER = 1 << 5;
        /// Prefix the placeholder with the region's calling code.
        const PREFIX = 1 << 6;
    }
}

impl Default for FieldFlags {
    fn default() -> Self {
        Self::FLAG_VISIBLE | Self::FLAG_SELECTABLE | Self::ENABLED
    }
}

/// Configuration applied to the control on each refresh.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct FieldConfig {
    /// Maximum number of digits the control accepts. `None` is unlimited.
    pub max_digits: Option<usize>,
    pub font: Font,
    pub text_color: Color,
    /// Cursor and selection color.
    pub accent_color: Color,
    /// Explicit placeholder text.
    pub placeholder: Option<String>,
    pub placeholder_color: Color,
    /// Color of the calling-code prefix inside the placeholder.
    pub placeholder_prefix_color: Color,
    pub border: BorderStyle,
    pub alignment: TextAlignment,
    pub flags: FieldFlags,
    /// Region used to resolve numbers typed without a calling code.
    pub default_region: Option<RegionCode>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_digits: None,
            font: Font::default(),
            text_color: Color::BLACK,
            accent_color: Color::BLUE,
            placeholder: None,
            placeholder_color: Color::GRAY,
            placeholder_prefix_color: Color::GRAY,
            border: BorderStyle::None,
            alignment: TextAlignment::Natural,
            flags: FieldFlags::default(),
            default_region: None,
        }
    }
}

impl FieldConfig {
    #[must_use]
    pub fn max_digits(mut self, max: usize) -> Self {
        self.max_digits = Some(max);
        self
    }

    #[must_use]
    pub fn font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    #[must_use]
    pub fn accent_color(mut self, color: Color) -> Self {
        self.accent_color = color;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    #[must_use]
    pub fn placeholder_color(mut self, color: Color) -> Self {
        self.placeholder_color = color;
        self
    }

    #[must_use]
    pub fn placeholder_prefix_color(mut self, color: Color) -> Self {
        self.placeholder_prefix_color = color;
        self
    }

    #[must_use]
    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Turn a single flag on or off.
    #[must_use]
    pub fn flag(mut self, flag: FieldFlags, on: bool) -> Self {
        self.flags.set(flag, on);
        self
    }

    #[must_use]
    pub fn default_region(mut self, region: Option<RegionCode>) -> Self {
        self.default_region = region;
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(FieldFlags::ENABLED)
    }

    /// Placeholder the control should show.
    ///
    /// An explicit placeholder wins. Otherwise, with
    /// [`FieldFlags::EXAMPLE_PLACEHOLDER`] and a known default region, a
    /// digit mask of the region's longest national number, optionally
    /// preceded by `+<calling code>` when [`FieldFlags::PREFIX`] is set.
    #[must_use]
    pub fn effective_placeholder(&self) -> Option<String> {
        if let Some(text) = &self.placeholder {
            return Some(text.clone());
        }
        if !self.flags.contains(FieldFlags::EXAMPLE_PLACEHOLDER) {
            return None;
        }
        let meta = metadata::for_region(self.default_region?)?;
        let mask = "0".repeat(*meta.national_lengths.end());
        if self.flags.contains(FieldFlags::PREFIX) {
            Some(format!("+{} {mask}", meta.calling_code))
        } else {
            Some(mask)
        }
    }
}

#[cfg(feature = "config-file")]
pub use file::ConfigError;

#[cfg(feature = "config-file")]
mod file {
    use std::fmt;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    use super::FieldConfig;

    /// Error returned when a configuration file cannot be loaded.
    #[derive(Debug)]
    pub enum ConfigError {
        /// The file could not be read.
        Io { path: PathBuf, source: io::Error },
        /// The contents were not valid configuration TOML.
        Parse(toml::de::Error),
    }

    impl fmt::Display for ConfigError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Io { path, source } => {
                    write!(f, "cannot read field config {}: {source}", path.display())
                }
                Self::Parse(err) => write!(f, "invalid field config: {err}"),
            }
        }
    }

    impl std::error::Error for ConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                Self::Io { source, .. } => Some(source),
                Self::Parse(err) => Some(err),
            }
        }
    }

    impl FieldConfig {
        /// Parse a configuration from TOML. Missing keys take their defaults.
        ///
        /// # Errors
        ///
        /// [`ConfigError::Parse`] on malformed TOML or invalid values.
        pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
            toml::from_str(text).map_err(ConfigError::Parse)
        }

        /// Read and parse a TOML configuration file.
        ///
        /// # Errors
        ///
        /// [`ConfigError::Io`] if the file cannot be read, otherwise as
        /// [`FieldConfig::from_toml_str`].
        pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let path = path.as_ref();
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let config = Self::from_toml_str(&text)?;
            tracing::debug!(path = %path.display(), "loaded field config");
            Ok(config)
        }
    }

}
