#![forbid(unsafe_code)]

//! Style values for phonefield controls.
//!
//! This crate provides:
//! - [`Color`], a packed RGBA color with hex parsing
//! - [`Font`], [`TextAlignment`] and [`BorderStyle`] descriptors

pub mod color;
pub mod style;

pub use color::{Color, ColorParseError};
pub use style::{BorderStyle, Font, FontWeight, TextAlignment};
