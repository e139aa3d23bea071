#![forbid(unsafe_code)]

//! Phone-number field widgets.
//!
//! - [`SyncCoordinator`]: reconciles displayed text, external value and
//!   parsed number
//! - [`PhoneField`]: mounts a coordinator on a [`TextControl`] and pushes
//!   [`FieldConfig`] onto it
//! - [`HeadlessControl`]: an in-memory control for tests and non-visual hosts
//! - [`HandlerSet`]: caller callbacks for lifecycle events

pub mod config;
pub mod control;
pub mod coordinator;
pub mod field;
pub mod handlers;
pub mod headless;
pub mod state;

#[cfg(feature = "config-file")]
pub use config::ConfigError;
pub use config::{FieldConfig, FieldFlags};
pub use control::{
    ControlId, ControlRef, EditHandler, TextControl, TextFieldDelegate, TextNotification,
};
pub use coordinator::{CoordinatorBuilder, SyncCoordinator};
pub use field::{PhoneField, PhoneFieldBuilder};
pub use handlers::{FieldSnapshot, Handler, HandlerKind, HandlerSet, HandlerSetBuilder};
pub use headless::HeadlessControl;
pub use state::{EditState, FormattingMode};
