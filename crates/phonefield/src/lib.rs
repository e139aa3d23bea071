#![forbid(unsafe_code)]

//! Phone number input field.
//!
//! A [`PhoneField`] keeps three things in step: the text shown in a
//! platform control, the value exposed to the host through a binding, and
//! the parsed phone number. In [`FormattingMode::Verbatim`] the value is the
//! text as typed; in [`FormattingMode::Canonical`] it is the `+<code><digits>`
//! form, or empty while the text does not parse.
//!
//! The crates behind this facade:
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`number`] | `RegionCode`, `ParsedNumber`, the parser seam and its built-in implementation |
//! | [`runtime`] | Observables, bindings, the tick scheduler, the region context |
//! | [`style`] | Colors, fonts, borders forwarded to the control |
//! | [`widgets`] | The sync coordinator, the field controller, the headless control |
//!
//! # Example
//!
//! ```
//! use phonefield::prelude::*;
//!
//! let value = Observable::new(String::new());
//! let scheduler = TickScheduler::new();
//! let control = HeadlessControl::new();
//! let _field = PhoneFieldBuilder::new(BindingCell::from_observable(&value))
//!     .mode(FormattingMode::Canonical)
//!     .scheduler(scheduler.clone())
//!     .config(FieldConfig::default().default_region("US".parse().ok()))
//!     .mount(control.clone());
//!
//! control.begin_editing();
//! control.insert("(415) 555-1234");
//! assert_eq!(value.get(), "+14155551234");
//! ```

pub use phonefield_number as number;
pub use phonefield_runtime as runtime;
pub use phonefield_style as style;
pub use phonefield_widgets as widgets;

pub use phonefield_number::{
    MetadataParser, ParseError, ParsedNumber, PhoneNumberParser, RegionCode,
};
pub use phonefield_runtime::{RegionContext, TickScheduler};
pub use phonefield_style::{BorderStyle, Color, Font, FontWeight, TextAlignment};
pub use phonefield_widgets::{
    EditState, FieldConfig, FieldFlags, FieldSnapshot, FormattingMode, HandlerKind, HandlerSet,
    HeadlessControl, PhoneField, PhoneFieldBuilder, SyncCoordinator, TextControl,
    TextFieldDelegate,
};

#[cfg(feature = "libphonenumber")]
pub use phonefield_number::LibPhoneNumberParser;
#[cfg(feature = "logging")]
pub use phonefield_runtime::{LogFormat, init_logging};

/// Common imports for hosts embedding a phone field.
pub mod prelude {
    pub use crate::number::{ParsedNumber, PhoneNumberParser, RegionCode};
    pub use crate::runtime::reactive::{Binding, BindingCell, Observable};
    pub use crate::runtime::{RegionContext, TickScheduler};
    pub use crate::style::{Color, Font};
    pub use crate::widgets::{
        FieldConfig, FieldFlags, FormattingMode, HandlerKind, HandlerSet, HeadlessControl,
        PhoneField, PhoneFieldBuilder, TextControl,
    };
}
