#![forbid(unsafe_code)]

//! Runtime support for phonefield.
//!
//! - [`reactive`]: observables, channels, bindings and subscription scopes
//! - [`scheduler`]: the cooperative next-tick queue used for deferred work
//! - [`region`]: the default-region context detected from the environment
//! - `logging` (feature `logging`): tracing subscriber installation

pub mod reactive;
pub mod region;
pub mod scheduler;

#[cfg(feature = "logging")]
pub mod logging;

pub use phonefield_number::RegionCode;
pub use region::{RegionContext, detect_system_region};
pub use scheduler::TickScheduler;

#[cfg(feature = "logging")]
pub use logging::{LogFormat, LoggingError, init_logging};
