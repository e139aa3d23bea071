#![forbid(unsafe_code)]

//! Tracing subscriber installation.
//!
//! Library code only emits `tracing` events; binaries and test harnesses
//! call [`init_logging`] once to see them. The filter is read from
//! `PHONEFIELD_LOG` using `EnvFilter` syntax (`phonefield_widgets=trace`),
//! defaulting to `info`.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PHONEFIELD_LOG";

/// Output format for [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// Newline-delimited JSON for log collectors.
    Json,
}

/// Error returned when logging cannot be installed.
#[derive(Debug)]
pub enum LoggingError {
    /// A global subscriber was already set (by this crate or another).
    AlreadyInitialized(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized(msg) => {
                write!(f, "global tracing subscriber already set: {msg}")
            }
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install the global `fmt` subscriber.
///
/// # Errors
///
/// [`LoggingError::AlreadyInitialized`] if a global subscriber exists.
pub fn init_logging(format: LogFormat) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|err| LoggingError::AlreadyInitialized(err.to_string()))
}
