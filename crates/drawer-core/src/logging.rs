#![forbid(unsafe_code)]

//! Logging shim.
//!
//! With the `tracing` feature enabled this module re-exports the `tracing`
//! macros. Without it, the same macro names expand to nothing so call sites
//! never need their own `cfg` guards:
//!
//! ```ignore
//! #[cfg(feature = "tracing")]
//! use crate::logging::debug;
//! #[cfg(not(feature = "tracing"))]
//! use crate::debug;
//! ```
//!
//! The `tracing-json` feature additionally provides [`init_json_subscriber`]
//! for hosts that want newline-delimited JSON logs without wiring
//! `tracing-subscriber` themselves.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

/// Install a global JSON subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` when the variable is unset or unparsable.
///
/// Returns an error if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber(
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .try_init()
}
