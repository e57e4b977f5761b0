#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature enabled this re-exports the `tracing` macros
//! so dependents can log through `flap_core::debug!` and friends. Without it
//! the same macro names expand to nothing, so call sites need no `cfg`.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, trace, trace_span, warn};

/// No-op stand-in for `tracing::debug!`.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

/// No-op stand-in for `tracing::trace!`.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// No-op stand-in for `tracing::warn!`.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}
