#![forbid(unsafe_code)]

//! Time-driven animation primitives.
//!
//! Every animation advances through [`Animation::tick`] with an explicit
//! frame delta, so callers own the clock. Tests drive animations with fixed
//! `Duration` steps and get deterministic results.

use std::time::Duration;

pub mod spring;

pub use spring::Spring;

/// A value that evolves over time.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);
}
