// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: motion and drag-input primitives for flap panels.
//!
//! # Role in the workspace
//! `flap-core` is the input and motion layer. It owns the damped spring used
//! to settle panel transitions, the geometry types used for hit testing, and
//! the drag-phase stream that gesture sources feed to the panel engine.
//!
//! # Primary responsibilities
//! - **Animation**: the [`animation::Animation`] trait and a damped
//!   [`animation::spring::Spring`].
//! - **Geometry**: floating-point [`geometry::Rect`] in host points.
//! - **Gestures**: [`gesture::DragPhase`] and the [`gesture::PanRecognizer`]
//!   that turns raw pointer samples into translation/velocity updates.
//!
//! # How it fits in the system
//! `flap-panel` consumes [`gesture::DragPhase`] values and drives its
//! transform pipeline with [`animation::spring::Spring`]. Nothing here knows
//! about panel states.

pub mod animation;
pub mod geometry;
pub mod gesture;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, trace_span, warn};
