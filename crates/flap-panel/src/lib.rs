#![forbid(unsafe_code)]

//! Panel engine: a draggable overlay with three resting states.
//!
//! # Role in the workspace
//! `flap-panel` owns the panel state machine. It turns drag phases from
//! `flap-core` into ranked candidate states, lets a delegate veto them, and
//! animates the winner through a single transform pipeline.
//!
//! # Primary responsibilities
//! - **Controller**: [`FlapController`] with `expand`/`compress`/`dismiss`,
//!   drag handling, hit testing and config setters.
//! - **Classification**: [`classify`] and [`GestureInterpreter`].
//! - **Negotiation**: [`negotiate`] plus [`capability_allows`].
//! - **Transforms**: [`TransformPipeline`], the only path that moves the panel.
//! - **Host seam**: [`HostSurface`], with [`HeadlessHost`] for tests and
//!   renderer-less drivers.
//!
//! # Example
//! ```ignore
//! use std::time::Duration;
//! use flap_panel::{FlapController, HeadlessHost, PanelConfig};
//!
//! let mut flap = FlapController::new(HeadlessHost::new(320.0, 800.0), PanelConfig::default())?;
//! flap.present(true, false);
//! flap.tick(Duration::from_millis(400));
//! assert_eq!(flap.offset(), 50.0);
//! ```

pub mod config;
pub mod controller;
pub mod delegate;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod negotiator;
pub mod state;
pub mod transform;

pub use config::{ConfigError, PanelConfig};
pub use controller::{Completion, FlapController, PanOutcome};
pub use delegate::{FlapDelegate, FlapEvent, HookDelegate, capability_allows};
pub use error::FlapError;
pub use host::{HeadlessHost, HostSurface};
pub use interpreter::{
    ClassifyContext, EDGE_DISMISS_OFFSET, GestureInterpreter, GestureSession, Verdict, classify,
};
pub use negotiator::negotiate;
pub use state::{PanelFrame, PanelState};
pub use transform::{SPRING_DAMPING_RATIO, TransformPipeline};
