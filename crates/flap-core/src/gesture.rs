#![forbid(unsafe_code)]

//! Drag phases and the pan recognizer that produces them.
//!
//! A panel engine consumes a stream of [`DragPhase`] values for one
//! continuous vertical drag. Each update carries a [`DragSample`]: the
//! translation relative to where the drag started and the instantaneous
//! velocity, both signed with screen orientation (positive = downward).
//!
//! [`PanRecognizer`] builds that stream from raw pointer positions. Hosts
//! that already have a platform pan recognizer can skip it and construct
//! [`DragPhase`] values directly.
//!
//! # State Machine
//!
//! ```text
//! Idle --press--> Pressed --move past slop--> Dragging --release--> Idle (Ended)
//!                    |                            |
//!                    +--release--> Idle (tap)     +--cancel--> Idle (Cancelled)
//! ```
//!
//! # Invariants
//!
//! 1. `Began` is always followed by zero or more `Changed` and exactly one
//!    of `Ended` or `Cancelled`.
//! 2. No phase is emitted for a press that never travels past the slop.
//! 3. Velocity magnitude never exceeds [`PanConfig::max_velocity`].
//!
//! # Failure Modes
//!
//! - Two samples with the same timestamp keep the previous velocity rather
//!   than dividing by zero.
//! - A release after the pointer rested longer than
//!   [`PanConfig::velocity_stale_after`] reports zero velocity.

use std::time::Duration;

use web_time::Instant;

#[cfg(feature = "tracing")]
use crate::logging::debug;
#[cfg(not(feature = "tracing"))]
use crate::debug;

/// One drag update, relative to the start of the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSample {
    /// Vertical translation since the gesture began (positive = downward).
    pub translation_y: f64,
    /// Instantaneous vertical velocity in points per second
    /// (negative = upward).
    pub velocity_y: f64,
}

impl DragSample {
    #[inline]
    pub const fn new(translation_y: f64, velocity_y: f64) -> Self {
        Self {
            translation_y,
            velocity_y,
        }
    }

    /// Velocity magnitude.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity_y.abs()
    }
}

/// Phase of a continuous drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    /// The drag started; no translation yet.
    Began,
    /// The pointer moved.
    Changed(DragSample),
    /// The pointer was released; the sample is the final one.
    Ended(DragSample),
    /// The platform cancelled the gesture (focus loss, system interrupt).
    Cancelled,
}

/// Thresholds for [`PanRecognizer`].
#[derive(Debug, Clone)]
pub struct PanConfig {
    /// Distance in points the pointer must travel before a drag begins
    /// (default: 8.0).
    pub slop: f64,
    /// Velocity magnitude cap in points per second (default: 8000.0).
    pub max_velocity: f64,
    /// Release velocity is zeroed if the pointer rested this long before
    /// release (default: 100ms).
    pub velocity_stale_after: Duration,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            slop: 8.0,
            max_velocity: 8_000.0,
            velocity_stale_after: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone)]
struct PressTracker {
    origin_y: f64,
    last_y: f64,
    last_time: Instant,
    velocity: f64,
    started: bool,
}

impl PressTracker {
    fn sample(&self) -> DragSample {
        DragSample::new(self.last_y - self.origin_y, self.velocity)
    }
}

/// Converts raw pointer positions into [`DragPhase`] values.
///
/// Feed it `press`, `motion`, `release`, and `cancel` calls with host-space
/// y coordinates and timestamps.
#[derive(Debug, Clone, Default)]
pub struct PanRecognizer {
    config: PanConfig,
    press: Option<PressTracker>,
}

impl PanRecognizer {
    #[must_use]
    pub fn new(config: PanConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// Pointer went down. A press while another is tracked restarts tracking
    /// and cancels any drag in progress.
    pub fn press(&mut self, y: f64, now: Instant) -> Option<DragPhase> {
        let interrupted = self.cancel();
        self.press = Some(PressTracker {
            origin_y: y,
            last_y: y,
            last_time: now,
            velocity: 0.0,
            started: false,
        });
        interrupted
    }

    /// Pointer moved while pressed.
    ///
    /// Returns `[Began, Changed]` when this move crosses the slop, `[Changed]`
    /// while dragging, and nothing otherwise.
    pub fn motion(&mut self, y: f64, now: Instant) -> Vec<DragPhase> {
        let mut out = Vec::with_capacity(2);
        let max_velocity = self.config.max_velocity;
        let slop = self.config.slop;
        let Some(press) = self.press.as_mut() else {
            return out;
        };

        let dt = now.saturating_duration_since(press.last_time).as_secs_f64();
        if dt > 0.0 {
            press.velocity = ((y - press.last_y) / dt).clamp(-max_velocity, max_velocity);
        }
        press.last_y = y;
        press.last_time = now;

        if !press.started && (y - press.origin_y).abs() >= slop {
            press.started = true;
            debug!(message = "pan.began", origin_y = press.origin_y, y);
            out.push(DragPhase::Began);
        }
        if press.started {
            out.push(DragPhase::Changed(press.sample()));
        }
        out
    }

    /// Pointer went up. Returns `Ended` if a drag was in progress.
    pub fn release(&mut self, y: f64, now: Instant) -> Option<DragPhase> {
        let mut press = self.press.take()?;
        if !press.started {
            return None;
        }

        let dt = now.saturating_duration_since(press.last_time);
        if dt >= self.config.velocity_stale_after {
            press.velocity = 0.0;
        } else if dt > Duration::ZERO && y != press.last_y {
            let max_velocity = self.config.max_velocity;
            press.velocity =
                ((y - press.last_y) / dt.as_secs_f64()).clamp(-max_velocity, max_velocity);
        }
        press.last_y = y;
        let sample = press.sample();
        debug!(
            message = "pan.ended",
            translation_y = sample.translation_y,
            velocity_y = sample.velocity_y
        );
        Some(DragPhase::Ended(sample))
    }

    /// Abandon the current press. Returns `Cancelled` if a drag was in
    /// progress.
    pub fn cancel(&mut self) -> Option<DragPhase> {
        let press = self.press.take()?;
        if press.started {
            debug!(message = "pan.cancelled", last_y = press.last_y);
        }
        press.started.then_some(DragPhase::Cancelled)
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.started)
    }

    /// Forget any tracked press without emitting a phase.
    pub fn reset(&mut self) {
        self.press = None;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PanConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PanConfig) {
        self.config = config;
    }
}
