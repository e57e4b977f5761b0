#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) motion.
//!
//! Panel transitions settle with a slightly underdamped spring: the panel
//! overshoots its resting offset a little and then stops. The spring follows
//! the classical damped equation:
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force. Natural frequency is ω = √k.
//! - **damping** (c): velocity drag. The damping ratio is ζ = c / (2√k).
//!   - ζ < 1: underdamped, overshoots then settles
//!   - ζ = 1: critically damped, fastest convergence without overshoot
//!   - ζ > 1: overdamped, slow convergence
//!
//! Most callers do not pick k and c directly. [`Spring::settling_within`]
//! derives them from a damping ratio and the time budget the motion must fit
//! in, which is how the panel pipeline maps `animation_duration` onto a curve.
//!
//! # Integration
//!
//! Semi-implicit Euler, subdivided into steps of at most 4ms.
//!
//! # Invariants
//!
//! 1. `position()` is the raw (unclamped) position; overshoot is visible here.
//! 2. Once position and velocity drop below the rest thresholds the spring
//!    snaps to its target and stops integrating.
//! 3. Stiffness is always at least [`MIN_STIFFNESS`]; damping is never negative.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta below which the spring is "at rest".
const REST_THRESHOLD: f64 = 0.001;

/// Velocity below which (together with the position threshold) the spring is
/// considered at rest.
const VELOCITY_THRESHOLD: f64 = 0.01;

/// Minimum stiffness to prevent degenerate springs.
pub const MIN_STIFFNESS: f64 = 0.1;

/// Exponent of the amplitude envelope `e^(-ζωt)` reached at the end of a
/// [`Spring::settling_within`] budget. e^-6 leaves under 0.5% residual motion.
const SETTLE_DECAY: f64 = 6.0;

/// Shortest budget accepted by [`Spring::settling_within`].
const MIN_SETTLE_SECS: f64 = 0.001;

/// A damped harmonic oscillator.
///
/// ```ignore
/// use std::time::Duration;
/// use flap_core::animation::{Animation, Spring};
///
/// let mut spring = Spring::settling_within(Duration::from_millis(400), 0.5);
/// for _ in 0..25 {
///     spring.tick(Duration::from_millis(16));
/// }
/// assert!((spring.position() - 1.0).abs() < 0.02);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`.
    ///
    /// Defaults: stiffness 170, damping 26 (ζ ≈ 1.0).
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: 170.0,
            damping: 26.0,
            at_rest: false,
        }
    }

    /// Normalized spring (0.0 to 1.0) whose oscillation has decayed to within
    /// 0.5% of the target once `budget` has elapsed.
    ///
    /// `damping_ratio` is clamped to `(0.05, 1.0]`; the natural frequency is
    /// chosen so that `ζ·ω·budget` equals a fixed decay exponent.
    #[must_use]
    pub fn settling_within(budget: Duration, damping_ratio: f64) -> Self {
        let zeta = if damping_ratio.is_finite() {
            damping_ratio.clamp(0.05, 1.0)
        } else {
            1.0
        };
        let secs = budget.as_secs_f64().max(MIN_SETTLE_SECS);
        let omega = SETTLE_DECAY / (zeta * secs);
        Self::new(0.0, 1.0)
            .with_stiffness(omega * omega)
            .with_damping(2.0 * zeta * omega)
    }

    /// Set stiffness (builder pattern). Clamped to [`MIN_STIFFNESS`].
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    /// Set damping (builder pattern). Clamped to minimum 0.0.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }
}

impl Animation for Spring {
    /// Advance the spring by `dt`, subdividing for stability.
    fn tick(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < REST_THRESHOLD
            && self.velocity.abs() < VELOCITY_THRESHOLD
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
