#![forbid(unsafe_code)]

//! Gesture interpretation: from a drag stream to ranked candidate states.
//!
//! A [`GestureInterpreter`] holds at most one [`GestureSession`]. The session
//! captures the panel offset when the drag begins; every update places the
//! panel at `start_offset - translation_y`. When the drag ends,
//! [`classify`] ranks the states the panel could settle into.
//!
//! # Classification
//!
//! Rules are evaluated top to bottom; the first match wins.
//!
//! 1. **Edge dismissal**: offset below [`EDGE_DISMISS_OFFSET`] ranks
//!    `[Dismissed, Compressed, Expanded]` whatever the velocity.
//! 2. **Flick**: speed at or above the trigger velocity.
//!    - Upward: `[Expanded, Compressed]`.
//!    - Downward from `Compressed`: `[Dismissed, Compressed]`.
//!    - Downward from `Expanded`: `[Compressed, Dismissed, Expanded]`.
//!    - Downward from `Dismissed`: nothing.
//! 3. **Slow drag**: above half the content height ranks
//!    `[Expanded, Compressed]`, otherwise `[Compressed, Expanded]`.
//!
//! # Cancellation
//!
//! A cancelled drag is classified like a release at the last live offset
//! with zero velocity, so the panel always snaps back to a defined state
//! instead of resting at an arbitrary drag offset.

use flap_core::gesture::DragSample;

use crate::state::PanelState;
use crate::state::PanelState::{Compressed, Dismissed, Expanded};

/// Offsets below this (in points above the host's bottom edge) dismiss.
pub const EDGE_DISMISS_OFFSET: f64 = 70.0;

const EDGE: &[PanelState] = &[Dismissed, Compressed, Expanded];
const RAISE: &[PanelState] = &[Expanded, Compressed];
const LOWER_FROM_COMPRESSED: &[PanelState] = &[Dismissed, Compressed];
const LOWER_FROM_EXPANDED: &[PanelState] = &[Compressed, Dismissed, Expanded];
const SETTLE_LOW: &[PanelState] = &[Compressed, Expanded];

/// Everything classification depends on besides the drag itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyContext {
    /// Panel state when the drag ended.
    pub current: PanelState,
    pub trigger_velocity: f64,
    pub content_height: f64,
}

/// Rank candidate states for a drag that ended at `offset` with signed
/// `velocity_y`.
///
/// Pure: identical inputs always produce the identical list.
pub fn classify(offset: f64, velocity_y: f64, ctx: &ClassifyContext) -> &'static [PanelState] {
    if offset < EDGE_DISMISS_OFFSET {
        return EDGE;
    }

    if velocity_y.abs() >= ctx.trigger_velocity {
        if velocity_y < 0.0 {
            return RAISE;
        }
        return match ctx.current {
            Compressed => LOWER_FROM_COMPRESSED,
            Expanded => LOWER_FROM_EXPANDED,
            Dismissed => &[],
        };
    }

    if offset > ctx.content_height / 2.0 {
        RAISE
    } else {
        SETTLE_LOW
    }
}

/// Result of interpreting a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    /// Ranked candidates, best first. May be empty.
    pub candidates: &'static [PanelState],
    /// Release speed, passed through to the chosen transition.
    pub speed: f64,
    /// Offset the classification was made at.
    pub offset: f64,
}

/// State of one continuous drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    start_offset: f64,
    live_offset: f64,
}

impl GestureSession {
    /// Panel offset captured when the drag began.
    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    /// Offset the drag currently holds the panel at.
    pub fn live_offset(&self) -> f64 {
        self.live_offset
    }
}

/// Tracks the active drag and classifies its end.
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    session: Option<GestureSession>,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active session, if a drag is in progress.
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Start a session at `offset`. Replaces any previous session.
    pub fn begin(&mut self, offset: f64) {
        self.session = Some(GestureSession {
            start_offset: offset,
            live_offset: offset,
        });
    }

    /// Apply a drag update.
    ///
    /// Returns the new live offset, or `None` if there is no session or
    /// `suppressed` is set. A suppressed update is still part of the session
    /// but leaves the panel where it is.
    pub fn update(&mut self, sample: DragSample, suppressed: bool) -> Option<f64> {
        let session = self.session.as_mut()?;
        if suppressed {
            return None;
        }
        session.live_offset = session.start_offset - sample.translation_y;
        Some(session.live_offset)
    }

    /// Close the session and classify the release.
    ///
    /// `fallback_offset` is used when no session exists (an end without a
    /// begin), so the release is still classified against the panel's
    /// displayed position.
    pub fn end(&mut self, sample: DragSample, fallback_offset: f64, ctx: &ClassifyContext) -> Verdict {
        let offset = self
            .session
            .take()
            .map_or(fallback_offset, |s| s.live_offset);
        Verdict {
            candidates: classify(offset, sample.velocity_y, ctx),
            speed: sample.speed(),
            offset,
        }
    }

    /// Close the session after a platform cancel.
    ///
    /// Returns `None` if no session was active.
    pub fn cancel(&mut self, ctx: &ClassifyContext) -> Option<Verdict> {
        let session = self.session.take()?;
        Some(Verdict {
            candidates: classify(session.live_offset, 0.0, ctx),
            speed: 0.0,
            offset: session.live_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(current: PanelState) -> ClassifyContext {
        ClassifyContext {
            current,
            trigger_velocity: 700.0,
            content_height: 600.0,
        }
    }

    #[test]
    fn edge_wins_over_flick() {
        for velocity in [-5000.0, -100.0, 0.0, 100.0, 5000.0] {
            for current in PanelState::ALL {
                assert_eq!(classify(50.0, velocity, &ctx(current)), EDGE);
            }
        }
    }

    #[test]
    fn edge_boundary_is_exclusive() {
        assert_eq!(classify(69.99, 0.0, &ctx(Compressed)), EDGE);
        assert_eq!(classify(70.0, 0.0, &ctx(Compressed)), SETTLE_LOW);
    }

    #[test]
    fn upward_flick_raises() {
        for current in PanelState::ALL {
            assert_eq!(classify(200.0, -700.0, &ctx(current)), RAISE);
        }
    }

    #[test]
    fn downward_flick_depends_on_state() {
        assert_eq!(classify(200.0, 800.0, &ctx(Compressed)), LOWER_FROM_COMPRESSED);
        assert_eq!(classify(200.0, 800.0, &ctx(Expanded)), LOWER_FROM_EXPANDED);
        assert!(classify(200.0, 800.0, &ctx(Dismissed)).is_empty());
    }

    #[test]
    fn trigger_velocity_is_inclusive() {
        assert_eq!(classify(200.0, 700.0, &ctx(Compressed)), LOWER_FROM_COMPRESSED);
        assert_eq!(classify(200.0, 699.9, &ctx(Compressed)), SETTLE_LOW);
    }

    #[test]
    fn slow_drag_uses_half_content_height() {
        assert_eq!(classify(400.0, 100.0, &ctx(Expanded)), RAISE);
        assert_eq!(classify(300.0, 100.0, &ctx(Expanded)), SETTLE_LOW);
        assert_eq!(classify(301.0, -100.0, &ctx(Compressed)), RAISE);
    }

    #[test]
    fn update_tracks_translation_from_start() {
        let mut gi = GestureInterpreter::new();
        gi.begin(300.0);
        assert_eq!(gi.update(DragSample::new(40.0, 0.0), false), Some(260.0));
        assert_eq!(gi.update(DragSample::new(-100.0, 0.0), false), Some(400.0));
        let session = gi.session().copied().expect("active session");
        assert_eq!(session.start_offset(), 300.0);
        assert_eq!(session.live_offset(), 400.0);
    }

    #[test]
    fn suppressed_update_keeps_offset() {
        let mut gi = GestureInterpreter::new();
        gi.begin(300.0);
        assert_eq!(gi.update(DragSample::new(250.0, 0.0), true), None);
        let verdict = gi.end(DragSample::new(250.0, 0.0), 0.0, &ctx(Expanded));
        assert_eq!(verdict.offset, 300.0);
    }

    #[test]
    fn update_without_session_is_ignored() {
        let mut gi = GestureInterpreter::new();
        assert_eq!(gi.update(DragSample::new(10.0, 0.0), false), None);
    }

    #[test]
    fn begin_replaces_previous_session() {
        let mut gi = GestureInterpreter::new();
        gi.begin(300.0);
        gi.update(DragSample::new(100.0, 0.0), false);
        gi.begin(500.0);
        assert_eq!(gi.update(DragSample::new(10.0, 0.0), false), Some(490.0));
    }

    #[test]
    fn end_closes_session_and_reports_speed() {
        let mut gi = GestureInterpreter::new();
        gi.begin(300.0);
        gi.update(DragSample::new(-100.0, -900.0), false);
        let verdict = gi.end(DragSample::new(-100.0, -900.0), 0.0, &ctx(Compressed));
        assert_eq!(verdict.candidates, RAISE);
        assert_eq!(verdict.speed, 900.0);
        assert_eq!(verdict.offset, 400.0);
        assert!(gi.session().is_none());
    }

    #[test]
    fn end_without_session_uses_fallback() {
        let mut gi = GestureInterpreter::new();
        let verdict = gi.end(DragSample::new(0.0, 0.0), 40.0, &ctx(Compressed));
        assert_eq!(verdict.candidates, EDGE);
    }

    #[test]
    fn cancel_snaps_from_live_offset_without_velocity() {
        let mut gi = GestureInterpreter::new();
        gi.begin(50.0);
        gi.update(DragSample::new(-400.0, -3000.0), false);
        let verdict = gi.cancel(&ctx(Compressed)).expect("session was active");
        assert_eq!(verdict.offset, 450.0);
        assert_eq!(verdict.speed, 0.0);
        assert_eq!(verdict.candidates, RAISE);
        assert!(gi.cancel(&ctx(Compressed)).is_none());
    }
}
