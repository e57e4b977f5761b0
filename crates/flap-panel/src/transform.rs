#![forbid(unsafe_code)]

//! Transform pipeline: the only path that moves a panel to committed
//! geometry.
//!
//! Each [`TransformPipeline::transform`] call carries a settle payload `T`.
//! The pipeline animates the displayed [`PanelFrame`] toward the target with
//! a half-damped spring sized to the configured duration, and hands payloads
//! back from [`TransformPipeline::tick`] once the motion has settled. The
//! owner turns payloads into notifications.
//!
//! # Invariants
//!
//! 1. Every payload is returned exactly once.
//! 2. An animated transform settles when its full duration has elapsed, never
//!    earlier, and lands exactly on the target.
//! 3. A non-animated transform applies the target immediately; its payload is
//!    returned by the next `tick`, even a zero-length one.
//! 4. A transform started while another is in flight redirects the motion
//!    from the currently displayed frame toward the new target. Payloads of
//!    the superseded transform stay queued and are returned, in call order,
//!    when the pipeline next comes to rest.
//! 5. Payloads are never returned from inside `transform`; completion work
//!    always runs later, from `tick`.
//!
//! # Live drags
//!
//! [`TransformPipeline::follow`] moves the displayed offset directly for
//! per-frame drag response. It stops any flight but keeps its payloads
//! queued; they are released by the next transform's settle or by
//! [`TransformPipeline::come_to_rest`] when the drag ends already resting on
//! its target.

use std::time::Duration;

use flap_core::animation::{Animation, Spring};

use crate::host::HostSurface;
use crate::state::PanelFrame;

/// Damping ratio of the settle curve: slight overshoot, then stop.
pub const SPRING_DAMPING_RATIO: f64 = 0.5;

#[derive(Debug, Clone)]
struct Flight {
    from: PanelFrame,
    to: PanelFrame,
    spring: Spring,
    elapsed: Duration,
    duration: Duration,
}

/// Animated frame driver with deferred settle payloads.
#[derive(Debug)]
pub struct TransformPipeline<T> {
    displayed: PanelFrame,
    duration: Duration,
    flight: Option<Flight>,
    pending: Vec<T>,
    ready: Vec<T>,
}

impl<T> TransformPipeline<T> {
    /// Pipeline resting at `initial`, animating over `duration`.
    pub fn new(initial: PanelFrame, duration: Duration) -> Self {
        Self {
            displayed: initial,
            duration,
            flight: None,
            pending: Vec::new(),
            ready: Vec::new(),
        }
    }

    /// Currently displayed frame.
    #[inline]
    pub fn displayed(&self) -> PanelFrame {
        self.displayed
    }

    /// Target of the in-flight transform, if any.
    pub fn target(&self) -> Option<PanelFrame> {
        self.flight.as_ref().map(|f| f.to)
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Payloads waiting to be returned.
    pub fn queued(&self) -> usize {
        self.pending.len() + self.ready.len()
    }

    /// Duration for transforms started from now on.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Move to `target`, animated or not, and return `on_settled` from a
    /// later [`tick`](Self::tick).
    pub fn transform<H>(&mut self, host: &mut H, animated: bool, target: PanelFrame, on_settled: T)
    where
        H: HostSurface + ?Sized,
    {
        host.layout_if_needed();
        self.pending.push(on_settled);

        if animated && !self.duration.is_zero() {
            self.flight = Some(Flight {
                from: self.displayed,
                to: target,
                spring: Spring::settling_within(self.duration, SPRING_DAMPING_RATIO),
                elapsed: Duration::ZERO,
                duration: self.duration,
            });
        } else {
            self.flight = None;
            self.displayed = target;
            host.apply_frame(target);
            self.ready.append(&mut self.pending);
        }
    }

    /// Display a live drag offset, bypassing animation.
    pub fn follow<H>(&mut self, host: &mut H, offset: f64)
    where
        H: HostSurface + ?Sized,
    {
        self.flight = None;
        self.displayed.offset = offset;
        host.apply_frame(self.displayed);
    }

    /// Release queued payloads if nothing is in flight.
    ///
    /// Called when a drag ends without starting a new transform.
    pub fn come_to_rest(&mut self) {
        if self.flight.is_none() {
            self.ready.append(&mut self.pending);
        }
    }

    /// Advance the flight by `dt` and return every payload that settled,
    /// oldest first.
    pub fn tick<H>(&mut self, host: &mut H, dt: Duration) -> Vec<T>
    where
        H: HostSurface + ?Sized,
    {
        if let Some(flight) = self.flight.as_mut() {
            let step = dt.min(flight.duration.saturating_sub(flight.elapsed));
            flight.elapsed = flight.elapsed.saturating_add(dt);
            flight.spring.tick(step);

            if flight.elapsed >= flight.duration {
                self.displayed = flight.to;
                self.flight = None;
                self.ready.append(&mut self.pending);
            } else {
                self.displayed = flight.from.lerp(flight.to, flight.spring.position());
            }
            host.apply_frame(self.displayed);
        }

        std::mem::take(&mut self.ready)
    }
}
