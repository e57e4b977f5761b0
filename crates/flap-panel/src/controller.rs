#![forbid(unsafe_code)]

//! The flap controller: panel state machine over a host surface.
//!
//! [`FlapController`] owns the panel state, its configuration, the transform
//! pipeline and the gesture interpreter. It exposes the three programmatic
//! transitions ([`expand`](FlapController::expand),
//! [`compress`](FlapController::compress),
//! [`dismiss`](FlapController::dismiss)) and the drag entry point
//! [`handle_pan`](FlapController::handle_pan).
//!
//! Programmatic transitions are trusted and happen unconditionally. Drag
//! releases are ambiguous, so their candidates go through the negotiator and
//! the delegate's vetoes first.
//!
//! # Scheduling
//!
//! Everything runs on the caller's thread. A transition commits the new
//! state and starts its transform, then returns; notifications and
//! completion hooks run later from [`tick`](FlapController::tick), once the
//! transform settles. Hooks run while the controller is mutably borrowed, so
//! they cannot call back into it; record intent and act after `tick`.
//!
//! # Invariants
//!
//! 1. `state()` changes only together with a transform toward that state's
//!    frame.
//! 2. Changing `expands_fullscreen` or `maximum_offset` while expanded, or
//!    `minimum_offset` while compressed, re-runs an animated transform to the
//!    new frame without a second "did" notification.
//! 3. A dismissal notifies the delegate first, then releases the host.

use std::time::Duration;

use flap_core::gesture::DragPhase;

use crate::config::PanelConfig;
use crate::delegate::{FlapDelegate, capability_allows};
use crate::error::FlapError;
use crate::host::HostSurface;
use crate::interpreter::{ClassifyContext, GestureInterpreter, Verdict};
use crate::negotiator::negotiate;
use crate::state::{PanelFrame, PanelState};
use crate::transform::TransformPipeline;

/// Hook run after a transition settles and its notification fired.
pub type Completion = Box<dyn FnOnce()>;

/// Velocity recorded for a backdrop-tap dismissal.
const BACKDROP_TAP_VELOCITY: f64 = 0.5;

/// Work to do when a transform settles.
enum Settle {
    Expanded(Option<Completion>),
    Compressed(Option<Completion>),
    Dismissed(Option<Completion>),
    /// Same-state re-transform after a config change; no notification.
    Retarget,
}

impl std::fmt::Debug for Settle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Expanded(_) => "Expanded",
            Self::Compressed(_) => "Compressed",
            Self::Dismissed(_) => "Dismissed",
            Self::Retarget => "Retarget",
        };
        f.write_str(name)
    }
}

/// What a drag phase did to the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutcome {
    /// The panel is not attached, or there was no drag to continue.
    Ignored,
    /// A session started at `start_offset`.
    Began { start_offset: f64 },
    /// The live drag moved the panel.
    Moved { offset: f64 },
    /// The update was tracked but live movement is suppressed.
    Suppressed,
    /// The release was negotiated into a transition.
    Transitioned { to: PanelState },
    /// No candidate was permitted; the panel keeps its state.
    Held,
}

/// Three-state draggable overlay panel.
pub struct FlapController<H: HostSurface> {
    host: H,
    config: PanelConfig,
    state: PanelState,
    delegate: Option<Box<dyn FlapDelegate>>,
    pipeline: TransformPipeline<Settle>,
    interpreter: GestureInterpreter,
    attached: bool,
}

impl<H: HostSurface> std::fmt::Debug for FlapController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlapController")
            .field("state", &self.state)
            .field("attached", &self.attached)
            .field("frame", &self.pipeline.displayed())
            .field("target", &self.pipeline.target())
            .field("queued", &self.pipeline.queued())
            .field("dragging", &self.is_dragging())
            .field("delegate", &self.delegate.is_some())
            .finish()
    }
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl<H: HostSurface> FlapController<H> {
    /// Build a controller over `host`.
    ///
    /// The panel starts `Compressed` but detached, resting at offset 0 with
    /// no backdrop; call [`present`](Self::present) to show it.
    pub fn new(host: H, config: PanelConfig) -> Result<Self, FlapError> {
        let height = host.bounds().height;
        if !positive_finite(height) {
            return Err(FlapError::InvalidHost { height });
        }
        let content = host.content_height();
        if !positive_finite(content) {
            return Err(FlapError::EmptyContent { height: content });
        }
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(FlapError::InvalidConfig(errors));
        }

        let pipeline = TransformPipeline::new(PanelFrame::default(), config.animation_duration);
        Ok(Self {
            host,
            config,
            state: PanelState::Compressed,
            delegate: None,
            pipeline,
            interpreter: GestureInterpreter::new(),
            attached: false,
        })
    }

    /// Attach a delegate (builder pattern).
    #[must_use]
    pub fn with_delegate(mut self, delegate: impl FlapDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    pub fn set_delegate(&mut self, delegate: Option<Box<dyn FlapDelegate>>) {
        self.delegate = delegate;
    }

    // --- Read-only state ---------------------------------------------------

    #[inline]
    pub fn state(&self) -> PanelState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Displayed frame, including live drag offsets.
    #[inline]
    pub fn frame(&self) -> PanelFrame {
        self.pipeline.displayed()
    }

    /// Displayed offset of the panel's top edge above the host's bottom.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.pipeline.displayed().offset
    }

    /// Whether the panel currently owns its place on the host.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.pipeline.is_animating()
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.interpreter.session().is_some()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn dismissable(&self) -> bool {
        self.config.dismissable
    }

    pub fn expandable(&self) -> bool {
        self.config.expandable
    }

    pub fn compressable(&self) -> bool {
        self.config.compressable
    }

    /// Frame committed for `state` under the current config and host size.
    pub fn target_frame(&self, state: PanelState) -> PanelFrame {
        let host_height = self.host.bounds().height;
        match state {
            PanelState::Expanded => {
                let offset = if self.config.expands_fullscreen {
                    host_height
                } else {
                    self.config.maximum_offset
                };
                PanelFrame::new(offset, 1.0)
            }
            PanelState::Compressed => PanelFrame::new(self.config.minimum_offset, 1.0),
            PanelState::Dismissed => PanelFrame::new(-host_height, 0.0),
        }
    }

    // --- Programmatic transitions -----------------------------------------

    /// Raise the panel to its expanded frame. Notifies `did_expand`, then
    /// runs `completion`, once settled.
    pub fn expand(&mut self, animated: bool, velocity: f64, completion: Option<Completion>) {
        self.transition(PanelState::Expanded, animated, velocity, completion);
    }

    /// Lower the panel to its peek offset. Notifies `did_compress`, then
    /// runs `completion`, once settled.
    pub fn compress(&mut self, animated: bool, velocity: f64, completion: Option<Completion>) {
        self.transition(PanelState::Compressed, animated, velocity, completion);
    }

    /// Push the panel out of view. Once settled: notifies `did_dismiss`, runs
    /// `completion`, then releases the host.
    pub fn dismiss(&mut self, animated: bool, velocity: f64, completion: Option<Completion>) {
        self.transition(PanelState::Dismissed, animated, velocity, completion);
    }

    /// Attach to the host if needed, then expand or compress.
    pub fn present(&mut self, animated: bool, expand: bool) {
        if !self.attached {
            self.attached = true;
            self.host.attach();
            tracing::debug!(message = "flap.attach");
        }
        if expand {
            self.expand(animated, 0.0, None);
        } else {
            self.compress(animated, 0.0, None);
        }
    }

    /// A tap landed on the backdrop: dismiss.
    pub fn backdrop_tapped(&mut self) {
        if self.attached && self.state != PanelState::Dismissed {
            self.dismiss(true, BACKDROP_TAP_VELOCITY, None);
        }
    }

    // `velocity` is carried for observability only; the settle curve is fixed
    // by the configured duration.
    fn transition(
        &mut self,
        to: PanelState,
        animated: bool,
        velocity: f64,
        completion: Option<Completion>,
    ) {
        let from = self.state;
        self.state = to;
        tracing::debug!(
            message = "flap.transition",
            from = from.name(),
            to = to.name(),
            animated,
            velocity,
        );

        let target = self.target_frame(to);
        let settle = match to {
            PanelState::Expanded => Settle::Expanded(completion),
            PanelState::Compressed => Settle::Compressed(completion),
            PanelState::Dismissed => Settle::Dismissed(completion),
        };
        self.pipeline.transform(&mut self.host, animated, target, settle);
    }

    fn retransform(&mut self, state: PanelState) {
        if self.state != state || !self.attached {
            return;
        }
        let target = self.target_frame(state);
        tracing::debug!(
            message = "flap.retransform",
            state = state.name(),
            offset = target.offset,
        );
        self.pipeline.transform(&mut self.host, true, target, Settle::Retarget);
    }

    // --- Configuration -----------------------------------------------------

    pub fn set_expands_fullscreen(&mut self, fullscreen: bool) {
        if self.config.expands_fullscreen != fullscreen {
            self.config.expands_fullscreen = fullscreen;
            self.retransform(PanelState::Expanded);
        }
    }

    /// Non-finite or negative offsets are ignored.
    pub fn set_maximum_offset(&mut self, offset: f64) {
        if !(offset.is_finite() && offset >= 0.0) {
            tracing::warn!(message = "flap.config.rejected", field = "maximum_offset", offset);
            return;
        }
        if self.config.maximum_offset != offset {
            self.config.maximum_offset = offset;
            self.retransform(PanelState::Expanded);
        }
    }

    /// Non-finite or negative offsets are ignored.
    pub fn set_minimum_offset(&mut self, offset: f64) {
        if !(offset.is_finite() && offset >= 0.0) {
            tracing::warn!(message = "flap.config.rejected", field = "minimum_offset", offset);
            return;
        }
        if self.config.minimum_offset != offset {
            self.config.minimum_offset = offset;
            self.retransform(PanelState::Compressed);
        }
    }

    pub fn set_dismissable(&mut self, dismissable: bool) {
        self.config.dismissable = dismissable;
    }

    pub fn set_expandable(&mut self, expandable: bool) {
        self.config.expandable = expandable;
    }

    pub fn set_compressable(&mut self, compressable: bool) {
        self.config.compressable = compressable;
    }

    /// See [`PanelConfig::pan_enabled`]: `true` suppresses live drag motion.
    pub fn set_pan_enabled(&mut self, enabled: bool) {
        self.config.pan_enabled = enabled;
    }

    /// Non-positive or non-finite velocities are ignored.
    pub fn set_trigger_velocity(&mut self, velocity: f64) {
        if !positive_finite(velocity) {
            tracing::warn!(message = "flap.config.rejected", field = "trigger_velocity", velocity);
            return;
        }
        self.config.trigger_velocity = velocity;
    }

    /// Applies to transforms started after the call.
    pub fn set_animation_duration(&mut self, duration: Duration) {
        self.config.animation_duration = duration;
        self.pipeline.set_duration(duration);
    }

    pub fn set_forwards_touches(&mut self, forwards: bool) {
        self.config.forwards_touches = forwards;
    }

    /// Replace the whole configuration, re-running the current state's
    /// transform if its geometry changed.
    pub fn apply_config(&mut self, config: PanelConfig) -> Result<(), FlapError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(FlapError::InvalidConfig(errors));
        }

        let old = std::mem::replace(&mut self.config, config);
        self.pipeline.set_duration(self.config.animation_duration);

        let expanded_moved = old.expands_fullscreen != self.config.expands_fullscreen
            || old.maximum_offset != self.config.maximum_offset;
        let compressed_moved = old.minimum_offset != self.config.minimum_offset;
        match self.state {
            PanelState::Expanded if expanded_moved => self.retransform(PanelState::Expanded),
            PanelState::Compressed if compressed_moved => self.retransform(PanelState::Compressed),
            _ => {}
        }
        Ok(())
    }

    // --- Gestures ----------------------------------------------------------

    /// Feed one phase of a vertical drag.
    pub fn handle_pan(&mut self, phase: DragPhase) -> PanOutcome {
        if !self.attached {
            return PanOutcome::Ignored;
        }

        match phase {
            DragPhase::Began => {
                let start_offset = self.pipeline.displayed().offset;
                self.interpreter.begin(start_offset);
                PanOutcome::Began { start_offset }
            }
            DragPhase::Changed(sample) => {
                if !self.is_dragging() {
                    return PanOutcome::Ignored;
                }
                let Some(offset) = self.interpreter.update(sample, self.config.pan_enabled) else {
                    return PanOutcome::Suppressed;
                };
                self.pipeline.follow(&mut self.host, offset);
                tracing::trace!(message = "flap.pan", offset, translation = sample.translation_y);
                if let Some(delegate) = self.delegate.as_mut() {
                    delegate.did_pan(offset);
                }
                PanOutcome::Moved { offset }
            }
            DragPhase::Ended(sample) => {
                let ctx = self.classify_context();
                let fallback = self.pipeline.displayed().offset;
                let verdict = self.interpreter.end(sample, fallback, &ctx);
                self.resolve(verdict)
            }
            DragPhase::Cancelled => {
                let ctx = self.classify_context();
                match self.interpreter.cancel(&ctx) {
                    Some(verdict) => {
                        tracing::debug!(message = "flap.gesture.cancel", offset = verdict.offset);
                        self.resolve(verdict)
                    }
                    None => PanOutcome::Ignored,
                }
            }
        }
    }

    fn classify_context(&self) -> ClassifyContext {
        ClassifyContext {
            current: self.state,
            trigger_velocity: self.config.trigger_velocity,
            content_height: self.host.content_height(),
        }
    }

    fn resolve(&mut self, verdict: Verdict) -> PanOutcome {
        let current = self.state;
        let config = &self.config;
        let delegate = &mut self.delegate;
        let chosen = negotiate(verdict.candidates, |candidate| {
            let delegate: Option<&mut dyn FlapDelegate> = match delegate.as_mut() {
                Some(d) => Some(&mut **d),
                None => None,
            };
            capability_allows(delegate, config, current, candidate)
        });

        match chosen {
            Some(to) => {
                self.transition(to, true, verdict.speed, None);
                PanOutcome::Transitioned { to }
            }
            None => {
                self.spring_back();
                PanOutcome::Held
            }
        }
    }

    /// Return the panel to the committed state's frame after a held release.
    fn spring_back(&mut self) {
        let target = self.target_frame(self.state);
        if self.pipeline.target() == Some(target) {
            return;
        }
        if !self.pipeline.is_animating() && self.pipeline.displayed() == target {
            self.pipeline.come_to_rest();
            return;
        }
        tracing::debug!(
            message = "flap.spring_back",
            state = self.state.name(),
            from = self.pipeline.displayed().offset,
            to = target.offset,
        );
        self.pipeline.transform(&mut self.host, true, target, Settle::Retarget);
    }

    // --- Time --------------------------------------------------------------

    /// Advance animations by `dt` and deliver settled notifications.
    ///
    /// Returns how many transforms settled.
    pub fn tick(&mut self, dt: Duration) -> usize {
        let _span = tracing::debug_span!(
            "flap.tick",
            dt_us = u64::try_from(dt.as_micros()).unwrap_or(u64::MAX)
        )
        .entered();
        let settled = self.pipeline.tick(&mut self.host, dt);
        let count = settled.len();
        for settle in settled {
            self.on_settled(settle);
        }
        count
    }

    fn on_settled(&mut self, settle: Settle) {
        let delegate = self.delegate.as_mut();
        match settle {
            Settle::Expanded(completion) => {
                if let Some(d) = delegate {
                    d.did_expand();
                }
                if let Some(done) = completion {
                    done();
                }
            }
            Settle::Compressed(completion) => {
                if let Some(d) = delegate {
                    d.did_compress();
                }
                if let Some(done) = completion {
                    done();
                }
            }
            Settle::Dismissed(completion) => {
                if let Some(d) = delegate {
                    d.did_dismiss();
                }
                if let Some(done) = completion {
                    done();
                }
                // A later transition may have superseded this dismissal.
                if self.state == PanelState::Dismissed && self.attached {
                    self.release_host();
                }
            }
            Settle::Retarget => {}
        }
    }

    fn release_host(&mut self) {
        self.attached = false;
        self.interpreter = GestureInterpreter::new();
        self.host.detach();
        tracing::debug!(message = "flap.detach");
    }

    // --- Hit testing -------------------------------------------------------

    /// Whether a touch at host point `(x, y)` belongs to the panel.
    ///
    /// Without touch forwarding the panel claims every touch. With it, an
    /// expanded panel claims the whole host and otherwise only its visible
    /// content does.
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        if !self.attached {
            return false;
        }
        if !self.config.forwards_touches {
            return true;
        }
        let bounds = self.host.bounds();
        if self.state == PanelState::Expanded {
            return bounds.contains(x, y);
        }
        bounds
            .band_above_bottom(self.offset(), self.host.content_height())
            .intersection(&bounds)
            .is_some_and(|visible| visible.contains(x, y))
    }
}
