#![forbid(unsafe_code)]

//! Host surface: the geometry provider and render sink a panel lives on.
//!
//! The panel engine never looks geometry up implicitly. Whatever hosts the
//! panel (a window, a terminal pane, a test double) implements
//! [`HostSurface`] and hands it to the controller at construction.

use flap_core::geometry::Rect;

use crate::state::PanelFrame;

/// Geometry queries and frame output for a hosted panel.
pub trait HostSurface {
    /// Host viewport, in points.
    fn bounds(&self) -> Rect;

    /// Height of the panel's content.
    fn content_height(&self) -> f64;

    /// Resolve any pending layout so the next transform starts from
    /// committed geometry.
    fn layout_if_needed(&mut self) {}

    /// Display `frame`. Called for every animation step and live drag update.
    fn apply_frame(&mut self, frame: PanelFrame);

    /// The panel is being shown on this host.
    fn attach(&mut self) {}

    /// The panel released this host after a dismissal settled.
    fn detach(&mut self) {}
}

/// In-memory host that records what it was asked to display.
///
/// Useful for tests and for driving the engine without a renderer.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    bounds: Rect,
    content_height: f64,
    frames: Vec<PanelFrame>,
    layout_passes: usize,
    attached: bool,
}

impl HeadlessHost {
    /// Host of `width × height` whose content fills the full height.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_content(width, height, height)
    }

    pub fn with_content(width: f64, height: f64, content_height: f64) -> Self {
        Self {
            bounds: Rect::from_size(width, height),
            content_height,
            ..Self::default()
        }
    }

    /// Every frame applied so far, oldest first.
    pub fn frames(&self) -> &[PanelFrame] {
        &self.frames
    }

    /// The most recently applied frame.
    pub fn last_frame(&self) -> Option<PanelFrame> {
        self.frames.last().copied()
    }

    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Change the host size, as a window resize would.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = Rect::from_size(width, height);
    }

    pub fn set_content_height(&mut self, height: f64) {
        self.content_height = height;
    }
}

impl HostSurface for HeadlessHost {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn content_height(&self) -> f64 {
        self.content_height
    }

    fn layout_if_needed(&mut self) {
        self.layout_passes += 1;
    }

    fn apply_frame(&mut self, frame: PanelFrame) {
        self.frames.push(frame);
    }

    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
    }
}
