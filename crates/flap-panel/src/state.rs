#![forbid(unsafe_code)]

//! Panel states and the geometry committed for them.

use std::fmt;

/// Resting state of a flap panel.
///
/// Exactly one value holds at any instant. It is the single source of truth
/// for the panel's committed geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelState {
    /// Peeking at the minimum offset.
    #[default]
    Compressed,
    /// Raised to the full host height or the configured maximum offset.
    Expanded,
    /// Pushed off-screen and released from the host.
    Dismissed,
}

impl PanelState {
    /// All states, in declaration order.
    pub const ALL: [PanelState; 3] = [Self::Compressed, Self::Expanded, Self::Dismissed];

    /// Stable lowercase name, used in log fields.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compressed => "compressed",
            Self::Expanded => "expanded",
            Self::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Displayed panel geometry.
///
/// `offset` is how far the panel's top edge sits above the host's bottom
/// anchor: `0` is flush with the bottom, the host height is fullscreen, and
/// negative values push the panel out of view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelFrame {
    pub offset: f64,
    /// Backdrop opacity in [0.0, 1.0].
    pub backdrop_alpha: f64,
}

impl PanelFrame {
    #[inline]
    pub const fn new(offset: f64, backdrop_alpha: f64) -> Self {
        Self {
            offset,
            backdrop_alpha,
        }
    }

    /// Interpolate toward `to` by `t`.
    ///
    /// `t` may leave [0, 1] while a spring overshoots; the offset follows it
    /// but the backdrop alpha stays clamped.
    pub fn lerp(self, to: PanelFrame, t: f64) -> PanelFrame {
        PanelFrame {
            offset: self.offset + (to.offset - self.offset) * t,
            backdrop_alpha: (self.backdrop_alpha + (to.backdrop_alpha - self.backdrop_alpha) * t)
                .clamp(0.0, 1.0),
        }
    }
}
