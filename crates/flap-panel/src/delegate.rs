#![forbid(unsafe_code)]

//! Delegate protocol: capability vetoes and transition notifications.
//!
//! A delegate may answer any subset of the three capability queries. A query
//! returning `None` means "no opinion", and the negotiator falls back to the
//! matching flag in [`PanelConfig`]. That is different from answering
//! `Some(false)`, which vetoes the transition regardless of the flag.
//!
//! Notifications are fire-and-forget and arrive after a transition settles
//! (or, for [`FlapDelegate::did_pan`], after every live drag update).

use crate::config::PanelConfig;
use crate::state::PanelState;

/// Observer notifications, as seen by [`HookDelegate`] observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlapEvent {
    DidExpand,
    DidCompress,
    DidDismiss,
    /// A live drag moved the panel to `offset`.
    DidPan { offset: f64 },
}

/// External authority over gesture-driven transitions.
///
/// Every method has a default, so implementors only override what they care
/// about. `current` is the panel state at the time of the query.
pub trait FlapDelegate {
    /// May a gesture dismiss the panel? `None` defers to
    /// [`PanelConfig::dismissable`].
    fn should_dismiss(&mut self, current: PanelState) -> Option<bool> {
        let _ = current;
        None
    }

    /// May a gesture compress the panel? `None` defers to
    /// [`PanelConfig::compressable`].
    fn should_compress(&mut self, current: PanelState) -> Option<bool> {
        let _ = current;
        None
    }

    /// May a gesture expand the panel? `None` defers to
    /// [`PanelConfig::expandable`].
    fn should_expand(&mut self, current: PanelState) -> Option<bool> {
        let _ = current;
        None
    }

    fn did_expand(&mut self) {}

    fn did_compress(&mut self) {}

    /// Fired before the panel releases its host.
    fn did_dismiss(&mut self) {}

    fn did_pan(&mut self, offset: f64) {
        let _ = offset;
    }
}

/// Resolve whether `candidate` is permitted: the delegate's answer if it
/// has one, the static capability flag otherwise.
pub fn capability_allows(
    delegate: Option<&mut dyn FlapDelegate>,
    config: &PanelConfig,
    current: PanelState,
    candidate: PanelState,
) -> bool {
    let answer = delegate.and_then(|d| match candidate {
        PanelState::Dismissed => d.should_dismiss(current),
        PanelState::Compressed => d.should_compress(current),
        PanelState::Expanded => d.should_expand(current),
    });
    answer.unwrap_or(match candidate {
        PanelState::Dismissed => config.dismissable,
        PanelState::Compressed => config.compressable,
        PanelState::Expanded => config.expandable,
    })
}

type Query = Box<dyn FnMut(PanelState) -> bool>;
type Observer = Box<dyn FnMut(FlapEvent)>;

/// Closure-backed delegate.
///
/// Each capability is an optional function; an unset query defers to the
/// config flag exactly like an unimplemented trait method.
///
/// ```ignore
/// let delegate = HookDelegate::new()
///     .dismiss_when(|_| false)
///     .on_event(|event| println!("{event:?}"));
/// ```
#[derive(Default)]
pub struct HookDelegate {
    should_dismiss: Option<Query>,
    should_compress: Option<Query>,
    should_expand: Option<Query>,
    observer: Option<Observer>,
}

impl std::fmt::Debug for HookDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookDelegate")
            .field("should_dismiss", &self.should_dismiss.is_some())
            .field("should_compress", &self.should_compress.is_some())
            .field("should_expand", &self.should_expand.is_some())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl HookDelegate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dismiss_when(mut self, query: impl FnMut(PanelState) -> bool + 'static) -> Self {
        self.should_dismiss = Some(Box::new(query));
        self
    }

    #[must_use]
    pub fn compress_when(mut self, query: impl FnMut(PanelState) -> bool + 'static) -> Self {
        self.should_compress = Some(Box::new(query));
        self
    }

    #[must_use]
    pub fn expand_when(mut self, query: impl FnMut(PanelState) -> bool + 'static) -> Self {
        self.should_expand = Some(Box::new(query));
        self
    }

    /// Receive every notification as a [`FlapEvent`].
    #[must_use]
    pub fn on_event(mut self, observer: impl FnMut(FlapEvent) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn emit(&mut self, event: FlapEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(event);
        }
    }
}

impl FlapDelegate for HookDelegate {
    fn should_dismiss(&mut self, current: PanelState) -> Option<bool> {
        self.should_dismiss.as_mut().map(|q| q(current))
    }

    fn should_compress(&mut self, current: PanelState) -> Option<bool> {
        self.should_compress.as_mut().map(|q| q(current))
    }

    fn should_expand(&mut self, current: PanelState) -> Option<bool> {
        self.should_expand.as_mut().map(|q| q(current))
    }

    fn did_expand(&mut self) {
        self.emit(FlapEvent::DidExpand);
    }

    fn did_compress(&mut self) {
        self.emit(FlapEvent::DidCompress);
    }

    fn did_dismiss(&mut self) {
        self.emit(FlapEvent::DidDismiss);
    }

    fn did_pan(&mut self, offset: f64) {
        self.emit(FlapEvent::DidPan { offset });
    }
}
