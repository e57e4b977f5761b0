#![forbid(unsafe_code)]

//! Transition negotiation.
//!
//! Turns a ranked candidate list into at most one target state by asking a
//! permission check for each candidate in order. The first permitted
//! candidate wins and later candidates are never consulted. An empty result
//! is a normal outcome: the panel keeps its current state.

use crate::state::PanelState;

/// Pick the first candidate `permits` accepts.
///
/// `permits` is called once per candidate, in order, stopping at the first
/// `true`.
pub fn negotiate(
    candidates: &[PanelState],
    mut permits: impl FnMut(PanelState) -> bool,
) -> Option<PanelState> {
    let chosen = candidates.iter().copied().find(|&candidate| permits(candidate));
    tracing::debug!(
        message = "flap.negotiate",
        candidates = ?candidates,
        chosen = chosen.map_or("none", PanelState::name),
    );
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use PanelState::{Compressed, Dismissed, Expanded};

    #[test]
    fn first_permitted_wins() {
        assert_eq!(negotiate(&[Dismissed, Compressed, Expanded], |_| true), Some(Dismissed));
        assert_eq!(
            negotiate(&[Dismissed, Compressed, Expanded], |s| s != Dismissed),
            Some(Compressed)
        );
    }

    #[test]
    fn checks_stop_after_first_accept() {
        let mut asked = Vec::new();
        let chosen = negotiate(&[Expanded, Compressed, Dismissed], |s| {
            asked.push(s);
            s == Compressed
        });
        assert_eq!(chosen, Some(Compressed));
        assert_eq!(asked, vec![Expanded, Compressed]);
    }

    #[test]
    fn all_rejected_is_none() {
        let mut asked = 0;
        let chosen = negotiate(&[Compressed, Dismissed], |_| {
            asked += 1;
            false
        });
        assert_eq!(chosen, None);
        assert_eq!(asked, 2);
    }

    #[test]
    fn empty_candidates_never_ask() {
        let chosen = negotiate(&[], |_| panic!("no candidate to check"));
        assert_eq!(chosen, None);
    }
}
