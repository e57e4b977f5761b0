//! Property-based invariant tests for the panel engine.
//!
//! 1. **Classification is pure**: identical inputs always rank the same
//!    candidates, and the edge rule wins over every velocity.
//! 2. **Negotiation short-circuits**: capability checks run in rank order
//!    and stop at the first permitted candidate.
//! 3. **Settle before notify**: an animated transition never notifies before
//!    its duration elapses, and every transition notifies exactly once.
//! 4. **Resting frame matches state**: once motion stops, the displayed
//!    frame is the committed frame of the current state, including after
//!    drags that were vetoed or interrupted a flight.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use flap_core::gesture::{DragPhase, DragSample};
use flap_panel::{
    ClassifyContext, EDGE_DISMISS_OFFSET, FlapController, FlapEvent, HeadlessHost, HookDelegate,
    PanOutcome, PanelConfig, PanelState, capability_allows, classify, negotiate,
};
use proptest::prelude::*;

fn state_strategy() -> impl Strategy<Value = PanelState> {
    prop_oneof![
        Just(PanelState::Compressed),
        Just(PanelState::Expanded),
        Just(PanelState::Dismissed),
    ]
}

fn ctx_strategy() -> impl Strategy<Value = ClassifyContext> {
    (state_strategy(), 1.0f64..3000.0, 1.0f64..2000.0).prop_map(
        |(current, trigger_velocity, content_height)| ClassifyContext {
            current,
            trigger_velocity,
            content_height,
        },
    )
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Expand(bool),
    Compress(bool),
    Dismiss(bool),
    Tick(u64),
    Drag { translation: f64, velocity: f64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Expand),
        any::<bool>().prop_map(Op::Compress),
        any::<bool>().prop_map(Op::Dismiss),
        (0u64..200).prop_map(Op::Tick),
        (-900.0f64..900.0, -4000.0f64..4000.0)
            .prop_map(|(translation, velocity)| Op::Drag { translation, velocity }),
    ]
}

fn recording_controller() -> (FlapController<HeadlessHost>, Rc<RefCell<Vec<FlapEvent>>>) {
    controller_with(PanelConfig::default())
}

fn controller_with(
    config: PanelConfig,
) -> (FlapController<HeadlessHost>, Rc<RefCell<Vec<FlapEvent>>>) {
    let events: Rc<RefCell<Vec<FlapEvent>>> = Rc::default();
    let sink = Rc::clone(&events);
    let mut flap = FlapController::new(HeadlessHost::new(320.0, 800.0), config)
        .expect("valid controller")
        .with_delegate(HookDelegate::new().on_event(move |e| sink.borrow_mut().push(e)));
    flap.present(false, false);
    flap.tick(Duration::ZERO);
    events.borrow_mut().clear();
    (flap, events)
}

proptest! {
    #[test]
    fn classification_is_deterministic(
        offset in -1000.0f64..2000.0,
        velocity in -10_000.0f64..10_000.0,
        ctx in ctx_strategy(),
    ) {
        let first = classify(offset, velocity, &ctx);
        let again = ctx;
        prop_assert_eq!(first, classify(offset, velocity, &again));
    }

    #[test]
    fn edge_rule_ignores_velocity(
        offset in -1000.0f64..EDGE_DISMISS_OFFSET,
        velocity in -10_000.0f64..10_000.0,
        ctx in ctx_strategy(),
    ) {
        prop_assert_eq!(
            classify(offset, velocity, &ctx),
            &[PanelState::Dismissed, PanelState::Compressed, PanelState::Expanded][..]
        );
    }

    #[test]
    fn candidates_are_distinct(
        offset in -1000.0f64..2000.0,
        velocity in -10_000.0f64..10_000.0,
        ctx in ctx_strategy(),
    ) {
        let candidates = classify(offset, velocity, &ctx);
        for (i, a) in candidates.iter().enumerate() {
            prop_assert!(!candidates[i + 1..].contains(a));
        }
    }

    #[test]
    fn negotiation_checks_in_order_and_stops(
        permitted in prop::array::uniform3(any::<bool>()),
        current in state_strategy(),
    ) {
        let candidates = [PanelState::Dismissed, PanelState::Compressed, PanelState::Expanded];
        let checks: Rc<RefCell<Vec<PanelState>>> = Rc::default();
        let (d, c, e) = (Rc::clone(&checks), Rc::clone(&checks), Rc::clone(&checks));
        let mut delegate = HookDelegate::new()
            .dismiss_when(move |_| { d.borrow_mut().push(PanelState::Dismissed); permitted[0] })
            .compress_when(move |_| { c.borrow_mut().push(PanelState::Compressed); permitted[1] })
            .expand_when(move |_| { e.borrow_mut().push(PanelState::Expanded); permitted[2] });
        let config = PanelConfig::default();

        let chosen = negotiate(&candidates, |candidate| {
            capability_allows(Some(&mut delegate), &config, current, candidate)
        });

        let first = permitted.iter().position(|&p| p);
        prop_assert_eq!(chosen, first.map(|i| candidates[i]));
        let consulted = first.map_or(candidates.len(), |i| i + 1);
        prop_assert_eq!(&*checks.borrow(), &candidates[..consulted]);
    }

    #[test]
    fn animated_transition_waits_for_full_duration(
        steps in prop::collection::vec(1u64..60, 1..20),
        target in state_strategy(),
    ) {
        let (mut flap, events) = recording_controller();
        match target {
            PanelState::Expanded => flap.expand(true, 0.0, None),
            PanelState::Compressed => flap.compress(true, 0.0, None),
            PanelState::Dismissed => flap.dismiss(true, 0.0, None),
        }

        let mut elapsed = 0u64;
        for ms in steps {
            if elapsed + ms >= 400 {
                break;
            }
            elapsed += ms;
            flap.tick(Duration::from_millis(ms));
            prop_assert!(events.borrow().is_empty(), "notified after {}ms", elapsed);
        }

        flap.tick(Duration::from_millis(400 - elapsed));
        prop_assert_eq!(events.borrow().len(), 1);
        flap.tick(Duration::from_millis(400));
        prop_assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn every_transition_notifies_once_and_rests_on_target(
        ops in prop::collection::vec(op_strategy(), 0..40),
        permitted in prop::array::uniform3(any::<bool>()),
    ) {
        let config = PanelConfig::new().capabilities(permitted[0], permitted[1], permitted[2]);
        let (mut flap, events) = controller_with(config);
        let mut transitions = 0usize;
        for op in ops {
            match op {
                Op::Expand(animated) => { flap.expand(animated, 0.0, None); transitions += 1; }
                Op::Compress(animated) => { flap.compress(animated, 0.0, None); transitions += 1; }
                Op::Dismiss(animated) => { flap.dismiss(animated, 0.0, None); transitions += 1; }
                Op::Tick(ms) => { flap.tick(Duration::from_millis(ms)); }
                Op::Drag { translation, velocity } => {
                    flap.handle_pan(DragPhase::Began);
                    flap.handle_pan(DragPhase::Changed(DragSample::new(translation, velocity)));
                    let outcome = flap.handle_pan(DragPhase::Ended(DragSample::new(translation, velocity)));
                    if matches!(outcome, PanOutcome::Transitioned { .. }) {
                        transitions += 1;
                    }
                }
            }
            prop_assert!(PanelState::ALL.contains(&flap.state()));
        }
        flap.tick(Duration::from_secs(1));

        let settles = events
            .borrow()
            .iter()
            .filter(|e| !matches!(e, FlapEvent::DidPan { .. }))
            .count();
        prop_assert_eq!(settles, transitions);
        prop_assert!(!flap.is_animating());
        prop_assert_eq!(flap.frame(), flap.target_frame(flap.state()));
    }
}
