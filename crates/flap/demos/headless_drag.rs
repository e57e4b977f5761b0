//! Drive a flap panel through a scripted pointer session without a renderer.
//!
//! Run with: `cargo run -p flap --example headless_drag [config.toml]`
//!
//! Set `RUST_LOG=flap_panel=debug` to see transitions and negotiation.

use std::time::Duration;

use flap::prelude::*;
use tracing_subscriber::EnvFilter;
use web_time::Instant;

const FRAME: Duration = Duration::from_millis(16);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .try_init();
}

/// Feed pointer positions `ys` at one frame apart, then release at the last.
fn swipe(panel: &mut FlapController<HeadlessHost>, pan: &mut PanRecognizer, ys: &[f64]) {
    let mut now = Instant::now();
    let Some((&first, rest)) = ys.split_first() else {
        return;
    };

    let mut phases: Vec<DragPhase> = pan.press(first, now).into_iter().collect();
    for &y in rest {
        now += FRAME;
        phases.extend(pan.motion(y, now));
    }
    now += FRAME;
    phases.extend(pan.release(*rest.last().unwrap_or(&first), now));

    for phase in phases {
        let outcome = panel.handle_pan(phase);
        tracing::info!(?phase, ?outcome, "pan");
    }
}

fn settle(panel: &mut FlapController<HeadlessHost>) {
    let mut frames = 0;
    while panel.is_animating() || frames == 0 {
        panel.tick(FRAME);
        frames += 1;
    }
    let frame = panel.frame();
    println!(
        "{:<10} offset {:>7.1}  backdrop {:.2}  ({frames} frames)",
        panel.state().name(),
        frame.offset,
        frame.backdrop_alpha,
    );
}

fn main() -> flap::Result<()> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => flap::load_config(path)?,
        None => PanelConfig::default(),
    };

    let delegate = HookDelegate::new().on_event(|event| tracing::info!(?event, "delegate"));
    let mut panel = flap::present_compressed(HeadlessHost::new(390.0, 844.0), config)?;
    panel.set_delegate(Some(Box::new(delegate)));
    settle(&mut panel);

    let mut pan = PanRecognizer::new(PanConfig::default());

    // Fast upward swipe: flick to expanded.
    swipe(&mut panel, &mut pan, &[800.0, 790.0, 700.0, 560.0]);
    settle(&mut panel);

    // Fast downward swipe from expanded: back to the peek.
    swipe(&mut panel, &mut pan, &[100.0, 110.0, 200.0, 300.0, 400.0]);
    settle(&mut panel);

    panel.expand(true, 0.0, Some(Box::new(|| println!("expanded hook"))));
    settle(&mut panel);
    panel.compress(false, 0.0, None);
    settle(&mut panel);

    // Tap outside the content.
    panel.set_forwards_touches(true);
    println!("hit (10, 100): {}", panel.hit_test(10.0, 100.0));
    panel.backdrop_tapped();
    settle(&mut panel);
    println!("attached after dismiss: {}", panel.is_attached());

    Ok(())
}
