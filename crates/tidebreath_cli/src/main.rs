//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tidebreath_core` linkage.
//! - Print a deterministic, fast-forwarded session transcript.

use std::time::Duration;
use tidebreath_core::{AppConfig, AppContext, CoreEvent, SessionOrchestrator, ThreadRandom};

const TRANSCRIPT_SEED: u64 = 7;

fn main() {
    println!("tidebreath_core ping={}", tidebreath_core::ping());
    println!("tidebreath_core version={}", tidebreath_core::core_version());

    let context = AppContext::new(AppConfig::default())
        .with_random(Box::new(ThreadRandom::seeded(TRANSCRIPT_SEED)));
    let mut orchestrator = match SessionOrchestrator::new(context) {
        Ok(orchestrator) => orchestrator,
        Err(err) => {
            eprintln!("tidebreath_core init failed: {err}");
            std::process::exit(1);
        }
    };

    for bottle in orchestrator.bottles() {
        let placement = bottle.placement();
        println!(
            "bottle left={:.1}% bottom={:.1}% author={}",
            placement.left_percent,
            placement.bottom_percent,
            bottle.author()
        );
    }

    if let Err(err) = orchestrator.start_session() {
        eprintln!("session start failed: {err}");
        std::process::exit(1);
    }
    let mut elapsed_secs = 0;
    print_events(elapsed_secs, &mut orchestrator);
    while orchestrator.session().is_breathing() {
        orchestrator.advance(Duration::from_secs(1));
        elapsed_secs += 1;
        print_events(elapsed_secs, &mut orchestrator);
    }
}

fn print_events(elapsed_secs: u32, orchestrator: &mut SessionOrchestrator) {
    for event in orchestrator.drain_events() {
        match event {
            // Countdown ticks are left out of the transcript.
            CoreEvent::Tick { .. } => {}
            CoreEvent::PhaseChanged {
                phase,
                duration_secs,
            } => println!(
                "t={elapsed_secs:>2}s phase={} duration={duration_secs}s",
                phase.as_str()
            ),
            CoreEvent::LabelChanged { label, .. } => println!("t={elapsed_secs:>2}s label={label}"),
            CoreEvent::SessionEnded { reason } => {
                println!("t={elapsed_secs:>2}s session_ended reason={}", reason.as_str())
            }
            CoreEvent::Notice { message } => println!("t={elapsed_secs:>2}s notice={message}"),
            other => println!("t={elapsed_secs:>2}s {}", other.name()),
        }
    }
}
