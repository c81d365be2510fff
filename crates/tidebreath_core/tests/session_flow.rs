use std::time::Duration;
use tidebreath_core::{
    AppConfig, AppContext, CoreError, CoreEvent, EndReason, Mode, Phase, ScriptedRandom,
    SessionOrchestrator, SEA_CALM_NOTICE,
};

fn orchestrator() -> SessionOrchestrator {
    let context =
        AppContext::new(AppConfig::default()).with_random(Box::new(ScriptedRandom::new([0.5])));
    let mut orchestrator = SessionOrchestrator::new(context).expect("default config is valid");
    orchestrator.drain_events();
    orchestrator
}

fn tick_for(orchestrator: &mut SessionOrchestrator, seconds: u32) {
    for _ in 0..seconds {
        orchestrator.advance(Duration::from_secs(1));
    }
}

fn count_ended(events: &[CoreEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, CoreEvent::SessionEnded { .. }))
        .count()
}

#[test]
fn only_first_start_from_idle_succeeds() {
    let mut orchestrator = orchestrator();
    orchestrator.start_session().expect("first start");

    for _ in 0..3 {
        let err = orchestrator.start_session().unwrap_err();
        assert!(matches!(err, CoreError::InvalidState { .. }));
    }
    assert_eq!(orchestrator.mode(), Mode::Breathing);

    let notices = orchestrator
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, CoreEvent::Notice { .. }))
        .count();
    assert_eq!(notices, 3);
}

#[test]
fn start_begins_at_inhale_with_sixty_seconds() {
    let mut orchestrator = orchestrator();
    orchestrator.start_session().unwrap();

    let session = orchestrator.session();
    assert_eq!(session.phase, Some(Phase::Inhale));
    assert_eq!(session.remaining_secs, 60);
}

#[test]
fn phase_sequence_repeats_every_nineteen_seconds() {
    let mut orchestrator = orchestrator();
    orchestrator.start_session().unwrap();
    tick_for(&mut orchestrator, 40);

    let changes: Vec<_> = orchestrator
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            CoreEvent::PhaseChanged {
                phase,
                duration_secs,
            } => Some((phase, duration_secs)),
            _ => None,
        })
        .collect();

    // t=0, 4, 11, 19, 23, 30, 38
    assert_eq!(
        changes,
        vec![
            (Phase::Inhale, 4),
            (Phase::Hold, 7),
            (Phase::Exhale, 8),
            (Phase::Inhale, 4),
            (Phase::Hold, 7),
            (Phase::Exhale, 8),
            (Phase::Inhale, 4),
        ]
    );
}

#[test]
fn sixty_ticks_complete_the_session_once() {
    let mut orchestrator = orchestrator();
    orchestrator.start_session().unwrap();
    tick_for(&mut orchestrator, 60);

    let events = orchestrator.drain_events();
    assert_eq!(count_ended(&events), 1);
    assert!(events.contains(&CoreEvent::SessionEnded {
        reason: EndReason::Completed
    }));
    assert_eq!(orchestrator.mode(), Mode::Explore);
    assert_eq!(orchestrator.session().phase, None);

    let ticks: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            CoreEvent::Tick { remaining_secs } => Some(*remaining_secs),
            _ => None,
        })
        .collect();
    assert_eq!(ticks.first(), Some(&60));
    assert_eq!(ticks.last(), Some(&0));
    assert_eq!(ticks.len(), 61);

    tick_for(&mut orchestrator, 30);
    assert!(orchestrator.drain_events().is_empty());
}

#[test]
fn skip_at_tick_ten_silences_pending_timers() {
    let mut orchestrator = orchestrator();
    orchestrator.start_session().unwrap();
    tick_for(&mut orchestrator, 10);
    orchestrator.drain_events();

    orchestrator.skip_session();
    assert_eq!(orchestrator.mode(), Mode::Explore);
    assert_eq!(orchestrator.session().phase, None);
    assert_eq!(orchestrator.time_to_next_timer(), None);

    // Covers the exhale due at t=11 and the cycle restart due at t=19.
    orchestrator.advance(Duration::from_secs(60));

    let events = orchestrator.drain_events();
    assert_eq!(
        events,
        vec![
            CoreEvent::SessionEnded {
                reason: EndReason::Skipped
            },
            CoreEvent::SeaCalmed,
            CoreEvent::Notice {
                message: SEA_CALM_NOTICE.to_string()
            },
        ]
    );
}

#[test]
fn skip_while_idle_or_exploring_is_silent() {
    let mut orchestrator = orchestrator();
    orchestrator.skip_session();
    assert_eq!(orchestrator.mode(), Mode::Idle);

    orchestrator.start_session().unwrap();
    orchestrator.skip_session();
    orchestrator.drain_events();

    orchestrator.skip_session();
    assert!(orchestrator.drain_events().is_empty());
}

#[test]
fn skip_suppresses_pending_label_change() {
    let mut orchestrator = orchestrator();
    orchestrator.start_session().unwrap();
    orchestrator.advance(Duration::from_millis(200));
    orchestrator.skip_session();
    orchestrator.drain_events();

    orchestrator.advance(Duration::from_secs(1));
    assert!(orchestrator.drain_events().is_empty());
}

#[test]
fn return_to_shore_allows_a_fresh_session() {
    let mut orchestrator = orchestrator();
    let err = orchestrator.return_to_shore().unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidState {
            mode: Mode::Idle,
            ..
        }
    ));

    orchestrator.start_session().unwrap();
    tick_for(&mut orchestrator, 60);
    orchestrator.return_to_shore().unwrap();
    assert_eq!(orchestrator.mode(), Mode::Idle);

    orchestrator.drain_events();
    orchestrator.start_session().unwrap();
    assert_eq!(orchestrator.session().remaining_secs, 60);
    tick_for(&mut orchestrator, 60);
    assert_eq!(count_ended(&orchestrator.drain_events()), 1);
}

#[test]
fn one_large_advance_matches_many_small_ones() {
    let mut stepped = orchestrator();
    stepped.start_session().unwrap();
    tick_for(&mut stepped, 60);

    let mut jumped = orchestrator();
    jumped.start_session().unwrap();
    jumped.advance(Duration::from_secs(60));

    assert_eq!(stepped.drain_events(), jumped.drain_events());
}
