//! Breathing session controller.
//!
//! # Responsibility
//! - Run the 60 s countdown and the inhale/hold/exhale phase machine.
//! - Trigger haptics on each phase and stop them when the session ends.
//! - Emit tick, phase, label and session-ended events.
//!
//! # Invariants
//! - At most one countdown chain and one phase chain are pending.
//! - `start` only succeeds from `Mode::Idle`.
//! - Ending a session cancels every pending timer before `SessionEnded` is
//!   emitted; nothing from that session fires afterwards.
//! - A countdown expiry due at the same instant as a phase change wins.

use crate::config::BreathingConfig;
use crate::error::{CoreError, CoreResult};
use crate::haptics::signaler::{VibrationCue, VibrationSignaler};
use crate::model::event::{CoreEvent, EndReason, EventSink};
use crate::model::session::{Mode, Phase, Session};
use crate::timer::scheduler::{Scheduler, TimerPriority};
use log::{debug, info, warn};
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    CountdownTick,
    PhaseEnd(Phase),
    LabelFade(Phase),
}

impl TimerAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::CountdownTick => "countdown_tick",
            Self::PhaseEnd(_) => "phase_end",
            Self::LabelFade(_) => "label_fade",
        }
    }
}

/// Pending action tagged with the session it belongs to.
#[derive(Debug, Clone, Copy)]
struct SessionTimer {
    epoch: u64,
    action: TimerAction,
}

/// Owns the countdown and phase state machine of one session at a time.
pub struct BreathingController {
    config: BreathingConfig,
    signaler: VibrationSignaler,
    scheduler: Scheduler<SessionTimer>,
    session: Session,
    /// Incremented on every start; timers from older sessions are stale.
    epoch: u64,
}

impl BreathingController {
    pub fn new(config: BreathingConfig, signaler: VibrationSignaler) -> Self {
        let session = Session::idle(config.session_secs);
        Self {
            config,
            signaler,
            scheduler: Scheduler::new(),
            session,
            epoch: 0,
        }
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    /// Virtual time elapsed since the controller was created.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_len()
    }

    /// Time until the next pending timer, if any.
    pub fn time_to_next_timer(&self) -> Option<Duration> {
        self.scheduler
            .next_due()
            .map(|due| due.saturating_sub(self.scheduler.now()))
    }

    /// Starts a session at `Phase::Inhale` with a full countdown.
    ///
    /// # Errors
    /// - `CoreError::InvalidState` unless the mode is `Mode::Idle`.
    pub fn start(&mut self, sink: &mut impl EventSink) -> CoreResult<()> {
        if self.session.mode != Mode::Idle {
            warn!(
                "event=session_start module=breathing status=error reason=invalid_state mode={}",
                self.session.mode.as_str()
            );
            return Err(CoreError::InvalidState {
                operation: "start",
                mode: self.session.mode,
            });
        }

        self.epoch += 1;
        self.session = Session {
            mode: Mode::Breathing,
            phase: None,
            remaining_secs: self.config.session_secs,
        };
        info!(
            "event=session_start module=breathing status=ok epoch={} session_secs={}",
            self.epoch, self.config.session_secs
        );

        sink.emit(CoreEvent::Tick {
            remaining_secs: self.session.remaining_secs,
        });
        self.schedule(
            TICK_INTERVAL,
            TimerPriority::Deadline,
            TimerAction::CountdownTick,
        );
        self.enter_phase(Phase::Inhale, sink);
        Ok(())
    }

    /// Ends the running session early.
    ///
    /// Returns `false` (and does nothing) when no session is running.
    pub fn skip(&mut self, sink: &mut impl EventSink) -> bool {
        self.end_session(EndReason::Skipped, sink)
    }

    /// Returns from exploration to the start screen so a new session can run.
    ///
    /// # Errors
    /// - `CoreError::InvalidState` unless the mode is `Mode::Explore`.
    pub fn reset(&mut self) -> CoreResult<()> {
        if self.session.mode != Mode::Explore {
            return Err(CoreError::InvalidState {
                operation: "reset",
                mode: self.session.mode,
            });
        }
        self.session = Session::idle(self.config.session_secs);
        info!("event=session_reset module=breathing status=ok");
        Ok(())
    }

    /// Moves the clock forward by `elapsed`, firing every timer due on the way
    /// in order.
    pub fn advance(&mut self, elapsed: Duration, sink: &mut impl EventSink) {
        let deadline = self.scheduler.now() + elapsed;
        while let Some(timer) = self.scheduler.pop_due(deadline) {
            self.dispatch(timer, sink);
        }
        self.scheduler.settle(deadline);
    }

    fn dispatch(&mut self, timer: SessionTimer, sink: &mut impl EventSink) {
        if timer.epoch != self.epoch || !self.session.is_breathing() {
            debug!(
                "event=timer_discarded module=breathing status=skip action={} timer_epoch={} epoch={}",
                timer.action.as_str(),
                timer.epoch,
                self.epoch
            );
            return;
        }

        match timer.action {
            TimerAction::CountdownTick => self.on_tick(sink),
            TimerAction::PhaseEnd(phase) if self.session.phase == Some(phase) => {
                self.enter_phase(phase.next(), sink);
            }
            TimerAction::LabelFade(phase) if self.session.phase == Some(phase) => {
                sink.emit(CoreEvent::LabelChanged {
                    phase,
                    label: phase.label(),
                });
            }
            action => debug!(
                "event=timer_discarded module=breathing status=skip action={} reason=phase_moved",
                action.as_str()
            ),
        }
    }

    fn on_tick(&mut self, sink: &mut impl EventSink) {
        self.session.remaining_secs = self.session.remaining_secs.saturating_sub(1);
        sink.emit(CoreEvent::Tick {
            remaining_secs: self.session.remaining_secs,
        });

        if self.session.remaining_secs == 0 {
            self.end_session(EndReason::Completed, sink);
        } else {
            self.schedule(
                TICK_INTERVAL,
                TimerPriority::Deadline,
                TimerAction::CountdownTick,
            );
        }
    }

    fn enter_phase(&mut self, phase: Phase, sink: &mut impl EventSink) {
        self.session.phase = Some(phase);
        let duration_secs = self.config.phase_secs(phase);
        debug!(
            "event=phase_changed module=breathing status=ok phase={} duration_secs={} remaining_secs={}",
            phase.as_str(),
            duration_secs,
            self.session.remaining_secs
        );

        sink.emit(CoreEvent::PhaseChanged {
            phase,
            duration_secs,
        });
        self.signaler.signal(VibrationCue::Phase(phase));
        self.schedule(
            self.config.label_fade(),
            TimerPriority::Cosmetic,
            TimerAction::LabelFade(phase),
        );
        self.schedule(
            self.config.phase_duration(phase),
            TimerPriority::Phase,
            TimerAction::PhaseEnd(phase),
        );
    }

    fn end_session(&mut self, reason: EndReason, sink: &mut impl EventSink) -> bool {
        if !self.session.is_breathing() {
            debug!(
                "event=session_end module=breathing status=skip reason={} mode={}",
                reason.as_str(),
                self.session.mode.as_str()
            );
            return false;
        }

        let cancelled = self.scheduler.cancel_all();
        self.signaler.signal(VibrationCue::Stop);
        self.session.mode = Mode::Explore;
        self.session.phase = None;
        info!(
            "event=session_end module=breathing status=ok reason={} remaining_secs={} cancelled_timers={}",
            reason.as_str(),
            self.session.remaining_secs,
            cancelled
        );

        sink.emit(CoreEvent::SessionEnded { reason });
        true
    }

    fn schedule(&mut self, delay: Duration, priority: TimerPriority, action: TimerAction) {
        self.scheduler.schedule(
            delay,
            priority,
            SessionTimer {
                epoch: self.epoch,
                action,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::BreathingController;
    use crate::config::BreathingConfig;
    use crate::error::CoreError;
    use crate::haptics::signaler::VibrationSignaler;
    use crate::model::event::{CoreEvent, EndReason};
    use crate::model::session::{Mode, Phase};
    use std::time::Duration;

    fn controller() -> BreathingController {
        BreathingController::new(BreathingConfig::default(), VibrationSignaler::silent())
    }

    fn phases(events: &[CoreEvent]) -> Vec<(Phase, u32)> {
        events
            .iter()
            .filter_map(|event| match event {
                CoreEvent::PhaseChanged {
                    phase,
                    duration_secs,
                } => Some((*phase, *duration_secs)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_begins_at_inhale_with_full_countdown() {
        let mut controller = controller();
        let mut events: Vec<CoreEvent> = Vec::new();
        controller.start(&mut events).expect("start from idle");

        let session = controller.session();
        assert_eq!(session.mode, Mode::Breathing);
        assert_eq!(session.phase, Some(Phase::Inhale));
        assert_eq!(session.remaining_secs, 60);
        assert_eq!(
            events,
            vec![
                CoreEvent::Tick { remaining_secs: 60 },
                CoreEvent::PhaseChanged {
                    phase: Phase::Inhale,
                    duration_secs: 4
                },
            ]
        );
    }

    #[test]
    fn second_start_is_invalid_state() {
        let mut controller = controller();
        let mut events: Vec<CoreEvent> = Vec::new();
        controller.start(&mut events).expect("first start");

        let err = controller.start(&mut events).expect_err("second start");
        assert_eq!(
            err,
            CoreError::InvalidState {
                operation: "start",
                mode: Mode::Breathing
            }
        );
        assert_eq!(controller.pending_timers(), 3);
    }

    #[test]
    fn label_follows_phase_after_fade() {
        let mut controller = controller();
        let mut events: Vec<CoreEvent> = Vec::new();
        controller.start(&mut events).expect("start");
        events.clear();

        controller.advance(Duration::from_millis(499), &mut events);
        assert!(events.is_empty());
        controller.advance(Duration::from_millis(1), &mut events);
        assert_eq!(
            events,
            vec![CoreEvent::LabelChanged {
                phase: Phase::Inhale,
                label: "Breathe In..."
            }]
        );
    }

    #[test]
    fn phases_follow_four_seven_eight_cycle() {
        let mut controller = controller();
        let mut events: Vec<CoreEvent> = Vec::new();
        controller.start(&mut events).expect("start");
        controller.advance(Duration::from_secs(19), &mut events);

        assert_eq!(
            phases(&events),
            vec![
                (Phase::Inhale, 4),
                (Phase::Hold, 7),
                (Phase::Exhale, 8),
                (Phase::Inhale, 4),
            ]
        );
    }

    #[test]
    fn skip_outside_breathing_is_a_no_op() {
        let mut controller = controller();
        let mut events: Vec<CoreEvent> = Vec::new();
        assert!(!controller.skip(&mut events));
        assert!(events.is_empty());
        assert_eq!(controller.mode(), Mode::Idle);
    }

    #[test]
    fn skip_cancels_every_timer() {
        let mut controller = controller();
        let mut events: Vec<CoreEvent> = Vec::new();
        controller.start(&mut events).expect("start");
        controller.advance(Duration::from_millis(4_250), &mut events);
        events.clear();

        assert!(controller.skip(&mut events));
        assert_eq!(
            events,
            vec![CoreEvent::SessionEnded {
                reason: EndReason::Skipped
            }]
        );
        assert_eq!(controller.pending_timers(), 0);
        assert_eq!(controller.session().phase, None);
        assert!(!controller.skip(&mut events));
    }

    #[test]
    fn countdown_expiry_wins_over_coinciding_phase_change() {
        let config = BreathingConfig {
            session_secs: 4,
            ..BreathingConfig::default()
        };
        let mut controller = BreathingController::new(config, VibrationSignaler::silent());
        let mut events: Vec<CoreEvent> = Vec::new();
        controller.start(&mut events).expect("start");
        controller.advance(Duration::from_secs(10), &mut events);

        assert_eq!(phases(&events), vec![(Phase::Inhale, 4)]);
        assert_eq!(
            events.last(),
            Some(&CoreEvent::SessionEnded {
                reason: EndReason::Completed
            })
        );
    }

    #[test]
    fn reset_only_from_explore() {
        let mut controller = controller();
        let mut events: Vec<CoreEvent> = Vec::new();
        assert!(controller.reset().is_err());

        controller.start(&mut events).expect("start");
        controller.skip(&mut events);
        controller.reset().expect("reset from explore");
        assert_eq!(controller.mode(), Mode::Idle);
        controller.start(&mut events).expect("restart after reset");
    }

    #[test]
    fn time_to_next_timer_tracks_label_fade() {
        let mut controller = controller();
        let mut events: Vec<CoreEvent> = Vec::new();
        assert_eq!(controller.time_to_next_timer(), None);
        controller.start(&mut events).expect("start");
        assert_eq!(
            controller.time_to_next_timer(),
            Some(Duration::from_millis(500))
        );
    }
}
