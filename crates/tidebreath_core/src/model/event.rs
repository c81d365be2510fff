//! Core-to-presentation events.
//!
//! The presentation layer renders these; core never holds view state.

use crate::model::bottle::BottleMessage;
use crate::model::session::Phase;
use serde::Serialize;

/// Why a breathing session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Countdown reached zero.
    Completed,
    /// User skipped the rest of the session.
    Skipped,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }
}

/// Event emitted by the core, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CoreEvent {
    /// A phase began; emitted at the instant of the transition.
    PhaseChanged { phase: Phase, duration_secs: u32 },
    /// Countdown value after a start or an elapsed second.
    Tick { remaining_secs: u32 },
    /// Guidance label to show once the fade-out finished.
    LabelChanged { phase: Phase, label: &'static str },
    /// Emitted exactly once per session.
    SessionEnded { reason: EndReason },
    /// Wave returns to rest after a session.
    SeaCalmed,
    BottleCreated { message: BottleMessage },
    /// Transient user-visible notice (toast).
    Notice { message: String },
}

impl CoreEvent {
    /// Stable event name used in logs and FFI payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PhaseChanged { .. } => "phase_changed",
            Self::Tick { .. } => "tick",
            Self::LabelChanged { .. } => "label_changed",
            Self::SessionEnded { .. } => "session_ended",
            Self::SeaCalmed => "sea_calmed",
            Self::BottleCreated { .. } => "bottle_created",
            Self::Notice { .. } => "notice",
        }
    }
}

/// Receiver of core events.
pub trait EventSink {
    fn emit(&mut self, event: CoreEvent);
}

impl EventSink for Vec<CoreEvent> {
    fn emit(&mut self, event: CoreEvent) {
        self.push(event);
    }
}
