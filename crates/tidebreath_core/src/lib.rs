//! Core logic for the Tidebreath relaxation widget.
//! This crate owns the breathing session state machine and the bottle scene.

pub mod config;
pub mod error;
pub mod haptics;
pub mod logging;
pub mod model;
pub mod random;
pub mod repo;
pub mod service;
pub mod timer;

pub use config::{AppConfig, BottleConfig, BreathingConfig, PercentRange, MAX_SESSION_SECS};
pub use error::{CoreError, CoreResult, ValidationError};
pub use haptics::signaler::{
    pattern_for, HapticDevice, NoHaptics, VibrationCue, VibrationPattern, VibrationSignaler,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::bottle::{
    BottleId, BottleMessage, BottleOrigin, BottleReading, Placement, DEFAULT_AUTHOR,
};
pub use model::event::{CoreEvent, EndReason, EventSink};
pub use model::session::{Mode, Phase, Session, WaveEasing, WavePosture};
pub use random::{RandomSource, ScriptedRandom, ThreadRandom};
pub use repo::bottle_repo::{BottleRepository, InMemoryBottleRepository};
pub use service::bottle_store::{BottleStore, CatalogEntry, SEED_CATALOG};
pub use service::breathing_controller::BreathingController;
pub use service::session_orchestrator::{
    notice_for, AppContext, SessionOrchestrator, BOTTLE_SENT_NOTICE, EMPTY_MESSAGE_NOTICE,
    MAX_PENDING_EVENTS, SEA_CALM_NOTICE,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
