//! Top-level session orchestration.
//!
//! # Responsibility
//! - Dispatch user intents to the breathing controller and bottle store.
//! - Turn recoverable errors into transient notices.
//! - Queue every event for the presentation layer in emission order.
//!
//! # Invariants
//! - Holds no timing logic; time only moves through `advance`.
//! - The sea-calm notice is surfaced once per ended session.
//! - At most `MAX_PENDING_EVENTS` events are queued; the oldest are dropped
//!   first when the host stops draining.

use crate::config::AppConfig;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::haptics::signaler::{HapticDevice, NoHaptics, VibrationSignaler};
use crate::model::bottle::{BottleId, BottleMessage, BottleReading};
use crate::model::event::CoreEvent;
use crate::model::session::{Mode, Session};
use crate::random::{RandomSource, ThreadRandom};
use crate::repo::bottle_repo::InMemoryBottleRepository;
use crate::service::bottle_store::BottleStore;
use crate::service::breathing_controller::BreathingController;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::Duration;

/// Upper bound of the undrained event queue.
pub const MAX_PENDING_EVENTS: usize = 256;

pub const SEA_CALM_NOTICE: &str = "The sea is calm. Feel free to explore.";
pub const BOTTLE_SENT_NOTICE: &str = "Your message was cast into the sea.";
pub const EMPTY_MESSAGE_NOTICE: &str = "Please write a message first.";

/// Collaborators and settings for one orchestrator instance.
pub struct AppContext {
    pub config: AppConfig,
    pub haptics: Box<dyn HapticDevice>,
    pub random: Box<dyn RandomSource>,
}

impl AppContext {
    /// Stock configuration without haptics and with entropy-seeded placement.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            haptics: Box::new(NoHaptics),
            random: Box::new(ThreadRandom::from_entropy()),
        }
    }

    pub fn with_haptics(mut self, haptics: Box<dyn HapticDevice>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn with_random(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// Owns the controller, the bottle store and the outgoing event queue.
pub struct SessionOrchestrator {
    controller: BreathingController,
    bottles: BottleStore<InMemoryBottleRepository>,
    outbox: VecDeque<CoreEvent>,
}

impl SessionOrchestrator {
    /// Builds the scene and seeds the configured number of bottles.
    ///
    /// # Errors
    /// - `CoreError::Validation` when the configuration is invalid.
    pub fn new(context: AppContext) -> CoreResult<Self> {
        let AppContext {
            config,
            haptics,
            random,
        } = context;
        config.validate()?;

        let controller =
            BreathingController::new(config.breathing, VibrationSignaler::new(haptics));
        let seed_count = config.bottles.seed_count;
        let mut bottles = BottleStore::new(InMemoryBottleRepository::new(), random, config.bottles);
        bottles.seed(seed_count)?;

        info!(
            "event=orchestrator_init module=orchestrator status=ok seed_count={}",
            seed_count
        );
        Ok(Self {
            controller,
            bottles,
            outbox: VecDeque::new(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn session(&self) -> Session {
        self.controller.session()
    }

    /// Time until the controller next needs `advance`, if a timer is pending.
    pub fn time_to_next_timer(&self) -> Option<Duration> {
        self.controller.time_to_next_timer()
    }

    /// Starts a breathing session.
    ///
    /// # Errors
    /// - `CoreError::InvalidState` unless idle; a notice is queued as well.
    pub fn start_session(&mut self) -> CoreResult<()> {
        let mut events = Vec::new();
        let result = self.controller.start(&mut events);
        self.forward(events);
        result.map_err(|err| self.reject("start_session", err))
    }

    /// Skips the rest of the running session; no-op when not breathing.
    pub fn skip_session(&mut self) {
        let mut events = Vec::new();
        self.controller.skip(&mut events);
        self.forward(events);
    }

    /// Feeds elapsed wall time into the controller.
    pub fn advance(&mut self, elapsed: Duration) {
        let mut events = Vec::new();
        self.controller.advance(elapsed, &mut events);
        self.forward(events);
    }

    /// Leaves exploration for the start screen.
    ///
    /// # Errors
    /// - `CoreError::InvalidState` unless exploring.
    pub fn return_to_shore(&mut self) -> CoreResult<()> {
        self.controller
            .reset()
            .map_err(|err| self.reject("return_to_shore", err))
    }

    /// Submits a user bottle.
    ///
    /// # Errors
    /// - `CoreError::Validation` for blank text; a notice is queued as well.
    pub fn throw_bottle(&mut self, text: &str, author: Option<&str>) -> CoreResult<BottleMessage> {
        match self.bottles.add(text, author) {
            Ok(message) => {
                self.enqueue(CoreEvent::BottleCreated {
                    message: message.clone(),
                });
                self.notify(BOTTLE_SENT_NOTICE);
                Ok(message)
            }
            Err(err) => Err(self.reject("throw_bottle", err)),
        }
    }

    pub fn bottles(&self) -> &[BottleMessage] {
        self.bottles.all()
    }

    pub fn open_bottle(&self, id: BottleId) -> Option<BottleReading> {
        self.bottles.read(id)
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<CoreEvent> {
        self.outbox.drain(..).collect()
    }

    fn forward(&mut self, events: Vec<CoreEvent>) {
        for event in events {
            let ended = matches!(event, CoreEvent::SessionEnded { .. });
            self.enqueue(event);
            if ended {
                self.enqueue(CoreEvent::SeaCalmed);
                self.notify(SEA_CALM_NOTICE);
            }
        }
    }

    fn enqueue(&mut self, event: CoreEvent) {
        if self.outbox.len() == MAX_PENDING_EVENTS {
            if let Some(dropped) = self.outbox.pop_front() {
                debug!(
                    "event=event_dropped module=orchestrator status=skip dropped={} limit={}",
                    dropped.name(),
                    MAX_PENDING_EVENTS
                );
            }
        }
        self.outbox.push_back(event);
    }

    fn reject(&mut self, intent: &str, err: CoreError) -> CoreError {
        warn!(
            "event=intent_rejected module=orchestrator status=error intent={} error={}",
            intent, err
        );
        self.notify(&notice_for(&err));
        err
    }

    fn notify(&mut self, message: &str) {
        self.enqueue(CoreEvent::Notice {
            message: message.to_string(),
        });
    }
}

/// User-facing text for a rejected intent.
pub fn notice_for(err: &CoreError) -> String {
    match err {
        CoreError::Validation(ValidationError::EmptyText) => EMPTY_MESSAGE_NOTICE.to_string(),
        CoreError::InvalidState {
            mode: Mode::Breathing,
            ..
        } => "A breathing session is already in progress.".to_string(),
        CoreError::InvalidState { .. } => "That is not available right now.".to_string(),
        CoreError::Validation(other) => other.to_string(),
    }
}
