//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose session and bottle intents to Dart via FRB.
//! - Drive the core clock from the host's monotonic time.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One orchestrator per process, created on first use.
//! - Events and haptic commands are returned by `session_pump` in emission
//!   order.

use crate::haptics::HostHaptics;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tidebreath_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    logging_status as logging_status_inner, AppConfig, AppContext, BottleId, BottleMessage,
    BottleOrigin, BottleReading, CoreEvent, Session, SessionOrchestrator, WavePosture,
};

static RUNTIME: Mutex<Option<FfiRuntime>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Active logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingStatusView {
    pub level: String,
    pub log_dir: String,
}

/// Reports the active logging setup; `None` until `init_logging` succeeded.
#[flutter_rust_bridge::frb(sync)]
pub fn logging_status() -> Option<LoggingStatusView> {
    logging_status_inner().map(|(level, dir)| LoggingStatusView {
        level: level.to_string(),
        log_dir: dir.display().to_string(),
    })
}

/// Session snapshot for the breathing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStateView {
    /// `idle|breathing|explore`.
    pub mode: String,
    /// `inhale|hold|exhale`, absent unless breathing.
    pub phase: Option<String>,
    pub remaining_secs: u32,
    /// Milliseconds until the next scheduled change; lets the host sleep.
    pub next_change_ms: Option<u64>,
}

/// Bottle projection for the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct BottleItem {
    pub bottle_id: String,
    pub text: String,
    pub author: String,
    pub left_percent: f64,
    pub bottom_percent: f64,
    pub bob_delay_ms: u32,
    /// `seed|user`.
    pub origin: String,
}

/// Ocean wave target the renderer animates toward.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveItem {
    pub translate_y_percent: f64,
    pub scale_y: f64,
    /// `ease-out|linear|ease-in-out`.
    pub easing: String,
    pub transition_ms: u64,
}

/// Flattened core event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventItem {
    /// `phase_changed|tick|label_changed|session_ended|sea_calmed|bottle_created|notice`.
    pub kind: String,
    pub phase: Option<String>,
    /// Phase duration for `phase_changed`, remaining seconds for `tick`.
    pub seconds: Option<u32>,
    /// Label, end reason or notice text.
    pub text: Option<String>,
    pub bottle: Option<BottleItem>,
    /// Present on `phase_changed` and `sea_calmed`.
    pub wave: Option<WaveItem>,
}

/// Result of one clock pump.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpResponse {
    pub events: Vec<EventItem>,
    /// Vibration patterns to play in order; an empty pattern means stop.
    pub haptics: Vec<Vec<u32>>,
    pub state: SessionStateView,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: &str) -> Self {
        Self {
            ok: true,
            message: message.to_string(),
        }
    }

    fn failure(message: String) -> Self {
        Self { ok: false, message }
    }

    fn from_result(result: Result<(), String>, success: &str) -> Self {
        match result {
            Ok(()) => Self::success(success),
            Err(err) => Self::failure(err),
        }
    }
}

/// Bottle submission envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct BottleActionResponse {
    pub ok: bool,
    pub bottle: Option<BottleItem>,
    pub message: String,
}

/// Read-modal text of one bottle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottleReadingItem {
    pub bottle_id: String,
    pub quoted_text: String,
    pub attribution: String,
}

/// Starts a breathing session.
///
/// # FFI contract
/// - Sync call, never panics.
/// - `ok = false` with a reason when a session is already running.
#[flutter_rust_bridge::frb(sync)]
pub fn session_start() -> ActionResponse {
    with_runtime(|runtime| {
        ActionResponse::from_result(runtime.start(Instant::now()), "Session started.")
    })
    .unwrap_or_else(ActionResponse::failure)
}

/// Skips the running session; succeeds silently when none runs.
#[flutter_rust_bridge::frb(sync)]
pub fn session_skip() -> ActionResponse {
    with_runtime(|runtime| {
        runtime.skip(Instant::now());
        ActionResponse::success("Session skipped.")
    })
    .unwrap_or_else(ActionResponse::failure)
}

/// Returns from exploration to the start screen.
#[flutter_rust_bridge::frb(sync)]
pub fn session_return_to_shore() -> ActionResponse {
    with_runtime(|runtime| {
        ActionResponse::from_result(runtime.return_to_shore(Instant::now()), "Back on shore.")
    })
    .unwrap_or_else(ActionResponse::failure)
}

/// Advances the core clock to now and returns pending events.
///
/// # FFI contract
/// - Call from a frame or periodic timer; cheap when nothing is due.
/// - Undrained events and haptic commands are bounded; when the host stops
///   pumping, the oldest entries are dropped first.
/// - Never panics; an empty response is returned when the runtime failed.
#[flutter_rust_bridge::frb(sync)]
pub fn session_pump() -> PumpResponse {
    with_runtime(|runtime| runtime.pump(Instant::now())).unwrap_or_else(|err| {
        log::error!("event=session_pump module=ffi status=error error={err}");
        PumpResponse {
            events: Vec::new(),
            haptics: Vec::new(),
            state: SessionStateView {
                mode: "idle".to_string(),
                phase: None,
                remaining_secs: 0,
                next_change_ms: None,
            },
        }
    })
}

/// Current session snapshot without advancing the clock.
#[flutter_rust_bridge::frb(sync)]
pub fn session_state() -> Option<SessionStateView> {
    with_runtime(|runtime| runtime.state()).ok()
}

/// Throws a user bottle into the sea.
///
/// # FFI contract
/// - `author` may be absent or blank; it then defaults to `Anonymous`.
/// - Blank `text` returns `ok = false` and stores nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn bottle_throw(text: String, author: Option<String>) -> BottleActionResponse {
    with_runtime(|runtime| runtime.throw_bottle(&text, author.as_deref())).unwrap_or_else(|err| {
        BottleActionResponse {
            ok: false,
            bottle: None,
            message: format!("bottle_throw failed: {err}"),
        }
    })
}

/// All bottles in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn bottle_list() -> Vec<BottleItem> {
    with_runtime(|runtime| runtime.bottles()).unwrap_or_default()
}

/// Opens one bottle by id; `None` for unknown or malformed ids.
#[flutter_rust_bridge::frb(sync)]
pub fn bottle_open(bottle_id: String) -> Option<BottleReadingItem> {
    let id = BottleId::parse_str(bottle_id.trim()).ok()?;
    with_runtime(|runtime| runtime.open_bottle(id)).ok().flatten()
}

/// Orchestrator plus the host clock and haptic queue that feed it.
struct FfiRuntime {
    orchestrator: SessionOrchestrator,
    haptics: HostHaptics,
    last_sync: Instant,
}

impl FfiRuntime {
    fn new(now: Instant) -> Result<Self, String> {
        let haptics = HostHaptics::default();
        let context =
            AppContext::new(AppConfig::default()).with_haptics(Box::new(haptics.clone()));
        let orchestrator =
            SessionOrchestrator::new(context).map_err(|err| format!("runtime init failed: {err}"))?;
        log::info!("event=ffi_runtime_init module=ffi status=ok");
        Ok(Self {
            orchestrator,
            haptics,
            last_sync: now,
        })
    }

    fn sync_clock(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_sync);
        self.last_sync = self.last_sync.max(now);
        self.orchestrator.advance(elapsed);
    }

    fn start(&mut self, now: Instant) -> Result<(), String> {
        self.sync_clock(now);
        self.orchestrator
            .start_session()
            .map_err(|err| err.to_string())
    }

    fn skip(&mut self, now: Instant) {
        self.sync_clock(now);
        self.orchestrator.skip_session();
    }

    fn return_to_shore(&mut self, now: Instant) -> Result<(), String> {
        self.sync_clock(now);
        self.orchestrator
            .return_to_shore()
            .map_err(|err| err.to_string())
    }

    fn pump(&mut self, now: Instant) -> PumpResponse {
        self.sync_clock(now);
        PumpResponse {
            events: self
                .orchestrator
                .drain_events()
                .into_iter()
                .map(to_event_item)
                .collect(),
            haptics: self.haptics.take(),
            state: self.state(),
        }
    }

    fn state(&self) -> SessionStateView {
        to_state_view(
            self.orchestrator.session(),
            self.orchestrator
                .time_to_next_timer()
                .map(|wait| wait.as_millis() as u64),
        )
    }

    fn throw_bottle(&mut self, text: &str, author: Option<&str>) -> BottleActionResponse {
        match self.orchestrator.throw_bottle(text, author) {
            Ok(message) => BottleActionResponse {
                ok: true,
                bottle: Some(to_bottle_item(&message)),
                message: "Bottle thrown.".to_string(),
            },
            Err(err) => BottleActionResponse {
                ok: false,
                bottle: None,
                message: err.to_string(),
            },
        }
    }

    fn bottles(&self) -> Vec<BottleItem> {
        self.orchestrator
            .bottles()
            .iter()
            .map(to_bottle_item)
            .collect()
    }

    fn open_bottle(&self, id: BottleId) -> Option<BottleReadingItem> {
        self.orchestrator.open_bottle(id).map(to_reading_item)
    }
}

fn with_runtime<T>(action: impl FnOnce(&mut FfiRuntime) -> T) -> Result<T, String> {
    let mut guard = RUNTIME
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if guard.is_none() {
        *guard = Some(FfiRuntime::new(Instant::now())?);
    }
    match guard.as_mut() {
        Some(runtime) => Ok(action(runtime)),
        None => Err("runtime unavailable".to_string()),
    }
}

fn to_state_view(session: Session, next_change_ms: Option<u64>) -> SessionStateView {
    SessionStateView {
        mode: session.mode.as_str().to_string(),
        phase: session.phase.map(|phase| phase.as_str().to_string()),
        remaining_secs: session.remaining_secs,
        next_change_ms,
    }
}

fn to_bottle_item(message: &BottleMessage) -> BottleItem {
    let placement = message.placement();
    BottleItem {
        bottle_id: message.id().to_string(),
        text: message.text().to_string(),
        author: message.author().to_string(),
        left_percent: placement.left_percent,
        bottom_percent: placement.bottom_percent,
        bob_delay_ms: message.bob_delay_ms(),
        origin: match message.origin() {
            BottleOrigin::Seed => "seed",
            BottleOrigin::User => "user",
        }
        .to_string(),
    }
}

fn to_reading_item(reading: BottleReading) -> BottleReadingItem {
    BottleReadingItem {
        bottle_id: reading.id.to_string(),
        quoted_text: reading.quoted_text,
        attribution: reading.attribution,
    }
}

fn to_wave_item(posture: WavePosture, transition: Duration) -> WaveItem {
    WaveItem {
        translate_y_percent: posture.translate_y_percent,
        scale_y: posture.scale_y,
        easing: posture.easing.as_str().to_string(),
        transition_ms: transition.as_millis() as u64,
    }
}

fn to_event_item(event: CoreEvent) -> EventItem {
    let mut item = EventItem {
        kind: event.name().to_string(),
        phase: None,
        seconds: None,
        text: None,
        bottle: None,
        wave: None,
    };
    match event {
        CoreEvent::PhaseChanged {
            phase,
            duration_secs,
        } => {
            item.phase = Some(phase.as_str().to_string());
            item.seconds = Some(duration_secs);
            item.wave = Some(to_wave_item(
                phase.wave(),
                Duration::from_secs(u64::from(duration_secs)),
            ));
        }
        CoreEvent::Tick { remaining_secs } => item.seconds = Some(remaining_secs),
        CoreEvent::LabelChanged { phase, label } => {
            item.phase = Some(phase.as_str().to_string());
            item.text = Some(label.to_string());
        }
        CoreEvent::SessionEnded { reason } => item.text = Some(reason.as_str().to_string()),
        CoreEvent::SeaCalmed => {
            item.wave = Some(to_wave_item(WavePosture::CALM, WavePosture::CALM_RESET));
        }
        CoreEvent::BottleCreated { message } => item.bottle = Some(to_bottle_item(&message)),
        CoreEvent::Notice { message } => item.text = Some(message),
    }
    item
}
