//! Breathing session state.
//!
//! # Responsibility
//! - Define application mode, breathing phases and the session snapshot.
//! - Hold the phase transition table (`Phase::next`) and wave posture.
//!
//! # Invariants
//! - The phase cycle is `Inhale -> Hold -> Exhale -> Inhale`.
//! - `remaining_secs` is only meaningful while `mode == Mode::Breathing`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Overall application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Start screen; a session may be started.
    Idle,
    /// Guided breathing in progress.
    Breathing,
    /// Free exploration of bottle messages.
    Explore,
}

impl Mode {
    /// Stable string id used in logs and FFI payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Breathing => "breathing",
            Self::Explore => "explore",
        }
    }
}

/// One timed stage of a breathing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    /// Phase entered after this one completes.
    pub fn next(self) -> Self {
        match self {
            Self::Inhale => Self::Hold,
            Self::Hold => Self::Exhale,
            Self::Exhale => Self::Inhale,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inhale => "inhale",
            Self::Hold => "hold",
            Self::Exhale => "exhale",
        }
    }

    /// Guidance text shown after the label fade.
    pub fn label(self) -> &'static str {
        match self {
            Self::Inhale => "Breathe In...",
            Self::Hold => "Hold...",
            Self::Exhale => "Breathe Out...",
        }
    }

    /// Target posture of the ocean wave while this phase runs.
    pub fn wave(self) -> WavePosture {
        match self {
            Self::Inhale => WavePosture {
                translate_y_percent: -20.0,
                scale_y: 1.3,
                easing: WaveEasing::EaseOut,
            },
            Self::Hold => WavePosture {
                translate_y_percent: -22.0,
                scale_y: 1.32,
                easing: WaveEasing::Linear,
            },
            Self::Exhale => WavePosture::CALM,
        }
    }
}

/// Easing curve for a wave transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveEasing {
    EaseOut,
    Linear,
    EaseInOut,
}

impl WaveEasing {
    /// CSS-style curve name handed to renderers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EaseOut => "ease-out",
            Self::Linear => "linear",
            Self::EaseInOut => "ease-in-out",
        }
    }
}

/// Wave transform target; renderers animate toward it over the phase duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavePosture {
    pub translate_y_percent: f64,
    pub scale_y: f64,
    pub easing: WaveEasing,
}

impl WavePosture {
    /// Resting sea, used at the end of an exhale and after a session ends.
    pub const CALM: Self = Self {
        translate_y_percent: 5.0,
        scale_y: 1.0,
        easing: WaveEasing::EaseInOut,
    };

    /// Transition time back to `CALM` once a session ends.
    pub const CALM_RESET: Duration = Duration::from_secs(3);
}

/// Snapshot of the single breathing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub mode: Mode,
    /// `None` unless `mode == Mode::Breathing`.
    pub phase: Option<Phase>,
    pub remaining_secs: u32,
}

impl Session {
    /// Fresh process state: idle, no phase, countdown at its full length.
    pub fn idle(session_secs: u32) -> Self {
        Self {
            mode: Mode::Idle,
            phase: None,
            remaining_secs: session_secs,
        }
    }

    pub fn is_breathing(&self) -> bool {
        self.mode == Mode::Breathing
    }
}
