//! Tunable timings and scene ranges.
//!
//! # Responsibility
//! - Carry every timing constant of the breathing session and bottle scene.
//! - Validate host-supplied overrides before any component is built.
//!
//! # Invariants
//! - `Default` reproduces the stock 60 s session with a 4-7-8 cycle.
//! - A validated countdown never exceeds `MAX_SESSION_SECS`.
//! - Validated ranges have `min <= max` and lie within 0..=100 percent.

use crate::error::ValidationError;
use crate::model::session::Phase;
use serde::Deserialize;
use std::time::Duration;

/// Longest countdown a session may run, in seconds.
pub const MAX_SESSION_SECS: u32 = 60;

/// Top-level configuration handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub breathing: BreathingConfig,
    pub bottles: BottleConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.breathing.validate()?;
        self.bottles.validate()
    }
}

/// Breathing session timings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BreathingConfig {
    /// Countdown length in `1..=MAX_SESSION_SECS`; one tick per second.
    pub session_secs: u32,
    pub inhale_secs: u32,
    pub hold_secs: u32,
    pub exhale_secs: u32,
    /// Delay between a phase change and its label update.
    pub label_fade_ms: u64,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            session_secs: 60,
            inhale_secs: 4,
            hold_secs: 7,
            exhale_secs: 8,
            label_fade_ms: 500,
        }
    }
}

impl BreathingConfig {
    pub fn phase_secs(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale_secs,
            Phase::Hold => self.hold_secs,
            Phase::Exhale => self.exhale_secs,
        }
    }

    pub fn phase_duration(&self, phase: Phase) -> Duration {
        Duration::from_secs(u64::from(self.phase_secs(phase)))
    }

    pub fn label_fade(&self) -> Duration {
        Duration::from_millis(self.label_fade_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.session_secs == 0 {
            return Err(invalid("breathing.session_secs must be positive"));
        }
        if self.session_secs > MAX_SESSION_SECS {
            return Err(invalid(&format!(
                "breathing.session_secs must be at most {MAX_SESSION_SECS}"
            )));
        }
        for phase in [Phase::Inhale, Phase::Hold, Phase::Exhale] {
            if self.phase_secs(phase) == 0 {
                return Err(invalid(&format!(
                    "breathing.{}_secs must be positive",
                    phase.as_str()
                )));
            }
        }
        Ok(())
    }
}

/// Closed range in viewport percent.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PercentRange {
    pub min: f64,
    pub max: f64,
}

impl PercentRange {
    /// Maps a unit sample in `[0, 1)` into this range.
    pub fn sample(&self, unit: f64) -> f64 {
        self.min + unit * (self.max - self.min)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.max <= 100.0
            && self.min <= self.max
    }
}

/// Bottle scene layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BottleConfig {
    /// Bottles spawned from the catalog at startup.
    pub seed_count: usize,
    pub left_percent: PercentRange,
    pub bottom_percent: PercentRange,
    /// Exclusive upper bound for the bobbing animation delay.
    pub bob_delay_max_ms: u32,
}

impl Default for BottleConfig {
    fn default() -> Self {
        Self {
            seed_count: 3,
            left_percent: PercentRange {
                min: 10.0,
                max: 90.0,
            },
            bottom_percent: PercentRange {
                min: 5.0,
                max: 25.0,
            },
            bob_delay_max_ms: 2_000,
        }
    }
}

impl BottleConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.seed_count == 0 {
            return Err(ValidationError::ZeroSeedCount);
        }
        if !self.left_percent.is_valid() {
            return Err(invalid("bottles.left_percent must be an ordered range in 0..=100"));
        }
        if !self.bottom_percent.is_valid() {
            return Err(invalid(
                "bottles.bottom_percent must be an ordered range in 0..=100",
            ));
        }
        Ok(())
    }
}

fn invalid(details: &str) -> ValidationError {
    ValidationError::InvalidConfig(details.to_string())
}
