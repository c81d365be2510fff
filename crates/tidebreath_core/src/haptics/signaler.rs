//! Vibration signaler.

use crate::model::session::Phase;
use log::debug;

/// Host haptic capability.
///
/// Patterns use the platform convention of alternating on/off durations in
/// milliseconds, starting with a pulse.
pub trait HapticDevice: Send {
    /// Whether the host can vibrate at all.
    fn is_available(&self) -> bool {
        true
    }

    fn vibrate(&mut self, pattern: &[u32]);

    /// Stops any pattern still playing.
    fn cancel(&mut self);
}

/// Device for hosts without haptic output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticDevice for NoHaptics {
    fn is_available(&self) -> bool {
        false
    }

    fn vibrate(&mut self, _pattern: &[u32]) {}

    fn cancel(&mut self) {}
}

/// What the signaler is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VibrationCue {
    Phase(Phase),
    Stop,
}

/// Repeated pulse/pause pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VibrationPattern {
    pub pulse_ms: u32,
    pub pause_ms: u32,
    pub repetitions: usize,
}

impl VibrationPattern {
    /// Flattened on/off sequence handed to the device.
    pub fn to_sequence(self) -> Vec<u32> {
        let mut sequence = Vec::with_capacity(self.repetitions * 2);
        for _ in 0..self.repetitions {
            sequence.push(self.pulse_ms);
            sequence.push(self.pause_ms);
        }
        sequence
    }

    pub fn total_ms(self) -> u64 {
        (u64::from(self.pulse_ms) + u64::from(self.pause_ms)) * self.repetitions as u64
    }
}

/// Pattern played while `phase` runs.
///
/// Inhale builds with quick taps, hold is a slow heartbeat, exhale fades with
/// longer spaced pulses.
pub fn pattern_for(phase: Phase) -> VibrationPattern {
    match phase {
        Phase::Inhale => VibrationPattern {
            pulse_ms: 50,
            pause_ms: 150,
            repetitions: 20,
        },
        Phase::Hold => VibrationPattern {
            pulse_ms: 30,
            pause_ms: 970,
            repetitions: 7,
        },
        Phase::Exhale => VibrationPattern {
            pulse_ms: 80,
            pause_ms: 420,
            repetitions: 16,
        },
    }
}

/// Translates cues into device calls.
pub struct VibrationSignaler {
    device: Box<dyn HapticDevice>,
}

impl VibrationSignaler {
    pub fn new(device: Box<dyn HapticDevice>) -> Self {
        Self { device }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(NoHaptics))
    }

    pub fn signal(&mut self, cue: VibrationCue) {
        if !self.device.is_available() {
            return;
        }

        match cue {
            VibrationCue::Phase(phase) => {
                let sequence = pattern_for(phase).to_sequence();
                debug!(
                    "event=haptic_pattern module=haptics status=ok phase={} steps={}",
                    phase.as_str(),
                    sequence.len()
                );
                self.device.vibrate(&sequence);
            }
            VibrationCue::Stop => self.device.cancel(),
        }
    }
}
