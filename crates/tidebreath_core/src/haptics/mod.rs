//! Haptic feedback for breathing phases.
//!
//! # Responsibility
//! - Map phases to vibration patterns.
//! - Hide the host haptic capability behind `HapticDevice`.
//!
//! # Invariants
//! - A missing haptic capability turns every signal into a no-op.

pub mod signaler;
