//! Domain model for the breathing session and the bottle scene.
//!
//! # Responsibility
//! - Define the value types shared by controller, store and presentation.
//! - Keep presentation-facing events in one serializable shape.
//!
//! # Invariants
//! - `Session::phase` is `Some` iff `Session::mode == Mode::Breathing`.
//! - Bottle messages are immutable once created.

pub mod bottle;
pub mod event;
pub mod session;
