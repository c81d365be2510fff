//! Virtual-clock timer scheduling.
//!
//! # Responsibility
//! - Order pending timers deterministically by due time and priority.
//! - Drop every pending timer synchronously on `cancel_all`.
//!
//! # Invariants
//! - The clock never moves backwards.
//! - Timers due at the same instant fire by priority, then scheduling order.

pub mod scheduler;
