//! Repository layer for bottle messages.
//!
//! # Responsibility
//! - Define the append-only storage contract for bottles.
//! - Keep storage details out of the bottle store use-case API.
//!
//! # Invariants
//! - Repositories never reorder, mutate or delete stored messages.

pub mod bottle_repo;
