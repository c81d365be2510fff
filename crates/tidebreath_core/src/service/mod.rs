//! Core use-case services.
//!
//! # Responsibility
//! - Drive the breathing session and the bottle scene behind intent-level APIs.
//! - Keep presentation layers decoupled from timers and storage.

pub mod bottle_store;
pub mod breathing_controller;
pub mod session_orchestrator;
