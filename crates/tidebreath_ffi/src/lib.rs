//! Flutter-facing bindings for the Tidebreath core.

pub mod api;
mod haptics;
