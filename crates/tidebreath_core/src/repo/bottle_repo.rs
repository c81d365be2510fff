//! Bottle repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Hold every bottle created during the process lifetime.
//!
//! # Invariants
//! - Insertion order is the only order exposed.
//! - There is no delete or update path.

use crate::model::bottle::{BottleId, BottleMessage};

/// Append-only bottle storage.
pub trait BottleRepository {
    fn append(&mut self, message: BottleMessage);
    /// All messages in insertion order.
    fn all(&self) -> &[BottleMessage];
    fn get(&self, id: BottleId) -> Option<&BottleMessage>;

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }
}

/// Process-memory bottle repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBottleRepository {
    messages: Vec<BottleMessage>,
}

impl InMemoryBottleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BottleRepository for InMemoryBottleRepository {
    fn append(&mut self, message: BottleMessage) {
        self.messages.push(message);
    }

    fn all(&self) -> &[BottleMessage] {
        &self.messages
    }

    fn get(&self, id: BottleId) -> Option<&BottleMessage> {
        self.messages.iter().find(|message| message.id() == id)
    }
}
