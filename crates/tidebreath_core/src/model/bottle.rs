//! Bottle message model.
//!
//! # Responsibility
//! - Define the immutable note shown as a floating bottle.
//! - Normalize author/text input before a message is created.
//!
//! # Invariants
//! - `text` is never empty after trimming.
//! - `placement` and `bob_delay_ms` are assigned once at creation.
//! - Messages are never mutated; the type exposes no setters.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attribution used when a user leaves the name field blank.
pub const DEFAULT_AUTHOR: &str = "Anonymous";
/// Attribution shown when a stored author is empty.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Stable identifier of one bottle.
pub type BottleId = Uuid;

/// Where a bottle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleOrigin {
    /// Built-in catalog entry spawned at startup.
    Seed,
    /// Submitted by the user.
    User,
}

/// Position of a bottle in the ocean area, in viewport percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Horizontal offset from the left edge.
    pub left_percent: f64,
    /// Vertical offset from the bottom edge.
    pub bottom_percent: f64,
}

/// Immutable note floating in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleMessage {
    id: BottleId,
    text: String,
    author: String,
    placement: Placement,
    /// Bobbing animation offset so bottles do not move in lockstep.
    bob_delay_ms: u32,
    origin: BottleOrigin,
}

impl BottleMessage {
    /// Builds a message from raw input.
    ///
    /// # Errors
    /// - `ValidationError::EmptyText` when `text` is blank after trimming.
    pub fn new(
        text: &str,
        author: Option<&str>,
        placement: Placement,
        bob_delay_ms: u32,
        origin: BottleOrigin,
    ) -> Result<Self, ValidationError> {
        let text = normalize_text(text)?;
        Ok(Self {
            id: Uuid::new_v4(),
            text,
            author: normalize_author(author),
            placement,
            bob_delay_ms,
            origin,
        })
    }

    pub fn id(&self) -> BottleId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn bob_delay_ms(&self) -> u32 {
        self.bob_delay_ms
    }

    pub fn origin(&self) -> BottleOrigin {
        self.origin
    }

    /// Read-modal projection of this message.
    pub fn reading(&self) -> BottleReading {
        let author = if self.author.is_empty() {
            UNKNOWN_AUTHOR
        } else {
            self.author.as_str()
        };
        BottleReading {
            id: self.id,
            quoted_text: format!("\"{}\"", self.text),
            attribution: format!("- {author}"),
        }
    }
}

/// Text pair rendered when a bottle is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BottleReading {
    pub id: BottleId,
    pub quoted_text: String,
    pub attribution: String,
}

fn normalize_text(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

fn normalize_author(author: Option<&str>) -> String {
    match author.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_AUTHOR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{BottleMessage, BottleOrigin, Placement, DEFAULT_AUTHOR};
    use crate::error::ValidationError;

    fn placement() -> Placement {
        Placement {
            left_percent: 50.0,
            bottom_percent: 10.0,
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = BottleMessage::new("  \n ", Some("Max"), placement(), 0, BottleOrigin::User)
            .expect_err("blank text must fail");
        assert_eq!(err, ValidationError::EmptyText);
    }

    #[test]
    fn blank_author_falls_back_to_anonymous() {
        let message = BottleMessage::new(" hi ", Some("   "), placement(), 0, BottleOrigin::User)
            .expect("valid message");
        assert_eq!(message.text(), "hi");
        assert_eq!(message.author(), DEFAULT_AUTHOR);
    }

    #[test]
    fn reading_quotes_text_and_prefixes_author() {
        let message = BottleMessage::new(
            "Every wave",
            Some("Sarah"),
            placement(),
            0,
            BottleOrigin::Seed,
        )
        .expect("valid message");
        let reading = message.reading();
        assert_eq!(reading.quoted_text, "\"Every wave\"");
        assert_eq!(reading.attribution, "- Sarah");
        assert_eq!(reading.id, message.id());
    }
}
