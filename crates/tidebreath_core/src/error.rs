//! Core error kinds.
//!
//! # Responsibility
//! - Describe recoverable failures of user intents.
//!
//! # Invariants
//! - No error leaves session or store state partially updated.
//! - Stale timer callbacks are discarded, never reported as errors.

use crate::model::session::Mode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

/// Input rejected before any state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Bottle text is empty after trimming.
    EmptyText,
    /// `seed` was asked for zero messages.
    ZeroSeedCount,
    /// Configuration value out of range.
    InvalidConfig(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "message text must not be empty"),
            Self::ZeroSeedCount => write!(f, "seed count must be positive"),
            Self::InvalidConfig(details) => write!(f, "invalid configuration: {details}"),
        }
    }
}

impl Error for ValidationError {}

/// Error returned by controller, store and orchestrator operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Operation is not allowed in the current mode.
    InvalidState {
        operation: &'static str,
        mode: Mode,
    },
    Validation(ValidationError),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState { operation, mode } => write!(
                f,
                "`{operation}` is not allowed while mode is `{}`",
                mode.as_str()
            ),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidState { .. } => None,
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreError, ValidationError};
    use crate::model::session::Mode;
    use std::error::Error;

    #[test]
    fn invalid_state_names_operation_and_mode() {
        let err = CoreError::InvalidState {
            operation: "start",
            mode: Mode::Breathing,
        };
        let message = err.to_string();
        assert!(message.contains("start"));
        assert!(message.contains("breathing"));
        assert!(err.source().is_none());
    }

    #[test]
    fn validation_error_is_exposed_as_source() {
        let err = CoreError::from(ValidationError::EmptyText);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "message text must not be empty");
    }
}
