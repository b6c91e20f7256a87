//! Custom error types for ShipDesk
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::validation::ValidationError;

/// A backend refused an otherwise well-formed request
///
/// The message is shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteRejection {
    message: String,
}

impl RemoteRejection {
    /// Create a new rejection with a user-facing message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The user-facing message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The main error type for ShipDesk operations
#[derive(Error, Debug)]
pub enum ShipdeskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed or missing user input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A backend rejected the request
    #[error(transparent)]
    Rejected(#[from] RemoteRejection),

    /// An action is already in flight
    #[error("an operation is already in progress")]
    Busy,

    /// The requested action does not belong to the active step
    #[error("cannot {action} during the {step} step")]
    WrongStep {
        action: &'static str,
        step: &'static str,
    },

    /// The wizard driver has stopped
    #[error("wizard is no longer mounted")]
    Unmounted,
}

impl ShipdeskError {
    /// Create a wrong-step error
    pub fn wrong_step(action: &'static str, step: &'static str) -> Self {
        Self::WrongStep { action, step }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a remote rejection
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Whether the error was caused by the user's input and is shown inline
    pub fn is_user_facing(&self) -> bool {
        self.is_validation() || self.is_rejection()
    }
}

impl From<std::io::Error> for ShipdeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ShipdeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ShipDesk operations
pub type ShipdeskResult<T> = Result<T, ShipdeskError>;
