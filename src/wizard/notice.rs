//! Transient notices
//!
//! A notice is a short confirmation (such as "verification code sent") that
//! disappears on its own. Time is read from `tokio::time` so paused test
//! clocks apply.

use std::time::Duration;

use tokio::time::Instant;

/// A message that expires after a fixed duration
#[derive(Debug, Clone)]
pub struct Notice {
    /// The notice text
    pub message: String,
    /// Time when the notice was raised
    pub created_at: Instant,
    /// How long it stays visible
    pub duration: Duration,
}

impl Notice {
    /// Create a notice starting now
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
            duration,
        }
    }

    /// Instant at which the notice disappears
    pub fn deadline(&self) -> Instant {
        self.created_at + self.duration
    }

    /// Check if the notice has expired
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline()
    }
}
