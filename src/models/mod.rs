//! Core data models for ShipDesk
//!
//! Typed identifiers and the secret input value shared by the wizards.

pub mod ids;
pub mod secret;

pub use ids::{SessionId, ShipmentId};
pub use secret::SecretInput;
