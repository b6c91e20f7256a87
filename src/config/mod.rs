//! Configuration module for ShipDesk
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Wizard rules and simulated timings

pub mod paths;
pub mod settings;

pub use paths::ShipdeskPaths;
pub use settings::{RecoverySettings, Settings, ShipmentSettings};
