//! User settings for ShipDesk
//!
//! Manages the wizard rules, the simulated backend timings and the log level.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::ShipdeskPaths;
use crate::error::ShipdeskError;

/// Rules and simulated timings for the password recovery wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverySettings {
    /// Simulated round trip for sending the verification code
    pub send_code_delay_ms: u64,
    /// Simulated round trip for checking a verification code
    pub verify_delay_ms: u64,
    /// Simulated round trip for re-sending the code
    pub resend_delay_ms: u64,
    /// Simulated round trip for storing the new password
    pub reset_delay_ms: u64,
    /// Number of digits in a verification code
    pub code_length: usize,
    /// Minimum password length in characters
    pub min_password_length: usize,
    /// The only code the simulated backend accepts
    pub reference_code: String,
    /// How long a transient notice stays visible
    pub notice_secs: u64,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            send_code_delay_ms: 1500,
            verify_delay_ms: 1000,
            resend_delay_ms: 1000,
            reset_delay_ms: 1500,
            code_length: 5,
            min_password_length: 8,
            reference_code: "12345".to_string(),
            notice_secs: 3,
        }
    }
}

impl RecoverySettings {
    pub fn send_code_delay(&self) -> Duration {
        Duration::from_millis(self.send_code_delay_ms)
    }

    pub fn verify_delay(&self) -> Duration {
        Duration::from_millis(self.verify_delay_ms)
    }

    pub fn resend_delay(&self) -> Duration {
        Duration::from_millis(self.resend_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }
}

/// Settings for the shipment submission wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentSettings {
    /// Simulated round trip for submitting a shipment
    pub submit_delay_ms: u64,
}

impl Default for ShipmentSettings {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2000,
        }
    }
}

impl ShipmentSettings {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

/// User settings for ShipDesk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Password recovery wizard
    #[serde(default)]
    pub recovery: RecoverySettings,

    /// Shipment submission wizard
    #[serde(default)]
    pub shipment: ShipmentSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            log_level: default_log_level(),
            recovery: RecoverySettings::default(),
            shipment: ShipmentSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &ShipdeskPaths) -> Result<Self, ShipdeskError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ShipdeskError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ShipdeskError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ShipdeskPaths) -> Result<(), ShipdeskError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ShipdeskError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            ShipdeskError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
