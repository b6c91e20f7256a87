//! Path management for ShipDesk
//!
//! Provides XDG-compliant path resolution for configuration and logs.
//!
//! ## Path Resolution Order
//!
//! 1. `SHIPDESK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/shipdesk` or `~/.config/shipdesk`
//! 3. Windows: `%APPDATA%\shipdesk`

use std::path::PathBuf;

use crate::error::ShipdeskError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "SHIPDESK_DATA_DIR";

/// Manages all paths used by ShipDesk
#[derive(Debug, Clone)]
pub struct ShipdeskPaths {
    /// Base directory for all ShipDesk files
    base_dir: PathBuf,
}

impl ShipdeskPaths {
    /// Create a new ShipdeskPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ShipdeskError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create ShipdeskPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/shipdesk/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the log directory (~/.config/shipdesk/logs/)
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Ensure the base and log directories exist
    pub fn ensure_directories(&self) -> Result<(), ShipdeskError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ShipdeskError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.log_dir())
            .map_err(|e| ShipdeskError::Io(format!("Failed to create log directory: {}", e)))?;

        Ok(())
    }

    /// Check if ShipDesk has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default base directory based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, ShipdeskError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| ShipdeskError::Config("Could not determine HOME directory".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("shipdesk"))
}

/// Resolve the default base directory based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, ShipdeskError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| ShipdeskError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("shipdesk"))
}
