//! `config` and `init` commands

use crate::config::{Settings, ShipdeskPaths};
use crate::error::ShipdeskResult;

/// Print paths and the effective settings
pub fn handle_config_command(paths: &ShipdeskPaths, settings: &Settings) -> ShipdeskResult<()> {
    println!("Shipdesk Configuration");
    println!("======================");
    println!("Data directory:   {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Log directory:    {}", paths.log_dir().display());
    println!("Initialized:      {}", paths.is_initialized());
    println!();
    println!("Settings:");
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

/// Create the data directory and write the settings file
pub fn handle_init_command(paths: &ShipdeskPaths, settings: &Settings) -> ShipdeskResult<()> {
    println!("Initializing shipdesk at: {}", paths.base_dir().display());
    paths.ensure_directories()?;
    settings.save(paths)?;
    println!("Wrote {}", paths.settings_file().display());
    println!();
    println!("Run 'shipdesk recover' to reset a password.");
    println!("Run 'shipdesk ship' to create a shipment.");
    Ok(())
}
