//! CLI command handlers
//!
//! Bridges the clap commands with the wizards, and provides the line-based
//! prompts they read input with.

pub mod config;
pub mod recover;
pub mod ship;

use std::io::{self, Write};

use crate::error::{ShipdeskError, ShipdeskResult};

pub use config::{handle_config_command, handle_init_command};
pub use recover::handle_recover_command;
pub use ship::handle_ship_command;

/// Read one trimmed line from stdin
pub fn prompt_string(prompt: &str) -> ShipdeskResult<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    if read == 0 {
        return Err(ShipdeskError::Io("input closed".into()));
    }

    Ok(input.trim().to_string())
}

/// Read a password without echoing it
pub fn prompt_secret(prompt: &str) -> ShipdeskResult<String> {
    rpassword::prompt_password(prompt).map_err(|e| ShipdeskError::Io(e.to_string()))
}

/// Run a blocking prompt off the async task so timers keep firing
pub(crate) async fn prompt_async<F>(read: F) -> ShipdeskResult<String>
where
    F: FnOnce() -> ShipdeskResult<String> + Send + 'static,
{
    tokio::task::spawn_blocking(read)
        .await
        .map_err(|e| ShipdeskError::Io(format!("prompt task failed: {e}")))?
}
