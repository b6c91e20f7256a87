//! Tracing setup for the binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Settings, ShipdeskPaths};
use crate::error::{ShipdeskError, ShipdeskResult};

const LOG_FILE_PREFIX: &str = "shipdesk.log";

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Logs are written to
/// a daily file under the data directory, and to stderr in debug builds.
pub fn init(paths: &ShipdeskPaths, settings: &Settings) -> ShipdeskResult<()> {
    let log_dir = paths.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    #[cfg(debug_assertions)]
    let registry = registry.with(fmt::layer().with_writer(std::io::stderr).with_target(false));

    registry
        .try_init()
        .map_err(|e| ShipdeskError::Config(format!("failed to initialize logging: {e}")))
}
