//! Application logging functionality
//!
//! Library code logs through `bevy::log` macros. The binary installs a
//! tracing subscriber here: terminal output without timestamps, plus an
//! optional daily log file in the config directory.

use std::fs;
use std::path::PathBuf;

use crate::core::config::ConfigFile;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "sprite-editor.log";

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::config_dir().join("logs")
}

/// Get the path to today's log file
pub fn current_log_file() -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d");
    logs_dir().join(format!("{LOG_FILE_PREFIX}.{timestamp}"))
}

/// Initialize the logs directory
pub fn initialize_logs_directory() -> anyhow::Result<()> {
    fs::create_dir_all(logs_dir())?;
    Ok(())
}

/// Empty time formatter for terminal output
struct EmptyTime;

impl FormatTime for EmptyTime {
    fn format_time(&self, _: &mut Writer<'_>) -> std::fmt::Result {
        Ok(())
    }
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "sprite_editor=debug,info"
    } else {
        "info"
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` overrides the default level. The returned guard flushes the
/// log file and must be held until the program exits.
pub fn init_logging(verbose: bool, log_to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let terminal = tracing_subscriber::fmt::layer()
        .event_format(
            format()
                .with_timer(EmptyTime)
                .with_level(true)
                .with_target(verbose)
                .with_ansi(true),
        )
        .with_writer(std::io::stderr);

    let (file_layer, guard) = if log_to_file {
        initialize_logs_directory()?;
        let appender = tracing_appender::rolling::daily(logs_dir(), LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(terminal)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    if log_to_file {
        bevy::log::info!("Logging to {:?}", current_log_file());
    }

    Ok(guard)
}
