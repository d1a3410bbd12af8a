//! Structured logging setup using tracing.
//!
//! Console output is pretty or JSON per configuration. When a log directory
//! is configured, a daily-rotated JSON file is written as well. `RUST_LOG`
//! takes precedence over the configured level.

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

const LOG_FILE_PREFIX: &str = "psico-server.log";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLevel(String),

    #[error("Failed to create log directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Keeps the file writer alive. Drop it only at process exit so buffered
/// lines are flushed.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Parse log level from string.
pub fn parse_log_level(level: &str) -> Result<Level, LoggingError> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(LoggingError::InvalidLevel(level.to_string())),
    }
}

/// Default directive set for `level`: our crates plus request tracing.
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("psico_server={level},psico_core={level},tower_http={level}")
}

/// Initialize the global subscriber. `level_override` (from the CLI) wins
/// over `config.level`.
pub fn init_logging(
    config: &LoggingConfig,
    level_override: Option<&str>,
) -> Result<LoggingGuard, LoggingError> {
    let level = parse_log_level(level_override.unwrap_or(&config.level))?;
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
    };

    let mut layers = Vec::new();

    let console = tracing_subscriber::fmt::layer().with_target(true);
    let console = match config.format {
        LogFormat::Pretty => console.with_filter(filter()).boxed(),
        LogFormat::Json => console.json().with_filter(filter()).boxed(),
    };
    layers.push(console);

    let file_guard = match &config.directory {
        Some(dir) => {
            let (layer, guard) = file_layer(dir)?;
            layers.push(layer.with_filter(filter()).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!(
        level = %level,
        format = ?config.format,
        directory = ?config.directory,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

fn file_layer(dir: &Path) -> Result<(BoxedLayer, WorkerGuard), LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::Directory {
        path: dir.display().to_string(),
        source,
    })?;

    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(writer)
        .boxed();

    Ok((layer, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_level_valid() {
        assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
        assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
        assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);
    }

    #[test]
    fn parse_log_level_case_insensitive() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level(" Info ").unwrap(), Level::INFO);
    }

    #[test]
    fn parse_log_level_invalid() {
        assert!(parse_log_level("verbose").is_err());
        assert!(parse_log_level("").is_err());
    }

    #[test]
    fn directives_cover_both_crates() {
        let directives = default_directives(Level::DEBUG);
        assert!(directives.contains("psico_server=debug"));
        assert!(directives.contains("psico_core=debug"));
    }

    #[test]
    fn file_layer_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs").join("app");

        let (_layer, _guard) = file_layer(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
