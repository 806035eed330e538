//! Tracing initialization.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use academy_core::config::LoggingConfig;
use academy_core::error::{AcademyError, Result};

/// Daily-rotated log file prefix.
pub const LOG_FILE_PREFIX: &str = "academy-portal.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the background log writer alive. Dropping it flushes pending
/// file output.
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug, Default)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `config.level` when set. File output requires
/// `logs_dir`. Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig, logs_dir: Option<&Path>) -> Result<LoggingGuard> {
    let filter = build_filter(&config.level);

    let stdout: BoxedLayer = if config.json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };
    let mut layers = vec![stdout];

    let mut guard = LoggingGuard::default();
    if config.log_to_file {
        let dir = logs_dir
            .ok_or_else(|| AcademyError::config("log_to_file is set but no logs directory"))?;
        fs::create_dir_all(dir).map_err(|e| {
            AcademyError::io(format!(
                "Failed to create logs directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        let (writer, file_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX));
        layers.push(fmt::layer().with_writer(writer).with_ansi(false).boxed());
        guard._file = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| AcademyError::internal(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    Ok(guard)
}

/// `RUST_LOG` if set and valid, else the configured level, else `info`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
