use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::LoggingError;

pub const LOG_FILE_NAME: &str = "invoker-trainer.log";

/// Picks the log filter: an explicit `--log-filter` first, then `RUST_LOG`,
/// then the configured default. Whichever source wins must parse.
pub fn resolve_filter(
    explicit: Option<&str>,
    env: Option<&str>,
    configured: &str,
) -> Result<EnvFilter, LoggingError> {
    let directives = explicit.or(env).unwrap_or(configured);
    EnvFilter::try_new(directives).map_err(|source| LoggingError::InvalidFilter {
        filter: directives.to_string(),
        source,
    })
}

/// `RUST_LOG`, when set
pub fn env_filter_var() -> Option<String> {
    std::env::var(EnvFilter::DEFAULT_ENV).ok()
}

/// Routes tracing output to `<dir>/invoker-trainer.log`.
///
/// The returned guard flushes the background writer on drop and must be held
/// for the lifetime of the process.
pub fn init(dir: &Path, filter: EnvFilter) -> Result<Option<WorkerGuard>, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // A subscriber is already installed (tests); drop the guard so the writer shuts down
        Err(_) => Ok(None),
    }
}
