//! Tracing subscriber setup for the binary.
use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_DIR_VAR: &str = "OSTROMAG_LOG_DIR";
const LOG_FILE_PREFIX: &str = "ostromag.log";

/// Logs to stderr, and to a daily-rolling file when `OSTROMAG_LOG_DIR` is set.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole process.
pub fn setup_logging() -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let log_dir = std::env::var_os(LOG_DIR_VAR).map(PathBuf::from);
    let (file_layer, guard) = match &log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    if let Some(dir) = log_dir {
        tracing::info!("Log file: {}/{}", dir.display(), LOG_FILE_PREFIX);
    }

    Ok(guard)
}
