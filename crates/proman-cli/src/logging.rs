use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use directories::BaseDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "proman.log";

/// Log directory under the platform cache dir, e.g. `~/.cache/proman`.
pub fn log_dir() -> Result<PathBuf> {
    let dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not resolve cache directory"))?;
    Ok(dirs.cache_dir().join("proman"))
}

/// Sends tracing output to a file so it never lands on the dashboard.
/// Keep the guard alive for the whole run or buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
    let log_dir = log_dir()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "proman starting");
    Ok(guard)
}

/// Leaves raw mode before the default hook prints the panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        proman_tui::restore_terminal();
        tracing::error!(%panic_info, "panic");
        original_hook(panic_info);
    }));
}
