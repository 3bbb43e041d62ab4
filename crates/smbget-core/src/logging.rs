//! Tracing setup for the `smbget` binary.
//!
//! Events go to `$XDG_STATE_HOME/smbget/smbget.log` (plain text, appended).
//! When that file cannot be opened the CLI calls [`init_logging_stderr`].
//! `RUST_LOG` overrides [`DEFAULT_FILTER`] in both cases.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,smbget=debug,smbget_core=debug";

const LOG_FILE: &str = "smbget.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Location of the log file under the XDG state directory.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("smbget")?;
    Ok(dirs.get_state_home().join("smbget").join(LOG_FILE))
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Installs a subscriber writing to the log file. Errors leave no subscriber
/// installed, so the caller can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = open_append(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;

    tracing::debug!(path = %path.display(), "logging to file");
    Ok(())
}

/// Installs a stderr subscriber. A subscriber that is already set is kept.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
