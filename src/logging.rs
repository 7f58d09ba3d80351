use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Log to a file under the data dir; stdout belongs to the terminal UI.
pub fn init(level: &str) -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordfall");
    init_in(&dir, level)
}

pub fn init_in(dir: &Path, level: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join("wordfall.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("logging already initialized: {err}"))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wordfall starting");
    Ok(path)
}
