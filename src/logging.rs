use anyhow::{Context, Result};
use std::fs::OpenOptions;

use crate::config::{data_dir, LogConfig};

/// Routes `log` output to `~/.devtrack/devtrack.log`; the terminal belongs
/// to the dashboard. `RUST_LOG` wins over the configured level.
pub fn init(config: &LogConfig) -> Result<()> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join("devtrack.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::new()
        .parse_filters(&config.level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()
        .context("Logger already initialized")?;
    Ok(())
}
