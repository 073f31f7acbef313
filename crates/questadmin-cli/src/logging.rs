// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "QUESTADMIN_LOG";

/// Builds the filter from `QUESTADMIN_LOG`, falling back to `level`.
pub fn env_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level {level:?} -- set [log].level")),
    }
}

/// Sends events to `file`; the terminal belongs to the TUI. Keep the guard
/// alive until exit so buffered lines are flushed.
pub fn init(file: &Path, level: &str) -> Result<WorkerGuard> {
    let dir = file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = file
        .file_name()
        .ok_or_else(|| anyhow!("log file {} has no file name", file.display()))?;
    fs::create_dir_all(dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|error| anyhow!("initialize logging: {error}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %file.display(),
        "questadmin starting"
    );
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::env_filter;

    #[test]
    fn configured_level_builds_a_filter() {
        assert!(env_filter("debug").is_ok());
    }
}
