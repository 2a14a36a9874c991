//! Logging Setup
//!
//! Console output always; a daily-rotated log file as well when `LOG_FILE` names one.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop, so `main` must hold it until exit.
pub fn init(level: tracing::Level, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (dir, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

/// Splits `logs/app.log` into the directory to rotate in and the file name prefix.
/// A bare file name rotates in the working directory.
pub fn split_log_path(path: &Path) -> Result<(&Path, &str)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("LOG_FILE has no usable file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_nested_path() {
        let (dir, name) = split_log_path(Path::new("logs/app.log")).unwrap();
        assert_eq!(dir, Path::new("logs"));
        assert_eq!(name, "app.log");
    }

    #[test]
    fn test_bare_file_name_uses_working_directory() {
        let (dir, name) = split_log_path(Path::new("service.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "service.log");
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        assert!(split_log_path(Path::new("logs/..")).is_err());
    }
}
