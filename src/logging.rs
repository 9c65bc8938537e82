//! Diagnostics for a modify or restore run
//!
//! User-facing narration goes through `cli::output`; this is only the
//! `tracing` side, to stderr and optionally to an appended log file.

use crate::cli::commands::RunKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How much the run logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
}

impl Verbosity {
    /// `--debug` wins over `--quiet`
    pub fn from_flags(debug: bool, quiet: bool) -> Self {
        match (debug, quiet) {
            (true, _) => Verbosity::Debug,
            (false, true) => Verbosity::Quiet,
            (false, false) => Verbosity::Normal,
        }
    }

    pub fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "fix_aircraft_fov=error",
            Verbosity::Normal => "fix_aircraft_fov=info",
            Verbosity::Debug => "fix_aircraft_fov=debug",
        }
    }
}

/// Install the subscriber and log which run is starting
pub fn init_logging(
    verbosity: Verbosity,
    log_file: Option<&Path>,
    kind: RunKind,
    dry_run: bool,
) -> anyhow::Result<()> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(verbosity.directive()))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::debug!(
        run = kind.verb(),
        dry_run,
        log_file = ?log_file,
        version = env!("CARGO_PKG_VERSION"),
        "fix-aircraft-fov starting"
    );
    Ok(())
}

/// Timestamped log file for a run, under the config directory
pub fn default_log_path(kind: RunKind) -> anyhow::Result<PathBuf> {
    let log_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("fix-aircraft-fov")
        .join("logs");

    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    Ok(log_dir.join(format!("{}-{}.log", kind.verb(), timestamp)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Debug);
        assert_eq!(Verbosity::Quiet.directive(), "fix_aircraft_fov=error");
        assert!(EnvFilter::try_new(Verbosity::Debug.directive()).is_ok());
    }

    #[test]
    fn test_default_log_path_names_run() {
        // No config dir in some CI sandboxes
        if let Ok(path) = default_log_path(RunKind::Restore) {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with("restore-"));
            assert!(name.ends_with(".log"));
            assert!(path.parent().unwrap().ends_with("fix-aircraft-fov/logs"));
        }
    }
}
