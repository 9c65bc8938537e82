mod backup;
mod camera;
mod cli;
mod config;
mod discovery;
mod error;
mod ini;
mod logging;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, error::ErrorKind};
use std::path::PathBuf;

use crate::backup::BackupExtension;
use crate::camera::CameraTarget;
use crate::cli::commands::RunKind;
use crate::cli::{OutputEvent, OutputMode, RunContext};
use crate::config::{Settings, expand_path};
use crate::discovery::CameraFileLocator;
use crate::ini::IniParser;

#[derive(Parser)]
#[command(name = "fix-aircraft-fov", version)]
#[command(about = "Modify or restore InitialZoom in MSFS cameras.cfg files")]
struct Cli {
    #[command(flatten)]
    mode: Mode,

    /// Path to the community folder or a specific add-on
    #[arg(long)]
    community_folder: PathBuf,

    /// Extension used for backup files (default: 'fix_aircraft_fov', e.g. '.bak')
    #[arg(long)]
    backup_ext: Option<String>,

    /// Camera name to search for in each section's 'Title' key (default: 'Pilot')
    #[arg(long)]
    camera_name: Option<String>,

    /// New value for InitialZoom (default: 0.35)
    #[arg(long, allow_negative_numbers = true)]
    camera_zoom: Option<f64>,

    /// Print what would be done without doing it
    #[arg(long)]
    dry_run: bool,

    /// Accept duplicate sections and keys (last value wins)
    #[arg(long)]
    disable_strict: bool,

    /// Settings file layered over ~/.config/fix-aircraft-fov/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Only print errors and the summary
    #[arg(long)]
    quiet: bool,

    /// Also write logs to a file (a timestamped file under the config dir if no path is given)
    #[arg(long, num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Mode {
    /// Modify cameras.cfg files with the new zoom
    #[arg(long)]
    modify: bool,

    /// Restore cameras.cfg files from backups
    #[arg(long)]
    restore: bool,
}

/// Everything a run needs, after flags are layered over settings
struct RunOptions {
    kind: RunKind,
    community_folder: PathBuf,
    target: CameraTarget,
    ctx: RunContext,
}

fn resolve(cli: &Cli, settings: &Settings) -> Result<RunOptions, String> {
    let defaults = &settings.defaults;
    let kind = if cli.mode.modify {
        RunKind::Modify
    } else {
        RunKind::Restore
    };

    let camera_name = cli
        .camera_name
        .clone()
        .unwrap_or_else(|| defaults.camera_name.clone());
    let camera_zoom = cli.camera_zoom.unwrap_or(defaults.camera_zoom);
    if kind == RunKind::Modify {
        if camera_name.is_empty() {
            return Err("--modify requires a non-empty --camera-name".to_string());
        }
        if !camera_zoom.is_finite() {
            return Err(format!(
                "--modify requires a finite --camera-zoom, got {}",
                camera_zoom
            ));
        }
    }

    let backup_ext = BackupExtension::new(cli.backup_ext.as_deref().unwrap_or(&defaults.backup_ext))
        .map_err(|e| e.to_string())?;
    let strict = defaults.strict && !cli.disable_strict;

    Ok(RunOptions {
        kind,
        community_folder: expand_path(&cli.community_folder),
        target: CameraTarget::new(camera_name, camera_zoom),
        ctx: RunContext::new(backup_ext)
            .with_dry_run(cli.dry_run)
            .with_parser(IniParser::new().strict(strict)),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let options = match resolve(&cli, &settings) {
        Ok(options) => options,
        Err(message) => Cli::command()
            .error(ErrorKind::ValueValidation, message)
            .exit(),
    };

    let log_file = match &cli.log_file {
        Some(Some(path)) => Some(expand_path(path)),
        Some(None) => Some(logging::default_log_path(options.kind)?),
        None => settings.logging.file.as_deref().map(expand_path),
    };
    logging::init_logging(
        logging::Verbosity::from_flags(cli.debug, cli.quiet),
        log_file.as_deref(),
        options.kind,
        options.ctx.dry_run,
    )?;

    let mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Console
    };
    let handler = cli::create_handler(mode);
    handler.emit(OutputEvent::Banner {
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    let locator = CameraFileLocator::new(&options.community_folder);
    tracing::debug!(
        root = %options.community_folder.display(),
        dry_run = options.ctx.dry_run,
        strict = options.ctx.parser.is_strict(),
        backup_ext = %options.ctx.backup_ext,
        "Resolved run options"
    );

    match options.kind {
        RunKind::Modify => {
            cli::modify_cameras(&locator, &options.target, &options.ctx, &*handler);
        }
        RunKind::Restore => {
            cli::restore_cameras(&locator, &options.ctx, &*handler);
        }
    }

    Ok(())
}
