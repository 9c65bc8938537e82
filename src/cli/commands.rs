//! Modify and restore runs over every discovered camera config

use super::output::{OutputEvent, OutputHandler};
use crate::backup::{self, BackupExtension, RestoreAction};
use crate::camera::{self, CameraTarget};
use crate::discovery::CameraFileLocator;
use crate::error::FileError;
use crate::ini::IniParser;
use std::fs;
use std::path::{Path, PathBuf};

/// Which batch is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Modify,
    Restore,
}

impl RunKind {
    pub fn verb(self) -> &'static str {
        match self {
            RunKind::Modify => "modify",
            RunKind::Restore => "restore",
        }
    }
}

/// Options shared by every file in a run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub dry_run: bool,
    pub parser: IniParser,
    pub backup_ext: BackupExtension,
}

impl RunContext {
    pub fn new(backup_ext: BackupExtension) -> Self {
        Self {
            dry_run: false,
            parser: IniParser::new(),
            backup_ext,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_parser(mut self, parser: IniParser) -> Self {
        self.parser = parser;
        self
    }
}

/// Counters for one run. For restores, `modified` counts restored files and
/// `unchanged` counts files without a backup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub modified: usize,
    pub unchanged: usize,
    pub errored: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Modified => self.modified += 1,
            FileOutcome::Unchanged => self.unchanged += 1,
            FileOutcome::Errored(_) => self.errored += 1,
        }
    }
}

/// What happened to a single file
#[derive(Debug)]
pub enum FileOutcome {
    Modified,
    Unchanged,
    Errored(FileError),
}

/// Set InitialZoom on the target camera in every cameras.cfg under the locator's root
pub fn modify_cameras(
    locator: &CameraFileLocator,
    target: &CameraTarget,
    ctx: &RunContext,
    handler: &dyn OutputHandler,
) -> RunStats {
    run_batch(locator, RunKind::Modify, handler, |path| {
        modify_file(path, target, ctx, handler)
    })
}

/// Put every backed-up cameras.cfg under the locator's root back in place
pub fn restore_cameras(
    locator: &CameraFileLocator,
    ctx: &RunContext,
    handler: &dyn OutputHandler,
) -> RunStats {
    run_batch(locator, RunKind::Restore, handler, |path| {
        restore_file(path, ctx, handler)
    })
}

fn run_batch(
    locator: &CameraFileLocator,
    kind: RunKind,
    handler: &dyn OutputHandler,
    mut process: impl FnMut(&Path) -> FileOutcome,
) -> RunStats {
    if let Err(e) = locator.check_root() {
        tracing::debug!(root = %locator.root().display(), "Community folder unusable");
        handler.emit(OutputEvent::DiscoveryFailed {
            error: e.to_string(),
        });
    }

    let files: Vec<PathBuf> = locator.files().collect();
    let mut stats = RunStats {
        total: files.len(),
        ..Default::default()
    };
    tracing::info!(kind = kind.verb(), files = stats.total, "Starting run");
    handler.emit(OutputEvent::Discovered {
        kind,
        count: stats.total,
    });

    for path in &files {
        let outcome = process(path);
        if let FileOutcome::Errored(ref error) = outcome {
            tracing::warn!(path = %path.display(), %error, "File failed");
            handler.emit(OutputEvent::FileError {
                kind,
                path: path.clone(),
                error: error.to_string(),
            });
        }
        stats.record(&outcome);
        handler.emit(OutputEvent::FileDone);
    }

    tracing::info!(
        kind = kind.verb(),
        modified = stats.modified,
        unchanged = stats.unchanged,
        errored = stats.errored,
        "Run complete"
    );
    handler.emit(OutputEvent::Summary { kind, stats });
    stats
}

/// Modify one file, backing it up first if any section changes
pub fn modify_file(
    path: &Path,
    target: &CameraTarget,
    ctx: &RunContext,
    handler: &dyn OutputHandler,
) -> FileOutcome {
    handler.emit(OutputEvent::FileStart {
        path: path.to_path_buf(),
    });
    match try_modify_file(path, target, ctx, handler) {
        Ok(true) => FileOutcome::Modified,
        Ok(false) => FileOutcome::Unchanged,
        Err(e) => FileOutcome::Errored(e),
    }
}

fn try_modify_file(
    path: &Path,
    target: &CameraTarget,
    ctx: &RunContext,
    handler: &dyn OutputHandler,
) -> Result<bool, FileError> {
    let text = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut doc = ctx.parser.parse(&text).map_err(|source| FileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), sections = doc.len(), "Parsed camera config");

    let report = camera::apply(&mut doc, target);
    tracing::debug!(
        path = %path.display(),
        matched = report.matched_any,
        updated = ?report.modified_sections(),
        "Applied camera target"
    );
    for change in &report.changes {
        handler.emit(OutputEvent::Section {
            change: change.clone(),
            dry_run: ctx.dry_run,
        });
    }
    if !report.matched_any {
        handler.emit(OutputEvent::NoMatchingTitle {
            camera: target.title.clone(),
        });
    }
    if !report.is_modified() {
        handler.emit(OutputEvent::NoChanges {
            path: path.to_path_buf(),
        });
        return Ok(false);
    }

    let action = backup::backup(path, &ctx.backup_ext, ctx.dry_run)?;
    handler.emit(OutputEvent::BackedUp {
        path: path.to_path_buf(),
        action,
    });

    if !ctx.dry_run {
        fs::write(path, doc.to_string()).map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    handler.emit(OutputEvent::Written {
        path: path.to_path_buf(),
        dry_run: ctx.dry_run,
    });

    Ok(true)
}

/// Restore one file from its backup, if it has one
pub fn restore_file(path: &Path, ctx: &RunContext, handler: &dyn OutputHandler) -> FileOutcome {
    match backup::restore(path, &ctx.backup_ext, ctx.dry_run) {
        Ok(RestoreAction::Restored { backup }) => {
            handler.emit(OutputEvent::Restored {
                path: path.to_path_buf(),
                backup,
                dry_run: false,
            });
            FileOutcome::Modified
        }
        Ok(RestoreAction::WouldRestore { backup }) => {
            handler.emit(OutputEvent::Restored {
                path: path.to_path_buf(),
                backup,
                dry_run: true,
            });
            FileOutcome::Modified
        }
        Ok(RestoreAction::NoBackup { backup }) => {
            tracing::debug!(expected = %backup.display(), "No backup found");
            handler.emit(OutputEvent::NoBackup {
                path: path.to_path_buf(),
            });
            FileOutcome::Unchanged
        }
        Err(e) => FileOutcome::Errored(e.into()),
    }
}
