//! Side-by-side backups of camera configs and restoring from them

use std::ffi::OsString;
use std::fs::{self, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors during backup or restore
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("invalid backup extension {ext:?}")]
    InvalidExtension { ext: String },

    #[error("failed to back up {path} to {backup}: {source}")]
    BackupFailed {
        path: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },

    #[error("backup restore failed for {path}: {source}")]
    RestoreFailed { path: PathBuf, source: io::Error },

    #[error("failed to remove backup {backup}: {source}")]
    CleanupFailed { backup: PathBuf, source: io::Error },
}

/// Suffix appended to a file name to form its backup, always starting with '.'
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupExtension(String);

impl BackupExtension {
    pub fn new(ext: &str) -> Result<Self, BackupError> {
        let normalized = if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{}", ext)
        };

        if normalized == "." || normalized.contains(['/', '\\']) {
            return Err(BackupError::InvalidExtension {
                ext: ext.to_string(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `cameras.cfg` becomes `cameras.cfg<ext>`
    pub fn backup_path(&self, path: &Path) -> PathBuf {
        let mut name: OsString = path.as_os_str().to_owned();
        name.push(&self.0);
        PathBuf::from(name)
    }
}

impl std::fmt::Display for BackupExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of [`backup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupAction {
    BackedUp { backup: PathBuf },
    WouldBackUp { backup: PathBuf },
}

/// Outcome of [`restore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreAction {
    Restored { backup: PathBuf },
    WouldRestore { backup: PathBuf },
    NoBackup { backup: PathBuf },
}

/// Copy `path` next to itself with the backup extension, overwriting any
/// earlier backup
pub fn backup(
    path: &Path,
    ext: &BackupExtension,
    dry_run: bool,
) -> Result<BackupAction, BackupError> {
    let backup = ext.backup_path(path);
    if dry_run {
        return Ok(BackupAction::WouldBackUp { backup });
    }

    copy_with_times(path, &backup).map_err(|source| BackupError::BackupFailed {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;
    tracing::debug!(from = %path.display(), to = %backup.display(), "Backup written");

    Ok(BackupAction::BackedUp { backup })
}

/// Put the backup back in place of `path` and delete it
pub fn restore(
    path: &Path,
    ext: &BackupExtension,
    dry_run: bool,
) -> Result<RestoreAction, BackupError> {
    let backup = ext.backup_path(path);
    if !backup.exists() {
        return Ok(RestoreAction::NoBackup { backup });
    }
    if dry_run {
        return Ok(RestoreAction::WouldRestore { backup });
    }

    copy_with_times(&backup, path).map_err(|source| BackupError::RestoreFailed {
        path: path.to_path_buf(),
        source,
    })?;
    fs::remove_file(&backup).map_err(|source| BackupError::CleanupFailed {
        backup: backup.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), from = %backup.display(), "Backup restored");

    Ok(RestoreAction::Restored { backup })
}

/// Copy contents and permissions, then carry over access/modification times
fn copy_with_times(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;

    let metadata = fs::metadata(from)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    fs::OpenOptions::new().write(true).open(to)?.set_times(times)
}
