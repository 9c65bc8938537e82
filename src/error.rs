//! Per-file failure taxonomy for modify and restore runs

use crate::backup::BackupError;
use crate::ini::ParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single camera config could not be processed.
///
/// These never abort a run; they are counted and reported per file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_display() {
        let err = FileError::Parse {
            path: PathBuf::from("plane/cameras.cfg"),
            source: ParseError::DuplicateSection {
                section: "CAMERA_DEFINITION.0".into(),
                line: 12,
            },
        };

        let display = err.to_string();
        assert!(display.contains("plane/cameras.cfg"));
        assert!(display.contains("CAMERA_DEFINITION.0"));
        assert!(display.contains("line 12"));
    }

    #[test]
    fn test_backup_error_is_transparent() {
        let err: FileError = BackupError::InvalidExtension { ext: "".into() }.into();
        assert_eq!(err.to_string(), "invalid backup extension \"\"");
    }
}
