//! Finding camera configs beneath a community folder
//!
//! The walk is lazy and top-down: the files of a directory are yielded before
//! any of its subdirectories are opened. Symbolic links to directories are
//! followed, with no cycle detection, so a link pointing back at one of its
//! ancestors makes the walk unbounded.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for in every directory
pub const CAMERA_FILE_NAME: &str = "cameras.cfg";

#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    #[error("Community folder '{}' does not exist or is not a directory.", path.display())]
    NotADirectory { path: PathBuf },
}

/// Root plus file name to search for
#[derive(Debug, Clone)]
pub struct CameraFileLocator {
    root: PathBuf,
    file_name: String,
}

impl CameraFileLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: CAMERA_FILE_NAME.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Error if the root cannot be walked at all
    pub fn check_root(&self) -> Result<(), DiscoveryError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(DiscoveryError::NotADirectory {
                path: self.root.clone(),
            })
        }
    }

    /// Start a fresh walk; each call begins again from the root
    pub fn files(&self) -> CameraFiles<'_> {
        let pending = if self.root.is_dir() {
            vec![self.root.clone()]
        } else {
            Vec::new()
        };
        CameraFiles {
            file_name: &self.file_name,
            pending,
            ready: VecDeque::new(),
        }
    }
}

impl<'a> IntoIterator for &'a CameraFileLocator {
    type Item = PathBuf;
    type IntoIter = CameraFiles<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.files()
    }
}

/// Lazy iterator over matching files
#[derive(Debug)]
pub struct CameraFiles<'a> {
    file_name: &'a str,
    /// Directories not yet opened, popped from the end
    pending: Vec<PathBuf>,
    /// Matches from the last opened directory
    ready: VecDeque<PathBuf>,
}

impl CameraFiles<'_> {
    fn visit(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();

        let mut subdirs = Vec::new();
        for path in paths {
            // fs::metadata follows symlinks, so linked directories are descended
            if path.is_dir() {
                subdirs.push(path);
            } else if path.file_name().is_some_and(|n| n == self.file_name) {
                self.ready.push_back(path);
            }
        }
        tracing::debug!(
            dir = %dir.display(),
            matches = self.ready.len(),
            subdirs = subdirs.len(),
            "Scanned directory"
        );

        self.pending.extend(subdirs.into_iter().rev());
    }
}

impl Iterator for CameraFiles<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if let Some(path) = self.ready.pop_front() {
                return Some(path);
            }
            let dir = self.pending.pop()?;
            self.visit(&dir);
        }
    }
}
