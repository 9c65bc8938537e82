//! Output handlers for CLI commands
//!
//! Supports console (every action narrated) and quiet (errors and summary) modes.

use super::commands::{RunKind, RunStats};
use crate::backup::BackupAction;
use crate::camera::SectionChange;
use std::path::PathBuf;

/// Output mode for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Console,
    Quiet,
}

/// Events emitted during a modify or restore run
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    Banner {
        version: String,
    },
    DiscoveryFailed {
        error: String,
    },
    Discovered {
        kind: RunKind,
        count: usize,
    },
    FileStart {
        path: PathBuf,
    },
    Section {
        change: SectionChange,
        dry_run: bool,
    },
    NoMatchingTitle {
        camera: String,
    },
    NoChanges {
        path: PathBuf,
    },
    BackedUp {
        path: PathBuf,
        action: BackupAction,
    },
    Written {
        path: PathBuf,
        dry_run: bool,
    },
    Restored {
        path: PathBuf,
        backup: PathBuf,
        dry_run: bool,
    },
    NoBackup {
        path: PathBuf,
    },
    FileError {
        kind: RunKind,
        path: PathBuf,
        error: String,
    },
    FileDone,
    Summary {
        kind: RunKind,
        stats: RunStats,
    },
}

/// Output handler trait
pub trait OutputHandler: Send + Sync {
    /// Emit an event
    fn emit(&self, event: OutputEvent);
}

/// Console output handler narrating every step
pub struct ConsoleHandler;

impl ConsoleHandler {
    /// Lines printed for an event, without trailing newlines
    fn lines(event: &OutputEvent) -> Vec<String> {
        match event {
            OutputEvent::Banner { version } => vec![format!("FixAircraftFOV {}", version)],
            OutputEvent::DiscoveryFailed { error } => vec![format!("Error: {}", error)],
            OutputEvent::Discovered { kind, count } => vec![
                format!("Found {} 'cameras.cfg' file(s) to {}.", count, kind.verb()),
                String::new(),
            ],
            OutputEvent::FileStart { path } => {
                vec![format!("Processing: '{}'", path.display())]
            }
            OutputEvent::Section { change, dry_run } => vec![Self::section_line(change, *dry_run)],
            OutputEvent::NoMatchingTitle { camera } => vec![format!(
                "  Info: No section found with Title matching '{}'.",
                camera
            )],
            OutputEvent::NoChanges { path } => {
                vec![format!("  Info: No changes needed for '{}'.", path.display())]
            }
            OutputEvent::BackedUp { path, action } => match action {
                BackupAction::BackedUp { backup } => vec![format!(
                    "  Backed up: '{}' to '{}'",
                    path.display(),
                    backup.display()
                )],
                BackupAction::WouldBackUp { backup } => vec![format!(
                    "  Dry-run: Would backup: '{}' to '{}'",
                    path.display(),
                    backup.display()
                )],
            },
            OutputEvent::Written { path, dry_run } => {
                if *dry_run {
                    vec![format!("  Dry-run: Would write changes to '{}'", path.display())]
                } else {
                    vec![format!("  Updated: '{}'", path.display())]
                }
            }
            OutputEvent::Restored {
                path,
                backup,
                dry_run,
            } => {
                let mut lines = vec![format!(
                    "Restoring: '{}' from '{}'",
                    path.display(),
                    backup.display()
                )];
                if *dry_run {
                    lines.push(format!(
                        "  Dry-run: Would copy '{}' to '{}'",
                        backup.display(),
                        path.display()
                    ));
                    lines.push(format!("  Dry-run: Would remove '{}'", backup.display()));
                } else {
                    lines.push(format!("  Successfully restored '{}'", path.display()));
                }
                lines
            }
            OutputEvent::NoBackup { path } => {
                vec![format!("No backup for: '{}'", path.display())]
            }
            OutputEvent::FileError { kind, path, error } => match kind {
                RunKind::Modify => vec![format!("Error: {}", error)],
                RunKind::Restore => {
                    vec![format!("Error restoring '{}': {}", path.display(), error)]
                }
            },
            OutputEvent::FileDone => vec![String::new()],
            OutputEvent::Summary { kind, stats } => Self::summary_lines(*kind, stats),
        }
    }

    fn section_line(change: &SectionChange, dry_run: bool) -> String {
        match change {
            SectionChange::MissingZoom { section } => format!(
                "  Warning: Section '{}' does not contain 'InitialZoom'.",
                section
            ),
            SectionChange::AlreadySet { section, zoom } => format!(
                "  Info: Section '{}' InitialZoom already set to '{}'.",
                section, zoom
            ),
            SectionChange::Updated { section, from, to } if dry_run => format!(
                "  Dry-run: Would modify section '{}', InitialZoom would change from '{}' to '{}'",
                section, from, to
            ),
            SectionChange::Updated { section, from, to } => format!(
                "  Modified section '{}', InitialZoom changed from '{}' to '{}'",
                section, from, to
            ),
        }
    }

    fn summary_lines(kind: RunKind, stats: &RunStats) -> Vec<String> {
        let (changed, unchanged) = match kind {
            RunKind::Modify => ("Modified files", "Unchanged files"),
            RunKind::Restore => ("Restored files", "Backup not found"),
        };
        vec![
            format!("Processed files: {}", stats.total),
            format!("{}: {}", changed, stats.modified),
            format!("{}: {}", unchanged, stats.unchanged),
            format!("Files with errors: {}", stats.errored),
        ]
    }
}

impl OutputHandler for ConsoleHandler {
    fn emit(&self, event: OutputEvent) {
        for line in Self::lines(&event) {
            println!("{}", line);
        }
    }
}

/// Quiet handler printing only failures and the final summary
pub struct QuietHandler;

impl OutputHandler for QuietHandler {
    fn emit(&self, event: OutputEvent) {
        match event {
            OutputEvent::DiscoveryFailed { .. }
            | OutputEvent::FileError { .. }
            | OutputEvent::Summary { .. } => {
                for line in ConsoleHandler::lines(&event) {
                    println!("{}", line);
                }
            }
            _ => {}
        }
    }
}

/// Create an output handler based on mode
pub fn create_handler(mode: OutputMode) -> Box<dyn OutputHandler> {
    match mode {
        OutputMode::Console => Box::new(ConsoleHandler),
        OutputMode::Quiet => Box::new(QuietHandler),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modify_summary_lines() {
        let stats = RunStats {
            total: 4,
            modified: 2,
            unchanged: 1,
            errored: 1,
        };
        let lines = ConsoleHandler::lines(&OutputEvent::Summary {
            kind: RunKind::Modify,
            stats,
        });
        assert_eq!(
            lines,
            vec![
                "Processed files: 4",
                "Modified files: 2",
                "Unchanged files: 1",
                "Files with errors: 1",
            ]
        );
    }

    #[test]
    fn test_restore_summary_labels() {
        let lines = ConsoleHandler::lines(&OutputEvent::Summary {
            kind: RunKind::Restore,
            stats: RunStats::default(),
        });
        assert_eq!(lines[1], "Restored files: 0");
        assert_eq!(lines[2], "Backup not found: 0");
    }

    #[test]
    fn test_section_lines_respect_dry_run() {
        let change = SectionChange::Updated {
            section: "CAMERA_PILOT".into(),
            from: "1.0".into(),
            to: "0.35".into(),
        };

        let real = ConsoleHandler::section_line(&change, false);
        assert_eq!(
            real,
            "  Modified section 'CAMERA_PILOT', InitialZoom changed from '1.0' to '0.35'"
        );

        let dry = ConsoleHandler::section_line(&change, true);
        assert!(dry.starts_with("  Dry-run: Would modify section 'CAMERA_PILOT'"));
    }

    #[test]
    fn test_restore_dry_run_lines() {
        let lines = ConsoleHandler::lines(&OutputEvent::Restored {
            path: PathBuf::from("cameras.cfg"),
            backup: PathBuf::from("cameras.cfg.bak"),
            dry_run: true,
        });
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "  Dry-run: Would remove 'cameras.cfg.bak'");
    }

    #[test]
    fn test_discovered_line() {
        let lines = ConsoleHandler::lines(&OutputEvent::Discovered {
            kind: RunKind::Restore,
            count: 3,
        });
        assert_eq!(lines[0], "Found 3 'cameras.cfg' file(s) to restore.");
    }

    #[test]
    fn test_create_handler() {
        let _ = create_handler(OutputMode::Console);
        let _ = create_handler(OutputMode::Quiet);
    }
}
