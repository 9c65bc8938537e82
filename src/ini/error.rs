//! Error types for config parsing

use thiserror::Error;

/// Reasons a config file can be rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: section '{section}' already exists")]
    DuplicateSection { section: String, line: usize },

    #[error("line {line}: option '{key}' in section '{section}' already exists")]
    DuplicateKey {
        section: String,
        key: String,
        line: usize,
    },

    #[error("line {line}: file contains no section headers: {content:?}")]
    MissingSectionHeader { line: usize, content: String },

    #[error("line {line}: could not parse {content:?}")]
    Malformed { line: usize, content: String },
}
