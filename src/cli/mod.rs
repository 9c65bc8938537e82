//! CLI module for fix-aircraft-fov
//!
//! This module provides:
//! - Modify and restore runs over a community folder
//! - Output handlers (console, quiet)
//!
//! # Example
//!
//! ```ignore
//! use crate::cli::{commands, output};
//!
//! let handler = output::create_handler(output::OutputMode::Console);
//! let stats = commands::modify_cameras(&locator, &target, &ctx, &*handler);
//! ```

pub mod commands;
pub mod output;

#[allow(unused_imports)]
pub use commands::{RunContext, RunStats, modify_cameras, restore_cameras};
pub use output::{OutputEvent, OutputMode, create_handler};
