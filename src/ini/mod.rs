#![allow(dead_code)]

//! Parsing and writing of `[Section]` / `Key=Value` camera config files

mod document;
mod error;
mod parser;

#[allow(unused_imports)]
pub use document::{ConfigDocument, KeyCase, Section};
pub use error::ParseError;
#[allow(unused_imports)]
pub use parser::{DuplicatePolicy, IniParser};
