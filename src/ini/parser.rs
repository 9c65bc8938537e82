//! Line-oriented parser for `[Section]` / `Key=Value` files

use super::document::{ConfigDocument, KeyCase};
use super::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?P<header>.+)\]").expect("valid section regex"));

// Non-greedy key so the first '=' or ':' is the delimiter
static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>.*?)\s*[=:]\s*(?P<value>.*)$").expect("valid option regex")
});

/// What to do when a section or key appears twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with a [`ParseError`] (strict mode)
    #[default]
    Reject,
    /// Merge repeated sections; the last value of a repeated key wins
    LastWins,
}

impl DuplicatePolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Reject } else { Self::LastWins }
    }
}

/// Configurable parser producing a [`ConfigDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IniParser {
    key_case: KeyCase,
    duplicates: DuplicatePolicy,
}

impl IniParser {
    /// Case-preserving, strict parser
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_case(mut self, key_case: KeyCase) -> Self {
        self.key_case = key_case;
        self
    }

    pub fn duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn strict(self, strict: bool) -> Self {
        self.duplicates(DuplicatePolicy::from_strict(strict))
    }

    pub fn is_strict(&self) -> bool {
        self.duplicates == DuplicatePolicy::Reject
    }

    /// Parse a whole file's text
    pub fn parse(&self, text: &str) -> Result<ConfigDocument, ParseError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut doc = ConfigDocument::new(self.key_case);
        let mut current: Option<usize> = None;
        // Key accepting continuation lines, with the indent of its own line
        let mut open_key: Option<(String, usize)> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();

            // A blank line ends the open value, so an indented line after it
            // is read as a new key rather than a continuation
            if trimmed.is_empty() {
                open_key = None;
                continue;
            }
            if trimmed.starts_with(['#', ';']) {
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();
            if let (Some(section), Some((key, key_indent))) = (current, open_key.as_ref()) {
                if indent > *key_indent {
                    if let Some(value) = doc.section_at_mut(section).value_mut(key) {
                        value.push('\n');
                        value.push_str(trimmed);
                    }
                    continue;
                }
            }

            if let Some(caps) = SECTION_RE.captures(trimmed) {
                let name = &caps["header"];
                if doc.index_of(name).is_some() && self.is_strict() {
                    return Err(ParseError::DuplicateSection {
                        section: name.to_string(),
                        line,
                    });
                }
                doc.add_section(name);
                current = doc.index_of(name);
                open_key = None;
                continue;
            }

            let Some(section_index) = current else {
                return Err(ParseError::MissingSectionHeader {
                    line,
                    content: trimmed.to_string(),
                });
            };

            let (key, value) = match OPTION_RE.captures(trimmed) {
                Some(caps) if !caps["key"].is_empty() => {
                    (caps["key"].to_string(), caps["value"].trim().to_string())
                }
                _ => {
                    return Err(ParseError::Malformed {
                        line,
                        content: trimmed.to_string(),
                    });
                }
            };

            let section = doc.section_at_mut(section_index);
            if self.is_strict() && section.contains_key(&key) {
                return Err(ParseError::DuplicateKey {
                    section: section.name().to_string(),
                    key: self.key_case.normalize(&key),
                    line,
                });
            }
            section.set(&key, value);
            open_key = Some((key, indent));
        }

        Ok(doc)
    }
}
