//! In-memory representation of a parsed config file

use std::fmt;

/// How option names are normalized on read and lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyCase {
    /// Keep keys exactly as written
    #[default]
    Preserve,
    /// Lower-case every key
    Lower,
}

impl KeyCase {
    pub fn normalize(self, key: &str) -> String {
        match self {
            KeyCase::Preserve => key.to_string(),
            KeyCase::Lower => key.to_lowercase(),
        }
    }
}

/// A named section with its ordered entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
    key_case: KeyCase,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>, key_case: KeyCase) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            key_case,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Look up a value; the key goes through the same normalization as on read
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.entries[i].1.as_str())
    }

    /// Set a value, keeping the entry's position if the key already exists.
    /// Returns the previous value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        match self.position(key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((self.key_case.normalize(key), value));
                None
            }
        }
    }

    pub(crate) fn value_mut(&mut self, key: &str) -> Option<&mut String> {
        self.position(key).map(|i| &mut self.entries[i].1)
    }

    fn position(&self, key: &str) -> Option<usize> {
        let key = self.key_case.normalize(key);
        self.entries.iter().position(|(k, _)| *k == key)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.name)?;
        for (key, value) in &self.entries {
            // Continuation lines must stay indented to be read back as one value
            writeln!(f, "{}={}", key, value.replace('\n', "\n\t"))?;
        }
        writeln!(f)
    }
}

/// Ordered set of uniquely named sections
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigDocument {
    sections: Vec<Section>,
    key_case: KeyCase,
}

impl ConfigDocument {
    pub fn new(key_case: KeyCase) -> Self {
        Self {
            sections: Vec::new(),
            key_case,
        }
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn sections_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        self.sections.iter_mut()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Add an empty section, or return the existing one with that name
    pub fn add_section(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(i) => i,
            None => {
                self.sections.push(Section::new(name, self.key_case));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }

    pub(crate) fn section_at_mut(&mut self, index: usize) -> &mut Section {
        &mut self.sections[index]
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}
