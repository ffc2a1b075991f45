//! Mapping entries and their persisted JSON form.
//!
//! On disk a mapping is a flat list of
//! `{"mtg_card": ..., "lotr_card": ..., "setCode": ...}` objects, one per
//! matched source card, in match order. `setCode` is optional.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One resolved source-to-target association.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Source catalog card name.
    #[serde(rename = "mtg_card")]
    pub source_name: String,

    /// Target catalog card name.
    #[serde(rename = "lotr_card")]
    pub target_name: String,

    /// Set code recorded at match time.
    #[serde(rename = "setCode", default, skip_serializing_if = "Option::is_none")]
    pub set_code: Option<String>,
}

impl MappingEntry {
    #[must_use]
    pub fn new(source_name: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            target_name: target_name.into(),
            set_code: None,
        }
    }

    /// Attach a set code (builder pattern).
    #[must_use]
    pub fn with_set(mut self, set_code: impl Into<String>) -> Self {
        self.set_code = Some(set_code.into());
        self
    }
}

/// Ordered mapping with lookup by source name.
///
/// Holds at most one entry per source name; later inserts for a name that
/// is already present are ignored.
///
/// ```
/// use ccg_remap::mapping::{MappingEntry, MappingTable};
///
/// let mut table = MappingTable::new();
/// assert!(table.insert(MappingEntry::new("Llanowar Elves", "Elven Farsight")));
/// assert!(!table.insert(MappingEntry::new("Llanowar Elves", "Other")));
///
/// assert_eq!(table.get("Llanowar Elves").unwrap().target_name, "Elven Farsight");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    by_source: FxHashMap<String, usize>,
}

impl MappingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from entries, keeping the first entry per source name.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = MappingEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Add an entry. Returns false if its source name is already mapped.
    pub fn insert(&mut self, entry: MappingEntry) -> bool {
        if self.by_source.contains_key(&entry.source_name) {
            return false;
        }
        self.by_source.insert(entry.source_name.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Entry for a source card name.
    #[must_use]
    pub fn get(&self, source_name: &str) -> Option<&MappingEntry> {
        self.by_source.get(source_name).map(|&i| &self.entries[i])
    }

    #[must_use]
    pub fn contains(&self, source_name: &str) -> bool {
        self.by_source.contains_key(source_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Serialize as a pretty-printed flat JSON list.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Parse a flat JSON list.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<MappingEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Write the mapping file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a mapping file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
