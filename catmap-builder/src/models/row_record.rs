//! Unified row records with provenance

use serde::Serialize;
use std::collections::HashMap;

/// Where a row came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// Source file name (no directory)
    pub source_file: String,
    /// Human line number; the header is line 1
    pub source_line: usize,
}

impl Provenance {
    pub fn new(source_file: impl Into<String>, source_line: usize) -> Self {
        Self {
            source_file: source_file.into(),
            source_line,
        }
    }
}

/// One ingested product row
///
/// Values are trimmed at ingestion and looked up by column name, since
/// sources with mismatched headers keep their own column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    key: String,
    fields: HashMap<String, String>,
    provenance: Provenance,
}

impl RowRecord {
    /// Create a row keyed by its (non-empty, trimmed) custom code
    pub fn new(key: String, fields: HashMap<String, String>, provenance: Provenance) -> Self {
        Self {
            key,
            fields,
            provenance,
        }
    }

    /// Custom code used for deduplication
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value of a column, empty when the column is absent
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
}

/// One key override recorded by the deduplicator
///
/// `kept` is the row that was retained before the override; `replaced` is
/// the later row that took its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDiagnostic {
    pub key: String,
    pub kept: Provenance,
    pub replaced: Provenance,
}
