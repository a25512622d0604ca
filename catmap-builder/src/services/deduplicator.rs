//! Custom code deduplication
//!
//! Last source wins: a later row with the same custom code replaces the
//! earlier one wholesale (no field-level merging). Every replacement is kept
//! as a diagnostic so the override is auditable.

use crate::models::{CodePattern, DuplicateDiagnostic, RowRecord};
use std::collections::HashMap;

/// Deduplicated rows plus the overrides that produced them
#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    /// One row per custom code, in sort-key order
    pub rows: Vec<RowRecord>,
    /// One entry per override, in traversal order
    pub duplicates: Vec<DuplicateDiagnostic>,
}

/// Deduplicator
pub struct Deduplicator<'a> {
    pattern: &'a CodePattern,
}

impl<'a> Deduplicator<'a> {
    pub fn new(pattern: &'a CodePattern) -> Self {
        Self { pattern }
    }

    /// Collapse rows sharing a custom code
    ///
    /// **Algorithm:**
    /// 1. Walk rows in ingestion order, mapping key → last-seen row
    /// 2. On a repeated key, record (previous provenance, new provenance)
    ///    and overwrite the mapping entry
    /// 3. Sort the surviving rows by custom code sort key
    pub fn deduplicate(&self, rows: Vec<RowRecord>) -> DedupOutcome {
        let mut latest: HashMap<String, RowRecord> = HashMap::with_capacity(rows.len());
        let mut duplicates = Vec::new();

        for row in rows {
            if let Some(previous) = latest.get(row.key()) {
                tracing::debug!(
                    key = %row.key(),
                    kept = %previous.provenance().source_file,
                    replaced = %row.provenance().source_file,
                    "Duplicate custom code"
                );
                duplicates.push(DuplicateDiagnostic {
                    key: row.key().to_string(),
                    kept: previous.provenance().clone(),
                    replaced: row.provenance().clone(),
                });
            }
            latest.insert(row.key().to_string(), row);
        }

        let mut rows: Vec<RowRecord> = latest.into_values().collect();
        rows.sort_by_cached_key(|row| self.pattern.sort_key(row.key()));

        tracing::info!(
            unique = rows.len(),
            duplicates = duplicates.len(),
            "Deduplication complete"
        );

        DedupOutcome { rows, duplicates }
    }
}
