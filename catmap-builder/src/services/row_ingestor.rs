//! Row ingestion
//!
//! Reads every discovered export into one unified row sequence. Ingestion is
//! purely additive: structural problems are recorded as diagnostics and the
//! affected row (or file) is skipped, never escalated.

use crate::models::{Provenance, RowRecord};
use catmap_common::Result;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const UTF8_BOM: char = '\u{feff}';

/// Result of ingesting all sources
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    /// Header of the first source that had one
    pub header: Vec<String>,
    /// Rows with a non-empty key, in source order then file order
    pub rows: Vec<RowRecord>,
    /// File names whose header differs from the canonical header
    pub header_mismatch_files: Vec<String>,
    /// Rows dropped because the custom code was empty
    pub empty_key_rows: Vec<Provenance>,
    /// Rows (or whole files, line 0) that could not be decoded
    pub unreadable_rows: Vec<Provenance>,
}

/// Row ingestor
pub struct RowIngestor {
    key_column: String,
}

impl RowIngestor {
    /// Create an ingestor keyed on `key_column`
    pub fn new(key_column: impl Into<String>) -> Self {
        Self {
            key_column: key_column.into(),
        }
    }

    /// Ingest all sources in the given order
    pub fn ingest(&self, paths: &[PathBuf]) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();

        for path in paths {
            let source_name = source_name(path);
            let result = File::open(path)
                .map_err(Into::into)
                .and_then(|file| self.ingest_reader(&source_name, file, &mut outcome));

            if let Err(e) = result {
                tracing::warn!("Skipping unreadable source {}: {}", path.display(), e);
                outcome.unreadable_rows.push(Provenance::new(source_name, 0));
            }
        }

        tracing::info!(
            rows = outcome.rows.len(),
            empty_keys = outcome.empty_key_rows.len(),
            header_mismatches = outcome.header_mismatch_files.len(),
            "Ingestion complete"
        );

        outcome
    }

    /// Ingest one source read from `reader`, appending to `outcome`
    ///
    /// Only failures to read the header are returned as errors; bad records
    /// are recorded in `outcome.unreadable_rows`.
    pub fn ingest_reader<R: Read>(
        &self,
        source_name: &str,
        reader: R,
        outcome: &mut IngestOutcome,
    ) -> Result<()> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header: Vec<String> = csv_reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let field = if i == 0 {
                    field.trim_start_matches(UTF8_BOM)
                } else {
                    field
                };
                field.trim().to_string()
            })
            .collect();

        if header.iter().all(String::is_empty) {
            tracing::warn!("Source {} has no header row, skipping", source_name);
            return Ok(());
        }

        if outcome.header.is_empty() {
            outcome.header = header.clone();
        } else if outcome.header != header {
            tracing::warn!("Header mismatch in {}", source_name);
            outcome.header_mismatch_files.push(source_name.to_string());
        }

        let mut ingested = 0usize;
        for (index, record) in csv_reader.records().enumerate() {
            let provenance = Provenance::new(source_name, index + 2);

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(
                        "Unreadable row {}:{}: {}",
                        source_name,
                        provenance.source_line,
                        e
                    );
                    let fatal = e.is_io_error();
                    outcome.unreadable_rows.push(provenance);
                    if fatal {
                        break;
                    }
                    continue;
                }
            };

            let fields: HashMap<String, String> = header
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = record.get(i).unwrap_or("").trim().to_string();
                    (name.clone(), value)
                })
                .collect();

            let key = fields
                .get(&self.key_column)
                .cloned()
                .unwrap_or_default();

            if key.is_empty() {
                tracing::debug!(
                    "Empty custom code at {}:{}",
                    source_name,
                    provenance.source_line
                );
                outcome.empty_key_rows.push(provenance);
                continue;
            }

            outcome.rows.push(RowRecord::new(key, fields, provenance));
            ingested += 1;
        }

        tracing::debug!("Ingested {} rows from {}", ingested, source_name);
        Ok(())
    }
}

/// Source identifier used in provenance: the file name without directories
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "code";

    fn ingest(sources: &[(&str, &[u8])]) -> IngestOutcome {
        let ingestor = RowIngestor::new(KEY);
        let mut outcome = IngestOutcome::default();
        for (name, content) in sources {
            ingestor.ingest_reader(name, *content, &mut outcome).unwrap();
        }
        outcome
    }

    #[test]
    fn test_values_trimmed_and_provenance_tagged() {
        let outcome = ingest(&[("a.csv", b"code,name\n  SAF2026-1 , Moon  \nSAF2026-2,Sun\n")]);

        assert_eq!(outcome.header, vec!["code", "name"]);
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].key(), "SAF2026-1");
        assert_eq!(outcome.rows[0].get("name"), "Moon");
        assert_eq!(outcome.rows[0].provenance(), &Provenance::new("a.csv", 2));
        assert_eq!(outcome.rows[1].provenance(), &Provenance::new("a.csv", 3));
    }

    #[test]
    fn test_empty_key_rows_dropped() {
        let outcome = ingest(&[("a.csv", b"code,name\n,Orphan\n  ,Blank\nSAF2026-3,Star\n")]);

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(
            outcome.empty_key_rows,
            vec![Provenance::new("a.csv", 2), Provenance::new("a.csv", 3)]
        );
    }

    #[test]
    fn test_missing_key_column_counts_as_empty() {
        let outcome = ingest(&[("a.csv", b"name\nLonely\n")]);
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.empty_key_rows.len(), 1);
    }

    #[test]
    fn test_header_mismatch_flagged_but_rows_kept() {
        let outcome = ingest(&[
            ("a.csv", b"code,name,price\nSAF2026-1,Moon,100\n"),
            ("b.csv", b"name,code\nSun,SAF2026-2\n"),
            ("c.csv", b"code,name,price\nSAF2026-3,Star,300\n"),
        ]);

        assert_eq!(outcome.header, vec!["code", "name", "price"]);
        assert_eq!(outcome.header_mismatch_files, vec!["b.csv"]);
        assert_eq!(outcome.rows.len(), 3);
        assert_eq!(outcome.rows[1].key(), "SAF2026-2");
        assert_eq!(outcome.rows[1].get("name"), "Sun");
        assert_eq!(outcome.rows[1].get("price"), "");
    }

    #[test]
    fn test_bom_and_header_whitespace_stripped() {
        let outcome = ingest(&[("a.csv", "\u{feff} code , name\nSAF2026-1,Moon\n".as_bytes())]);

        assert_eq!(outcome.header, vec!["code", "name"]);
        assert_eq!(outcome.rows.len(), 1);
    }

    #[test]
    fn test_ragged_rows_tolerated() {
        let outcome = ingest(&[("a.csv", b"code,name,price\nSAF2026-1,Moon\nSAF2026-2,Sun,200,extra\n")]);

        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].get("price"), "");
        assert_eq!(outcome.rows[1].get("price"), "200");
    }

    #[test]
    fn test_quoted_multiline_values() {
        let outcome = ingest(&[(
            "a.csv",
            b"code,description\nSAF2026-1,\"line one\nline two\"\nSAF2026-2,short\n",
        )]);

        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].get("description"), "line one\nline two");
        assert_eq!(outcome.rows[1].provenance().source_line, 3);
    }

    #[test]
    fn test_invalid_utf8_row_recorded() {
        let outcome = ingest(&[("a.csv", b"code,name\nSAF2026-1,\xff\xfe\nSAF2026-2,Sun\n")]);

        assert_eq!(outcome.unreadable_rows, vec![Provenance::new("a.csv", 2)]);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].key(), "SAF2026-2");
    }

    #[test]
    fn test_empty_source_skipped() {
        let outcome = ingest(&[("empty.csv", b""), ("a.csv", b"code\nSAF2026-1\n")]);

        assert_eq!(outcome.header, vec!["code"]);
        assert!(outcome.header_mismatch_files.is_empty());
        assert_eq!(outcome.rows.len(), 1);
    }

    #[test]
    fn test_missing_file_recorded_as_unreadable() {
        let ingestor = RowIngestor::new(KEY);
        let outcome = ingestor.ingest(&[PathBuf::from("/nonexistent/products.csv")]);

        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.unreadable_rows, vec![Provenance::new("products.csv", 0)]);
    }
}
