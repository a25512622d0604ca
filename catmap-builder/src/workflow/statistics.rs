//! Run statistics tracking
//!
//! **Purpose:** Accumulate counters and diagnostics across all pipeline
//! stages of one run, then freeze them into the `summary.json` document.

use crate::models::{ImageResolution, ImageRole, Provenance};
use crate::services::deduplicator::DedupOutcome;
use crate::services::readiness::ReadinessVerdict;
use crate::services::row_ingestor::IngestOutcome;
use serde::Serialize;
use std::collections::BTreeMap;

/// `counts` section of the summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    /// Rows with a non-empty custom code, before deduplication
    pub raw_rows: usize,
    /// Rows after deduplication
    pub deduplicated_rows: usize,
    /// Duplicate overrides recorded
    pub duplicate_code_rows: usize,
    /// Rows dropped for an empty custom code
    pub empty_custom_code_rows: usize,
    /// One per (row, image role)
    pub image_manifest_rows: usize,
    /// Manifest rows counted as missing
    pub missing_image_rows: usize,
    /// Rows passing the readiness check
    pub ready_for_api_rows: usize,
    /// Resolutions that needed a fallback
    pub fallback_image_resolutions: usize,
}

/// `quality` section of the summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub header_mismatch_files: Vec<String>,
    /// Required column → rows missing it
    pub missing_required_columns: BTreeMap<String, usize>,
    pub empty_custom_code_rows: Vec<Provenance>,
    pub unreadable_rows: Vec<Provenance>,
}

/// `input` section of the summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputReport {
    pub input_glob: String,
    pub csv_files: Vec<String>,
    pub image_dir: String,
    pub output_dir: String,
}

/// Complete `summary.json` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub input: InputReport,
    pub counts: RunCounts,
    pub quality: QualityReport,
}

/// Accumulator for one pipeline run
///
/// Append-only until [`RunStatistics::into_summary`] freezes it.
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    pub counts: RunCounts,
    pub quality: QualityReport,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record ingestion diagnostics
    pub fn record_ingest(&mut self, outcome: &IngestOutcome) {
        self.counts.raw_rows += outcome.rows.len();
        self.counts.empty_custom_code_rows += outcome.empty_key_rows.len();
        self.quality
            .header_mismatch_files
            .extend(outcome.header_mismatch_files.iter().cloned());
        self.quality
            .empty_custom_code_rows
            .extend(outcome.empty_key_rows.iter().cloned());
        self.quality
            .unreadable_rows
            .extend(outcome.unreadable_rows.iter().cloned());
    }

    /// Record deduplication results
    pub fn record_dedup(&mut self, outcome: &DedupOutcome) {
        self.counts.deduplicated_rows += outcome.rows.len();
        self.counts.duplicate_code_rows += outcome.duplicates.len();
    }

    /// Record one image resolution (one manifest row)
    pub fn record_resolution(&mut self, role: ImageRole, resolution: &ImageResolution) {
        self.counts.image_manifest_rows += 1;
        if resolution.used_fallback {
            self.counts.fallback_image_resolutions += 1;
        }
        if resolution.counts_as_missing(role) {
            self.counts.missing_image_rows += 1;
        }
    }

    /// Record one row's readiness verdict
    pub fn record_verdict(&mut self, verdict: &ReadinessVerdict) {
        for column in &verdict.missing_required {
            *self
                .quality
                .missing_required_columns
                .entry(column.clone())
                .or_insert(0) += 1;
        }
        if verdict.is_ready() {
            self.counts.ready_for_api_rows += 1;
        }
    }

    /// Short console summary, one line per figure
    pub fn display_lines(&self, csv_files: usize, output_dir: &str) -> Vec<String> {
        vec![
            format!("[catmap] csv files: {}", csv_files),
            format!(
                "[catmap] rows(raw/dedup): {}/{}",
                self.counts.raw_rows, self.counts.deduplicated_rows
            ),
            format!("[catmap] ready_for_api: {}", self.counts.ready_for_api_rows),
            format!("[catmap] missing_images: {}", self.counts.missing_image_rows),
            format!("[catmap] output: {}", output_dir),
        ]
    }

    /// Freeze into the summary document
    pub fn into_summary(self, input: InputReport) -> RunSummary {
        RunSummary {
            input,
            counts: self.counts,
            quality: self.quality,
        }
    }
}
