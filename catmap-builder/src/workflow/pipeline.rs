//! Pipeline Orchestrator
//!
//! Runs one complete mapping build: merge → deduplicate → resolve →
//! classify → report.
//!
//! # Architecture
//! - **Phase 1**: Source discovery (the only fatal failure point)
//! - **Phase 2**: Row ingestion with provenance
//! - **Phase 3**: Deduplication, last source wins
//! - **Phase 4**: Image inventory snapshot
//! - **Phase 5**: Per-row image resolution and readiness classification
//! - **Phase 6**: Report emission
//!
//! # Error Handling
//! - Data-quality problems are collected into [`RunStatistics`], never raised
//! - Only an empty source set (or an output write failure) aborts the run
//!
//! # Example
//! ```rust,ignore
//! let pipeline = MappingPipeline::new(config)?;
//! let outcome = pipeline.run()?;
//! ```

use super::statistics::{InputReport, RunStatistics, RunSummary};
use crate::models::{CodePattern, ImageRole, ProcessedRow, RowRecord};
use crate::services::{
    discover_sources, AssetInventory, Deduplicator, ImageResolver, ReadinessClassifier,
    ReportFiles, ReportWriter, RowIngestor,
};
use catmap_common::config::DEFAULT_CODE_PREFIX;
use catmap_common::{ColumnLayout, ResolvedPaths, Result};
use std::path::Path;
use tracing::info;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Input glob and image/output directories
    pub paths: ResolvedPaths,
    /// Column names of the exports
    pub layout: ColumnLayout,
    /// Custom code prefix in front of the numeric artwork id
    pub code_prefix: String,
}

impl PipelineConfig {
    /// Configuration with the default column layout and code prefix
    pub fn with_paths(paths: ResolvedPaths) -> Self {
        Self {
            paths,
            layout: ColumnLayout::default(),
            code_prefix: DEFAULT_CODE_PREFIX.to_string(),
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub summary: RunSummary,
    pub files: ReportFiles,
    /// Short human-readable summary for the console
    pub console_lines: Vec<String>,
}

/// Mapping pipeline orchestrator
pub struct MappingPipeline {
    config: PipelineConfig,
    pattern: CodePattern,
}

impl MappingPipeline {
    /// Create a pipeline; fails only on an unusable code prefix
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let pattern = CodePattern::new(&config.code_prefix)?;
        Ok(Self { config, pattern })
    }

    /// Run every phase and write all reports
    pub fn run(&self) -> Result<PipelineOutcome> {
        let paths = &self.config.paths;
        let layout = &self.config.layout;
        let mut stats = RunStatistics::new();

        // Phase 1: discovery
        let sources = discover_sources(&paths.input_glob)?;
        info!("Discovered {} source files", sources.len());

        // Phase 2: ingestion
        let ingested = RowIngestor::new(layout.custom_code.clone()).ingest(&sources);
        stats.record_ingest(&ingested);
        let header = ingested.header;

        // Phase 3: deduplication
        let deduped = Deduplicator::new(&self.pattern).deduplicate(ingested.rows);
        stats.record_dedup(&deduped);

        // Phase 4: inventory snapshot
        let inventory = AssetInventory::scan(&paths.image_dir);

        // Phase 5: resolution and readiness
        let processed = self.process_rows(deduped.rows, &inventory, &mut stats);
        info!(
            ready = stats.counts.ready_for_api_rows,
            missing_images = stats.counts.missing_image_rows,
            "Classification complete"
        );

        // Phase 6: reports
        let output_dir = posix(&paths.output_dir);
        let console_lines = stats.display_lines(sources.len(), &output_dir);
        let summary = stats.into_summary(InputReport {
            input_glob: paths.input_glob.clone(),
            csv_files: sources.iter().map(|p| posix(p)).collect(),
            image_dir: posix(&paths.image_dir),
            output_dir,
        });

        let writer = ReportWriter::create(&paths.output_dir, layout)?;
        let files = writer.write_all(&header, &processed, &deduped.duplicates, &summary)?;

        Ok(PipelineOutcome {
            summary,
            files,
            console_lines,
        })
    }

    /// Resolve every image role and classify readiness for each row
    pub fn process_rows(
        &self,
        rows: Vec<RowRecord>,
        inventory: &AssetInventory,
        stats: &mut RunStatistics,
    ) -> Vec<ProcessedRow> {
        let layout = &self.config.layout;
        let resolver = ImageResolver::new(inventory);
        let classifier = ReadinessClassifier::new(layout);

        rows.into_iter()
            .map(|row| {
                let numeric_id = self.pattern.numeric_id(row.key()).unwrap_or_default();
                let fallback_stem = Some(numeric_id.as_str()).filter(|id| !id.is_empty());

                let resolutions: Vec<_> = ImageRole::ALL
                    .iter()
                    .map(|role| {
                        let reference = row.get(role.column(layout));
                        let resolution = resolver.resolve(reference, fallback_stem);
                        stats.record_resolution(*role, &resolution);
                        (*role, resolution)
                    })
                    .collect();

                let verdict = classifier.classify(&row, &resolutions);
                stats.record_verdict(&verdict);

                ProcessedRow {
                    row,
                    numeric_id,
                    resolutions,
                    verdict,
                }
            })
            .collect()
    }
}

/// Render a path with forward slashes
fn posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
