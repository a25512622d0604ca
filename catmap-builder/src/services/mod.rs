//! Service modules for the mapping pipeline
//!
//! Stages in dependency order: discovery, ingestion, deduplication,
//! inventory, resolution, readiness, reporting.

pub mod asset_inventory;
pub mod deduplicator;
pub mod image_resolver;
pub mod readiness;
pub mod report_writer;
pub mod row_ingestor;
pub mod source_discovery;

pub use asset_inventory::AssetInventory;
pub use deduplicator::{DedupOutcome, Deduplicator};
pub use image_resolver::ImageResolver;
pub use readiness::{ReadinessClassifier, ReadinessVerdict};
pub use report_writer::{ReportFiles, ReportWriter};
pub use row_ingestor::{IngestOutcome, RowIngestor};
pub use source_discovery::discover_sources;
