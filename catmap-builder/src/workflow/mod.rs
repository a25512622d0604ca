//! Workflow orchestration
//!
//! Drives one mapping run through every service stage and keeps its
//! statistics.

pub mod pipeline;
pub mod statistics;

pub use pipeline::{MappingPipeline, PipelineConfig, PipelineOutcome};
pub use statistics::{RunStatistics, RunSummary};
