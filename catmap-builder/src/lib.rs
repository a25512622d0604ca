//! catmap-builder library interface
//!
//! Exposes the mapping pipeline for the binary and for integration testing.

pub mod models;
pub mod services;
pub mod workflow;

pub use workflow::pipeline::{MappingPipeline, PipelineOutcome};
pub use workflow::statistics::RunStatistics;
