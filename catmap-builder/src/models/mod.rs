//! Data models for the mapping pipeline

pub mod custom_code;
pub mod image_resolution;
pub mod processed_row;
pub mod row_record;

pub use custom_code::{CodePattern, SortKey};
pub use image_resolution::{ImageResolution, ImageRole, ResolutionReason};
pub use processed_row::ProcessedRow;
pub use row_record::{DuplicateDiagnostic, Provenance, RowRecord};
