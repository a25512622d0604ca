//! Rows after resolution and classification

use super::{ImageResolution, ImageRole, RowRecord};
use crate::services::readiness::ReadinessVerdict;

/// A deduplicated row with its image resolutions and readiness verdict
#[derive(Debug, Clone)]
pub struct ProcessedRow {
    pub row: RowRecord,
    /// Numeric artwork id, empty when the custom code has none
    pub numeric_id: String,
    /// One resolution per role, in [`ImageRole::ALL`] order
    pub resolutions: Vec<(ImageRole, ImageResolution)>,
    pub verdict: ReadinessVerdict,
}

impl ProcessedRow {
    /// Resolution for a role
    pub fn resolution(&self, role: ImageRole) -> Option<&ImageResolution> {
        self.resolutions
            .iter()
            .find(|(candidate, _)| *candidate == role)
            .map(|(_, resolution)| resolution)
    }
}
