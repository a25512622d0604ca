//! Per-row readiness classification

use crate::models::{ImageResolution, ImageRole, RowRecord};
use catmap_common::ColumnLayout;

/// Readiness of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessVerdict {
    /// Required columns that are absent or empty, in layout order
    pub missing_required: Vec<String>,
    /// Images counted as missing under the mandatory-role rule
    pub unresolved_images: usize,
}

impl ReadinessVerdict {
    pub fn is_ready(&self) -> bool {
        self.missing_required.is_empty() && self.unresolved_images == 0
    }
}

/// Readiness classifier
pub struct ReadinessClassifier<'a> {
    layout: &'a ColumnLayout,
}

impl<'a> ReadinessClassifier<'a> {
    pub fn new(layout: &'a ColumnLayout) -> Self {
        Self { layout }
    }

    /// Classify a row given its resolved images
    ///
    /// Does not modify the row.
    pub fn classify(
        &self,
        row: &RowRecord,
        resolutions: &[(ImageRole, ImageResolution)],
    ) -> ReadinessVerdict {
        let missing_required = self
            .layout
            .required_columns()
            .iter()
            .filter(|column| row.get(column).is_empty())
            .map(|column| column.to_string())
            .collect();

        let unresolved_images = resolutions
            .iter()
            .filter(|(role, resolution)| resolution.counts_as_missing(*role))
            .count();

        ReadinessVerdict {
            missing_required,
            unresolved_images,
        }
    }
}
