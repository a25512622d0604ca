//! Report emission
//!
//! Writes the five CSV reports and `summary.json` into the output directory.
//! CSV files are UTF-8 with a BOM and every field quoted, so spreadsheet
//! tools open them without an import dialog. Writes are independent; there
//! is no multi-file commit.

use crate::models::{DuplicateDiagnostic, ImageRole, ProcessedRow};
use crate::workflow::statistics::RunSummary;
use catmap_common::{ColumnLayout, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const MASTER_FILE: &str = "master-products.csv";
pub const MAPPING_FILE: &str = "initial-mapping.csv";
pub const MANIFEST_FILE: &str = "image-manifest.csv";
pub const MISSING_FILE: &str = "missing-images.csv";
pub const DUPLICATES_FILE: &str = "duplicate-codes.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Placeholder written for an empty reference in the missing-images report
pub const EMPTY_REFERENCE: &str = "<empty>";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Derived columns appended to the master table after the source header
const MASTER_DERIVED_COLUMNS: [&str; 6] = [
    "_source_file",
    "_source_line",
    "_artwork_numeric_id",
    "_missing_required_columns",
    "_unresolved_image_count",
    "_ready_for_api",
];

const MAPPING_COLUMNS: [&str; 14] = [
    "custom_product_code",
    "artwork_numeric_id",
    "product_name",
    "tax_type",
    "price",
    "price_replacement_enabled",
    "price_replacement_text",
    "source_file",
    "source_line",
    "detail_image_reference",
    "detail_image_resolved",
    "missing_required_columns",
    "unresolved_image_count",
    "ready_for_api",
];

const MANIFEST_COLUMNS: [&str; 12] = [
    "custom_product_code",
    "artwork_numeric_id",
    "source_file",
    "source_line",
    "image_type",
    "image_column",
    "image_reference",
    "resolved_image_filename",
    "resolved_image_path",
    "exists",
    "used_fallback",
    "reason",
];

const MISSING_COLUMNS: [&str; 8] = [
    "custom_product_code",
    "artwork_numeric_id",
    "image_type",
    "image_column",
    "image_reference",
    "source_file",
    "source_line",
    "reason",
];

const DUPLICATE_COLUMNS: [&str; 5] = [
    "custom_product_code",
    "kept_source_file",
    "kept_source_line",
    "replaced_source_file",
    "replaced_source_line",
];

/// Render a flag the way downstream sheets expect
fn flag(value: bool) -> &'static str {
    if value {
        "Y"
    } else {
        "N"
    }
}

/// Paths of everything written by one run
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub master: PathBuf,
    pub mapping: PathBuf,
    pub manifest: PathBuf,
    pub missing: PathBuf,
    pub duplicates: PathBuf,
    pub summary: PathBuf,
}

/// Report writer
pub struct ReportWriter<'a> {
    output_dir: PathBuf,
    layout: &'a ColumnLayout,
}

impl<'a> ReportWriter<'a> {
    /// Create a writer, creating the output directory if absent
    pub fn create(output_dir: &Path, layout: &'a ColumnLayout) -> Result<Self> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            layout,
        })
    }

    /// Write every report
    pub fn write_all(
        &self,
        header: &[String],
        rows: &[ProcessedRow],
        duplicates: &[DuplicateDiagnostic],
        summary: &RunSummary,
    ) -> Result<ReportFiles> {
        let files = ReportFiles {
            master: self.write_master(header, rows)?,
            mapping: self.write_mapping(rows)?,
            manifest: self.write_manifest(rows)?,
            missing: self.write_missing(rows)?,
            duplicates: self.write_duplicates(duplicates)?,
            summary: self.write_summary(summary)?,
        };

        tracing::info!(dir = %self.output_dir.display(), "Reports written");
        Ok(files)
    }

    /// Master table: source header, then derived diagnostics and resolutions
    pub fn write_master(&self, header: &[String], rows: &[ProcessedRow]) -> Result<PathBuf> {
        let mut columns: Vec<String> = header.to_vec();
        columns.extend(MASTER_DERIVED_COLUMNS.iter().map(|c| c.to_string()));
        for suffix in ["resolved", "exists", "used_fallback"] {
            columns.extend(
                ImageRole::ALL
                    .iter()
                    .map(|role| format!("_image_{}_{}", role.alias(), suffix)),
            );
        }

        let path = self.output_dir.join(MASTER_FILE);
        let mut writer = create_csv(&path, &columns)?;

        for processed in rows {
            let row = &processed.row;
            let mut record: Vec<String> = header.iter().map(|c| row.get(c).to_string()).collect();
            record.push(row.provenance().source_file.clone());
            record.push(row.provenance().source_line.to_string());
            record.push(processed.numeric_id.clone());
            record.push(processed.verdict.missing_required.join(","));
            record.push(processed.verdict.unresolved_images.to_string());
            record.push(flag(processed.verdict.is_ready()).to_string());

            for (_, resolution) in &processed.resolutions {
                record.push(resolution.resolved_filename.clone());
            }
            for (_, resolution) in &processed.resolutions {
                record.push(flag(resolution.exists).to_string());
            }
            for (_, resolution) in &processed.resolutions {
                record.push(flag(resolution.used_fallback).to_string());
            }

            writer.write_record(&record)?;
        }

        writer.flush()?;
        tracing::debug!("Wrote {} master rows", rows.len());
        Ok(path)
    }

    /// Slim mapping table for downstream sync jobs
    pub fn write_mapping(&self, rows: &[ProcessedRow]) -> Result<PathBuf> {
        let path = self.output_dir.join(MAPPING_FILE);
        let mut writer = create_csv(&path, &MAPPING_COLUMNS)?;
        let layout = self.layout;

        for processed in rows {
            let row = &processed.row;
            let detail_resolved = processed
                .resolution(ImageRole::Detail)
                .map(|r| r.resolved_filename.as_str())
                .unwrap_or("");
            let source_line = row.provenance().source_line.to_string();
            let missing_required = processed.verdict.missing_required.join(",");
            let unresolved = processed.verdict.unresolved_images.to_string();

            writer.write_record([
                row.key(),
                processed.numeric_id.as_str(),
                row.get(&layout.product_name),
                row.get(&layout.tax_type),
                row.get(&layout.price),
                row.get(&layout.price_replacement_enabled),
                row.get(&layout.price_replacement_text),
                row.provenance().source_file.as_str(),
                source_line.as_str(),
                row.get(ImageRole::Detail.column(layout)),
                detail_resolved,
                missing_required.as_str(),
                unresolved.as_str(),
                flag(processed.verdict.is_ready()),
            ])?;
        }

        writer.flush()?;
        Ok(path)
    }

    /// Image manifest: one row per (row, role)
    pub fn write_manifest(&self, rows: &[ProcessedRow]) -> Result<PathBuf> {
        let path = self.output_dir.join(MANIFEST_FILE);
        let mut writer = create_csv(&path, &MANIFEST_COLUMNS)?;

        for processed in rows {
            let row = &processed.row;
            let source_line = row.provenance().source_line.to_string();
            for (role, resolution) in &processed.resolutions {
                writer.write_record([
                    row.key(),
                    processed.numeric_id.as_str(),
                    row.provenance().source_file.as_str(),
                    source_line.as_str(),
                    role.alias(),
                    role.column(self.layout),
                    resolution.reference.as_str(),
                    resolution.resolved_filename.as_str(),
                    resolution.resolved_path.as_str(),
                    flag(resolution.exists),
                    flag(resolution.used_fallback),
                    resolution.reason.as_str(),
                ])?;
            }
        }

        writer.flush()?;
        Ok(path)
    }

    /// Manifest rows that count as missing under the mandatory-role rule
    pub fn write_missing(&self, rows: &[ProcessedRow]) -> Result<PathBuf> {
        let path = self.output_dir.join(MISSING_FILE);
        let mut writer = create_csv(&path, &MISSING_COLUMNS)?;

        for processed in rows {
            let row = &processed.row;
            let source_line = row.provenance().source_line.to_string();
            for (role, resolution) in &processed.resolutions {
                if !resolution.counts_as_missing(*role) {
                    continue;
                }
                let reference = if resolution.reference.is_empty() {
                    EMPTY_REFERENCE
                } else {
                    resolution.reference.as_str()
                };
                writer.write_record([
                    row.key(),
                    processed.numeric_id.as_str(),
                    role.alias(),
                    role.column(self.layout),
                    reference,
                    row.provenance().source_file.as_str(),
                    source_line.as_str(),
                    resolution.reason.as_str(),
                ])?;
            }
        }

        writer.flush()?;
        Ok(path)
    }

    /// Duplicate custom code diagnostics
    pub fn write_duplicates(&self, duplicates: &[DuplicateDiagnostic]) -> Result<PathBuf> {
        let path = self.output_dir.join(DUPLICATES_FILE);
        let mut writer = create_csv(&path, &DUPLICATE_COLUMNS)?;

        for duplicate in duplicates {
            writer.write_record([
                duplicate.key.clone(),
                duplicate.kept.source_file.clone(),
                duplicate.kept.source_line.to_string(),
                duplicate.replaced.source_file.clone(),
                duplicate.replaced.source_line.to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(path)
    }

    /// Pretty-printed run summary
    pub fn write_summary(&self, summary: &RunSummary) -> Result<PathBuf> {
        let path = self.output_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

/// Create a CSV file with a BOM, all fields quoted, and write its header
fn create_csv<S: AsRef<str>>(path: &Path, columns: &[S]) -> Result<csv::Writer<File>> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(file);
    writer.write_record(columns.iter().map(|c| c.as_ref()))?;
    Ok(writer)
}
