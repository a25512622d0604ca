//! Image roles and resolution records

use catmap_common::ColumnLayout;
use std::fmt;

/// Image slots of a product row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    Detail,
    List,
    Tiny,
    Small,
}

impl ImageRole {
    /// All roles in report order
    pub const ALL: [ImageRole; 4] = [
        ImageRole::Detail,
        ImageRole::List,
        ImageRole::Tiny,
        ImageRole::Small,
    ];

    /// Short name used in report columns
    pub fn alias(self) -> &'static str {
        match self {
            ImageRole::Detail => "detail",
            ImageRole::List => "list",
            ImageRole::Tiny => "tiny",
            ImageRole::Small => "small",
        }
    }

    /// Source column holding this role's image reference
    pub fn column(self, layout: &ColumnLayout) -> &str {
        match self {
            ImageRole::Detail => &layout.image_detail,
            ImageRole::List => &layout.image_list,
            ImageRole::Tiny => &layout.image_tiny,
            ImageRole::Small => &layout.image_small,
        }
    }

    /// Whether an unresolved image counts against readiness even when the
    /// row gave no reference for it. Only the detail image is mandatory.
    pub fn is_mandatory(self) -> bool {
        matches!(self, ImageRole::Detail)
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// Why a reference resolved (or did not)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionReason {
    Exact,
    ExtensionFallback,
    EmptyReferenceStemFallback,
    NotFound,
    Empty,
}

impl ResolutionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionReason::Exact => "exact",
            ResolutionReason::ExtensionFallback => "extension_fallback",
            ResolutionReason::EmptyReferenceStemFallback => "empty_reference_stem_fallback",
            ResolutionReason::NotFound => "not_found",
            ResolutionReason::Empty => "empty",
        }
    }
}

impl fmt::Display for ResolutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolution {
    /// Reference as written in the row (trimmed; empty if none)
    pub reference: String,
    /// Actual filename in the image directory, empty if unresolved
    pub resolved_filename: String,
    /// Image directory joined with the filename, forward slashes
    pub resolved_path: String,
    pub exists: bool,
    pub used_fallback: bool,
    pub reason: ResolutionReason,
}

impl ImageResolution {
    pub(crate) fn resolved(
        reference: &str,
        filename: &str,
        path: String,
        used_fallback: bool,
        reason: ResolutionReason,
    ) -> Self {
        Self {
            reference: reference.to_string(),
            resolved_filename: filename.to_string(),
            resolved_path: path,
            exists: true,
            used_fallback,
            reason,
        }
    }

    pub(crate) fn unresolved(reference: &str, reason: ResolutionReason) -> Self {
        Self {
            reference: reference.to_string(),
            resolved_filename: String::new(),
            resolved_path: String::new(),
            exists: false,
            used_fallback: false,
            reason,
        }
    }

    /// Whether this outcome counts as a missing image for `role`
    ///
    /// A mandatory role counts whenever it is unresolved. Other roles count
    /// only when a non-empty reference failed to resolve.
    pub fn counts_as_missing(&self, role: ImageRole) -> bool {
        !self.exists && (role.is_mandatory() || !self.reference.is_empty())
    }
}
