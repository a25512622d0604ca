//! Image reference resolution
//!
//! Maps a row's image reference onto a file in the [`AssetInventory`] with a
//! fixed fallback order. Each call is independent and side-effect free.

use super::asset_inventory::{compare_by_preference, extension_of, stem_of, AssetInventory};
use crate::models::{ImageResolution, ResolutionReason};

/// Image resolver over one inventory snapshot
pub struct ImageResolver<'a> {
    inventory: &'a AssetInventory,
}

impl<'a> ImageResolver<'a> {
    pub fn new(inventory: &'a AssetInventory) -> Self {
        Self { inventory }
    }

    /// Resolve one reference
    ///
    /// **Fallback order (first match wins):**
    /// 1. Empty reference, fallback stem has candidates → `empty_reference_stem_fallback`
    /// 2. Empty reference → `empty`
    /// 3. Case-insensitive full filename match → `exact`
    /// 4. Same stem, any extension (reference's own extension preferred) → `extension_fallback`
    /// 5. Nothing → `not_found`
    pub fn resolve(&self, reference: &str, fallback_stem: Option<&str>) -> ImageResolution {
        let reference = reference.trim();
        let fallback_stem = fallback_stem
            .map(|stem| stem.trim().to_lowercase())
            .filter(|stem| !stem.is_empty());

        if reference.is_empty() {
            return match fallback_stem.and_then(|stem| self.best_candidate(&stem, "")) {
                Some(filename) => ImageResolution::resolved(
                    reference,
                    filename,
                    self.inventory.path_for(filename),
                    true,
                    ResolutionReason::EmptyReferenceStemFallback,
                ),
                None => ImageResolution::unresolved(reference, ResolutionReason::Empty),
            };
        }

        if let Some(filename) = self.inventory.exact(reference) {
            return ImageResolution::resolved(
                reference,
                filename,
                self.inventory.path_for(filename),
                false,
                ResolutionReason::Exact,
            );
        }

        let preferred = extension_of(reference);
        if let Some(filename) = self.best_candidate(&stem_of(reference), &preferred) {
            return ImageResolution::resolved(
                reference,
                filename,
                self.inventory.path_for(filename),
                true,
                ResolutionReason::ExtensionFallback,
            );
        }

        ImageResolution::unresolved(reference, ResolutionReason::NotFound)
    }

    /// First candidate for `stem` under the given extension preference
    fn best_candidate(&self, stem: &str, preferred: &str) -> Option<&'a str> {
        self.inventory
            .candidates(stem)
            .iter()
            .min_by(|a, b| compare_by_preference(a, b, preferred))
            .map(String::as_str)
    }
}
