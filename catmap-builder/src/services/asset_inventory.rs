//! Image asset inventory
//!
//! One snapshot of the image directory, indexed for case-insensitive lookup
//! by full filename and by stem. Built once per run and shared read-only by
//! every resolution.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions tried, in order, after the caller's preferred extension
pub const EXTENSION_PRIORITY: [&str; 6] = [".jpg", ".jpeg", ".png", ".webp", ".gif", ".bmp"];

/// Lowercased extension with its leading dot, or empty
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Lowercased filename without its extension
pub fn stem_of(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Rank of a filename's extension; lower is preferred
///
/// `preferred` (lowercase, with dot) ranks first when non-empty, then the
/// fixed priority list, then everything else.
fn extension_rank(filename: &str, preferred: &str) -> usize {
    let ext = extension_of(filename);
    if !preferred.is_empty() && ext == preferred {
        return 0;
    }
    EXTENSION_PRIORITY
        .iter()
        .position(|candidate| *candidate == ext)
        .map(|pos| pos + 1)
        .unwrap_or(EXTENSION_PRIORITY.len() + 1)
}

/// Order filenames by extension preference, then by lowercased name
pub fn compare_by_preference(a: &str, b: &str, preferred: &str) -> Ordering {
    extension_rank(a, preferred)
        .cmp(&extension_rank(b, preferred))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

/// Point-in-time index of an image directory
#[derive(Debug, Clone, Default)]
pub struct AssetInventory {
    image_dir: PathBuf,
    by_exact_name: HashMap<String, String>,
    by_stem: HashMap<String, Vec<String>>,
}

impl AssetInventory {
    /// Scan the regular files directly inside `image_dir`
    ///
    /// A missing directory yields an empty inventory rather than an error,
    /// so every reference then resolves as `not_found` or `empty`.
    pub fn scan(image_dir: &Path) -> Self {
        if !image_dir.is_dir() {
            tracing::warn!(
                "Image directory not found: {}. All images will be unresolved.",
                image_dir.display()
            );
            return Self::from_filenames(image_dir, Vec::new());
        }

        let mut filenames = Vec::new();
        let walker = WalkDir::new(image_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    // is_file() follows symlinks, so linked images count too
                    if entry.path().is_file() {
                        filenames.push(entry.file_name().to_string_lossy().to_string());
                    }
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }

        let inventory = Self::from_filenames(image_dir, filenames);
        tracing::info!(
            files = inventory.len(),
            dir = %image_dir.display(),
            "Image inventory built"
        );
        inventory
    }

    /// Build the indexes from a list of filenames
    ///
    /// When two names differ only in case, the first one in the list keeps
    /// the exact-name slot.
    pub fn from_filenames(
        image_dir: &Path,
        filenames: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut by_exact_name = HashMap::new();
        let mut by_stem: HashMap<String, Vec<String>> = HashMap::new();

        for filename in filenames {
            by_stem
                .entry(stem_of(&filename))
                .or_default()
                .push(filename.clone());
            by_exact_name
                .entry(filename.to_lowercase())
                .or_insert(filename);
        }

        for names in by_stem.values_mut() {
            names.sort_by(|a, b| compare_by_preference(a, b, ""));
        }

        Self {
            image_dir: image_dir.to_path_buf(),
            by_exact_name,
            by_stem,
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Actual filename for a case-insensitive full-name match
    pub fn exact(&self, filename: &str) -> Option<&str> {
        self.by_exact_name
            .get(&filename.to_lowercase())
            .map(String::as_str)
    }

    /// Files sharing a (case-insensitive) stem, in base preference order
    pub fn candidates(&self, stem: &str) -> &[String] {
        self.by_stem
            .get(&stem.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Path of an inventory file, rendered with forward slashes
    pub fn path_for(&self, filename: &str) -> String {
        self.image_dir
            .join(filename)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Number of distinct files indexed
    pub fn len(&self) -> usize {
        self.by_exact_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_exact_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn inventory(names: &[&str]) -> AssetInventory {
        AssetInventory::from_filenames(
            Path::new("images"),
            names.iter().map(|n| n.to_string()),
        )
    }

    #[test]
    fn test_extension_helpers() {
        assert_eq!(extension_of("7.JPG"), ".jpg");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(stem_of("Moon.Night.PNG"), "moon.night");
        assert_eq!(stem_of("noext"), "noext");
    }

    #[test]
    fn test_base_preference_order() {
        let inv = inventory(&["5.tiff", "5.png", "5.webp", "5.jpeg", "5.JPG", "5"]);
        assert_eq!(
            inv.candidates("5"),
            &["5.JPG", "5.jpeg", "5.png", "5.webp", "5", "5.tiff"]
        );
    }

    #[test]
    fn test_preferred_extension_ranks_first() {
        let mut names = vec!["9.jpg", "9.png", "9.tif"];
        names.sort_by(|a, b| compare_by_preference(a, b, ".png"));
        assert_eq!(names, vec!["9.png", "9.jpg", "9.tif"]);

        names.sort_by(|a, b| compare_by_preference(a, b, ".tif"));
        assert_eq!(names, vec!["9.tif", "9.jpg", "9.png"]);
    }

    #[test]
    fn test_lookups_case_insensitive() {
        let inv = inventory(&["Moon.JPG"]);
        assert_eq!(inv.exact("moon.jpg"), Some("Moon.JPG"));
        assert_eq!(inv.exact("MOON.JPG"), Some("Moon.JPG"));
        assert_eq!(inv.candidates("MOON"), &["Moon.JPG"]);
        assert_eq!(inv.exact("moon.png"), None);
        assert!(inv.candidates("sun").is_empty());
    }

    #[test]
    fn test_path_uses_forward_slashes() {
        let inv = inventory(&["1.jpg"]);
        assert_eq!(inv.path_for("1.jpg"), "images/1.jpg");
    }

    #[test]
    fn test_scan_directory_snapshot() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("1.jpg"), b"").unwrap();
        fs::write(dir.path().join("1.png"), b"").unwrap();
        fs::write(dir.path().join("2.webp"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("3.jpg"), b"").unwrap();

        let inv = AssetInventory::scan(dir.path());

        assert_eq!(inv.len(), 3);
        assert_eq!(inv.candidates("1"), &["1.jpg", "1.png"]);
        assert_eq!(inv.exact("2.WEBP"), Some("2.webp"));
        assert_eq!(inv.exact("3.jpg"), None);
        assert!(inv.candidates("nested").is_empty());
    }

    #[test]
    fn test_scan_missing_directory_is_empty() {
        let inv = AssetInventory::scan(Path::new("/nonexistent/images"));
        assert!(inv.is_empty());
        assert!(inv.candidates("1").is_empty());
    }
}
