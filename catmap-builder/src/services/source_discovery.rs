//! Source discovery
//!
//! Resolves the input glob to the ordered list of CSV exports to merge. The
//! order decides which duplicate wins, so it is always sorted by path.

use catmap_common::{Error, Result};
use std::path::PathBuf;

/// Resolve `pattern` to existing regular files, sorted by path
///
/// Fails with [`Error::NoSourcesFound`] when nothing matches. An invalid
/// pattern matches nothing and therefore fails the same way.
pub fn discover_sources(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = match glob::glob(pattern) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Invalid input pattern {:?}: {}", pattern, e);
            return Err(Error::NoSourcesFound {
                pattern: pattern.to_string(),
            });
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(path) => {
                tracing::debug!("Skipping non-file match: {}", path.display());
            }
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
            }
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(Error::NoSourcesFound {
            pattern: pattern.to_string(),
        });
    }

    tracing::debug!("Discovered {} source files for {}", paths.len(), pattern);
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sources_sorted_by_path() {
        let dir = TempDir::new().unwrap();
        for name in ["products-b.csv", "products-a.csv", "products-c.csv"] {
            fs::write(dir.path().join(name), "code\n").unwrap();
        }
        fs::write(dir.path().join("other.csv"), "code\n").unwrap();

        let pattern = format!("{}/products-*.csv", dir.path().display());
        let paths = discover_sources(&pattern).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["products-a.csv", "products-b.csv", "products-c.csv"]);
    }

    #[test]
    fn test_directories_are_not_sources() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("products-dir.csv")).unwrap();
        fs::write(dir.path().join("products-1.csv"), "code\n").unwrap();

        let pattern = format!("{}/products-*.csv", dir.path().display());
        let paths = discover_sources(&pattern).unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_no_match_is_fatal() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.csv", dir.path().display());

        match discover_sources(&pattern) {
            Err(Error::NoSourcesFound { pattern: p }) => assert_eq!(p, pattern),
            other => panic!("Expected NoSourcesFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_pattern_is_no_sources() {
        assert!(matches!(
            discover_sources("docs/[unclosed"),
            Err(Error::NoSourcesFound { .. })
        ));
    }
}
