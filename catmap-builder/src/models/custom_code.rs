//! Custom code parsing and output ordering
//!
//! Custom codes look like `<prefix><digits>` (for example `SAF2026-42`). The
//! digit run is the numeric artwork id, which drives both output order and
//! the image stem fallback.

use catmap_common::{Error, Result};
use regex::Regex;

/// Matcher for `<prefix><digits>` custom codes
#[derive(Debug, Clone)]
pub struct CodePattern {
    regex: Regex,
}

impl CodePattern {
    /// Build a matcher for the given literal prefix
    pub fn new(prefix: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^{}([0-9]+)$", regex::escape(prefix)))
            .map_err(|e| Error::InvalidInput(format!("Invalid code prefix {:?}: {}", prefix, e)))?;
        Ok(Self { regex })
    }

    /// Numeric artwork id with leading zeros removed
    ///
    /// Returns `None` when the code does not match the pattern.
    pub fn numeric_id(&self, custom_code: &str) -> Option<String> {
        let captures = self.regex.captures(custom_code.trim())?;
        let digits = captures.get(1)?.as_str().trim_start_matches('0');
        if digits.is_empty() {
            Some("0".to_string())
        } else {
            Some(digits.to_string())
        }
    }

    /// Sort key for a custom code
    pub fn sort_key(&self, custom_code: &str) -> SortKey {
        match self.numeric_id(custom_code) {
            Some(id) => SortKey::Numbered {
                id_len: id.len(),
                id,
                code: custom_code.to_string(),
            },
            None => SortKey::Unnumbered {
                code: custom_code.to_string(),
            },
        }
    }
}

/// Total order over custom codes
///
/// Numbered codes come first, ascending by numeric id and then by raw code.
/// Unnumbered codes follow in raw code order. Ids are compared by length then
/// digits, which equals numeric order for zero-stripped digit runs of any size.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Numbered {
        id_len: usize,
        id: String,
        code: String,
    },
    Unnumbered {
        code: String,
    },
}
