//! # catmap Common Library
//!
//! Shared code for the catalog mapping tools including:
//! - Error types
//! - TOML configuration loading and layered resolution
//! - Column layout of the bulk-upload exports

pub mod config;
pub mod error;

pub use config::{ColumnLayout, LoadedConfig, LoggingConfig, ResolvedPaths, TomlConfig};
pub use error::{Error, Result};
