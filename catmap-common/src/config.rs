//! Configuration loading and layered path resolution
//!
//! Every setting follows the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default glob selecting the bulk-upload exports
pub const DEFAULT_INPUT_GLOB: &str = "docs/cafe24-products-*.csv";
/// Default directory holding artwork images
pub const DEFAULT_IMAGE_DIR: &str = "public/images/artworks";
/// Default directory receiving the generated reports
pub const DEFAULT_OUTPUT_DIR: &str = "docs/cafe24-mapping";
/// Default custom code prefix in front of the numeric artwork id
pub const DEFAULT_CODE_PREFIX: &str = "SAF2026-";

pub const ENV_INPUT_GLOB: &str = "CATMAP_INPUT_GLOB";
pub const ENV_IMAGE_DIR: &str = "CATMAP_IMAGE_DIR";
pub const ENV_OUTPUT_DIR: &str = "CATMAP_OUTPUT_DIR";

/// Config file looked up in the working directory when none is given
pub const LOCAL_CONFIG_FILE: &str = "catmap.toml";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Column names of the bulk-upload export
///
/// Defaults match the Cafe24 product export headers. Any subset can be
/// overridden from the `[columns]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub custom_code: String,
    pub product_name: String,
    pub description: String,
    pub price: String,
    pub tax_type: String,
    pub price_replacement_enabled: String,
    pub price_replacement_text: String,
    pub image_detail: String,
    pub image_list: String,
    pub image_tiny: String,
    pub image_small: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            custom_code: "자체 상품코드".to_string(),
            product_name: "상품명".to_string(),
            description: "상품 상세설명".to_string(),
            price: "판매가".to_string(),
            tax_type: "과세구분".to_string(),
            price_replacement_enabled: "판매가 대체문구 사용".to_string(),
            price_replacement_text: "판매가 대체문구".to_string(),
            image_detail: "이미지등록(상세)".to_string(),
            image_list: "이미지등록(목록)".to_string(),
            image_tiny: "이미지등록(작은목록)".to_string(),
            image_small: "이미지등록(축소)".to_string(),
        }
    }
}

impl ColumnLayout {
    /// Columns that must be non-empty for a row to be ready
    pub fn required_columns(&self) -> [&str; 5] {
        [
            &self.custom_code,
            &self.product_name,
            &self.description,
            &self.price,
            &self.tax_type,
        ]
    }
}

/// Contents of the TOML config file
///
/// All keys are optional; absent keys fall through to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input_glob: Option<String>,
    pub image_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub code_prefix: Option<String>,
    pub logging: LoggingConfig,
    pub columns: ColumnLayout,
}

impl TomlConfig {
    /// Code prefix from the file, or the compiled default
    pub fn code_prefix(&self) -> &str {
        self.code_prefix.as_deref().unwrap_or(DEFAULT_CODE_PREFIX)
    }
}

/// Parse a TOML config file, failing on I/O or syntax errors
pub fn parse_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Locate the config file to load, if any
///
/// An explicit path is returned as-is. Otherwise `./catmap.toml` is tried,
/// then `<config dir>/catmap/config.toml`.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|d| d.join("catmap").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Outcome of loading the config file
///
/// Loading happens before the tracing subscriber exists (the file decides the
/// log level), so diagnostics are collected here and emitted by [`report`].
///
/// [`report`]: LoadedConfig::report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// File the settings came from, if one was parsed
    pub source: Option<PathBuf>,
    /// Problems that made the loader fall back to defaults
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Log what was loaded and any fallback warnings
    pub fn report(&self) {
        match &self.source {
            Some(path) => info!("Loaded config from {}", path.display()),
            None if self.warnings.is_empty() => {
                debug!("No config file found, using compiled defaults")
            }
            None => {}
        }
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

/// Load configuration with graceful degradation
///
/// A missing file yields defaults. An unreadable or malformed file records a
/// warning and also yields defaults; configuration problems never abort a run.
pub fn load_toml_config(explicit: Option<&Path>) -> LoadedConfig {
    let Some(path) = locate_config_file(explicit) else {
        return LoadedConfig::default();
    };

    if !path.exists() {
        return LoadedConfig {
            warnings: vec![format!("Config file not found: {}. Using defaults.", path.display())],
            ..LoadedConfig::default()
        };
    }

    match parse_toml_config(&path) {
        Ok(config) => LoadedConfig {
            config,
            source: Some(path),
            warnings: Vec::new(),
        },
        Err(e) => LoadedConfig {
            warnings: vec![format!("{}. Using defaults.", e)],
            ..LoadedConfig::default()
        },
    }
}

/// Resolve one setting through CLI → ENV → TOML → default
pub fn resolve_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
    default: &str,
) -> String {
    if let Some(value) = cli_arg {
        return value.to_string();
    }

    if let Ok(value) = std::env::var(env_var_name) {
        if !value.trim().is_empty() {
            return value;
        }
    }

    if let Some(value) = toml_value {
        return value.to_string();
    }

    default.to_string()
}

/// Input and output locations of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub input_glob: String,
    pub image_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Resolve one path setting through CLI → ENV → TOML → default
///
/// Paths are never round-tripped through `str`, so non-UTF-8 values survive.
pub fn resolve_path_setting(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
    default: &str,
) -> PathBuf {
    if let Some(value) = cli_arg {
        return value.to_path_buf();
    }

    if let Some(value) = std::env::var_os(env_var_name) {
        if !value.to_string_lossy().trim().is_empty() {
            return PathBuf::from(value);
        }
    }

    if let Some(value) = toml_value {
        return value.to_path_buf();
    }

    PathBuf::from(default)
}

impl ResolvedPaths {
    /// Resolve all three locations with the standard priority order
    pub fn resolve(
        cli_input_glob: Option<&str>,
        cli_image_dir: Option<&Path>,
        cli_output_dir: Option<&Path>,
        toml: &TomlConfig,
    ) -> Self {
        Self {
            input_glob: resolve_setting(
                cli_input_glob,
                ENV_INPUT_GLOB,
                toml.input_glob.as_deref(),
                DEFAULT_INPUT_GLOB,
            ),
            image_dir: resolve_path_setting(
                cli_image_dir,
                ENV_IMAGE_DIR,
                toml.image_dir.as_deref(),
                DEFAULT_IMAGE_DIR,
            ),
            output_dir: resolve_path_setting(
                cli_output_dir,
                ENV_OUTPUT_DIR,
                toml.output_dir.as_deref(),
                DEFAULT_OUTPUT_DIR,
            ),
        }
    }
}
