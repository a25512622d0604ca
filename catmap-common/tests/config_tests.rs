//! Tests for configuration loading and layered resolution
//!
//! Covers:
//! - Missing or malformed TOML files fall back to defaults
//! - Priority order CLI → ENV → TOML → compiled default
//!
//! Note: Tests that set or clear CATMAP_* variables are marked #[serial]
//! so they never observe each other's environment.

use catmap_common::config::{
    load_toml_config, parse_toml_config, ResolvedPaths, TomlConfig, DEFAULT_IMAGE_DIR,
    DEFAULT_INPUT_GLOB, DEFAULT_OUTPUT_DIR, ENV_IMAGE_DIR, ENV_INPUT_GLOB, ENV_OUTPUT_DIR,
};
use catmap_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// Log sink shared between a test and its subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn clear_env() {
    env::remove_var(ENV_INPUT_GLOB);
    env::remove_var(ENV_IMAGE_DIR);
    env::remove_var(ENV_OUTPUT_DIR);
}

#[test]
fn test_missing_explicit_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let loaded = load_toml_config(Some(temp_dir.path().join("absent.toml").as_path()));

    assert_eq!(loaded.config, TomlConfig::default());
    assert_eq!(loaded.source, None);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].starts_with("Config file not found"));
}

#[test]
fn test_malformed_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catmap.toml");
    fs::write(&path, "input_glob = [unterminated").unwrap();

    assert!(matches!(parse_toml_config(&path), Err(Error::Config(_))));
    let loaded = load_toml_config(Some(path.as_path()));
    assert_eq!(loaded.config, TomlConfig::default());
    assert_eq!(loaded.source, None);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("Parse TOML failed"));
    assert!(loaded.warnings[0].ends_with("Using defaults."));
}

#[test]
fn test_malformed_file_warning_reaches_subscriber() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catmap.toml");
    fs::write(&path, "input_glob = [unterminated").unwrap();
    let loaded = load_toml_config(Some(path.as_path()));

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, || loaded.report());

    let output = logs.contents();
    assert!(output.contains("WARN"), "got: {}", output);
    assert!(output.contains("Parse TOML failed"), "got: {}", output);
    assert!(output.contains("Using defaults."), "got: {}", output);
}

#[test]
fn test_valid_file_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catmap.toml");
    fs::write(
        &path,
        r#"
input_glob = "exports/*.csv"
output_dir = "reports"
code_prefix = "EXPO-"

[logging]
level = "debug"

[columns]
custom_code = "Code"
image_detail = "Detail"
"#,
    )
    .unwrap();

    let loaded = load_toml_config(Some(path.as_path()));
    let config = &loaded.config;

    assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
    assert!(loaded.warnings.is_empty());
    assert_eq!(config.input_glob.as_deref(), Some("exports/*.csv"));
    assert_eq!(config.output_dir, Some(PathBuf::from("reports")));
    assert_eq!(config.image_dir, None);
    assert_eq!(config.code_prefix(), "EXPO-");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.columns.custom_code, "Code");
    assert_eq!(config.columns.image_detail, "Detail");
    assert_eq!(config.columns.price, "판매가");
}

#[test]
#[serial]
fn test_resolve_with_no_overrides_uses_defaults() {
    clear_env();

    let paths = ResolvedPaths::resolve(None, None, None, &TomlConfig::default());

    assert_eq!(paths.input_glob, DEFAULT_INPUT_GLOB);
    assert_eq!(paths.image_dir, PathBuf::from(DEFAULT_IMAGE_DIR));
    assert_eq!(paths.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    env::set_var(ENV_IMAGE_DIR, "/env/images");

    let toml = TomlConfig {
        image_dir: Some(PathBuf::from("toml/images")),
        output_dir: Some(PathBuf::from("toml/out")),
        ..TomlConfig::default()
    };
    let paths = ResolvedPaths::resolve(None, None, None, &toml);

    assert_eq!(paths.image_dir, PathBuf::from("/env/images"));
    assert_eq!(paths.output_dir, PathBuf::from("toml/out"));

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_INPUT_GLOB, "env/*.csv");
    env::set_var(ENV_OUTPUT_DIR, "env/out");

    let paths = ResolvedPaths::resolve(
        Some("cli/*.csv"),
        None,
        Some(Path::new("cli/out")),
        &TomlConfig::default(),
    );

    assert_eq!(paths.input_glob, "cli/*.csv");
    assert_eq!(paths.output_dir, PathBuf::from("cli/out"));
    assert_eq!(paths.image_dir, PathBuf::from(DEFAULT_IMAGE_DIR));

    clear_env();
}

#[test]
#[serial]
fn test_blank_env_value_is_ignored() {
    clear_env();
    env::set_var(ENV_OUTPUT_DIR, "   ");

    let toml = TomlConfig {
        output_dir: Some(PathBuf::from("toml/out")),
        ..TomlConfig::default()
    };
    let paths = ResolvedPaths::resolve(None, None, None, &toml);

    assert_eq!(paths.output_dir, PathBuf::from("toml/out"));

    clear_env();
}
