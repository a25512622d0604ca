//! catmap-builder - Catalog Mapping Builder
//!
//! Merges storefront bulk-upload CSV exports, resolves every product's image
//! references against a local image directory and writes the mapping reports.
//!
//! Settings resolve CLI → ENV → TOML → compiled default.

use anyhow::{Context, Result};
use catmap_builder::workflow::{MappingPipeline, PipelineConfig};
use catmap_common::config::load_toml_config;
use catmap_common::ResolvedPaths;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "catmap-builder")]
#[command(about = "Build the initial product/image mapping from storefront CSV exports")]
#[command(version)]
struct Args {
    /// Glob selecting the CSV exports
    #[arg(long)]
    input_glob: Option<String>,

    /// Directory holding the artwork images
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Directory receiving the reports
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "CATMAP_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let loaded = load_toml_config(args.config.as_deref());
    let toml_config = &loaded.config;

    // Initialize tracing (RUST_LOG wins over the config file)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting catmap-builder v{}", env!("CARGO_PKG_VERSION"));
    loaded.report();

    let paths = ResolvedPaths::resolve(
        args.input_glob.as_deref(),
        args.image_dir.as_deref(),
        args.output_dir.as_deref(),
        toml_config,
    );
    info!("Input glob: {}", paths.input_glob);
    info!("Image dir: {}", paths.image_dir.display());
    info!("Output dir: {}", paths.output_dir.display());

    let config = PipelineConfig {
        paths,
        layout: toml_config.columns.clone(),
        code_prefix: toml_config.code_prefix().to_string(),
    };

    let pipeline = MappingPipeline::new(config).context("Failed to set up mapping pipeline")?;
    let outcome = pipeline.run().context("Mapping build failed")?;

    for line in &outcome.console_lines {
        println!("{}", line);
    }

    Ok(())
}
