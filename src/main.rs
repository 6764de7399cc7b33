// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use endpoint_composer::{
    constants::{DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    endpoint::Endpoint,
    pipeline_errors::ConfigError,
    source::Source,
    sources::{load_yaml, EndpointManifest, FileSource},
    wrappers::{wrap_sources, WrapperConfig},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Compose endpoints from YAML manifests through the pipeline and print the result
#[derive(Debug, Parser)]
#[command(name = "endpoint-composer", version, about)]
struct Args {
    /// Pipeline configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Endpoint manifest, one discovery source per file
    #[arg(long = "endpoints", required = true)]
    endpoints: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("endpoint-composer")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(args))
}

fn init_tracing() {
    // RUST_LOG selects the level (default INFO), RUST_LOG_FORMAT=json switches to JSON output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());

    // Logs go to stderr so the composed endpoints are the only thing on stdout
    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn load_config(path: &Path) -> Result<WrapperConfig, ConfigError> {
    load_yaml(path).await
}

fn render(endpoints: Vec<Endpoint>, format: OutputFormat) -> Result<String> {
    let manifest = EndpointManifest { endpoints };
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(&manifest).context("failed to render endpoints as YAML")
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&manifest).context("failed to render endpoints as JSON")
        }
    }
}

async fn async_main(args: Args) -> Result<()> {
    init_tracing();

    info!("Starting endpoint composer");

    let config = match &args.config {
        Some(path) => {
            debug!("Loading pipeline configuration from {}", path.display());
            load_config(path).await?
        }
        None => WrapperConfig::default(),
    };

    let sources: Vec<Box<dyn Source>> = args
        .endpoints
        .iter()
        .map(|path| Box::new(FileSource::new(path)) as Box<dyn Source>)
        .collect();
    info!("Composing endpoints from {} sources", sources.len());

    let pipeline = wrap_sources(sources, &config)?;
    let endpoints = pipeline.endpoints().await?;
    info!("Composed {} endpoints", endpoints.len());

    println!("{}", render(endpoints, args.output)?);

    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod main_tests;
