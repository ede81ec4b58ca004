//! MediNutri server binary.
//!
//! Composition root: parses the CLI, loads configuration, installs logging,
//! loads every dataset once, and serves the HTTP API over the shared index.

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use medinutri_api::{start_server, AppState};
use medinutri_core::config::MediNutriConfig;
use medinutri_core::error::MediNutriError;
use medinutri_data::{DatasetIndex, KnowledgeBase};

use crate::cli::CliArgs;

/// Read the config file if present.
///
/// A missing file means defaults. A broken file also falls back to defaults;
/// the error is handed back so it can be logged once tracing is up.
fn load_config(path: &Path) -> (MediNutriConfig, Option<MediNutriError>) {
    if !path.exists() {
        return (MediNutriConfig::default(), None);
    }
    match MediNutriConfig::load(path) {
        Ok(config) => (config, None),
        Err(e) => (MediNutriConfig::default(), Some(e)),
    }
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let (mut config, config_error) = load_config(&config_file);
    args.apply(&mut config);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.general.log_level))
        .init();

    tracing::info!("Starting MediNutri v{}", env!("CARGO_PKG_VERSION"));
    match config_error {
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
        None => tracing::info!(path = %config_file.display(), "Configuration resolved"),
    }
    config.validate()?;

    // Datasets.
    let index = Arc::new(DatasetIndex::load(&config.data));
    let stats = index.stats();
    if index.is_empty() {
        tracing::warn!(
            data_dir = %config.data.data_dir,
            "No datasets loaded; answers will fall back to generic text"
        );
    } else {
        tracing::info!(
            foods = stats.foods,
            medicines = stats.medicines,
            herbs = stats.herbs,
            diseases = stats.diseases,
            interactions = stats.interactions,
            side_effects = stats.side_effects,
            "Datasets ready"
        );
    }
    let knowledge = Arc::new(KnowledgeBase::load_or_empty(
        &config.data.knowledge_base_path(),
    ));

    // === API server ===

    let state = AppState::new(config.clone(), index, knowledge);
    if let Err(e) = start_server(&config, state).await {
        tracing::error!(
            port = config.general.port,
            error = %e,
            "Server stopped, is another instance running?"
        );
        return Err(e.into());
    }

    Ok(())
}
