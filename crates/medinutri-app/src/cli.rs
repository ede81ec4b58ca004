//! CLI argument definitions for the MediNutri server.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use medinutri_core::config::MediNutriConfig;

const CONFIG_ENV: &str = "MEDINUTRI_CONFIG";
const PORT_ENV: &str = "MEDINUTRI_PORT";
const DATA_DIR_ENV: &str = "MEDINUTRI_DATA_DIR";
const DEFAULT_CONFIG_FILE: &str = "medinutri.toml";

/// MediNutri - food, drug, and herb interaction advisor with a streaming chat API.
#[derive(Parser, Debug, Default)]
#[command(name = "medinutri", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Directory holding the dataset CSV files and knowledge base.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > MEDINUTRI_CONFIG env var > ./medinutri.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > MEDINUTRI_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        std::env::var(PORT_ENV)
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
            .unwrap_or(config_port)
    }

    /// Resolve the data directory.
    ///
    /// Priority: --data-dir flag > MEDINUTRI_DATA_DIR env var > config file value.
    pub fn resolve_data_dir(&self, config_dir: &str) -> String {
        if let Some(ref p) = self.data_dir {
            return p.to_string_lossy().to_string();
        }
        std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| config_dir.to_string())
    }

    /// Apply every override to a loaded configuration.
    pub fn apply(&self, config: &mut MediNutriConfig) {
        config.general.port = self.resolve_port(config.general.port);
        config.data.data_dir = self.resolve_data_dir(&config.data.data_dir);
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}
