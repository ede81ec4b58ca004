use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MediNutriError, Result};
use crate::types::EntityKind;

/// Top-level configuration for the MediNutri service.
///
/// Loaded from `medinutri.toml` by default. Every section falls back to its
/// defaults when omitted, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediNutriConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl MediNutriConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MediNutriConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MediNutriError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values that would make matching or streaming degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.matching.match_limit == 0 {
            return Err(MediNutriError::Config(
                "matching.match_limit must be at least 1".to_string(),
            ));
        }
        if self.matching.interaction_limit == 0 {
            return Err(MediNutriError::Config(
                "matching.interaction_limit must be at least 1".to_string(),
            ));
        }
        if self.stream.entity_chunk_words == 0 || self.stream.advisor_chunk_words == 0 {
            return Err(MediNutriError::Config(
                "stream chunk sizes must be at least 1 word".to_string(),
            ));
        }
        if self.chat.max_message_length == 0 {
            return Err(MediNutriError::Config(
                "chat.max_message_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// HTTP port.
    pub port: u16,
    /// Address the HTTP server binds to.
    pub bind_address: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            port: 8000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Location of the tabular sources loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding every dataset file.
    pub data_dir: String,
    pub food_file: String,
    pub medicine_file: String,
    pub disease_file: String,
    pub herb_file: String,
    pub interaction_file: String,
    pub side_effect_file: String,
    pub knowledge_base_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            food_file: "Food Information.csv".to_string(),
            medicine_file: "Drug Information.csv".to_string(),
            disease_file: "Disease Information.csv".to_string(),
            herb_file: "Herb Information.csv".to_string(),
            interaction_file: "Interaction Information.csv".to_string(),
            side_effect_file: "Drug Side Effects.csv".to_string(),
            knowledge_base_file: "knowledge_base.json".to_string(),
        }
    }
}

impl DataConfig {
    /// File name configured for a dataset kind.
    pub fn file_for(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Food => &self.food_file,
            EntityKind::Medicine => &self.medicine_file,
            EntityKind::Disease => &self.disease_file,
            EntityKind::Herb => &self.herb_file,
            EntityKind::Interaction => &self.interaction_file,
            EntityKind::SideEffect => &self.side_effect_file,
        }
    }

    /// Full path of the dataset file for a kind.
    pub fn path_for(&self, kind: EntityKind) -> PathBuf {
        Path::new(&self.data_dir).join(self.file_for(kind))
    }

    pub fn knowledge_base_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.knowledge_base_file)
    }
}

/// Caps and thresholds for entity matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Maximum rows returned per kind for one query.
    pub match_limit: usize,
    /// Maximum rows returned by a targeted interaction lookup.
    pub interaction_limit: usize,
    /// Queries shorter than this never search.
    pub min_query_len: usize,
    /// Remedy (reverse) lookups shorter than this never search.
    pub min_remedy_len: usize,
    /// Minimum query length before descriptive fields are searched.
    pub fallback_min_len: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            match_limit: 3,
            interaction_limit: 5,
            min_query_len: 2,
            min_remedy_len: 3,
            fallback_min_len: 4,
        }
    }
}

/// Chunking and pacing of streamed answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Words per frame for the entity-based engine.
    pub entity_chunk_words: usize,
    /// Delay between frames for the entity-based engine.
    pub entity_delay_ms: u64,
    /// Words per frame for the intent-driven advisor.
    pub advisor_chunk_words: usize,
    /// Delay between frames for the intent-driven advisor.
    pub advisor_delay_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            entity_chunk_words: 3,
            entity_delay_ms: 20,
            advisor_chunk_words: 1,
            advisor_delay_ms: 40,
        }
    }
}

/// Chat request limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Whether chat endpoints answer at all.
    pub enabled: bool,
    /// Maximum length of the current message in characters.
    pub max_message_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_message_length: 2000,
        }
    }
}
