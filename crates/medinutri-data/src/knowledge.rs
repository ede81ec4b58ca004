//! Curated health-tip knowledge base.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DataError;

/// One knowledge-base entry: a category, trigger keywords, and the advice text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub answer: String,
}

impl KnowledgeEntry {
    /// Number of this entry's keywords contained in an already lower-cased text.
    pub fn score(&self, text_lower: &str) -> usize {
        self.keywords
            .iter()
            .filter(|k| text_lower.contains(&k.to_lowercase()))
            .count()
    }
}

/// Read-only list of knowledge entries.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            return Err(DataError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load the knowledge base, falling back to an empty one on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(kb) => {
                info!(entries = kb.len(), path = %path.display(), "Knowledge base loaded");
                kb
            }
            Err(DataError::NotFound(p)) => {
                warn!(path = %p, "Knowledge base file not found");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load knowledge base");
                Self::default()
            }
        }
    }

    /// Entry with the most keyword hits in `text`, with its score.
    ///
    /// Ties keep the earliest entry. Entries scoring zero never match.
    pub fn best_match(&self, text: &str) -> Option<(&KnowledgeEntry, usize)> {
        let lower = text.to_lowercase();
        let mut best: Option<(&KnowledgeEntry, usize)> = None;
        for entry in &self.entries {
            let score = entry.score(&lower);
            if score > best.map(|(_, s)| s).unwrap_or(0) {
                best = Some((entry, score));
            }
        }
        best
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
