//! Read-only in-memory dataset index.
//!
//! Built once at startup from the configured sources and shared behind an
//! `Arc` by every request. No write operations exist after construction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use medinutri_core::config::DataConfig;
use medinutri_core::types::{severity_rank, EntityKind};

use crate::error::DataError;
use crate::loader::load_csv;
use crate::row::Row;
use crate::schema;

// =============================================================================
// InteractionEntry
// =============================================================================

/// An interaction row with its normalized names and keyword sets precomputed.
#[derive(Debug, Clone)]
pub struct InteractionEntry {
    pub row: Row,
    /// Lower-cased, trimmed drug name.
    pub drug_lower: String,
    /// Lower-cased, trimmed food/herb name.
    pub item_lower: String,
    /// Whitespace-separated words of the drug name.
    pub drug_keywords: HashSet<String>,
    /// Whitespace-separated words of the food/herb name.
    pub item_keywords: HashSet<String>,
}

impl InteractionEntry {
    pub fn from_row(row: Row) -> Self {
        let drug_lower = row.lower(schema::INTERACTION_DRUG).trim().to_string();
        let item_lower = row.lower(schema::INTERACTION_ITEM).trim().to_string();
        let drug_keywords = drug_lower.split_whitespace().map(str::to_string).collect();
        let item_keywords = item_lower.split_whitespace().map(str::to_string).collect();
        Self {
            row,
            drug_lower,
            item_lower,
            drug_keywords,
            item_keywords,
        }
    }

    pub fn drug_name(&self) -> &str {
        self.row.text(schema::INTERACTION_DRUG)
    }

    pub fn item_name(&self) -> &str {
        self.row.text(schema::INTERACTION_ITEM)
    }

    /// Raw severity label as stored.
    pub fn severity(&self) -> &str {
        self.row.text(schema::INTERACTION_SEVERITY).trim()
    }

    /// Sort rank of the severity (unknown labels rank last).
    pub fn severity_rank(&self) -> u8 {
        severity_rank(self.severity())
    }

    /// Explanation text, if any candidate description column is filled.
    pub fn description(&self) -> Option<&str> {
        self.row.first_of(schema::INTERACTION_DESCRIPTION)
    }
}

impl Serialize for InteractionEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.row.serialize(serializer)
    }
}

// =============================================================================
// DatasetIndex
// =============================================================================

/// Row counts per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub foods: usize,
    pub medicines: usize,
    pub herbs: usize,
    pub diseases: usize,
    pub interactions: usize,
    pub side_effects: usize,
    pub total_records: usize,
}

/// Immutable collections for every dataset kind.
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    food: Vec<Row>,
    medicine: Vec<Row>,
    herb: Vec<Row>,
    disease: Vec<Row>,
    interaction_rows: Vec<Row>,
    interactions: Vec<InteractionEntry>,
    side_effect: Vec<Row>,
}

impl DatasetIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every configured source.
    ///
    /// Never fails: a missing file is logged and leaves that kind empty, and
    /// an unreadable or corrupt file does the same with the error attached.
    /// Other kinds still load.
    pub fn load(config: &DataConfig) -> Self {
        let mut index = Self::new();
        for kind in EntityKind::ALL {
            let path = config.path_for(kind);
            match load_csv(&path) {
                Ok(rows) => {
                    info!(kind = %kind, rows = rows.len(), path = %path.display(), "Dataset loaded");
                    index = index.with_rows(kind, rows);
                }
                Err(DataError::NotFound(p)) => {
                    warn!(kind = %kind, path = %p, "Dataset file not found, collection left empty");
                }
                Err(e) => {
                    warn!(kind = %kind, path = %path.display(), error = %e, "Failed to load dataset, collection left empty");
                }
            }
        }
        index
    }

    /// Replace the collection for a kind. Used while building an index.
    pub fn with_rows(mut self, kind: EntityKind, rows: Vec<Row>) -> Self {
        match kind {
            EntityKind::Food => self.food = rows,
            EntityKind::Medicine => self.medicine = rows,
            EntityKind::Herb => self.herb = rows,
            EntityKind::Disease => self.disease = rows,
            EntityKind::Interaction => {
                self.interactions = rows.iter().cloned().map(InteractionEntry::from_row).collect();
                self.interaction_rows = rows;
            }
            EntityKind::SideEffect => self.side_effect = rows,
        }
        self
    }

    /// Rows of a kind, in source order.
    pub fn rows(&self, kind: EntityKind) -> &[Row] {
        match kind {
            EntityKind::Food => &self.food,
            EntityKind::Medicine => &self.medicine,
            EntityKind::Herb => &self.herb,
            EntityKind::Disease => &self.disease,
            EntityKind::Interaction => &self.interaction_rows,
            EntityKind::SideEffect => &self.side_effect,
        }
    }

    /// Interaction rows with precomputed keyword sets, in source order.
    pub fn interactions(&self) -> &[InteractionEntry] {
        &self.interactions
    }

    pub fn stats(&self) -> DatasetStats {
        let mut stats = DatasetStats {
            foods: self.food.len(),
            medicines: self.medicine.len(),
            herbs: self.herb.len(),
            diseases: self.disease.len(),
            interactions: self.interactions.len(),
            side_effects: self.side_effect.len(),
            total_records: 0,
        };
        stats.total_records = stats.foods
            + stats.medicines
            + stats.herbs
            + stats.diseases
            + stats.interactions
            + stats.side_effects;
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.stats().total_records == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn interaction(drug: &str, item: &str, severity: &str) -> Row {
        Row::from_pairs([
            ("Drug_Name", drug),
            ("Food_Herb_Name", item),
            ("Severity", severity),
            ("Conclusion", "Avoid combining."),
        ])
    }

    #[test]
    fn test_interaction_entry_keywords() {
        let entry = InteractionEntry::from_row(interaction(" Warfarin Sodium ", "Leafy Greens", "High"));
        assert_eq!(entry.drug_lower, "warfarin sodium");
        assert_eq!(entry.item_lower, "leafy greens");
        assert!(entry.drug_keywords.contains("sodium"));
        assert!(entry.item_keywords.contains("leafy"));
        assert!(entry.item_keywords.contains("greens"));
        assert_eq!(entry.severity_rank(), 0);
    }

    #[test]
    fn test_interaction_entry_description_fallback_columns() {
        let row = Row::from_pairs([
            ("drug_name", "Atorvastatin"),
            ("food_name", "Grapefruit"),
            ("severity", "Medium"),
            ("description", "Raises statin levels."),
        ]);
        let entry = InteractionEntry::from_row(row);
        assert_eq!(entry.drug_name(), "Atorvastatin");
        assert_eq!(entry.item_name(), "Grapefruit");
        assert_eq!(entry.severity(), "Medium");
        assert_eq!(entry.description(), Some("Raises statin levels."));
    }

    #[test]
    fn test_unknown_severity_ranks_last() {
        let entry = InteractionEntry::from_row(interaction("A", "B", "Severe"));
        assert_eq!(entry.severity_rank(), 3);
    }

    #[test]
    fn test_with_rows_and_stats() {
        let index = DatasetIndex::new()
            .with_rows(EntityKind::Food, vec![Row::from_pairs([("Food_Name", "Apple")])])
            .with_rows(
                EntityKind::Interaction,
                vec![interaction("Warfarin", "Spinach", "High")],
            );
        let stats = index.stats();
        assert_eq!(stats.foods, 1);
        assert_eq!(stats.interactions, 1);
        assert_eq!(stats.total_records, 2);
        assert_eq!(index.rows(EntityKind::Interaction).len(), 1);
        assert_eq!(index.interactions().len(), 1);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_load_missing_directory_gives_empty_index() {
        let config = DataConfig {
            data_dir: "/nonexistent/medinutri-data".to_string(),
            ..DataConfig::default()
        };
        let index = DatasetIndex::load(&config);
        assert!(index.is_empty());
    }

    #[test]
    fn test_load_partial_sources() {
        let dir = tempfile::tempdir().unwrap();
        let config = DataConfig {
            data_dir: dir.path().display().to_string(),
            ..DataConfig::default()
        };
        fs::write(
            config.path_for(EntityKind::Food),
            "Food_Name,Description\nSpinach,Leafy green rich in vitamin K\n",
        )
        .unwrap();
        fs::write(
            config.path_for(EntityKind::Interaction),
            "Drug_Name,Food_Herb_Name,Severity,Conclusion\nWarfarin,Spinach,High,Vitamin K reduces effect\n",
        )
        .unwrap();

        let index = DatasetIndex::load(&config);
        assert_eq!(index.rows(EntityKind::Food).len(), 1);
        assert_eq!(index.interactions().len(), 1);
        assert!(index.rows(EntityKind::Herb).is_empty());
        assert!(index.rows(EntityKind::Medicine).is_empty());
    }

    #[test]
    fn test_load_corrupt_source_only_empties_that_kind() {
        let dir = tempfile::tempdir().unwrap();
        let config = DataConfig {
            data_dir: dir.path().display().to_string(),
            ..DataConfig::default()
        };
        // A directory where a file is expected cannot be read as CSV.
        fs::create_dir(config.path_for(EntityKind::Herb)).unwrap();
        fs::write(config.path_for(EntityKind::Disease), "Indication\ndiabetes\n").unwrap();

        let index = DatasetIndex::load(&config);
        assert!(index.rows(EntityKind::Herb).is_empty());
        assert_eq!(index.rows(EntityKind::Disease).len(), 1);
    }
}
