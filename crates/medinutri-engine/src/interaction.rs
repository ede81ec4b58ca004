//! Food-drug interaction lookups with severity ranking.
//!
//! A stored interaction matches a food/drug query pair through any of four
//! strategies:
//!
//! 1. exact equality of the normalized names,
//! 2. both stored names contain their query,
//! 3. a word of the food query is one of the stored food keywords and the
//!    drug name contains the drug query,
//! 4. a word of the drug query is one of the stored drug keywords and the
//!    food name contains the food query.
//!
//! Batch checks use the first three only.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use medinutri_core::types::{BatchRisk, RiskLevel, Severity};
use medinutri_data::{DatasetIndex, InteractionEntry};

use crate::collect::collect_up_to;

pub const BATCH_EMPTY_MESSAGE: &str = "No interactions to check";

/// Normalized form of one food/drug query pair.
struct PairQuery {
    food_exact: String,
    drug_exact: String,
    food_partial: String,
    drug_partial: String,
    food_words: Vec<String>,
    drug_words: Vec<String>,
}

impl PairQuery {
    fn new(food: &str, drug: &str) -> Self {
        let food_exact = food.trim().to_lowercase();
        let drug_exact = drug.trim().to_lowercase();
        Self {
            food_words: food_exact.split_whitespace().map(str::to_string).collect(),
            drug_words: drug_exact.split_whitespace().map(str::to_string).collect(),
            food_partial: food.to_lowercase(),
            drug_partial: drug.to_lowercase(),
            food_exact,
            drug_exact,
        }
    }

    fn is_blank(&self) -> bool {
        self.food_exact.is_empty() || self.drug_exact.is_empty()
    }

    fn matches(&self, entry: &InteractionEntry, use_drug_keywords: bool) -> bool {
        let food_partial = entry.item_lower.contains(&self.food_partial);
        let drug_partial = entry.drug_lower.contains(&self.drug_partial);

        (entry.item_lower == self.food_exact && entry.drug_lower == self.drug_exact)
            || (food_partial && drug_partial)
            || (drug_partial && self.food_words.iter().any(|w| entry.item_keywords.contains(w)))
            || (use_drug_keywords
                && food_partial
                && self.drug_words.iter().any(|w| entry.drug_keywords.contains(w)))
    }
}

fn sort_by_severity(entries: &mut [&InteractionEntry]) {
    // Stable: equal severities keep storage order.
    entries.sort_by_key(|e| e.severity_rank());
}

// =============================================================================
// Results
// =============================================================================

/// Exact severity label tallies. Unknown labels are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn tally(entries: &[&InteractionEntry]) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            match Severity::from_label(entry.severity()) {
                Some(Severity::High) => counts.high += 1,
                Some(Severity::Medium) => counts.medium += 1,
                Some(Severity::Low) => counts.low += 1,
                None => {}
            }
        }
        counts
    }

    pub fn risk_level(&self) -> RiskLevel {
        if self.high > 0 {
            RiskLevel::Danger
        } else if self.medium > 0 {
            RiskLevel::Warning
        } else if self.low > 0 {
            RiskLevel::Caution
        } else {
            RiskLevel::Safe
        }
    }
}

/// Result of checking one food against one drug.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionReport<'a> {
    pub food: String,
    pub drug: String,
    pub has_interaction: bool,
    pub risk_level: RiskLevel,
    pub interactions: Vec<&'a InteractionEntry>,
    pub count: usize,
    pub severity_breakdown: SeverityCounts,
}

/// Foods grouped by the highest severity they hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskyFoods {
    pub high_risk: Vec<String>,
    pub medium_risk: Vec<String>,
    pub low_risk: Vec<String>,
}

impl RiskyFoods {
    fn contains(&self, food: &str) -> bool {
        [&self.high_risk, &self.medium_risk, &self.low_risk]
            .iter()
            .any(|bucket| bucket.iter().any(|f| f == food))
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<String> {
        match severity {
            Severity::High => &mut self.high_risk,
            Severity::Medium => &mut self.medium_risk,
            Severity::Low => &mut self.low_risk,
        }
    }

    pub fn overall(&self) -> BatchRisk {
        if !self.high_risk.is_empty() {
            BatchRisk::High
        } else if !self.medium_risk.is_empty() {
            BatchRisk::Medium
        } else if !self.low_risk.is_empty() {
            BatchRisk::Low
        } else {
            BatchRisk::Safe
        }
    }
}

/// Result of checking many foods against many drugs.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_foods_checked: usize,
    pub total_medications_checked: usize,
    pub interactions_found: usize,
    pub interactions: Vec<&'a InteractionEntry>,
    pub safe_foods: Vec<String>,
    pub risky_foods: RiskyFoods,
    pub overall_risk: BatchRisk,
}

// =============================================================================
// InteractionAggregator
// =============================================================================

/// Interaction lookups over a shared [`DatasetIndex`].
#[derive(Debug, Clone)]
pub struct InteractionAggregator {
    index: Arc<DatasetIndex>,
    specific_limit: usize,
}

impl InteractionAggregator {
    pub fn new(index: Arc<DatasetIndex>, specific_limit: usize) -> Self {
        Self {
            index,
            specific_limit,
        }
    }

    fn find_pair(&self, query: &PairQuery, use_drug_keywords: bool) -> Vec<&InteractionEntry> {
        if query.is_blank() {
            return Vec::new();
        }
        self.index
            .interactions()
            .iter()
            .filter(|e| query.matches(e, use_drug_keywords))
            .collect()
    }

    /// Check one food against one drug using all four strategies.
    pub fn check(&self, food: &str, drug: &str) -> InteractionReport<'_> {
        let mut interactions = self.find_pair(&PairQuery::new(food, drug), true);
        sort_by_severity(&mut interactions);

        let severity_breakdown = SeverityCounts::tally(&interactions);
        let risk_level = severity_breakdown.risk_level();
        debug!(food, drug, count = interactions.len(), risk = risk_level.as_str(), "Interaction check");

        InteractionReport {
            food: food.to_string(),
            drug: drug.to_string(),
            has_interaction: !interactions.is_empty(),
            risk_level,
            count: interactions.len(),
            interactions,
            severity_breakdown,
        }
    }

    /// Check every food against every drug.
    ///
    /// Each food lands in exactly one of the safe list or a risk bucket. A
    /// food's bucket is the highest severity among its hits; hits with other
    /// labels count as low.
    pub fn batch_check(&self, foods: &[String], drugs: &[String]) -> BatchReport<'_> {
        if foods.is_empty() || drugs.is_empty() {
            return BatchReport {
                message: Some(BATCH_EMPTY_MESSAGE.to_string()),
                total_foods_checked: foods.len(),
                total_medications_checked: drugs.len(),
                interactions_found: 0,
                interactions: Vec::new(),
                safe_foods: foods.to_vec(),
                risky_foods: RiskyFoods::default(),
                overall_risk: BatchRisk::Safe,
            };
        }

        let mut all = Vec::new();
        let mut risky = RiskyFoods::default();

        for food in foods {
            let mut hits = Vec::new();
            let mut highest = Severity::Low;
            for drug in drugs {
                for entry in self.find_pair(&PairQuery::new(food, drug), false) {
                    match Severity::from_label(entry.severity()) {
                        Some(Severity::High) => highest = Severity::High,
                        Some(Severity::Medium) if highest != Severity::High => {
                            highest = Severity::Medium
                        }
                        _ => {}
                    }
                    hits.push(entry);
                }
            }
            if !hits.is_empty() {
                if !risky.contains(food) {
                    risky.bucket_mut(highest).push(food.clone());
                }
                all.extend(hits);
            }
        }

        let safe_foods = foods.iter().filter(|f| !risky.contains(f)).cloned().collect();
        sort_by_severity(&mut all);
        let overall_risk = risky.overall();
        debug!(
            foods = foods.len(),
            drugs = drugs.len(),
            found = all.len(),
            "Batch interaction check"
        );

        BatchReport {
            message: None,
            total_foods_checked: foods.len(),
            total_medications_checked: drugs.len(),
            interactions_found: all.len(),
            interactions: all,
            safe_foods,
            risky_foods: risky,
            overall_risk,
        }
    }

    /// Interactions whose drug names any of `drug_names` and whose food/herb
    /// names any of `item_names`. Capped, in storage order.
    pub fn get_interaction_specific(&self, drug_names: &[&str], item_names: &[&str]) -> Vec<&InteractionEntry> {
        let drugs = lowered_non_empty(drug_names);
        let items = lowered_non_empty(item_names);
        if drugs.is_empty() || items.is_empty() {
            return Vec::new();
        }
        collect_up_to(self.specific_limit, self.index.interactions(), |e| {
            drugs.iter().any(|d| e.drug_lower.contains(d.as_str()))
                && items.iter().any(|i| e.item_lower.contains(i.as_str()))
        })
    }

    /// Every interaction whose drug name contains `drug`, severity-sorted.
    pub fn drug_interactions(&self, drug: &str) -> Vec<&InteractionEntry> {
        let needle = drug.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut entries: Vec<&InteractionEntry> = self
            .index
            .interactions()
            .iter()
            .filter(|e| e.drug_lower.contains(&needle))
            .collect();
        sort_by_severity(&mut entries);
        entries
    }
}

fn lowered_non_empty(names: &[&str]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}
