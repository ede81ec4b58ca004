//! Entity matching over the dataset index.
//!
//! Matching is plain case-insensitive substring search in both directions:
//! a row matches when its name appears inside the query ("can I eat
//! spinach") or, for queries of three characters or more, when the query
//! appears inside its name ("spin"). Foods and herbs fall back to their
//! descriptive fields when names leave room under the cap. Results keep
//! storage order; there is no relevance ranking.

use std::ptr;
use std::sync::Arc;

use serde::Serialize;

use medinutri_core::config::MatchingConfig;
use medinutri_core::types::EntityKind;
use medinutri_data::{schema, DatasetIndex, InteractionEntry, Row};

use crate::collect::{collect_up_to, Bounded};

/// Shortest query that may match as a substring of a row's name.
const REVERSE_MIN_LEN: usize = 3;

/// Default cap for name searches.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Default cap for autocomplete suggestions.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 8;

/// Fields holding the name(s) of a row, per kind. Any one may match.
fn name_fields(kind: EntityKind) -> &'static [&'static [&'static str]] {
    match kind {
        EntityKind::Food => &[schema::FOOD_NAME],
        EntityKind::Medicine => &[schema::DRUG_NAME],
        EntityKind::Herb => &[schema::HERB_ENGLISH_NAME],
        EntityKind::Disease => &[schema::DISEASE_INDICATION],
        EntityKind::Interaction => &[schema::INTERACTION_DRUG, schema::INTERACTION_ITEM],
        EntityKind::SideEffect => &[schema::SAFETY_DRUG_NAME],
    }
}

/// Descriptive fields searched when names leave room under the cap.
fn descriptive_fields(kind: EntityKind) -> &'static [&'static [&'static str]] {
    match kind {
        EntityKind::Food => &[schema::FOOD_DESCRIPTION],
        EntityKind::Herb => &[schema::HERB_FUNCTION, schema::HERB_INDICATION],
        _ => &[],
    }
}

/// Two-directional name test on lower-cased values.
fn name_matches(name: &str, query: &str, query_len: usize) -> bool {
    !name.is_empty() && (query.contains(name) || (query_len >= REVERSE_MIN_LEN && name.contains(query)))
}

fn any_field_contains(row: &Row, fields: &[&[&str]], needle: &str) -> bool {
    fields.iter().any(|f| row.lower(f).contains(needle))
}

fn contains_row(seen: &[&Row], row: &&Row) -> bool {
    seen.iter().any(|r| ptr::eq(*r, *row))
}

/// Rows matched for one query, per kind.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityMatches<'a> {
    pub food: Vec<&'a Row>,
    pub medicine: Vec<&'a Row>,
    pub herb: Vec<&'a Row>,
    pub disease: Vec<&'a Row>,
    /// Interaction records attached to the query. Free-text matching never
    /// fills this; targeted lookups go through the interaction aggregator.
    pub interaction: Vec<&'a InteractionEntry>,
}

impl EntityMatches<'_> {
    pub fn is_empty(&self) -> bool {
        self.food.is_empty()
            && self.medicine.is_empty()
            && self.herb.is_empty()
            && self.disease.is_empty()
            && self.interaction.is_empty()
    }

    pub fn total(&self) -> usize {
        self.food.len() + self.medicine.len() + self.herb.len() + self.disease.len() + self.interaction.len()
    }
}

/// Foods and herbs that address a condition.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Remedies<'a> {
    pub food: Vec<&'a Row>,
    pub herb: Vec<&'a Row>,
}

impl Remedies<'_> {
    pub fn is_empty(&self) -> bool {
        self.food.is_empty() && self.herb.is_empty()
    }
}

/// Substring matcher over a shared [`DatasetIndex`].
#[derive(Debug, Clone)]
pub struct EntityMatcher {
    index: Arc<DatasetIndex>,
    config: MatchingConfig,
}

impl EntityMatcher {
    pub fn new(index: Arc<DatasetIndex>, config: MatchingConfig) -> Self {
        Self { index, config }
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Rows of `kind` mentioned by `query`, at most `limit`, in storage order.
    ///
    /// Queries shorter than the configured minimum never search.
    pub fn match_kind(&self, query: &str, kind: EntityKind, limit: usize) -> Vec<&Row> {
        let q = query.trim().to_lowercase();
        let q_len = q.chars().count();
        if q_len < self.config.min_query_len {
            return Vec::new();
        }

        let rows = self.index.rows(kind);
        let names = name_fields(kind);

        let mut acc = Bounded::new(limit);
        acc.extend_matching(rows, |_, row| {
            names.iter().any(|f| name_matches(&row.lower(f), &q, q_len))
        });

        let descriptive = descriptive_fields(kind);
        if !acc.is_full() && q_len >= self.config.fallback_min_len && !descriptive.is_empty() {
            acc.extend_matching(rows, |seen, row| {
                !contains_row(seen, row) && any_field_contains(row, descriptive, &q)
            });
        }

        acc.into_vec()
    }

    /// Match a query against every free-text kind with the configured cap.
    pub fn find_matches(&self, query: &str) -> EntityMatches<'_> {
        let limit = self.config.match_limit;
        EntityMatches {
            food: self.match_kind(query, EntityKind::Food, limit),
            medicine: self.match_kind(query, EntityKind::Medicine, limit),
            herb: self.match_kind(query, EntityKind::Herb, limit),
            disease: self.match_kind(query, EntityKind::Disease, limit),
            interaction: Vec::new(),
        }
    }

    /// Reverse lookup: foods and herbs whose descriptions mention `condition`.
    pub fn find_natural_remedies(&self, condition: &str) -> Remedies<'_> {
        let q = condition.trim().to_lowercase();
        if q.chars().count() < self.config.min_remedy_len {
            return Remedies::default();
        }
        let limit = self.config.match_limit;

        Remedies {
            food: collect_up_to(limit, self.index.rows(EntityKind::Food), |row| {
                row.lower(schema::FOOD_DESCRIPTION).contains(&q)
            }),
            herb: collect_up_to(limit, self.index.rows(EntityKind::Herb), |row| {
                row.lower(schema::HERB_INDICATION).contains(&q)
                    || row.lower(schema::HERB_FUNCTION).contains(&q)
            }),
        }
    }

    /// Rows of `kind` whose name contains `query`, case-insensitive.
    pub fn search(&self, kind: EntityKind, query: &str, limit: usize) -> Vec<&Row> {
        let q = query.trim().to_lowercase();
        let names = name_fields(kind);
        collect_up_to(limit, self.index.rows(kind), |row| {
            names.iter().any(|f| row.lower(f).contains(&q))
        })
    }

    /// First row of `kind` whose primary name equals `name`, case-insensitive.
    pub fn find_by_name(&self, kind: EntityKind, name: &str) -> Option<&Row> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let primary = name_fields(kind)[0];
        self.index
            .rows(kind)
            .iter()
            .find(|row| row.lower(primary).trim() == needle)
    }

    /// Distinct names of `kind` containing `query`, in storage order.
    pub fn autocomplete(&self, kind: EntityKind, query: &str, limit: usize) -> Vec<String> {
        let q = query.trim().to_lowercase();
        let primary = name_fields(kind)[0];
        let mut suggestions: Vec<String> = Vec::new();
        for row in self.index.rows(kind) {
            if suggestions.len() >= limit {
                break;
            }
            let name = row.text(primary);
            if !name.is_empty()
                && name.to_lowercase().contains(&q)
                && !suggestions.iter().any(|s| s == name)
            {
                suggestions.push(name.to_string());
            }
        }
        suggestions
    }
}
