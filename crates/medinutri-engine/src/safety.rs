//! Drug safety profiles from the side-effects dataset.

use serde::Serialize;

use medinutri_core::types::EntityKind;
use medinutri_data::{schema, DatasetIndex, Row};

use crate::collect::collect_up_to;

/// Typed view of one side-effects record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrugSafetyProfile {
    pub drug_name: String,
    pub generic_name: Option<String>,
    pub medical_condition: Option<String>,
    pub side_effects_common: Vec<String>,
    pub side_effects_severe: Vec<String>,
    pub pregnancy_category: Option<String>,
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(schema::LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl DrugSafetyProfile {
    pub fn from_row(row: &Row) -> Self {
        let owned = |fields: &[&str]| row.first_of(fields).map(str::to_string);
        Self {
            drug_name: row.text(schema::SAFETY_DRUG_NAME).to_string(),
            generic_name: owned(schema::SAFETY_GENERIC_NAME),
            medical_condition: owned(schema::SAFETY_CONDITION),
            side_effects_common: split_list(row.first_of(schema::SAFETY_COMMON)),
            side_effects_severe: split_list(row.first_of(schema::SAFETY_SEVERE)),
            pregnancy_category: owned(schema::SAFETY_PREGNANCY),
        }
    }
}

/// Row whose drug or generic name equals `name`, case-insensitive.
pub fn find_exact<'a>(index: &'a DatasetIndex, name: &str) -> Option<&'a Row> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let rows = index.rows(EntityKind::SideEffect);
    rows.iter()
        .find(|r| r.lower(schema::SAFETY_DRUG_NAME).trim() == needle)
        .or_else(|| {
            rows.iter()
                .find(|r| r.lower(schema::SAFETY_GENERIC_NAME).trim() == needle)
        })
}

/// Exact drug name, then exact generic name, then drug-name prefix.
pub fn lookup(index: &DatasetIndex, name: &str) -> Option<DrugSafetyProfile> {
    let needle = name.trim().to_lowercase();
    find_exact(index, &needle)
        .or_else(|| {
            if needle.is_empty() {
                return None;
            }
            index
                .rows(EntityKind::SideEffect)
                .iter()
                .find(|r| r.lower(schema::SAFETY_DRUG_NAME).starts_with(&needle))
        })
        .map(DrugSafetyProfile::from_row)
}

/// Rows whose drug or generic name contains `query`.
pub fn search<'a>(index: &'a DatasetIndex, query: &str, limit: usize) -> Vec<&'a Row> {
    let q = query.trim().to_lowercase();
    collect_up_to(limit, index.rows(EntityKind::SideEffect), |r| {
        r.lower(schema::SAFETY_DRUG_NAME).contains(&q) || r.lower(schema::SAFETY_GENERIC_NAME).contains(&q)
    })
}
