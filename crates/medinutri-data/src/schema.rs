//! Field names per dataset kind.
//!
//! Each logical field lists the column headers it may appear under, in
//! priority order. [`crate::Row::first_of`] returns the first non-empty value
//! among them, so sources exported with either naming convention load alike.

pub const FOOD_NAME: &[&str] = &["Food_Name", "Food"];
pub const FOOD_DESCRIPTION: &[&str] = &["Description"];
pub const FOOD_CALORIES: &[&str] = &["Calories"];
pub const FOOD_PROTEIN: &[&str] = &["Protein"];

pub const DRUG_NAME: &[&str] = &["Drug_Name", "Medicine Name"];
pub const DRUG_COMPOSITION: &[&str] = &["Composition"];
pub const DRUG_USES: &[&str] = &["Uses"];
pub const DRUG_CATEGORY: &[&str] = &["Category"];

pub const HERB_ENGLISH_NAME: &[&str] = &["Herb_English_Name"];
pub const HERB_PINYIN_NAME: &[&str] = &["Herb_Pinyin_Name"];
pub const HERB_FUNCTION: &[&str] = &["Function"];
pub const HERB_INDICATION: &[&str] = &["Indication"];

pub const DISEASE_INDICATION: &[&str] = &["Indication"];

pub const INTERACTION_DRUG: &[&str] = &["Drug_Name", "drug_name"];
pub const INTERACTION_ITEM: &[&str] = &["Food_Herb_Name", "food_name"];
pub const INTERACTION_SEVERITY: &[&str] = &["Severity", "severity"];
pub const INTERACTION_DESCRIPTION: &[&str] = &["Conclusion", "Result", "description", "Description"];

pub const SAFETY_DRUG_NAME: &[&str] = &["drug_name"];
pub const SAFETY_GENERIC_NAME: &[&str] = &["generic_name"];
pub const SAFETY_CONDITION: &[&str] = &["medical_condition"];
pub const SAFETY_COMMON: &[&str] = &["side_effects_common"];
pub const SAFETY_SEVERE: &[&str] = &["side_effects_severe"];
pub const SAFETY_PREGNANCY: &[&str] = &["pregnancy_category"];

/// Separator for list-valued safety fields.
pub const LIST_SEPARATOR: char = ';';
