//! Dietitian-style answer composition for the entity-based engine.
//!
//! An answer is a list of sections joined by a horizontal rule: an optional
//! greeting, then either condition guidance (lifestyle notes, recommended
//! foods and herbs) or direct item info, then interaction alerts. When
//! nothing applies, a fixed apology names the query.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use medinutri_data::{schema, InteractionEntry, Row};

use crate::matcher::{EntityMatches, Remedies};

pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

pub const GREETING: &str =
    "Hello! I am MediNutri, your offline nutrition assistant. I can help with diet and lifestyle tips.";

const LIFESTYLE_BLOCK: &str = "**Management & Lifestyle:**\n\
• Ensure adequate hydration with water or herbal teas.\n\
• Maintain a balanced diet rich in clean, whole foods.\n\
• Rest appropriately to support recovery.";

/// Names that stand for a missing entry.
static UNKNOWN_NAMES: &[&str] = &["NA", "Unknown"];

/// Field value meaning "not available".
const NOT_AVAILABLE: &str = "NA";

const MAX_DESCRIPTION_CHARS: usize = 300;
const MAX_ALERT_CHARS: usize = 150;
const MAX_ALERTS: usize = 3;
const MAX_DIRECT_ITEMS: usize = 2;

static BRACKETED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]").unwrap());

fn is_unknown_name(name: &str) -> bool {
    name.is_empty() || UNKNOWN_NAMES.contains(&name)
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Capitalize the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

pub fn fallback_message(query: &str) -> String {
    format!(
        "I'm sorry, I couldn't find specific diet recommendations for '{query}'. \
         Please consult a certified nutritionist for personalized advice."
    )
}

fn food_name(row: &Row) -> &str {
    row.text(schema::FOOD_NAME)
}

fn herb_name(row: &Row) -> &str {
    row.first_of(schema::HERB_ENGLISH_NAME)
        .or_else(|| row.first_of(schema::HERB_PINYIN_NAME))
        .unwrap_or("")
}

/// `🍎 **Name**: description`, long descriptions cleaned and shortened.
pub fn format_food(row: &Row) -> String {
    let name = row.first_of(schema::FOOD_NAME).unwrap_or("Unknown");
    let desc = row
        .first_of(schema::FOOD_DESCRIPTION)
        .unwrap_or("No detailed description available.");
    if desc.chars().count() > MAX_DESCRIPTION_CHARS {
        let cleaned = BRACKETED_RE.replace_all(desc, "");
        format!("🍎 **{name}**: {}...", truncate_chars(&cleaned, MAX_DESCRIPTION_CHARS))
    } else {
        format!("🍎 **{name}**: {desc}")
    }
}

pub fn format_herb(row: &Row) -> String {
    let name = match herb_name(row) {
        "" => "Unknown",
        n => n,
    };
    let func = row.first_of(schema::HERB_FUNCTION).unwrap_or("No specific function listed.");
    let ind = row.first_of(schema::HERB_INDICATION).unwrap_or("No indication listed.");
    let func = if func == NOT_AVAILABLE { "Not specified" } else { func };
    let ind = if ind == NOT_AVAILABLE { "Not specified" } else { ind };
    format!("🌿 **{name}**\n*Effect*: {func}\n*Uses*: {ind}")
}

pub fn format_interaction(entry: &InteractionEntry) -> String {
    let drug = match entry.drug_name() {
        "" => "Drug",
        d => d,
    };
    let item = match entry.item_name() {
        "" => "Item",
        i => i,
    };
    let result = entry.description().unwrap_or("Use with caution.");
    if result.chars().count() > MAX_ALERT_CHARS {
        let short = truncate_chars(result, MAX_ALERT_CHARS - 3);
        format!("⚠️ **Interaction**: {drug} + {item}: {short}...")
    } else {
        format!("⚠️ **Interaction**: {drug} + {item}: {result}")
    }
}

// =============================================================================
// ResponseSynthesizer
// =============================================================================

/// Builds the entity-based answer text.
#[derive(Debug, Clone, Default)]
pub struct ResponseSynthesizer;

impl ResponseSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Compose the answer for `query`. Never returns an empty string.
    pub fn synthesize(
        &self,
        query: &str,
        matches: &EntityMatches<'_>,
        interactions: &[&InteractionEntry],
        conversational: bool,
        remedies: &Remedies<'_>,
    ) -> String {
        let mut parts: Vec<String> = Vec::new();

        if conversational {
            parts.push(GREETING.to_string());
        }

        let condition = match matches.disease.first() {
            Some(disease) => disease.text(schema::DISEASE_INDICATION).to_string(),
            None if !remedies.is_empty() => title_case(query),
            None => String::new(),
        };

        if !condition.is_empty() {
            self.condition_sections(&condition, remedies, &mut parts);
        } else {
            self.direct_sections(matches, &mut parts);
        }

        if let Some(alerts) = self.alerts(interactions, &matches.interaction) {
            parts.push(alerts);
        }

        if parts.is_empty() {
            return fallback_message(query);
        }
        parts.join(SECTION_SEPARATOR)
    }

    fn condition_sections(&self, condition: &str, remedies: &Remedies<'_>, parts: &mut Vec<String>) {
        parts.push(format!("🩺 **{condition}**"));
        parts.push(LIFESTYLE_BLOCK.to_string());

        let foods: Vec<String> = remedies
            .food
            .iter()
            .filter(|r| !is_unknown_name(food_name(r)))
            .map(|r| format_food(r))
            .collect();
        if !foods.is_empty() {
            parts.push(format!("**Recommended Foods:**\n{}", foods.join("\n\n")));
        }

        let herbs: Vec<String> = remedies
            .herb
            .iter()
            .filter(|r| !is_unknown_name(herb_name(r)))
            .map(|r| format_herb(r))
            .collect();
        if !herbs.is_empty() {
            parts.push(format!("**Helpful Herbs:**\n{}", herbs.join("\n\n")));
        }
    }

    fn direct_sections(&self, matches: &EntityMatches<'_>, parts: &mut Vec<String>) {
        parts.extend(
            matches
                .food
                .iter()
                .take(MAX_DIRECT_ITEMS)
                .filter(|r| !is_unknown_name(food_name(r)))
                .map(|r| format_food(r)),
        );
        parts.extend(
            matches
                .herb
                .iter()
                .take(MAX_DIRECT_ITEMS)
                .filter(|r| !is_unknown_name(r.text(schema::HERB_ENGLISH_NAME)))
                .map(|r| format_herb(r)),
        );
    }

    /// Up to three alerts, one per drug/item pair, newline-separated.
    fn alerts(&self, explicit: &[&InteractionEntry], attached: &[&InteractionEntry]) -> Option<String> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for entry in explicit.iter().chain(attached).copied() {
            if seen.insert((entry.drug_name(), entry.item_name())) {
                lines.push(format_interaction(entry));
                if lines.len() >= MAX_ALERTS {
                    break;
                }
            }
        }
        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}
