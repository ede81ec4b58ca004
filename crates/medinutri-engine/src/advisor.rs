//! Intent-driven health advisor.
//!
//! Answers the last message of a conversation according to its intent,
//! using the caller's medication list and daily intake when supplied.
//! Sections are concatenated as-is; every branch writes its own spacing.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use medinutri_core::types::{ChatMessage, EntityKind, Intent, Medication, Severity, UserContext};
use medinutri_data::{schema, DatasetIndex, KnowledgeBase, Row};

use crate::collect::collect_up_to;
use crate::intent::IntentClassifier;
use crate::safety::{self, DrugSafetyProfile};

pub const GREETING: &str = "Hello! I'm your MediNutri Health Assistant. I can help you check \
food-drug interactions, explain medication side effects, or analyze your diet. How can I help you today?";

const NO_MEDICATIONS: &str = "I don't see any active medications in your profile. Please add your \
medications first so I can check for interactions.";

const NO_INTERACTIONS_FOUND: &str = "✅ I didn't find specific food interactions for your current \
medication list in my immediate database. However, always follow your doctor's advice.";

const REVIEW_RECOMMENDATION: &str =
    "\n**Recommendation:** Please review the [Check Safety](/interactions) page for detailed analysis.";

const HELP_TEXT: &str = "I'm trained to help with **Medications**, **Side Effects**, and **Diet Tracking**. \
\n\nTry asking:\n\n\
- \"Is it safe to eat grapefruit with my meds?\"\n\
- \"What are side effects of Metformin?\"\n\
- \"Is Idli good for diabetes?\"\n\
- \"How many calories in Samosa?\"";

const LOW_INTAKE: &str = "⚠️ **Low Intake:** Your calorie intake is quite low for today. Consider \
adding a balanced meal with complex carbohydrates.";
const HIGH_INTAKE: &str =
    "ℹ️ **High Intake:** You've had a hearty day! Ensure you're staying hydrated and active.";
const GOOD_INTAKE: &str = "✅ **Good Range:** Your calorie intake is within a healthy daily range.";
const PROTEIN_TIP: &str = "\n\n💪 **Protein Tip:** Try adding more lentils, chickpea, paneer, or \
lean meats to support muscle health.";

const LOW_CALORIES: f64 = 1200.0;
const HIGH_CALORIES: f64 = 2500.0;
const LOW_PROTEIN: f64 = 45.0;

/// Interaction rows listed per medication.
const ALERTS_PER_MEDICATION: usize = 3;
/// Side effects listed per severity group.
const EFFECTS_PER_GROUP: usize = 3;
/// Message words must be longer than this to be tried as drug names.
const MIN_DRUG_WORD_LEN: usize = 3;
/// Search words must be longer than this.
const MIN_SEARCH_WORD_LEN: usize = 2;

static STOP_WORDS: &[&str] = &[
    "how", "many", "much", "in", "what", "is", "of", "the", "a", "an", "calories", "protein", "carbs",
    "fats",
];

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w]").unwrap());

// =============================================================================
// Advisor
// =============================================================================

/// Rule-based advisor over the shared dataset index and knowledge base.
#[derive(Debug, Clone)]
pub struct Advisor {
    index: Arc<DatasetIndex>,
    knowledge: Arc<KnowledgeBase>,
    classifier: IntentClassifier,
}

impl Advisor {
    pub fn new(index: Arc<DatasetIndex>, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            index,
            knowledge,
            classifier: IntentClassifier::new(),
        }
    }

    /// Answer the last message of `history`. Never returns an empty string.
    pub fn respond(&self, history: &[ChatMessage], context: &UserContext) -> String {
        let last = history
            .last()
            .map(|m| m.content.to_lowercase())
            .unwrap_or_default();
        let intent = self.classifier.classify(&last);
        debug!(intent = %intent, medications = context.medications.len(), "Advisor intent");

        match intent {
            Intent::Greeting => GREETING.to_string(),
            Intent::InteractionCheck => self.interaction_alerts(&context.medications),
            Intent::SideEffects => self.side_effects(&last, &context.medications),
            Intent::DietAdvice => diet_summary(context),
            Intent::General => self.general_lookup(&last),
        }
    }

    fn interaction_alerts(&self, medications: &[Medication]) -> String {
        if medications.is_empty() {
            return NO_MEDICATIONS.to_string();
        }

        let names: Vec<&str> = medications.iter().map(|m| m.name.as_str()).collect();
        let mut out = format!("Analyzing for your medications: **{}**...\n\n", names.join(", "));

        let mut hits = 0;
        for med in medications {
            let needle = med.name.to_lowercase();
            let rows = collect_up_to(ALERTS_PER_MEDICATION, self.index.interactions(), |e| {
                e.drug_lower.contains(&needle)
            });
            if rows.is_empty() {
                continue;
            }
            out.push_str(&format!("⚠️ **Potential alerts for {}**:\n", med.name));
            for entry in rows {
                let icon = match Severity::from_label(entry.severity()) {
                    Some(Severity::High) => "🔴",
                    _ => "🟡",
                };
                out.push_str(&format!(
                    "{icon} **{}**: {}\n",
                    entry.item_name(),
                    entry.description().unwrap_or_default()
                ));
            }
            hits += 1;
        }

        if hits == 0 {
            out.push_str(NO_INTERACTIONS_FOUND);
        } else {
            out.push_str(REVIEW_RECOMMENDATION);
        }
        out
    }

    /// Drug the message asks about: an active medication it names, else the
    /// first longer word that is a known drug name.
    fn target_drug(&self, message: &str, medications: &[Medication]) -> Option<String> {
        if let Some(med) = medications
            .iter()
            .find(|m| !m.name.is_empty() && message.contains(&m.name.to_lowercase()))
        {
            return Some(med.name.clone());
        }

        message
            .split_whitespace()
            .map(|w| NON_WORD_RE.replace_all(w, "").into_owned())
            .filter(|w| w.chars().count() > MIN_DRUG_WORD_LEN)
            .find(|w| {
                self.index
                    .rows(EntityKind::SideEffect)
                    .iter()
                    .any(|r| r.lower(schema::SAFETY_DRUG_NAME).trim() == w.to_lowercase())
            })
    }

    fn side_effects(&self, message: &str, medications: &[Medication]) -> String {
        let Some(target) = self.target_drug(message, medications) else {
            let known = self.index.rows(EntityKind::SideEffect).len();
            return format!(
                "Which medication are you asking about? I can provide safety details for {known} drugs \
                 from our verified database."
            );
        };

        match safety::find_exact(&self.index, &target) {
            Some(row) => format_safety_profile(&DrugSafetyProfile::from_row(row)),
            None => format!(
                "I found '{target}' in your message, but I don't have detailed safety data for it yet."
            ),
        }
    }

    fn general_lookup(&self, message: &str) -> String {
        let words: Vec<&str> = WORD_RE
            .find_iter(message)
            .map(|m| m.as_str())
            .filter(|w| !STOP_WORDS.contains(w) && w.chars().count() > MIN_SEARCH_WORD_LEN)
            .collect();

        let mut food: Option<&Row> = None;
        let mut drug: Option<&Row> = None;
        for word in &words {
            food = self.prefix_match(EntityKind::Food, schema::FOOD_NAME, word);
            if food.is_some() {
                break;
            }
            drug = self.prefix_match(EntityKind::SideEffect, schema::SAFETY_DRUG_NAME, word);
            if drug.is_some() {
                break;
            }
        }

        let mut out = String::new();
        if let Some(row) = food {
            out.push_str(&format!(
                "### **Nutrition Information: {}**\n\n",
                row.text(schema::FOOD_NAME)
            ));
            out.push_str(&format!(
                "✅ **Value:** {} calories per 100g\n",
                row.first_of(schema::FOOD_CALORIES).unwrap_or("N/A")
            ));
            out.push_str(&format!(
                "💪 **Protein:** {}g\n\n",
                row.first_of(schema::FOOD_PROTEIN).unwrap_or("N/A")
            ));
        }
        if let Some(row) = drug {
            out.push_str(&format!(
                "### **Safety Info: {}**\n\n",
                row.text(schema::SAFETY_DRUG_NAME)
            ));
            out.push_str(&format!(
                "**Medical Use:** {}\n\n",
                row.first_of(schema::SAFETY_CONDITION).unwrap_or("N/A")
            ));
        }

        let tip = self.knowledge.best_match(message);
        if let Some((entry, _)) = tip {
            if food.is_none() && drug.is_none() {
                out.push_str(&format!(
                    "### **{}**\n\n",
                    entry.category.as_deref().unwrap_or("Health Insight")
                ));
            } else {
                out.push_str("**Health Tip:** ");
            }
            out.push_str(&format!("{}\n\n", entry.answer));
        }

        if food.is_none() && drug.is_none() && tip.is_none() {
            out.push_str(HELP_TEXT);
        }
        out
    }

    fn prefix_match(&self, kind: EntityKind, field: &[&str], word: &str) -> Option<&Row> {
        self.index
            .rows(kind)
            .iter()
            .find(|r| r.lower(field).starts_with(word))
    }
}

fn format_safety_profile(profile: &DrugSafetyProfile) -> String {
    let mut out = format!("### Safety Profile for **{}**\n\n", profile.drug_name);

    if !profile.side_effects_severe.is_empty() {
        out.push_str("🚫 **Serious Side Effects** (Call doctor):\n");
        for effect in profile.side_effects_severe.iter().take(EFFECTS_PER_GROUP) {
            out.push_str(&format!("- {effect}\n"));
        }
        out.push('\n');
    }

    if !profile.side_effects_common.is_empty() {
        out.push_str("ℹ️ **Common Side Effects**:\n");
        for effect in profile.side_effects_common.iter().take(EFFECTS_PER_GROUP) {
            out.push_str(&format!("- {effect}\n"));
        }
    }

    out.push_str(&format!(
        "\n**Used for:** {}",
        profile.medical_condition.as_deref().unwrap_or("Various conditions")
    ));
    if let Some(category) = &profile.pregnancy_category {
        out.push_str(&format!("\n**Pregnancy Category:** {category}"));
    }
    out
}

fn diet_summary(context: &UserContext) -> String {
    let calories = context.total_calories;
    let protein = context.total_protein;

    let mut out = String::from("### **Dietary Analysis**\n\n");
    out.push_str(&format!("- **Calories Today:** {}\n", calories.round_ties_even() as i64));
    out.push_str(&format!("- **Protein Today:** {}g\n", protein.round_ties_even() as i64));
    out.push_str(&format!("- **Meals Logged:** {}\n\n", context.todays_meals.len()));

    out.push_str(if calories < LOW_CALORIES {
        LOW_INTAKE
    } else if calories > HIGH_CALORIES {
        HIGH_INTAKE
    } else {
        GOOD_INTAKE
    });

    if protein < LOW_PROTEIN {
        out.push_str(PROTEIN_TIP);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use medinutri_data::KnowledgeEntry;

    fn index() -> DatasetIndex {
        DatasetIndex::new()
            .with_rows(
                EntityKind::Food,
                vec![
                    Row::from_pairs([("Food", "Samosa"), ("Calories", "262"), ("Protein", "3.5")]),
                    Row::from_pairs([("Food", "Idli"), ("Calories", "58"), ("Protein", "")]),
                ],
            )
            .with_rows(
                EntityKind::Interaction,
                vec![
                    Row::from_pairs([
                        ("drug_name", "Warfarin"),
                        ("food_name", "Spinach"),
                        ("severity", "High"),
                        ("description", "Vitamin K reduces effect"),
                    ]),
                    Row::from_pairs([
                        ("drug_name", "Warfarin"),
                        ("food_name", "Green Tea"),
                        ("severity", "Low"),
                        ("description", "Minor"),
                    ]),
                ],
            )
            .with_rows(
                EntityKind::SideEffect,
                vec![Row::from_pairs([
                    ("drug_name", "Metformin"),
                    ("generic_name", "metformin"),
                    ("medical_condition", "Diabetes, Type 2"),
                    ("side_effects_common", "nausea;diarrhea;gas;bloating"),
                    ("side_effects_severe", "lactic acidosis"),
                    ("pregnancy_category", "B"),
                ])],
            )
    }

    fn knowledge() -> KnowledgeBase {
        KnowledgeBase::new(vec![KnowledgeEntry {
            category: Some("Diabetes Care".to_string()),
            keywords: vec!["diabetes".to_string(), "idli".to_string()],
            answer: "Pair idli with sambar for fiber.".to_string(),
        }])
    }

    fn advisor() -> Advisor {
        Advisor::new(Arc::new(index()), Arc::new(knowledge()))
    }

    fn ask(text: &str, context: &UserContext) -> String {
        advisor().respond(&[ChatMessage::user(text)], context)
    }

    fn with_meds(names: &[&str]) -> UserContext {
        UserContext {
            medications: names.iter().map(|n| Medication::named(*n)).collect(),
            ..UserContext::default()
        }
    }

    #[test]
    fn test_greeting() {
        assert_eq!(ask("hello there", &UserContext::default()), GREETING);
    }

    #[test]
    fn test_interaction_without_medications() {
        assert_eq!(ask("is it safe with food?", &UserContext::default()), NO_MEDICATIONS);
    }

    #[test]
    fn test_interaction_alerts_for_medications() {
        let text = ask("any interaction?", &with_meds(&["Warfarin", "Aspirin"]));
        assert!(text.starts_with("Analyzing for your medications: **Warfarin, Aspirin**...\n\n"));
        assert!(text.contains("⚠️ **Potential alerts for Warfarin**:\n"));
        assert!(text.contains("🔴 **Spinach**: Vitamin K reduces effect\n"));
        assert!(text.contains("🟡 **Green Tea**: Minor\n"));
        assert!(!text.contains("Potential alerts for Aspirin"));
        assert!(text.ends_with(REVIEW_RECOMMENDATION));
    }

    #[test]
    fn test_interaction_nothing_found() {
        let text = ask("any interaction?", &with_meds(&["Aspirin"]));
        assert!(text.ends_with(NO_INTERACTIONS_FOUND));
    }

    #[test]
    fn test_side_effects_from_message_word() {
        let text = ask("side effects of metformin?", &UserContext::default());
        assert!(text.starts_with("### Safety Profile for **Metformin**\n\n"));
        assert!(text.contains("🚫 **Serious Side Effects** (Call doctor):\n- lactic acidosis\n\n"));
        assert!(text.contains("ℹ️ **Common Side Effects**:\n- nausea\n- diarrhea\n- gas\n"));
        assert!(!text.contains("bloating"));
        assert!(text.contains("\n**Used for:** Diabetes, Type 2"));
        assert!(text.ends_with("\n**Pregnancy Category:** B"));
    }

    #[test]
    fn test_side_effects_unknown_active_medication() {
        let text = ask("any side effect from my zyrtec", &with_meds(&["Zyrtec"]));
        assert_eq!(
            text,
            "I found 'Zyrtec' in your message, but I don't have detailed safety data for it yet."
        );
    }

    #[test]
    fn test_side_effects_without_target() {
        let text = ask("what are the side effects?", &UserContext::default());
        assert!(text.starts_with("Which medication are you asking about?"));
    }

    #[test]
    fn test_diet_summary_low_intake() {
        let context = UserContext {
            total_calories: 800.5,
            total_protein: 20.4,
            todays_meals: vec![serde_json::json!({"name": "Idli"})],
            ..UserContext::default()
        };
        let text = ask("how is my diet", &context);
        assert!(text.contains("- **Calories Today:** 800\n"));
        assert!(text.contains("- **Protein Today:** 20g\n"));
        assert!(text.contains("- **Meals Logged:** 1\n\n"));
        assert!(text.contains(LOW_INTAKE));
        assert!(text.ends_with(PROTEIN_TIP));
    }

    #[test]
    fn test_diet_summary_ranges() {
        let context = |cal: f64| UserContext {
            total_calories: cal,
            total_protein: 60.0,
            ..UserContext::default()
        };
        assert!(ask("daily stats", &context(1800.0)).ends_with(GOOD_INTAKE));
        assert!(ask("daily stats", &context(2600.0)).ends_with(HIGH_INTAKE));
        assert!(ask("daily stats", &context(1200.0)).ends_with(GOOD_INTAKE));
    }

    #[test]
    fn test_general_food_lookup_with_tip() {
        let text = ask("Is Idli good for diabetes?", &UserContext::default());
        assert!(text.starts_with("### **Nutrition Information: Idli**\n\n"));
        assert!(text.contains("✅ **Value:** 58 calories per 100g\n"));
        assert!(text.contains("💪 **Protein:** N/Ag\n\n"));
        assert!(text.contains("**Health Tip:** Pair idli with sambar for fiber.\n\n"));
    }

    #[test]
    fn test_general_drug_lookup() {
        let text = ask("metformin dosage", &UserContext::default());
        assert!(text.starts_with("### **Safety Info: Metformin**\n\n**Medical Use:** Diabetes, Type 2\n\n"));
    }

    #[test]
    fn test_general_knowledge_only() {
        let text = ask("managing diabetes", &UserContext::default());
        assert_eq!(text, "### **Diabetes Care**\n\nPair idli with sambar for fiber.\n\n");
    }

    #[test]
    fn test_general_help_fallback() {
        assert_eq!(ask("what can you do", &UserContext::default()), HELP_TEXT);
        assert_eq!(advisor().respond(&[], &UserContext::default()), HELP_TEXT);
    }
}
