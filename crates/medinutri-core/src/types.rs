use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Dataset kinds
// =============================================================================

/// A dataset category held by the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Foods with free-text descriptions and optional macros.
    Food,
    /// Drugs / medicines.
    Medicine,
    /// Herbs with function and indication fields.
    Herb,
    /// Diseases, keyed by their indication text.
    Disease,
    /// Drug to food/herb interaction records.
    Interaction,
    /// Drug safety profiles (side effects, pregnancy category).
    SideEffect,
}

impl EntityKind {
    /// Every kind, in load order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Food,
        EntityKind::Medicine,
        EntityKind::Disease,
        EntityKind::Herb,
        EntityKind::Interaction,
        EntityKind::SideEffect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Food => "food",
            EntityKind::Medicine => "medicine",
            EntityKind::Herb => "herb",
            EntityKind::Disease => "disease",
            EntityKind::Interaction => "interaction",
            EntityKind::SideEffect => "side_effect",
        }
    }

    /// Parse a kind name. Accepts `drug` as an alias for `medicine`.
    pub fn parse(name: &str) -> Option<EntityKind> {
        match name.trim().to_lowercase().as_str() {
            "food" => Some(EntityKind::Food),
            "medicine" | "drug" => Some(EntityKind::Medicine),
            "herb" => Some(EntityKind::Herb),
            "disease" => Some(EntityKind::Disease),
            "interaction" => Some(EntityKind::Interaction),
            "side_effect" => Some(EntityKind::SideEffect),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Severity and risk
// =============================================================================

/// Interaction severity. Labels outside the three ranks are not representable
/// here; callers keep the raw label and sort it last via [`severity_rank`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Parse an exact severity label (`High`, `Medium`, `Low`).
    pub fn from_label(label: &str) -> Option<Severity> {
        match label {
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// Sort rank: High 0, Medium 1, Low 2.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
        }
    }
}

/// Sort rank for a raw severity label. Unknown labels rank 3.
pub fn severity_rank(label: &str) -> u8 {
    Severity::from_label(label).map(|s| s.rank()).unwrap_or(3)
}

/// Verdict for a single food/drug pair check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Safe,
    Caution,
    Warning,
    Danger,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Caution => "caution",
            RiskLevel::Warning => "warning",
            RiskLevel::Danger => "danger",
        }
    }
}

/// Overall verdict for a batch check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchRisk {
    Safe,
    Low,
    Medium,
    High,
}

// =============================================================================
// Intent
// =============================================================================

/// Closed intent set for a chat turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    InteractionCheck,
    SideEffects,
    DietAdvice,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::InteractionCheck => "interaction_check",
            Intent::SideEffects => "side_effects",
            Intent::DietAdvice => "diet_advice",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Conversation input
// =============================================================================

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One message of the conversation history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An active medication from the user's profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    /// Any additional profile fields (dosage, schedule, ...), passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Medication {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Structured context supplied alongside the chat history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserContext {
    pub medications: Vec<Medication>,
    pub todays_meals: Vec<serde_json::Value>,
    pub total_calories: f64,
    pub total_protein: f64,
}

// =============================================================================
// Tests
// =============================================================================
