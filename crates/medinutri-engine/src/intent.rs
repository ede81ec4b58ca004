//! Intent classification and conversational-tone detection.
//!
//! Both are table-driven: keyword buckets for intents, word-boundary regexes
//! for tone. The first bucket with a hit wins.

use std::sync::LazyLock;

use regex::Regex;

use medinutri_core::types::Intent;

/// Intent buckets in priority order.
static INTENT_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::InteractionCheck,
        &["interaction", "safe with", "mix with", "take with", "eat with"],
    ),
    (
        Intent::SideEffects,
        &["side effect", "reaction", "symptom", "adverse", "risk"],
    ),
    (
        Intent::DietAdvice,
        &[
            "analysis",
            "summary",
            "how is my diet",
            "daily stats",
            "progress today",
            "total calories",
        ],
    ),
    // Plain substrings, so "this" and "which" also read as greetings.
    (Intent::Greeting, &["hello", "hi", "hey"]),
];

static TONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bhello\b",
        r"(?i)\bhi\b",
        r"(?i)\bhey\b",
        r"(?i)\bgood morning\b",
        r"(?i)\bgood afternoon\b",
        r"(?i)\bgood evening\b",
        r"(?i)\bhow are you\b",
        r"(?i)\bthank\b",
        r"(?i)\bthanks\b",
        r"(?i)\bbye\b",
        r"(?i)\bsee you\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// =============================================================================
// IntentClassifier
// =============================================================================

/// Keyword classifier over the closed [`Intent`] set.
#[derive(Debug, Clone, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a message. Falls back to [`Intent::General`].
    pub fn classify(&self, text: &str) -> Intent {
        let lower = text.to_lowercase();
        INTENT_TABLE
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General)
    }
}

// =============================================================================
// ToneDetector
// =============================================================================

/// Flags greetings, thanks, and farewells.
#[derive(Debug, Clone, Default)]
pub struct ToneDetector;

impl ToneDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn is_conversational(&self, text: &str) -> bool {
        TONE_PATTERNS.iter().any(|re| re.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentClassifier::new().classify(text)
    }

    #[test]
    fn test_interaction_check() {
        assert_eq!(classify("Is grapefruit safe with statins?"), Intent::InteractionCheck);
        assert_eq!(classify("Any INTERACTION between these?"), Intent::InteractionCheck);
        assert_eq!(classify("can I take with food"), Intent::InteractionCheck);
    }

    #[test]
    fn test_side_effects() {
        assert_eq!(classify("What are side effects of Metformin?"), Intent::SideEffects);
        assert_eq!(classify("is there any risk"), Intent::SideEffects);
    }

    #[test]
    fn test_diet_advice() {
        assert_eq!(classify("How is my diet going?"), Intent::DietAdvice);
        assert_eq!(classify("show total calories"), Intent::DietAdvice);
    }

    #[test]
    fn test_greeting() {
        assert_eq!(classify("hello"), Intent::Greeting);
        assert_eq!(classify("Hey there"), Intent::Greeting);
    }

    #[test]
    fn test_greeting_substring_quirk() {
        // "which" contains "hi".
        assert_eq!(classify("which food"), Intent::Greeting);
    }

    #[test]
    fn test_priority_order() {
        // Interaction beats side effects and greeting.
        assert_eq!(classify("hi, any interaction risk?"), Intent::InteractionCheck);
        // Side effects beat diet advice.
        assert_eq!(classify("summary of adverse events"), Intent::SideEffects);
    }

    #[test]
    fn test_general_fallback() {
        assert_eq!(classify("calories in samosa"), Intent::General);
        assert_eq!(classify(""), Intent::General);
    }

    #[test]
    fn test_tone_word_boundaries() {
        let tone = ToneDetector::new();
        assert!(tone.is_conversational("Hi!"));
        assert!(tone.is_conversational("Good Morning, doctor"));
        assert!(tone.is_conversational("thanks a lot"));
        assert!(tone.is_conversational("see you later"));
        assert!(!tone.is_conversational("which food is good"));
        assert!(!tone.is_conversational("this is high in sugar"));
        assert!(!tone.is_conversational("diabetes"));
    }
}
