//! Follow-up resolution across conversation turns.
//!
//! A short or pronoun-bearing message ("what about it?") borrows the subject
//! of an earlier user message, so entity matching sees both.

use medinutri_core::types::{ChatMessage, Role};

/// Markers showing the last message refers back to an earlier subject.
static PRONOUN_MARKERS: &[&str] = &[" it", " this", " that", " them", "about it", "about this"];

/// Prior messages containing these phrases never serve as the subject.
static NON_SUBSTANTIVE: &[&str] = &["tell me"];

/// Messages at most this long always look for a prior subject.
const SHORT_MESSAGE_LEN: usize = 10;

/// Prior user messages must be longer than this to be carried.
const MIN_SUBJECT_LEN: usize = 3;

// =============================================================================
// ContextResolver
// =============================================================================

/// Decides whether the current turn continues an earlier subject.
#[derive(Debug, Clone, Default)]
pub struct ContextResolver;

impl ContextResolver {
    pub fn new() -> Self {
        Self
    }

    /// Subject carried over from an earlier user message, if any.
    ///
    /// The last message must contain a pronoun marker or be short. The newest
    /// earlier user message that is long enough and not a bare request
    /// ("tell me ...") wins.
    pub fn resolve<'a>(&self, history: &'a [ChatMessage]) -> Option<&'a str> {
        let (last, prior) = history.split_last()?;
        if prior.is_empty() {
            return None;
        }

        let last_lower = last.content.to_lowercase();
        let has_marker = PRONOUN_MARKERS.iter().any(|m| last_lower.contains(m));
        if !has_marker && last_lower.chars().count() > SHORT_MESSAGE_LEN {
            return None;
        }

        prior
            .iter()
            .rev()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .find(|content| {
                let lower = content.to_lowercase();
                content.chars().count() > MIN_SUBJECT_LEN
                    && !NON_SUBSTANTIVE.iter().any(|p| lower.contains(p))
            })
    }

    /// The query entity matching should run on: the current message, extended
    /// with the carried subject when there is one.
    pub fn effective_query(&self, current: &str, history: &[ChatMessage]) -> String {
        match self.resolve(history) {
            Some(subject) => format!("{current} {subject}"),
            None => current.to_string(),
        }
    }
}
