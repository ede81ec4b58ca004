//! Chat orchestrator: wires context, matching, interactions, and synthesis.
//!
//! Two engines share one dataset index. The entity engine answers from the
//! entities named in the conversation; the advisor answers by intent using
//! the caller's medications and intake. Both deliver through a
//! [`StreamEmitter`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use medinutri_core::config::{ChatConfig, MediNutriConfig};
use medinutri_core::types::{ChatMessage, Intent, Role, UserContext};
use medinutri_data::{schema, DatasetIndex, KnowledgeBase};

use crate::advisor::Advisor;
use crate::context::ContextResolver;
use crate::error::EngineError;
use crate::intent::{IntentClassifier, ToneDetector};
use crate::interaction::InteractionAggregator;
use crate::matcher::EntityMatcher;
use crate::response::ResponseSynthesizer;
use crate::stream::{Frame, FrameStream, StreamEmitter};

/// Outcome of one entity-engine turn.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub intent: Intent,
    pub conversational: bool,
    /// Query entity matching ran on, including any carried subject.
    pub effective_query: String,
    /// Total rows matched across kinds.
    pub matched: usize,
}

/// Central coordinator for both answer engines.
#[derive(Debug, Clone)]
pub struct ChatOrchestrator {
    matcher: EntityMatcher,
    context: ContextResolver,
    classifier: IntentClassifier,
    tone: ToneDetector,
    aggregator: InteractionAggregator,
    synthesizer: ResponseSynthesizer,
    advisor: Advisor,
    entity_emitter: StreamEmitter,
    advisor_emitter: StreamEmitter,
    config: ChatConfig,
}

impl ChatOrchestrator {
    pub fn new(index: Arc<DatasetIndex>, knowledge: Arc<KnowledgeBase>, config: &MediNutriConfig) -> Self {
        let stream = &config.stream;
        info!(
            records = index.stats().total_records,
            knowledge_entries = knowledge.len(),
            "Chat orchestrator ready"
        );
        Self {
            matcher: EntityMatcher::new(Arc::clone(&index), config.matching.clone()),
            context: ContextResolver::new(),
            classifier: IntentClassifier::new(),
            tone: ToneDetector::new(),
            aggregator: InteractionAggregator::new(Arc::clone(&index), config.matching.interaction_limit),
            synthesizer: ResponseSynthesizer::new(),
            advisor: Advisor::new(index, knowledge),
            entity_emitter: StreamEmitter::entity(
                stream.entity_chunk_words,
                Duration::from_millis(stream.entity_delay_ms),
            ),
            advisor_emitter: StreamEmitter::advisor(
                stream.advisor_chunk_words,
                Duration::from_millis(stream.advisor_delay_ms),
            ),
            config: config.chat.clone(),
        }
    }

    pub fn matcher(&self) -> &EntityMatcher {
        &self.matcher
    }

    pub fn aggregator(&self) -> &InteractionAggregator {
        &self.aggregator
    }

    pub fn index(&self) -> &DatasetIndex {
        self.matcher.index()
    }

    fn check_enabled(&self) -> Result<(), EngineError> {
        if self.config.enabled {
            Ok(())
        } else {
            Err(EngineError::Disabled)
        }
    }

    fn check_length(&self, message: &str) -> Result<(), EngineError> {
        if message.chars().count() > self.config.max_message_length {
            return Err(EngineError::MessageTooLong(self.config.max_message_length));
        }
        Ok(())
    }

    /// Answer the newest user message of `history` with the entity engine.
    pub fn answer(&self, history: &[ChatMessage]) -> Result<Answer, EngineError> {
        self.check_enabled()?;
        let current = history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .filter(|c| !c.is_empty())
            .ok_or(EngineError::EmptyHistory)?;
        self.check_length(current)?;

        let effective_query = self.context.effective_query(current, history);
        let matches = self.matcher.find_matches(&effective_query);
        let remedies = self.matcher.find_natural_remedies(&effective_query);
        let conversational = self.tone.is_conversational(current);
        let intent = self.classifier.classify(current);

        let drug_names: Vec<&str> = matches
            .medicine
            .iter()
            .map(|r| r.text(schema::DRUG_NAME))
            .collect();
        let item_names: Vec<&str> = matches
            .food
            .iter()
            .chain(&remedies.food)
            .map(|r| r.text(schema::FOOD_NAME))
            .chain(
                matches
                    .herb
                    .iter()
                    .chain(&remedies.herb)
                    .map(|r| r.text(schema::HERB_ENGLISH_NAME)),
            )
            .collect();
        let interactions = self.aggregator.get_interaction_specific(&drug_names, &item_names);

        debug!(
            intent = %intent,
            conversational,
            matched = matches.total(),
            remedies = remedies.food.len() + remedies.herb.len(),
            interactions = interactions.len(),
            "Entity engine turn"
        );

        let text = self
            .synthesizer
            .synthesize(current, &matches, &interactions, conversational, &remedies);

        Ok(Answer {
            text,
            intent,
            conversational,
            matched: matches.total(),
            effective_query,
        })
    }

    /// Paced entity-engine frames. A history without a user message yields
    /// only the sentinel.
    pub fn stream_answer(&self, history: &[ChatMessage]) -> Result<FrameStream, EngineError> {
        match self.answer(history) {
            Ok(answer) => Ok(self.entity_emitter.emit(&answer.text)),
            Err(EngineError::EmptyHistory) => Ok(FrameStream::new([Frame::Done], Duration::ZERO)),
            Err(e) => Err(e),
        }
    }

    /// Answer the last message of `history` with the advisor.
    pub fn advise(&self, history: &[ChatMessage], context: &UserContext) -> Result<String, EngineError> {
        self.check_enabled()?;
        if let Some(last) = history.last() {
            self.check_length(&last.content)?;
        }
        Ok(self.advisor.respond(history, context))
    }

    /// Paced advisor frames.
    pub fn stream_advice(&self, history: &[ChatMessage], context: &UserContext) -> Result<FrameStream, EngineError> {
        let text = self.advise(history, context)?;
        Ok(self.advisor_emitter.emit(&text))
    }
}
