//! Clinical knowledge matching and advisory engine for MediNutri.
//!
//! Matches foods, drugs, herbs, and diseases named in free-text queries,
//! carries conversational context across turns, classifies intent, ranks
//! food-drug interactions by severity, and synthesizes streamed answers.
//! Everything here is a deterministic rule system over the read-only
//! [`medinutri_data::DatasetIndex`].

pub mod advisor;
pub mod collect;
pub mod context;
pub mod error;
pub mod intent;
pub mod interaction;
pub mod matcher;
pub mod orchestrator;
pub mod response;
pub mod safety;
pub mod stream;

pub use advisor::Advisor;
pub use collect::{collect_up_to, Bounded};
pub use context::ContextResolver;
pub use error::EngineError;
pub use intent::{IntentClassifier, ToneDetector};
pub use interaction::{BatchReport, InteractionAggregator, InteractionReport, RiskyFoods, SeverityCounts};
pub use matcher::{EntityMatcher, EntityMatches, Remedies};
pub use orchestrator::{Answer, ChatOrchestrator};
pub use response::ResponseSynthesizer;
pub use safety::DrugSafetyProfile;
pub use stream::{Frame, FrameStream, StreamEmitter};
