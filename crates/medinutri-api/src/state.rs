//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use medinutri_core::config::MediNutriConfig;
use medinutri_data::{DatasetIndex, KnowledgeBase};
use medinutri_engine::ChatOrchestrator;

/// Shared application state.
///
/// Everything is read-only after startup, so handlers clone `Arc`s and never
/// lock.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MediNutriConfig>,
    pub index: Arc<DatasetIndex>,
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: MediNutriConfig, index: Arc<DatasetIndex>, knowledge: Arc<KnowledgeBase>) -> Self {
        let orchestrator = ChatOrchestrator::new(Arc::clone(&index), knowledge, &config);
        Self {
            config: Arc::new(config),
            index,
            orchestrator: Arc::new(orchestrator),
            start_time: Instant::now(),
        }
    }
}
