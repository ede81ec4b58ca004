//! Route handler functions for all API endpoints.
//!
//! Each handler extracts query/path parameters via axum extractors, calls the
//! engine through [`AppState`], and returns JSON or an SSE stream.

use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use medinutri_core::types::{ChatMessage, EntityKind, UserContext};
use medinutri_data::{DatasetStats, InteractionEntry, Row};
use medinutri_engine::matcher::{DEFAULT_AUTOCOMPLETE_LIMIT, DEFAULT_SEARCH_LIMIT};
use medinutri_engine::{safety, BatchReport, DrugSafetyProfile, FrameStream, InteractionReport};

use crate::error::ApiError;
use crate::state::AppState;

/// Disclaimer attached to single food/drug checks.
pub const CHECK_MEDICAL_NOTE: &str =
    "Always consult your healthcare provider before making dietary changes while on medication.";

/// Disclaimer attached to batch checks.
pub const BATCH_MEDICAL_NOTE: &str =
    "⚕️ This is for informational purposes only. Always consult your healthcare provider.";

// =============================================================================
// Request and query parameter types
// =============================================================================

/// Body of `POST /ai/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Body of `POST /api/ai/chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub user_context: UserContext,
}

#[derive(Debug, Deserialize)]
pub struct InteractionParams {
    pub food: Option<String>,
    pub drug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchCheckRequest {
    #[serde(default)]
    pub foods: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct InteractionCheckResponse<'a> {
    pub success: bool,
    #[serde(flatten)]
    pub report: InteractionReport<'a>,
    pub medical_note: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BatchCheckResponse<'a> {
    pub success: bool,
    #[serde(flatten)]
    pub report: BatchReport<'a>,
    pub medical_note: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DrugInteractionsResponse<'a> {
    pub success: bool,
    pub drug: String,
    pub interactions: Vec<&'a InteractionEntry>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<'a> {
    pub success: bool,
    pub query: String,
    pub results: Vec<&'a Row>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    pub success: bool,
    pub query: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub suggestions: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SafetyProfileResponse {
    pub success: bool,
    pub drug: DrugSafetyProfile,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse<'a> {
    pub success: bool,
    #[serde(flatten)]
    pub record: RecordKind<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind<'a> {
    Food(&'a Row),
    Drug(&'a Row),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub collections: DatasetStats,
    pub total_records: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub uptime_secs: u64,
    pub total_records: usize,
}

// =============================================================================
// Helpers
// =============================================================================

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(format!(
            "Missing required parameter: {}",
            name
        ))),
    }
}

/// Wrap engine frames as server-sent events.
fn sse(frames: FrameStream) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send> {
    Sse::new(frames.map(|frame| Ok(Event::default().data(frame.data()))))
}

// =============================================================================
// Chat
// =============================================================================

/// POST /ai/chat - entity engine answer as an SSE stream.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>> + Send>, ApiError> {
    debug!(messages = request.messages.len(), "Entity chat request");
    let frames = state.orchestrator.stream_answer(&request.messages)?;
    Ok(sse(frames))
}

/// POST /api/ai/chat - advisor answer as an SSE stream.
///
/// A body that does not parse still gets a stream: one "System Error" frame
/// and the sentinel.
pub async fn advisor_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>> + Send>, ApiError> {
    let frames = match serde_json::from_slice::<AdvisorRequest>(&body) {
        Ok(request) => {
            debug!(
                messages = request.messages.len(),
                medications = request.user_context.medications.len(),
                "Advisor chat request"
            );
            state
                .orchestrator
                .stream_advice(&request.messages, &request.user_context)?
        }
        Err(e) => {
            warn!(error = %e, "Malformed advisor chat body");
            FrameStream::single(format!("System Error: {}", e))
        }
    };
    Ok(sse(frames))
}

// =============================================================================
// Interactions
// =============================================================================

/// GET /api/search/interactions?food=&drug=
pub async fn check_interaction(
    State(state): State<AppState>,
    Query(params): Query<InteractionParams>,
) -> Result<Response, ApiError> {
    let food = required(params.food, "food")?;
    let drug = required(params.drug, "drug")?;
    let report = state.orchestrator.aggregator().check(&food, &drug);
    Ok(Json(InteractionCheckResponse {
        success: true,
        report,
        medical_note: CHECK_MEDICAL_NOTE,
    })
    .into_response())
}

/// POST /api/interactions/batch-check
pub async fn batch_check(
    State(state): State<AppState>,
    Json(request): Json<BatchCheckRequest>,
) -> Response {
    let report = state
        .orchestrator
        .aggregator()
        .batch_check(&request.foods, &request.medications);
    Json(BatchCheckResponse {
        success: true,
        report,
        medical_note: BATCH_MEDICAL_NOTE,
    })
    .into_response()
}

/// GET /api/interactions/drug/{drug}
pub async fn drug_interactions(State(state): State<AppState>, Path(drug): Path<String>) -> Response {
    let interactions = state.orchestrator.aggregator().drug_interactions(&drug);
    Json(DrugInteractionsResponse {
        success: true,
        count: interactions.len(),
        drug,
        interactions,
    })
    .into_response()
}

// =============================================================================
// Search and lookups
// =============================================================================

fn search_kind(state: &AppState, kind: EntityKind, params: SearchParams) -> Result<Response, ApiError> {
    let query = required(params.q, "q")?;
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let results = state.orchestrator.matcher().search(kind, &query, limit);
    Ok(Json(SearchResponse {
        success: true,
        count: results.len(),
        query,
        results,
    })
    .into_response())
}

/// GET /api/search/foods?q=&limit=
pub async fn search_foods(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    search_kind(&state, EntityKind::Food, params)
}

/// GET /api/search/drugs?q=&limit=
pub async fn search_drugs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    search_kind(&state, EntityKind::Medicine, params)
}

/// GET /api/search/autocomplete?q=&type=&limit=
///
/// `type` selects drugs or herbs; anything else suggests foods.
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let query = required(params.q, "q")?;
    let kind_name = params.kind.unwrap_or_else(|| "food".to_string());
    let kind = match EntityKind::parse(&kind_name) {
        Some(kind @ (EntityKind::Medicine | EntityKind::Herb)) => kind,
        _ => EntityKind::Food,
    };
    let limit = params.limit.unwrap_or(DEFAULT_AUTOCOMPLETE_LIMIT);
    let suggestions = state.orchestrator.matcher().autocomplete(kind, &query, limit);

    Ok(Json(AutocompleteResponse {
        success: true,
        query,
        kind: kind_name,
        count: suggestions.len(),
        suggestions,
    }))
}

/// GET /api/food/{name} - exact, case-insensitive.
pub async fn food_details(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let row = state
        .orchestrator
        .matcher()
        .find_by_name(EntityKind::Food, &name)
        .ok_or_else(|| ApiError::NotFound("Food not found".to_string()))?;
    Ok(Json(RecordResponse {
        success: true,
        record: RecordKind::Food(row),
    })
    .into_response())
}

/// GET /api/drug/{name} - exact, case-insensitive.
pub async fn drug_details(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let row = state
        .orchestrator
        .matcher()
        .find_by_name(EntityKind::Medicine, &name)
        .ok_or_else(|| ApiError::NotFound("Drug not found".to_string()))?;
    Ok(Json(RecordResponse {
        success: true,
        record: RecordKind::Drug(row),
    })
    .into_response())
}

/// GET /api/drugs/side-effects/search?q=&limit=
pub async fn search_side_effects(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let query = required(params.q, "q")?;
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let results = safety::search(&state.index, &query, limit);
    Ok(Json(SearchResponse {
        success: true,
        count: results.len(),
        query,
        results,
    })
    .into_response())
}

/// GET /api/drugs/side-effects/{drug}
pub async fn side_effect_profile(
    State(state): State<AppState>,
    Path(drug): Path<String>,
) -> Result<Json<SafetyProfileResponse>, ApiError> {
    let profile = safety::lookup(&state.index, &drug)
        .ok_or_else(|| ApiError::NotFound("Drug safety profile not found".to_string()))?;
    Ok(Json(SafetyProfileResponse {
        success: true,
        drug: profile,
    }))
}

// =============================================================================
// Status
// =============================================================================

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let collections = state.index.stats();
    Json(StatsResponse {
        success: true,
        total_records: collections.total_records,
        collections,
    })
}

/// GET /health
///
/// Reports `degraded` when no dataset loaded; the engine still answers with
/// fallback text in that state.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let total_records = state.index.stats().total_records;
    let (status, message) = if total_records > 0 {
        ("healthy", "MediNutri API is fully operational")
    } else {
        ("degraded", "No datasets loaded")
    };
    Json(HealthResponse {
        status: status.to_string(),
        message: message.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_records,
    })
}
