//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, a body size
//! limit, and every endpoint handler.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use medinutri_core::config::MediNutriConfig;
use medinutri_core::error::MediNutriError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// Any origin may call the API. Compression skips `text/event-stream`, so
/// chat frames are flushed as they are produced.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let chat_routes = Router::new()
        .route("/ai/chat", post(handlers::chat))
        .route("/api/ai/chat", post(handlers::advisor_chat));

    let lookup_routes = Router::new()
        .route("/api/search/interactions", get(handlers::check_interaction))
        .route("/api/interactions/batch-check", post(handlers::batch_check))
        .route("/api/interactions/drug/{drug}", get(handlers::drug_interactions))
        .route("/api/search/foods", get(handlers::search_foods))
        .route("/api/search/drugs", get(handlers::search_drugs))
        .route("/api/search/autocomplete", get(handlers::autocomplete))
        .route("/api/food/{name}", get(handlers::food_details))
        .route("/api/drug/{name}", get(handlers::drug_details))
        .route("/api/drugs/side-effects/search", get(handlers::search_side_effects))
        .route("/api/drugs/side-effects/{drug}", get(handlers::side_effect_profile))
        .route("/api/stats", get(handlers::stats));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(chat_routes)
        .merge(lookup_routes)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB global limit
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured bind address and port.
pub async fn start_server(config: &MediNutriConfig, state: AppState) -> Result<(), MediNutriError> {
    let addr = format!("{}:{}", config.general.bind_address, config.general.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MediNutriError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| MediNutriError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
