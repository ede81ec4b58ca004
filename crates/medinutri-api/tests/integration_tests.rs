//! Integration tests for the MediNutri API.
//!
//! Every test builds its own router over a small in-memory dataset with
//! stream pacing turned off, then drives it with `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use medinutri_api::error::ErrorBody;
use medinutri_api::handlers::{
    AutocompleteResponse, HealthResponse, StatsResponse, BATCH_MEDICAL_NOTE, CHECK_MEDICAL_NOTE,
};
use medinutri_api::{create_router, AppState};
use medinutri_core::config::MediNutriConfig;
use medinutri_core::types::EntityKind;
use medinutri_data::{DatasetIndex, KnowledgeBase, Row};

// =============================================================================
// Helpers
// =============================================================================

fn test_index() -> DatasetIndex {
    DatasetIndex::new()
        .with_rows(
            EntityKind::Food,
            vec![
                Row::from_pairs([
                    ("Food_Name", "Spinach"),
                    ("Description", "Leafy green rich in vitamin K"),
                    ("Calories", "23"),
                    ("Protein", "2.9"),
                ]),
                Row::from_pairs([
                    ("Food_Name", "Grapefruit"),
                    ("Description", "Citrus fruit"),
                    ("Calories", "42"),
                    ("Protein", "0.8"),
                ]),
                Row::from_pairs([
                    ("Food_Name", "Milk"),
                    ("Description", "Dairy drink"),
                    ("Calories", "61"),
                    ("Protein", "3.2"),
                ]),
            ],
        )
        .with_rows(
            EntityKind::Medicine,
            vec![
                Row::from_pairs([("Drug_Name", "Warfarin")]),
                Row::from_pairs([("Drug_Name", "Atorvastatin")]),
            ],
        )
        .with_rows(
            EntityKind::Interaction,
            vec![
                Row::from_pairs([
                    ("Drug_Name", "Atorvastatin"),
                    ("Food_Herb_Name", "Grapefruit"),
                    ("Severity", "Medium"),
                    ("Conclusion", "Raises statin levels"),
                ]),
                Row::from_pairs([
                    ("Drug_Name", "Warfarin"),
                    ("Food_Herb_Name", "Spinach"),
                    ("Severity", "High"),
                    ("Conclusion", "Vitamin K reduces anticoagulant effect"),
                ]),
            ],
        )
        .with_rows(
            EntityKind::SideEffect,
            vec![Row::from_pairs([
                ("drug_name", "Glucophage"),
                ("generic_name", "metformin"),
                ("medical_condition", "Diabetes, Type 2"),
                ("side_effects_common", "nausea; diarrhea"),
                ("side_effects_severe", "lactic acidosis"),
                ("pregnancy_category", "B"),
            ])],
        )
}

fn test_config() -> MediNutriConfig {
    let mut config = MediNutriConfig::default();
    config.stream.entity_delay_ms = 0;
    config.stream.advisor_delay_ms = 0;
    config
}

fn make_app_with(config: MediNutriConfig, index: DatasetIndex) -> axum::Router {
    create_router(AppState::new(
        config,
        Arc::new(index),
        Arc::new(KnowledgeBase::default()),
    ))
}

fn make_app() -> axum::Router {
    make_app_with(test_config(), test_index())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

/// Split an SSE body into its `data:` payloads.
async fn sse_payloads(resp: axum::response::Response) -> Vec<String> {
    let text = String::from_utf8(body_bytes(resp).await).unwrap();
    text.split("\n\n")
        .filter_map(|event| event.strip_prefix("data: "))
        .map(str::to_string)
        .collect()
}

/// Concatenated delta text of an SSE body, checking the sentinel comes last.
async fn sse_text(resp: axum::response::Response) -> String {
    let payloads = sse_payloads(resp).await;
    assert_eq!(payloads.last().map(String::as_str), Some("[DONE]"));
    payloads[..payloads.len() - 1]
        .iter()
        .map(|p| {
            let v: Value = serde_json::from_str(p).unwrap();
            v["choices"][0]["delta"]["content"].as_str().unwrap().to_string()
        })
        .collect()
}

// =============================================================================
// Status endpoints
// =============================================================================

#[tokio::test]
async fn test_health_happy_path() {
    let resp = make_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.total_records, 8);
}

#[tokio::test]
async fn test_health_degraded_without_data() {
    let app = make_app_with(test_config(), DatasetIndex::new());
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "degraded");
}

#[tokio::test]
async fn test_stats_counts_per_kind() {
    let resp = make_app().oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let stats: StatsResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(stats.collections.foods, 3);
    assert_eq!(stats.collections.medicines, 2);
    assert_eq!(stats.collections.interactions, 2);
    assert_eq!(stats.collections.side_effects, 1);
    assert_eq!(stats.total_records, 8);
}

// =============================================================================
// Chat streams
// =============================================================================

#[tokio::test]
async fn test_entity_chat_streams_answer() {
    let body = r#"{"messages":[{"role":"user","content":"Can I eat spinach with warfarin?"}]}"#;
    let resp = make_app().oneshot(post_json("/ai/chat", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
    let text = sse_text(resp).await;
    assert!(text.starts_with("🍎 **Spinach**: Leafy green rich in vitamin K"));
    assert!(text.contains("⚠️ **Interaction**: Warfarin + Spinach"));
}

#[tokio::test]
async fn test_entity_chat_empty_history_only_sentinel() {
    let resp = make_app()
        .oneshot(post_json("/ai/chat", r#"{"messages":[]}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(sse_payloads(resp).await, vec!["[DONE]".to_string()]);
}

#[tokio::test]
async fn test_entity_chat_rejects_long_message() {
    let mut config = test_config();
    config.chat.max_message_length = 5;
    let app = make_app_with(config, test_index());
    let body = r#"{"messages":[{"role":"user","content":"spinach and warfarin"}]}"#;
    let resp = app.oneshot(post_json("/ai/chat", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let err: ErrorBody = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(err.error, "payload_too_large");
}

#[tokio::test]
async fn test_chat_disabled_returns_503() {
    let mut config = test_config();
    config.chat.enabled = false;
    let app = make_app_with(config, test_index());
    let body = r#"{"messages":[{"role":"user","content":"hello"}]}"#;
    let resp = app.oneshot(post_json("/api/ai/chat", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_advisor_chat_uses_user_context() {
    let body = r#"{
        "messages": [{"role": "user", "content": "any interaction with my food?"}],
        "userContext": {"medications": [{"name": "Warfarin", "dosage": "5mg"}]}
    }"#;
    let resp = make_app().oneshot(post_json("/api/ai/chat", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let text = sse_text(resp).await;
    assert!(text.contains("Warfarin"));
    assert!(text.contains("🔴 **Spinach**"));
}

#[tokio::test]
async fn test_advisor_chat_malformed_body_streams_system_error() {
    let resp = make_app()
        .oneshot(post_json("/api/ai/chat", "{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let text = sse_text(resp).await;
    assert!(text.starts_with("System Error: "));
}

// =============================================================================
// Interactions
// =============================================================================

#[tokio::test]
async fn test_interaction_check_found() {
    let resp = make_app()
        .oneshot(get("/api/search/interactions?food=spinach&drug=warfarin"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["has_interaction"], true);
    assert_eq!(json["risk_level"], "danger");
    assert_eq!(json["count"], 1);
    assert_eq!(json["severity_breakdown"]["high"], 1);
    assert_eq!(json["interactions"][0]["Food_Herb_Name"], "Spinach");
    assert_eq!(json["medical_note"], CHECK_MEDICAL_NOTE);
}

#[tokio::test]
async fn test_interaction_check_safe_pair() {
    let resp = make_app()
        .oneshot(get("/api/search/interactions?food=milk&drug=warfarin"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["has_interaction"], false);
    assert_eq!(json["risk_level"], "safe");
}

#[tokio::test]
async fn test_interaction_check_missing_param() {
    let resp = make_app()
        .oneshot(get("/api/search/interactions?food=spinach"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(err.message.contains("drug"));
}

#[tokio::test]
async fn test_batch_check_partitions_foods() {
    let body = r#"{"foods":["Spinach","Grapefruit","Milk"],"medications":["Warfarin","Atorvastatin"]}"#;
    let resp = make_app()
        .oneshot(post_json("/api/interactions/batch-check", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["interactions_found"], 2);
    assert_eq!(json["risky_foods"]["high_risk"][0], "Spinach");
    assert_eq!(json["risky_foods"]["medium_risk"][0], "Grapefruit");
    assert_eq!(json["safe_foods"], serde_json::json!(["Milk"]));
    assert_eq!(json["overall_risk"], "high");
    assert_eq!(json["medical_note"], BATCH_MEDICAL_NOTE);
}

#[tokio::test]
async fn test_batch_check_empty_lists() {
    let resp = make_app()
        .oneshot(post_json("/api/interactions/batch-check", r#"{"foods":["Milk"]}"#))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["message"], "No interactions to check");
    assert_eq!(json["safe_foods"], serde_json::json!(["Milk"]));
}

#[tokio::test]
async fn test_drug_interactions_sorted() {
    let resp = make_app()
        .oneshot(get("/api/interactions/drug/in"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["interactions"][0]["Severity"], "High");
    assert_eq!(json["interactions"][1]["Severity"], "Medium");
}

// =============================================================================
// Search and lookups
// =============================================================================

#[tokio::test]
async fn test_search_foods_and_drugs() {
    let app = make_app();
    let json = body_json(app.clone().oneshot(get("/api/search/foods?q=GRAPE")).await.unwrap()).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["Food_Name"], "Grapefruit");

    let json = body_json(app.oneshot(get("/api/search/drugs?q=statin")).await.unwrap()).await;
    assert_eq!(json["results"][0]["Drug_Name"], "Atorvastatin");
}

#[tokio::test]
async fn test_search_requires_query() {
    let resp = make_app().oneshot(get("/api/search/foods")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_autocomplete_by_type() {
    let app = make_app();
    let resp = app
        .clone()
        .oneshot(get("/api/search/autocomplete?q=in&type=drug"))
        .await
        .unwrap();
    let auto: AutocompleteResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(auto.suggestions, vec!["Warfarin", "Atorvastatin"]);
    assert_eq!(auto.kind, "drug");

    let resp = app
        .oneshot(get("/api/search/autocomplete?q=i&limit=2"))
        .await
        .unwrap();
    let auto: AutocompleteResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(auto.suggestions, vec!["Spinach", "Grapefruit"]);
    assert_eq!(auto.count, 2);
}

#[tokio::test]
async fn test_food_and_drug_details() {
    let app = make_app();
    let json = body_json(app.clone().oneshot(get("/api/food/spinach")).await.unwrap()).await;
    assert_eq!(json["food"]["Calories"], "23");

    let resp = app.clone().oneshot(get("/api/food/spin")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let json = body_json(app.oneshot(get("/api/drug/WARFARIN")).await.unwrap()).await;
    assert_eq!(json["drug"]["Drug_Name"], "Warfarin");
}

#[tokio::test]
async fn test_side_effect_lookups() {
    let app = make_app();
    let json = body_json(
        app.clone()
            .oneshot(get("/api/drugs/side-effects/search?q=metf"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["count"], 1);

    let json = body_json(
        app.clone()
            .oneshot(get("/api/drugs/side-effects/metformin"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["drug"]["drug_name"], "Glucophage");
    assert_eq!(
        json["drug"]["side_effects_common"],
        serde_json::json!(["nausea", "diarrhea"])
    );

    let resp = app
        .oneshot(get("/api/drugs/side-effects/unknown"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
