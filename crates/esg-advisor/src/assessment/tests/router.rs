use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::assessment::{
    assessment_router, EsgRecommendationEngine, LocationContext, ScoringTables,
};

async fn post_assessment(state: crate::assessment::AssessmentState, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/esg/assessment")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let response = assessment_router(state)
        .oneshot(request)
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let payload = serde_json::from_slice(&bytes).expect("json body");
    (status, payload)
}

#[tokio::test]
async fn returns_ranked_recommendations() {
    let responses: Vec<Value> = (1..=QUESTION_COUNT)
        .map(|question_id| json!({ "question_id": question_id, "response": "No" }))
        .collect();

    let (status, body) = post_assessment(
        state_with(engine(), None),
        json!({ "project_type": "gas", "responses": responses }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project_type"], "gas");
    assert!(body["assessed_at"].is_string());
    assert_eq!(body["base_scores"]["environmental"], 0.0);
    let recommendations = body["recommendations"].as_array().expect("array");
    assert_eq!(recommendations.len(), 3);
    assert_eq!(recommendations[0]["category"], "environmental");
    assert_eq!(recommendations[0]["timeline"], "medium-term");
    assert_eq!(recommendations[0]["partners"][0]["type"], "certifier");
}

#[tokio::test]
async fn accepts_csv_responses_and_explicit_context() {
    let csv = (1..=QUESTION_COUNT)
        .map(|question_id| format!("{question_id},Yes"))
        .collect::<Vec<_>>()
        .join("\n");

    let (status, body) = post_assessment(
        state_with(engine(), None),
        json!({
            "project_type": "solar",
            "responses_csv": format!("question_id,response\n{csv}\n"),
            "location_context": { "demographic_index": 50.0, "environmental_justice_score": 50.0 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let environmental = body["adjusted_scores"]["environmental"]
        .as_f64()
        .expect("number");
    assert!((environmental - 88.0).abs() < 1e-9);
    assert_eq!(body["location_context"]["demographic_index"], 50.0);
    assert!(body.get("recommendations").map_or(false, |value| value
        .as_array()
        .map_or(false, |items| items.is_empty())));
}

#[tokio::test]
async fn rejects_malformed_csv() {
    let (status, body) = post_assessment(
        state_with(engine(), None),
        json!({ "project_type": "wind", "responses_csv": "question_id,response\nfirst,Yes\n" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("message")
        .contains("invalid survey CSV data"));
}

#[tokio::test]
async fn scoring_lookup_errors_are_unprocessable() {
    let mut tables = ScoringTables::standard();
    tables.esg_questions.remove("social");

    let (status, body) = post_assessment(
        state_with(EsgRecommendationEngine::new(tables), None),
        json!({ "project_type": "gas", "responses": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "score for category 'social' is missing");
}

#[tokio::test]
async fn location_lookups_require_a_provider() {
    let (status, _) = post_assessment(
        state_with(engine(), None),
        json!({ "project_type": "wind", "location": "Ames" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let context = LocationContext {
        demographic_index: Some(90.0),
        environmental_justice_score: None,
    };
    let (status, body) = post_assessment(
        state_with(engine(), Some(Arc::new(FixedContext(context)))),
        json!({ "project_type": "wind", "location": "Ames" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location_context"]["demographic_index"], 90.0);
}
