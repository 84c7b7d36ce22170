//! HTTP API tests against an in-memory dataset.
//!
//! Run with:
//! ```bash
//! cargo test --package forensim-web --test api
//! ```

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use forensim_common::config::{Aggregation, SimilarityDefaults};
use forensim_metrics::matrix::CompositionMatrix;
use forensim_network::{derive_co_occurrence, Dataset};
use forensim_test_utils::pretty_assertions::assert_eq;
use forensim_test_utils::xyz_records;
use forensim_web::router::build_router;
use forensim_web::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let matrix = CompositionMatrix::from_records(&xyz_records(), Aggregation::Sum).unwrap();
    let co = derive_co_occurrence(&matrix);
    let dataset = Dataset::from_matrix(&matrix, Some(co.as_slice()));
    build_router(AppState::new(dataset, SimilarityDefaults::default(), 16))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_dataset_size() {
    let app = app();
    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["samples"], 3);
    assert_eq!(body["substances"], 4);
}

#[tokio::test]
async fn substances_lead_with_all() {
    let app = app();
    let (_, body) = get_json(&app, "/api/substances").await;
    assert_eq!(body, json!(["All", "Caffeine", "Cocaine", "Heroin", "Lidocaine"]));
}

#[tokio::test]
async fn similarity_returns_single_identical_pair() {
    let app = app();
    let (status, body) = get_json(
        &app,
        "/api/similarity?w_jaccard=34&w_euclidean=33&w_cosine=33&threshold=50",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let edges = body["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["Sample_1"], "X");
    assert_eq!(edges[0]["Sample_2"], "Y");
    assert_eq!(edges[0]["Key_Substances"], "Caffeine, Heroin");
    assert_eq!(body["graph"]["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(body["status"], "Showing 1 sample pairs above threshold.");
}

#[tokio::test]
async fn zero_weights_degrade_to_empty_result() {
    let app = app();
    let (status, body) = get_json(&app, "/api/similarity?w_jaccard=0&w_euclidean=0&w_cosine=0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["edges"].as_array().unwrap().is_empty());
    assert!(body["status"].as_str().unwrap().starts_with("Error: "));
}

#[tokio::test]
async fn unknown_fusion_mode_is_rejected() {
    let app = app();
    let (status, body) = get_json(&app, "/api/similarity?fusion=harmonic").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("harmonic"));
}

#[tokio::test]
async fn chemical_filter_absent_substance_gives_no_edges() {
    let app = app();
    let (status, body) = get_json(&app, "/api/similarity?threshold=0&chemicals=Fentanyl").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["edges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn csv_export_has_fixed_columns() {
    let app = app();
    let (status, body) = send(
        &app,
        Request::get("/api/similarity/edges.csv?threshold=50").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Sample_1,Sample_2,Joint_Similarity,Key_Substances"));
    assert!(lines.next().unwrap().starts_with("X,Y,"));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn snapshot_missing_until_published() {
    let app = app();
    let (status, _) = get_json(&app, "/api/similarity/snapshot").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let params = json!({
        "weights": { "jaccard": 34.0, "euclidean": 33.0, "cosine": 33.0 },
        "threshold": 50.0
    });
    let (status, body) = send(
        &app,
        Request::post("/api/similarity/snapshot")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(params.to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let published: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(published["published"], true);
    assert_eq!(published["generation"], 1);

    let (status, snapshot) = get_json(&app, "/api/similarity/snapshot").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["generation"], 1);
    assert_eq!(snapshot["result"]["edges"].as_array().unwrap().len(), 1);
}
