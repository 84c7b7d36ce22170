//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::get,
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    system::health,
    substances::api_substances,
    similarity::{api_similarity, api_similarity_csv},
    snapshot::{current_snapshot, publish_snapshot},
};
use crate::sse::sse_handler;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/api/health",     get(health))
        .route("/api/substances", get(api_substances))
        .route("/api/similarity", get(api_similarity))
        .route("/api/similarity/edges.csv", get(api_similarity_csv))
        .route("/api/similarity/snapshot",  get(current_snapshot).post(publish_snapshot))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
