//! Published snapshot: the result every dashboard client shows.

use std::sync::Arc;

use axum::{extract::State, response::Json};
use crate::error::ApiError;
use forensim_network::{SimilarityParams, SimilarityResult};
use serde::Serialize;

use crate::state::{SharedState, Snapshot};

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub generation: u64,
    /// False when a newer request started before this one finished
    pub published: bool,
    pub result: SimilarityResult,
}

/// POST /api/similarity/snapshot: recompute and publish (last request wins).
pub async fn publish_snapshot(
    State(state): State<SharedState>,
    Json(params): Json<SimilarityParams>,
) -> Json<PublishResponse> {
    let generation = state.begin_request();
    let result = state.compute(params.clone()).await;
    let published = state.publish(generation, params, &result).await;
    Json(PublishResponse {
        generation,
        published,
        result: result.as_ref().clone(),
    })
}

/// GET /api/similarity/snapshot
pub async fn current_snapshot(State(state): State<SharedState>) -> Result<Json<Snapshot>, ApiError> {
    let snapshot: Arc<Snapshot> = state
        .snapshot()
        .await
        .ok_or_else(|| ApiError::NotFound("no snapshot has been published yet".into()))?;
    Ok(Json(snapshot.as_ref().clone()))
}
