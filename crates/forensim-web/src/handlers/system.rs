//! Liveness and dataset summary.

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub samples: usize,
    pub substances: usize,
    pub annotated_pairs: usize,
    /// Newest snapshot request number
    pub generation: u64,
}

/// GET /api/health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        samples: state.dataset.samples().len(),
        substances: state.dataset.substances().len(),
        annotated_pairs: state.dataset.annotations().len(),
        generation: state.latest_generation(),
    })
}
