use axum::{extract::State, response::Json};
use forensim_network::MATCH_ALL;

use crate::state::SharedState;

/// GET /api/substances: chemical-filter options, `"All"` first.
pub async fn api_substances(State(state): State<SharedState>) -> Json<Vec<String>> {
    let mut options = Vec::with_capacity(state.dataset.substances().len() + 1);
    options.push(MATCH_ALL.to_string());
    options.extend(state.dataset.substances().iter().cloned());
    Json(options)
}
