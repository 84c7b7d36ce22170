//! Interactive recomputation and edge-list export.
//!
//! Parameter errors from the pipeline (bad weights, bad threshold) do not
//! fail the request: the response is an empty result whose status carries
//! the message. Only query strings that cannot be parsed at all are
//! rejected with 400.

use std::str::FromStr;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use forensim_common::config::{FusionMode, SimilarityDefaults, WeightScale};
use crate::error::ApiError;
use forensim_metrics::weights::MetricWeights;
use forensim_network::{edges_to_csv_string, ChemicalFilter, SimilarityParams, SimilarityResult};
use serde::Deserialize;

use crate::state::SharedState;

/// Query string of the similarity endpoints. Missing values fall back to
/// the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SimilarityQuery {
    pub w_jaccard: Option<f64>,
    pub w_euclidean: Option<f64>,
    pub w_cosine: Option<f64>,
    pub threshold: Option<f64>,
    /// Comma-separated substance names; `All` or empty disables the filter
    pub chemicals: Option<String>,
    pub fusion: Option<String>,
    pub scale: Option<WeightScale>,
}

impl SimilarityQuery {
    pub fn into_params(self, defaults: &SimilarityDefaults) -> Result<SimilarityParams, ApiError> {
        let fusion = match self.fusion.as_deref() {
            Some(raw) => FusionMode::from_str(raw).map_err(|e| ApiError::BadRequest(e.to_string()))?,
            None => defaults.fusion,
        };
        let chemical_filter = match self.chemicals.as_deref() {
            Some(raw) => ChemicalFilter::from_selection(raw.split(',')),
            None => ChemicalFilter::All,
        };
        Ok(SimilarityParams {
            weights: MetricWeights::new(
                self.w_jaccard.unwrap_or(defaults.jaccard),
                self.w_euclidean.unwrap_or(defaults.euclidean),
                self.w_cosine.unwrap_or(defaults.cosine),
            ),
            scale: self.scale.unwrap_or(defaults.scale),
            threshold: self.threshold.unwrap_or(defaults.threshold),
            chemical_filter,
            fusion,
        })
    }
}

/// GET /api/similarity: recompute and return edges, graph and status.
pub async fn api_similarity(
    State(state): State<SharedState>,
    Query(query): Query<SimilarityQuery>,
) -> Result<Json<SimilarityResult>, ApiError> {
    let params = query.into_params(&state.defaults)?;
    let result = state.compute(params).await;
    Ok(Json(result.as_ref().clone()))
}

/// GET /api/similarity/edges.csv: the same edge list as CSV.
pub async fn api_similarity_csv(
    State(state): State<SharedState>,
    Query(query): Query<SimilarityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let params = query.into_params(&state.defaults)?;
    let result = state.compute(params).await;
    let body = edges_to_csv_string(&result.edges)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"similarity_edges.csv\""),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let params = SimilarityQuery::default()
            .into_params(&SimilarityDefaults::default())
            .unwrap();
        assert_eq!(params, SimilarityParams::default());
    }

    #[test]
    fn test_chemicals_split_on_commas() {
        let q = SimilarityQuery {
            chemicals: Some("Heroin, Caffeine".into()),
            ..Default::default()
        };
        let params = q.into_params(&SimilarityDefaults::default()).unwrap();
        assert_eq!(params.chemical_filter, ChemicalFilter::from_selection(["Caffeine", "Heroin"]));
    }

    #[test]
    fn test_all_disables_filter() {
        let q = SimilarityQuery {
            chemicals: Some("All,Heroin".into()),
            ..Default::default()
        };
        let params = q.into_params(&SimilarityDefaults::default()).unwrap();
        assert_eq!(params.chemical_filter, ChemicalFilter::All);
    }

    #[test]
    fn test_unknown_fusion_is_bad_request() {
        let q = SimilarityQuery {
            fusion: Some("harmonic".into()),
            ..Default::default()
        };
        assert!(matches!(
            q.into_params(&SimilarityDefaults::default()),
            Err(ApiError::BadRequest(_))
        ));
    }
}
