//! Pair-keyed score tables.
//!
//! The pipeline works on rows of (sample A, sample B, score). Rows come
//! either from the upper triangle of a fused matrix or from precomputed
//! per-metric pair tables joined on the ordered (A, B) key.

use std::collections::HashMap;

use forensim_common::config::FusionMode;
use forensim_common::entities::{PairScore, SampleKey};
use forensim_common::error::{ForensimError, Result};
use forensim_metrics::engines::Metric;
use forensim_metrics::fusion::fuse_scores;
use forensim_metrics::matrix::SimilarityMatrix;
use forensim_metrics::weights::NormalisedWeights;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One pair with all three metric scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPair {
    pub sample_a: SampleKey,
    pub sample_b: SampleKey,
    pub jaccard: f64,
    pub euclidean: f64,
    pub cosine: f64,
}

/// One pair with its joint score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPair {
    pub sample_a: SampleKey,
    pub sample_b: SampleKey,
    pub score: f64,
}

/// Every unordered pair of a fused matrix once, `a < b`.
pub fn pairs_from_matrix(fused: &SimilarityMatrix) -> Vec<ScoredPair> {
    fused
        .upper_pairs()
        .map(|(a, b, score)| ScoredPair {
            sample_a: a.clone(),
            sample_b: b.clone(),
            score,
        })
        .collect()
}

/// Fuse precomputed metric rows.
pub fn fuse_pairs(pairs: &[MetricPair], weights: &NormalisedWeights, mode: FusionMode) -> Vec<ScoredPair> {
    pairs
        .iter()
        .map(|p| ScoredPair {
            sample_a: p.sample_a.clone(),
            sample_b: p.sample_b.clone(),
            score: fuse_scores(p.jaccard, p.euclidean, p.cosine, weights, mode),
        })
        .collect()
}

fn index_table(metric: Metric, rows: &[PairScore]) -> Result<HashMap<(&SampleKey, &SampleKey), f64>> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        if !row.score.is_finite() {
            warn!(
                "Skipping {} row for ({}, {}): score {} is not finite",
                metric.column_name(),
                row.sample_a,
                row.sample_b,
                row.score
            );
            continue;
        }
        if !(0.0..=1.0).contains(&row.score) {
            return Err(ForensimError::InvalidData(format!(
                "{} score {} for ({}, {}) outside [0, 1]",
                metric.column_name(),
                row.score,
                row.sample_a,
                row.sample_b
            )));
        }
        if index.insert((&row.sample_a, &row.sample_b), row.score).is_some() {
            warn!(
                "Duplicate {} row for ({}, {}); keeping the last one",
                metric.column_name(),
                row.sample_a,
                row.sample_b
            );
        }
    }
    Ok(index)
}

/// Inner-join three single-metric pair tables on the ordered (A, B) key.
///
/// Output follows the Jaccard table's row order; self-pairs are dropped and
/// a pair missing from any table, or with a non-finite score, is left out.
pub fn merge_metric_tables(
    jaccard: &[PairScore],
    euclidean: &[PairScore],
    cosine: &[PairScore],
) -> Result<Vec<MetricPair>> {
    let jac = index_table(Metric::Jaccard, jaccard)?;
    let euc = index_table(Metric::Euclidean, euclidean)?;
    let cos = index_table(Metric::Cosine, cosine)?;

    let mut merged = Vec::with_capacity(jaccard.len());
    let mut seen = std::collections::HashSet::with_capacity(jaccard.len());
    for row in jaccard {
        let key = (&row.sample_a, &row.sample_b);
        if row.sample_a == row.sample_b || !seen.insert(key) {
            continue;
        }
        let (Some(j), Some(e), Some(c)) = (jac.get(&key), euc.get(&key), cos.get(&key)) else {
            continue;
        };
        merged.push(MetricPair {
            sample_a: row.sample_a.clone(),
            sample_b: row.sample_b.clone(),
            jaccard: *j,
            euclidean: *e,
            cosine: *c,
        });
    }

    debug!(
        "Merged pair tables: {} jaccard / {} euclidean / {} cosine rows -> {} pairs",
        jaccard.len(),
        euclidean.len(),
        cosine.len(),
        merged.len()
    );
    Ok(merged)
}
