//! Shared-substance annotations.
//!
//! A co-occurrence table lists one row per substance shared by two samples.
//! Rows are grouped by unordered pair, deduplicated, sorted and joined with
//! [`ANNOTATION_SEPARATOR`]. Pairs without rows get an empty annotation.

use std::collections::{BTreeSet, HashMap};

use forensim_common::entities::{unordered_pair, CoOccurrence, SampleKey};
use forensim_metrics::matrix::CompositionMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pairs::ScoredPair;

pub const ANNOTATION_SEPARATOR: &str = ", ";

/// A scored pair with its shared-substance annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPair {
    pub sample_a: SampleKey,
    pub sample_b: SampleKey,
    pub score: f64,
    /// Sorted, comma-joined substance names; never missing, possibly empty.
    pub shared_substances: String,
}

/// Annotation strings keyed by unordered sample pair.
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    by_pair: HashMap<(SampleKey, SampleKey), String>,
}

impl AnnotationIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_co_occurrence(rows: &[CoOccurrence]) -> Self {
        let mut grouped: HashMap<(SampleKey, SampleKey), BTreeSet<&str>> = HashMap::new();
        for row in rows {
            if row.sample_a == row.sample_b {
                continue;
            }
            let entry = grouped.entry(unordered_pair(&row.sample_a, &row.sample_b)).or_default();
            if let Some(name) = row.substance.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                entry.insert(name);
            }
        }

        let by_pair: HashMap<_, _> = grouped
            .into_iter()
            .map(|(pair, names)| (pair, names.into_iter().collect::<Vec<_>>().join(ANNOTATION_SEPARATOR)))
            .collect();
        debug!("Indexed shared substances for {} sample pairs", by_pair.len());
        Self { by_pair }
    }

    /// Annotation for a pair in either orientation; `""` when unknown.
    pub fn get(&self, a: &SampleKey, b: &SampleKey) -> &str {
        self.by_pair
            .get(&unordered_pair(a, b))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }
}

/// Attach annotations from a prebuilt index.
pub fn annotate_with(index: &AnnotationIndex, pairs: Vec<ScoredPair>) -> Vec<AnnotatedPair> {
    pairs
        .into_iter()
        .map(|p| {
            let shared_substances = index.get(&p.sample_a, &p.sample_b).to_string();
            AnnotatedPair {
                sample_a: p.sample_a,
                sample_b: p.sample_b,
                score: p.score,
                shared_substances,
            }
        })
        .collect()
}

/// Attach annotations from an optional co-occurrence table.
pub fn annotate(pairs: Vec<ScoredPair>, co_occurrence: Option<&[CoOccurrence]>) -> Vec<AnnotatedPair> {
    let index = co_occurrence
        .map(AnnotationIndex::from_co_occurrence)
        .unwrap_or_default();
    annotate_with(&index, pairs)
}

/// Build a co-occurrence table from the matrix: one row per substance
/// present in both samples of each unordered pair.
pub fn derive_co_occurrence(matrix: &CompositionMatrix) -> Vec<CoOccurrence> {
    let n = matrix.n_samples();
    let mut rows = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            for name in matrix.shared_substances(i, j) {
                rows.push(CoOccurrence {
                    sample_a: matrix.samples()[i].clone(),
                    sample_b: matrix.samples()[j].clone(),
                    substance: Some(name.to_string()),
                });
            }
        }
    }
    rows
}
