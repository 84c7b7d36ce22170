//! Threshold, chemical filter, ordering and deduplication of pairs into edges.

use std::collections::{BTreeSet, HashSet};

use forensim_common::entities::{unordered_pair, SampleKey};
use forensim_common::error::{ForensimError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::{AnnotatedPair, ANNOTATION_SEPARATOR};

/// Selection value that disables the chemical filter.
pub const MATCH_ALL: &str = "All";

/// Restriction to pairs sharing at least one named substance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChemicalFilter {
    #[default]
    All,
    AnyOf(BTreeSet<String>),
}

impl ChemicalFilter {
    /// Build from a dropdown selection. An empty selection, or one that
    /// contains [`MATCH_ALL`], matches everything.
    pub fn from_selection<I, S>(selection: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = BTreeSet::new();
        for item in selection {
            let name = item.as_ref().trim();
            if name == MATCH_ALL {
                return ChemicalFilter::All;
            }
            if !name.is_empty() {
                names.insert(name.to_string());
            }
        }
        if names.is_empty() {
            ChemicalFilter::All
        } else {
            ChemicalFilter::AnyOf(names)
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ChemicalFilter::AnyOf(_))
    }

    /// Whether an annotation string names at least one required substance.
    pub fn matches(&self, annotation: &str) -> bool {
        match self {
            ChemicalFilter::All => true,
            ChemicalFilter::AnyOf(required) => annotation
                .split(ANNOTATION_SEPARATOR)
                .any(|name| required.contains(name.trim())),
        }
    }
}

/// A retained sample pair. Field names follow the exported table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "Sample_1")]
    pub sample_a: SampleKey,
    #[serde(rename = "Sample_2")]
    pub sample_b: SampleKey,
    #[serde(rename = "Joint_Similarity")]
    pub score: f64,
    #[serde(rename = "Key_Substances")]
    pub shared_substances: String,
}

/// Turn annotated pairs into the final edge list.
///
/// 1. chemical filter (when active)
/// 2. `score >= threshold`
/// 3. sort by score descending, then (A, B) ascending
/// 4. keep the first occurrence of each unordered pair; drop self-pairs
pub fn filter_edges(
    pairs: Vec<AnnotatedPair>,
    threshold: f64,
    filter: &ChemicalFilter,
) -> Result<Vec<Edge>> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(ForensimError::InvalidThreshold(format!(
            "threshold {threshold} outside [0, 1]"
        )));
    }
    let total = pairs.len();

    let mut kept: Vec<AnnotatedPair> = pairs
        .into_iter()
        .filter(|p| filter.matches(&p.shared_substances))
        .filter(|p| p.score >= threshold)
        .collect();

    kept.sort_by(|x, y| {
        y.score
            .total_cmp(&x.score)
            .then_with(|| x.sample_a.cmp(&y.sample_a))
            .then_with(|| x.sample_b.cmp(&y.sample_b))
    });

    let mut seen = HashSet::with_capacity(kept.len());
    let edges: Vec<Edge> = kept
        .into_iter()
        .filter(|p| p.sample_a != p.sample_b)
        .filter(|p| seen.insert(unordered_pair(&p.sample_a, &p.sample_b)))
        .map(|p| Edge {
            sample_a: p.sample_a,
            sample_b: p.sample_b,
            score: p.score,
            shared_substances: p.shared_substances,
        })
        .collect();

    debug!(
        "Filtered {} pairs to {} edges (threshold {:.3}, chemical filter active: {})",
        total,
        edges.len(),
        threshold,
        filter.is_active()
    );
    Ok(edges)
}
