//! One full recomputation: parameters in, edge list + graph + status out.
//!
//! The [`Dataset`] is built once by the host and shared immutably; every
//! call to [`recompute`] is a pure function of the dataset and the
//! [`SimilarityParams`].

use std::hash::{Hash, Hasher};

use forensim_common::config::{Aggregation, FusionMode, SimilarityDefaults, WeightScale};
use forensim_common::entities::{CoOccurrence, CompositionRecord, PairScore, SampleKey};
use forensim_common::error::Result;
use forensim_metrics::engines::MetricMatrices;
use forensim_metrics::fusion::fuse_matrices;
use forensim_metrics::matrix::CompositionMatrix;
use forensim_metrics::normalise::normalise_threshold;
use forensim_metrics::weights::MetricWeights;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::annotation::{annotate_with, AnnotationIndex};
use crate::edges::{filter_edges, ChemicalFilter, Edge};
use crate::graph::SimilarityGraph;
use crate::pairs::{fuse_pairs, merge_metric_tables, pairs_from_matrix, MetricPair};

/// Where the per-metric scores come from.
#[derive(Debug, Clone)]
pub enum MetricSource {
    /// Computed from a composition matrix.
    Matrices(MetricMatrices),
    /// Joined from precomputed pair tables.
    PairTable(Vec<MetricPair>),
}

/// Immutable input to every recomputation.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Vec<SampleKey>,
    substances: Vec<String>,
    source: MetricSource,
    annotations: AnnotationIndex,
}

impl Dataset {
    /// Build from an existing composition matrix.
    pub fn from_matrix(matrix: &CompositionMatrix, co_occurrence: Option<&[CoOccurrence]>) -> Self {
        let matrices = MetricMatrices::compute(matrix);
        let annotations = co_occurrence
            .map(AnnotationIndex::from_co_occurrence)
            .unwrap_or_default();
        info!(
            "Dataset ready: {} samples, {} substances, {} annotated pairs",
            matrix.n_samples(),
            matrix.n_substances(),
            annotations.len()
        );
        Self {
            samples: matrix.samples().to_vec(),
            substances: matrix.substances().to_vec(),
            source: MetricSource::Matrices(matrices),
            annotations,
        }
    }

    /// Pivot raw records and compute all three metric matrices.
    pub fn from_records(
        records: &[CompositionRecord],
        aggregation: Aggregation,
        co_occurrence: Option<&[CoOccurrence]>,
    ) -> Result<Self> {
        let matrix = CompositionMatrix::from_records(records, aggregation)?;
        Ok(Self::from_matrix(&matrix, co_occurrence))
    }

    /// Join precomputed per-metric pair tables.
    pub fn from_pair_tables(
        jaccard: &[PairScore],
        euclidean: &[PairScore],
        cosine: &[PairScore],
        co_occurrence: Option<&[CoOccurrence]>,
    ) -> Result<Self> {
        let merged = merge_metric_tables(jaccard, euclidean, cosine)?;
        let mut samples: Vec<SampleKey> = merged
            .iter()
            .flat_map(|p| [p.sample_a.clone(), p.sample_b.clone()])
            .collect();
        samples.sort();
        samples.dedup();

        let mut substances: Vec<String> = co_occurrence
            .unwrap_or_default()
            .iter()
            .filter_map(|row| row.substance.as_deref().map(str::trim))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        substances.sort();
        substances.dedup();

        let annotations = co_occurrence
            .map(AnnotationIndex::from_co_occurrence)
            .unwrap_or_default();
        info!(
            "Dataset ready from pair tables: {} samples, {} pairs",
            samples.len(),
            merged.len()
        );
        Ok(Self {
            samples,
            substances,
            source: MetricSource::PairTable(merged),
            annotations,
        })
    }

    pub fn samples(&self) -> &[SampleKey] {
        &self.samples
    }

    /// Observed substance names, sorted; the chemical-filter options.
    pub fn substances(&self) -> &[String] {
        &self.substances
    }

    pub fn source(&self) -> &MetricSource {
        &self.source
    }

    pub fn annotations(&self) -> &AnnotationIndex {
        &self.annotations
    }
}

/// Everything a user can change between recomputations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityParams {
    pub weights: MetricWeights,
    #[serde(default)]
    pub scale: WeightScale,
    pub threshold: f64,
    #[serde(default)]
    pub chemical_filter: ChemicalFilter,
    #[serde(default)]
    pub fusion: FusionMode,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self::from_defaults(&SimilarityDefaults::default())
    }
}

impl SimilarityParams {
    pub fn from_defaults(d: &SimilarityDefaults) -> Self {
        Self {
            weights: MetricWeights::from(d),
            scale: d.scale,
            threshold: d.threshold,
            chemical_filter: ChemicalFilter::All,
            fusion: d.fusion,
        }
    }

    fn bits(&self) -> [u64; 4] {
        [
            self.weights.jaccard.to_bits(),
            self.weights.euclidean.to_bits(),
            self.weights.cosine.to_bits(),
            self.threshold.to_bits(),
        ]
    }
}

// Float fields compare by bit pattern so params can key a memo cache.
impl PartialEq for SimilarityParams {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
            && self.scale == other.scale
            && self.chemical_filter == other.chemical_filter
            && self.fusion == other.fusion
    }
}

impl Eq for SimilarityParams {}

impl Hash for SimilarityParams {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
        self.scale.hash(state);
        self.chemical_filter.hash(state);
        self.fusion.hash(state);
    }
}

/// Output of one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub edges: Vec<Edge>,
    pub graph: SimilarityGraph,
    /// Human-readable summary, ready for display.
    pub status: String,
}

impl SimilarityResult {
    /// No edges, no graph, just a message.
    pub fn empty(status: impl Into<String>) -> Self {
        Self {
            edges: Vec::new(),
            graph: SimilarityGraph::empty(),
            status: status.into(),
        }
    }
}

pub fn status_message(edge_count: usize) -> String {
    format!("Showing {edge_count} sample pairs above threshold.")
}

/// Run fusion, annotation, filtering and graph construction.
///
/// Weights and threshold are validated before any score is fused.
pub fn recompute(dataset: &Dataset, params: &SimilarityParams) -> Result<SimilarityResult> {
    let weights = params.weights.normalise(params.scale)?;
    let threshold = normalise_threshold(params.threshold, params.scale)?;

    let scored = match &dataset.source {
        MetricSource::Matrices(m) => pairs_from_matrix(&fuse_matrices(m, &weights, params.fusion)),
        MetricSource::PairTable(rows) => fuse_pairs(rows, &weights, params.fusion),
    };
    let annotated = annotate_with(&dataset.annotations, scored);
    let edges = filter_edges(annotated, threshold, &params.chemical_filter)?;
    let graph = SimilarityGraph::from_edges(&edges);

    info!(
        "Recomputed similarity network: {} edges, {} nodes (fusion {:?}, threshold {:.3})",
        edges.len(),
        graph.node_count(),
        params.fusion,
        threshold
    );

    Ok(SimilarityResult {
        status: status_message(edges.len()),
        edges,
        graph,
    })
}

/// Calling-layer variant of [`recompute`]: any error becomes an empty
/// result whose status carries the message.
pub fn recompute_or_empty(dataset: &Dataset, params: &SimilarityParams) -> SimilarityResult {
    match recompute(dataset, params) {
        Ok(result) => result,
        Err(e) => {
            warn!("Recomputation failed: {}", e);
            SimilarityResult::empty(format!("Error: {e}"))
        }
    }
}
