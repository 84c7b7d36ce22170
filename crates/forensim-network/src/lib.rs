//! forensim-network: Pair tables, annotation, edge filtering and graph construction.
//!
//! Data flows strictly forward:
//! metric matrices → fused pairs → annotated pairs → edges → graph.
//! [`pipeline::recompute`] runs the whole chain for one parameter set.

pub mod pairs;
pub mod annotation;
pub mod edges;
pub mod graph;
pub mod pipeline;
pub mod memo;
pub mod export;

pub use annotation::{annotate, derive_co_occurrence, AnnotatedPair, AnnotationIndex};
pub use edges::{filter_edges, ChemicalFilter, Edge, MATCH_ALL};
pub use graph::{GraphEdge, GraphNode, SimilarityGraph};
pub use pairs::{merge_metric_tables, MetricPair, ScoredPair};
pub use pipeline::{recompute, recompute_or_empty, Dataset, SimilarityParams, SimilarityResult};
pub use memo::MemoCache;
pub use export::{edges_to_csv_string, write_edges_csv};
