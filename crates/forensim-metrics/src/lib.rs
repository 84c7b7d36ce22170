//! forensim-metrics: Composition matrix, similarity engines and score fusion.

pub mod matrix;
pub mod engines;
pub mod weights;
pub mod normalise;
pub mod fusion;

pub use matrix::{CompositionMatrix, SimilarityMatrix};
pub use engines::{Metric, MetricMatrices};
pub use weights::{MetricWeights, NormalisedWeights};
pub use fusion::{fuse_matrices, fuse_scores, fuse_weighted};
