//! Joint similarity: fuse the three metric scores into one.
//!
//! Arithmetic: S = w_jac·J + w_euc·E + w_cos·C
//! Geometric:  S = J^w_jac · E^w_euc · C^w_cos
//!
//! Weights are normalised before either formula is applied; with equal
//! weights the geometric form is the cube root of J·E·C.

use forensim_common::config::{FusionMode, WeightScale};
use forensim_common::error::Result;
use tracing::debug;

use crate::engines::MetricMatrices;
use crate::matrix::SimilarityMatrix;
use crate::normalise::clamp_unit;
use crate::weights::{MetricWeights, NormalisedWeights};

/// Fuse one pair's three metric scores.
pub fn fuse_scores(
    jaccard: f64,
    euclidean: f64,
    cosine: f64,
    weights: &NormalisedWeights,
    mode: FusionMode,
) -> f64 {
    let scores = [jaccard, euclidean, cosine];
    let weight_arr = weights.as_array();

    let fused: f64 = match mode {
        FusionMode::Arithmetic => scores
            .iter()
            .zip(weight_arr.iter())
            .map(|(s, w)| s * w)
            .sum(),
        // powf(0, 0) == 1, so a zero weight drops that metric from the product.
        FusionMode::Geometric => scores
            .iter()
            .zip(weight_arr.iter())
            .map(|(s, w)| s.max(0.0).powf(*w))
            .product(),
    };

    clamp_unit(fused)
}

/// Fuse aligned metric matrices into one joint similarity matrix.
pub fn fuse_matrices(
    matrices: &MetricMatrices,
    weights: &NormalisedWeights,
    mode: FusionMode,
) -> SimilarityMatrix {
    debug!(
        "Fusing {} samples ({:?}) with weights jac={:.3} euc={:.3} cos={:.3}",
        matrices.samples().len(),
        mode,
        weights.jaccard(),
        weights.euclidean(),
        weights.cosine()
    );

    SimilarityMatrix::from_pair_fn(matrices.samples().to_vec(), |i, j| {
        fuse_scores(
            matrices.jaccard.get(i, j),
            matrices.euclidean.get(i, j),
            matrices.cosine.get(i, j),
            weights,
            mode,
        )
    })
}

/// Validate and normalise user weights on `scale`, then fuse.
///
/// Fails with `InvalidWeight` before any score is computed.
pub fn fuse_weighted(
    matrices: &MetricMatrices,
    weights: &MetricWeights,
    scale: WeightScale,
    mode: FusionMode,
) -> Result<SimilarityMatrix> {
    let normed = weights.normalise(scale)?;
    Ok(fuse_matrices(matrices, &normed, mode))
}
