//! The three similarity engines.
//!
//! Each engine is a pure function of the composition matrix and returns a
//! symmetric [`SimilarityMatrix`] over the matrix's sample order, so the
//! three results align index-for-index.
//!
//! | Metric    | Score                         | Degenerate case           |
//! |-----------|-------------------------------|---------------------------|
//! | Cosine    | `a·b / (‖a‖ ‖b‖)`             | either vector zero → 0    |
//! | Euclidean | `1 / (1 + ‖a − b‖)`           | none, always in (0, 1]    |
//! | Jaccard   | `|A ∩ B| / |A ∪ B|` (a > 0)    | empty union → 0           |

use forensim_common::error::{ForensimError, Result};
use forensim_common::entities::SampleKey;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matrix::{CompositionMatrix, SimilarityMatrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Jaccard,
    Euclidean,
    Cosine,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Jaccard, Metric::Euclidean, Metric::Cosine];

    /// Column header used in pair tables.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Jaccard => "Jaccard",
            Metric::Euclidean => "Euclidean",
            Metric::Cosine => "Cosine",
        }
    }
}

/// Cosine similarity of composition vectors.
pub fn cosine_similarity(matrix: &CompositionMatrix) -> SimilarityMatrix {
    let sq_norms: Vec<f64> = (0..matrix.n_samples())
        .map(|i| matrix.row(i).iter().map(|v| v * v).sum())
        .collect();

    SimilarityMatrix::from_pair_fn(matrix.samples().to_vec(), |i, j| {
        let denom = (sq_norms[i] * sq_norms[j]).sqrt();
        if denom == 0.0 {
            return 0.0;
        }
        let dot: f64 = matrix.row(i).iter().zip(matrix.row(j)).map(|(a, b)| a * b).sum();
        (dot / denom).clamp(0.0, 1.0)
    })
}

/// Euclidean distance mapped to a similarity, `1 / (1 + d)`.
pub fn euclidean_similarity(matrix: &CompositionMatrix) -> SimilarityMatrix {
    SimilarityMatrix::from_pair_fn(matrix.samples().to_vec(), |i, j| {
        let dist = matrix
            .row(i)
            .iter()
            .zip(matrix.row(j))
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        1.0 / (1.0 + dist)
    })
}

/// Jaccard similarity of substance-presence sets (value > 0 means present).
pub fn jaccard_similarity(matrix: &CompositionMatrix) -> SimilarityMatrix {
    let presence: Vec<Vec<bool>> = (0..matrix.n_samples())
        .map(|i| matrix.row(i).iter().map(|v| *v > 0.0).collect())
        .collect();

    SimilarityMatrix::from_pair_fn(matrix.samples().to_vec(), |i, j| {
        let (mut inter, mut union) = (0usize, 0usize);
        for (a, b) in presence[i].iter().zip(&presence[j]) {
            if *a && *b {
                inter += 1;
            }
            if *a || *b {
                union += 1;
            }
        }
        if union == 0 {
            0.0
        } else {
            inter as f64 / union as f64
        }
    })
}

/// The three per-metric matrices over one sample universe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricMatrices {
    pub jaccard: SimilarityMatrix,
    pub euclidean: SimilarityMatrix,
    pub cosine: SimilarityMatrix,
}

impl MetricMatrices {
    /// Run all three engines over the same matrix.
    pub fn compute(matrix: &CompositionMatrix) -> Self {
        let out = Self {
            jaccard: jaccard_similarity(matrix),
            euclidean: euclidean_similarity(matrix),
            cosine: cosine_similarity(matrix),
        };
        debug!("Computed metric matrices for {} samples", matrix.n_samples());
        out
    }

    /// Assemble from independently produced matrices; their sample orders must match.
    pub fn from_parts(
        jaccard: SimilarityMatrix,
        euclidean: SimilarityMatrix,
        cosine: SimilarityMatrix,
    ) -> Result<Self> {
        if jaccard.samples() != euclidean.samples() || jaccard.samples() != cosine.samples() {
            return Err(ForensimError::InvalidData(
                "metric matrices are not aligned on the same samples".into(),
            ));
        }
        Ok(Self { jaccard, euclidean, cosine })
    }

    pub fn samples(&self) -> &[SampleKey] {
        self.jaccard.samples()
    }

    pub fn get(&self, metric: Metric) -> &SimilarityMatrix {
        match metric {
            Metric::Jaccard => &self.jaccard,
            Metric::Euclidean => &self.euclidean,
            Metric::Cosine => &self.cosine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forensim_common::config::Aggregation;
    use forensim_test_utils::{random_records, records_from_rows};

    const EPS: f64 = 1e-12;

    /// A=[1,0] B=[0,1] C=[1,1] D=[0,0] E=[0,0]
    fn hand_matrix() -> CompositionMatrix {
        let records = records_from_rows(
            &["p", "q"],
            &[
                ("A", &[1.0, 0.0]),
                ("B", &[0.0, 1.0]),
                ("C", &[1.0, 1.0]),
                ("D", &[0.0, 0.0]),
                ("E", &[0.0, 0.0]),
            ],
        );
        CompositionMatrix::from_records(&records, Aggregation::Sum).unwrap()
    }

    #[test]
    fn test_cosine_hand_values() {
        let m = cosine_similarity(&hand_matrix());
        assert!((m.get(0, 1) - 0.0).abs() < EPS);
        assert!((m.get(0, 2) - 1.0 / 2f64.sqrt()).abs() < EPS);
        // zero vector guard
        assert_eq!(m.get(0, 3), 0.0);
        assert_eq!(m.get(3, 4), 0.0);
    }

    #[test]
    fn test_cosine_identical_vectors_exactly_one() {
        let records = records_from_rows(&["h", "c"], &[("X", &[60.0, 40.0]), ("Y", &[60.0, 40.0])]);
        let m = cosine_similarity(&CompositionMatrix::from_records(&records, Aggregation::Sum).unwrap());
        assert_eq!(m.get(0, 1), 1.0);
    }

    #[test]
    fn test_euclidean_hand_values() {
        let m = euclidean_similarity(&hand_matrix());
        assert!((m.get(0, 1) - 1.0 / (1.0 + 2f64.sqrt())).abs() < EPS);
        assert!((m.get(0, 2) - 0.5).abs() < EPS);
        // identical zero vectors are at distance 0
        assert!((m.get(3, 4) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_jaccard_hand_values() {
        let m = jaccard_similarity(&hand_matrix());
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.get(0, 2), 0.5);
        assert_eq!(m.get(1, 2), 0.5);
        // empty union
        assert_eq!(m.get(3, 4), 0.0);
    }

    #[test]
    fn test_jaccard_identical_presence_is_one() {
        // Different amounts, same substances present.
        let records = records_from_rows(&["h", "c", "p"], &[("X", &[1.0, 99.0, 0.0]), ("Y", &[50.0, 2.0, 0.0])]);
        let m = jaccard_similarity(&CompositionMatrix::from_records(&records, Aggregation::Sum).unwrap());
        assert_eq!(m.get(0, 1), 1.0);
    }

    #[test]
    fn test_engines_symmetric_unit_diagonal_and_bounded() {
        for seed in 0..8 {
            let records = random_records(seed, 12, 9);
            let matrix = CompositionMatrix::from_records(&records, Aggregation::Sum).unwrap();
            let all = MetricMatrices::compute(&matrix);
            for metric in Metric::ALL {
                let m = all.get(metric);
                for i in 0..m.len() {
                    assert_eq!(m.get(i, i), 1.0, "{metric:?} diagonal");
                    for j in 0..m.len() {
                        let s = m.get(i, j);
                        assert_eq!(s, m.get(j, i), "{metric:?} symmetry");
                        assert!((0.0..=1.0).contains(&s), "{metric:?} out of range: {s}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_engines_share_sample_order() {
        let matrix = hand_matrix();
        let all = MetricMatrices::compute(&matrix);
        assert_eq!(all.jaccard.samples(), matrix.samples());
        assert_eq!(all.euclidean.samples(), matrix.samples());
        assert_eq!(all.cosine.samples(), matrix.samples());
    }

    #[test]
    fn test_from_parts_rejects_misaligned() {
        let a = SimilarityMatrix::from_pair_fn(vec![SampleKey::from(1), SampleKey::from(2)], |_, _| 0.5);
        let b = SimilarityMatrix::from_pair_fn(vec![SampleKey::from(1), SampleKey::from(3)], |_, _| 0.5);
        let r = MetricMatrices::from_parts(a.clone(), a.clone(), b);
        assert!(matches!(r, Err(ForensimError::InvalidData(_))));
        assert!(MetricMatrices::from_parts(a.clone(), a.clone(), a).is_ok());
    }
}
