//! Dense sample × substance composition matrix and square similarity matrices.

use std::collections::{BTreeMap, BTreeSet};

use forensim_common::config::Aggregation;
use forensim_common::entities::{CompositionRecord, SampleKey};
use forensim_common::error::{ForensimError, Result};
use serde::Serialize;
use tracing::debug;

/// Relative areas of every observed substance in every observed sample.
///
/// Rows are samples, columns are substances, both in ascending order.
/// Absent (sample, substance) combinations are 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionMatrix {
    samples: Vec<SampleKey>,
    substances: Vec<String>,
    /// Row-major, `samples.len() * substances.len()` entries.
    values: Vec<f64>,
}

#[derive(Default)]
struct Cell {
    sum: f64,
    count: usize,
    last: f64,
}

impl CompositionMatrix {
    /// Pivot composition records into a dense matrix.
    ///
    /// Duplicate (sample, substance) records are combined with `aggregation`.
    pub fn from_records(records: &[CompositionRecord], aggregation: Aggregation) -> Result<Self> {
        if records.is_empty() {
            return Err(ForensimError::InvalidData("no composition records".into()));
        }

        let mut cells: BTreeMap<(&SampleKey, &str), Cell> = BTreeMap::new();
        for (row, rec) in records.iter().enumerate() {
            if rec.sample.is_empty() {
                return Err(ForensimError::InvalidData(format!("row {row}: empty sample key")));
            }
            let substance = rec.substance.trim();
            if substance.is_empty() {
                return Err(ForensimError::InvalidData(format!(
                    "row {row}: empty substance name for sample {}",
                    rec.sample
                )));
            }
            if !rec.relative_area.is_finite() || rec.relative_area < 0.0 {
                return Err(ForensimError::InvalidData(format!(
                    "row {row}: relative area {} for sample {} / {} must be a finite value >= 0",
                    rec.relative_area, rec.sample, substance
                )));
            }
            let cell = cells.entry((&rec.sample, substance)).or_default();
            cell.sum += rec.relative_area;
            cell.count += 1;
            cell.last = rec.relative_area;
        }

        let samples: Vec<SampleKey> = cells
            .keys()
            .map(|(s, _)| (*s).clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let substances: Vec<String> = cells
            .keys()
            .map(|(_, sub)| sub.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let n_sub = substances.len();
        let mut values = vec![0.0f64; samples.len() * n_sub];
        for ((sample, substance), cell) in &cells {
            // Both lookups succeed: the universes were built from these keys.
            let (Ok(i), Ok(j)) = (
                samples.binary_search(*sample),
                substances.binary_search_by(|s| s.as_str().cmp(*substance)),
            ) else {
                continue;
            };
            values[i * n_sub + j] = match aggregation {
                Aggregation::Sum => cell.sum,
                Aggregation::Mean => cell.sum / cell.count as f64,
                Aggregation::Last => cell.last,
            };
        }

        debug!(
            "Built composition matrix: {} samples x {} substances from {} records",
            samples.len(),
            n_sub,
            records.len()
        );

        Ok(Self { samples, substances, values })
    }

    pub fn samples(&self) -> &[SampleKey] {
        &self.samples
    }

    pub fn substances(&self) -> &[String] {
        &self.substances
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn n_substances(&self) -> usize {
        self.substances.len()
    }

    pub fn sample_index(&self, sample: &SampleKey) -> Option<usize> {
        self.samples.binary_search(sample).ok()
    }

    /// Composition vector of the `i`-th sample.
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.substances.len();
        &self.values[i * n..(i + 1) * n]
    }

    /// Relative area, 0 when the sample or substance was never observed.
    pub fn get(&self, sample: &SampleKey, substance: &str) -> f64 {
        let Some(i) = self.sample_index(sample) else {
            return 0.0;
        };
        match self.substances.binary_search_by(|s| s.as_str().cmp(substance)) {
            Ok(j) => self.row(i)[j],
            Err(_) => 0.0,
        }
    }

    /// Substances present (non-zero) in both samples, in column order.
    pub fn shared_substances(&self, i: usize, j: usize) -> Vec<&str> {
        self.row(i)
            .iter()
            .zip(self.row(j))
            .zip(&self.substances)
            .filter(|((a, b), _)| **a > 0.0 && **b > 0.0)
            .map(|(_, name)| name.as_str())
            .collect()
    }
}

/// Square, symmetric sample × sample score matrix with a unit diagonal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatrix {
    samples: Vec<SampleKey>,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Evaluate `score(i, j)` once per unordered pair `i < j` and mirror it.
    pub fn from_pair_fn<F>(samples: Vec<SampleKey>, mut score: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let n = samples.len();
        let mut values = vec![0.0f64; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let s = score(i, j);
                values[i * n + j] = s;
                values[j * n + i] = s;
            }
        }
        Self { samples, values }
    }

    pub fn samples(&self) -> &[SampleKey] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.samples.len() + j]
    }

    pub fn get_by_key(&self, a: &SampleKey, b: &SampleKey) -> Option<f64> {
        let i = self.samples.binary_search(a).ok()?;
        let j = self.samples.binary_search(b).ok()?;
        Some(self.get(i, j))
    }

    /// Every unordered pair once, `a < b`, in row-major order.
    pub fn upper_pairs(&self) -> impl Iterator<Item = (&SampleKey, &SampleKey, f64)> + '_ {
        let n = self.samples.len();
        (0..n).flat_map(move |i| {
            ((i + 1)..n).map(move |j| (&self.samples[i], &self.samples[j], self.get(i, j)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forensim_common::entities::CompositionRecord as R;

    #[test]
    fn test_pivot_fills_missing_with_zero() {
        let records = vec![
            R::new("S2", "Heroin", 40.0),
            R::new("S1", "Caffeine", 10.0),
            R::new("S1", "Heroin", 60.0),
        ];
        let m = CompositionMatrix::from_records(&records, Aggregation::Sum).unwrap();
        assert_eq!(m.samples(), &[SampleKey::from("S1"), SampleKey::from("S2")]);
        assert_eq!(m.substances(), &["Caffeine".to_string(), "Heroin".to_string()]);
        assert_eq!(m.row(0), &[10.0, 60.0]);
        assert_eq!(m.row(1), &[0.0, 40.0]);
        assert_eq!(m.get(&SampleKey::from("S2"), "Caffeine"), 0.0);
        assert_eq!(m.get(&SampleKey::from("S9"), "Heroin"), 0.0);
    }

    #[test]
    fn test_duplicate_records_aggregate() {
        let records = vec![
            R::new(1, "Paracetamol", 2.0),
            R::new(1, "Paracetamol", 4.0),
        ];
        let sum = CompositionMatrix::from_records(&records, Aggregation::Sum).unwrap();
        let mean = CompositionMatrix::from_records(&records, Aggregation::Mean).unwrap();
        let last = CompositionMatrix::from_records(&records, Aggregation::Last).unwrap();
        assert_eq!(sum.row(0), &[6.0]);
        assert_eq!(mean.row(0), &[3.0]);
        assert_eq!(last.row(0), &[4.0]);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            CompositionMatrix::from_records(&[], Aggregation::Sum),
            Err(ForensimError::InvalidData(_))
        ));
        for bad in [f64::NAN, f64::INFINITY, -1.0] {
            let r = CompositionMatrix::from_records(&[R::new("S1", "Heroin", bad)], Aggregation::Sum);
            assert!(matches!(r, Err(ForensimError::InvalidData(_))), "{bad} accepted");
        }
        let r = CompositionMatrix::from_records(&[R::new("S1", "  ", 1.0)], Aggregation::Sum);
        assert!(matches!(r, Err(ForensimError::InvalidData(_))));
    }

    #[test]
    fn test_shared_substances_requires_both_nonzero() {
        let records = vec![
            R::new("A", "x", 1.0),
            R::new("A", "y", 1.0),
            R::new("B", "y", 2.0),
            R::new("B", "z", 0.0),
            R::new("A", "z", 3.0),
        ];
        let m = CompositionMatrix::from_records(&records, Aggregation::Sum).unwrap();
        assert_eq!(m.shared_substances(0, 1), vec!["y"]);
    }

    #[test]
    fn test_similarity_matrix_mirrors_upper_triangle() {
        let keys = vec![SampleKey::from(1), SampleKey::from(2), SampleKey::from(3)];
        let m = SimilarityMatrix::from_pair_fn(keys, |i, j| (i + j) as f64 / 10.0);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        let pairs: Vec<_> = m.upper_pairs().map(|(a, b, s)| (a.clone(), b.clone(), s)).collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], (SampleKey::from(1), SampleKey::from(2), 0.1));
        assert_eq!(m.get_by_key(&SampleKey::from(3), &SampleKey::from(2)), Some(0.3));
    }
}
