//! Metric weight triple.
//!
//! Users enter weights on a percent or fraction scale; fusion only ever
//! sees a [`NormalisedWeights`] that sums to 1.

use forensim_common::config::{SimilarityDefaults, WeightScale};
use forensim_common::error::{ForensimError, Result};
use serde::{Deserialize, Serialize};

/// User-supplied weights, in the units of some [`WeightScale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    pub jaccard: f64,
    pub euclidean: f64,
    pub cosine: f64,
}

impl Default for MetricWeights {
    /// Dashboard slider defaults (percent).
    fn default() -> Self {
        Self {
            jaccard: 33.0,
            euclidean: 33.0,
            cosine: 34.0,
        }
    }
}

impl From<&SimilarityDefaults> for MetricWeights {
    fn from(d: &SimilarityDefaults) -> Self {
        Self::new(d.jaccard, d.euclidean, d.cosine)
    }
}

impl MetricWeights {
    pub fn new(jaccard: f64, euclidean: f64, cosine: f64) -> Self {
        Self { jaccard, euclidean, cosine }
    }

    /// Equal weights; with geometric fusion this is the cube-root joint score.
    pub fn equal() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn sum(&self) -> f64 {
        self.jaccard + self.euclidean + self.cosine
    }

    /// Check every weight lies in `[0, scale.max()]` and the sum is positive.
    pub fn validate(&self, scale: WeightScale) -> Result<()> {
        let max = scale.max();
        for (name, w) in [
            ("jaccard", self.jaccard),
            ("euclidean", self.euclidean),
            ("cosine", self.cosine),
        ] {
            if !w.is_finite() || w < 0.0 || w > max {
                return Err(ForensimError::InvalidWeight(format!(
                    "{name} weight {w} outside [0, {max}]"
                )));
            }
        }
        if self.sum() <= 0.0 {
            return Err(ForensimError::InvalidWeight(
                "at least one metric weight must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Validate, then rescale so the weights sum to 1.0.
    pub fn normalise(&self, scale: WeightScale) -> Result<NormalisedWeights> {
        self.validate(scale)?;
        let sum = self.sum();
        Ok(NormalisedWeights {
            jaccard: self.jaccard / sum,
            euclidean: self.euclidean / sum,
            cosine: self.cosine / sum,
        })
    }

    /// Convert to array for iteration, in (jaccard, euclidean, cosine) order.
    pub fn as_array(&self) -> [f64; 3] {
        [self.jaccard, self.euclidean, self.cosine]
    }
}

/// Weights that sum to 1.0. Only obtainable through [`MetricWeights::normalise`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalisedWeights {
    jaccard: f64,
    euclidean: f64,
    cosine: f64,
}

impl NormalisedWeights {
    pub fn jaccard(&self) -> f64 {
        self.jaccard
    }

    pub fn euclidean(&self) -> f64 {
        self.euclidean
    }

    pub fn cosine(&self) -> f64 {
        self.cosine
    }

    /// Convert to array for iteration, in (jaccard, euclidean, cosine) order.
    pub fn as_array(&self) -> [f64; 3] {
        [self.jaccard, self.euclidean, self.cosine]
    }

    /// Validate that all weights sum to ~1.0
    pub fn validate(&self) -> bool {
        (self.as_array().iter().sum::<f64>() - 1.0).abs() < 1e-9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_normalise_to_one() {
        let w = MetricWeights::default().normalise(WeightScale::Percent).unwrap();
        assert!(w.validate(), "Default weights must sum to 1.0");
        assert!((w.cosine() - 0.34).abs() < 1e-12);
    }

    #[test]
    fn test_scaling_does_not_change_normalised_weights() {
        let a = MetricWeights::new(10.0, 10.0, 10.0).normalise(WeightScale::Percent).unwrap();
        let b = MetricWeights::new(1.0, 1.0, 1.0).normalise(WeightScale::Percent).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_zero_is_invalid_weight() {
        let r = MetricWeights::new(0.0, 0.0, 0.0).normalise(WeightScale::Percent);
        assert!(matches!(r, Err(ForensimError::InvalidWeight(_))));
    }

    #[test]
    fn test_out_of_range_weights_rejected() {
        assert!(MetricWeights::new(-1.0, 50.0, 50.0).validate(WeightScale::Percent).is_err());
        assert!(MetricWeights::new(101.0, 0.0, 0.0).validate(WeightScale::Percent).is_err());
        assert!(MetricWeights::new(f64::NAN, 1.0, 1.0).validate(WeightScale::Percent).is_err());
        // 2.0 is a fine percentage but not a fraction
        assert!(MetricWeights::new(2.0, 0.0, 0.0).validate(WeightScale::Percent).is_ok());
        assert!(matches!(
            MetricWeights::new(2.0, 0.0, 0.0).validate(WeightScale::Fraction),
            Err(ForensimError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_single_metric_weight_normalises_to_unit() {
        let w = MetricWeights::new(0.0, 0.0, 0.25).normalise(WeightScale::Fraction).unwrap();
        assert_eq!(w.as_array(), [0.0, 0.0, 1.0]);
    }
}
