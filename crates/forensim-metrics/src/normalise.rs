//! Threshold normalisation.

use forensim_common::config::WeightScale;
use forensim_common::error::{ForensimError, Result};

/// Convert a user threshold on `scale` to a fraction in [0, 1].
/// Percent thresholds are divided by 100, as on the dashboard slider.
pub fn normalise_threshold(threshold: f64, scale: WeightScale) -> Result<f64> {
    let max = scale.max();
    if !threshold.is_finite() || !(0.0..=max).contains(&threshold) {
        return Err(ForensimError::InvalidThreshold(format!(
            "threshold {threshold} outside [0, {max}]"
        )));
    }
    Ok(threshold / max)
}

/// Clamp a score into [0, 1], mapping NaN to 0.
pub fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
