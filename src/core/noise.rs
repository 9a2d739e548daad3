//! Noise estimation and detection thresholds.
use serde::{Deserialize, Serialize};

use super::signal::Signal;
use super::utils::median;
use crate::error::SortError;

/// Ratio between the median absolute deviation and the standard deviation of a Gaussian distribution.
pub const MAD_TO_STD: f64 = 0.6745;

/// The estimator used to measure the noise level of a signal.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum NoiseEstimator {
    /// The standard deviation of the samples, inflated by the spikes themselves.
    Std,
    /// The median absolute deviation of the samples (scaled to a standard deviation), robust to the spikes.
    Mad,
}

impl NoiseEstimator {
    /// Returns the noise level of the samples according to the estimator.
    pub fn estimate(&self, samples: &[f64]) -> Result<f64, SortError> {
        match self {
            NoiseEstimator::Std => noise_std(samples),
            NoiseEstimator::Mad => noise_mad(samples),
        }
    }
}

/// Returns the (population) standard deviation of the samples.
pub fn noise_std(samples: &[f64]) -> Result<f64, SortError> {
    if samples.is_empty() {
        return Err(SortError::InvalidSignal(
            "cannot estimate the noise of an empty signal".to_string(),
        ));
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    Ok(var.sqrt())
}

/// Returns the median absolute deviation of the samples, divided by 0.6745 to estimate the standard deviation of Gaussian noise.
pub fn noise_mad(samples: &[f64]) -> Result<f64, SortError> {
    let center = median(samples).ok_or_else(|| {
        SortError::InvalidSignal("cannot estimate the noise of an empty signal".to_string())
    })?;

    let deviations: Vec<f64> = samples.iter().map(|x| (x - center).abs()).collect();
    // deviations is non-empty here
    let mad = median(&deviations).unwrap_or(0.0);
    Ok(mad / MAD_TO_STD)
}

/// Returns a (negative) detection threshold, `factor` times the noise level below zero.
///
/// # Examples
///
/// ```rust
/// use approx::assert_relative_eq;
/// use rusty_spike_sort::core::signal::Signal;
/// use rusty_spike_sort::core::noise::{recommended_threshold, NoiseEstimator};
///
/// let signal = Signal::build(vec![-1.0, 1.0, -1.0, 1.0], 30000.0).unwrap();
/// let threshold = recommended_threshold(&signal, NoiseEstimator::Std, 5.0).unwrap();
/// assert_relative_eq!(threshold, -5.0);
/// ```
pub fn recommended_threshold(
    signal: &Signal,
    estimator: NoiseEstimator,
    factor: f64,
) -> Result<f64, SortError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(SortError::InvalidParameter(format!(
            "the threshold factor must be positive, got {}",
            factor
        )));
    }
    let noise = estimator.estimate(signal.samples())?;
    log::debug!("Noise estimate ({:?}): {}", estimator, noise);
    Ok(-factor * noise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_noise_std() {
        assert_relative_eq!(noise_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap(), 2.0);
        assert_relative_eq!(noise_std(&[3.0, 3.0]).unwrap(), 0.0);
        assert!(matches!(noise_std(&[]), Err(SortError::InvalidSignal(_))));
    }

    #[test]
    fn test_noise_mad() {
        // median 3, absolute deviations [2, 1, 0, 1, 2] with median 1
        assert_relative_eq!(
            noise_mad(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(),
            1.0 / MAD_TO_STD
        );
        assert!(matches!(noise_mad(&[]), Err(SortError::InvalidSignal(_))));
    }

    #[test]
    fn test_mad_robust_to_spikes() {
        let mut samples: Vec<f64> = (0..1000)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        samples[100] = -500.0;
        samples[500] = -500.0;
        samples[900] = -500.0;

        let std = noise_std(&samples).unwrap();
        let mad = noise_mad(&samples).unwrap();
        assert!(std > 20.0);
        assert_relative_eq!(mad, 1.0 / MAD_TO_STD);
    }

    #[test]
    fn test_recommended_threshold() {
        let signal = Signal::build(vec![-2.0, 2.0, -2.0, 2.0], 30000.0).unwrap();
        assert_relative_eq!(
            recommended_threshold(&signal, NoiseEstimator::Std, 5.0).unwrap(),
            -10.0
        );
        assert_relative_eq!(
            recommended_threshold(&signal, NoiseEstimator::Mad, 4.0).unwrap(),
            -4.0 * 2.0 / MAD_TO_STD
        );
        assert!(matches!(
            recommended_threshold(&signal, NoiseEstimator::Std, 0.0),
            Err(SortError::InvalidParameter(_))
        ));
        assert!(matches!(
            recommended_threshold(&signal, NoiseEstimator::Mad, -5.0),
            Err(SortError::InvalidParameter(_))
        ));
    }
}
