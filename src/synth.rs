//! Synthetic extracellular recordings, i.e., Gaussian noise with the spikes of a few units.
//!
//! # Example
//! ```rust
//! use rusty_spike_sort::synth::{SyntheticRecording, SyntheticUnit};
//!
//! // One second of recording at 30 kHz with two units of different amplitudes
//! let recording = SyntheticRecording {
//!     duration: 1.0,
//!     sampling_frequency: 30000.0,
//!     noise_std: 10e-6,
//!     units: vec![
//!         SyntheticUnit { amplitude: 200e-6, firing_rate: 5.0 },
//!         SyntheticUnit { amplitude: 100e-6, firing_rate: 10.0 },
//!     ],
//! };
//! let (signal, ground_truth) = recording.generate(42).unwrap();
//!
//! assert_eq!(signal.len(), 30000);
//! assert_eq!(ground_truth.len(), 2);
//! ```
use rand::distributions::Uniform;
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rand_distr::{Distribution, Normal, Poisson};
use serde::{Deserialize, Serialize};

use crate::core::signal::Signal;
use crate::error::SortError;

/// Duration of the template before the trough, in seconds.
const TEMPLATE_PRE: f64 = 0.001;
/// Duration of the template after the trough, in seconds.
const TEMPLATE_POST: f64 = 0.002;
/// Minimum time between two spikes of the same unit, in seconds.
const UNIT_REFRACTORY_PERIOD: f64 = 0.002;

/// A unit (putative neuron) contributing spikes to a synthetic recording.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SyntheticUnit {
    /// The depth of the spike trough (positive, the spike is a downward deflection).
    pub amplitude: f64,
    /// The mean firing rate in Hz.
    pub firing_rate: f64,
}

/// The description of a synthetic single-channel recording.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SyntheticRecording {
    /// The duration in seconds.
    pub duration: f64,
    /// The sampling frequency in Hz.
    pub sampling_frequency: f64,
    /// The standard deviation of the background noise.
    pub noise_std: f64,
    /// The units whose spikes are added to the noise.
    pub units: Vec<SyntheticUnit>,
}

/// The spike template at time t (in seconds) relative to the trough: a sharp trough followed by a slower positive rebound.
fn template(t: f64, amplitude: f64) -> f64 {
    let trough = (-0.5 * (t / 1.5e-4).powi(2)).exp();
    let rebound = (-0.5 * ((t - 6e-4) / 3e-4).powi(2)).exp();
    amplitude * (0.25 * rebound - trough)
}

impl SyntheticRecording {
    fn validate(&self) -> Result<(), SortError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SortError::InvalidParameter(format!(
                "the duration must be positive, got {}",
                self.duration
            )));
        }
        if !self.sampling_frequency.is_finite() || self.sampling_frequency <= 0.0 {
            return Err(SortError::InvalidParameter(format!(
                "the sampling frequency must be positive, got {}",
                self.sampling_frequency
            )));
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(SortError::InvalidParameter(format!(
                "the noise standard deviation must be non-negative, got {}",
                self.noise_std
            )));
        }
        for unit in self.units.iter() {
            if !unit.amplitude.is_finite()
                || !unit.firing_rate.is_finite()
                || unit.firing_rate < 0.0
                || !(unit.firing_rate * self.duration).is_finite()
            {
                return Err(SortError::InvalidParameter(format!(
                    "invalid unit: {:?}",
                    unit
                )));
            }
        }
        Ok(())
    }

    /// Sample the recording.
    ///
    /// Returns the signal and, for every unit, the (sorted) indices of its spike troughs.
    /// The same seed always gives the same recording.
    pub fn generate(&self, seed: u64) -> Result<(Signal, Vec<Vec<usize>>), SortError> {
        self.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let num_samples = (self.duration * self.sampling_frequency).floor() as usize;

        let noise = Normal::new(0.0, self.noise_std)
            .map_err(|e| SortError::InvalidParameter(e.to_string()))?;
        let mut samples: Vec<f64> = (0..num_samples).map(|_| noise.sample(&mut rng)).collect();

        let fs = self.sampling_frequency;
        let pre_samples = (TEMPLATE_PRE * fs).floor() as usize;
        let post_samples = (TEMPLATE_POST * fs).floor() as usize;
        let refractory_samples = ((UNIT_REFRACTORY_PERIOD * fs).ceil() as usize).max(1);
        let template_values: Vec<f64> = (0..pre_samples + post_samples)
            .map(|j| (j as f64 - pre_samples as f64) / fs)
            .collect();

        let mut ground_truth = Vec::with_capacity(self.units.len());
        for unit in self.units.iter() {
            let troughs = Self::sample_troughs(
                unit.firing_rate * self.duration,
                num_samples,
                pre_samples,
                post_samples,
                refractory_samples,
                &mut rng,
            )?;

            for &trough in troughs.iter() {
                for (j, &t) in template_values.iter().enumerate() {
                    samples[trough - pre_samples + j] += template(t, unit.amplitude);
                }
            }

            log::debug!(
                "Synthetic unit with amplitude {:.3e}: {} spikes",
                unit.amplitude,
                troughs.len()
            );
            ground_truth.push(troughs);
        }

        Ok((Signal::build(samples, self.sampling_frequency)?, ground_truth))
    }

    /// Sample the trough positions of a unit, at least `refractory_samples` apart and with room for a full template.
    fn sample_troughs<R: Rng>(
        mean_num_spikes: f64,
        num_samples: usize,
        pre_samples: usize,
        post_samples: usize,
        refractory_samples: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>, SortError> {
        if mean_num_spikes <= 0.0 {
            return Ok(vec![]);
        }

        let num_spikes_dist = Poisson::new(mean_num_spikes)
            .map_err(|e| SortError::InvalidParameter(e.to_string()))?;
        let num_spikes_draw = num_spikes_dist.sample(rng);
        if num_spikes_draw < 1.0 {
            return Ok(vec![]);
        }
        let too_many = || {
            SortError::InvalidParameter(format!(
                "{} spikes do not fit in {} samples",
                num_spikes_draw, num_samples
            ))
        };
        if num_spikes_draw > (num_samples / refractory_samples + 1) as f64 {
            return Err(too_many());
        }
        let num_spikes = num_spikes_draw as usize;

        // room left once the refractory periods and the template borders are set aside
        let available = (num_spikes - 1)
            .checked_mul(refractory_samples)
            .and_then(|busy| busy.checked_add(pre_samples + post_samples))
            .and_then(|busy| (num_samples + 1).checked_sub(busy))
            .filter(|&available| available > 0)
            .ok_or_else(too_many)?;

        let uniform = Uniform::new(0, available);
        let mut offsets: Vec<usize> = (0..num_spikes).map(|_| uniform.sample(rng)).collect();
        offsets.sort_unstable();

        Ok(offsets
            .iter()
            .enumerate()
            .map(|(n, offset)| pre_samples + offset + n * refractory_samples)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::is_spaced;

    fn recording() -> SyntheticRecording {
        SyntheticRecording {
            duration: 2.0,
            sampling_frequency: 30000.0,
            noise_std: 1.0,
            units: vec![
                SyntheticUnit {
                    amplitude: 20.0,
                    firing_rate: 20.0,
                },
                SyntheticUnit {
                    amplitude: 10.0,
                    firing_rate: 0.0,
                },
            ],
        }
    }

    #[test]
    fn test_template() {
        assert!(template(0.0, 20.0) < -19.0);
        assert!(template(6e-4, 20.0) > 4.0);
        assert!(template(-1e-3, 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_generate() {
        let (signal, ground_truth) = recording().generate(42).unwrap();
        assert_eq!(signal.len(), 60000);
        assert_eq!(signal.sampling_frequency(), 30000.0);
        assert_eq!(ground_truth.len(), 2);
        assert!(!ground_truth[0].is_empty());
        assert!(ground_truth[1].is_empty());

        // spikes respect the refractory period and leave room for the template
        assert!(is_spaced(&ground_truth[0], 60.0));
        assert!(ground_truth[0]
            .iter()
            .all(|&trough| trough >= 30 && trough + 60 <= 60000));

        // the troughs stand out of the noise
        assert!(ground_truth[0]
            .iter()
            .all(|&trough| signal.samples()[trough] < -10.0));
    }

    #[test]
    fn test_generate_deterministic() {
        let (signal_1, ground_truth_1) = recording().generate(7).unwrap();
        let (signal_2, ground_truth_2) = recording().generate(7).unwrap();
        assert_eq!(signal_1, signal_2);
        assert_eq!(ground_truth_1, ground_truth_2);

        let (signal_3, _) = recording().generate(8).unwrap();
        assert_ne!(signal_1, signal_3);
    }

    #[test]
    fn test_generate_invalid() {
        let mut invalid = recording();
        invalid.noise_std = -1.0;
        assert!(matches!(invalid.generate(0), Err(SortError::InvalidParameter(_))));

        let mut invalid = recording();
        invalid.sampling_frequency = 0.0;
        assert!(matches!(invalid.generate(0), Err(SortError::InvalidParameter(_))));

        // way too many spikes for the recording
        let mut invalid = recording();
        invalid.duration = 0.01;
        invalid.units[0].firing_rate = 100000.0;
        assert!(matches!(invalid.generate(0), Err(SortError::InvalidParameter(_))));

        // a spike count beyond any sample index
        let mut invalid = recording();
        invalid.duration = 0.01;
        invalid.units[0].firing_rate = 1e22;
        assert!(matches!(invalid.generate(0), Err(SortError::InvalidParameter(_))));

        // an expected spike count that overflows
        let mut invalid = recording();
        invalid.duration = 1e300;
        invalid.units[0].firing_rate = 1e300;
        assert!(matches!(invalid.generate(0), Err(SortError::InvalidParameter(_))));
    }
}
