//! Spike sorting pipeline, chaining detection, alignment, waveform extraction and feature extraction.
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::alignment::align_to_minimum;
use crate::core::crossing::detect_threshold_crossings;
use crate::core::features::{summarize, Features};
use crate::core::noise::{recommended_threshold, NoiseEstimator};
use crate::core::signal::Signal;
use crate::core::waveform::extract_waveforms;
use crate::error::SortError;
use crate::{DEFAULT_DEAD_TIME, DEFAULT_POST, DEFAULT_PRE, DEFAULT_SEARCH_RANGE, DEFAULT_THRESHOLD_FACTOR};

/// How the detection threshold is chosen for a signal.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum ThresholdPolicy {
    /// A fixed threshold, used as is for every signal.
    Fixed(f64),
    /// A threshold `factor` times the noise level of every signal below zero.
    Noise {
        estimator: NoiseEstimator,
        factor: f64,
    },
}

impl ThresholdPolicy {
    /// Returns the detection threshold for the signal.
    pub fn threshold(&self, signal: &Signal) -> Result<f64, SortError> {
        match self {
            ThresholdPolicy::Fixed(threshold) => Ok(*threshold),
            ThresholdPolicy::Noise { estimator, factor } => {
                recommended_threshold(signal, *estimator, *factor)
            }
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy::Noise {
            estimator: NoiseEstimator::Std,
            factor: DEFAULT_THRESHOLD_FACTOR,
        }
    }
}

/// The parameters of the sorting pipeline. All durations are in seconds.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SortingConfig {
    /// The detection threshold policy.
    pub threshold: ThresholdPolicy,
    /// The minimum time between two detections.
    pub dead_time: f64,
    /// The maximum time to search for the negative peak after a crossing.
    pub search_range: f64,
    /// The duration of the cutout before a spike.
    pub pre: f64,
    /// The duration of the cutout after a spike.
    pub post: f64,
}

impl Default for SortingConfig {
    fn default() -> Self {
        SortingConfig {
            threshold: ThresholdPolicy::default(),
            dead_time: DEFAULT_DEAD_TIME,
            search_range: DEFAULT_SEARCH_RANGE,
            pre: DEFAULT_PRE,
            post: DEFAULT_POST,
        }
    }
}

impl SortingConfig {
    /// Check the parameters do not depend on the signal to be valid.
    pub fn validate(&self) -> Result<(), SortError> {
        match self.threshold {
            ThresholdPolicy::Fixed(threshold) if !threshold.is_finite() => {
                return Err(SortError::InvalidParameter(format!(
                    "the threshold must be finite, got {}",
                    threshold
                )));
            }
            ThresholdPolicy::Noise { factor, .. } if !factor.is_finite() || factor <= 0.0 => {
                return Err(SortError::InvalidParameter(format!(
                    "the threshold factor must be positive, got {}",
                    factor
                )));
            }
            _ => {}
        }

        for (name, value) in [
            ("dead time", self.dead_time),
            ("search range", self.search_range),
            ("pre", self.pre),
            ("post", self.post),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SortError::InvalidParameter(format!(
                    "the {} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        if self.search_range == 0.0 {
            return Err(SortError::InvalidParameter(
                "the search range must be positive".to_string(),
            ));
        }

        if self.pre + self.post == 0.0 {
            return Err(SortError::InvalidParameter(
                "the cutout must have a positive duration".to_string(),
            ));
        }

        if self.search_range > self.dead_time {
            log::warn!(
                "The search range ({} s) exceeds the dead time ({} s): consecutive crossings may align to the same spike",
                self.search_range,
                self.dead_time
            );
        }

        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SortError> {
        let file = File::open(path).map_err(|e| SortError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        let config: SortingConfig =
            serde_json::from_reader(reader).map_err(|e| SortError::IOError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SortError> {
        let file = File::create(path).map_err(|e| SortError::IOError(e.to_string()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| SortError::IOError(e.to_string()))
    }
}

/// The outcome of sorting a signal.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SortingResult {
    /// The detection threshold used for the signal.
    pub threshold: f64,
    /// The indices of the threshold crossings.
    pub crossings: Vec<usize>,
    /// The indices of the spikes, i.e., the crossings aligned to their negative peak.
    pub spikes: Vec<usize>,
    /// The times (in seconds) of the spikes.
    pub spike_times: Vec<f64>,
    /// The indices of the spikes far enough from the signal borders to be cut out.
    pub waveform_spikes: Vec<usize>,
    /// The waveform cutouts, one row per spike in `waveform_spikes`.
    pub waveforms: Vec<Vec<f64>>,
    /// The time (in seconds) of every waveform sample, relative to the spike.
    pub waveform_time: Vec<f64>,
    /// The minimum and maximum voltage of every waveform.
    pub features: Features,
}

impl SortingResult {
    /// Returns the number of detected spikes.
    pub fn num_spikes(&self) -> usize {
        self.spikes.len()
    }

    /// Save the result to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SortError> {
        let file = File::create(path).map_err(|e| SortError::IOError(e.to_string()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, self).map_err(|e| SortError::IOError(e.to_string()))
    }

    /// Load a result from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SortError> {
        let file = File::open(path).map_err(|e| SortError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| SortError::IOError(e.to_string()))
    }
}

/// Threshold-based spike sorter.
///
/// # Examples
///
/// ```rust
/// use rusty_spike_sort::core::signal::Signal;
/// use rusty_spike_sort::sorter::{SortingConfig, SpikeSorter, ThresholdPolicy};
///
/// let mut samples = vec![0.0; 200];
/// samples[50] = -6.0;
/// samples[51] = -10.0;
/// samples[120] = -8.0;
/// let signal = Signal::build(samples, 10000.0).unwrap();
///
/// let config = SortingConfig {
///     threshold: ThresholdPolicy::Fixed(-5.0),
///     ..SortingConfig::default()
/// };
/// let sorter = SpikeSorter::build(config).unwrap();
/// let result = sorter.sort(&signal).unwrap();
///
/// assert_eq!(result.crossings, vec![50, 120]);
/// assert_eq!(result.spikes, vec![51, 120]);
/// assert_eq!(result.features.min, vec![-10.0, -8.0]);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct SpikeSorter {
    config: SortingConfig,
}

impl SpikeSorter {
    /// Create a sorter with the provided configuration.
    /// The function returns an error if the configuration is invalid.
    pub fn build(config: SortingConfig) -> Result<Self, SortError> {
        config.validate()?;
        Ok(SpikeSorter { config })
    }

    pub fn config(&self) -> &SortingConfig {
        &self.config
    }

    /// Sort a single-channel signal.
    pub fn sort(&self, signal: &Signal) -> Result<SortingResult, SortError> {
        let threshold = self.config.threshold.threshold(signal)?;
        let crossings = detect_threshold_crossings(signal, threshold, self.config.dead_time)?;
        let spikes = align_to_minimum(signal, &crossings, self.config.search_range)?;
        let waveforms = extract_waveforms(signal, &spikes, self.config.pre, self.config.post)?;
        let features = summarize(&waveforms);

        log::info!(
            "Sorting done: {} spikes detected below {:.3e}, {} waveforms extracted",
            spikes.len(),
            threshold,
            waveforms.num_waveforms()
        );

        Ok(SortingResult {
            threshold,
            spike_times: spikes.iter().map(|&spike| signal.time_of(spike)).collect(),
            crossings,
            spikes,
            waveform_spikes: waveforms.spikes().to_vec(),
            waveform_time: waveforms.time_axis(),
            waveforms: waveforms.rows(),
            features,
        })
    }

    /// Sort independent channels in parallel.
    /// The results are in the order of the channels; the first error encountered is returned.
    pub fn sort_channels(&self, signals: &[Signal]) -> Result<Vec<SortingResult>, SortError> {
        signals
            .par_iter()
            .enumerate()
            .map(|(channel, signal)| {
                self.sort(signal).map_err(|e| {
                    log::error!("Sorting of channel {} failed: {}", channel, e);
                    e
                })
            })
            .collect()
    }
}
