//! Single-channel signal with its sampling frequency.
use crate::error::SortError;

/// A single channel of (voltage) samples, regularly sampled at a given frequency.
/// The samples are guaranteed to be non-empty and finite, and the sampling frequency to be positive.
#[derive(Debug, PartialEq, Clone)]
pub struct Signal {
    /// The samples of the signal, indexed from 0 to N-1.
    samples: Vec<f64>,
    /// The sampling frequency in Hz.
    sampling_frequency: f64,
}

impl Signal {
    /// Create a signal from the provided samples and sampling frequency (in Hz).
    /// The function returns an error for an empty or non-finite collection of samples, or for a non-positive sampling frequency.
    pub fn build(samples: Vec<f64>, sampling_frequency: f64) -> Result<Self, SortError> {
        if !sampling_frequency.is_finite() || sampling_frequency <= 0.0 {
            return Err(SortError::InvalidParameter(format!(
                "the sampling frequency must be positive, got {}",
                sampling_frequency
            )));
        }

        if samples.is_empty() {
            return Err(SortError::InvalidSignal(
                "the signal must contain at least one sample".to_string(),
            ));
        }

        if let Some(pos) = samples.iter().position(|sample| !sample.is_finite()) {
            return Err(SortError::InvalidSignal(format!(
                "sample {} is not finite ({})",
                pos, samples[pos]
            )));
        }

        Ok(Signal {
            samples,
            sampling_frequency,
        })
    }

    /// Returns the samples of the signal.
    pub fn samples(&self) -> &[f64] {
        &self.samples[..]
    }

    /// Returns the sampling frequency in Hz.
    pub fn sampling_frequency(&self) -> f64 {
        self.sampling_frequency
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false, a signal holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the duration of the signal in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sampling_frequency
    }

    /// Converts a duration (in seconds) into a number of samples.
    ///
    /// The conversion truncates, i.e., a duration of 1.5 samples gives 1 sample.
    /// The duration must be finite and non-negative.
    pub fn duration_to_samples(&self, duration: f64) -> Result<usize, SortError> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(SortError::InvalidParameter(format!(
                "durations must be finite and non-negative, got {}",
                duration
            )));
        }
        Ok((duration * self.sampling_frequency).floor() as usize)
    }

    /// Returns the time (in seconds) of the sample at the given index.
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 / self.sampling_frequency
    }

    /// Returns the time (in seconds) of every sample.
    pub fn timestamps(&self) -> Vec<f64> {
        (0..self.samples.len()).map(|i| self.time_of(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signal_build() {
        let signal = Signal::build(vec![0.0, -1.0, 2.0], 1000.0).unwrap();
        assert_eq!(signal.samples(), &[0.0, -1.0, 2.0]);
        assert_eq!(signal.len(), 3);
        assert!(!signal.is_empty());
        assert_eq!(signal.sampling_frequency(), 1000.0);

        assert!(matches!(
            Signal::build(vec![], 1000.0),
            Err(SortError::InvalidSignal(_))
        ));
        assert!(matches!(
            Signal::build(vec![0.0, f64::NAN], 1000.0),
            Err(SortError::InvalidSignal(_))
        ));
        assert!(matches!(
            Signal::build(vec![f64::NEG_INFINITY], 1000.0),
            Err(SortError::InvalidSignal(_))
        ));
        assert!(matches!(
            Signal::build(vec![0.0], 0.0),
            Err(SortError::InvalidParameter(_))
        ));
        assert!(matches!(
            Signal::build(vec![0.0], -30000.0),
            Err(SortError::InvalidParameter(_))
        ));
        assert!(matches!(
            Signal::build(vec![0.0], f64::NAN),
            Err(SortError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_duration_to_samples() {
        let signal = Signal::build(vec![0.0; 10], 1000.0).unwrap();
        assert_eq!(signal.duration_to_samples(0.0).unwrap(), 0);
        assert_eq!(signal.duration_to_samples(0.003).unwrap(), 3);
        // truncation, not rounding
        assert_eq!(signal.duration_to_samples(0.0015).unwrap(), 1);
        assert_eq!(signal.duration_to_samples(0.0005).unwrap(), 0);

        assert!(matches!(
            signal.duration_to_samples(-0.001),
            Err(SortError::InvalidParameter(_))
        ));
        assert!(matches!(
            signal.duration_to_samples(f64::INFINITY),
            Err(SortError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_timestamps() {
        let signal = Signal::build(vec![0.0; 4], 2000.0).unwrap();
        assert_relative_eq!(signal.duration(), 0.002);
        assert_relative_eq!(signal.time_of(3), 0.0015);
        let timestamps = signal.timestamps();
        assert_eq!(timestamps.len(), 4);
        assert_relative_eq!(timestamps[0], 0.0);
        assert_relative_eq!(timestamps[1], 0.0005);
        assert_relative_eq!(timestamps[2], 0.001);
    }
}
