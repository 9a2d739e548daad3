//! Waveform feature extraction.
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::waveform::Waveforms;

/// The minimum and maximum voltage of every waveform, in the order of the waveforms.
/// Units with different amplitudes typically form distinct clusters in the (min, max) plane.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Features {
    /// The minimum voltage of every waveform.
    pub min: Vec<f64>,
    /// The maximum voltage of every waveform.
    pub max: Vec<f64>,
}

impl Features {
    pub fn len(&self) -> usize {
        self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_empty()
    }

    /// Returns an iterator over the (min, max) pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.min.iter().copied().zip(self.max.iter().copied())
    }
}

/// Reduce every waveform to its minimum and maximum voltage.
///
/// # Examples
///
/// ```rust
/// use rusty_spike_sort::core::signal::Signal;
/// use rusty_spike_sort::core::waveform::extract_waveforms;
/// use rusty_spike_sort::core::features::summarize;
///
/// let signal = Signal::build(vec![1.0, 5.0, 2.0, -3.0, 0.0, 4.0], 1000.0).unwrap();
/// let waveforms = extract_waveforms(&signal, &[1, 4], 0.001, 0.002).unwrap();
///
/// let features = summarize(&waveforms);
/// assert_eq!(features.min, vec![1.0, -3.0]);
/// assert_eq!(features.max, vec![5.0, 4.0]);
/// ```
pub fn summarize(waveforms: &Waveforms) -> Features {
    let (min, max) = waveforms
        .matrix()
        .row_iter()
        // cutouts span at least one sample, so every row has a min and a max
        .filter_map(|row| row.iter().copied().minmax_by(|a, b| a.total_cmp(b)).into_option())
        .unzip();
    Features { min, max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signal::Signal;
    use crate::core::waveform::extract_waveforms;

    #[test]
    fn test_summarize_rows() {
        let signal = Signal::build(vec![1.0, 5.0, 2.0, -3.0, 0.0, 4.0], 1000.0).unwrap();
        let waveforms = extract_waveforms(&signal, &[1, 4], 0.001, 0.002).unwrap();
        assert_eq!(waveforms.rows(), vec![vec![1.0, 5.0, 2.0], vec![-3.0, 0.0, 4.0]]);

        let features = summarize(&waveforms);
        assert_eq!(features.len(), 2);
        assert_eq!(features.min, vec![1.0, -3.0]);
        assert_eq!(features.max, vec![5.0, 4.0]);
        assert_eq!(
            features.pairs().collect::<Vec<_>>(),
            vec![(1.0, 5.0), (-3.0, 4.0)]
        );
    }

    #[test]
    fn test_summarize_single_sample() {
        let signal = Signal::build(vec![2.0, -7.0, 3.0], 1000.0).unwrap();
        let waveforms = extract_waveforms(&signal, &[1], 0.0, 0.001).unwrap();
        let features = summarize(&waveforms);
        assert_eq!(features.min, vec![-7.0]);
        assert_eq!(features.max, vec![-7.0]);
    }

    #[test]
    fn test_summarize_empty() {
        let signal = Signal::build(vec![0.0; 3], 1000.0).unwrap();
        let waveforms = extract_waveforms(&signal, &[0], 0.001, 0.001).unwrap();
        let features = summarize(&waveforms);
        assert!(features.is_empty());
        assert_eq!(features, Features::default());
    }

    #[test]
    fn test_summarize_no_nan() {
        let signal = Signal::build(vec![2.0, -7.0, 3.0, 1.0], 1000.0).unwrap();
        assert!(extract_waveforms(&signal, &[1], 0.0, 0.0).is_err());

        let waveforms = extract_waveforms(&signal, &[1, 2], 0.0, 0.001).unwrap();
        let features = summarize(&waveforms);
        assert_eq!(features.len(), waveforms.num_waveforms());
        assert!(features.pairs().all(|(min, max)| !min.is_nan() && !max.is_nan()));
        assert_eq!(features.min, vec![-7.0, 3.0]);
    }
}
