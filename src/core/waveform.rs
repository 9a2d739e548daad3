//! Spike waveform cutouts.
use log;
use nalgebra::DMatrix;

use super::signal::Signal;
use crate::error::SortError;

/// A collection of spike waveforms, i.e., fixed-length cutouts of a signal around spike indices.
/// Every row is a waveform and every column a sample, `pre_samples` before and `post_samples` after the spike.
#[derive(Debug, PartialEq, Clone)]
pub struct Waveforms {
    /// The cutouts, one row per spike.
    matrix: DMatrix<f64>,
    /// The spike index of every row.
    spikes: Vec<usize>,
    /// The number of samples before the spike.
    pre_samples: usize,
    /// The number of samples after the spike (including the spike sample itself).
    post_samples: usize,
    /// The sampling frequency in Hz.
    sampling_frequency: f64,
}

impl Waveforms {
    /// Returns the waveforms as a matrix (spikes x samples).
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Returns the spike indices whose waveforms were cut out, in row order.
    pub fn spikes(&self) -> &[usize] {
        &self.spikes[..]
    }

    /// Returns the number of waveforms.
    pub fn num_waveforms(&self) -> usize {
        self.matrix.nrows()
    }

    /// Returns the number of samples of every waveform.
    pub fn num_samples(&self) -> usize {
        self.matrix.ncols()
    }

    /// Returns true if no waveform could be cut out.
    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    /// Returns the number of samples of every waveform before its spike.
    pub fn pre_samples(&self) -> usize {
        self.pre_samples
    }

    /// Returns the number of samples of every waveform from its spike onwards.
    pub fn post_samples(&self) -> usize {
        self.post_samples
    }

    /// Returns the samples of the waveform at the given row, if any.
    pub fn row(&self, k: usize) -> Option<Vec<f64>> {
        if k >= self.matrix.nrows() {
            return None;
        }
        Some(self.matrix.row(k).iter().copied().collect())
    }

    /// Returns all waveforms as rows of samples.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.matrix
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Returns the time (in seconds) of every waveform sample, relative to the spike.
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.num_samples())
            .map(|j| (j as f64 - self.pre_samples as f64) / self.sampling_frequency)
            .collect()
    }
}

/// Extract the waveforms of the spikes as cutouts `[i - pre_samples, i + post_samples)` of the signal,
/// where `pre_samples = floor(pre * fs)` and `post_samples = floor(post * fs)`.
///
/// Spikes too close to the start or the end of the signal for a full cutout are skipped.
/// If no spike is left, the returned waveforms are empty (but keep their number of samples).
///
/// # Parameters
/// - `signal`: The signal in which the spikes were detected.
/// - `spikes`: The indices of the spikes.
/// - `pre`: The duration of the cutout before the spike, in seconds.
/// - `post`: The duration of the cutout after the spike, in seconds.
///
/// # Examples
///
/// ```rust
/// use rusty_spike_sort::core::signal::Signal;
/// use rusty_spike_sort::core::waveform::extract_waveforms;
///
/// let signal = Signal::build((0..10).map(|i| i as f64).collect(), 1000.0).unwrap();
///
/// // The spike at 1 lacks samples before it and is skipped
/// let waveforms = extract_waveforms(&signal, &[1, 5], 0.002, 0.003).unwrap();
/// assert_eq!(waveforms.num_waveforms(), 1);
/// assert_eq!(waveforms.row(0).unwrap(), vec![3.0, 4.0, 5.0, 6.0, 7.0]);
/// ```
pub fn extract_waveforms(
    signal: &Signal,
    spikes: &[usize],
    pre: f64,
    post: f64,
) -> Result<Waveforms, SortError> {
    let pre_samples = signal.duration_to_samples(pre)?;
    let post_samples = signal.duration_to_samples(post)?;
    let num_samples = pre_samples + post_samples;
    if num_samples == 0 {
        return Err(SortError::InvalidParameter(format!(
            "the cutout ({} s before, {} s after) is shorter than one sample at {} Hz",
            pre,
            post,
            signal.sampling_frequency()
        )));
    }

    let samples = signal.samples();
    let mut kept = Vec::with_capacity(spikes.len());
    let mut data = Vec::with_capacity(spikes.len() * num_samples);
    for &spike in spikes {
        match (spike.checked_sub(pre_samples), spike.checked_add(post_samples)) {
            (Some(start), Some(end)) if end <= samples.len() => {
                data.extend_from_slice(&samples[start..end]);
                kept.push(spike);
            }
            _ => log::debug!(
                "Spike at {} skipped: no room for a full cutout in {} samples",
                spike,
                samples.len()
            ),
        }
    }

    if kept.len() < spikes.len() {
        log::info!(
            "{} out of {} spikes too close to the signal borders for a cutout",
            spikes.len() - kept.len(),
            spikes.len()
        );
    }

    Ok(Waveforms {
        matrix: DMatrix::from_row_slice(kept.len(), num_samples, &data),
        spikes: kept,
        pre_samples,
        post_samples,
        sampling_frequency: signal.sampling_frequency(),
    })
}
