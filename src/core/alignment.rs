//! Alignment of threshold crossings to the negative peak of the spikes.
use log;

use super::signal::Signal;
use super::utils::argmin;
use crate::error::SortError;

/// Returns the index of the smallest sample in `[index, min(index + max_samples, N))`.
/// If several samples are equal to the minimum, the first one is returned.
///
/// The function returns an error if the index is out of bounds or if the search window is empty.
pub fn next_minimum(samples: &[f64], index: usize, max_samples: usize) -> Result<usize, SortError> {
    if index >= samples.len() {
        return Err(SortError::OutOfBounds(format!(
            "index {} for a signal of {} samples",
            index,
            samples.len()
        )));
    }

    let end = index.saturating_add(max_samples).min(samples.len());
    argmin(&samples[index..end])
        .map(|pos| index + pos)
        .ok_or_else(|| {
            SortError::InvalidParameter("the search window must contain at least one sample".to_string())
        })
}

/// Returns the index of the next negative peak for every threshold crossing.
///
/// The peak of a crossing `c` is searched in `[c, min(c + search_samples, N))` where
/// `search_samples = floor(search_range * fs)`. The output has the same length and order as the crossings.
///
/// # Parameters
/// - `signal`: The signal in which the crossings were detected.
/// - `crossings`: The indices of the threshold crossings.
/// - `search_range`: The maximum time (in seconds) to search for the minimum after each crossing.
///
/// # Examples
///
/// ```rust
/// use rusty_spike_sort::core::signal::Signal;
/// use rusty_spike_sort::core::alignment::align_to_minimum;
///
/// let signal = Signal::build(vec![0.0, -6.0, -9.0, -7.0, 0.0, -6.0, -8.0], 1000.0).unwrap();
/// assert_eq!(align_to_minimum(&signal, &[1, 5], 0.003).unwrap(), vec![2, 6]);
/// ```
pub fn align_to_minimum(
    signal: &Signal,
    crossings: &[usize],
    search_range: f64,
) -> Result<Vec<usize>, SortError> {
    let search_samples = signal.duration_to_samples(search_range)?;
    if search_samples == 0 {
        return Err(SortError::InvalidParameter(format!(
            "the search range ({} s) is shorter than one sample at {} Hz",
            search_range,
            signal.sampling_frequency()
        )));
    }

    let spikes = crossings
        .iter()
        .map(|&crossing| next_minimum(signal.samples(), crossing, search_samples))
        .collect::<Result<Vec<usize>, SortError>>()?;

    log::debug!(
        "{} crossings aligned to their minimum (search window of {} samples)",
        spikes.len(),
        search_samples
    );

    Ok(spikes)
}
