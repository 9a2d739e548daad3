//! Threshold crossing detection with dead time.
use itertools::Itertools;
use log;

use super::signal::Signal;
use super::utils::is_spaced;
use crate::error::SortError;

/// Returns the indices at which the signal crosses the threshold downwards, i.e.,
/// the first sample at or below the threshold following a sample above it.
///
/// Consecutive detections are at least `dead_time` seconds (i.e., `dead_time * fs` samples) apart:
/// a crossing is dropped if it occurs within the dead time of the last kept crossing.
/// The returned indices are strictly increasing.
///
/// # Parameters
/// - `signal`: The signal to scan.
/// - `threshold`: The detection threshold, typically negative since spikes are downward deflections.
/// - `dead_time`: The minimum time between two detections, in seconds.
///
/// # Examples
///
/// ```rust
/// use rusty_spike_sort::core::signal::Signal;
/// use rusty_spike_sort::core::crossing::detect_threshold_crossings;
///
/// let signal = Signal::build(vec![0.0, -6.0, -7.0, 0.0, -8.0, 0.0, 0.0, -6.0], 1000.0).unwrap();
///
/// // Without dead time, every downward crossing is reported
/// assert_eq!(detect_threshold_crossings(&signal, -5.0, 0.0).unwrap(), vec![1, 4, 7]);
///
/// // With a 4 ms dead time, the crossing at 4 is too close to the one at 1
/// assert_eq!(detect_threshold_crossings(&signal, -5.0, 0.004).unwrap(), vec![1, 7]);
/// ```
pub fn detect_threshold_crossings(
    signal: &Signal,
    threshold: f64,
    dead_time: f64,
) -> Result<Vec<usize>, SortError> {
    if !threshold.is_finite() {
        return Err(SortError::InvalidParameter(format!(
            "the threshold must be finite, got {}",
            threshold
        )));
    }

    if !dead_time.is_finite() || dead_time < 0.0 {
        return Err(SortError::InvalidParameter(format!(
            "the dead time must be finite and non-negative, got {}",
            dead_time
        )));
    }

    let dead_samples = dead_time * signal.sampling_frequency();

    let candidates = signal
        .samples()
        .iter()
        .map(|&sample| sample <= threshold)
        .tuple_windows()
        .positions(|(below_prev, below_next)| !below_prev && below_next)
        .map(|pos| pos + 1);

    let mut crossings: Vec<usize> = vec![];
    for candidate in candidates {
        match crossings.last() {
            Some(&last) if ((candidate - last) as f64) < dead_samples => continue,
            _ => crossings.push(candidate),
        }
    }

    debug_assert!(is_spaced(&crossings, dead_samples));

    log::debug!(
        "{} threshold crossings detected below {} (dead time of {} samples)",
        crossings.len(),
        threshold,
        dead_samples
    );

    Ok(crossings)
}
