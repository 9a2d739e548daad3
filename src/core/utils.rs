//! Numeric utility functions.
use itertools::Itertools;

/// Returns the position of the smallest value, if any.
/// If several values are equal to the minimum, the first one is returned.
pub fn argmin(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |acc: Option<(usize, f64)>, (pos, &value)| match acc {
            Some((_, min)) if min <= value => acc,
            _ => Some((pos, value)),
        })
        .map(|(pos, _)| pos)
}

/// Returns the median of the values, if any.
/// For an even number of values, the mean of the two middle values is returned.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Returns true if every consecutive pair of indices differs by at least `min_gap`.
pub fn is_spaced(indices: &[usize], min_gap: f64) -> bool {
    indices
        .iter()
        .tuple_windows()
        .all(|(&prev, &next)| next > prev && (next - prev) as f64 >= min_gap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmin() {
        assert_eq!(argmin(&[]), None);
        assert_eq!(argmin(&[3.0]), Some(0));
        assert_eq!(argmin(&[3.0, -1.0, 2.0]), Some(1));
        // first minimum wins on ties
        assert_eq!(argmin(&[0.0, -2.0, 5.0, -2.0]), Some(1));
        assert_eq!(argmin(&[-4.0, -4.0]), Some(0));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_is_spaced() {
        assert!(is_spaced(&[], 10.0));
        assert!(is_spaced(&[4], 10.0));
        assert!(is_spaced(&[0, 10, 20], 10.0));
        assert!(!is_spaced(&[0, 9, 20], 10.0));
        assert!(!is_spaced(&[5, 5], 0.0));
        assert!(is_spaced(&[5, 6], 0.0));
    }
}
