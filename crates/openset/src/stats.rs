//! Percentile profiles for compressing score vectors.

use core::cmp::Ordering;

/// Reduce the given values to their 101-point percentile profile, the 0th
/// through 100th percentiles inclusive.
///
/// # Errors
///
/// If the input is empty.
pub fn percentiles(values: &[f64]) -> Result<Vec<f64>, String> {
    profile(values, &(0..=100).map(f64::from).collect::<Vec<_>>())
}

/// Reduce the given values to their 11-point decile profile.
///
/// # Errors
///
/// If the input is empty.
pub fn deciles(values: &[f64]) -> Result<Vec<f64>, String> {
    profile(values, &(0..=10).map(|q| f64::from(q) * 10.0).collect::<Vec<_>>())
}

/// Reduce the given values to their 5-point quartile profile.
///
/// # Errors
///
/// If the input is empty.
pub fn quartiles(values: &[f64]) -> Result<Vec<f64>, String> {
    profile(values, &[0.0, 25.0, 50.0, 75.0, 100.0])
}

/// Compute the requested percentile ranks of the given values.
///
/// Uses linear interpolation between the two nearest order statistics, the
/// same scheme NumPy defaults to. NaN values sort past every finite value.
///
/// # Errors
///
/// If the input is empty.
fn profile(values: &[f64], ranks: &[f64]) -> Result<Vec<f64>, String> {
    if values.is_empty() {
        return Err("Cannot compute percentiles of an empty score vector.".to_string());
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|l, r| match (l.is_nan(), r.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => l.partial_cmp(r).unwrap_or(Ordering::Equal),
    });

    #[allow(clippy::cast_precision_loss)]
    let span = (sorted.len() - 1) as f64;
    Ok(ranks
        .iter()
        .map(|&rank| {
            let position = rank / 100.0 * span;
            let low = position.floor();
            let high = position.ceil();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (below, above) = (sorted[low as usize], sorted[high as usize]);
            (above - below).mul_add(position - low, below)
        })
        .collect())
}
