//! Utility functions for the crate.

use core::cmp::Ordering;

/// Return the dot product of the two slices.
///
/// When one slice is shorter than the other, elements of the longer slice
/// past the end of the shorter one are ignored.
pub(crate) fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .fold(0.0, |acc, (&a, &b)| a.mul_add(b, acc))
}

/// Return the Euclidean distance between the two slices.
pub(crate) fn euclidean(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(&a, &b)| a - b)
        .fold(0.0, |acc, d| d.mul_add(d, acc))
        .sqrt()
}

/// Calculate the per-column mean of the given rows.
///
/// Returns an empty vector when there are no rows.
pub(crate) fn mean_vector(rows: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    #[allow(clippy::cast_precision_loss)]
    let n = rows.len() as f64;
    let mut means = vec![0.0; first.len()];
    for row in rows {
        for (mean, &value) in means.iter_mut().zip(row.iter()) {
            *mean += value;
        }
    }
    for mean in &mut means {
        *mean /= n;
    }
    means
}

/// Calculate the per-column population variance of the given rows around the
/// given means.
pub(crate) fn column_variances(rows: &[Vec<f64>], means: &[f64]) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    let n = rows.len() as f64;
    let mut variances = vec![0.0; means.len()];
    for row in rows {
        for ((variance, &value), &mean) in variances.iter_mut().zip(row.iter()).zip(means.iter()) {
            *variance += (value - mean).powi(2);
        }
    }
    for variance in &mut variances {
        *variance /= n;
    }
    variances
}

/// Return the population variance of the given values.
///
/// The variance of an empty slice is NaN, not an error.
pub(crate) fn population_variance(values: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Return the indices and distances of the `k` training points nearest to the
/// query, in ascending order of distance.
///
/// This is a brute-force scan; `k` greater than the number of points returns
/// them all.
pub(crate) fn k_nearest(points: &[Vec<f64>], query: &[f64], k: usize) -> Vec<(usize, f64)> {
    let mut distances = points
        .iter()
        .enumerate()
        .map(|(i, point)| (i, euclidean(point, query)))
        .collect::<Vec<_>>();
    distances.sort_unstable_by(|(_, l), (_, r)| l.partial_cmp(r).unwrap_or(Ordering::Greater));
    distances.truncate(k);
    distances
}
