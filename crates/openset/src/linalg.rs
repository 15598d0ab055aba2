//! Small dense-matrix helpers for the covariance-based models.

use crate::utils;

/// Compute the sample covariance matrix of the given rows, with the
/// unbiased `n - 1` denominator.
///
/// One-dimensional data degenerates to a 1×1 matrix, which keeps the
/// inversion path uniform.
pub(crate) fn sample_covariance(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let means = utils::mean_vector(rows);
    let d = means.len();
    #[allow(clippy::cast_precision_loss)]
    let denominator = rows.len() as f64 - 1.0;

    let mut covariance = vec![vec![0.0; d]; d];
    for row in rows {
        for a in 0..d {
            let da = row[a] - means[a];
            for b in 0..=a {
                covariance[a][b] += da * (row[b] - means[b]);
            }
        }
    }
    for a in 0..d {
        for b in 0..=a {
            covariance[a][b] /= denominator;
            covariance[b][a] = covariance[a][b];
        }
    }
    covariance
}

/// Invert a square matrix with Gauss-Jordan elimination and partial pivoting.
///
/// # Errors
///
/// If the matrix is singular or contains non-finite values.
pub(crate) fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, String> {
    let n = matrix.len();
    let mut work = matrix.to_vec();
    let mut inverse = (0..n)
        .map(|i| (0..n).map(|j| f64::from(u8::from(i == j))).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    for column in 0..n {
        let pivot_row = (column..n)
            .max_by(|&a, &b| {
                work[a][column]
                    .abs()
                    .partial_cmp(&work[b][column].abs())
                    .unwrap_or(core::cmp::Ordering::Less)
            })
            .ok_or_else(|| "The matrix is empty.".to_string())?;
        let pivot = work[pivot_row][column];
        if !pivot.is_finite() || pivot.abs() < f64::EPSILON {
            return Err("The matrix is singular and cannot be inverted.".to_string());
        }
        work.swap(column, pivot_row);
        inverse.swap(column, pivot_row);

        for j in 0..n {
            work[column][j] /= pivot;
            inverse[column][j] /= pivot;
        }

        for row in 0..n {
            if row == column {
                continue;
            }
            let factor = work[row][column];
            for j in 0..n {
                work[row][j] -= factor * work[column][j];
                inverse[row][j] -= factor * inverse[column][j];
            }
        }
    }

    Ok(inverse)
}

/// Multiply a square matrix by a column vector.
pub(crate) fn mat_vec(matrix: &[Vec<f64>], vector: &[f64]) -> Vec<f64> {
    matrix.iter().map(|row| utils::dot(row, vector)).collect()
}
