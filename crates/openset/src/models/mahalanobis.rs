//! Mahalanobis distance from the per-label mean vector.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::{linalg, utils};

/// Scores each query by its Mahalanobis distance from the mean of the
/// label's training data, using that label's own sample covariance matrix.
pub struct Mahalanobis<L = i32> {
    /// The mean vector and inverse covariance matrix of each label.
    statistics: HashMap<Option<L>, (Vec<f64>, Vec<Vec<f64>>)>,
}

impl<L> Default for Mahalanobis<L> {
    fn default() -> Self {
        Self {
            statistics: HashMap::new(),
        }
    }
}

/// The Mahalanobis distance of `row` from `mean` under the given inverse
/// covariance matrix.
fn distance(row: &[f64], mean: &[f64], inverse: &[Vec<f64>]) -> f64 {
    let delta = row
        .iter()
        .zip(mean.iter())
        .map(|(&a, &b)| a - b)
        .collect::<Vec<_>>();
    utils::dot(&delta, &linalg::mat_vec(inverse, &delta)).sqrt()
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for Mahalanobis<L> {
    fn name(&self) -> String {
        "Mahalanobis".to_string()
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.statistics = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| {
                let means = utils::mean_vector(&rows);
                let inverse = linalg::invert(&linalg::sample_covariance(&rows))?;
                Ok((label, (means, inverse)))
            })
            .collect::<Result<_, String>>()?;
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let (means, inverse) = fetch(&self.statistics, y)?;
        Ok(x.iter().map(|row| distance(row, means, inverse)).collect())
    }
}

/// Scores each query by its Mahalanobis distance from the label's mean, but
/// with a single covariance matrix computed over all training data at once,
/// ignoring the label partition.
pub struct MahalanobisSC<L = i32> {
    /// The mean vector of each label's training data.
    means: HashMap<Option<L>, Vec<f64>>,
    /// The inverse of the covariance matrix shared across labels.
    inverse: Vec<Vec<f64>>,
}

impl<L> Default for MahalanobisSC<L> {
    fn default() -> Self {
        Self {
            means: HashMap::new(),
            inverse: Vec::new(),
        }
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for MahalanobisSC<L> {
    fn name(&self) -> String {
        "MahalanobisSC".to_string()
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        let means = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| (label, utils::mean_vector(&rows)))
            .collect();
        self.inverse = linalg::invert(&linalg::sample_covariance(x))?;
        self.means = means;
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let means = fetch(&self.means, y)?;
        Ok(x.iter()
            .map(|row| distance(row, means, &self.inverse))
            .collect())
    }
}
