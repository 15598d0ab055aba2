//! Correlation distance from the per-label mean vector.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// Scores each query by one minus its Pearson correlation with the mean of
/// the label's training data.
///
/// A constant query or a constant mean vector leaves the correlation
/// undefined, and the score is NaN.
pub struct Correlation<L = i32> {
    /// The mean vector of each label's training data.
    means: HashMap<Option<L>, Vec<f64>>,
}

impl<L> Default for Correlation<L> {
    fn default() -> Self {
        Self {
            means: HashMap::new(),
        }
    }
}

/// Shift the vector to zero mean.
fn centered(vector: &[f64]) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    let mean = vector.iter().sum::<f64>() / vector.len() as f64;
    vector.iter().map(|&v| v - mean).collect()
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for Correlation<L> {
    fn name(&self) -> String {
        "Correlation".to_string()
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.means = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| (label, utils::mean_vector(&rows)))
            .collect();
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let mean = fetch(&self.means, y)?;
        let centered_mean = centered(mean);
        let mean_norm = utils::dot(&centered_mean, &centered_mean).sqrt();
        Ok(x.iter()
            .map(|row| {
                let centered_row = centered(row);
                let norm = utils::dot(&centered_row, &centered_row).sqrt();
                1.0 - utils::dot(&centered_row, &centered_mean) / (norm * mean_norm)
            })
            .collect())
    }
}
