//! Manhattan distance from the per-label mean vector.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// Scores each query by its L1 distance from the mean of the label's
/// training data.
pub struct Manhattan<L = i32> {
    /// The mean vector of each label's training data.
    means: HashMap<Option<L>, Vec<f64>>,
}

impl<L> Default for Manhattan<L> {
    fn default() -> Self {
        Self {
            means: HashMap::new(),
        }
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for Manhattan<L> {
    fn name(&self) -> String {
        "Manhattan".to_string()
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
        Ok(x.iter()
            .map(|row| {
                row.iter()
                    .zip(mean.iter())
                    .map(|(&a, &b)| (a - b).abs())
                    .sum()
            })
            .collect())
    }
}
