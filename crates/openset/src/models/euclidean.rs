//! Euclidean distance from the per-label mean vector.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// Scores each query by its L2 distance from the mean of the label's
/// training data.
pub struct Euclidean<L = i32> {
    /// The mean vector of each label's training data.
    means: HashMap<Option<L>, Vec<f64>>,
}

impl<L> Default for Euclidean<L> {
    fn default() -> Self {
        Self {
            means: HashMap::new(),
        }
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for Euclidean<L> {
    fn name(&self) -> String {
        "Euclidean".to_string()
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
        Ok(x.iter().map(|row| utils::euclidean(row, mean)).collect())
    }
}
