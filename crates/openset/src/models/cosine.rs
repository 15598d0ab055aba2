//! Cosine distance from the per-label mean vector.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// Scores each query by one minus its cosine similarity with the mean of the
/// label's training data.
///
/// When either vector has zero norm the angle is undefined and the score is
/// taken to be `1.0`, the same as orthogonality.
pub struct Cosine<L = i32> {
    /// The mean vector of each label's training data.
    means: HashMap<Option<L>, Vec<f64>>,
}

impl<L> Default for Cosine<L> {
    fn default() -> Self {
        Self {
            means: HashMap::new(),
        }
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for Cosine<L> {
    fn name(&self) -> String {
        "Cosine".to_string()
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
        let mean_norm = utils::dot(mean, mean).sqrt();
        Ok(x.iter()
            .map(|row| {
                let norm = utils::dot(row, row).sqrt();
                let denominator = norm * mean_norm;
                if denominator > 0.0 {
                    1.0 - utils::dot(row, mean) / denominator
                } else {
                    1.0
                }
            })
            .collect())
    }
}
