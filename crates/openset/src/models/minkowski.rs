//! Minkowski distance from the per-label mean vector.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// Scores each query by its Lp distance from the mean of the label's
/// training data. With the default `p = 2` this coincides with
/// [`Euclidean`](super::Euclidean).
pub struct Minkowski<L = i32> {
    /// The order of the norm.
    p: f64,
    /// The mean vector of each label's training data.
    means: HashMap<Option<L>, Vec<f64>>,
}

impl<L> Minkowski<L> {
    /// Create an unfit model with the given norm order.
    #[must_use]
    pub fn new(p: f64) -> Self {
        Self {
            p,
            means: HashMap::new(),
        }
    }
}

impl<L> Default for Minkowski<L> {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for Minkowski<L> {
    fn name(&self) -> String {
        if (self.p - 2.0).abs() < f64::EPSILON {
            "Minkowski".to_string()
        } else {
            format!("Minkowski({})", self.p)
        }
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
                    .map(|(&a, &b)| (a - b).abs().powf(self.p))
                    .sum::<f64>()
                    .powf(self.p.recip())
            })
            .collect())
    }
}
