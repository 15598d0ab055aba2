//! Standardized Euclidean distance from the per-label mean vector.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// Scores each query by its Euclidean distance from the label's mean after
/// dividing each squared coordinate difference by that coordinate's
/// population variance.
///
/// A coordinate with zero variance makes every off-mean query score
/// infinite, which is the faithful reading of "any deviation is novel".
pub struct SEuclidean<L = i32> {
    /// The mean vector and per-column population variances of each label.
    statistics: HashMap<Option<L>, (Vec<f64>, Vec<f64>)>,
}

impl<L> Default for SEuclidean<L> {
    fn default() -> Self {
        Self {
            statistics: HashMap::new(),
        }
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for SEuclidean<L> {
    fn name(&self) -> String {
        "SEuclidean".to_string()
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.statistics = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| {
                let means = utils::mean_vector(&rows);
                let variances = utils::column_variances(&rows, &means);
                (label, (means, variances))
            })
            .collect();
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let (means, variances) = fetch(&self.statistics, y)?;
        Ok(x.iter()
            .map(|row| {
                row.iter()
                    .zip(means.iter())
                    .zip(variances.iter())
                    .map(|((&value, &mean), &variance)| (value - mean).powi(2) / variance)
                    .sum::<f64>()
                    .sqrt()
            })
            .collect())
    }
}
