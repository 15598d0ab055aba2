//! Mean distance to the k nearest training points.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// The default number of neighbors to average over.
const DEFAULT_NEIGHBORS: usize = 10;

/// Scores each query by the mean of its Euclidean distances to the `k`
/// nearest points in the label's training data.
///
/// A label with fewer than `k` training points uses all of them.
pub struct KNearestNeighbors<L = i32> {
    /// The requested number of neighbors.
    n_neighbors: usize,
    /// Each label's training points, with the neighbor count capped at the
    /// label's cardinality.
    neighborhoods: HashMap<Option<L>, (Vec<Vec<f64>>, usize)>,
}

impl<L> KNearestNeighbors<L> {
    /// Create an unfit model with the given number of neighbors.
    #[must_use]
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors,
            neighborhoods: HashMap::new(),
        }
    }
}

impl<L> Default for KNearestNeighbors<L> {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORS)
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for KNearestNeighbors<L> {
    fn name(&self) -> String {
        if self.n_neighbors == DEFAULT_NEIGHBORS {
            "KNearestNeighbors".to_string()
        } else {
            format!("KNearestNeighbors({})", self.n_neighbors)
        }
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.neighborhoods = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| {
                let k = Ord::min(self.n_neighbors, rows.len());
                (label, (rows, k))
            })
            .collect();
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let (points, k) = fetch(&self.neighborhoods, y)?;
        Ok(x.iter()
            .map(|row| {
                let nearest = utils::k_nearest(points, row, *k);
                #[allow(clippy::cast_precision_loss)]
                let count = nearest.len() as f64;
                nearest.iter().map(|&(_, d)| d).sum::<f64>() / count
            })
            .collect())
    }
}
