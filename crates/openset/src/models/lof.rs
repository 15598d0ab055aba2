//! Local outlier factor in novelty mode.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// The default number of neighbors.
const DEFAULT_NEIGHBORS: usize = 10;

/// Guard against division by zero for duplicated training points.
const LRD_GUARD: f64 = 1e-10;

/// The per-label state precomputed at fit time.
struct Neighborhood {
    /// The label's training points.
    points: Vec<Vec<f64>>,
    /// The effective neighbor count, capped at one less than the number of
    /// training points.
    k: usize,
    /// The distance from each training point to its k-th nearest neighbor.
    k_distances: Vec<f64>,
    /// The local reachability density of each training point.
    densities: Vec<f64>,
}

/// Scores each query by its local outlier factor against the label's
/// training data: the ratio of the mean local reachability density of the
/// query's neighbors to the query's own. Values near one mean the query is
/// as dense as its neighborhood; larger values mean more outlying.
pub struct LocalOutlierFactor<L = i32> {
    /// The requested number of neighbors.
    n_neighbors: usize,
    /// The fitted per-label state.
    neighborhoods: HashMap<Option<L>, Neighborhood>,
}

impl<L> LocalOutlierFactor<L> {
    /// Create an unfit model with the given number of neighbors.
    #[must_use]
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors,
            neighborhoods: HashMap::new(),
        }
    }
}

impl<L> Default for LocalOutlierFactor<L> {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORS)
    }
}

impl Neighborhood {
    /// Precompute k-distances and local reachability densities for the
    /// given training points.
    ///
    /// # Errors
    ///
    /// If there are fewer than 2 training points: a lone point has no
    /// neighbors, so no density can degrade to.
    fn new(points: Vec<Vec<f64>>, n_neighbors: usize) -> Result<Self, String> {
        if points.len() < 2 {
            return Err(format!(
                "The local outlier factor needs at least 2 training points per label, got {}.",
                points.len()
            ));
        }
        let k = Ord::min(n_neighbors, points.len() - 1);

        // The k nearest neighbors of each training point, excluding itself.
        let neighbors = points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                utils::k_nearest(&points, point, k + 1)
                    .into_iter()
                    .filter(|&(j, _)| j != i)
                    .take(k)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let k_distances = neighbors
            .iter()
            .map(|nearest| nearest.last().map_or(0.0, |&(_, d)| d))
            .collect::<Vec<f64>>();

        let densities = neighbors
            .iter()
            .map(|nearest| {
                let reach = nearest
                    .iter()
                    .map(|&(j, d)| f64::max(k_distances[j], d))
                    .sum::<f64>();
                #[allow(clippy::cast_precision_loss)]
                let count = nearest.len() as f64;
                1.0 / (reach / count + LRD_GUARD)
            })
            .collect();

        Ok(Self {
            points,
            k,
            k_distances,
            densities,
        })
    }

    /// The local outlier factor of a single query vector.
    fn factor(&self, query: &[f64]) -> f64 {
        let nearest = utils::k_nearest(&self.points, query, self.k);
        #[allow(clippy::cast_precision_loss)]
        let count = nearest.len() as f64;

        let reach = nearest
            .iter()
            .map(|&(j, d)| f64::max(self.k_distances[j], d))
            .sum::<f64>();
        let query_density = 1.0 / (reach / count + LRD_GUARD);

        let neighbor_density = nearest
            .iter()
            .map(|&(j, _)| self.densities[j])
            .sum::<f64>()
            / count;

        neighbor_density / query_density
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for LocalOutlierFactor<L> {
    fn name(&self) -> String {
        if self.n_neighbors == DEFAULT_NEIGHBORS {
            "LocalOutlierFactor".to_string()
        } else {
            format!("LocalOutlierFactor({})", self.n_neighbors)
        }
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.neighborhoods = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| Ok((label, Neighborhood::new(rows, self.n_neighbors)?)))
            .collect::<Result<_, String>>()?;
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let neighborhood = fetch(&self.neighborhoods, y)?;
        Ok(x.iter().map(|row| neighborhood.factor(row)).collect())
    }
}
