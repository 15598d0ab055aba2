//! Integrated rank-weighted depth.
//!
//! Projects the training data onto random directions on the unit
//! hypersphere and measures, per direction, how many training points land on
//! the smaller side of the query. Averaging over directions gives a
//! statistical depth in `[0, 0.5]`, largest at the center of the cluster.
//! The score is negated so that higher means more outlying.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// The default number of random projection directions.
const DEFAULT_PROJECTIONS: usize = 1000;

/// The seed for the projection directions, fixed so repeated fits of the
/// same data agree.
const DIRECTION_SEED: u64 = 42;

/// The per-label state precomputed at fit time.
struct Projections {
    /// The unit direction vectors, one per projection.
    directions: Vec<Vec<f64>>,
    /// Row `i` holds the dot products of training point `i` with each
    /// direction.
    projected: Vec<Vec<f64>>,
}

/// Scores each query by its negated integrated rank-weighted depth with
/// respect to the label's training data.
pub struct IntegratedRankWeightedDepth<L = i32> {
    /// The number of random projection directions.
    n_proj: usize,
    /// The fitted per-label state.
    projections: HashMap<Option<L>, Projections>,
}

impl<L> IntegratedRankWeightedDepth<L> {
    /// Create an unfit model with the given number of projection directions.
    #[must_use]
    pub fn new(n_proj: usize) -> Self {
        Self {
            n_proj,
            projections: HashMap::new(),
        }
    }
}

impl<L> Default for IntegratedRankWeightedDepth<L> {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECTIONS)
    }
}

impl Projections {
    /// Draw unit directions and project the training points onto them.
    fn new(points: &[Vec<f64>], n_proj: usize) -> Self {
        let dimension = points.first().map_or(0, Vec::len);
        let mut rng = Pcg64::seed_from_u64(DIRECTION_SEED);

        let directions = (0..n_proj)
            .map(|_| {
                let direction = (0..dimension)
                    .map(|_| rng.sample::<f64, _>(rand_distr::StandardNormal))
                    .collect::<Vec<_>>();
                let norm = utils::dot(&direction, &direction).sqrt();
                direction.into_iter().map(|v| v / norm).collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let projected = points
            .iter()
            .map(|point| {
                directions
                    .iter()
                    .map(|direction| utils::dot(point, direction))
                    .collect()
            })
            .collect();

        Self {
            directions,
            projected,
        }
    }

    /// The depth of a single query vector, in `[0, 0.5]`.
    fn depth(&self, query: &[f64]) -> f64 {
        let query_projected = self
            .directions
            .iter()
            .map(|direction| utils::dot(query, direction))
            .collect::<Vec<_>>();

        let side_counts = query_projected
            .iter()
            .enumerate()
            .map(|(j, &q)| {
                let below = self
                    .projected
                    .iter()
                    .filter(|row| row[j] - q <= 0.0)
                    .count();
                Ord::min(below, self.projected.len() - below)
            })
            .sum::<usize>();

        #[allow(clippy::cast_precision_loss)]
        let depth =
            side_counts as f64 / self.projected.len() as f64 / self.directions.len() as f64;
        depth
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for IntegratedRankWeightedDepth<L> {
    fn name(&self) -> String {
        if self.n_proj == DEFAULT_PROJECTIONS {
            "IntegratedRankWeightedDepth".to_string()
        } else {
            format!("IntegratedRankWeightedDepth({})", self.n_proj)
        }
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.projections = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| (label, Projections::new(&rows, self.n_proj)))
            .collect();
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let projections = fetch(&self.projections, y)?;
        Ok(x.iter().map(|row| -projections.depth(row)).collect())
    }
}
