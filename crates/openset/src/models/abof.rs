//! The angle-based outlier factor family.
//!
//! Each model measures, for a query vector, the spread of angles between
//! pairs of difference vectors toward the label's training points. Points
//! deep inside a cluster see their neighbors at widely varying angles, while
//! outliers see the whole cluster within a narrow cone, so the natural
//! variance is low for outliers. The scores are negated so that, like every
//! other model here, higher means more outlying.
//!
//! The "weighted" variants divide each dot product by both squared norms,
//! discounting far-away pairs; the "2" variants use the plain cosine. The
//! "fast" variants restrict the pairs to the query's k nearest training
//! points.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// The default number of neighbors for the fast variants.
const DEFAULT_NEIGHBORS: usize = 10;

/// How to turn a pair of difference vectors into an angle term.
#[derive(Clone, Copy)]
enum Angle {
    /// The dot product divided by both squared norms.
    Weighted,
    /// The plain cosine of the angle.
    Cosine,
}

impl Angle {
    /// The angle term for one pair, or `None` when either vector has zero
    /// norm and the angle is undefined.
    fn term(self, v1: &[f64], v2: &[f64]) -> Option<f64> {
        let nsq1 = utils::dot(v1, v1);
        let nsq2 = utils::dot(v2, v2);
        if nsq1 == 0.0 || nsq2 == 0.0 {
            return None;
        }
        Some(match self {
            Self::Weighted => utils::dot(v1, v2) / nsq1 / nsq2,
            Self::Cosine => utils::dot(v1, v2) / (nsq1.sqrt() * nsq2.sqrt()),
        })
    }
}

/// The negated variance of pairwise angles from `query` toward `points`.
fn negated_angle_variance(points: &[Vec<f64>], query: &[f64], angle: Angle) -> f64 {
    let differences = points
        .iter()
        .map(|point| {
            point
                .iter()
                .zip(query.iter())
                .map(|(&a, &b)| a - b)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut angles = Vec::with_capacity(differences.len() * differences.len().saturating_sub(1) / 2);
    for (i, v1) in differences.iter().enumerate() {
        for v2 in &differences[(i + 1)..] {
            if let Some(term) = angle.term(v1, v2) {
                angles.push(term);
            }
        }
    }

    -utils::population_variance(&angles)
}

/// Exact angle-based outlier factor with norm-weighted angles, over all
/// pairs of training points.
pub struct AngleBasedOutlierFactor<L = i32> {
    /// Each label's training points.
    data: HashMap<Option<L>, Vec<Vec<f64>>>,
}

impl<L> Default for AngleBasedOutlierFactor<L> {
    fn default() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for AngleBasedOutlierFactor<L> {
    fn name(&self) -> String {
        "AngleBasedOutlierFactor".to_string()
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.data = partition_by_label(x, y)?;
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let points = fetch(&self.data, y)?;
        Ok(x.iter()
            .map(|row| negated_angle_variance(points, row, Angle::Weighted))
            .collect())
    }
}

/// Exact angle-based outlier factor with plain cosine angles.
pub struct AngleBasedOutlierFactor2<L = i32> {
    /// Each label's training points.
    data: HashMap<Option<L>, Vec<Vec<f64>>>,
}

impl<L> Default for AngleBasedOutlierFactor2<L> {
    fn default() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for AngleBasedOutlierFactor2<L> {
    fn name(&self) -> String {
        "AngleBasedOutlierFactor2".to_string()
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.data = partition_by_label(x, y)?;
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let points = fetch(&self.data, y)?;
        Ok(x.iter()
            .map(|row| negated_angle_variance(points, row, Angle::Cosine))
            .collect())
    }
}

/// The k nearest training points to the query, in row form.
fn nearest_points(points: &[Vec<f64>], query: &[f64], k: usize) -> Vec<Vec<f64>> {
    utils::k_nearest(points, query, k)
        .into_iter()
        .map(|(i, _)| points[i].clone())
        .collect()
}

/// Approximate angle-based outlier factor with norm-weighted angles, over
/// pairs among the query's k nearest training points.
pub struct FastAngleBasedOutlierFactor<L = i32> {
    /// The requested number of neighbors.
    n_neighbors: usize,
    /// Each label's training points, with the neighbor count capped at the
    /// label's cardinality.
    data: HashMap<Option<L>, (Vec<Vec<f64>>, usize)>,
}

impl<L> FastAngleBasedOutlierFactor<L> {
    /// Create an unfit model with the given number of neighbors.
    #[must_use]
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors,
            data: HashMap::new(),
        }
    }
}

impl<L> Default for FastAngleBasedOutlierFactor<L> {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORS)
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for FastAngleBasedOutlierFactor<L> {
    fn name(&self) -> String {
        if self.n_neighbors == DEFAULT_NEIGHBORS {
            "FastAngleBasedOutlierFactor".to_string()
        } else {
            format!("FastAngleBasedOutlierFactor({})", self.n_neighbors)
        }
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.data = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| {
                let k = Ord::min(self.n_neighbors, rows.len());
                (label, (rows, k))
            })
            .collect();
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let (points, k) = fetch(&self.data, y)?;
        Ok(x.iter()
            .map(|row| {
                negated_angle_variance(&nearest_points(points, row, *k), row, Angle::Weighted)
            })
            .collect())
    }
}

/// Approximate angle-based outlier factor with plain cosine angles, over
/// pairs among the query's k nearest training points.
pub struct FastAngleBasedOutlierFactor2<L = i32> {
    /// The requested number of neighbors.
    n_neighbors: usize,
    /// Each label's training points, with the neighbor count capped at the
    /// label's cardinality.
    data: HashMap<Option<L>, (Vec<Vec<f64>>, usize)>,
}

impl<L> FastAngleBasedOutlierFactor2<L> {
    /// Create an unfit model with the given number of neighbors.
    #[must_use]
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors,
            data: HashMap::new(),
        }
    }
}

impl<L> Default for FastAngleBasedOutlierFactor2<L> {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORS)
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for FastAngleBasedOutlierFactor2<L> {
    fn name(&self) -> String {
        if self.n_neighbors == DEFAULT_NEIGHBORS {
            "FastAngleBasedOutlierFactor2".to_string()
        } else {
            format!("FastAngleBasedOutlierFactor2({})", self.n_neighbors)
        }
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.data = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| {
                let k = Ord::min(self.n_neighbors, rows.len());
                (label, (rows, k))
            })
            .collect();
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let (points, k) = fetch(&self.data, y)?;
        Ok(x.iter()
            .map(|row| {
                negated_angle_variance(&nearest_points(points, row, *k), row, Angle::Cosine)
            })
            .collect())
    }
}
