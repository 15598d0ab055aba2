//! The distance models and their shared two-phase contract.
//!
//! Every model partitions its training data by label at `fit` time and
//! derives per-label statistics; `score` evaluates query vectors against a
//! single label's statistics. By convention, higher scores mean "more
//! outlying", so models whose native formulation is inverted (a similarity,
//! or a depth where inliers score high) negate their result before returning.

mod abof;
mod correlation;
mod cosine;
mod euclidean;
mod irwd;
mod knn;
mod lof;
mod mahalanobis;
mod manhattan;
mod minkowski;
mod minmax;
mod mmw;
mod seuclidean;

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

pub use abof::{
    AngleBasedOutlierFactor, AngleBasedOutlierFactor2, FastAngleBasedOutlierFactor,
    FastAngleBasedOutlierFactor2,
};
pub use correlation::Correlation;
pub use cosine::Cosine;
pub use euclidean::Euclidean;
pub use irwd::IntegratedRankWeightedDepth;
pub use knn::KNearestNeighbors;
pub use lof::LocalOutlierFactor;
pub use mahalanobis::{Mahalanobis, MahalanobisSC};
pub use manhattan::Manhattan;
pub use minkowski::Minkowski;
pub use minmax::{MinMaxOutFactor, MinMaxOutScore};
pub use mmw::MinMaxWindow;
pub use seuclidean::SEuclidean;

/// The two-phase contract shared by every distance model.
///
/// A model starts unfit; `fit` computes per-label statistics from a training
/// set, and any number of `score` calls then evaluate query vectors against
/// one label's statistics. Calling `fit` again fully replaces the fitted
/// state; there is no incremental update.
///
/// # Type Parameters
///
/// - `L`: The type of the training labels. Unlabeled data uses the `None`
///   sentinel uniformly, so the fitted label set is over `Option<L>`.
pub trait DistanceModel<L: Eq + Hash + Clone + Debug> {
    /// The name of the model, including its configuration parameter when it
    /// differs from the default, e.g. `Minkowski(3)`.
    fn name(&self) -> String;

    /// Prepare the model from the given training data.
    ///
    /// The rows of `x` are copied into the model, partitioned by the
    /// parallel labels in `y` (or all assigned the default label when `y` is
    /// omitted), and reduced to model-specific per-label statistics.
    ///
    /// # Errors
    ///
    /// If `y` is given and its length does not match the number of rows in
    /// `x`. No partial state is retained on failure.
    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String>;

    /// Calculate the distance of each row of `x` from the training data of
    /// the given label, higher meaning more outlying.
    ///
    /// # Errors
    ///
    /// If `y` (or the default label, when `y` is omitted) was not among the
    /// labels seen at fit time.
    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String>;

    /// Alias for [`DistanceModel::fit`].
    ///
    /// # Errors
    ///
    /// See [`DistanceModel::fit`].
    fn train(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.fit(x, y)
    }

    /// Alias for [`DistanceModel::score`].
    ///
    /// # Errors
    ///
    /// See [`DistanceModel::score`].
    fn test(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        self.score(x, y)
    }
}

/// Partition training rows by their labels, copying them into the model.
///
/// With `y` omitted, every row is assigned the default `None` label.
///
/// # Errors
///
/// If the number of labels does not match the number of rows.
pub(crate) fn partition_by_label<L: Eq + Hash + Clone>(
    x: &[Vec<f64>],
    y: Option<&[L]>,
) -> Result<HashMap<Option<L>, Vec<Vec<f64>>>, String> {
    y.map_or_else(
        || Ok(core::iter::once((None, x.to_vec())).collect()),
        |labels| {
            if labels.len() == x.len() {
                let mut partition: HashMap<Option<L>, Vec<Vec<f64>>> = HashMap::new();
                for (row, label) in x.iter().zip(labels.iter()) {
                    partition
                        .entry(Some(label.clone()))
                        .or_default()
                        .push(row.clone());
                }
                Ok(partition)
            } else {
                Err(format!(
                    "X and y must have the same first dimension: {} != {}.",
                    x.len(),
                    labels.len()
                ))
            }
        },
    )
}

/// Look up the fitted statistics for the given label.
///
/// # Errors
///
/// If the label was not among the labels seen at fit time.
pub(crate) fn fetch<'a, L: Eq + Hash + Clone + Debug, S>(
    statistics: &'a HashMap<Option<L>, S>,
    y: Option<&L>,
) -> Result<&'a S, String> {
    let label = y.cloned();
    statistics
        .get(&label)
        .ok_or_else(|| format!("The label {label:?} is not known to the model."))
}

/// The closed set of distance models, with a string factory for mapping
/// configuration to a concrete instance.
#[non_exhaustive]
pub enum Model<L = i32> {
    /// L2 distance from the per-label mean vector.
    Euclidean(Euclidean<L>),
    /// L1 distance from the per-label mean vector.
    Manhattan(Manhattan<L>),
    /// Lp distance from the per-label mean vector.
    Minkowski(Minkowski<L>),
    /// Variance-standardized Euclidean distance from the mean vector.
    SEuclidean(SEuclidean<L>),
    /// One minus the cosine similarity against the mean vector.
    Cosine(Cosine<L>),
    /// One minus the Pearson correlation against the mean vector.
    Correlation(Correlation<L>),
    /// Mahalanobis distance with a per-label covariance matrix.
    Mahalanobis(Mahalanobis<L>),
    /// Mahalanobis distance with one covariance matrix pooled over labels.
    MahalanobisSC(MahalanobisSC<L>),
    /// Mean distance to the k nearest training points.
    KNearestNeighbors(KNearestNeighbors<L>),
    /// Novelty-mode local outlier factor.
    LocalOutlierFactor(LocalOutlierFactor<L>),
    /// Exact angle-based outlier factor, norm-weighted angles.
    AngleBasedOutlierFactor(AngleBasedOutlierFactor<L>),
    /// Exact angle-based outlier factor, plain cosine angles.
    AngleBasedOutlierFactor2(AngleBasedOutlierFactor2<L>),
    /// Approximate angle-based outlier factor over the k nearest neighbors.
    FastAngleBasedOutlierFactor(FastAngleBasedOutlierFactor<L>),
    /// Approximate cosine-angle outlier factor over the k nearest neighbors.
    FastAngleBasedOutlierFactor2(FastAngleBasedOutlierFactor2<L>),
    /// One minus the fraction of features inside the min-max window.
    MinMaxWindow(MinMaxWindow<L>),
    /// Fraction of features outside the min-max ranges.
    MinMaxOutFactor(MinMaxOutFactor<L>),
    /// Standardized distance past the min-max bounds.
    MinMaxOutScore(MinMaxOutScore<L>),
    /// Negated integrated rank-weighted depth.
    IntegratedRankWeightedDepth(IntegratedRankWeightedDepth<L>),
}

impl<L: Eq + Hash + Clone + Debug> Model<L> {
    /// Create a new model with default parameters from its name.
    ///
    /// # Errors
    ///
    /// If the model name is not recognized.
    pub fn new(model: &str) -> Result<Self, String> {
        Ok(match model {
            "euclidean" | "Euclidean" => Self::Euclidean(Euclidean::default()),
            "manhattan" | "Manhattan" => Self::Manhattan(Manhattan::default()),
            "minkowski" | "Minkowski" => Self::Minkowski(Minkowski::default()),
            "seuclidean" | "SEuclidean" => Self::SEuclidean(SEuclidean::default()),
            "cosine" | "Cosine" => Self::Cosine(Cosine::default()),
            "correlation" | "Correlation" => Self::Correlation(Correlation::default()),
            "mahalanobis" | "Mahalanobis" => Self::Mahalanobis(Mahalanobis::default()),
            "mahalanobis-sc" | "MahalanobisSC" => Self::MahalanobisSC(MahalanobisSC::default()),
            "knn" | "KNearestNeighbors" => Self::KNearestNeighbors(KNearestNeighbors::default()),
            "lof" | "LocalOutlierFactor" => {
                Self::LocalOutlierFactor(LocalOutlierFactor::default())
            }
            "abof" | "AngleBasedOutlierFactor" => {
                Self::AngleBasedOutlierFactor(AngleBasedOutlierFactor::default())
            }
            "abof2" | "AngleBasedOutlierFactor2" => {
                Self::AngleBasedOutlierFactor2(AngleBasedOutlierFactor2::default())
            }
            "fast-abof" | "FastAngleBasedOutlierFactor" => {
                Self::FastAngleBasedOutlierFactor(FastAngleBasedOutlierFactor::default())
            }
            "fast-abof2" | "FastAngleBasedOutlierFactor2" => {
                Self::FastAngleBasedOutlierFactor2(FastAngleBasedOutlierFactor2::default())
            }
            "mmw" | "MinMaxWindow" => Self::MinMaxWindow(MinMaxWindow::default()),
            "minmax-factor" | "MinMaxOutFactor" => {
                Self::MinMaxOutFactor(MinMaxOutFactor::default())
            }
            "minmax-score" | "MinMaxOutScore" => {
                Self::MinMaxOutScore(MinMaxOutScore::default())
            }
            "irwd" | "IntegratedRankWeightedDepth" => {
                Self::IntegratedRankWeightedDepth(IntegratedRankWeightedDepth::default())
            }
            _ => return Err(format!("Unknown model: {model}")),
        })
    }

    /// Create one of each model, with default parameters.
    #[must_use]
    pub fn default_models() -> Vec<Self> {
        vec![
            Self::Euclidean(Euclidean::default()),
            Self::Manhattan(Manhattan::default()),
            Self::Minkowski(Minkowski::default()),
            Self::SEuclidean(SEuclidean::default()),
            Self::Cosine(Cosine::default()),
            Self::Correlation(Correlation::default()),
            Self::Mahalanobis(Mahalanobis::default()),
            Self::MahalanobisSC(MahalanobisSC::default()),
            Self::KNearestNeighbors(KNearestNeighbors::default()),
            Self::LocalOutlierFactor(LocalOutlierFactor::default()),
            Self::AngleBasedOutlierFactor(AngleBasedOutlierFactor::default()),
            Self::AngleBasedOutlierFactor2(AngleBasedOutlierFactor2::default()),
            Self::FastAngleBasedOutlierFactor(FastAngleBasedOutlierFactor::default()),
            Self::FastAngleBasedOutlierFactor2(FastAngleBasedOutlierFactor2::default()),
            Self::MinMaxWindow(MinMaxWindow::default()),
            Self::MinMaxOutFactor(MinMaxOutFactor::default()),
            Self::MinMaxOutScore(MinMaxOutScore::default()),
            Self::IntegratedRankWeightedDepth(IntegratedRankWeightedDepth::default()),
        ]
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for Model<L> {
    fn name(&self) -> String {
        match self {
            Self::Euclidean(m) => m.name(),
            Self::Manhattan(m) => m.name(),
            Self::Minkowski(m) => m.name(),
            Self::SEuclidean(m) => m.name(),
            Self::Cosine(m) => m.name(),
            Self::Correlation(m) => m.name(),
            Self::Mahalanobis(m) => m.name(),
            Self::MahalanobisSC(m) => m.name(),
            Self::KNearestNeighbors(m) => m.name(),
            Self::LocalOutlierFactor(m) => m.name(),
            Self::AngleBasedOutlierFactor(m) => m.name(),
            Self::AngleBasedOutlierFactor2(m) => m.name(),
            Self::FastAngleBasedOutlierFactor(m) => m.name(),
            Self::FastAngleBasedOutlierFactor2(m) => m.name(),
            Self::MinMaxWindow(m) => m.name(),
            Self::MinMaxOutFactor(m) => m.name(),
            Self::MinMaxOutScore(m) => m.name(),
            Self::IntegratedRankWeightedDepth(m) => m.name(),
        }
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        match self {
            Self::Euclidean(m) => m.fit(x, y),
            Self::Manhattan(m) => m.fit(x, y),
            Self::Minkowski(m) => m.fit(x, y),
            Self::SEuclidean(m) => m.fit(x, y),
            Self::Cosine(m) => m.fit(x, y),
            Self::Correlation(m) => m.fit(x, y),
            Self::Mahalanobis(m) => m.fit(x, y),
            Self::MahalanobisSC(m) => m.fit(x, y),
            Self::KNearestNeighbors(m) => m.fit(x, y),
            Self::LocalOutlierFactor(m) => m.fit(x, y),
            Self::AngleBasedOutlierFactor(m) => m.fit(x, y),
            Self::AngleBasedOutlierFactor2(m) => m.fit(x, y),
            Self::FastAngleBasedOutlierFactor(m) => m.fit(x, y),
            Self::FastAngleBasedOutlierFactor2(m) => m.fit(x, y),
            Self::MinMaxWindow(m) => m.fit(x, y),
            Self::MinMaxOutFactor(m) => m.fit(x, y),
            Self::MinMaxOutScore(m) => m.fit(x, y),
            Self::IntegratedRankWeightedDepth(m) => m.fit(x, y),
        }
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        match self {
            Self::Euclidean(m) => m.score(x, y),
            Self::Manhattan(m) => m.score(x, y),
            Self::Minkowski(m) => m.score(x, y),
            Self::SEuclidean(m) => m.score(x, y),
            Self::Cosine(m) => m.score(x, y),
            Self::Correlation(m) => m.score(x, y),
            Self::Mahalanobis(m) => m.score(x, y),
            Self::MahalanobisSC(m) => m.score(x, y),
            Self::KNearestNeighbors(m) => m.score(x, y),
            Self::LocalOutlierFactor(m) => m.score(x, y),
            Self::AngleBasedOutlierFactor(m) => m.score(x, y),
            Self::AngleBasedOutlierFactor2(m) => m.score(x, y),
            Self::FastAngleBasedOutlierFactor(m) => m.score(x, y),
            Self::FastAngleBasedOutlierFactor2(m) => m.score(x, y),
            Self::MinMaxWindow(m) => m.score(x, y),
            Self::MinMaxOutFactor(m) => m.score(x, y),
            Self::MinMaxOutScore(m) => m.score(x, y),
            Self::IntegratedRankWeightedDepth(m) => m.score(x, y),
        }
    }
}
