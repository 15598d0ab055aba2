//! The generated-distributions experiment.

use core::fmt::Debug;
use core::hash::Hash;
use std::path::Path;
use std::time::Instant;

use clustergen::ClusterGenerator;
use mt_logger::{mt_log, Level};
use serde::{Deserialize, Serialize};

use super::cache::{CacheKey, DiskCache, CACHE_VERSION};
use crate::models::DistanceModel;
use crate::stats;

/// The number of samples in each of the two testing clusters.
pub const TESTING_SET_SIZE: usize = 1000;

/// The distribution family to generate the clusters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Distribution {
    /// Standard normal features, outliers shifted by the offset.
    Gaussian,
    /// Triangular features on `[-1, 1]`, outliers centered on the offset.
    Triangular,
    /// Uniform features on `[-1, 1)`, outliers shifted by the offset.
    Uniform,
}

impl Distribution {
    /// The lowercase name used in cache keys.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Triangular => "triangular",
            Self::Uniform => "uniform",
        }
    }
}

/// The outcome of one experiment run: the percentile profiles of the three
/// score vectors, plus wall-clock durations in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The percentile profile of the training cluster's scores.
    pub train: Vec<f64>,
    /// The percentile profile of the inlier testing cluster's scores.
    pub known: Vec<f64>,
    /// The percentile profile of the outlier testing cluster's scores.
    pub unknown: Vec<f64>,
    /// The time spent fitting the model, in seconds.
    pub time_fit: f64,
    /// The time spent scoring the training cluster, in seconds.
    pub time_score: f64,
}

/// Measures a model's behavior on generated data.
///
/// Generates three clusters of a given distribution and dimension: a
/// training set and two testing sets, one of inliers and one of outliers
/// shifted away by a given distance. The model is fit on the training set
/// and all three clusters are scored; the score vectors are compressed to
/// percentile profiles. The fitting and scoring times are also recorded.
///
/// With a cache attached, repeated runs with identical parameters are
/// served from disk.
pub struct Generated {
    /// The optional result cache.
    cache: Option<DiskCache>,
}

impl Default for Generated {
    fn default() -> Self {
        Self::new()
    }
}

impl Generated {
    /// Create an experiment without caching.
    #[must_use]
    pub const fn new() -> Self {
        Self { cache: None }
    }

    /// Create an experiment backed by a result cache at the given path.
    ///
    /// # Errors
    ///
    /// If an existing cache file cannot be read.
    pub fn with_cache<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        Ok(Self {
            cache: Some(DiskCache::new(path)?),
        })
    }

    /// Run the experiment, consulting the cache first when one is attached.
    ///
    /// The outlier cluster sits at the given nominal `distance`, scaled by
    /// `1 / sqrt(dimension)` per coordinate so the Euclidean separation is
    /// comparable across dimensions.
    ///
    /// # Errors
    ///
    /// If cluster generation, fitting, scoring, or cache persistence fails.
    pub fn get<L: Eq + Hash + Clone + Debug>(
        &mut self,
        dimension: usize,
        distance: i64,
        distribution: Distribution,
        model: &mut dyn DistanceModel<L>,
        samples: usize,
        seed: u64,
    ) -> Result<Summary, String> {
        let Some(cache) = self.cache.as_mut() else {
            return run(dimension, distance, distribution, model, samples, seed);
        };

        let key = CacheKey {
            version: CACHE_VERSION,
            dimension,
            distance,
            distribution: distribution.name().to_string(),
            model: model.name(),
            samples,
            seed,
        };

        if let Some(summary) = cache.get(&key) {
            mt_log!(Level::Debug, "Cache hit for {key:?}.");
            return Ok(summary.clone());
        }

        mt_log!(Level::Debug, "Cache miss for {key:?}.");
        let summary = run(dimension, distance, distribution, model, samples, seed)?;
        cache.insert(key, summary.clone())?;
        Ok(summary)
    }
}

/// Generate the three clusters, fit, score, and summarize.
fn run<L: Eq + Hash + Clone + Debug>(
    dimension: usize,
    distance: i64,
    distribution: Distribution,
    model: &mut dyn DistanceModel<L>,
    samples: usize,
    seed: u64,
) -> Result<Summary, String> {
    let mut generator = ClusterGenerator::new();
    generator.reset(seed, false);

    #[allow(clippy::cast_precision_loss)]
    let offset = distance as f64 / (dimension as f64).sqrt();

    let (training, typicals, outliers) = match distribution {
        Distribution::Gaussian => (
            generator.gaussian(samples, dimension, 0.0, 1.0)?,
            generator.gaussian(TESTING_SET_SIZE, dimension, 0.0, 1.0)?,
            generator.gaussian(TESTING_SET_SIZE, dimension, offset, 1.0)?,
        ),
        Distribution::Triangular => (
            generator.triangular(samples, dimension, -1.0, 0.0, 1.0)?,
            generator.triangular(TESTING_SET_SIZE, dimension, -1.0, 0.0, 1.0)?,
            generator.triangular(
                TESTING_SET_SIZE,
                dimension,
                offset - 1.0,
                offset,
                offset + 1.0,
            )?,
        ),
        Distribution::Uniform => (
            generator.uniform(samples, dimension, -1.0, 1.0),
            generator.uniform(TESTING_SET_SIZE, dimension, -1.0, 1.0),
            generator.uniform(TESTING_SET_SIZE, dimension, offset - 1.0, offset + 1.0),
        ),
    };

    let fitting = Instant::now();
    model.fit(&training, None)?;
    let time_fit = fitting.elapsed().as_secs_f64();

    let scoring = Instant::now();
    let train = stats::percentiles(&model.score(&training, None)?)?;
    let time_score = scoring.elapsed().as_secs_f64();

    let known = stats::percentiles(&model.score(&typicals, None)?)?;
    let unknown = stats::percentiles(&model.score(&outliers, None)?)?;

    Ok(Summary {
        train,
        known,
        unknown,
        time_fit,
        time_score,
    })
}
