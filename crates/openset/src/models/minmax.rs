//! Min-max out-of-range factor and score.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::mmw::bounds;
use super::{fetch, partition_by_label, DistanceModel};
use crate::utils;

/// Scores each query by the fraction of its features lying outside the
/// per-coordinate min-max ranges of the label's training data, e.g. `0.25`
/// when a quarter of the features are out of range.
pub struct MinMaxOutFactor<L = i32> {
    /// The per-coordinate minima and maxima of each label's training data.
    windows: HashMap<Option<L>, (Vec<f64>, Vec<f64>)>,
}

impl<L> Default for MinMaxOutFactor<L> {
    fn default() -> Self {
        Self {
            windows: HashMap::new(),
        }
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for MinMaxOutFactor<L> {
    fn name(&self) -> String {
        "MinMaxOutFactor".to_string()
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.windows = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| (label, bounds(&rows)))
            .collect();
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let (mins, maxes) = fetch(&self.windows, y)?;
        Ok(x.iter()
            .map(|row| {
                let outside = row
                    .iter()
                    .zip(mins.iter())
                    .zip(maxes.iter())
                    .filter(|((&value, &min), &max)| value < min || max < value)
                    .count();
                #[allow(clippy::cast_precision_loss)]
                let fraction = outside as f64 / row.len() as f64;
                fraction
            })
            .collect())
    }
}

/// Scores each query by the variance-standardized distance of its
/// out-of-range features past the label's min-max bounds. A query inside
/// the min-max box scores zero; the deviations past the bounds are squared,
/// divided by the per-coordinate population variance, summed, and rooted.
pub struct MinMaxOutScore<L = i32> {
    /// The per-coordinate minima, maxima and population variances of each
    /// label's training data.
    statistics: HashMap<Option<L>, (Vec<f64>, Vec<f64>, Vec<f64>)>,
}

impl<L> Default for MinMaxOutScore<L> {
    fn default() -> Self {
        Self {
            statistics: HashMap::new(),
        }
    }
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for MinMaxOutScore<L> {
    fn name(&self) -> String {
        "MinMaxOutScore".to_string()
    }

    fn fit(&mut self, x: &[Vec<f64>], y: Option<&[L]>) -> Result<(), String> {
        self.statistics = partition_by_label(x, y)?
            .into_iter()
            .map(|(label, rows)| {
                let (mins, maxes) = bounds(&rows);
                let means = utils::mean_vector(&rows);
                let variances = utils::column_variances(&rows, &means);
                (label, (mins, maxes, variances))
            })
            .collect();
        Ok(())
    }

    fn score(&self, x: &[Vec<f64>], y: Option<&L>) -> Result<Vec<f64>, String> {
        let (mins, maxes, variances) = fetch(&self.statistics, y)?;
        Ok(x.iter()
            .map(|row| {
                row.iter()
                    .zip(mins.iter().zip(maxes.iter()))
                    .zip(variances.iter())
                    .map(|((&value, (&min, &max)), &variance)| {
                        let deviation = if value < min {
                            min - value
                        } else if value > max {
                            value - max
                        } else {
                            0.0
                        };
                        deviation * deviation / variance
                    })
                    .sum::<f64>()
                    .sqrt()
            })
            .collect())
    }
}
