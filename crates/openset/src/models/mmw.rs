//! Min-max window distance.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use super::{fetch, partition_by_label, DistanceModel};

/// Scores each query by the fraction of its features falling outside the
/// per-coordinate min-max window of the label's training data.
///
/// A query fully inside the window scores `0.0`, one fully outside `1.0`.
pub struct MinMaxWindow<L = i32> {
    /// The per-coordinate minima and maxima of each label's training data.
    windows: HashMap<Option<L>, (Vec<f64>, Vec<f64>)>,
}

impl<L> Default for MinMaxWindow<L> {
    fn default() -> Self {
        Self {
            windows: HashMap::new(),
        }
    }
}

/// The per-coordinate minima and maxima of the given rows.
pub(crate) fn bounds(rows: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let d = rows.first().map_or(0, Vec::len);
    let mut mins = vec![f64::INFINITY; d];
    let mut maxes = vec![f64::NEG_INFINITY; d];
    for row in rows {
        for ((min, max), &value) in mins.iter_mut().zip(maxes.iter_mut()).zip(row.iter()) {
            *min = min.min(value);
            *max = max.max(value);
        }
    }
    (mins, maxes)
}

impl<L: Eq + Hash + Clone + Debug> DistanceModel<L> for MinMaxWindow<L> {
    fn name(&self) -> String {
        "MinMaxWindow".to_string()
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
                let inside = row
                    .iter()
                    .zip(mins.iter())
                    .zip(maxes.iter())
                    .filter(|((&value, &min), &max)| min <= value && value <= max)
                    .count();
                #[allow(clippy::cast_precision_loss)]
                let fraction = inside as f64 / row.len() as f64;
                1.0 - fraction
            })
            .collect())
    }
}
