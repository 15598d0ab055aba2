//! Experiments measuring model behavior on generated data clusters.

pub mod cache;
mod distributions;

pub use cache::DiskCache;
pub use distributions::{Distribution, Generated, Summary, TESTING_SET_SIZE};
