#![deny(clippy::correctness)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic,
    clippy::nursery,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::cast_lossless
)]
#![doc = include_str!("../README.md")]

pub mod experiments;
mod linalg;
pub mod models;
pub mod runner;
pub mod stats;
mod utils;

pub use models::{DistanceModel, Model};
pub use runner::Runner;

/// The current version of the crate.
pub const VERSION: &str = "0.1.0";
