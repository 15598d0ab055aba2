//! Disk-backed memoization for experiment results.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::distributions::Summary;

/// Bump this when the meaning of a cached result changes, so stale files
/// stop matching.
pub const CACHE_VERSION: u32 = 1;

/// The full parameter tuple identifying one experiment run.
///
/// Every input is spelled out explicitly. Nothing is derived from argument
/// reflection, so two runs collide only when they agree on every field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// The cache format version that produced the entry.
    pub version: u32,
    /// The dimensionality of the generated clusters.
    pub dimension: usize,
    /// The nominal distance of the outlier cluster.
    pub distance: i64,
    /// The name of the generating distribution.
    pub distribution: String,
    /// The name of the model, with its parameter when non-default.
    pub model: String,
    /// The number of training samples.
    pub samples: usize,
    /// The generator seed.
    pub seed: u64,
}

/// A persistent map from experiment parameters to their summaries, saved to
/// a single binary file after every insertion.
pub struct DiskCache {
    /// Where the cache file lives.
    path: PathBuf,
    /// The in-memory view of the cache file.
    records: HashMap<CacheKey, Summary>,
}

impl DiskCache {
    /// Open the cache at the given path, loading any existing records.
    ///
    /// A missing file is an empty cache, not an error.
    ///
    /// # Errors
    ///
    /// If an existing file cannot be read or deserialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let file = File::open(&path)
                .map_err(|reason| format!("Could not open {path:?}: {reason}"))?;
            bincode::deserialize_from(BufReader::new(file))
                .map_err(|reason| format!("Could not deserialize {path:?}: {reason}"))?
        } else {
            HashMap::new()
        };
        Ok(Self { path, records })
    }

    /// Look up the summary for the given key.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<&Summary> {
        self.records.get(key)
    }

    /// Store a summary under the given key and persist the cache.
    ///
    /// # Errors
    ///
    /// If the cache file cannot be written.
    pub fn insert(&mut self, key: CacheKey, summary: Summary) -> Result<(), String> {
        self.records.insert(key, summary);
        self.save()
    }

    /// Drop every record and persist the now-empty cache.
    ///
    /// # Errors
    ///
    /// If the cache file cannot be written.
    pub fn clear(&mut self) -> Result<(), String> {
        self.records.clear();
        self.save()
    }

    /// The number of cached records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the cache holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the records to the cache file.
    fn save(&self) -> Result<(), String> {
        let file = File::create(&self.path)
            .map_err(|reason| format!("Could not create {:?}: {reason}", self.path))?;
        bincode::serialize_into(BufWriter::new(file), &self.records)
            .map_err(|reason| format!("Could not serialize to {:?}: {reason}", self.path))
    }
}
