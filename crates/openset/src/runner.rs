//! Parallel dispatch of independent experiment jobs.

use std::sync::atomic::{AtomicUsize, Ordering};

use mt_logger::{mt_log, Level};
use rayon::prelude::*;

/// Runs a function over a collection of argument tuples on a worker pool,
/// logging coarse progress along the way.
///
/// Returned values are ignored; the function is expected to persist its
/// results itself, e.g. through a [`DiskCache`](crate::experiments::DiskCache).
pub struct Runner {
    /// The number of worker threads, or `None` for the rayon default.
    num_threads: Option<usize>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// Create a runner using the default thread count.
    #[must_use]
    pub const fn new() -> Self {
        Self { num_threads: None }
    }

    /// Create a runner with an explicit thread count.
    #[must_use]
    pub const fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Call the function once per argument, in parallel.
    ///
    /// # Errors
    ///
    /// If the requested thread pool cannot be built.
    pub fn run<A, F>(&self, arguments: Vec<A>, function: F) -> Result<(), String>
    where
        A: Send,
        F: Fn(A) + Send + Sync,
    {
        let total = arguments.len();
        let step = Ord::max(total / 10, 1);
        let completed = AtomicUsize::new(0);

        let tracked = |argument: A| {
            function(argument);
            let count = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if count % step == 0 || count == total {
                mt_log!(Level::Info, "Completed {count}/{total} jobs.");
            }
        };

        if let Some(num_threads) = self.num_threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .map_err(|reason| format!("Could not build the thread pool: {reason}"))?;
            pool.install(|| arguments.into_par_iter().for_each(&tracked));
        } else {
            arguments.into_par_iter().for_each(&tracked);
        }
        Ok(())
    }
}
