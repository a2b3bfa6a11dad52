//! Evaluation settings for batched field queries.

/// Point count below which batches always run on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;
/// Number of points handed to one worker at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Controls how the batched evaluator schedules work.
///
/// Parallel dispatch only happens when the crate is built with the
/// `parallel` feature; otherwise `parallel` is ignored.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationConfig {
    /// Allow evaluation on the rayon thread pool.
    pub parallel: bool,
    /// Minimum number of points before parallel dispatch kicks in.
    pub parallel_threshold: usize,
    /// Points per parallel work item (at least one).
    pub chunk_size: usize,
    /// Worker count for a dedicated pool; `None` uses rayon's global pool.
    pub threads: Option<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: None,
        }
    }
}

impl EvaluationConfig {
    /// Configuration that never leaves the calling thread.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Enables or disables parallel dispatch.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the point count at which parallel dispatch starts.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the chunk size, clamped to at least one point.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Runs parallel batches on a dedicated pool of `threads` workers,
    /// clamped to at least one. Ignored without the `parallel` feature.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    /// True when a batch of `points` should be split across threads.
    #[must_use]
    pub fn dispatches_parallel(&self, points: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && points >= self.parallel_threshold
    }
}
