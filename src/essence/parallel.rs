//! Parallel fan-out essence backed by a short-lived bounded thread pool.

use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::essence::backend::{EssenceResult, ParallelBackend, Timing};
use crate::essence::types::ParallelResult;

/// Characters of input echoed back by each worker.
const PREVIEW_CHARS: usize = 10;

/// Baseline parallel backend.
///
/// Every call builds its own pool of exactly `workers` threads, so no state
/// is shared between requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPoolFanOut;

impl ParallelBackend for ThreadPoolFanOut {
    fn engine(&self) -> &'static str {
        "thread_pool_fallback"
    }

    fn fan_out(&self, data: &str, workers: usize) -> EssenceResult<ParallelResult> {
        let start = Instant::now();
        let preview: String = data.chars().take(PREVIEW_CHARS).collect();

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("fanout-{i}"))
            .build()?;

        let results: Vec<String> = pool.install(|| {
            (0..workers)
                .into_par_iter()
                .map(|id| format!("pool_worker_{}_processed_{}", id, preview))
                .collect()
        });

        Ok(ParallelResult {
            results,
            worker_count: workers,
            goroutines: workers,
            engine: self.engine().to_string(),
            timing: Timing::since(start),
        })
    }
}
