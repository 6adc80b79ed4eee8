//! Backend abstraction for the essences.
//!
//! Each essence has a baseline implementation that always exists and an
//! optional accelerated implementation chosen at startup. [`Strategy`]
//! tries the accelerated variant first and degrades to the baseline when it
//! fails.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::essence::types::{ParallelResult, SecurityResult};
use crate::observability::metrics;

/// Errors raised while executing an essence.
#[derive(Debug, Error)]
pub enum EssenceError {
    /// An accelerated backend could not serve the call.
    #[error("{engine} backend unavailable: {reason}")]
    Unavailable { engine: &'static str, reason: String },

    /// The bounded worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A blocking task died before producing a result.
    #[error("essence task failed: {0}")]
    Task(String),
}

pub type EssenceResult<T> = Result<T, EssenceError>;

/// Elapsed time attached to every essence result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Whole milliseconds, truncated.
    pub processing_time_ms: u64,
    /// Seconds as a float.
    pub processing_time: f64,
}

impl Timing {
    /// Measure the time elapsed since `start`.
    pub fn since(start: Instant) -> Self {
        let elapsed = start.elapsed();
        Self {
            processing_time_ms: elapsed.as_millis() as u64,
            processing_time: elapsed.as_secs_f64(),
        }
    }
}

/// Security-hash essence.
pub trait SecurityBackend: Send + Sync {
    /// Label reported in results as `engine`.
    fn engine(&self) -> &'static str;

    /// Produce a digest record for `data`.
    fn secure(&self, data: &str) -> EssenceResult<SecurityResult>;
}

/// Parallel fan-out essence.
pub trait ParallelBackend: Send + Sync {
    /// Label reported in results as `engine`.
    fn engine(&self) -> &'static str;

    /// Fan `data` out to `workers` workers and collect one entry per worker.
    fn fan_out(&self, data: &str, workers: usize) -> EssenceResult<ParallelResult>;
}

/// Accelerated-or-baseline selection for a single essence.
pub struct Strategy<B: ?Sized> {
    essence: &'static str,
    accelerated: Option<Arc<B>>,
    fallback: Arc<B>,
}

impl<B: ?Sized> Clone for Strategy<B> {
    fn clone(&self) -> Self {
        Self {
            essence: self.essence,
            accelerated: self.accelerated.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<B: ?Sized> Strategy<B> {
    /// Strategy with only the baseline implementation.
    pub fn fallback_only(essence: &'static str, fallback: Arc<B>) -> Self {
        Self {
            essence,
            accelerated: None,
            fallback,
        }
    }

    /// Attach an accelerated implementation.
    pub fn with_accelerated(mut self, accelerated: Arc<B>) -> Self {
        self.accelerated = Some(accelerated);
        self
    }

    /// Whether an accelerated implementation was selected.
    pub fn is_accelerated(&self) -> bool {
        self.accelerated.is_some()
    }

    pub fn accelerated(&self) -> Option<&Arc<B>> {
        self.accelerated.as_ref()
    }

    pub fn fallback(&self) -> &Arc<B> {
        &self.fallback
    }

    /// Run `op` on the accelerated backend when allowed, degrading to the
    /// baseline on failure. Baseline errors propagate.
    pub fn run<T>(
        &self,
        allow_accelerated: bool,
        op: impl Fn(&B) -> EssenceResult<T>,
    ) -> EssenceResult<T> {
        if allow_accelerated {
            if let Some(accelerated) = &self.accelerated {
                match op(&**accelerated) {
                    Ok(result) => return Ok(result),
                    Err(e) => {
                        tracing::warn!(
                            essence = self.essence,
                            error = %e,
                            "Accelerated backend failed, falling back"
                        );
                        metrics::record_fallback(self.essence);
                    }
                }
            }
        }
        op(&*self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Echo: Send + Sync {
        fn echo(&self, input: u32) -> EssenceResult<(&'static str, u32)>;
    }

    struct Baseline;
    impl Echo for Baseline {
        fn echo(&self, input: u32) -> EssenceResult<(&'static str, u32)> {
            Ok(("baseline", input))
        }
    }

    struct Flaky {
        calls: AtomicUsize,
        fail: bool,
    }
    impl Echo for Flaky {
        fn echo(&self, input: u32) -> EssenceResult<(&'static str, u32)> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(EssenceError::Unavailable {
                    engine: "flaky",
                    reason: "symbol missing".into(),
                })
            } else {
                Ok(("accelerated", input * 2))
            }
        }
    }

    fn baseline() -> Arc<dyn Echo> {
        Arc::new(Baseline)
    }

    #[test]
    fn test_fallback_only() {
        let strategy = Strategy::fallback_only("echo", baseline());
        assert!(!strategy.is_accelerated());
        let out = strategy.run(true, |b| b.echo(3)).unwrap();
        assert_eq!(out, ("baseline", 3));
    }

    #[test]
    fn test_accelerated_used_when_allowed() {
        let fast = Arc::new(Flaky { calls: AtomicUsize::new(0), fail: false });
        let strategy =
            Strategy::fallback_only("echo", baseline()).with_accelerated(fast.clone());

        assert_eq!(strategy.run(true, |b| b.echo(3)).unwrap(), ("accelerated", 6));
        assert_eq!(strategy.run(false, |b| b.echo(3)).unwrap(), ("baseline", 3));
        assert_eq!(fast.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_accelerated_failure_degrades() {
        let broken = Arc::new(Flaky { calls: AtomicUsize::new(0), fail: true });
        let strategy =
            Strategy::fallback_only("echo", baseline()).with_accelerated(broken.clone());

        assert_eq!(strategy.run(true, |b| b.echo(5)).unwrap(), ("baseline", 5));
        assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
    }
}
