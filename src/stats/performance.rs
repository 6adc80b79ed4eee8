//! Request counters for the processing endpoints.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Point-in-time copy of the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub requests_processed: u64,
    /// Running mean in seconds.
    pub average_response_time: f64,
}

/// Lock-guarded request counter and running average latency.
///
/// Both values change together under one lock, so a reader never sees a
/// count that disagrees with the average.
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    inner: Mutex<PerformanceSnapshot>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed request.
    pub fn record(&self, elapsed: Duration) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = inner.requests_processed as f64;
        inner.requests_processed += 1;
        inner.average_response_time = (inner.average_response_time * previous
            + elapsed.as_secs_f64())
            / inner.requests_processed as f64;
    }

    pub fn snapshot(&self) -> PerformanceSnapshot {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn requests_processed(&self) -> u64 {
        self.snapshot().requests_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_running_average() {
        let tracker = PerformanceTracker::new();
        assert_eq!(tracker.snapshot(), PerformanceSnapshot::default());

        tracker.record(Duration::from_millis(100));
        tracker.record(Duration::from_millis(300));

        let snap = tracker.snapshot();
        assert_eq!(snap.requests_processed, 2);
        assert!((snap.average_response_time - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_concurrent_records_are_all_counted() {
        let tracker = Arc::new(PerformanceTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        tracker.record(Duration::from_millis(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snap = tracker.snapshot();
        assert_eq!(snap.requests_processed, 2000);
        assert!((snap.average_response_time - 0.001).abs() < 1e-9);
    }
}
