//! Runtime statistics.
//!
//! # Data Flow
//! ```text
//! processing handlers → performance.rs (request count, running average)
//! /proc/self/*        → resource.rs (memory, CPU, threads, open files)
//!                     → SystemMetrics (served by /metrics, /health, /ws/monitoring)
//! ```

pub mod performance;
pub mod resource;

use serde::{Deserialize, Serialize};

use crate::essence::Capabilities;

pub use performance::{PerformanceSnapshot, PerformanceTracker};
pub use resource::{ResourceSampler, ResourceSnapshot, ResourceUsage};

/// Process metrics as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub memory_usage_mb: f64,
    pub cpu_percent: f64,
    pub threads: u64,
    pub open_files: u64,
    pub capabilities: Capabilities,
    pub requests_processed: u64,
}

impl SystemMetrics {
    pub fn collect(
        sampler: &ResourceSampler,
        capabilities: Capabilities,
        performance: &PerformanceTracker,
    ) -> Self {
        let usage = sampler.sample();
        Self {
            memory_usage_mb: usage.memory_usage_mb,
            cpu_percent: usage.cpu_percent,
            threads: usage.threads,
            open_files: usage.open_files,
            capabilities,
            requests_processed: performance.requests_processed(),
        }
    }
}
