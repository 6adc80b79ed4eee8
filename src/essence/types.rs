//! Request and result records for the essences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::essence::backend::Timing;

/// Processing mode requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ProcessingMode {
    Secure,
    Fast,
    Reactive,
    #[default]
    Balanced,
    Benchmark,
}

impl ProcessingMode {
    pub const ALL: [ProcessingMode; 5] = [
        ProcessingMode::Secure,
        ProcessingMode::Fast,
        ProcessingMode::Reactive,
        ProcessingMode::Balanced,
        ProcessingMode::Benchmark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Secure => "secure",
            ProcessingMode::Fast => "fast",
            ProcessingMode::Reactive => "reactive",
            ProcessingMode::Balanced => "balanced",
            ProcessingMode::Benchmark => "benchmark",
        }
    }

    /// Whether the accelerated security backend may serve this mode.
    pub fn allows_native_security(&self) -> bool {
        matches!(self, ProcessingMode::Secure | ProcessingMode::Balanced)
    }

    /// Resolve how the essences are driven for this mode.
    pub fn plan(&self, requested_workers: usize) -> ModePlan {
        use CapabilityLabel::*;
        match self {
            ProcessingMode::Secure => ModePlan {
                parallel_workers: 2,
                event_type: "secure_event",
                capabilities_used: vec![Rust, Baseline],
            },
            ProcessingMode::Fast => ModePlan {
                parallel_workers: requested_workers,
                event_type: "fast_event",
                capabilities_used: vec![Go, Baseline],
            },
            ProcessingMode::Reactive => ModePlan {
                parallel_workers: 2,
                event_type: "reactive_event",
                capabilities_used: vec![Javascript, Baseline],
            },
            ProcessingMode::Benchmark => ModePlan {
                parallel_workers: requested_workers,
                event_type: "benchmark_event",
                capabilities_used: vec![Rust, Go, Javascript, Baseline],
            },
            ProcessingMode::Balanced => ModePlan {
                parallel_workers: requested_workers,
                event_type: "balanced_event",
                capabilities_used: vec![Rust, Go, Javascript, Baseline],
            },
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a mode string outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Mode must be one of: secure, fast, reactive, balanced, benchmark (got '{0}')")]
pub struct UnknownMode(pub String);

impl FromStr for ProcessingMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessingMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

impl TryFrom<String> for ProcessingMode {
    type Error = UnknownMode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Language-style label reported in `capabilities_used`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityLabel {
    Rust,
    Go,
    Javascript,
    Baseline,
}

/// How a single request drives the three essences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModePlan {
    pub parallel_workers: usize,
    pub event_type: &'static str,
    pub capabilities_used: Vec<CapabilityLabel>,
}

/// Body accepted by the processing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    #[serde(alias = "text")]
    pub data: String,

    #[serde(default, alias = "mode")]
    pub processing_mode: ProcessingMode,

    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub workers: Option<usize>,

    #[serde(default = "default_use_native_libs")]
    pub use_native_libs: bool,
}

fn default_use_native_libs() -> bool {
    true
}

/// Security-hash essence output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityResult {
    pub secure_hash: String,
    pub length: usize,
    pub engine: String,
    #[serde(flatten)]
    pub timing: Timing,
}

/// Parallel fan-out essence output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelResult {
    pub results: Vec<String>,
    pub worker_count: usize,
    pub goroutines: usize,
    pub engine: String,
    #[serde(flatten)]
    pub timing: Timing,
}

/// Reactive-event essence output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactiveResult {
    pub event_id: String,
    pub event_type: String,
    pub reactivity_score: f64,
    pub data_length: usize,
    pub engine: String,
    #[serde(flatten)]
    pub timing: Timing,
}

/// Combined output of one processing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssenceBundle {
    pub security_result: SecurityResult,
    pub parallel_result: ParallelResult,
    pub reactive_result: ReactiveResult,
    pub capabilities_used: Vec<CapabilityLabel>,
}

/// Per-iteration sample reported by the stress run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSample {
    pub iteration: u32,
    pub time: f64,
    pub security_engine: String,
    pub parallel_engine: String,
    pub reactive_engine: String,
}

/// Aggregate timing of a stress run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReport {
    pub iterations: u32,
    pub total_time: f64,
    pub average_time_per_iteration: f64,
    pub requests_per_second: f64,
    pub sample_results: Vec<IterationSample>,
}
