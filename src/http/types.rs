//! Response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::essence::{
    Capabilities, CapabilityLabel, EngineSelection, EssenceBundle, ParallelResult,
    ProcessingMode, ReactiveResult, SecurityResult, StressReport,
};
use crate::stats::{PerformanceSnapshot, SystemMetrics};

/// Characters of input echoed back in `original_data`.
pub const PREVIEW_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub architecture: &'static str,
    pub version: &'static str,
    pub capabilities: Capabilities,
    pub performance: PerformanceSnapshot,
    pub system_metrics: SystemMetrics,
}

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub capabilities: Capabilities,
    pub architecture: &'static str,
    pub fallback_strategy: &'static str,
    pub engines: EngineSelection,
}

#[derive(Debug, Serialize)]
pub struct ProcessingResponse {
    pub status: &'static str,
    pub original_data: String,
    pub security_result: SecurityResult,
    pub parallel_result: ParallelResult,
    pub reactive_result: ReactiveResult,
    pub processing_mode: ProcessingMode,
    pub total_processing_time: f64,
    pub system_metrics: SystemMetrics,
    pub capabilities_used: Vec<CapabilityLabel>,
    pub timestamp: DateTime<Utc>,
}

impl ProcessingResponse {
    pub fn new(
        data: &str,
        mode: ProcessingMode,
        bundle: EssenceBundle,
        total_processing_time: f64,
        system_metrics: SystemMetrics,
    ) -> Self {
        Self {
            status: "success",
            original_data: preview(data),
            security_result: bundle.security_result,
            parallel_result: bundle.parallel_result,
            reactive_result: bundle.reactive_result,
            processing_mode: mode,
            total_processing_time,
            system_metrics,
            capabilities_used: bundle.capabilities_used,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StressResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: StressReport,
    pub capabilities: Capabilities,
    pub final_metrics: SystemMetrics,
}

/// Input truncated to [`PREVIEW_LIMIT`] characters, `...` marking a cut.
pub fn preview(data: &str) -> String {
    match data.char_indices().nth(PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}...", &data[..cut]),
        None => data.to_string(),
    }
}
