//! Essence dispatcher.
//!
//! Owns the per-essence strategies selected at startup and drives them
//! according to the processing mode of each request.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::essence::backend::{EssenceResult, ParallelBackend, SecurityBackend, Strategy};
use crate::essence::detector::Capabilities;
use crate::essence::parallel::ThreadPoolFanOut;
use crate::essence::reactive::{self, event_reactive};
use crate::essence::security::Sha256Digest;
use crate::essence::types::{
    EssenceBundle, IterationSample, ParallelResult, ProcessingMode, ReactiveResult,
    SecurityResult, StressReport,
};

/// Workers used by every stress iteration.
const STRESS_WORKERS: usize = 4;
/// Number of per-iteration samples kept in a stress report.
const STRESS_SAMPLES: usize = 5;

/// Engine labels currently serving each essence.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSelection {
    pub security: &'static str,
    pub parallel: &'static str,
    pub reactive: &'static str,
}

/// One processing job, already validated.
#[derive(Debug, Clone)]
pub struct Job {
    pub data: String,
    pub mode: ProcessingMode,
    pub workers: usize,
    pub use_native_libs: bool,
}

#[derive(Clone)]
pub struct EssenceEngine {
    capabilities: Capabilities,
    security: Strategy<dyn SecurityBackend>,
    parallel: Strategy<dyn ParallelBackend>,
}

impl EssenceEngine {
    /// Select backends from a detection result.
    ///
    /// Native bindings never load in this build, so both strategies hold
    /// only their baseline.
    pub fn from_detection(capabilities: Capabilities) -> Self {
        let security: Arc<dyn SecurityBackend> = Arc::new(Sha256Digest);
        let parallel: Arc<dyn ParallelBackend> = Arc::new(ThreadPoolFanOut);
        Self {
            capabilities,
            security: Strategy::fallback_only("security", security),
            parallel: Strategy::fallback_only("parallel", parallel),
        }
    }

    /// Build an engine from explicit strategies.
    pub fn with_backends(
        capabilities: Capabilities,
        security: Strategy<dyn SecurityBackend>,
        parallel: Strategy<dyn ParallelBackend>,
    ) -> Self {
        Self {
            capabilities,
            security,
            parallel,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Engines that answer when nothing fails.
    pub fn selection(&self) -> EngineSelection {
        EngineSelection {
            security: self
                .security
                .accelerated()
                .unwrap_or(self.security.fallback())
                .engine(),
            parallel: self
                .parallel
                .accelerated()
                .unwrap_or(self.parallel.fallback())
                .engine(),
            reactive: reactive::ENGINE,
        }
    }

    /// Security-hash essence.
    pub fn own_secure(
        &self,
        data: &str,
        mode: ProcessingMode,
        use_native_libs: bool,
    ) -> EssenceResult<SecurityResult> {
        let allow = use_native_libs && mode.allows_native_security();
        self.security.run(allow, |backend| backend.secure(data))
    }

    /// Parallel fan-out essence.
    pub fn chan_parallel(
        &self,
        data: &str,
        workers: usize,
        use_native_libs: bool,
    ) -> EssenceResult<ParallelResult> {
        self.parallel
            .run(use_native_libs, |backend| backend.fan_out(data, workers))
    }

    /// Reactive-event essence.
    pub fn event_reactive(&self, data: &str, event_type: &str) -> ReactiveResult {
        event_reactive(data, event_type)
    }

    /// Run all three essences for one job.
    pub fn process(&self, job: &Job) -> EssenceResult<EssenceBundle> {
        let plan = job.mode.plan(job.workers);

        let security_result = self.own_secure(&job.data, job.mode, job.use_native_libs)?;
        let parallel_result =
            self.chan_parallel(&job.data, plan.parallel_workers, job.use_native_libs)?;
        let reactive_result = self.event_reactive(&job.data, plan.event_type);

        Ok(EssenceBundle {
            security_result,
            parallel_result,
            reactive_result,
            capabilities_used: plan.capabilities_used,
        })
    }

    /// Exercise accelerated backends once so failures surface at startup.
    pub fn warm_up(&self) {
        if self.security.is_accelerated() {
            match self.own_secure("warmup_test", ProcessingMode::Secure, true) {
                Ok(result) => tracing::info!(engine = %result.engine, "Security warm-up"),
                Err(e) => tracing::warn!(error = %e, "Security warm-up failed"),
            }
        }
        if self.parallel.is_accelerated() {
            match self.chan_parallel("warmup_test", 2, true) {
                Ok(result) => tracing::info!(engine = %result.engine, "Parallel warm-up"),
                Err(e) => tracing::warn!(error = %e, "Parallel warm-up failed"),
            }
        }
        if !self.security.is_accelerated() && !self.parallel.is_accelerated() {
            tracing::debug!("No accelerated backends selected, skipping warm-up");
        }
    }

    /// Run `iterations` sequential rounds over every essence.
    pub fn stress(&self, iterations: u32) -> EssenceResult<StressReport> {
        let test_data = "Stress test data ".repeat(50);
        let mut samples = Vec::with_capacity(STRESS_SAMPLES.min(iterations as usize));

        let start = Instant::now();
        for i in 0..iterations {
            let iteration_start = Instant::now();
            let data = format!("{}_{}", test_data, i);

            let security = self.own_secure(&data, ProcessingMode::Balanced, true)?;
            let parallel = self.chan_parallel(&data, STRESS_WORKERS, true)?;
            let reactive = self.event_reactive(&data, "process");

            if samples.len() < STRESS_SAMPLES {
                samples.push(IterationSample {
                    iteration: i + 1,
                    time: iteration_start.elapsed().as_secs_f64(),
                    security_engine: security.engine,
                    parallel_engine: parallel.engine,
                    reactive_engine: reactive.engine,
                });
            }
        }
        let total_time = start.elapsed().as_secs_f64();

        Ok(StressReport {
            iterations,
            total_time,
            average_time_per_iteration: ratio(total_time, iterations as f64),
            requests_per_second: ratio(iterations as f64, total_time),
            sample_results: samples,
        })
    }
}

/// `numerator / denominator`, or zero when the denominator is zero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
