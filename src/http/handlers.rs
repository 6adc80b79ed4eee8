//! Route handlers for the JSON API.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::essence::{EssenceError, Job, ProcessRequest};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::http::types::{
    CapabilitiesResponse, HealthResponse, ProcessingResponse, StressResponse,
};
use crate::observability::metrics;
use crate::stats::SystemMetrics;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        architecture: "ILN Advanced Multi-Language",
        version: env!("CARGO_PKG_VERSION"),
        capabilities: state.engine.capabilities(),
        performance: state.performance.snapshot(),
        system_metrics: state.system_metrics(),
    })
}

pub async fn capabilities(State(state): State<AppState>) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse {
        capabilities: state.engine.capabilities(),
        architecture: "Progressive Multi-Language",
        fallback_strategy: "Intelligent degradation",
        engines: state.engine.selection(),
    })
}

pub async fn system_metrics(State(state): State<AppState>) -> Json<SystemMetrics> {
    Json(state.system_metrics())
}

/// Shared by `/process-advanced`, `/test-iln` and `/process`.
pub async fn process(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessingResponse>, ApiError> {
    let Json(request) = payload?;
    let job = validate_request(&state, request)?;

    tracing::debug!(
        mode = %job.mode,
        workers = job.workers,
        bytes = job.data.len(),
        "Processing request"
    );

    let start = Instant::now();
    let engine = state.engine.clone();
    let task_job = job.clone();
    let bundle = tokio::task::spawn_blocking(move || engine.process(&task_job))
        .await
        .map_err(|e| EssenceError::Task(e.to_string()))??;
    let elapsed = start.elapsed();

    state.performance.record(elapsed);

    Ok(Json(ProcessingResponse::new(
        &job.data,
        job.mode,
        bundle,
        elapsed.as_secs_f64(),
        state.system_metrics(),
    )))
}

fn validate_request(state: &AppState, request: ProcessRequest) -> Result<Job, ApiError> {
    let limits = &state.config.engine;
    let workers = request.workers.unwrap_or(limits.default_workers);
    if workers == 0 || workers > limits.max_workers {
        return Err(ApiError::InvalidRequest(format!(
            "workers must be between 1 and {}, got {}",
            limits.max_workers, workers
        )));
    }

    Ok(Job {
        data: request.data,
        mode: request.processing_mode,
        workers,
        use_native_libs: request.use_native_libs,
    })
}

pub async fn stress_test(
    State(state): State<AppState>,
    iterations: Result<Path<u32>, PathRejection>,
) -> Result<Json<StressResponse>, ApiError> {
    let Path(iterations) = iterations?;
    let max = state.config.engine.max_stress_iterations;
    if iterations > max {
        return Err(ApiError::IterationLimit {
            requested: iterations,
            max,
        });
    }

    let engine = state.engine.clone();
    let report = tokio::task::spawn_blocking(move || engine.stress(iterations))
        .await
        .map_err(|e| EssenceError::Task(e.to_string()))??;

    metrics::record_stress_iterations(iterations);
    tracing::info!(
        iterations,
        total_time = report.total_time,
        requests_per_second = report.requests_per_second,
        "Stress test completed"
    );

    Ok(Json(StressResponse {
        status: "completed",
        report,
        capabilities: state.engine.capabilities(),
        final_metrics: state.system_metrics(),
    }))
}
