//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, CORS, metrics)
//! - Bind server to listener (plain TCP or TLS)
//! - Drain on shutdown, forcing exit after the grace period

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{CorsConfig, EngineConfig};
use crate::essence::EssenceEngine;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::{handlers, websocket};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::stats::{PerformanceTracker, ResourceSampler, SystemMetrics};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EngineConfig>,
    pub engine: Arc<EssenceEngine>,
    pub performance: Arc<PerformanceTracker>,
    pub resources: Arc<ResourceSampler>,
    pub shutdown: Shutdown,
}

impl AppState {
    pub fn new(config: EngineConfig, engine: EssenceEngine, shutdown: Shutdown) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            performance: Arc::new(PerformanceTracker::new()),
            resources: Arc::new(ResourceSampler::new()),
            shutdown,
        }
    }

    /// Current process metrics plus the request counter.
    pub fn system_metrics(&self) -> SystemMetrics {
        SystemMetrics::collect(&self.resources, self.engine.capabilities(), &self.performance)
    }
}

/// HTTP server for the essence engine.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EngineConfig, engine: EssenceEngine, shutdown: Shutdown) -> Self {
        let state = AppState::new(config, engine, shutdown);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let router = Router::new()
            .route("/health", get(handlers::health))
            .route("/capabilities", get(handlers::capabilities))
            .route("/metrics", get(handlers::system_metrics))
            .route("/process-advanced", post(handlers::process))
            .route("/test-iln", post(handlers::process))
            .route("/process", post(handlers::process))
            .route("/stress-test/{iterations}", get(handlers::stress_test))
            .route("/ws/monitoring", get(websocket::monitoring))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_connections));

        let router = if config.cors.enabled {
            router.layer(cors_layer(&config.cors))
        } else {
            router
        };

        router
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Shared handler state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let shutdown = self.state.shutdown.clone();
        let grace = Duration::from_secs(self.state.config.timeouts.shutdown_grace_secs);
        let mut stop = shutdown.listener();
        let mut deadline = shutdown.listener();

        let server = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                stop.recv().await;
            })
            .into_future();

        tokio::select! {
            result = server => result?,
            _ = async move {
                deadline.recv().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(grace_secs = grace.as_secs(), "Grace period elapsed, forcing shutdown");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS on `addr`.
    pub async fn run_tls(self, addr: SocketAddr, tls: RustlsConfig) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let grace = Duration::from_secs(self.state.config.timeouts.shutdown_grace_secs);
        let mut stop = self.state.shutdown.listener();
        let stop_handle = handle.clone();
        tokio::spawn(async move {
            stop.recv().await;
            stop_handle.graceful_shutdown(Some(grace));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::essence::Capabilities;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        HttpServer::new(
            EngineConfig::default(),
            EssenceEngine::from_detection(Capabilities::default()),
            Shutdown::new(),
        )
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_is_healthy() {
        let (status, json) = send(
            server().router(),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["capabilities"]["baseline"], true);
    }

    #[tokio::test]
    async fn test_request_id_and_nosniff_headers() {
        let response = server()
            .router()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");

        let response = server()
            .router()
            .oneshot(
                Request::get("/metrics")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_all_processing_routes_share_handler() {
        let server = server();
        for route in ["/process-advanced", "/test-iln", "/process"] {
            let (status, json) = send(
                server.router(),
                post_json(route, r#"{"text": "hello", "mode": "fast", "workers": 3}"#),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "route {route}");
            assert_eq!(json["processing_mode"], "fast");
            assert_eq!(json["parallel_result"]["results"].as_array().unwrap().len(), 3);
        }
        assert_eq!(server.state().performance.requests_processed(), 3);
    }

    #[tokio::test]
    async fn test_unknown_mode_rejected_before_processing() {
        let server = server();
        let (status, json) = send(
            server.router(),
            post_json("/process", r#"{"data": "hello", "processing_mode": "turbo"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "invalid_request");
        assert_eq!(server.state().performance.requests_processed(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_body_is_unprocessable() {
        let server = server();
        let (status, json) = send(server.router(), post_json("/process", "{not json")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "invalid_request");

        let (status, json) = send(
            server.router(),
            Request::post("/process")
                .body(Body::from(r#"{"data": "hello"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "invalid_request");

        let (status, _) = send(server.router(), post_json("/process", r#"{"workers": 2}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(server.state().performance.requests_processed(), 0);
    }

    #[tokio::test]
    async fn test_workers_out_of_range() {
        let server = server();
        for workers in [0, 17] {
            let body = format!(r#"{{"data": "hello", "workers": {workers}}}"#);
            let (status, json) = send(server.router(), post_json("/process", &body)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert!(json["detail"].as_str().unwrap().contains("workers"));
        }
        assert_eq!(server.state().performance.requests_processed(), 0);
    }

    #[tokio::test]
    async fn test_stress_limits() {
        let server = server();
        let (status, json) = send(
            server.router(),
            Request::get("/stress-test/101").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "iteration_limit");

        let (status, json) = send(
            server.router(),
            Request::get("/stress-test/0").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["iterations"], 0);
        assert_eq!(json["requests_per_second"], 0.0);

        let (status, _) = send(
            server.router(),
            Request::get("/stress-test/-1").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/process")
                    .header("origin", "http://dashboard.local")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
