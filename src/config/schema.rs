//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the engine.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the essence engine service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Essence engine tuning and native library probing.
    pub engine: EssenceConfig,

    /// Live monitoring stream settings.
    pub monitoring: MonitoringConfig,

    /// Cross-origin settings.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            tls: None,
            max_connections: 1_024,
        }
    }
}

impl ListenerConfig {
    /// Replace the port of the bind address, keeping the host.
    pub fn override_port(&mut self, port: u16) {
        let host = match self.bind_address.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => self.bind_address.clone(),
        };
        self.bind_address = format!("{}:{}", host, port);
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Grace period for draining connections on shutdown, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Essence engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EssenceConfig {
    /// Worker count used when a request does not specify one.
    pub default_workers: usize,

    /// Upper bound for the per-request worker count.
    pub max_workers: usize,

    /// Upper bound for `/stress-test/{n}`.
    pub max_stress_iterations: u32,

    /// Shared object probed for the accelerated security backend.
    pub native_security_library: String,

    /// Shared object probed for the accelerated parallel backend.
    pub native_parallel_library: String,
}

impl Default for EssenceConfig {
    fn default() -> Self {
        Self {
            default_workers: 4,
            max_workers: 16,
            max_stress_iterations: 100,
            native_security_library: "/usr/lib/libiln_rust_core.so".to_string(),
            native_parallel_library: "/usr/lib/libiln_go_core.so".to_string(),
        }
    }
}

/// Monitoring stream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Interval between pushed metric frames in milliseconds.
    pub interval_ms: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable the CORS layer.
    pub enabled: bool,

    /// Allowed origins; `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.engine.max_workers, 16);
        assert_eq!(config.engine.max_stress_iterations, 100);
        assert_eq!(config.monitoring.interval_ms, 1000);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_section() {
        let config: EngineConfig = toml::from_str(
            r#"
            [engine]
            default_workers = 8

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.default_workers, 8);
        assert_eq!(config.engine.max_workers, 16);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_override_port() {
        let mut listener = ListenerConfig::default();
        listener.override_port(9000);
        assert_eq!(listener.bind_address, "0.0.0.0:9000");

        listener.bind_address = "[::1]:80".to_string();
        listener.override_port(81);
        assert_eq!(listener.bind_address, "[::1]:81");
    }
}
