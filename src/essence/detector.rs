//! Capability detection.
//!
//! # Responsibilities
//! - Probe the configured native library paths once at startup
//! - Publish an immutable [`Capabilities`] snapshot
//!
//! No native loader is compiled in, so a library found on disk is reported
//! but never bound; the accelerated slots stay empty and the baseline
//! backends serve every request.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::EssenceConfig;

/// Snapshot of detected capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Accelerated security backend active.
    pub rust: bool,
    /// Accelerated parallel backend active.
    pub go: bool,
    /// In-process baseline, always present.
    pub baseline: bool,
    /// At least one native library was found on disk.
    pub native_libs: bool,
    pub async_support: bool,
    pub database_support: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            rust: false,
            go: false,
            baseline: true,
            native_libs: false,
            async_support: true,
            database_support: false,
        }
    }
}

/// Result of probing one native library path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Missing,
    /// File exists but cannot be bound by this build.
    Unsupported,
}

/// Probes optional native backends.
#[derive(Debug, Clone)]
pub struct CapabilityDetector {
    security_library: String,
    parallel_library: String,
}

impl CapabilityDetector {
    pub fn new(config: &EssenceConfig) -> Self {
        Self {
            security_library: config.native_security_library.clone(),
            parallel_library: config.native_parallel_library.clone(),
        }
    }

    /// Probe every configured library and build the capability snapshot.
    pub fn detect(&self) -> Capabilities {
        let security = probe("security", &self.security_library);
        let parallel = probe("parallel", &self.parallel_library);

        let capabilities = Capabilities {
            native_libs: security == Probe::Unsupported || parallel == Probe::Unsupported,
            ..Capabilities::default()
        };

        tracing::info!(
            rust = capabilities.rust,
            go = capabilities.go,
            native_libs = capabilities.native_libs,
            "Capability detection complete"
        );
        capabilities
    }
}

fn probe(essence: &'static str, path: &str) -> Probe {
    if Path::new(path).is_file() {
        tracing::warn!(
            essence,
            path,
            "Native library present but no loader is available, using baseline backend"
        );
        Probe::Unsupported
    } else {
        tracing::info!(essence, path, "Native library not available, using baseline backend");
        Probe::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(security: &str, parallel: &str) -> EssenceConfig {
        EssenceConfig {
            native_security_library: security.to_string(),
            native_parallel_library: parallel.to_string(),
            ..EssenceConfig::default()
        }
    }

    #[test]
    fn test_missing_libraries() {
        let detector = CapabilityDetector::new(&config_with(
            "/nonexistent/libiln_rust_core.so",
            "/nonexistent/libiln_go_core.so",
        ));
        let caps = detector.detect();
        assert_eq!(caps, Capabilities::default());
        assert!(caps.baseline);
        assert!(!caps.rust && !caps.go);
    }

    #[test]
    fn test_present_library_is_reported_but_not_bound() {
        let lib = tempfile::NamedTempFile::new().unwrap();
        let path = lib.path().to_string_lossy().to_string();
        let caps = CapabilityDetector::new(&config_with(&path, "/nonexistent.so")).detect();
        assert!(caps.native_libs);
        assert!(!caps.rust);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(Capabilities::default()).unwrap();
        assert_eq!(json["baseline"], true);
        assert_eq!(json["async_support"], true);
        assert_eq!(json["database_support"], false);
    }
}
