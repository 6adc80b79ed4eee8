//! ILN essence engine library.
//!
//! A small HTTP service that drives three simulated "essences"
//! (security hash, parallel fan-out, reactive event) through backends
//! selected by capability detection at startup.

pub mod config;
pub mod essence;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod stats;

pub use config::EngineConfig;
pub use essence::EssenceEngine;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
