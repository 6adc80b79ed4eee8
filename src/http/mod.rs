//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, per-request span)
//!     → handlers.rs (JSON API) / websocket.rs (monitoring stream)
//!     → essence engine + stats
//!     → types.rs (response bodies) or error.rs (ApiError)
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;
pub mod types;
pub mod websocket;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
