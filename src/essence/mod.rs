//! Essence subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     detector.rs (probe native libraries)
//!     → Capabilities
//!     → engine.rs (select accelerated or baseline backend per essence)
//!
//! Per request:
//!     ProcessingMode → ModePlan
//!     → security.rs  (SHA-256 digest)
//!     → parallel.rs  (bounded thread-pool fan-out)
//!     → reactive.rs  (event synthesis)
//!     → EssenceBundle
//! ```
//!
//! # Design Decisions
//! - Backends sit behind traits; the baseline is always present
//! - Accelerated failures degrade to the baseline, baseline failures propagate
//! - Selection happens once, the engine is immutable afterwards

pub mod backend;
pub mod detector;
pub mod engine;
pub mod parallel;
pub mod reactive;
pub mod security;
pub mod types;

pub use backend::{EssenceError, EssenceResult, ParallelBackend, SecurityBackend, Strategy, Timing};
pub use detector::{Capabilities, CapabilityDetector};
pub use engine::{EngineSelection, EssenceEngine, Job};
pub use types::{
    CapabilityLabel, EssenceBundle, ParallelResult, ProcessRequest, ProcessingMode,
    ReactiveResult, SecurityResult, StressReport,
};
