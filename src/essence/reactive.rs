//! Reactive-event essence.
//!
//! There is no accelerated variant; the event is synthesized in-process.

use std::time::Instant;

use chrono::Utc;

use crate::essence::backend::Timing;
use crate::essence::types::ReactiveResult;

const REACTIVITY_FACTOR: f64 = 0.314159;

pub const ENGINE: &str = "event_simulation";

/// Emit a simulated event for `data`.
pub fn event_reactive(data: &str, event_type: &str) -> ReactiveResult {
    let start = Instant::now();
    let data_length = data.chars().count();
    let event_id = format!("{}_{}", event_type, Utc::now().timestamp_millis());

    ReactiveResult {
        event_id,
        event_type: event_type.to_string(),
        reactivity_score: reactivity_score(data_length),
        data_length,
        engine: ENGINE.to_string(),
        timing: Timing::since(start),
    }
}

/// `length * 0.314159`, rounded to three decimals.
pub fn reactivity_score(length: usize) -> f64 {
    (length as f64 * REACTIVITY_FACTOR * 1000.0).round() / 1000.0
}
