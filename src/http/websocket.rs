//! Live monitoring over WebSocket.
//!
//! # Data Flow
//! ```text
//! interval tick → SystemMetrics → JSON text frame → client
//! ```
//!
//! # Design Decisions
//! - One independent frame per tick; no backpressure or replay
//! - Session ends on client close, socket error, or server shutdown
//! - Incoming client frames are read only to notice disconnects

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::time::{self, MissedTickBehavior};
use uuid::Uuid;

use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn monitoring(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_metrics(socket, state))
}

async fn stream_metrics(socket: WebSocket, state: AppState) {
    let session = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let mut shutdown = state.shutdown.listener();

    let mut ticker = time::interval(Duration::from_millis(state.config.monitoring.interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    metrics::monitoring_session_opened();
    tracing::info!(%session, "Monitoring session opened");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let payload = match serde_json::to_string(&state.system_metrics()) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(%session, error = %e, "Failed to serialize metrics");
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(payload.into())).await {
                    tracing::debug!(%session, error = %e, "Monitoring send failed");
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    None | Some(Ok(Message::Close(_))) => break,
                    Some(Err(e)) => {
                        tracing::debug!(%session, error = %e, "Monitoring socket error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            _ = shutdown.recv() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    }

    metrics::monitoring_session_closed();
    tracing::info!(%session, "Monitoring WebSocket disconnected");
}
