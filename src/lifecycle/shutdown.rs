//! Shutdown coordination for the engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The HTTP server and every monitoring socket hold a [`ShutdownListener`].
/// The trigger is sticky: a listener created after [`Shutdown::trigger`]
/// resolves immediately instead of waiting for a broadcast it missed.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
            triggered: Arc::clone(&self.triggered),
        }
    }

    /// Signal every listener. Returns how many live listeners were notified.
    pub fn trigger(&self) -> usize {
        if self.triggered.swap(true, Ordering::SeqCst) {
            return 0;
        }
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::info!(listeners = notified, "Shutdown triggered, draining tasks");
        notified
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One task's view of the shutdown signal.
pub struct ShutdownListener {
    rx: broadcast::Receiver<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownListener {
    /// Resolve once shutdown has been triggered.
    pub async fn recv(&mut self) {
        if self.triggered.load(Ordering::SeqCst) {
            return;
        }
        // Closed or lagged both mean the coordinator is gone or has fired.
        let _ = self.rx.recv().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_every_listener() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.listener();
        let mut b = shutdown.clone().listener();

        assert_eq!(shutdown.trigger(), 2);
        a.recv().await;
        b.recv().await;
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_late_listener_resolves_immediately() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let mut late = shutdown.listener();
        tokio::time::timeout(Duration::from_millis(100), late.recv())
            .await
            .expect("late listener should not block");
    }

    #[test]
    fn test_second_trigger_notifies_nobody() {
        let shutdown = Shutdown::new();
        let _listener = shutdown.listener();
        assert_eq!(shutdown.trigger(), 1);
        assert_eq!(shutdown.trigger(), 0);
    }

    #[test]
    fn test_trigger_without_listeners_is_harmless() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.trigger(), 0);
        assert!(shutdown.is_triggered());
    }
}
