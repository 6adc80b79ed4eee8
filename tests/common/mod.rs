//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use iln_engine::config::EngineConfig;
use iln_engine::essence::{Capabilities, EssenceEngine};
use iln_engine::http::HttpServer;
use iln_engine::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A running engine bound to an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    #[allow(dead_code)]
    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config tuned for tests: fast monitoring ticks, short grace period.
pub fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.monitoring.interval_ms = 50;
    config.timeouts.shutdown_grace_secs = 1;
    config
}

pub async fn spawn_server(config: EngineConfig) -> TestServer {
    spawn_server_with_engine(config, EssenceEngine::from_detection(Capabilities::default())).await
}

#[allow(dead_code)]
pub async fn spawn_server_with_engine(config: EngineConfig, engine: EssenceEngine) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, engine, shutdown.clone());

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    wait_until_ready(addr).await;
    TestServer { addr, shutdown }
}

async fn wait_until_ready(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {} never became ready", addr);
}
