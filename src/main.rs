//! ILN essence engine (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────────────┐
//!                    │                    ESSENCE ENGINE                      │
//!                    │                                                        │
//!   Client Request   │  ┌──────────┐    ┌──────────┐    ┌────────────────┐   │
//!   ─────────────────┼─▶│ listener │───▶│   http   │───▶│  essence       │   │
//!                    │  │ tcp/tls  │    │  router  │    │  engine        │   │
//!                    │  └──────────┘    └────┬─────┘    └───────┬────────┘   │
//!                    │                       │                  │            │
//!                    │                       ▼                  ▼            │
//!                    │               ┌──────────────┐  ┌────────────────┐    │
//!                    │               │ ws/monitoring│  │ security  hash │    │
//!                    │               │  (1 Hz push) │  │ parallel  pool │    │
//!                    │               └──────────────┘  │ reactive event │    │
//!                    │                                 └────────────────┘    │
//!                    │  ┌──────────────────────────────────────────────────┐ │
//!                    │  │ config │ stats │ observability │ lifecycle       │ │
//!                    │  └──────────────────────────────────────────────────┘ │
//!                    └───────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use iln_engine::config::{resolve_config, ConfigOverrides};
use iln_engine::essence::{CapabilityDetector, EssenceEngine};
use iln_engine::http::HttpServer;
use iln_engine::lifecycle::{signals, Shutdown};
use iln_engine::net::tls::load_tls_config;
use iln_engine::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "iln-engine")]
#[command(about = "Multi-essence processing engine with capability detection", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "ILN_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = resolve_config(
        args.config.as_deref(),
        ConfigOverrides {
            port: args.port,
            log_level: args.log_level,
        },
    )?;

    logging::init_tracing(&config.observability);

    tracing::info!("iln-engine v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let capabilities = CapabilityDetector::new(&config.engine).detect();
    let engine = EssenceEngine::from_detection(capabilities);
    engine.warm_up();

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let bind_address = config.listener.bind_address.clone();
    let tls = config.listener.tls.clone();
    let server = HttpServer::new(config, engine, shutdown);

    tracing::info!("All systems ready");

    match tls {
        Some(tls) => {
            let rustls = load_tls_config(&tls).await?;
            let addr: SocketAddr = bind_address.parse()?;
            server.run_tls(addr, rustls).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            server.run(listener).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
