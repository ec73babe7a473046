//! API-Mocking Proxy (v1)
//!
//! An HTTP proxy that answers requests from recorded mock files on disk,
//! built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                   MOCK PROXY                      │
//!                      │                                                   │
//!     Client Request   │  ┌─────────┐    ┌──────────────┐    ┌─────────┐  │
//!     ─────────────────┼─▶│  http   │───▶│   routing    │───▶│mockpath │  │
//!                      │  │ server  │    │ (prefix map) │    │resolver │  │
//!                      │  └─────────┘    └──────────────┘    └────┬────┘  │
//!                      │                                          │       │
//!                      │                hit ┌──────────┐          ▼       │
//!     Client Response  │  ┌─────────┐ ◀────│ mock tree│◀── <data_root>/  │
//!     ◀────────────────┼──│passthru │      │ (disk)   │    dir/method/…  │
//!                      │  └─────────┘ miss └──────────┘    .mock          │
//!                      │       ▲             │                            │
//!                      │       └── upstream ◀┘ (live forward, optional)   │
//!                      │                                                   │
//!                      │  ┌─────────────────────────────────────────────┐ │
//!                      │  │           Cross-Cutting Concerns             │ │
//!                      │  │  config + reload │ observability │ lifecycle │ │
//!                      │  └─────────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mock_proxy::config::{load_config, watcher::ConfigWatcher, ProxyConfig};
use mock_proxy::http::HttpServer;
use mock_proxy::lifecycle::{signals, Shutdown};
use mock_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "mock-proxy")]
#[command(about = "API-mocking proxy serving recorded responses from disk", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "mock-proxy.toml")]
    config: PathBuf,

    /// Log every resolved mock path.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let mut config = if config_found {
        load_config(&cli.config)?
    } else {
        ProxyConfig::default()
    };
    if cli.verbose {
        config.verbose_paths = true;
    }

    logging::init_logging(&config.observability.log_level);
    if !config_found {
        tracing::warn!(path = ?cli.config, "Config file not found, using defaults");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        data_root = %config.data_root.display(),
        routes = config.routes.len(),
        "mock-proxy starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let state = server.state();

    // Hot reload: watcher pushes validated configs, the server swaps them in.
    let _watcher_guard = if config_found {
        let (watcher, mut updates) = ConfigWatcher::new(&cli.config);
        let guard = watcher.run()?;
        let mut reload_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(new_config) = updates.recv() => {
                        tracing::info!(routes = new_config.routes.len(), "Configuration reloaded");
                        state.replace_config(new_config);
                    }
                    _ = reload_shutdown.recv() => break,
                }
            }
        });
        Some(guard)
    } else {
        None
    };

    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::watch_signals(&shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
