//! Street router
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                STREET ROUTER                 │
//!                    │                                              │
//!   Client request   │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│   net    │──▶│  broker  │──▶│  worker  │  │
//!                    │  │ listener │   │ ready    │   │ threads  │  │
//!                    │  └──────────┘   │ queue    │   └────┬─────┘  │
//!                    │                 └──────────┘        │        │
//!                    │                                     ▼        │
//!                    │                 ┌───────────┐ ┌───────────┐  │
//!                    │                 │projection │ │  matrix / │  │
//!                    │                 │LRU caches │◀│  journey  │  │
//!                    │                 └─────┬─────┘ └─────┬─────┘  │
//!                    │                       ▼             ▼        │
//!                    │                 ┌─────────────────────────┐  │
//!                    │                 │     routing engine      │  │
//!                    │                 └─────────────────────────┘  │
//!   Client response  │  ┌──────────┐                                │
//!   ◀────────────────┼──│   net    │◀── broker ◀── worker reply     │
//!                    │  └──────────┘                                │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use street_router::config::loader;
use street_router::engine::{CrowFlyEngine, RoutingEngine};
use street_router::lifecycle::{signals, Service, Shutdown};
use street_router::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "street-router")]
#[command(about = "Street-network routing service", long_about = None)]
struct Args {
    /// TOML configuration file; defaults and STREET_ROUTER_* variables apply without it
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = loader::load(args.config.as_deref())?;

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "street-router starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        nb_threads = config.workers.nb_threads,
        walking_cache = config.cache.walking,
        bike_cache = config.cache.bike,
        car_cache = config.cache.car,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                metrics::init_metrics(addr)?;
                metrics::record_status(&config);
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let engine: Arc<dyn RoutingEngine> = Arc::new(CrowFlyEngine::new(
        config.engine.clone(),
        config.routing.clone(),
    ));

    let shutdown = Arc::new(Shutdown::new());
    let service = Service::start(&config, engine, &shutdown).await?;

    let signal_task = tokio::spawn(signals::listen(Arc::clone(&shutdown), service.interrupt()));

    service.run(shutdown.subscribe()).await?;
    signal_task.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
