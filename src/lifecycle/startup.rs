//! Composition root.
//!
//! # Responsibilities
//! - Build the projector, metrics and routing context from configuration
//! - Start the worker pool, the broker and the client listener
//! - Run the broker under its supervisor and stop everything afterwards
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Workers start before the listener, so no client connects to a
//!   service without workers
//! - The projection caches are created here and handed to every worker

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, Notify};
use tokio::task::JoinHandle;

use crate::broker::{supervise, Broker, BrokerError};
use crate::config::{ServiceConfig, WorkerConfig};
use crate::context::RoutingContext;
use crate::engine::RoutingEngine;
use crate::lifecycle::Shutdown;
use crate::net::connection::accept_clients;
use crate::net::{ClientRegistry, ConnectionTracker, Frontend, Listener, ListenerError};
use crate::observability::Metrics;
use crate::projection::Projector;
use crate::worker::WorkerPool;

/// Requests buffered between client connections and the broker.
const FRONTEND_QUEUE: usize = 1024;

/// How long stopped connections get to close.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("failed to spawn worker threads: {0}")]
    Workers(#[from] std::io::Error),
}

/// A started service, ready to be run.
pub struct Service {
    local_addr: SocketAddr,
    broker: Broker,
    pool: WorkerPool,
    interrupt: Arc<Notify>,
    accept: JoinHandle<Result<(), ListenerError>>,
    tracker: ConnectionTracker,
    projector: Arc<Projector>,
    workers: WorkerConfig,
}

impl Service {
    pub async fn start(
        config: &ServiceConfig,
        engine: Arc<dyn RoutingEngine>,
        shutdown: &Shutdown,
    ) -> Result<Self, StartupError> {
        let projector = Arc::new(Projector::new(Arc::clone(&engine), &config.cache));
        let ctx = RoutingContext::new(
            engine,
            Arc::clone(&projector),
            Arc::new(Metrics::new()),
            config.routing.clone(),
            config.elevation.clone(),
        );

        let (backend_tx, backend_rx) = mpsc::unbounded_channel();
        let (pool, workers) = WorkerPool::spawn(config.workers.nb_threads, &ctx, &backend_tx)?;
        drop(backend_tx);

        let listener = Listener::bind(&config.listener).await?;
        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        let (frontend_tx, frontend_rx) = mpsc::channel(FRONTEND_QUEUE);
        let clients = ClientRegistry::new();
        let tracker = ConnectionTracker::new();
        let frontend = Frontend {
            broker: frontend_tx,
            clients: clients.clone(),
            tracker: tracker.clone(),
            max_frame_bytes: listener.max_frame_bytes(),
        };
        let accept = tokio::spawn(accept_clients(listener, frontend, shutdown.subscribe()));

        let broker = Broker::new(frontend_rx, backend_rx, workers, clients, config.workers.max_pending);

        tracing::info!(
            address = %local_addr,
            nb_threads = pool.len(),
            "Service started"
        );

        Ok(Self {
            local_addr,
            broker,
            pool,
            interrupt: Arc::new(Notify::new()),
            accept,
            tracker,
            projector,
            workers: config.workers.clone(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wakes the broker loop so that it is torn down and rebuilt.
    pub fn interrupt(&self) -> Arc<Notify> {
        Arc::clone(&self.interrupt)
    }

    /// Serve until shutdown or a fatal broker error, then stop the
    /// listener and wait for the workers.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) -> Result<(), BrokerError> {
        let Service {
            broker,
            pool,
            interrupt,
            accept,
            tracker,
            projector,
            workers,
            ..
        } = self;

        let result = supervise(broker, &interrupt, shutdown, &workers).await.map(drop);

        accept.abort();
        if tokio::time::timeout(DRAIN_TIMEOUT, tracker.wait_idle()).await.is_err() {
            tracing::warn!(active = tracker.active_count(), "Connections still open at shutdown");
        }

        if let Err(e) = tokio::task::spawn_blocking(move || pool.join()).await {
            tracing::error!(error = %e, "Worker pool did not stop cleanly");
        }

        for (travel_mode, stats) in projector.stats() {
            tracing::info!(
                mode = travel_mode.as_str(),
                calls = stats.calls,
                misses = stats.misses,
                size = stats.size,
                "Projection cache"
            );
        }
        tracing::info!("Service stopped");
        result
    }
}
