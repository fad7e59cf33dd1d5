//! Fixed pool of worker threads.

use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;

use crate::broker::{WorkerHandle, WorkerId};
use crate::context::RoutingContext;
use crate::journey::{ElevationClient, ElevationProvider};
use crate::net::frame::Multipart;
use crate::worker::handler::Handler;
use crate::worker::runner::run_worker;

pub struct WorkerPool {
    threads: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `nb_threads` named worker threads.
    ///
    /// Returns the pool and the inboxes the broker routes requests into.
    /// Replies and readiness signals go to `outbox`.
    pub fn spawn(
        nb_threads: usize,
        ctx: &RoutingContext,
        outbox: &mpsc::UnboundedSender<Multipart>,
    ) -> std::io::Result<(Self, Vec<WorkerHandle>)> {
        let mut threads = Vec::with_capacity(nb_threads);
        let mut handles = Vec::with_capacity(nb_threads);

        for n in 0..nb_threads {
            let name = format!("worker-{}", n);
            let id = WorkerId::from(name.as_str());
            let (inbox_tx, inbox_rx) = mpsc::channel(1);
            let ctx = ctx.clone();
            let outbox = outbox.clone();
            let thread_id = id.clone();

            let thread = thread::Builder::new().name(name).spawn(move || {
                // the blocking HTTP client must be built off the async runtime
                let elevation = match ElevationClient::from_config(&ctx.elevation) {
                    Ok(client) => client.map(|c| Box::new(c) as Box<dyn ElevationProvider>),
                    Err(e) => {
                        tracing::warn!(worker = %thread_id, error = %e, "Elevation service disabled");
                        None
                    }
                };
                run_worker(thread_id, Handler::new(ctx, elevation), inbox_rx, outbox);
            })?;

            threads.push(thread);
            handles.push(WorkerHandle { id, inbox: inbox_tx });
        }

        tracing::info!(nb_threads, "Worker pool started");
        Ok((Self { threads }, handles))
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Wait for every worker to stop. Workers stop once their inbox is
    /// dropped.
    pub fn join(self) {
        for thread in self.threads {
            let name = thread.thread().name().unwrap_or("worker").to_string();
            if thread.join().is_err() {
                tracing::error!(worker = %name, "Worker thread panicked");
            }
        }
    }
}
