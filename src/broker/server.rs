//! Broker polling loop and its supervisor.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, Notify};

use crate::broker::ready_queue::{ReadyQueue, WorkerState};
use crate::broker::{WorkerId, READY};
use crate::config::WorkerConfig;
use crate::net::frame::{self, Envelope, Multipart};
use crate::net::{ClientId, ClientRegistry};
use crate::resilience::backoff::calculate_backoff;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrokerError {
    #[error("broker loop interrupted")]
    Interrupted,

    #[error("all workers are gone")]
    WorkersGone,

    #[error("frontend channel closed")]
    FrontendClosed,
}

/// Inbox of one worker thread.
#[derive(Debug)]
pub struct WorkerHandle {
    pub id: WorkerId,
    pub inbox: mpsc::Sender<Multipart>,
}

/// Pairs client requests with idle workers.
///
/// All routing state lives here rather than in the polling loop, so a loop
/// rebuilt after an interruption resumes with the same ready and pending
/// queues.
pub struct Broker {
    frontend: mpsc::Receiver<Multipart>,
    backend: mpsc::UnboundedReceiver<Multipart>,
    workers: HashMap<WorkerId, mpsc::Sender<Multipart>>,
    ready: ReadyQueue,
    pending: VecDeque<Envelope>,
    max_pending: usize,
    clients: ClientRegistry,
}

impl Broker {
    pub fn new(
        frontend: mpsc::Receiver<Multipart>,
        backend: mpsc::UnboundedReceiver<Multipart>,
        workers: Vec<WorkerHandle>,
        clients: ClientRegistry,
        max_pending: usize,
    ) -> Self {
        Self {
            frontend,
            backend,
            workers: workers.into_iter().map(|w| (w.id, w.inbox)).collect(),
            ready: ReadyQueue::new(),
            pending: VecDeque::new(),
            max_pending,
            clients,
        }
    }

    /// Requests waiting for a worker.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn idle_workers(&self) -> usize {
        self.ready.idle()
    }

    /// Poll both sides until shutdown, interruption or a fatal error.
    pub async fn run(
        &mut self,
        interrupt: &Notify,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<(), BrokerError> {
        tracing::info!(
            workers = self.workers.len(),
            idle = self.ready.idle(),
            pending = self.pending.len(),
            "Broker loop started"
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Broker stopping");
                    return Ok(());
                }
                _ = interrupt.notified() => return Err(BrokerError::Interrupted),
                message = self.backend.recv() => match message {
                    Some(message) => self.on_worker_message(message),
                    None => return Err(BrokerError::WorkersGone),
                },
                // a full pending queue leaves requests in the bounded frontend channel
                message = self.frontend.recv(), if self.pending.len() < self.max_pending => match message {
                    Some(message) => self.on_client_message(message),
                    None => return Err(BrokerError::FrontendClosed),
                },
            }

            self.dispatch_pending()?;
        }
    }

    fn on_client_message(&mut self, message: Multipart) {
        match Envelope::parse(message) {
            Ok(envelope) => {
                self.pending.push_back(envelope);
                if self.pending.len() == self.max_pending {
                    tracing::warn!(
                        pending = self.pending.len(),
                        idle = self.ready.idle(),
                        "Pending queue full, pausing client intake"
                    );
                }
            }
            Err(e) => tracing::warn!(error = %e, "Discarding client frames"),
        }
    }

    fn on_worker_message(&mut self, message: Multipart) {
        let Some((identity, rest)) = message.pop_front() else {
            tracing::warn!("Discarding empty worker message");
            return;
        };
        let worker = WorkerId::from(identity);
        if !self.workers.contains_key(&worker) {
            tracing::warn!(worker = %worker, "Discarding message from unknown worker");
            return;
        }

        if rest.len() == 1 && rest.frames()[0] == READY {
            if self.ready.mark_ready(worker.clone()) {
                tracing::debug!(worker = %worker, "Worker ready");
            } else {
                tracing::warn!(worker = %worker, "Duplicate ready ignored");
            }
            return;
        }

        let envelope = match Envelope::parse(rest) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(worker = %worker, error = %e, "Discarding worker frames");
                return;
            }
        };

        self.deliver(envelope);
        if self.ready.state(&worker) == Some(WorkerState::Busy) {
            self.ready.mark_ready(worker);
        } else {
            tracing::warn!(worker = %worker, "Reply from a worker that had no request");
        }
    }

    fn deliver(&self, envelope: Envelope) {
        let Some(client) = ClientId::from_frame(&envelope.client) else {
            tracing::warn!("Discarding reply with an invalid client address");
            return;
        };
        let reply = frame::client_message(envelope.payload);
        if !self.clients.deliver(client, reply) {
            tracing::debug!(client_id = %client, "Client left before its reply");
        }
    }

    /// Hand queued requests to idle workers, oldest first.
    fn dispatch_pending(&mut self) -> Result<(), BrokerError> {
        while !self.pending.is_empty() {
            let Some(worker) = self.ready.next() else {
                break;
            };
            let Some(envelope) = self.pending.pop_front() else {
                break;
            };
            let Some(inbox) = self.workers.get(&worker) else {
                self.pending.push_front(envelope);
                continue;
            };

            match inbox.try_send(envelope.into_multipart()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(message))
                | Err(mpsc::error::TrySendError::Closed(message)) => {
                    tracing::error!(worker = %worker, "Worker inbox unavailable, removing worker");
                    self.workers.remove(&worker);
                    self.ready.remove(&worker);
                    match Envelope::parse(message) {
                        Ok(envelope) => self.pending.push_front(envelope),
                        Err(e) => tracing::warn!(error = %e, "Request lost while requeueing"),
                    }
                    if self.workers.is_empty() {
                        return Err(BrokerError::WorkersGone);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Run the broker, rebuilding its loop after every interruption.
///
/// Rebuilds back off exponentially with jitter; a loop that ran longer
/// than the maximum delay resets the backoff.
pub async fn supervise(
    mut broker: Broker,
    interrupt: &Notify,
    mut shutdown: broadcast::Receiver<()>,
    config: &WorkerConfig,
) -> Result<Broker, BrokerError> {
    let reset_after = Duration::from_millis(config.rebuild_max_delay_ms);
    let mut attempt = 0;

    loop {
        let started = Instant::now();
        match broker.run(interrupt, &mut shutdown).await {
            Ok(()) => return Ok(broker),
            Err(BrokerError::Interrupted) => {
                if started.elapsed() > reset_after {
                    attempt = 0;
                }
                attempt += 1;
                let delay = calculate_backoff(attempt, config.rebuild_base_delay_ms, config.rebuild_max_delay_ms);
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    pending = broker.pending(),
                    "Broker interrupted, rebuilding"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.recv() => return Ok(broker),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Broker stopped");
                return Err(e);
            }
        }
    }
}

/// `[worker, READY]`
pub fn ready_message(worker: &WorkerId) -> Multipart {
    Multipart::new(vec![worker.to_frame(), Bytes::from_static(READY)])
}
