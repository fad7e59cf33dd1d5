//! Client connections.
//!
//! # Responsibilities
//! - Give every connected client a unique id
//! - Forward client requests to the broker, prefixed with that id
//! - Write replies addressed to the id back to the client
//! - Track live connections for shutdown

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};

use crate::net::frame::{self, Envelope, Multipart};
use crate::net::listener::{ConnectionPermit, Listener, ListenerError};

static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Address of a connected client, carried as the first frame of its
/// requests inside the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(u64);

impl ClientId {
    pub fn new() -> Self {
        Self(CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn to_frame(self) -> Bytes {
        Bytes::copy_from_slice(&self.0.to_be_bytes())
    }

    pub fn from_frame(frame: &[u8]) -> Option<Self> {
        let bytes: [u8; 8] = frame.try_into().ok()?;
        Some(Self(u64::from_be_bytes(bytes)))
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Reply channels of the connected clients.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: Arc<DashMap<ClientId, mpsc::UnboundedSender<Multipart>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: ClientId) -> mpsc::UnboundedReceiver<Multipart> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.clients.insert(id, tx);
        rx
    }

    pub fn remove(&self, id: ClientId) {
        self.clients.remove(&id);
    }

    /// Queue `message` for the client. False when it is no longer connected.
    pub fn deliver(&self, id: ClientId, message: Multipart) -> bool {
        match self.clients.get(&id) {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// Counts live connections.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    active_count: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection. The returned guard decrements on drop.
    pub fn track(&self) -> ConnectionGuard {
        self.active_count.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            active_count: Arc::clone(&self.active_count),
            id: ClientId::new(),
        }
    }

    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }

    /// Wait until every connection is closed.
    pub async fn wait_idle(&self) {
        while self.active_count() > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }
    }
}

/// Lifetime of one client connection.
#[derive(Debug)]
pub struct ConnectionGuard {
    active_count: Arc<AtomicU64>,
    id: ClientId,
}

impl ConnectionGuard {
    pub fn id(&self) -> ClientId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(client_id = %self.id, "Connection closed");
    }
}

/// What every client connection needs to reach the broker.
#[derive(Debug, Clone)]
pub struct Frontend {
    pub broker: mpsc::Sender<Multipart>,
    pub clients: ClientRegistry,
    pub tracker: ConnectionTracker,
    pub max_frame_bytes: usize,
}

/// Accept clients until shutdown, serving each on its own task.
pub async fn accept_clients(
    listener: Listener,
    frontend: Frontend,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), ListenerError> {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer_addr, permit)) => {
                        let frontend = frontend.clone();
                        let shutdown = shutdown.resubscribe();
                        tokio::spawn(async move {
                            tracing::debug!(peer_addr = %peer_addr, "Client connected");
                            serve_client(stream, permit, frontend, shutdown).await;
                        });
                    }
                    Err(ListenerError::Accept(e)) => {
                        tracing::warn!(error = %e, "Accept failed");
                    }
                    Err(e) => return Err(e),
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Listener stopped");
                return Ok(());
            }
        }
    }
}

/// Relay one client's requests to the broker and its replies back.
///
/// Malformed client messages are logged and dropped; framing errors that
/// leave the stream unreadable close this connection only.
pub async fn serve_client(
    stream: TcpStream,
    _permit: ConnectionPermit,
    frontend: Frontend,
    mut shutdown: broadcast::Receiver<()>,
) {
    let guard = frontend.tracker.track();
    let id = guard.id();
    let mut replies = frontend.clients.register(id);
    let (mut reader, mut writer) = stream.into_split();

    loop {
        tokio::select! {
            message = frame::read_message(&mut reader, frontend.max_frame_bytes) => {
                let message = match message {
                    Ok(Some(message)) => message,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(client_id = %id, error = %e, "Closing client connection");
                        break;
                    }
                };
                let payload = match frame::parse_client_message(message) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(client_id = %id, error = %e, "Discarding client message");
                        continue;
                    }
                };
                let request = Envelope { client: id.to_frame(), payload }.into_multipart();
                if frontend.broker.send(request).await.is_err() {
                    tracing::warn!(client_id = %id, "Broker is gone");
                    break;
                }
            }
            reply = replies.recv() => {
                let Some(reply) = reply else { break };
                if let Err(e) = frame::write_message(&mut writer, &reply).await {
                    tracing::debug!(client_id = %id, error = %e, "Reply not written");
                    break;
                }
            }
            _ = shutdown.recv() => break,
        }
    }

    frontend.clients.remove(id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ids_are_unique_and_fit_a_frame() {
        let id1 = ClientId::new();
        let id2 = ClientId::new();
        assert_ne!(id1, id2);
        assert_eq!(ClientId::from_frame(&id1.to_frame()), Some(id1));
        assert_eq!(ClientId::from_frame(b"short"), None);
    }

    #[test]
    fn tracker_counts_guards() {
        let tracker = ConnectionTracker::new();
        let guard1 = tracker.track();
        let guard2 = tracker.track();
        assert_eq!(tracker.active_count(), 2);
        assert_ne!(guard1.id(), guard2.id());

        drop(guard1);
        assert_eq!(tracker.active_count(), 1);
        drop(guard2);
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn registry_delivers_to_live_clients_only() {
        let registry = ClientRegistry::new();
        let id = ClientId::new();
        let mut rx = registry.register(id);

        assert!(registry.deliver(id, Multipart::new(vec![Bytes::from_static(b"x")])));
        assert_eq!(rx.try_recv().unwrap().len(), 1);

        registry.remove(id);
        assert!(registry.is_empty());
        assert!(!registry.deliver(id, Multipart::default()));
    }
}
