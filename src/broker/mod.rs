//! Request broker subsystem.
//!
//! # Data Flow
//! ```text
//! client connection → [client, empty, payload]
//!     → server.rs (pending queue)
//!     → ready_queue.rs (longest idle worker)
//!     → worker inbox
//!
//! worker → [worker, READY] | [worker, client, empty, payload]
//!     → ready_queue.rs (worker idle again)
//!     → ClientRegistry → client connection
//! ```
//!
//! # Design Decisions
//! - Requests that arrive with no idle worker are queued, never dropped
//! - A worker holds at most one request; duplicate readiness is ignored
//! - Malformed frame sets are logged and discarded
//! - An interruption tears the polling loop down; the supervisor rebuilds
//!   it over the same state with exponential backoff

pub mod ready_queue;
pub mod server;

use std::fmt;

use bytes::Bytes;

pub use ready_queue::{ReadyQueue, WorkerState};
pub use server::{ready_message, supervise, Broker, BrokerError, WorkerHandle};

/// Sentinel a worker sends when it can take a request.
pub const READY: &[u8] = b"READY";

/// Identity frame of a worker on the internal channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkerId(Bytes);

impl WorkerId {
    pub fn to_frame(&self) -> Bytes {
        self.0.clone()
    }
}

impl From<Bytes> for WorkerId {
    fn from(frame: Bytes) -> Self {
        Self(frame)
    }
}

impl From<&str> for WorkerId {
    fn from(name: &str) -> Self {
        Self(Bytes::copy_from_slice(name.as_bytes()))
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
