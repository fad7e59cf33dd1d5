//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (client id, registry entry)
//!     → frame.rs (multipart decoding)
//!     → [client, empty, payload] to the broker
//!
//! Broker reply [empty, payload]
//!     → ClientRegistry (by client id)
//!     → frame.rs (multipart encoding) → TCP
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - A malformed message is dropped; a broken stream closes only that client
//! - Each connection tracked for graceful shutdown

pub mod connection;
pub mod frame;
pub mod listener;

pub use connection::{ClientId, ClientRegistry, ConnectionTracker, Frontend};
pub use frame::{Envelope, FrameError, Multipart};
pub use listener::{Listener, ListenerError};
