//! Worker subsystem.
//!
//! # Data Flow
//! ```text
//! pool.rs (one named OS thread per worker)
//!     → runner.rs: READY, then block on the inbox
//!         → [client, empty, payload]
//!         → handler.rs: in-flight guard → decode → dispatch → encode
//!             → matrix::handle_matrix | journey::handle_direct_path
//!         → [worker, client, empty, reply] to the broker
//! ```
//!
//! # Design Decisions
//! - One request at a time per worker; no suspension inside a request
//! - Failures are `HandlerError` values mapped to error ids; a panic that
//!   escapes dispatch is caught at the handler and answered as an
//!   internal error, and the worker keeps serving
//! - Per-request state is reset after every request

pub mod error;
pub mod handler;
pub mod pool;
pub mod runner;

pub use error::{HandlerError, HandlerResult};
pub use handler::Handler;
pub use pool::WorkerPool;
