//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → projector + context → worker pool → listener → broker
//!
//! Signals (signals.rs):
//!     SIGHUP → broker loop interrupted and rebuilt
//!     SIGTERM/SIGINT → shutdown.rs broadcast
//!
//! Shutdown:
//!     Broker stops → listener aborted → connections drain → workers join
//! ```
//!
//! # Design Decisions
//! - Ordered startup: workers first, listener last
//! - A broker interruption is never a reason to exit
//! - Draining connections has a deadline

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Service, StartupError};
