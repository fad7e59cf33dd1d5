//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Broker loop interrupted
//!     → backoff.rs (delay before the supervisor rebuilds it)
//! ```
//!
//! # Design Decisions
//! - Rebuild delays grow exponentially and are capped by configuration
//! - Jitter keeps simultaneous rebuilds apart

pub mod backoff;
