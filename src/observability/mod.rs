//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (in-flight gauge, durations, cache counters)
//!     → tracing.rs (per-request spans with correlation IDs)
//!
//! Consumers:
//!     → stdout log aggregation
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields rather than formatted messages
//! - Request ID flows through every stage of a request
//! - Metric updates are cheap and safe from any worker thread

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::metrics::{InFlightGuard, Metrics};
