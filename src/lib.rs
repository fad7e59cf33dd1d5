//! Street-network routing service.
//!
//! Clients send protobuf requests over a framed TCP transport; a broker
//! hands each request to the next idle worker thread, which answers with
//! either a duration matrix or a full journey.

pub mod broker;
pub mod client;
pub mod config;
pub mod context;
pub mod costing;
pub mod engine;
pub mod journey;
pub mod lifecycle;
pub mod matrix;
pub mod net;
pub mod observability;
pub mod projection;
pub mod proto;
pub mod resilience;
pub mod worker;

pub use client::RouterClient;
pub use config::ServiceConfig;
pub use lifecycle::{Service, Shutdown};
