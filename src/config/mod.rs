//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → STREET_ROUTER_* environment overrides
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc to the worker contexts
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A config path that was given but cannot be read aborts startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{
    BoundingBox, CacheConfig, ElevationConfig, EngineConfig, ListenerConfig, ObservabilityConfig,
    PerMode, RoutingConfig, ServiceConfig, WorkerConfig,
};
