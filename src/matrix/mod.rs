//! Street-network matrix subsystem.
//!
//! # Data Flow
//! ```text
//! StreetNetworkRoutingMatrixRequest
//!     → pipeline.rs (parse, costing)
//!     → safeguard.rs (search radius, negative durations rejected)
//!     → Projector (sources, then targets; caching for batches only)
//!     → RoutingEngine::search_matrix (projected pairs only)
//!     → assembler.rs (dense rows in input order)
//!     → Response
//! ```
//!
//! # Design Decisions
//! - A side with no projected coordinate is answered with an error
//!   response before searching
//! - Unprojected inputs keep their slot in the row, reported as unreached
//!   with a duration of -1

pub mod assembler;
pub mod pipeline;
pub mod safeguard;

pub use pipeline::handle_matrix;
