//! Direct-path journey subsystem.
//!
//! # Data Flow
//! ```text
//! DirectPathRequest
//!     → direct_path.rs (parse, costing, uncached projection, search)
//!     → builder.rs (classify markers, chain sections from the departure)
//!         → endpoint.rs (address or bike-share station descriptors)
//!         → path_items.rs (per-maneuver items and instructions)
//!         → elevation.rs (optional height profile per street section)
//!     → metadata.rs (reverse timestamps if arrival-anchored, totals)
//!     → Response
//! ```
//!
//! # Design Decisions
//! - Sections are appended through a single clock so each one begins
//!   exactly where the previous one ended
//! - Arrival-anchored requests are assembled forward once, then re-timed
//!   backward from the arrival; durations are never recomputed
//! - The journey's total duration is last end minus first begin, not the
//!   sum of section durations
//! - Elevation lookups are best effort and never fail a request

pub mod builder;
pub mod direct_path;
pub mod elevation;
pub mod endpoint;
pub mod metadata;
pub mod path_items;

pub use builder::{build_journey, JourneyRequest};
pub use direct_path::handle_direct_path;
pub use elevation::{ElevationClient, ElevationProvider};
