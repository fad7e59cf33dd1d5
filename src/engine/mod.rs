//! Routing engine interface.
//!
//! # Data Flow
//! ```text
//! Projector (cache miss)
//!     → RoutingEngine::project (coordinate → ProjectedLocation | none)
//! Matrix pipeline
//!     → RoutingEngine::search_matrix (sparse row-major time/distance)
//! Direct-path pipeline
//!     → RoutingEngine::search (maneuvers + shape | none)
//! ```
//!
//! # Design Decisions
//! - The graph, search and cost models live behind one trait; worker
//!   threads call it synchronously and it must be shareable across them
//! - A failed projection or search is a normal `None`, not an error
//! - `crow_fly.rs` provides a straight-line engine so the service runs and
//!   is testable without a road graph

pub mod crow_fly;
mod types;

use std::sync::Arc;

use crate::costing::Costing;

pub use crow_fly::CrowFlyEngine;
pub use types::*;

/// Road-network routing engine.
pub trait RoutingEngine: Send + Sync {
    /// Snap `coordinate` onto the graph for `costing.mode`.
    fn project(&self, coordinate: Coordinate, costing: &Costing) -> Option<ProjectedLocation>;

    /// Shortest path between two projected locations.
    fn search(
        &self,
        origin: &ProjectedLocation,
        destination: &ProjectedLocation,
        costing: &Costing,
    ) -> Option<EnginePath>;

    /// Times and distances for every `(source, target)` pair, row-major by
    /// source. Pairs farther than `max_distance` meters are [`UNREACHABLE`].
    fn search_matrix(
        &self,
        sources: &[Arc<ProjectedLocation>],
        targets: &[Arc<ProjectedLocation>],
        costing: &Costing,
        max_distance: f64,
    ) -> Vec<TimeDistance>;
}
