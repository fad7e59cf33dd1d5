//! Coordinate projection subsystem.
//!
//! # Data Flow
//! ```text
//! request coordinates + costing
//!     → projector.rs (pick the cache of the mode's travel mode)
//!     → cache.rs (hit: stored location, marked recently used
//!                 miss: RoutingEngine::project, inserted, counted)
//!     → Projections map (unmatched coordinates absent)
//! ```
//!
//! # Design Decisions
//! - One cache per engine travel mode, built once by the composition root
//!   and shared by every worker through `Arc<Projector>`
//! - Each cache is an `lru::LruCache` behind a single lock; counters move
//!   with the entries
//! - Only point lookups and aggregate counters are exposed

pub mod cache;
pub mod projector;

pub use cache::{CacheStats, ProjectionCache};
pub use projector::{Projections, Projector};
