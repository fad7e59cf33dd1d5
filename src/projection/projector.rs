//! Batch projection of request coordinates.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::CacheConfig;
use crate::costing::Costing;
use crate::engine::{Coordinate, ProjectedLocation, RoutingEngine, TravelMode};
use crate::projection::cache::{CacheStats, ProjectionCache};

/// Projected coordinates; unmatched inputs are absent.
pub type Projections = HashMap<Coordinate, Arc<ProjectedLocation>>;

/// Snaps coordinates onto the engine graph, through one cache per travel mode.
pub struct Projector {
    engine: Arc<dyn RoutingEngine>,
    pedestrian: ProjectionCache,
    bicycle: ProjectionCache,
    drive: ProjectionCache,
}

impl Projector {
    pub fn new(engine: Arc<dyn RoutingEngine>, capacities: &CacheConfig) -> Self {
        Self {
            engine,
            pedestrian: ProjectionCache::new(
                TravelMode::Pedestrian,
                capacities.capacity(TravelMode::Pedestrian),
            ),
            bicycle: ProjectionCache::new(TravelMode::Bicycle, capacities.capacity(TravelMode::Bicycle)),
            drive: ProjectionCache::new(TravelMode::Drive, capacities.capacity(TravelMode::Drive)),
        }
    }

    pub fn cache(&self, travel_mode: TravelMode) -> &ProjectionCache {
        match travel_mode {
            TravelMode::Pedestrian => &self.pedestrian,
            TravelMode::Bicycle => &self.bicycle,
            TravelMode::Drive => &self.drive,
        }
    }

    pub fn stats(&self) -> [(TravelMode, CacheStats); 3] {
        [
            (TravelMode::Pedestrian, self.pedestrian.stats()),
            (TravelMode::Bicycle, self.bicycle.stats()),
            (TravelMode::Drive, self.drive.stats()),
        ]
    }

    /// Project `coordinates` for `costing.mode`.
    ///
    /// Only batches benefit from caching: callers pass `use_cache = false`
    /// for one-off coordinates so they do not evict reusable entries.
    pub fn project(&self, coordinates: &[Coordinate], costing: &Costing, use_cache: bool) -> Projections {
        let cache = self.cache(costing.mode.travel_mode());
        let mut projections = Projections::with_capacity(coordinates.len());

        for &coordinate in coordinates {
            if projections.contains_key(&coordinate) {
                continue;
            }
            let projected = if use_cache {
                cache.get_or_project(coordinate, || self.engine.project(coordinate, costing))
            } else {
                self.engine.project(coordinate, costing).map(Arc::new)
            };
            match projected {
                Some(location) => {
                    projections.insert(coordinate, location);
                }
                None => {
                    tracing::debug!(coordinate = %coordinate, mode = %costing.mode, "Coordinate could not be projected");
                }
            }
        }

        projections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundingBox, EngineConfig, RoutingConfig};
    use crate::engine::{CrowFlyEngine, Mode};
    use crate::proto::StreetNetworkParams;

    fn projector(walking_capacity: usize) -> Projector {
        let engine = CrowFlyEngine::new(
            EngineConfig {
                coverage: Some(BoundingBox {
                    min_lon: 0.0,
                    min_lat: 0.0,
                    max_lon: 10.0,
                    max_lat: 10.0,
                }),
            },
            RoutingConfig::default(),
        );
        let capacities = CacheConfig {
            walking: walking_capacity,
            bike: 0,
            car: 0,
        };
        Projector::new(Arc::new(engine), &capacities)
    }

    fn costing(mode: Mode) -> Costing {
        Costing::new(mode, &StreetNetworkParams::default(), &RoutingConfig::default())
    }

    #[test]
    fn unprojectable_coordinates_are_absent() {
        let projector = projector(10);
        let inside = Coordinate::new(1.0, 1.0);
        let outside = Coordinate::new(20.0, 1.0);

        let projections = projector.project(&[inside, outside], &costing(Mode::Walking), true);
        assert!(projections.contains_key(&inside));
        assert!(!projections.contains_key(&outside));
    }

    #[test]
    fn cache_is_only_touched_when_requested() {
        let projector = projector(10);
        let walking = costing(Mode::Walking);
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(2.0, 2.0);

        projector.project(&[a], &walking, false);
        assert_eq!(projector.cache(TravelMode::Pedestrian).stats().calls, 0);

        projector.project(&[a, b], &walking, true);
        projector.project(&[a, b], &walking, true);
        let stats = projector.cache(TravelMode::Pedestrian).stats();
        assert_eq!((stats.calls, stats.misses, stats.size), (4, 2, 2));
    }

    #[test]
    fn modes_share_caches_by_travel_mode() {
        let projector = projector(10);
        let coords = [Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0)];

        projector.project(&coords, &costing(Mode::Bss), true);
        assert_eq!(projector.cache(TravelMode::Pedestrian).stats().size, 2);

        projector.project(&coords, &costing(Mode::Taxi), true);
        let drive = projector.cache(TravelMode::Drive).stats();
        assert_eq!((drive.calls, drive.size), (2, 0));
    }
}
