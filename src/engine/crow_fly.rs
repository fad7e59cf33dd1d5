//! Straight-line reference engine.

use std::sync::Arc;

use geo::{Bearing, Distance, Haversine};

use crate::config::{EngineConfig, RoutingConfig};
use crate::costing::Costing;
use crate::engine::{
    Coordinate, EnginePath, Maneuver, ProjectedLocation, RoutingEngine, TimeDistance,
};

/// Routes as the crow flies at the requested (or average) speed of the mode.
///
/// Every coordinate inside the coverage box projects onto itself. Paths are
/// a single depart maneuver followed by an arrival maneuver.
#[derive(Debug, Clone)]
pub struct CrowFlyEngine {
    engine: EngineConfig,
    routing: RoutingConfig,
}

impl CrowFlyEngine {
    pub fn new(engine: EngineConfig, routing: RoutingConfig) -> Self {
        Self { engine, routing }
    }

    fn speed(&self, costing: &Costing) -> f64 {
        let requested = costing.requested_speed(costing.mode);
        if requested > 0.0 {
            requested
        } else {
            self.routing.average_speed.get(costing.mode)
        }
    }

    fn distance(from: Coordinate, to: Coordinate) -> f64 {
        Haversine.distance(geo::Point::from(from), geo::Point::from(to))
    }
}

impl RoutingEngine for CrowFlyEngine {
    fn project(&self, coordinate: Coordinate, _costing: &Costing) -> Option<ProjectedLocation> {
        if let Some(coverage) = &self.engine.coverage {
            if !coverage.contains(coordinate) {
                return None;
            }
        }
        Some(ProjectedLocation {
            input: coordinate,
            snapped: coordinate,
            edges: Vec::new(),
        })
    }

    fn search(
        &self,
        origin: &ProjectedLocation,
        destination: &ProjectedLocation,
        costing: &Costing,
    ) -> Option<EnginePath> {
        let distance = Self::distance(origin.snapped, destination.snapped);
        let time = (distance / self.speed(costing)).round() as u32;
        let bearing = Haversine.bearing(
            geo::Point::from(origin.snapped),
            geo::Point::from(destination.snapped),
        );
        let travel_mode = costing.mode.travel_mode();

        let depart = Maneuver {
            travel_mode,
            begin_shape_index: 0,
            length_km: distance / 1000.0,
            time,
            turn_degree: bearing.round().rem_euclid(360.0) as u32,
            instruction: Some("Head straight to your destination.".to_string()),
            ..Default::default()
        };
        let arrive = Maneuver {
            travel_mode,
            begin_shape_index: 1,
            instruction: Some("You have arrived at your destination.".to_string()),
            ..Default::default()
        };

        Some(EnginePath {
            maneuvers: vec![depart, arrive],
            shape: vec![origin.snapped, destination.snapped],
            elapsed_secs: time,
        })
    }

    fn search_matrix(
        &self,
        sources: &[Arc<ProjectedLocation>],
        targets: &[Arc<ProjectedLocation>],
        costing: &Costing,
        max_distance: f64,
    ) -> Vec<TimeDistance> {
        let speed = self.speed(costing);
        let mut results = Vec::with_capacity(sources.len() * targets.len());
        for source in sources {
            for target in targets {
                let distance = Self::distance(source.snapped, target.snapped);
                if distance > max_distance {
                    results.push(TimeDistance::unreachable());
                } else {
                    results.push(TimeDistance {
                        time: (distance / speed).round() as u32,
                        distance: distance.round() as u32,
                    });
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundingBox;
    use crate::engine::{Mode, TravelMode, UNREACHABLE};
    use crate::proto::StreetNetworkParams;

    fn engine(coverage: Option<BoundingBox>) -> CrowFlyEngine {
        CrowFlyEngine::new(EngineConfig { coverage }, RoutingConfig::default())
    }

    fn costing(mode: Mode) -> Costing {
        Costing::new(mode, &StreetNetworkParams::default(), &RoutingConfig::default())
    }

    #[test]
    fn projection_respects_coverage() {
        let engine = engine(Some(BoundingBox {
            min_lon: 2.0,
            min_lat: 48.0,
            max_lon: 3.0,
            max_lat: 49.0,
        }));
        let walking = costing(Mode::Walking);
        assert!(engine.project(Coordinate::new(2.35, 48.85), &walking).is_some());
        assert!(engine.project(Coordinate::new(4.83, 45.76), &walking).is_none());
    }

    #[test]
    fn walking_path_uses_average_speed() {
        let engine = engine(None);
        let walking = costing(Mode::Walking);
        let a = engine.project(Coordinate::new(2.0, 48.0), &walking).unwrap();
        let b = engine.project(Coordinate::new(2.0, 48.01), &walking).unwrap();

        let path = engine.search(&a, &b, &walking).unwrap();
        // ~1112 m at 1 m/s
        assert!((1100..1125).contains(&path.elapsed_secs), "{}", path.elapsed_secs);
        assert_eq!(path.maneuvers.len(), 2);
        assert_eq!(path.maneuvers[0].travel_mode, TravelMode::Pedestrian);
        assert_eq!(path.maneuvers[1].begin_shape_index, 1);
        assert_eq!(path.shape.len(), 2);
    }

    #[test]
    fn matrix_marks_far_pairs_unreachable() {
        let engine = engine(None);
        let car = costing(Mode::Car);
        let origin = Arc::new(engine.project(Coordinate::new(2.0, 48.0), &car).unwrap());
        let near = Arc::new(engine.project(Coordinate::new(2.0, 48.01), &car).unwrap());
        let far = Arc::new(engine.project(Coordinate::new(3.0, 48.0), &car).unwrap());

        let results = engine.search_matrix(&[origin], &[near, far], &car, 5_000.0);
        assert_eq!(results.len(), 2);
        assert!(results[0].time < 100);
        assert_eq!(results[1].time, UNREACHABLE);
    }
}
