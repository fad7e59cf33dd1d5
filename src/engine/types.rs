//! Value types exchanged with the routing engine.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Travel time reported by the engine for pairs it could not connect.
pub const UNREACHABLE: u32 = i32::MAX as u32;

/// A free-form WGS84 point, used as a lookup key.
///
/// Equality and hashing work on the exact bit pattern of both components so
/// the same input coordinate always lands on the same cache entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Parse a place string, either `coord:<lon>:<lat>` or `<lon>;<lat>`.
    pub fn parse(place: &str) -> Option<Self> {
        let (lon, lat) = if let Some(rest) = place.strip_prefix("coord:") {
            rest.split_once(':')?
        } else {
            place.split_once(';')?
        };
        let lon: f64 = lon.trim().parse().ok()?;
        let lat: f64 = lat.trim().parse().ok()?;
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        Some(Self { lon, lat })
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.lon.to_bits() == other.lon.to_bits() && self.lat.to_bits() == other.lat.to_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lon.to_bits().hash(state);
        self.lat.to_bits().hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.lon, self.lat)
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.lon, c.lat)
    }
}

/// Street-network mode requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Walking,
    Bike,
    Bss,
    Car,
    Taxi,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Walking, Mode::Bike, Mode::Bss, Mode::Car, Mode::Taxi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Walking => "walking",
            Mode::Bike => "bike",
            Mode::Bss => "bss",
            Mode::Car => "car",
            Mode::Taxi => "taxi",
        }
    }

    /// Engine travel mode used to project coordinates for this mode.
    ///
    /// Bike-share trips start and end on foot, so their endpoints are
    /// snapped onto the pedestrian graph.
    pub fn travel_mode(&self) -> TravelMode {
        match self {
            Mode::Walking | Mode::Bss => TravelMode::Pedestrian,
            Mode::Bike => TravelMode::Bicycle,
            Mode::Car | Mode::Taxi => TravelMode::Drive,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode string is not one of the supported modes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown street network mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walking" => Ok(Mode::Walking),
            "bike" => Ok(Mode::Bike),
            "bss" => Ok(Mode::Bss),
            "car" => Ok(Mode::Car),
            "taxi" => Ok(Mode::Taxi),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Travel mode of the engine graph a maneuver was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Pedestrian,
    Bicycle,
    Drive,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Pedestrian => "walking",
            TravelMode::Bicycle => "bike",
            TravelMode::Drive => "car",
        }
    }
}

/// A coordinate snapped onto the road graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedLocation {
    /// Input coordinate this projection was computed for.
    pub input: Coordinate,
    /// Closest point on the graph.
    pub snapped: Coordinate,
    /// Candidate edges, closest first.
    pub edges: Vec<CandidateEdge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEdge {
    pub edge_id: u64,
    /// Position of the snapped point along the edge, in `[0, 1]`.
    pub percent_along: f64,
    /// Distance in meters between the input and the snapped point.
    pub distance: f64,
}

/// Bike-share action attached to a maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BssManeuver {
    #[default]
    None,
    Rent,
    Return,
}

/// Cycle infrastructure on the edge a maneuver starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleLane {
    None,
    Shared,
    Dedicated,
    Separated,
}

/// Station tags carried by rent and return maneuvers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BssStation {
    pub osm_node_id: u64,
    pub name: String,
    pub capacity: u32,
    pub network: String,
    pub operator: String,
    pub reference: String,
}

/// One directive of an engine path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Maneuver {
    pub travel_mode: TravelMode,
    pub bss_maneuver: BssManeuver,
    /// Index into [`EnginePath::shape`] of the first point of this maneuver.
    pub begin_shape_index: usize,
    /// Length in kilometers.
    pub length_km: f64,
    /// Elapsed time in seconds, including any bike-share penalty.
    pub time: u32,
    pub turn_degree: u32,
    pub street_name: Option<String>,
    pub instruction: Option<String>,
    pub bss_station: Option<BssStation>,
    /// Absent when the edge carries no cycle-lane information.
    pub cycle_lane: Option<CycleLane>,
}

/// Result of a point-to-point search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnginePath {
    pub maneuvers: Vec<Maneuver>,
    pub shape: Vec<Coordinate>,
    /// Total elapsed seconds of the whole path.
    pub elapsed_secs: u32,
}

/// One cell of a matrix search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDistance {
    /// Seconds, or [`UNREACHABLE`].
    pub time: u32,
    /// Meters.
    pub distance: u32,
}

impl TimeDistance {
    pub fn unreachable() -> Self {
        Self { time: UNREACHABLE, distance: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parse_place_formats() {
        assert_eq!(Coordinate::parse("coord:2.37:48.84"), Some(Coordinate::new(2.37, 48.84)));
        assert_eq!(Coordinate::parse("2.37;48.84"), Some(Coordinate::new(2.37, 48.84)));
        assert_eq!(Coordinate::parse("stop_area:foo"), None);
        assert_eq!(Coordinate::parse("coord:200:48"), None);
    }

    #[test]
    fn coordinates_hash_by_value() {
        let mut set = HashSet::new();
        set.insert(Coordinate::new(1.0, 2.0));
        set.insert(Coordinate::new(1.0, 2.0));
        set.insert(Coordinate::new(2.0, 1.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn mode_round_trip_and_travel_mode() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>(), Ok(mode));
        }
        assert_eq!(Mode::Bss.travel_mode(), TravelMode::Pedestrian);
        assert_eq!(Mode::Taxi.travel_mode(), TravelMode::Drive);
        assert!("ridesharing".parse::<Mode>().is_err());
    }
}
