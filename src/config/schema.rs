//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::engine::{Coordinate, Mode, TravelMode};

/// Root configuration for the routing service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Client-facing listener (bind address, limits).
    pub listener: ListenerConfig,

    /// Worker pool sizing.
    pub workers: WorkerConfig,

    /// Projection cache capacities.
    pub cache: CacheConfig,

    /// Speeds, distance ceilings and bike-share defaults.
    pub routing: RoutingConfig,

    /// Optional elevation service.
    pub elevation: ElevationConfig,

    /// Reference engine settings.
    pub engine: EngineConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:6000").
    pub bind_address: String,

    /// Maximum concurrent client connections (backpressure).
    pub max_connections: usize,

    /// Largest accepted frame, in bytes.
    pub max_frame_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:6000".to_string(),
            max_connections: 1_024,
            max_frame_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of worker threads, each handling one request at a time.
    pub nb_threads: usize,

    /// Base delay before rebuilding an interrupted broker loop.
    pub rebuild_base_delay_ms: u64,

    /// Upper bound on the rebuild delay.
    pub rebuild_max_delay_ms: u64,

    /// Requests the broker holds while no worker is idle. Past this, client
    /// intake pauses until a worker frees up.
    pub max_pending: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            nb_threads: 3,
            rebuild_base_delay_ms: 10,
            rebuild_max_delay_ms: 1_000,
            max_pending: 1_024,
        }
    }
}

/// Per travel mode projection cache capacities.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub walking: usize,
    pub bike: usize,
    pub car: usize,
}

impl CacheConfig {
    pub fn capacity(&self, travel_mode: TravelMode) -> usize {
        match travel_mode {
            TravelMode::Pedestrian => self.walking,
            TravelMode::Bicycle => self.bike,
            TravelMode::Drive => self.car,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            walking: 50_000,
            bike: 50_000,
            car: 50_000,
        }
    }
}

/// One value per street-network mode.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PerMode<T> {
    pub walking: T,
    pub bike: T,
    pub bss: T,
    pub car: T,
    pub taxi: T,
}

impl<T: Copy> PerMode<T> {
    pub fn uniform(value: T) -> Self {
        Self {
            walking: value,
            bike: value,
            bss: value,
            car: value,
            taxi: value,
        }
    }

    pub fn get(&self, mode: Mode) -> T {
        match mode {
            Mode::Walking => self.walking,
            Mode::Bike => self.bike,
            Mode::Bss => self.bss,
            Mode::Car => self.car,
            Mode::Taxi => self.taxi,
        }
    }
}

/// Speeds are in meters per second, distances in meters, durations in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Speed assumed when the request asks for something slower.
    pub average_speed: PerMode<f64>,

    /// Hard ceiling on the matrix search radius.
    pub max_matrix_distance: PerMode<f64>,

    /// Requested speeds above these are clamped.
    pub max_speed: PerMode<f64>,

    /// Search radius coefficient used when the request carries none.
    pub default_duration_coeff: PerMode<f64>,

    pub bss_rent_duration: u32,
    pub bss_return_duration: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            average_speed: PerMode {
                walking: 1.0,
                bike: 4.4,
                bss: 4.4,
                car: 15.0,
                taxi: 15.0,
            },
            max_matrix_distance: PerMode {
                walking: 10_000.0,
                bike: 20_000.0,
                bss: 20_000.0,
                car: 200_000.0,
                taxi: 200_000.0,
            },
            max_speed: PerMode {
                walking: 4.0,
                bike: 15.0,
                bss: 15.0,
                car: 50.0,
                taxi: 50.0,
            },
            default_duration_coeff: PerMode::uniform(1.0),
            bss_rent_duration: 120,
            bss_return_duration: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ElevationConfig {
    /// Base URL of the elevation service; elevation is skipped when unset.
    pub service_url: Option<String>,

    pub timeout_ms: u64,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            timeout_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Coordinates outside this box cannot be projected.
    pub coverage: Option<BoundingBox>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn contains(&self, c: Coordinate) -> bool {
        (self.min_lon..=self.max_lon).contains(&c.lon) && (self.min_lat..=self.max_lat).contains(&c.lat)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter, overridden by `RUST_LOG`.
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Prometheus endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:8080".to_string(),
        }
    }
}
