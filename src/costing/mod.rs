//! Per-request cost model parameters.
//!
//! A [`Costing`] is built once per request from the client's
//! street-network parameters and the service configuration, then handed to
//! every engine call made for that request. Requested speeds are clamped
//! to the configured ceilings here so the engine never sees unrealistic
//! values.

use crate::config::RoutingConfig;
use crate::engine::Mode;
use crate::proto::StreetNetworkParams;

#[derive(Debug, Clone, PartialEq)]
pub struct Costing {
    pub mode: Mode,
    pub speeds: Speeds,
    pub bike_share: BikeShareCosting,
    pub bike: BikePreferences,
}

/// Meters per second. Zero means the client did not ask for a speed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Speeds {
    pub walking: f64,
    pub bike: f64,
    pub car: f64,
    pub taxi: f64,
}

/// Seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BikeShareCosting {
    pub rent_duration: u32,
    pub rent_penalty: u32,
    pub return_duration: u32,
    pub return_penalty: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BikePreferences {
    pub use_roads: f32,
    pub use_hills: f32,
    pub use_ferry: f32,
    pub avoid_bad_surfaces: f32,
}

impl Default for BikePreferences {
    fn default() -> Self {
        Self {
            use_roads: 0.5,
            use_hills: 0.5,
            use_ferry: 0.5,
            avoid_bad_surfaces: 0.25,
        }
    }
}

impl Costing {
    pub fn new(mode: Mode, params: &StreetNetworkParams, routing: &RoutingConfig) -> Self {
        let bike_speed = match (mode, params.bss_speed) {
            (Mode::Bss, Some(bss_speed)) => bss_speed,
            _ => params.bike_speed,
        };
        let bike_ceiling = match mode {
            Mode::Bss => routing.max_speed.bss,
            _ => routing.max_speed.bike,
        };

        let speeds = Speeds {
            walking: clamp_speed(Mode::Walking, params.walking_speed, routing.max_speed.walking),
            bike: clamp_speed(Mode::Bike, bike_speed, bike_ceiling),
            car: clamp_speed(Mode::Car, params.car_speed, routing.max_speed.car),
            taxi: clamp_speed(Mode::Taxi, params.taxi_speed, routing.max_speed.taxi),
        };

        let defaults = BikePreferences::default();
        Self {
            mode,
            speeds,
            bike_share: BikeShareCosting {
                rent_duration: params.bss_rent_duration.unwrap_or(routing.bss_rent_duration),
                rent_penalty: params.bss_rent_penalty.unwrap_or(0),
                return_duration: params.bss_return_duration.unwrap_or(routing.bss_return_duration),
                return_penalty: params.bss_return_penalty.unwrap_or(0),
            },
            bike: BikePreferences {
                use_roads: params.bike_use_roads.unwrap_or(defaults.use_roads),
                use_hills: params.bike_use_hills.unwrap_or(defaults.use_hills),
                use_ferry: params.bike_use_ferry.unwrap_or(defaults.use_ferry),
                avoid_bad_surfaces: params
                    .bike_avoid_bad_surfaces
                    .unwrap_or(defaults.avoid_bad_surfaces),
            },
        }
    }

    /// Requested speed for `mode`, zero when the client left it unset.
    pub fn requested_speed(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Walking => self.speeds.walking,
            Mode::Bike | Mode::Bss => self.speeds.bike,
            Mode::Car => self.speeds.car,
            Mode::Taxi => self.speeds.taxi,
        }
    }
}

fn clamp_speed(mode: Mode, requested: f64, ceiling: f64) -> f64 {
    if requested > ceiling {
        tracing::debug!(
            mode = %mode,
            requested,
            ceiling,
            "Requested speed clamped"
        );
        return ceiling;
    }
    requested.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speeds_are_clamped_to_ceilings() {
        let params = StreetNetworkParams {
            walking_speed: 12.0,
            bike_speed: 3.0,
            car_speed: 80.0,
            ..Default::default()
        };
        let costing = Costing::new(Mode::Car, &params, &RoutingConfig::default());
        assert_eq!(costing.speeds.walking, 4.0);
        assert_eq!(costing.speeds.bike, 3.0);
        assert_eq!(costing.speeds.car, 50.0);
        assert_eq!(costing.speeds.taxi, 0.0);
    }

    #[test]
    fn bss_speed_replaces_bike_speed_only_for_bss() {
        let params = StreetNetworkParams {
            bike_speed: 3.0,
            bss_speed: Some(5.0),
            ..Default::default()
        };
        let routing = RoutingConfig::default();
        assert_eq!(Costing::new(Mode::Bss, &params, &routing).speeds.bike, 5.0);
        assert_eq!(Costing::new(Mode::Bike, &params, &routing).speeds.bike, 3.0);
    }

    #[test]
    fn bike_share_durations_fall_back_to_config() {
        let params = StreetNetworkParams {
            bss_rent_duration: Some(42),
            ..Default::default()
        };
        let costing = Costing::new(Mode::Bss, &params, &RoutingConfig::default());
        assert_eq!(costing.bike_share.rent_duration, 42);
        assert_eq!(costing.bike_share.return_duration, 120);
        assert_eq!(costing.bike, BikePreferences::default());
    }
}
