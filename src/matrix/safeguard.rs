//! Search radius of a matrix request.

use crate::config::RoutingConfig;
use crate::costing::Costing;
use crate::engine::Mode;
use crate::proto::StreetNetworkRoutingMatrixRequest;
use crate::worker::error::{HandlerError, HandlerResult};

/// Coefficient applied to the radius of `mode`; taxis share the car one.
pub fn duration_coeff(request: &StreetNetworkRoutingMatrixRequest, mode: Mode, routing: &RoutingConfig) -> f64 {
    let requested = match mode {
        Mode::Walking => request.max_walking_duration_coeff,
        Mode::Bike => request.max_bike_duration_coeff,
        Mode::Bss => request.max_bss_duration_coeff,
        Mode::Car | Mode::Taxi => request.max_car_duration_coeff,
    };
    requested.unwrap_or_else(|| routing.default_duration_coeff.get(mode))
}

/// Farthest distance, in meters, the engine needs to explore for a pair to
/// be reachable within `max_duration` seconds.
pub fn max_distance(
    mode: Mode,
    max_duration: i32,
    coeff: f64,
    costing: &Costing,
    routing: &RoutingConfig,
) -> HandlerResult<f64> {
    if max_duration < 0 {
        return Err(HandlerError::NegativeMaxDuration(max_duration));
    }

    let speed = costing.requested_speed(mode).max(routing.average_speed.get(mode));
    let distance = (f64::from(max_duration) * speed * coeff).max(0.0);
    let ceiling = routing.max_matrix_distance.get(mode);

    if distance > ceiling {
        tracing::debug!(
            mode = %mode,
            distance,
            ceiling,
            "Matrix search radius clamped"
        );
        return Ok(ceiling);
    }
    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::StreetNetworkParams;

    fn costing(mode: Mode, params: StreetNetworkParams) -> Costing {
        Costing::new(mode, &params, &RoutingConfig::default())
    }

    #[test]
    fn uses_the_faster_of_requested_and_average_speed() {
        let routing = RoutingConfig::default();
        let slow = costing(Mode::Walking, StreetNetworkParams { walking_speed: 0.5, ..Default::default() });
        assert_eq!(max_distance(Mode::Walking, 100, 1.0, &slow, &routing).unwrap(), 100.0);

        let fast = costing(Mode::Walking, StreetNetworkParams { walking_speed: 2.0, ..Default::default() });
        assert_eq!(max_distance(Mode::Walking, 100, 1.5, &fast, &routing).unwrap(), 300.0);
    }

    #[test]
    fn clamps_to_the_mode_ceiling() {
        let routing = RoutingConfig::default();
        let car = costing(Mode::Car, StreetNetworkParams::default());
        assert_eq!(max_distance(Mode::Car, 86_400, 1.0, &car, &routing).unwrap(), 200_000.0);
        assert_eq!(max_distance(Mode::Car, 0, 1.0, &car, &routing).unwrap(), 0.0);
    }

    #[test]
    fn negative_duration_is_rejected() {
        let routing = RoutingConfig::default();
        let bike = costing(Mode::Bike, StreetNetworkParams::default());
        assert!(matches!(
            max_distance(Mode::Bike, -1, 1.0, &bike, &routing),
            Err(HandlerError::NegativeMaxDuration(-1))
        ));
    }

    #[test]
    fn taxi_uses_car_coefficient() {
        let routing = RoutingConfig::default();
        let request = StreetNetworkRoutingMatrixRequest {
            max_car_duration_coeff: Some(2.0),
            ..Default::default()
        };
        assert_eq!(duration_coeff(&request, Mode::Taxi, &routing), 2.0);
        assert_eq!(duration_coeff(&request, Mode::Walking, &routing), 1.0);
    }
}
