//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thread count > 0, speeds > 0, ports valid)
//! - Check that the elevation service URL is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{PerMode, ServiceConfig};
use crate::engine::Mode;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid socket address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    NotPositive { field: String },

    #[error("routing.average_speed.{mode} ({average}) exceeds routing.max_speed.{mode} ({max})")]
    AverageAboveCeiling { mode: Mode, average: f64, max: f64 },

    #[error("invalid elevation service url {url}: {reason}")]
    InvalidElevationUrl { url: String, reason: String },

    #[error("engine.coverage is empty")]
    EmptyCoverage,
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for (field, value) in [
        ("listener.max_connections", config.listener.max_connections),
        ("listener.max_frame_bytes", config.listener.max_frame_bytes),
        ("workers.nb_threads", config.workers.nb_threads),
        ("workers.max_pending", config.workers.max_pending),
    ] {
        if value == 0 {
            errors.push(ValidationError::NotPositive { field: field.to_string() });
        }
    }

    let routing = &config.routing;
    check_positive("routing.average_speed", &routing.average_speed, &mut errors);
    check_positive("routing.max_speed", &routing.max_speed, &mut errors);
    check_positive("routing.max_matrix_distance", &routing.max_matrix_distance, &mut errors);
    check_positive("routing.default_duration_coeff", &routing.default_duration_coeff, &mut errors);

    for mode in Mode::ALL {
        let average = routing.average_speed.get(mode);
        let max = routing.max_speed.get(mode);
        if average > max {
            errors.push(ValidationError::AverageAboveCeiling { mode, average, max });
        }
    }

    if let Some(raw) = &config.elevation.service_url {
        match url::Url::parse(raw) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            Ok(parsed) => errors.push(ValidationError::InvalidElevationUrl {
                url: raw.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidElevationUrl {
                url: raw.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if let Some(coverage) = &config.engine.coverage {
        if coverage.min_lon >= coverage.max_lon || coverage.min_lat >= coverage.max_lat {
            errors.push(ValidationError::EmptyCoverage);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_positive(section: &str, values: &PerMode<f64>, errors: &mut Vec<ValidationError>) {
    for mode in Mode::ALL {
        if !(values.get(mode) > 0.0) {
            errors.push(ValidationError::NotPositive {
                field: format!("{}.{}", section, mode),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_error() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.workers.nb_threads = 0;
        config.workers.max_pending = 0;
        config.routing.max_speed.walking = 0.5;
        config.elevation.service_url = Some("ftp://elevation".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5, "{:?}", errors);
        assert!(errors.contains(&ValidationError::NotPositive {
            field: "workers.nb_threads".into()
        }));
        assert!(errors.contains(&ValidationError::NotPositive {
            field: "workers.max_pending".into()
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::AverageAboveCeiling { mode: Mode::Walking, .. })));
    }
}
