//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "STREET_ROUTER_";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(toml::de::Error),
    Env { key: String, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Cannot read {}: {}", path.display(), e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Build the runtime configuration: file (when given), then environment
/// overrides, then validation.
///
/// A path that was given but cannot be read is an error; running without a
/// file uses the defaults.
pub fn load(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content =
                fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `STREET_ROUTER_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| {
        let key = format!("{}{}", ENV_PREFIX, name);
        lookup(&key).map(|value| (key, value))
    };

    if let Some((_, value)) = get("BIND_ADDRESS") {
        config.listener.bind_address = value;
    }
    if let Some((_, value)) = get("METRICS_BINDING") {
        config.observability.metrics_address = value;
    }
    if let Some((_, value)) = get("ELEVATION_SERVICE_URL") {
        config.elevation.service_url = Some(value).filter(|v| !v.is_empty());
    }
    if let Some((_, value)) = get("LOG_LEVEL") {
        config.observability.log_level = value;
    }
    if let Some(pair) = get("NB_THREADS") {
        config.workers.nb_threads = parse_env(pair)?;
    }
    if let Some(pair) = get("WALKING_CACHE_SIZE") {
        config.cache.walking = parse_env(pair)?;
    }
    if let Some(pair) = get("BIKE_CACHE_SIZE") {
        config.cache.bike = parse_env(pair)?;
    }
    if let Some(pair) = get("CAR_CACHE_SIZE") {
        config.cache.car = parse_env(pair)?;
    }
    if let Some(pair) = get("BSS_RENT_DURATION") {
        config.routing.bss_rent_duration = parse_env(pair)?;
    }
    if let Some(pair) = get("BSS_RETURN_DURATION") {
        config.routing.bss_return_duration = parse_env(pair)?;
    }

    Ok(())
}

fn parse_env<T: FromStr>((key, value): (String, String)) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env { key, value })
}
