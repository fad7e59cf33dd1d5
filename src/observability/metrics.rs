//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_request_in_flight` (gauge): requests currently being handled
//! - `router_handle_matrix_duration_seconds` (histogram, by mode)
//! - `router_direct_path_duration_seconds` (histogram, by mode)
//! - `router_cache_calls`, `router_cache_misses`, `router_cache_size`
//!   (gauges, by travel mode)
//! - `router_status` (gauge, constant 1): build and sizing labels
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; the Prometheus exporter
//!   is only installed by the binary, so tests record into a no-op
//! - The in-flight count is also kept locally so it can be asserted on

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};

use crate::config::ServiceConfig;
use crate::engine::Mode;
use crate::projection::Projector;

const DURATION_BUCKETS: [f64; 10] = [0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Install the Prometheus exporter and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(Matcher::Suffix("duration_seconds".to_string()), &DURATION_BUCKETS)?
        .install()?;

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Publish the static description of this process.
pub fn record_status(config: &ServiceConfig) {
    metrics::gauge!(
        "router_status",
        "version" => env!("CARGO_PKG_VERSION"),
        "nb_threads" => config.workers.nb_threads.to_string(),
        "walking_cache_size" => config.cache.walking.to_string(),
        "bike_cache_size" => config.cache.bike.to_string(),
        "car_cache_size" => config.cache.car.to_string()
    )
    .set(1.0);
}

/// Request metrics shared by all workers.
#[derive(Debug, Default)]
pub struct Metrics {
    in_flight: AtomicI64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a request as in flight until the returned guard is dropped.
    pub fn start_request(&self) -> InFlightGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        metrics::gauge!("router_request_in_flight").increment(1.0);
        InFlightGuard { metrics: self }
    }

    pub fn in_flight(&self) -> i64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn observe_matrix(&self, mode: Mode, elapsed: Duration) {
        metrics::histogram!("router_handle_matrix_duration_seconds", "mode" => mode.as_str())
            .record(elapsed.as_secs_f64());
    }

    pub fn observe_direct_path(&self, mode: Mode, elapsed: Duration) {
        metrics::histogram!("router_direct_path_duration_seconds", "mode" => mode.as_str())
            .record(elapsed.as_secs_f64());
    }

    pub fn observe_cache(&self, projector: &Projector) {
        for (travel_mode, stats) in projector.stats() {
            let mode = travel_mode.as_str();
            metrics::gauge!("router_cache_calls", "mode" => mode).set(stats.calls as f64);
            metrics::gauge!("router_cache_misses", "mode" => mode).set(stats.misses as f64);
            metrics::gauge!("router_cache_size", "mode" => mode).set(stats.size as f64);
        }
    }
}

/// Decrements the in-flight count when dropped, including during unwinding.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    metrics: &'a Metrics,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.fetch_sub(1, Ordering::SeqCst);
        metrics::gauge!("router_request_in_flight").decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[test]
    fn guard_tracks_nested_requests() {
        let metrics = Metrics::new();
        let first = metrics.start_request();
        let second = metrics.start_request();
        assert_eq!(metrics.in_flight(), 2);
        drop(first);
        assert_eq!(metrics.in_flight(), 1);
        drop(second);
        assert_eq!(metrics.in_flight(), 0);
    }

    #[test]
    fn guard_is_released_on_panic() {
        let metrics = Metrics::new();
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            let _guard = metrics.start_request();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(metrics.in_flight(), 0);
    }
}
