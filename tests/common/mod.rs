//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use street_router::broker::BrokerError;
use street_router::config::{BoundingBox, ServiceConfig};
use street_router::costing::Costing;
use street_router::engine::{
    Coordinate, CrowFlyEngine, EnginePath, ProjectedLocation, RoutingEngine, TimeDistance,
};
use street_router::proto::{
    Api, DirectPathRequest, LocationContext, Request, StreetNetworkParams,
    StreetNetworkRoutingMatrixRequest,
};
use street_router::{RouterClient, Shutdown};

/// A service running on an ephemeral port.
pub struct TestService {
    pub addr: SocketAddr,
    pub interrupt: Arc<Notify>,
    pub shutdown: Arc<Shutdown>,
    handle: JoinHandle<Result<(), BrokerError>>,
}

impl TestService {
    pub async fn client(&self) -> RouterClient {
        RouterClient::connect(self.addr).await.unwrap()
    }

    /// Trigger shutdown and wait for the service to stop.
    pub async fn stop(self) -> Result<(), BrokerError> {
        self.shutdown.trigger("test finished");
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("service did not stop")
            .expect("service task panicked")
    }
}

pub fn test_config(nb_threads: usize) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.workers.nb_threads = nb_threads;
    config.workers.rebuild_base_delay_ms = 10;
    config.workers.rebuild_max_delay_ms = 50;
    config.observability.metrics_enabled = false;
    config
}

/// Coverage box around central Paris used by the crow-fly engine.
pub fn paris() -> BoundingBox {
    BoundingBox {
        min_lon: 2.2,
        min_lat: 48.8,
        max_lon: 2.5,
        max_lat: 48.9,
    }
}

pub fn crow_fly(config: &ServiceConfig) -> Arc<dyn RoutingEngine> {
    Arc::new(CrowFlyEngine::new(config.engine.clone(), config.routing.clone()))
}

pub async fn start_service(config: ServiceConfig, engine: Arc<dyn RoutingEngine>) -> TestService {
    let shutdown = Arc::new(Shutdown::new());
    let service = street_router::Service::start(&config, engine, &shutdown)
        .await
        .unwrap();
    let addr = service.local_addr();
    let interrupt = service.interrupt();
    let handle = tokio::spawn(service.run(shutdown.subscribe()));
    TestService {
        addr,
        interrupt,
        shutdown,
        handle,
    }
}

/// Crow-fly engine that panics when asked to project longitude 0.
pub struct FragileEngine(pub CrowFlyEngine);

impl RoutingEngine for FragileEngine {
    fn project(&self, coordinate: Coordinate, costing: &Costing) -> Option<ProjectedLocation> {
        if coordinate.lon == 0.0 {
            panic!("corrupted tile at {}", coordinate);
        }
        self.0.project(coordinate, costing)
    }

    fn search(
        &self,
        origin: &ProjectedLocation,
        destination: &ProjectedLocation,
        costing: &Costing,
    ) -> Option<EnginePath> {
        self.0.search(origin, destination, costing)
    }

    fn search_matrix(
        &self,
        sources: &[Arc<ProjectedLocation>],
        targets: &[Arc<ProjectedLocation>],
        costing: &Costing,
        max_distance: f64,
    ) -> Vec<TimeDistance> {
        self.0.search_matrix(sources, targets, costing, max_distance)
    }
}

pub fn place(place: &str) -> LocationContext {
    LocationContext {
        place: place.into(),
        access_duration: 0,
    }
}

pub fn matrix_request(origins: &[&str], destinations: &[&str], mode: &str, max_duration: i32) -> Request {
    let mut request = Request {
        sn_routing_matrix: Some(StreetNetworkRoutingMatrixRequest {
            origins: origins.iter().map(|p| place(p)).collect(),
            destinations: destinations.iter().map(|p| place(p)).collect(),
            mode: mode.into(),
            max_duration,
            streetnetwork_params: Some(StreetNetworkParams::default()),
            ..Default::default()
        }),
        ..Default::default()
    };
    request.set_requested_api(Api::StreetNetworkRoutingMatrix);
    request
}

pub fn direct_path_request(origin: &str, destination: &str, mode: &str) -> Request {
    let mut request = Request {
        direct_path: Some(DirectPathRequest {
            origin: Some(place(origin)),
            destination: Some(place(destination)),
            datetime: 1_600_000_000,
            clockwise: true,
            streetnetwork_params: Some(StreetNetworkParams {
                origin_mode: mode.into(),
                ..Default::default()
            }),
        }),
        ..Default::default()
    };
    request.set_requested_api(Api::DirectPath);
    request
}
