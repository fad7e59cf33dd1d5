//! Shared state handed to every worker.

use std::sync::Arc;

use crate::config::{ElevationConfig, RoutingConfig};
use crate::engine::{Coordinate, RoutingEngine};
use crate::observability::Metrics;
use crate::projection::Projector;
use crate::proto::LocationContext;
use crate::worker::error::{HandlerError, HandlerResult};

/// Long-lived collaborators of the request pipelines.
///
/// Built once by the composition root; cloning only bumps reference counts.
#[derive(Clone)]
pub struct RoutingContext {
    pub engine: Arc<dyn RoutingEngine>,
    pub projector: Arc<Projector>,
    pub metrics: Arc<Metrics>,
    pub routing: Arc<RoutingConfig>,
    pub elevation: ElevationConfig,
}

impl RoutingContext {
    pub fn new(
        engine: Arc<dyn RoutingEngine>,
        projector: Arc<Projector>,
        metrics: Arc<Metrics>,
        routing: RoutingConfig,
        elevation: ElevationConfig,
    ) -> Self {
        Self {
            engine,
            projector,
            metrics,
            routing: Arc::new(routing),
            elevation,
        }
    }
}

pub(crate) fn parse_place(location: Option<&LocationContext>, field: &'static str) -> HandlerResult<Coordinate> {
    let location = location.ok_or(HandlerError::MissingField(field))?;
    Coordinate::parse(&location.place).ok_or_else(|| HandlerError::InvalidPlace(location.place.clone()))
}
