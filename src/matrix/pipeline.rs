//! Street-network matrix requests.

use std::sync::Arc;

use crate::context::{parse_place, RoutingContext};
use crate::costing::Costing;
use crate::engine::{Coordinate, Mode, ProjectedLocation};
use crate::matrix::assembler::{self, FailedIndices};
use crate::matrix::safeguard;
use crate::projection::Projections;
use crate::proto::{Response, StreetNetworkRoutingMatrixRequest};
use crate::worker::error::{HandlerError, HandlerResult};

/// Answer a matrix request. Returns the mode so the caller can label metrics.
pub fn handle_matrix(
    ctx: &RoutingContext,
    request: &StreetNetworkRoutingMatrixRequest,
) -> HandlerResult<(Mode, Response)> {
    let mode: Mode = request.mode.parse()?;
    let sources = parse_places(request.origins.iter(), "origins")?;
    let targets = parse_places(request.destinations.iter(), "destinations")?;

    let params = request.streetnetwork_params.clone().unwrap_or_default();
    let costing = Costing::new(mode, &params, &ctx.routing);
    let coeff = safeguard::duration_coeff(request, mode, &ctx.routing);
    let max_distance =
        safeguard::max_distance(mode, request.max_duration, coeff, &costing, &ctx.routing)?;

    tracing::debug!(
        mode = %mode,
        nb_sources = sources.len(),
        nb_targets = targets.len(),
        max_duration = request.max_duration,
        max_distance,
        "Matrix request"
    );

    let source_projections = ctx.projector.project(&sources, &costing, sources.len() > 1);
    if source_projections.is_empty() {
        return Err(HandlerError::NoOrigin);
    }
    let target_projections = ctx.projector.project(&targets, &costing, targets.len() > 1);
    if target_projections.is_empty() {
        return Err(HandlerError::NoDestination);
    }

    let mut failed_indices = FailedIndices::new(sources.len(), targets.len());
    let located_sources = locate(&sources, &source_projections, &mut failed_indices.sources);
    let located_targets = locate(&targets, &target_projections, &mut failed_indices.targets);

    let results = ctx
        .engine
        .search_matrix(&located_sources, &located_targets, &costing, max_distance);

    // max_duration was checked non-negative by the safeguard
    let matrix = assembler::assemble(&failed_indices, &results, request.max_duration.unsigned_abs());

    ctx.metrics.observe_cache(&ctx.projector);

    Ok((
        mode,
        Response {
            sn_routing_matrix: Some(matrix),
            ..Default::default()
        },
    ))
}

fn parse_places<'a, I>(places: I, field: &'static str) -> HandlerResult<Vec<Coordinate>>
where
    I: Iterator<Item = &'a crate::proto::LocationContext>,
{
    places.map(|place| parse_place(Some(place), field)).collect()
}

/// Projected locations in input order; unprojected indices are flagged.
fn locate(
    coordinates: &[Coordinate],
    projections: &Projections,
    failed: &mut fixedbitset::FixedBitSet,
) -> Vec<Arc<ProjectedLocation>> {
    let mut located = Vec::with_capacity(projections.len());
    for (idx, coordinate) in coordinates.iter().enumerate() {
        match projections.get(coordinate) {
            Some(location) => located.push(Arc::clone(location)),
            None => failed.insert(idx),
        }
    }
    located
}
