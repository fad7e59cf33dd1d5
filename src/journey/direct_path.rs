//! Direct-path requests.

use crate::context::{parse_place, RoutingContext};
use crate::costing::Costing;
use crate::engine::Mode;
use crate::journey::builder::{build_journey, JourneyRequest};
use crate::journey::elevation::ElevationProvider;
use crate::proto::{DirectPathRequest, Response, ResponseType};
use crate::worker::error::{HandlerError, HandlerResult};

/// Answer a direct-path request. Returns the mode so the caller can label
/// metrics.
pub fn handle_direct_path(
    ctx: &RoutingContext,
    request: &DirectPathRequest,
    elevation: Option<&dyn ElevationProvider>,
) -> HandlerResult<(Mode, Response)> {
    let params = request
        .streetnetwork_params
        .clone()
        .ok_or(HandlerError::MissingField("streetnetwork_params"))?;
    let mode: Mode = params.origin_mode.parse()?;
    let origin = parse_place(request.origin.as_ref(), "origin")?;
    let destination = parse_place(request.destination.as_ref(), "destination")?;

    let costing = Costing::new(mode, &params, &ctx.routing);
    let projections = ctx.projector.project(&[origin, destination], &costing, false);

    let (Some(from), Some(to)) = (projections.get(&origin), projections.get(&destination)) else {
        tracing::info!(origin = %origin, destination = %destination, mode = %mode, "Direct path endpoints not projected");
        return Err(HandlerError::NoOriginNorDestination {
            origin: origin.to_string(),
            destination: destination.to_string(),
        });
    };

    let path = match ctx.engine.search(from, to, &costing) {
        Some(path) if !path.maneuvers.is_empty() => path,
        _ => {
            tracing::info!(origin = %origin, destination = %destination, mode = %mode, "No solution found");
            return Ok((mode, Response::no_solution()));
        }
    };

    let journey_request = JourneyRequest {
        datetime: request.datetime,
        clockwise: request.clockwise,
        enable_instructions: params.enable_instructions,
    };
    let journey = build_journey(&journey_request, &path, &costing, elevation)?;

    let mut response = Response {
        journeys: vec![journey],
        ..Default::default()
    };
    response.set_response_type(ResponseType::ItineraryFound);

    tracing::info!(mode = %mode, "Direct path response done");
    Ok((mode, response))
}
