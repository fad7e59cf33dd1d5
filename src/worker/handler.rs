//! Per-request dispatch for one worker.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use prost::Message;

use crate::context::RoutingContext;
use crate::journey::{handle_direct_path, ElevationProvider};
use crate::matrix::handle_matrix;
use crate::proto::{Api, ErrorId, Request, Response};
use crate::worker::error::{HandlerError, HandlerResult};

/// What the worker knows about the request in progress.
#[derive(Debug, Default)]
struct Scratch {
    api: Option<Api>,
    started: Option<Instant>,
}

/// Answers requests on a worker thread.
///
/// Owned by exactly one worker; nothing in here is shared with other
/// threads except through the [`RoutingContext`].
pub struct Handler {
    ctx: RoutingContext,
    elevation: Option<Box<dyn ElevationProvider>>,
    scratch: Scratch,
}

impl Handler {
    pub fn new(ctx: RoutingContext, elevation: Option<Box<dyn ElevationProvider>>) -> Self {
        Self {
            ctx,
            elevation,
            scratch: Scratch::default(),
        }
    }

    /// Decode, answer and encode one request payload.
    pub fn handle_payload(&mut self, payload: &[u8]) -> Vec<u8> {
        let metrics = Arc::clone(&self.ctx.metrics);
        let _in_flight = metrics.start_request();

        let response = match Request::decode(payload) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                tracing::warn!(error = %e, bytes = payload.len(), "Invalid protobuf request");
                Response::error(ErrorId::InvalidProtobufRequest, "Invalid protobuf request")
            }
        };
        response.encode_to_vec()
    }

    /// Answer a request. Never fails: errors and panics become error
    /// responses.
    pub fn handle(&mut self, request: &Request) -> Response {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(request)));

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, error_id = ?e.error_id(), "Request failed");
                Response::from(e)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(
                    api = ?self.scratch.api,
                    elapsed_ms = self.scratch.started.map(|t| t.elapsed().as_millis() as u64),
                    message = %message,
                    "Request handling panicked"
                );
                Response::error(ErrorId::InternalError, message)
            }
        };

        self.clear();
        response
    }

    fn dispatch(&mut self, request: &Request) -> HandlerResult<Response> {
        let api = request.requested_api();
        self.scratch.api = Some(api);
        self.scratch.started = Some(Instant::now());

        match api {
            Api::StreetNetworkRoutingMatrix => {
                let matrix = request
                    .sn_routing_matrix
                    .as_ref()
                    .ok_or(HandlerError::MissingField("sn_routing_matrix"))?;
                let started = Instant::now();
                let (mode, response) = handle_matrix(&self.ctx, matrix)?;
                self.ctx.metrics.observe_matrix(mode, started.elapsed());
                Ok(response)
            }
            Api::DirectPath => {
                let direct_path = request
                    .direct_path
                    .as_ref()
                    .ok_or(HandlerError::MissingField("direct_path"))?;
                let started = Instant::now();
                let (mode, response) = handle_direct_path(&self.ctx, direct_path, self.elevation.as_deref())?;
                self.ctx.metrics.observe_direct_path(mode, started.elapsed());
                Ok(response)
            }
            Api::Unknown => {
                tracing::warn!(requested_api = request.requested_api, "Unknown api");
                Ok(Response::default())
            }
        }
    }

    fn clear(&mut self) {
        self.scratch = Scratch::default();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
