//! Request spans.

use tracing::Span;
use uuid::Uuid;

/// Span covering the handling of one request by `worker`.
///
/// Every request gets a fresh id so its log lines can be correlated across
/// the projection, search and assembly stages.
pub fn request_span(worker: &str) -> Span {
    tracing::info_span!("request", request_id = %Uuid::new_v4(), worker = %worker)
}
