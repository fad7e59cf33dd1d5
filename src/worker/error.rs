//! Request handling errors.

use thiserror::Error;

use crate::engine::UnknownMode;
use crate::proto::{ErrorId, Response};

/// Why a request could not be answered with a result.
///
/// Every variant maps to the error id reported to the client; none of them
/// stops the worker.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0} is missing")]
    MissingField(&'static str),

    #[error("invalid coordinate: {0}")]
    InvalidPlace(String),

    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),

    #[error("max_duration must be positive, got {0}")]
    NegativeMaxDuration(i32),

    #[error("origins projection failed!")]
    NoOrigin,

    #[error("destinations projection failed!")]
    NoDestination,

    #[error("Cannot project the given coords: {origin}, {destination}")]
    NoOriginNorDestination { origin: String, destination: String },

    #[error("bike share path has a {found} maneuver but no matching {missing} maneuver")]
    InconsistentBikeShare { found: &'static str, missing: &'static str },

    #[error("shape index {index} out of range for a shape of {len} points")]
    ShapeIndex { index: usize, len: usize },
}

impl HandlerError {
    pub fn error_id(&self) -> ErrorId {
        match self {
            HandlerError::MissingField(_) | HandlerError::InvalidPlace(_) => ErrorId::BadFormat,
            HandlerError::NoOrigin => ErrorId::NoOrigin,
            HandlerError::NoDestination => ErrorId::NoDestination,
            HandlerError::NoOriginNorDestination { .. } => ErrorId::NoOriginNorDestination,
            HandlerError::UnknownMode(_)
            | HandlerError::NegativeMaxDuration(_)
            | HandlerError::InconsistentBikeShare { .. }
            | HandlerError::ShapeIndex { .. } => ErrorId::InternalError,
        }
    }
}

impl From<HandlerError> for Response {
    fn from(err: HandlerError) -> Self {
        Response::error(err.error_id(), err.to_string())
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;
