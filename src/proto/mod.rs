//! Wire schema shared with the trip-planning frontend.
//!
//! # Data Flow
//! ```text
//! client payload bytes
//!     → Request::decode (prost)
//!     → worker handler
//!     → Response (built by the matrix / journey assemblers)
//!     → encode_to_vec
//!     → reply payload bytes
//! ```
//!
//! # Design Decisions
//! - Messages are declared with the prost derive macros directly; there is
//!   no build-time code generation step.
//! - Response messages also derive `Serialize` so tools can print them as JSON.
//! - Enumerations are stored as `i32` on the wire; the generated accessors
//!   (`response_type()`, `set_response_type()`, ...) give typed access.

mod request;
mod response;

pub use request::*;
pub use response::*;

impl Response {
    /// A terminal response with no itinerary and the given error.
    pub fn error(id: ErrorId, message: impl Into<String>) -> Self {
        let mut response = Response {
            error: Some(Error {
                id: id as i32,
                message: message.into(),
            }),
            ..Default::default()
        };
        response.set_response_type(ResponseType::NoSolution);
        response
    }

    /// A terminal response meaning the engine found no path.
    pub fn no_solution() -> Self {
        let mut response = Response::default();
        response.set_response_type(ResponseType::NoSolution);
        response
    }
}

impl From<crate::engine::Coordinate> for GeographicalCoord {
    fn from(c: crate::engine::Coordinate) -> Self {
        GeographicalCoord { lon: c.lon, lat: c.lat }
    }
}
