use thiserror::Error;
use waypost_matrix_providers::{
    directions_api::DirectionsError, distance_matrix_api::DistanceMatrixError,
};

/// Failure taxonomy surfaced to callers. Validation failures happen before
/// any network or cache side effect; all others abort the request whole,
/// never degrading to a partial or best-effort result.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Malformed or insufficient input.
    #[error("invalid request: {0}")]
    Validation(String),

    /// An external service reported a failure status or was unreachable.
    #[error("upstream service failure: {0}")]
    Upstream(String),

    /// A single matrix cell failed while the batch reported success. Still
    /// fatal: the matrix is never patched around a failed pair.
    #[error("cost matrix element {origin}->{destination} failed with status {status}")]
    Element {
        origin: usize,
        destination: usize,
        status: String,
    },

    /// The heuristic search produced no feasible tour. Cannot happen on a
    /// complete cost graph; reaching it means an internal invariant broke.
    #[error("no feasible tour found: {0}")]
    NoSolution(String),
}

impl From<DistanceMatrixError> for RouteError {
    fn from(err: DistanceMatrixError) -> Self {
        match err {
            DistanceMatrixError::Element {
                origin,
                destination,
                status,
            } => RouteError::Element {
                origin,
                destination,
                status,
            },
            other => RouteError::Upstream(other.to_string()),
        }
    }
}

impl From<DirectionsError> for RouteError {
    fn from(err: DirectionsError) -> Self {
        RouteError::Upstream(err.to_string())
    }
}
