//! Draw-order error types.

use iso_spatial::{GridError, Handle};
use thiserror::Error;

/// Draw-order error type.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Neighbour query failed.
    #[error("spatial index error: {0}")]
    Grid(#[from] GridError),

    /// An entity handle is not alive in the arena.
    #[error("stale entity handle: {0}")]
    StaleHandle(Handle),

    /// The occlusion relation is cyclic and the policy forbids dropping edges.
    #[error("draw order cycle: {from} must precede {to}, which is already being placed")]
    Cycle { from: Handle, to: Handle },
}

/// Result type for draw-order operations.
pub type OrderResult<T> = Result<T, OrderError>;
