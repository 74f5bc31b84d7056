//! Grid error types.

use thiserror::Error;

use crate::Handle;

/// Grid index error type.
#[derive(Debug, Error)]
pub enum GridError {
    /// Cell size must be strictly positive on both axes.
    #[error("invalid grid configuration: cell size {width}x{height} must be positive")]
    InvalidConfiguration { width: f32, height: f32 },

    /// Query geometry is neither a usable position nor a usable box.
    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),

    /// Handle does not refer to a live arena slot.
    #[error("stale handle: {0}")]
    StaleHandle(Handle),
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
