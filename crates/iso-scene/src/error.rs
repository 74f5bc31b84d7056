use std::path::PathBuf;

use iso_order::OrderError;
use iso_spatial::{GridError, Handle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("spatial index error: {0}")]
    Grid(#[from] GridError),

    #[error("draw order error: {0}")]
    Order(#[from] OrderError),

    /// Terrain data does not match the map dimensions.
    #[error("terrain data has {actual} cells, map needs {expected}")]
    Terrain { expected: usize, actual: usize },

    #[error("tile set has no tile with index {0}")]
    UnknownTile(u32),

    /// Index `0` marks an empty cell and cannot name a prototype.
    #[error("tile index 0 is reserved for empty cells")]
    ReservedTileIndex,

    #[error("cell ({x}, {y}) is outside the {width}x{height} map")]
    OutOfMap { x: u32, y: u32, width: u32, height: u32 },

    #[error("{0} is not a live map object")]
    NotAnObject(Handle),

    #[error("failed to read scene config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;
