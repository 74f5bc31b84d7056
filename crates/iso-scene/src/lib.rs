#![allow(clippy::float_cmp)]

//! Isometric tile map scenes.
//!
//! A [`Scene`] owns every drawable in one [`Arena`](iso_spatial::Arena) of
//! [`Node`]s and keeps two grids over their screen boxes: a static grid
//! for terrain tiles, which never move, and a dynamic grid for map objects,
//! which is recalculated every [`Scene::update`]. Draw order is resolved
//! across both grids at once.
//!
//! Scenes are built from a [`SceneConfig`], usually loaded from JSON.

mod config;
mod error;
mod node;
mod object;
mod scene;
mod tile;
mod tilemap;

pub use config::{GridConfig, MapConfig, ObjectConfig, SceneConfig};
pub use error::{SceneError, SceneResult};
pub use node::Node;
pub use object::{DEFAULT_TILE_SIZE, MapObject};
pub use scene::Scene;
pub use tile::{Tile, TilePrototype, TileSet};
pub use tilemap::TileMap;
