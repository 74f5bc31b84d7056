#![allow(clippy::float_cmp)]

//! Uniform grid spatial index for isometric scenes.
//!
//! Boxes live in an [`Arena`] and are addressed by generational
//! [`Handle`]s. A [`GridIndex2D`] stores handles, never boxes, in fixed-size
//! cell buckets. Callers mutate box geometry through the arena every frame;
//! the grid goes stale the moment they do and is brought back in sync by
//! [`GridIndex2D::recalculate`].
//!
//! # Frame cycle
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  1. arena.get_mut(handle) - move boxes       │
//! │  2. grid.recalculate(&arena) - re-bucket     │
//! │  3. group.find(query) - neighbour queries    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Everything here is single-threaded. `recalculate` scans the buckets and
//! then applies its changes in a second phase, which is only sound while no
//! one else mutates the grid.

mod arena;
mod cell;
mod error;
mod grid;
mod group;
mod query;

pub use arena::{Arena, Generation, Handle};
pub use cell::{CellCoord, CellRange};
pub use error::{GridError, GridResult};
pub use grid::{GridIndex2D, Recalculation};
pub use group::IndexGroup2D;
pub use query::{Neighbor, Query, SpatialIndex};
