#![allow(clippy::float_cmp)]

//! Geometry for isometric tile scenes.
//!
//! - [`Aabb2`]: screen-space rectangle, the unit stored in spatial indices
//! - [`Aabb3`]: world-space box, the unit compared for draw order
//! - [`cart_to_iso`]: cartesian world position to isometric screen space
//! - [`hex_bounds`]: world box to its hexagonal silhouette for overlap tests
//!
//! Boxes are plain mutable values. Identity lives in the arena handle that
//! owns a box, never in the box itself, so two boxes with equal components
//! are still distinct index entries.

mod aabb;
mod projection;

pub use aabb::{Aabb2, Aabb3, Separation, Side, Spatial2D, Spatial3D};
pub use projection::{Hexagon, cart_to_iso, hex_bounds};
