//! Draw ordering for isometric scenes.
//!
//! Sorting by a single depth key breaks down once boxes span several tiles:
//! two objects can each be "in front" along a different axis. Instead the
//! order is a topological sort of an occlusion graph that is never built up
//! front. Its nodes are drawables; an edge `B -> A` exists when `B` is a
//! spatial neighbour of `A` in the 2D index and [`is_behind`]`(B, A)`.
//!
//! # Cycles
//!
//! Degenerate geometry can make the relation cyclic. By default the edge that
//! closes a cycle is dropped and counted in [`DrawOrder::dropped_edges`];
//! [`CyclePolicy::Fail`] turns that into an error instead.

mod depth;
mod drawable;
mod error;
mod sort;

pub use depth::is_behind;
pub use drawable::{Canvas, Drawable, SpriteId, draw_all};
pub use error::{OrderError, OrderResult};
pub use sort::{CyclePolicy, DrawOrder, SortOptions, topological_sort};
