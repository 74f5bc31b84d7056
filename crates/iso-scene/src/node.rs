use iso_geom::{Aabb2, Aabb3, Spatial2D, Spatial3D};
use iso_order::{Canvas, Drawable};

use crate::{MapObject, Tile};

/// Everything a scene stores in its arena.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Tile(Tile),
    Object(MapObject),
}

impl Node {
    #[must_use]
    pub const fn as_tile(&self) -> Option<&Tile> {
        match self {
            Self::Tile(tile) => Some(tile),
            Self::Object(_) => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&MapObject> {
        match self {
            Self::Object(object) => Some(object),
            Self::Tile(_) => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut MapObject> {
        match self {
            Self::Object(object) => Some(object),
            Self::Tile(_) => None,
        }
    }

    #[must_use]
    pub const fn is_tile(&self) -> bool {
        matches!(self, Self::Tile(_))
    }
}

impl Spatial2D for Node {
    fn aabb2d(&self) -> &Aabb2 {
        match self {
            Self::Tile(tile) => tile.aabb2d(),
            Self::Object(object) => object.aabb2d(),
        }
    }
}

impl Spatial3D for Node {
    fn aabb3d(&self) -> &Aabb3 {
        match self {
            Self::Tile(tile) => tile.aabb3d(),
            Self::Object(object) => object.aabb3d(),
        }
    }
}

impl Drawable for Node {
    fn draw(&self, canvas: &mut dyn Canvas) {
        match self {
            Self::Tile(tile) => tile.draw(canvas),
            Self::Object(object) => object.draw(canvas),
        }
    }
}
