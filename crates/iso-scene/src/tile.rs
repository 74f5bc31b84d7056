//! Tile prototypes and placed tiles.

use hashbrown::HashMap;
use iso_geom::{Aabb2, Aabb3, Spatial2D, Spatial3D};
use iso_order::{Canvas, Drawable, SpriteId};
use serde::{Deserialize, Serialize};

use crate::{SceneError, SceneResult};

/// Template every tile with the same index is stamped from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilePrototype {
    /// Terrain data value selecting this tile. Never `0`.
    pub index: u32,
    pub name: String,
    /// Sprite size in screen pixels.
    pub sprite_size: (f32, f32),
    /// Pixel offset from the sprite's corner to the tile's iso origin.
    pub anchor: (f32, f32),
    /// World-space extents of the tile's 3D box.
    pub extents: (f32, f32, f32),
}

impl TilePrototype {
    #[must_use]
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.anchor = (x, y);
        self
    }

    #[must_use]
    pub const fn with_extents(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.extents = (width, height, depth);
        self
    }

    #[must_use]
    pub const fn sprite(&self) -> SpriteId {
        SpriteId(self.index)
    }
}

impl Default for TilePrototype {
    fn default() -> Self {
        Self {
            index: 0,
            name: String::from("tile"),
            sprite_size: (32.0, 32.0),
            anchor: (16.0, 16.0),
            extents: (1.0, 1.0, 1.0),
        }
    }
}

/// Tile prototypes keyed by index.
#[derive(Clone, Debug, Default)]
pub struct TileSet {
    prototypes: HashMap<u32, TilePrototype>,
}

impl TileSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a prototype, returning the one it replaced.
    pub fn insert(&mut self, prototype: TilePrototype) -> SceneResult<Option<TilePrototype>> {
        if prototype.index == 0 {
            return Err(SceneError::ReservedTileIndex);
        }
        Ok(self.prototypes.insert(prototype.index, prototype))
    }

    /// Merge `other` into this set; its prototypes win on conflicts.
    pub fn extend(&mut self, other: impl IntoIterator<Item = TilePrototype>) -> SceneResult<()> {
        for prototype in other {
            self.insert(prototype)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<&TilePrototype> {
        self.prototypes.get(&index)
    }

    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.prototypes.contains_key(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

/// A prototype placed on the map.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub index: u32,
    /// Map cell the tile occupies.
    pub cell: (u32, u32),
    pub sprite: SpriteId,
    pub aabb2d: Aabb2,
    pub aabb3d: Aabb3,
}

impl Spatial2D for Tile {
    fn aabb2d(&self) -> &Aabb2 {
        &self.aabb2d
    }
}

impl Spatial3D for Tile {
    fn aabb3d(&self) -> &Aabb3 {
        &self.aabb3d
    }
}

impl Drawable for Tile {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(self.sprite, self.aabb2d.x, self.aabb2d.y);
    }
}
