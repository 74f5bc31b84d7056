//! Terrain grid of tiles.

use iso_geom::{Aabb2, Aabb3, cart_to_iso};
use iso_spatial::{Arena, GridIndex2D, Handle};
use tracing::{debug, trace};

use crate::{Node, SceneError, SceneResult, Tile, TileSet};

/// Fixed-size terrain map.
///
/// The map only records which arena node occupies each cell. Tiles live in
/// the scene's arena and their screen boxes in its static grid, so every
/// mutation takes both.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: u32,
    height: u32,
    /// Screen size of one map cell.
    tile_size: (f32, f32),
    tile_set: TileSet,
    /// Row-major, `x + y * width`.
    cells: Vec<Option<Handle>>,
}

impl TileMap {
    #[must_use]
    pub fn new(width: u32, height: u32, tile_size: (f32, f32), tile_set: TileSet) -> Self {
        Self {
            width,
            height,
            tile_size,
            tile_set,
            cells: vec![None; width as usize * height as usize],
        }
    }

    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub const fn tile_size(&self) -> (f32, f32) {
        self.tile_size
    }

    #[must_use]
    pub const fn tile_set(&self) -> &TileSet {
        &self.tile_set
    }

    pub fn tile_set_mut(&mut self) -> &mut TileSet {
        &mut self.tile_set
    }

    /// Node occupying a cell, if any.
    #[must_use]
    pub fn tile_at(&self, x: u32, y: u32) -> Option<Handle> {
        self.cell_index(x, y).ok().and_then(|index| self.cells[index])
    }

    /// Occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.cells.iter().flatten().copied()
    }

    /// Replace the whole terrain, one tile index per cell in row-major order.
    ///
    /// Every index is checked before anything changes, so on error the map
    /// is left as it was.
    pub fn load_tile_data(
        &mut self,
        nodes: &mut Arena<Node>,
        grid: &mut GridIndex2D,
        data: &[u32],
    ) -> SceneResult<usize> {
        let expected = self.cells.len();
        if data.len() != expected {
            return Err(SceneError::Terrain {
                expected,
                actual: data.len(),
            });
        }
        if let Some(&unknown) = data
            .iter()
            .find(|&&index| index != 0 && !self.tile_set.contains(index))
        {
            return Err(SceneError::UnknownTile(unknown));
        }

        let mut placed = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let index = data[(x + y * self.width) as usize];
                if self.set_cell(nodes, grid, x, y, index)?.is_some() {
                    placed += 1;
                }
            }
        }

        debug!(placed, width = self.width, height = self.height, "loaded terrain");
        Ok(placed)
    }

    /// Put tile `index` at `(x, y)`, releasing whatever was there.
    ///
    /// Index `0` clears the cell. Returns the new tile's handle.
    pub fn set_cell(
        &mut self,
        nodes: &mut Arena<Node>,
        grid: &mut GridIndex2D,
        x: u32,
        y: u32,
        index: u32,
    ) -> SceneResult<Option<Handle>> {
        let cell = self.cell_index(x, y)?;

        let prototype = match index {
            0 => None,
            _ => Some(
                self.tile_set
                    .get(index)
                    .ok_or(SceneError::UnknownTile(index))?,
            ),
        };

        if let Some(old) = self.cells[cell].take() {
            grid.purge(&[old]);
            nodes.remove(old);
            trace!(x, y, %old, "released tile");
        }

        let Some(prototype) = prototype else {
            return Ok(None);
        };

        let (tile_w, tile_h) = self.tile_size;
        let (i, j, _) = cart_to_iso(x as f32, y as f32, 0.0);
        let (ax, ay) = prototype.anchor;
        let (sprite_w, sprite_h) = prototype.sprite_size;
        let (width, height, depth) = prototype.extents;

        let tile = Tile {
            index,
            cell: (x, y),
            sprite: prototype.sprite(),
            aabb2d: Aabb2::new(
                i.mul_add(tile_w, -ax),
                j.mul_add(tile_h, -ay),
                sprite_w,
                sprite_h,
            ),
            aabb3d: Aabb3::new(x as f32, y as f32, 0.0, width, height, depth),
        };

        let handle = nodes.insert(Node::Tile(tile));
        grid.insert(&*nodes, handle)?;
        self.cells[cell] = Some(handle);

        Ok(Some(handle))
    }

    fn cell_index(&self, x: u32, y: u32) -> SceneResult<usize> {
        if x < self.width && y < self.height {
            Ok((x + y * self.width) as usize)
        } else {
            Err(SceneError::OutOfMap {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }
}
