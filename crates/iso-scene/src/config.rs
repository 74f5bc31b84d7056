//! JSON scene configuration.
//!
//! Every field is optional. An empty document `{}` describes the built-in
//! demo scene: an 8x8 map with a handful of tile kinds and one walker,
//! indexed by `64x64` grids of `32x32` cells centred on the origin.

use std::path::Path;

use iso_order::{CyclePolicy, SortOptions, SpriteId};
use iso_spatial::GridIndex2D;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_TILE_SIZE, MapObject, SceneError, SceneResult, TilePrototype, TileSet};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Shared by the static and the dynamic grid.
    pub grid: GridConfig,
    /// Screen scale of one world unit along `i`, `j` and `k`.
    pub tile_size: (f32, f32, f32),
    pub tiles: Vec<TilePrototype>,
    pub map: MapConfig,
    pub objects: Vec<ObjectConfig>,
    /// Only order boxes whose hexagon silhouettes overlap.
    pub require_hex_overlap: bool,
    /// Fail the frame on a draw order cycle instead of dropping an edge.
    pub fail_on_cycle: bool,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn tile_set(&self) -> SceneResult<TileSet> {
        let mut tile_set = TileSet::new();
        tile_set.extend(self.tiles.iter().cloned())?;
        Ok(tile_set)
    }

    #[must_use]
    pub fn sort_options(&self) -> SortOptions {
        SortOptions {
            cycle_policy: if self.fail_on_cycle {
                CyclePolicy::Fail
            } else {
                CyclePolicy::DropEdge
            },
            require_hex_overlap: self.require_hex_overlap,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            tile_size: DEFAULT_TILE_SIZE,
            tiles: demo_tiles(),
            map: MapConfig::default(),
            objects: vec![ObjectConfig::default()],
            require_hex_overlap: false,
            fail_on_cycle: false,
        }
    }
}

fn demo_tiles() -> Vec<TilePrototype> {
    vec![
        TilePrototype::new(1, "block"),
        TilePrototype::new(2, "slab").with_extents(1.0, 1.0, 0.5),
        TilePrototype {
            sprite_size: (32.0, 48.0),
            ..TilePrototype::new(3, "wall").with_extents(1.0, 1.0, 2.0)
        },
        TilePrototype {
            sprite_size: (32.0, 64.0),
            ..TilePrototype::new(4, "pillar").with_extents(1.0, 1.0, 3.0)
        },
        TilePrototype::new(5, "crate").with_extents(0.8, 0.8, 0.8),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// World position of cell `(0, 0)`.
    pub origin: (f32, f32),
    /// Cell counts along `x` and `y`.
    pub dimensions: (u32, u32),
    pub cell_size: (f32, f32),
}

impl GridConfig {
    pub fn build(&self) -> SceneResult<GridIndex2D> {
        Ok(GridIndex2D::new(self.origin, self.dimensions, self.cell_size)?)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: (-1024.0, -1024.0),
            dimensions: (64, 64),
            cell_size: (32.0, 32.0),
        }
    }
}

/// Terrain size and tile indices in row-major order; `0` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u32>,
}

impl Default for MapConfig {
    #[rustfmt::skip]
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            data: vec![
                3, 5, 0, 1, 0, 0, 0, 0,
                0, 0, 0, 0, 0, 0, 0, 0,
                1, 0, 1, 1, 3, 0, 0, 0,
                1, 0, 1, 4, 0, 0, 0, 0,
                2, 0, 2, 0, 0, 0, 0, 0,
                0, 0, 0, 0, 0, 0, 0, 0,
                0, 0, 0, 0, 0, 0, 0, 0,
                0, 0, 0, 0, 0, 0, 0, 0,
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    pub sprite: u32,
    pub position: (f32, f32, f32),
    pub anchor: (f32, f32),
    pub sprite_size: (f32, f32),
    pub extents: (f32, f32, f32),
    pub walk_speed: f32,
}

impl ObjectConfig {
    #[must_use]
    pub fn build(&self, tile_size: (f32, f32, f32)) -> MapObject {
        let (ax, ay) = self.anchor;
        let (sprite_w, sprite_h) = self.sprite_size;
        let (width, height, depth) = self.extents;

        MapObject::new(SpriteId(self.sprite), self.position)
            .with_tile_size(tile_size)
            .with_anchor(ax, ay)
            .with_sprite_size(sprite_w, sprite_h)
            .with_extents(width, height, depth)
            .with_walk_speed(self.walk_speed)
    }
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            sprite: 100,
            position: (0.0, 0.0, 0.0),
            anchor: (24.0, 8.0),
            sprite_size: (32.0, 64.0),
            extents: (0.7, 0.7, 1.0),
            walk_speed: 6.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_document_is_demo_scene() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.map.data.len(), 64);
        assert_eq!(config.grid.origin, (-1024.0, -1024.0));
        assert_eq!(config.tile_set().unwrap().len(), 5);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = SceneConfig::from_json(
            r#"{
                "grid": { "dimensions": [16, 8] },
                "map": { "width": 2, "height": 1, "data": [1, 0] },
                "objects": [{ "position": [1.0, 0.0, 0.0], "walk_speed": 2.0 }],
                "fail_on_cycle": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.grid.dimensions, (16, 8));
        assert_eq!(config.grid.cell_size, (32.0, 32.0));
        assert_eq!(config.map.data, vec![1, 0]);
        assert_eq!(config.objects[0].anchor, (24.0, 8.0));
        assert_eq!(config.objects[0].walk_speed, 2.0);
        assert_eq!(config.sort_options().cycle_policy, CyclePolicy::Fail);
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "require_hex_overlap": true }}"#).unwrap();

        let config = SceneConfig::load(file.path()).unwrap();
        assert!(config.sort_options().require_hex_overlap);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let error = SceneConfig::load(&path).unwrap_err();
        assert!(matches!(error, SceneError::Io { path: p, .. } if p == path));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            SceneConfig::from_json(r#"{ "map": { "width": "eight" } }"#),
            Err(SceneError::Config(_))
        ));
    }
}
