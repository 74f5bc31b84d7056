//! The scene: tiles and objects drawn back to front.

use iso_geom::Spatial2D;
use iso_order::{Canvas, DrawOrder, SortOptions, draw_all, topological_sort};
use iso_spatial::{Arena, GridIndex2D, Handle, IndexGroup2D, Query, Recalculation, SpatialIndex};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{MapObject, Node, SceneConfig, SceneError, SceneResult, TileMap};

/// Tile map plus free-moving objects, indexed for draw ordering.
///
/// ```text
///   update(dt) ──► objects move ──► dynamic_grid.recalculate
///   draw_order ──► topological_sort(tiles ++ objects,
///                                   static_grid + dynamic_grid)
/// ```
pub struct Scene {
    nodes: Arena<Node>,
    map: TileMap,
    /// Terrain only. Tiles never move, so this grid is never recalculated.
    static_grid: GridIndex2D,
    dynamic_grid: GridIndex2D,
    /// Insertion order, which is also the tie-break order when drawing.
    objects: Vec<Handle>,
    tile_size: (f32, f32, f32),
    sort_options: SortOptions,
}

impl Scene {
    /// Empty scene with the config's grids and tile set but no terrain.
    pub fn empty(config: &SceneConfig) -> SceneResult<Self> {
        let (tw, th, _) = config.tile_size;
        Ok(Self {
            nodes: Arena::new(),
            map: TileMap::new(config.map.width, config.map.height, (tw, th), config.tile_set()?),
            static_grid: config.grid.build()?,
            dynamic_grid: config.grid.build()?,
            objects: Vec::new(),
            tile_size: config.tile_size,
            sort_options: config.sort_options(),
        })
    }

    /// Build the scene a config describes: terrain first, then objects.
    pub fn from_config(config: &SceneConfig) -> SceneResult<Self> {
        let mut scene = Self::empty(config)?;
        scene.load_tile_data(&config.map.data)?;
        for object in &config.objects {
            scene.add_object(object.build(scene.tile_size))?;
        }

        debug!(
            tiles = scene.map.tiles().count(),
            objects = scene.objects.len(),
            "scene ready"
        );
        Ok(scene)
    }

    /// The built-in demo scene.
    pub fn demo() -> SceneResult<Self> {
        Self::from_config(&SceneConfig::default())
    }

    #[must_use]
    pub const fn tile_map(&self) -> &TileMap {
        &self.map
    }

    pub fn tile_map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    #[must_use]
    pub const fn static_grid(&self) -> &GridIndex2D {
        &self.static_grid
    }

    #[must_use]
    pub const fn dynamic_grid(&self) -> &GridIndex2D {
        &self.dynamic_grid
    }

    #[must_use]
    pub fn node(&self, handle: Handle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[must_use]
    pub const fn sort_options(&self) -> SortOptions {
        self.sort_options
    }

    pub fn set_sort_options(&mut self, options: SortOptions) {
        self.sort_options = options;
    }

    pub fn load_tile_data(&mut self, data: &[u32]) -> SceneResult<usize> {
        self.map
            .load_tile_data(&mut self.nodes, &mut self.static_grid, data)
    }

    pub fn set_cell(&mut self, x: u32, y: u32, index: u32) -> SceneResult<Option<Handle>> {
        self.map
            .set_cell(&mut self.nodes, &mut self.static_grid, x, y, index)
    }

    /// Hand an object to the scene. It is indexed immediately.
    pub fn add_object(&mut self, object: MapObject) -> SceneResult<Handle> {
        let handle = self.nodes.insert(Node::Object(object));
        if let Err(error) = self.dynamic_grid.insert(&self.nodes, handle) {
            self.nodes.remove(handle);
            return Err(error.into());
        }
        self.objects.push(handle);
        trace!(%handle, "added object");
        Ok(handle)
    }

    /// Take an object back out of the scene.
    ///
    /// Memberships are dropped by handle, so this is safe even if the object
    /// moved since the last [`update`](Self::update).
    pub fn remove_object(&mut self, handle: Handle) -> SceneResult<MapObject> {
        if self.object(handle).is_none() {
            return Err(SceneError::NotAnObject(handle));
        }

        self.dynamic_grid.purge(&[handle]);
        self.objects.retain(|&object| object != handle);

        match self.nodes.remove(handle) {
            Some(Node::Object(object)) => Ok(object),
            _ => Err(SceneError::NotAnObject(handle)),
        }
    }

    #[must_use]
    pub fn object(&self, handle: Handle) -> Option<&MapObject> {
        self.nodes.get(handle).and_then(Node::as_object)
    }

    pub fn object_mut(&mut self, handle: Handle) -> Option<&mut MapObject> {
        self.nodes.get_mut(handle).and_then(Node::as_object_mut)
    }

    /// Object handles in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = Handle> + '_ {
        self.objects.iter().copied()
    }

    /// Advance every object by `dt` seconds and bring the dynamic grid back
    /// in sync.
    pub fn update(&mut self, dt: f32) -> Recalculation {
        for &handle in &self.objects {
            if let Some(object) = self.nodes.get_mut(handle).and_then(Node::as_object_mut) {
                object.update(dt);
            }
        }

        let recalculation = self.dynamic_grid.recalculate(&self.nodes);
        trace!(
            removed = recalculation.removed,
            inserted = recalculation.inserted,
            "dynamic grid recalculated"
        );
        recalculation
    }

    /// Back-to-front order of every tile and object.
    ///
    /// Tiles come first in row-major map order, then objects in insertion
    /// order; that sequence decides ties between unrelated boxes.
    pub fn draw_order(&self) -> SceneResult<DrawOrder> {
        let group = self.index_group();
        let entities = self.map.tiles().chain(self.objects.iter().copied());
        Ok(topological_sort(
            &self.nodes,
            &group,
            entities,
            self.sort_options,
        )?)
    }

    /// Render the scene back to front, returning how many nodes were drawn.
    pub fn draw(&self, canvas: &mut dyn Canvas) -> SceneResult<usize> {
        let order = self.draw_order()?;
        Ok(self.draw_ordered(&order.order, canvas))
    }

    /// Render a precomputed order. Handles that died since are skipped.
    pub fn draw_ordered(&self, order: &[Handle], canvas: &mut dyn Canvas) -> usize {
        draw_all(&self.nodes, order, canvas)
    }

    /// Distinct nodes whose screen box contains `(x, y)`, tiles first.
    pub fn pick(&self, x: f32, y: f32) -> SceneResult<Vec<Handle>> {
        let hits = self.index_group().find(&Query::Point { x, y })?;

        let mut picked: SmallVec<[Handle; 8]> = SmallVec::new();
        for hit in hits {
            if picked.contains(&hit.handle) {
                continue;
            }
            let under = self
                .nodes
                .get(hit.handle)
                .is_some_and(|node| node.aabb2d().contains_point(x, y));
            if under {
                picked.push(hit.handle);
            }
        }
        Ok(picked.into_vec())
    }

    fn index_group(&self) -> IndexGroup2D<'_> {
        IndexGroup2D::new()
            .with(&self.static_grid)
            .with(&self.dynamic_grid)
    }
}

#[cfg(test)]
mod tests {
    use iso_geom::Spatial3D;
    use iso_order::SpriteId;

    use super::*;
    use crate::{MapConfig, ObjectConfig};

    fn small_config() -> SceneConfig {
        SceneConfig {
            map: MapConfig {
                width: 3,
                height: 1,
                data: vec![1, 1, 1],
            },
            objects: vec![ObjectConfig {
                position: (1.0, 0.2, 0.0),
                ..ObjectConfig::default()
            }],
            ..SceneConfig::default()
        }
    }

    #[test]
    fn test_from_config_indexes_everything() {
        let scene = Scene::from_config(&small_config()).unwrap();

        assert_eq!(scene.tile_map().tiles().count(), 3);
        assert_eq!(scene.objects().count(), 1);
        for tile in scene.tile_map().tiles() {
            assert!(scene.static_grid().cells_containing(tile).next().is_some());
        }
        let object = scene.objects().next().unwrap();
        assert!(scene.dynamic_grid().cells_containing(object).next().is_some());
    }

    #[test]
    fn test_update_moves_object_between_cells() {
        let mut scene = Scene::from_config(&small_config()).unwrap();
        let handle = scene.objects().next().unwrap();
        let before: Vec<_> = scene.dynamic_grid().cells_containing(handle).collect();

        let object = scene.object_mut(handle).unwrap();
        object.set_direction((1.0, -1.0, 0.0));
        object.walk_speed = 10.0;

        let recalculation = scene.update(1.0);
        assert!(!recalculation.is_noop());

        let object = scene.object(handle).unwrap();
        let after: Vec<_> = scene.dynamic_grid().cells_containing(handle).collect();
        assert_ne!(before, after);
        for cell in after {
            assert!(scene.dynamic_grid().cell_contains(cell, handle));
        }
        assert!(object.position().0 > 1.0);
    }

    #[test]
    fn test_draw_order_places_object_between_tiles() {
        let scene = Scene::from_config(&small_config()).unwrap();
        let order = scene.draw_order().unwrap();

        let tiles: Vec<_> = scene.tile_map().tiles().collect();
        let object = scene.objects().next().unwrap();
        assert_eq!(order.len(), 4);

        // The walker at x = 1 sits in front of the x = 0 tile and behind x = 2
        let position = |handle| order.position(handle).unwrap();
        assert!(position(tiles[0]) < position(object));
        assert!(position(object) < position(tiles[2]));
    }

    #[test]
    fn test_remove_object() {
        let mut scene = Scene::from_config(&small_config()).unwrap();
        let handle = scene.objects().next().unwrap();

        scene.object_mut(handle).unwrap().set_position((5.0, 5.0, 0.0));
        let removed = scene.remove_object(handle).unwrap();
        assert_eq!(removed.sprite, SpriteId(100));

        assert_eq!(scene.dynamic_grid().membership_count(), 0);
        assert_eq!(scene.objects().count(), 0);
        assert!(matches!(
            scene.remove_object(handle),
            Err(SceneError::NotAnObject(_))
        ));

        let tile = scene.tile_map().tiles().next().unwrap();
        assert!(matches!(
            scene.remove_object(tile),
            Err(SceneError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_pick_returns_distinct_nodes_under_point() {
        let scene = Scene::from_config(&small_config()).unwrap();
        let tile = scene.tile_map().tile_at(0, 0).unwrap();
        let aabb2d = *scene.node(tile).unwrap().aabb2d();

        let picked = scene.pick(aabb2d.x + 1.0, aabb2d.y + 1.0).unwrap();
        assert!(picked.contains(&tile));

        let mut deduped = picked.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), picked.len());

        assert!(scene.pick(5_000.0, 5_000.0).unwrap().is_empty());
    }

    #[test]
    fn test_set_cell_updates_static_grid() {
        let mut scene = Scene::from_config(&small_config()).unwrap();
        let old = scene.tile_map().tile_at(1, 0).unwrap();

        let new = scene.set_cell(1, 0, 3).unwrap().unwrap();
        assert!(scene.node(old).is_none());
        assert_eq!(scene.static_grid().cells_containing(old).count(), 0);
        assert_eq!(scene.node(new).unwrap().aabb3d().depth, 2.0);
    }
}
