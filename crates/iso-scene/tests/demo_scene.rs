//! Frame loop over the demo scene.

use iso_geom::{Spatial2D, Spatial3D};
use iso_order::{Canvas, SpriteId, is_behind};
use iso_scene::{Scene, SceneConfig, SceneError};
use iso_spatial::Handle;

#[derive(Default)]
struct Recorder {
    sprites: Vec<SpriteId>,
}

impl Canvas for Recorder {
    fn draw_sprite(&mut self, sprite: SpriteId, _x: f32, _y: f32) {
        self.sprites.push(sprite);
    }
}

/// Every pair whose sprites overlap on screen is drawn back to front.
fn assert_painter_order(scene: &Scene, order: &[Handle]) {
    for (index, &earlier) in order.iter().enumerate() {
        let a = scene.node(earlier).unwrap();
        for &later in &order[index + 1..] {
            let b = scene.node(later).unwrap();
            if a.aabb2d().intersects(b.aabb2d()) {
                assert!(
                    !is_behind(b.aabb3d(), a.aabb3d()),
                    "{later} is behind {earlier} but drawn over it"
                );
            }
        }
    }
}

#[test]
fn test_demo_scene_draws_every_node() {
    let scene = Scene::demo().unwrap();
    let tiles = scene.tile_map().tiles().count();
    assert_eq!(tiles, 12);

    let mut canvas = Recorder::default();
    let drawn = scene.draw(&mut canvas).unwrap();
    assert_eq!(drawn, tiles + 1);
    assert_eq!(canvas.sprites.len(), drawn);
    assert_eq!(
        canvas.sprites.iter().filter(|&&s| s == SpriteId(100)).count(),
        1
    );
}

#[test]
fn test_walking_around_the_map_keeps_a_valid_order() {
    let mut scene = Scene::demo().unwrap();
    let walker = scene.objects().next().unwrap();
    scene.object_mut(walker).unwrap().walk_speed = 3.0;

    let legs = [(1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (-1.0, 0.0, 0.0), (0.0, -1.0, 0.0)];
    for direction in legs {
        scene.object_mut(walker).unwrap().set_direction(direction);

        for _ in 0..60 {
            scene.update(1.0 / 30.0);

            let order = scene.draw_order().unwrap();
            assert_eq!(order.len(), scene.tile_map().tiles().count() + 1);
            if order.dropped_edges == 0 {
                assert_painter_order(&scene, &order.order);
            }

            for cell in scene.dynamic_grid().cells_containing(walker) {
                assert!(scene.dynamic_grid().cell_contains(cell, walker));
            }
        }
    }

    // Four legs of six units each bring the walker home
    let (x, y, z) = scene.object(walker).unwrap().position();
    assert!(x.abs() < 1e-3 && y.abs() < 1e-3 && z.abs() < 1e-3);
}

#[test]
fn test_walker_leaving_the_grid_is_parked_then_returns() {
    let json = r#"{
        "grid": { "origin": [-64.0, -64.0], "dimensions": [4, 4] },
        "map": { "width": 1, "height": 1, "data": [1] }
    }"#;
    let mut scene = Scene::from_config(&SceneConfig::from_json(json).unwrap()).unwrap();
    let walker = scene.objects().next().unwrap();

    scene.object_mut(walker).unwrap().set_position((40.0, 0.0, 0.0));
    scene.update(0.0);
    assert_eq!(scene.dynamic_grid().cells_containing(walker).count(), 0);
    assert_eq!(scene.dynamic_grid().parked(), &[walker]);

    scene.object_mut(walker).unwrap().set_position((0.0, 0.0, 0.0));
    scene.update(0.0);
    assert!(scene.dynamic_grid().cells_containing(walker).next().is_some());
    assert!(scene.dynamic_grid().parked().is_empty());
}

#[test]
fn test_bad_terrain_is_reported() {
    let json = r#"{ "map": { "width": 2, "height": 2, "data": [1, 1, 1] } }"#;
    let config = SceneConfig::from_json(json).unwrap();
    assert!(matches!(
        Scene::from_config(&config),
        Err(SceneError::Terrain { expected: 4, actual: 3 })
    ));

    let json = r#"{ "map": { "width": 1, "height": 1, "data": [42] } }"#;
    let config = SceneConfig::from_json(json).unwrap();
    assert!(matches!(
        Scene::from_config(&config),
        Err(SceneError::UnknownTile(42))
    ));
}
