#![allow(clippy::float_cmp)]

//! Headless isometric scene runner.
//!
//! Loads a scene, walks its first object around the map and resolves the
//! draw order every frame, rendering into a canvas that only counts.
//!
//! Configuration:
//! - scene file: first argument, else `SCENE_CONFIG`, else the built-in demo
//! - `FRAMES`: frames to simulate (default 600)
//! - `TARGET_FPS`: simulated frame rate, sets `dt` (default 60)
//! - `RUST_LOG`: extra tracing directives; `iso_runner=debug` logs every frame

mod patrol;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use iso_order::{Canvas, SpriteId};
use iso_scene::{Scene, SceneConfig};
use tracing::{debug, info};

use crate::patrol::Patrol;

/// Canvas that records how much would have been drawn.
#[derive(Debug, Default)]
struct CountingCanvas {
    sprites: u64,
    last: Option<(SpriteId, f32, f32)>,
}

impl Canvas for CountingCanvas {
    fn draw_sprite(&mut self, sprite: SpriteId, x: f32, y: f32) {
        self.sprites += 1;
        self.last = Some((sprite, x, y));
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("iso_runner=info".parse()?)
                .add_directive("iso_scene=info".parse()?),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SCENE_CONFIG").ok())
        .map(PathBuf::from);

    let config = match &config_path {
        Some(path) => {
            info!("Loading scene from {}", path.display());
            SceneConfig::load(path)?
        }
        None => {
            info!("No scene config given, using the built-in demo");
            SceneConfig::default()
        }
    };

    let frames: u64 = env_or("FRAMES", 600);
    let target_fps: f32 = env_or("TARGET_FPS", 60.0);
    eyre::ensure!(
        target_fps.is_finite() && target_fps > 0.0,
        "TARGET_FPS must be a positive number, got {target_fps}"
    );
    let dt = 1.0 / target_fps;

    let mut scene = Scene::from_config(&config)?;
    let (width, height) = scene.tile_map().dimensions();
    info!(
        width,
        height,
        tiles = scene.tile_map().tiles().count(),
        objects = scene.objects().count(),
        "Scene loaded"
    );

    let walker = scene.objects().next();
    let mut patrol = Patrol::new(0.0, width.saturating_sub(1) as f32);
    let mut canvas = CountingCanvas::default();
    let mut dropped_edges = 0;
    let start = Instant::now();

    for frame in 0..frames {
        if let Some(handle) = walker {
            if let Some(object) = scene.object_mut(handle) {
                patrol.steer(object);
            }
        }

        let recalculation = scene.update(dt);
        let order = scene.draw_order()?;
        let drawn = scene.draw_ordered(&order.order, &mut canvas);
        dropped_edges += order.dropped_edges;

        debug!(
            frame,
            drawn,
            dropped = order.dropped_edges,
            removed = recalculation.removed,
            inserted = recalculation.inserted,
            parked = recalculation.parked,
            "Frame"
        );
    }

    let elapsed = start.elapsed();
    let per_frame = elapsed.as_secs_f64() * 1000.0 / frames.max(1) as f64;
    info!(
        frames,
        sprites = canvas.sprites,
        dropped_edges,
        laps = patrol.laps(),
        "Finished in {:.1?} ({per_frame:.3} ms/frame)",
        elapsed
    );
    if let Some((sprite, x, y)) = canvas.last {
        debug!(sprite = sprite.0, x, y, "Last sprite drawn");
    }

    Ok(())
}
