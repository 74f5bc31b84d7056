//! Renderer seam.

use iso_geom::{Spatial2D, Spatial3D};
use iso_spatial::{Arena, Handle};

/// Opaque sprite identifier understood by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u32);

/// Render target. Implemented by the rendering layer.
pub trait Canvas {
    fn draw_sprite(&mut self, sprite: SpriteId, x: f32, y: f32);
}

/// Something placed in the scene that renders itself once per frame.
pub trait Drawable: Spatial2D + Spatial3D {
    fn draw(&self, canvas: &mut dyn Canvas);
}

/// Draw `order` back to front. Stale handles are skipped.
pub fn draw_all<T: Drawable>(arena: &Arena<T>, order: &[Handle], canvas: &mut dyn Canvas) -> usize {
    let mut drawn = 0;
    for item in order.iter().filter_map(|&handle| arena.get(handle)) {
        item.draw(canvas);
        drawn += 1;
    }
    drawn
}
