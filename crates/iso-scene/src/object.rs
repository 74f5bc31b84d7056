//! Free-moving objects placed on a tile map.

use iso_geom::{Aabb2, Aabb3, Spatial2D, Spatial3D, cart_to_iso};
use iso_order::{Canvas, Drawable, SpriteId};

/// Screen scale of one world unit along `i`, `j` and `k`.
pub const DEFAULT_TILE_SIZE: (f32, f32, f32) = (32.0, 32.0, 16.0);

/// Walking object with a world position and a derived screen position.
///
/// Both boxes are kept in sync by [`set_position`](Self::set_position):
/// the 3D box sits at the world position and the 2D box at its isometric
/// projection, offset by the sprite anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct MapObject {
    pub sprite: SpriteId,
    position: (f32, f32, f32),
    tile_size: (f32, f32, f32),
    anchor: (f32, f32),
    aabb2d: Aabb2,
    aabb3d: Aabb3,
    /// World units per second.
    pub walk_speed: f32,
    direction: (f32, f32, f32),
}

impl MapObject {
    pub fn new(sprite: SpriteId, position: (f32, f32, f32)) -> Self {
        let mut object = Self {
            sprite,
            position,
            tile_size: DEFAULT_TILE_SIZE,
            anchor: (24.0, 8.0),
            aabb2d: Aabb2::new(0.0, 0.0, 32.0, 64.0),
            aabb3d: Aabb3::new(0.0, 0.0, 0.0, 0.7, 0.7, 1.0),
            walk_speed: 6.0,
            direction: (0.0, 0.0, 0.0),
        };
        object.set_position(position);
        object
    }

    #[must_use]
    pub fn with_tile_size(mut self, tile_size: (f32, f32, f32)) -> Self {
        self.tile_size = tile_size;
        self.set_position(self.position);
        self
    }

    #[must_use]
    pub fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.anchor = (x, y);
        self.set_position(self.position);
        self
    }

    #[must_use]
    pub fn with_sprite_size(mut self, width: f32, height: f32) -> Self {
        self.aabb2d.set_size(width, height);
        self
    }

    #[must_use]
    pub fn with_extents(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.aabb3d.width = width;
        self.aabb3d.height = height;
        self.aabb3d.depth = depth;
        self
    }

    #[must_use]
    pub fn with_walk_speed(mut self, walk_speed: f32) -> Self {
        self.walk_speed = walk_speed;
        self
    }

    #[must_use]
    pub const fn position(&self) -> (f32, f32, f32) {
        self.position
    }

    /// Move to a world position and re-derive the screen box.
    pub fn set_position(&mut self, position: (f32, f32, f32)) {
        let (x, y, z) = position;
        let (i, j, k) = cart_to_iso(x, y, z);
        let (ti, tj, tk) = self.tile_size;
        let (ax, ay) = self.anchor;

        self.aabb2d
            .set_position(i.mul_add(ti, -ax), j.mul_add(tj, k.mul_add(tk, -ay)));
        self.aabb3d.set_position(x, y, z);
        self.position = position;
    }

    #[must_use]
    pub const fn direction(&self) -> (f32, f32, f32) {
        self.direction
    }

    /// Set the heading for the next [`update`](Self::update). Stored
    /// normalised; a zero or non-finite vector stops the object.
    pub fn set_direction(&mut self, direction: (f32, f32, f32)) {
        self.direction = normalize(direction);
    }

    /// Displacement over `dt` seconds at the current heading.
    #[must_use]
    pub fn velocity(&self, dt: f32) -> (f32, f32, f32) {
        let speed = self.walk_speed * dt;
        let (dx, dy, dz) = self.direction;
        (dx * speed, dy * speed, dz * speed)
    }

    pub fn update(&mut self, dt: f32) {
        let (x, y, z) = self.position;
        let (vx, vy, vz) = self.velocity(dt);
        self.set_position((x + vx, y + vy, z + vz));
    }
}

fn normalize((x, y, z): (f32, f32, f32)) -> (f32, f32, f32) {
    let length = x.hypot(y).hypot(z);
    if length > 0.0 && length.is_finite() {
        (x / length, y / length, z / length)
    } else {
        (0.0, 0.0, 0.0)
    }
}

impl Spatial2D for MapObject {
    fn aabb2d(&self) -> &Aabb2 {
        &self.aabb2d
    }
}

impl Spatial3D for MapObject {
    fn aabb3d(&self) -> &Aabb3 {
        &self.aabb3d
    }
}

impl Drawable for MapObject {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(self.sprite, self.aabb2d.x, self.aabb2d.y);
    }
}
