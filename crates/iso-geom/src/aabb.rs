//! Axis-aligned bounding boxes.

use std::ops::Neg;

/// 2D axis-aligned box in screen space.
///
/// `(x, y)` is the minimum corner. Degenerate extents (zero or negative)
/// are tolerated everywhere and never rejected.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb2 {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb2 {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub const fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    #[must_use]
    pub const fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub const fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap: boxes that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        other.x < self.max_x()
            && self.x < other.max_x()
            && other.y < self.max_y()
            && self.y < other.max_y()
    }

    /// Half-open containment, `[x, x + width) x [y, y + height)`.
    #[must_use]
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.max_x() && py >= self.y && py < self.max_y()
    }

    /// True when every component is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// 3D axis-aligned box in cartesian world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Aabb3 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, width: f32, height: f32, depth: f32) -> Self {
        Self {
            x,
            y,
            z,
            width,
            height,
            depth,
        }
    }

    #[must_use]
    pub const fn position(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.z)
    }

    pub const fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    #[must_use]
    pub const fn dimensions(&self) -> (f32, f32, f32) {
        (self.width, self.height, self.depth)
    }

    #[must_use]
    pub fn min(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn max(&self) -> [f32; 3] {
        [self.x + self.width, self.y + self.height, self.z + self.depth]
    }

    /// Which side of `self` the `other` box lies on, per axis.
    ///
    /// Intervals are half-open, so boxes that touch on a face count as
    /// separated along that axis. Two zero-width intervals at the same
    /// coordinate are on neither side of each other and count as overlapping.
    #[must_use]
    pub fn separation(&self, other: &Self) -> Separation {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());

        let side = |axis: usize| {
            let before = a_min[axis] >= b_max[axis];
            let after = b_min[axis] >= a_max[axis];
            match (before, after) {
                (true, false) => Side::Before,
                (false, true) => Side::After,
                _ => Side::Overlap,
            }
        };

        Separation {
            x: side(0),
            y: side(1),
            z: side(2),
        }
    }

    /// Strict overlap on all three axes.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        (0..3).all(|axis| b_min[axis] < a_max[axis] && a_min[axis] < b_max[axis])
    }
}

/// Position of one interval relative to another along a single axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Side {
    /// The other box lies entirely on the negative side.
    Before = -1,
    /// The intervals overlap.
    Overlap = 0,
    /// The other box lies entirely on the positive side.
    After = 1,
}

impl Side {
    #[must_use]
    pub const fn signum(self) -> i8 {
        self as i8
    }

    #[must_use]
    pub const fn is_separated(self) -> bool {
        !matches!(self, Self::Overlap)
    }
}

impl Neg for Side {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Before => Self::After,
            Self::Overlap => Self::Overlap,
            Self::After => Self::Before,
        }
    }
}

/// Per-axis [`Side`] triple returned by [`Aabb3::separation`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Separation {
    pub x: Side,
    pub y: Side,
    pub z: Side,
}

impl Separation {
    #[must_use]
    pub const fn to_array(self) -> [i8; 3] {
        [self.x.signum(), self.y.signum(), self.z.signum()]
    }
}

impl Neg for Separation {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Anything with a presence in 2D screen space.
pub trait Spatial2D {
    fn aabb2d(&self) -> &Aabb2;
}

/// Anything with a presence in 3D world space.
pub trait Spatial3D {
    fn aabb3d(&self) -> &Aabb3;
}

impl Spatial2D for Aabb2 {
    fn aabb2d(&self) -> &Aabb2 {
        self
    }
}

impl Spatial3D for Aabb3 {
    fn aabb3d(&self) -> &Aabb3 {
        self
    }
}
