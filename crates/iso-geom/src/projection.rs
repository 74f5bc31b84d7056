//! Isometric and hexagonal projections.
//!
//! ```text
//!        (0,0)
//!       ╱     ╲          one unit step along +x moves half a tile right
//!   (0,1)     (1,0)      and a quarter tile down the screen; +y moves
//!       ╲     ╱          half a tile left and a quarter tile down
//!        (1,1)
//! ```

use crate::Aabb3;

/// Project a cartesian `(x, y, z)` position to isometric `(i, j, k)`.
///
/// `i = (x - y) / 2`, `j = (x + y) / 4`, `k = z`. Sprite placement and the
/// hexagon projection both build on this, so it must stay bit-exact.
#[must_use]
pub fn cart_to_iso(x: f32, y: f32, z: f32) -> (f32, f32, f32) {
    let i = (x - y) * 0.5;
    let j = (y + x) * 0.25;
    (i, j, z)
}

/// Silhouette of a 3D box projected into hexagon space.
///
/// Each corner maps to `hx = x + z`, `hy = y + z`, `hh = (hx - hy) / 2`,
/// `hv = (hx + hy) / 4`; the hexagon keeps the extremes of each.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Hexagon {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub h_min: f32,
    pub h_max: f32,
    pub v_min: f32,
    pub v_max: f32,
}

impl Hexagon {
    /// Strict overlap on the `x`, `y` and `h` intervals.
    ///
    /// `v` is carried for callers but never decides overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x_min < other.x_max
            && other.x_min < self.x_max
            && self.y_min < other.y_max
            && other.y_min < self.y_max
            && self.h_min < other.h_max
            && other.h_min < self.h_max
    }
}

/// Project `aabb` (relative to `origin`) into its [`Hexagon`].
#[must_use]
pub fn hex_bounds(aabb: &Aabb3, origin: (f32, f32, f32)) -> Hexagon {
    let (ox, oy, oz) = origin;
    let [x0, y0, z0] = aabb.min();
    let [x1, y1, z1] = aabb.max();

    let mut hex = Hexagon {
        x_min: f32::INFINITY,
        x_max: f32::NEG_INFINITY,
        y_min: f32::INFINITY,
        y_max: f32::NEG_INFINITY,
        h_min: f32::INFINITY,
        h_max: f32::NEG_INFINITY,
        v_min: f32::INFINITY,
        v_max: f32::NEG_INFINITY,
    };

    for x in [x0 - ox, x1 - ox] {
        for y in [y0 - oy, y1 - oy] {
            for z in [z0 - oz, z1 - oz] {
                let hx = x + z;
                let hy = y + z;
                let hh = (hx - hy) * 0.5;
                let hv = (hx + hy) * 0.25;

                hex.x_min = hex.x_min.min(hx);
                hex.x_max = hex.x_max.max(hx);
                hex.y_min = hex.y_min.min(hy);
                hex.y_max = hex.y_max.max(hy);
                hex.h_min = hex.h_min.min(hh);
                hex.h_max = hex.h_max.max(hh);
                hex.v_min = hex.v_min.min(hv);
                hex.v_max = hex.v_max.max(hv);
            }
        }
    }

    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_to_iso_known_values() {
        assert_eq!(cart_to_iso(1.0, 1.0, 1.0), (0.0, 0.5, 1.0));
        assert_eq!(cart_to_iso(2.0, 0.0, 0.0), (1.0, 0.5, 0.0));
        assert_eq!(cart_to_iso(0.0, 2.0, 5.0), (-1.0, 0.5, 5.0));
    }

    #[test]
    fn test_hexagons_overlap_only_when_adjacent() {
        let origin = (0.0, 0.0, 0.0);
        let hex1 = hex_bounds(&Aabb3::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0), origin);
        let hex2 = hex_bounds(&Aabb3::new(1.0, 0.0, 0.0, 1.0, 1.0, 1.0), origin);
        let hex3 = hex_bounds(&Aabb3::new(2.0, 0.0, 0.0, 1.0, 1.0, 1.0), origin);

        assert!(hex1.overlaps(&hex2));
        assert!(hex2.overlaps(&hex3));
        assert!(!hex3.overlaps(&hex1));
    }

    #[test]
    fn test_hex_bounds_of_unit_cube() {
        let hex = hex_bounds(&Aabb3::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0), (0.0, 0.0, 0.0));
        assert_eq!((hex.x_min, hex.x_max), (0.0, 2.0));
        assert_eq!((hex.y_min, hex.y_max), (0.0, 2.0));
        assert_eq!((hex.h_min, hex.h_max), (-0.5, 0.5));
        assert_eq!((hex.v_min, hex.v_max), (0.0, 1.0));
    }

    #[test]
    fn test_hex_bounds_respects_origin() {
        let aabb = Aabb3::new(5.0, 5.0, 0.0, 1.0, 1.0, 1.0);
        let shifted = hex_bounds(&aabb, (5.0, 5.0, 0.0));
        let at_origin = hex_bounds(&Aabb3::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0), (0.0, 0.0, 0.0));
        assert_eq!(shifted, at_origin);
    }
}
