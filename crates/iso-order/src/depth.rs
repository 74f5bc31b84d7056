//! Pairwise depth relation.

use iso_geom::Aabb3;

/// Whether `a` must be drawn before `b`.
///
/// The first separated axis decides, checked in `x`, `y`, `z` order: lower
/// `x` is behind, then lower `y`, then *higher* `z`. Boxes that overlap on
/// every axis have no order.
#[must_use]
pub fn is_behind(a: &Aabb3, b: &Aabb3) -> bool {
    let separation = a.separation(b);

    if separation.x.is_separated() {
        a.x < b.x
    } else if separation.y.is_separated() {
        a.y < b.y
    } else if separation.z.is_separated() {
        a.z > b.z
    } else {
        false
    }
}
