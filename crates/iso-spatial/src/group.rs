//! Fan-out over several spatial indices.

use smallvec::SmallVec;

use crate::{GridResult, Neighbor, Query, SpatialIndex};

/// Presents several indices as one query surface.
///
/// Typical use keeps static tiles and per-frame moving objects in separate
/// grids, so only the dynamic one is recalculated, while the draw-order
/// pass queries both at once.
#[derive(Default)]
pub struct IndexGroup2D<'a> {
    indices: SmallVec<[&'a dyn SpatialIndex; 2]>,
}

impl<'a> IndexGroup2D<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an index; results follow insertion order.
    #[must_use]
    pub fn with(mut self, index: &'a dyn SpatialIndex) -> Self {
        self.indices.push(index);
        self
    }

    pub fn push(&mut self, index: &'a dyn SpatialIndex) {
        self.indices.push(index);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl<'a> FromIterator<&'a dyn SpatialIndex> for IndexGroup2D<'a> {
    fn from_iter<I: IntoIterator<Item = &'a dyn SpatialIndex>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl SpatialIndex for IndexGroup2D<'_> {
    /// Concatenates each member's hits in member order.
    fn find_into(&self, query: &Query, out: &mut Vec<Neighbor>) -> GridResult<()> {
        for index in &self.indices {
            index.find_into(query, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use iso_geom::Aabb2;

    use super::*;
    use crate::{Arena, GridError, GridIndex2D};

    fn grid() -> GridIndex2D {
        GridIndex2D::new((-1024.0, -1024.0), (64, 64), (32.0, 32.0)).unwrap()
    }

    #[test]
    fn test_group_concatenates_in_order() {
        let mut arena = Arena::new();
        let mut statics = grid();
        let mut dynamics = grid();

        let tile = arena.insert(Aabb2::new(0.0, 0.0, 32.0, 32.0));
        let player = arena.insert(Aabb2::new(4.0, 4.0, 8.0, 8.0));
        statics.insert(&arena, tile).unwrap();
        dynamics.insert(&arena, player).unwrap();

        let group = IndexGroup2D::new().with(&statics).with(&dynamics);
        let hits: Vec<_> = group
            .find(&Query::Rect(Aabb2::new(0.0, 0.0, 16.0, 16.0)))
            .unwrap()
            .into_iter()
            .map(|hit| hit.handle)
            .collect();

        assert_eq!(hits, vec![tile, player]);
    }

    #[test]
    fn test_empty_group_finds_nothing() {
        let group = IndexGroup2D::new();
        assert!(group.is_empty());
        assert!(group.find(&Query::from((0.0, 0.0))).unwrap().is_empty());
    }

    #[test]
    fn test_group_propagates_query_errors() {
        let statics = grid();
        let group: IndexGroup2D<'_> = [&statics as &dyn SpatialIndex].into_iter().collect();
        assert!(matches!(
            group.find(&Query::from((f32::INFINITY, 0.0))),
            Err(GridError::UnsupportedQuery(_))
        ));
    }
}
