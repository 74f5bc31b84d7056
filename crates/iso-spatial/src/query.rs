//! Neighbour queries shared by every spatial index.

use iso_geom::Aabb2;

use crate::{CellCoord, GridError, GridResult, Handle};

/// What to look up in a spatial index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Query {
    /// The single cell containing a screen position.
    Point { x: f32, y: f32 },
    /// Every cell a box overlaps.
    Rect(Aabb2),
}

impl Query {
    /// Reject geometry no index can place.
    pub fn validate(&self) -> GridResult<()> {
        match self {
            Self::Point { x, y } if !(x.is_finite() && y.is_finite()) => Err(
                GridError::UnsupportedQuery(format!("non-finite position ({x}, {y})")),
            ),
            Self::Rect(aabb) if !aabb.is_finite() => Err(GridError::UnsupportedQuery(format!(
                "non-finite bounding box {aabb:?}"
            ))),
            _ => Ok(()),
        }
    }
}

impl From<Aabb2> for Query {
    fn from(aabb: Aabb2) -> Self {
        Self::Rect(aabb)
    }
}

impl From<(f32, f32)> for Query {
    fn from((x, y): (f32, f32)) -> Self {
        Self::Point { x, y }
    }
}

/// One query hit: a stored handle and the cell it was found in.
///
/// A handle spanning several queried cells is reported once per cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighbor {
    pub cell: CellCoord,
    pub handle: Handle,
}

/// Read side of a spatial index.
pub trait SpatialIndex {
    /// Append every hit for `query` to `out`.
    fn find_into(&self, query: &Query, out: &mut Vec<Neighbor>) -> GridResult<()>;

    /// Collect every hit for `query`.
    fn find(&self, query: &Query) -> GridResult<Vec<Neighbor>> {
        let mut out = Vec::new();
        self.find_into(query, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(Query::Point { x: 0.0, y: 0.0 }.validate().is_ok());
        assert!(matches!(
            Query::Point { x: f32::NAN, y: 0.0 }.validate(),
            Err(GridError::UnsupportedQuery(_))
        ));
        assert!(matches!(
            Query::Rect(Aabb2::new(0.0, 0.0, f32::INFINITY, 1.0)).validate(),
            Err(GridError::UnsupportedQuery(_))
        ));
    }

    #[test]
    fn test_degenerate_rect_is_supported() {
        // Zero and negative extents cover nothing but are not errors
        assert!(Query::Rect(Aabb2::new(0.0, 0.0, 0.0, -4.0)).validate().is_ok());
    }
}
