//! Grid cell coordinates.

/// Integer coordinate of one grid cell, column `i` and row `j`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CellCoord {
    pub i: u32,
    pub j: u32,
}

impl CellCoord {
    #[must_use]
    pub const fn new(i: u32, j: u32) -> Self {
        Self { i, j }
    }
}

impl From<(u32, u32)> for CellCoord {
    fn from((i, j): (u32, u32)) -> Self {
        Self::new(i, j)
    }
}

/// Half-open rectangle of cells, `[i_min, i_max) x [j_min, j_max)`,
/// already clipped to the grid bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CellRange {
    pub i_min: u32,
    pub i_max: u32,
    pub j_min: u32,
    pub j_max: u32,
}

impl CellRange {
    pub const EMPTY: Self = Self {
        i_min: 0,
        i_max: 0,
        j_min: 0,
        j_max: 0,
    };

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.i_min >= self.i_max || self.j_min >= self.j_max
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            ((self.i_max - self.i_min) * (self.j_max - self.j_min)) as usize
        }
    }

    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.i >= self.i_min && cell.i < self.i_max && cell.j >= self.j_min && cell.j < self.j_max
    }

    /// Cells in row-major order: `i` varies fastest.
    pub fn iter(self) -> impl Iterator<Item = CellCoord> {
        (self.j_min..self.j_max)
            .flat_map(move |j| (self.i_min..self.i_max).map(move |i| CellCoord::new(i, j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_iter_row_major() {
        let range = CellRange {
            i_min: 14,
            i_max: 16,
            j_min: 14,
            j_max: 16,
        };

        let cells: Vec<_> = range.iter().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(14, 14),
                CellCoord::new(15, 14),
                CellCoord::new(14, 15),
                CellCoord::new(15, 15),
            ]
        );
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = CellRange {
            i_min: 3,
            i_max: 2,
            j_min: 0,
            j_max: 5,
        };

        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.iter().count(), 0);
    }

    #[test]
    fn test_range_contains() {
        let range = CellRange {
            i_min: 1,
            i_max: 3,
            j_min: 1,
            j_max: 2,
        };

        assert!(range.contains(CellCoord::new(1, 1)));
        assert!(range.contains(CellCoord::new(2, 1)));
        assert!(!range.contains(CellCoord::new(3, 1)));
        assert!(!range.contains(CellCoord::new(1, 2)));
    }
}
