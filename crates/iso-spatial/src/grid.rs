//! Uniform 2D grid over moving bounding boxes.

use hashbrown::HashMap;
use iso_geom::{Aabb2, Spatial2D};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    Arena, CellCoord, CellRange, GridError, GridResult, Handle, Neighbor, Query, SpatialIndex,
};

/// Cell bucket with set semantics; insertion order is kept so queries are
/// reproducible.
type Bucket = SmallVec<[Handle; 4]>;

/// Summary of one [`GridIndex2D::recalculate`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Recalculation {
    /// Memberships dropped because the box left the cell or died.
    pub removed: usize,
    /// Handles re-inserted because they gained cells.
    pub inserted: usize,
    /// Handles left tracked but outside every cell.
    pub parked: usize,
}

impl Recalculation {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.removed == 0 && self.inserted == 0
    }
}

/// Spatial index storing handles to 2D boxes in a fixed grid.
///
/// A box that overlaps several cells is stored in each of them. The grid
/// never reads geometry on its own: it is told a box's bounds on
/// insert/remove and re-reads them from the arena on
/// [`recalculate`](Self::recalculate).
///
/// ```text
///  origin
///    ┼───────┬───────┬───────┐
///    │ (0,0) │ (1,0) │ (2,0) │   cell (i, j) covers
///    ├───────┼───────┼───────┤   [ox + i*cw, ox + (i+1)*cw) x
///    │ (0,1) │ (1,1) │ (2,1) │   [oy + j*ch, oy + (j+1)*ch)
///    └───────┴───────┴───────┘
/// ```
///
/// # Staleness
///
/// [`remove`](Self::remove) locates memberships from the box's *current*
/// bounds. It is the exact inverse of [`insert`](Self::insert) only when
/// the box has not moved in between; after a move, call
/// [`recalculate`](Self::recalculate) first or use [`purge`](Self::purge).
pub struct GridIndex2D {
    /// World position of cell (0, 0)'s minimum corner.
    origin: (f32, f32),
    /// Grid width in cells (exclusive upper bound on `i`).
    width: u32,
    /// Grid height in cells (exclusive upper bound on `j`).
    height: u32,
    /// Cell size in world units.
    cell_size: (f32, f32),
    /// Row-major buckets.
    cells: Vec<Bucket>,
    /// Tracked handles whose bounds currently overlap no cell.
    parked: Vec<Handle>,
}

impl GridIndex2D {
    /// Create an empty grid of `dimensions.0 x dimensions.1` cells.
    pub fn new(origin: (f32, f32), dimensions: (u32, u32), cell_size: (f32, f32)) -> GridResult<Self> {
        let (cell_w, cell_h) = cell_size;
        // Negated comparison also rejects NaN
        if !(cell_w > 0.0 && cell_h > 0.0) {
            return Err(GridError::InvalidConfiguration {
                width: cell_w,
                height: cell_h,
            });
        }

        let (width, height) = dimensions;
        let cells = vec![Bucket::new(); width as usize * height as usize];

        Ok(Self {
            origin,
            width,
            height,
            cell_size,
            cells,
            parked: Vec::new(),
        })
    }

    #[must_use]
    pub const fn origin(&self) -> (f32, f32) {
        self.origin
    }

    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub const fn cell_size(&self) -> (f32, f32) {
        self.cell_size
    }

    /// Check signed cell coordinates against `[0, M) x [0, N)`.
    #[must_use]
    pub fn index_in_bounds(&self, i: i64, j: i64) -> bool {
        (0..i64::from(self.width)).contains(&i) && (0..i64::from(self.height)).contains(&j)
    }

    /// In-bounds cells overlapped by `aabb`, clipped to the grid.
    ///
    /// Grid-local coordinates are computed in `f64`. Translating by a large
    /// origin in `f32` would round away overlaps narrower than one `f32`
    /// step at that magnitude.
    #[must_use]
    pub fn cell_range(&self, aabb: &Aabb2) -> CellRange {
        let (cell_w, cell_h) = (f64::from(self.cell_size.0), f64::from(self.cell_size.1));
        let (origin_x, origin_y) = (f64::from(self.origin.0), f64::from(self.origin.1));

        let min_x = (f64::from(aabb.x) - origin_x) / cell_w;
        let max_x = (f64::from(aabb.max_x()) - origin_x) / cell_w;
        let min_y = (f64::from(aabb.y) - origin_y) / cell_h;
        let max_y = (f64::from(aabb.max_y()) - origin_y) / cell_h;

        let range = CellRange {
            i_min: clip(min_x.floor(), self.width),
            i_max: clip(max_x.ceil(), self.width),
            j_min: clip(min_y.floor(), self.height),
            j_max: clip(max_y.ceil(), self.height),
        };

        if range.is_empty() { CellRange::EMPTY } else { range }
    }

    /// Cells overlapped by `aabb` in row-major order. Cells outside the
    /// grid are skipped, so a box hanging off the edge is partially indexed.
    pub fn cells_overlapped(&self, aabb: &Aabb2) -> impl Iterator<Item = CellCoord> + use<> {
        self.cell_range(aabb).iter()
    }

    /// Cell containing a world position, if inside the grid.
    #[must_use]
    pub fn cell_at(&self, x: f32, y: f32) -> Option<CellCoord> {
        let i = ((f64::from(x) - f64::from(self.origin.0)) / f64::from(self.cell_size.0)).floor();
        let j = ((f64::from(y) - f64::from(self.origin.1)) / f64::from(self.cell_size.1)).floor();

        if i.is_nan() || j.is_nan() {
            return None;
        }

        let (i, j) = (i as i64, j as i64);
        self.index_in_bounds(i, j)
            .then(|| CellCoord::new(i as u32, j as u32))
    }

    /// Whether `handle` is stored in `cell`. Out-of-bounds cells hold nothing.
    #[must_use]
    pub fn cell_contains(&self, cell: CellCoord, handle: Handle) -> bool {
        self.bucket(cell).is_some_and(|bucket| bucket.contains(&handle))
    }

    /// Every cell currently holding `handle`, whatever its geometry says.
    pub fn cells_containing(&self, handle: Handle) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, bucket)| bucket.contains(&handle))
            .map(|(index, _)| self.coord_of(index))
    }

    // ==================== Mutation ====================

    /// Insert a box stored in `arena`. See [`insert_bounds`](Self::insert_bounds).
    pub fn insert<T: Spatial2D>(&mut self, arena: &Arena<T>, handle: Handle) -> GridResult<usize> {
        let aabb = *arena
            .get(handle)
            .ok_or(GridError::StaleHandle(handle))?
            .aabb2d();
        self.insert_bounds(handle, &aabb)
    }

    /// Add `handle` to every in-bounds cell `aabb` overlaps.
    ///
    /// Returns the number of cells the handle is now a member of for these
    /// bounds. Repeating the call returns the same count and leaves
    /// membership unchanged. A box overlapping no cell is still tracked and
    /// gets indexed by a later [`recalculate`](Self::recalculate) once it
    /// moves into the grid.
    pub fn insert_bounds(&mut self, handle: Handle, aabb: &Aabb2) -> GridResult<usize> {
        Query::Rect(*aabb).validate()?;

        let range = self.cell_range(aabb);
        let count = self.insert_range(handle, range);

        if count == 0 {
            if !self.parked.contains(&handle) {
                self.parked.push(handle);
            }
        } else {
            self.unpark(handle);
        }

        Ok(count)
    }

    /// Remove a box stored in `arena` using its current bounds.
    pub fn remove<T: Spatial2D>(&mut self, arena: &Arena<T>, handle: Handle) -> GridResult<usize> {
        let aabb = *arena
            .get(handle)
            .ok_or(GridError::StaleHandle(handle))?
            .aabb2d();
        self.remove_bounds(handle, &aabb)
    }

    /// Remove `handle` from the cells `aabb` overlaps.
    ///
    /// Returns the number of cells it was actually removed from. Memberships
    /// in cells `aabb` does not cover are left alone.
    pub fn remove_bounds(&mut self, handle: Handle, aabb: &Aabb2) -> GridResult<usize> {
        Query::Rect(*aabb).validate()?;

        let mut count = 0;
        for cell in self.cell_range(aabb).iter() {
            let index = self.index_of(cell);
            if remove_from(&mut self.cells[index], handle) {
                count += 1;
            }
        }

        self.unpark(handle);
        Ok(count)
    }

    /// Remove every membership of `handles` regardless of geometry.
    ///
    /// Scans all cells; use when prior membership is unknown, e.g. after the
    /// box was mutated outside the frame cycle or dropped from the arena.
    pub fn purge(&mut self, handles: &[Handle]) -> usize {
        let mut count = 0;
        for bucket in &mut self.cells {
            let before = bucket.len();
            bucket.retain(|handle| !handles.contains(handle));
            count += before - bucket.len();
        }

        self.parked.retain(|handle| !handles.contains(handle));
        count
    }

    /// Move every stored handle to the cells its current bounds overlap.
    ///
    /// Scans all occupied cells first, queueing removals of memberships the
    /// box no longer overlaps and re-insertions of boxes that overlap cells
    /// they are missing from. Only then are buckets mutated: removals first,
    /// then insertions, each handle inserted once. Handles no longer alive in
    /// `arena` lose all their memberships.
    ///
    /// Calling it twice without moving anything makes the second call a
    /// no-op.
    pub fn recalculate<T: Spatial2D>(&mut self, arena: &Arena<T>) -> Recalculation {
        // None marks a handle that is no longer alive
        let mut ranges: HashMap<Handle, Option<CellRange>> = HashMap::new();
        let mut removals: Vec<(usize, Handle)> = Vec::new();
        let mut reinsert: Vec<(Handle, CellRange)> = Vec::new();
        let mut moved_out: Vec<Handle> = Vec::new();

        for (index, bucket) in self.cells.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let cell = self.coord_of(index);

            for &handle in bucket {
                let range = match ranges.get(&handle).copied() {
                    Some(range) => range,
                    None => {
                        let range = arena.get(handle).map(|item| self.cell_range(item.aabb2d()));
                        ranges.insert(handle, range);

                        // First sighting: decide once whether it gained cells
                        match range {
                            Some(range) if range.is_empty() => moved_out.push(handle),
                            Some(range) if self.missing_from(handle, range) => {
                                reinsert.push((handle, range));
                            }
                            Some(_) => {}
                            None => trace!(%handle, "dropping dead handle from grid"),
                        }
                        range
                    }
                };

                if !range.is_some_and(|range| range.contains(cell)) {
                    removals.push((index, handle));
                }
            }
        }

        // Parked handles are in no bucket, so the scan never saw them
        let mut still_parked = Vec::with_capacity(self.parked.len());
        for &handle in &self.parked {
            if ranges.contains_key(&handle) {
                continue;
            }
            match arena.get(handle).map(|item| self.cell_range(item.aabb2d())) {
                Some(range) if range.is_empty() => still_parked.push(handle),
                Some(range) => reinsert.push((handle, range)),
                None => trace!(%handle, "dropping dead parked handle"),
            }
        }
        for handle in moved_out {
            if !still_parked.contains(&handle) {
                still_parked.push(handle);
            }
        }

        for &(index, handle) in &removals {
            remove_from(&mut self.cells[index], handle);
        }
        for &(handle, range) in &reinsert {
            self.insert_range(handle, range);
        }
        self.parked = still_parked;

        let summary = Recalculation {
            removed: removals.len(),
            inserted: reinsert.len(),
            parked: self.parked.len(),
        };
        if !summary.is_noop() {
            debug!(
                removed = summary.removed,
                inserted = summary.inserted,
                parked = summary.parked,
                "recalculated grid index"
            );
        }
        summary
    }

    /// Drop every membership and parked handle.
    pub fn clear(&mut self) {
        for bucket in &mut self.cells {
            bucket.clear();
        }
        self.parked.clear();
    }

    // ==================== Statistics ====================

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|bucket| !bucket.is_empty()).count()
    }

    /// Total handle-cell memberships.
    #[must_use]
    pub fn membership_count(&self) -> usize {
        self.cells.iter().map(SmallVec::len).sum()
    }

    /// Tracked handles currently outside every cell.
    #[must_use]
    pub fn parked(&self) -> &[Handle] {
        &self.parked
    }

    // ==================== Internals ====================

    fn insert_range(&mut self, handle: Handle, range: CellRange) -> usize {
        let mut count = 0;
        for cell in range.iter() {
            let index = self.index_of(cell);
            let bucket = &mut self.cells[index];
            if !bucket.contains(&handle) {
                bucket.push(handle);
            }
            count += 1;
        }
        count
    }

    fn missing_from(&self, handle: Handle, range: CellRange) -> bool {
        range
            .iter()
            .any(|cell| !self.cells[self.index_of(cell)].contains(&handle))
    }

    fn unpark(&mut self, handle: Handle) {
        self.parked.retain(|parked| *parked != handle);
    }

    fn bucket(&self, cell: CellCoord) -> Option<&Bucket> {
        if cell.i < self.width && cell.j < self.height {
            self.cells.get(self.index_of(cell))
        } else {
            None
        }
    }

    const fn index_of(&self, cell: CellCoord) -> usize {
        cell.i as usize + cell.j as usize * self.width as usize
    }

    const fn coord_of(&self, index: usize) -> CellCoord {
        let width = self.width as usize;
        CellCoord::new((index % width) as u32, (index / width) as u32)
    }
}

impl SpatialIndex for GridIndex2D {
    fn find_into(&self, query: &Query, out: &mut Vec<Neighbor>) -> GridResult<()> {
        query.validate()?;

        let mut push_cell = |cell: CellCoord| {
            if let Some(bucket) = self.bucket(cell) {
                out.extend(bucket.iter().map(|&handle| Neighbor { cell, handle }));
            }
        };

        match *query {
            Query::Point { x, y } => {
                if let Some(cell) = self.cell_at(x, y) {
                    push_cell(cell);
                }
            }
            Query::Rect(aabb) => self.cell_range(&aabb).iter().for_each(push_cell),
        }

        Ok(())
    }
}

/// Clamp a floored/ceiled cell coordinate into `[0, limit]`.
fn clip(value: f64, limit: u32) -> u32 {
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, f64::from(limit)) as u32
    }
}

fn remove_from(bucket: &mut Bucket, handle: Handle) -> bool {
    match bucket.iter().position(|stored| *stored == handle) {
        Some(position) => {
            bucket.remove(position);
            true
        }
        None => false,
    }
}
