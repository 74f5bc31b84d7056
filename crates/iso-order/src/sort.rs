//! Depth-first topological sort over the implicit occlusion graph.

use hashbrown::HashMap;
use iso_geom::{Aabb3, Spatial2D, Spatial3D, hex_bounds};
use iso_spatial::{Arena, Handle, Neighbor, Query, SpatialIndex};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{OrderError, OrderResult, is_behind};

/// What to do with an edge that leads back into a node still being placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Ignore the edge and keep going. The resulting order may be visually
    /// wrong for the boxes involved but is always complete.
    #[default]
    DropEdge,
    /// Abort with [`OrderError::Cycle`].
    Fail,
}

/// Knobs for [`topological_sort`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SortOptions {
    pub cycle_policy: CyclePolicy,
    /// Only infer an edge when the two boxes' hexagon silhouettes overlap,
    /// i.e. when one can actually cover the other on screen.
    pub require_hex_overlap: bool,
}

/// Output of [`topological_sort`], back to front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawOrder {
    pub order: Vec<Handle>,
    /// Edges ignored under [`CyclePolicy::DropEdge`].
    pub dropped_edges: usize,
}

impl DrawOrder {
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn position(&self, handle: Handle) -> Option<usize> {
        self.order.iter().position(|&placed| placed == handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.order.iter().copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// One node on the explicit DFS stack.
struct Frame {
    handle: Handle,
    /// Neighbours that must be drawn before `handle`.
    behind: SmallVec<[Handle; 8]>,
    next: usize,
}

/// Order `entities` so every box is drawn after the neighbours behind it.
///
/// Neighbours are found by querying `index` with each entity's 2D box;
/// handles the index returns that are not in `entities` are ignored. Every
/// entity appears exactly once in the result, in the order of `entities`
/// wherever no edge constrains it.
pub fn topological_sort<T, I>(
    arena: &Arena<T>,
    index: &I,
    entities: impl IntoIterator<Item = Handle>,
    options: SortOptions,
) -> OrderResult<DrawOrder>
where
    T: Spatial2D + Spatial3D,
    I: SpatialIndex + ?Sized,
{
    let mut nodes = Vec::new();
    let mut state = HashMap::new();
    for handle in entities {
        if !arena.contains(handle) {
            return Err(OrderError::StaleHandle(handle));
        }
        if state.insert(handle, Visit::Unvisited).is_none() {
            nodes.push(handle);
        }
    }

    let mut sorter = Sorter {
        arena,
        index,
        options,
        state,
        hits: Vec::new(),
        order: Vec::with_capacity(nodes.len()),
        dropped_edges: 0,
    };

    for &root in &nodes {
        if sorter.state.get(&root) == Some(&Visit::Unvisited) {
            sorter.visit(root)?;
        }
    }

    if sorter.dropped_edges > 0 {
        debug!(
            nodes = nodes.len(),
            dropped = sorter.dropped_edges,
            "draw order contains cycles"
        );
    }

    Ok(DrawOrder {
        order: sorter.order,
        dropped_edges: sorter.dropped_edges,
    })
}

struct Sorter<'a, T, I: ?Sized> {
    arena: &'a Arena<T>,
    index: &'a I,
    options: SortOptions,
    state: HashMap<Handle, Visit>,
    /// Scratch buffer for neighbour queries.
    hits: Vec<Neighbor>,
    order: Vec<Handle>,
    dropped_edges: usize,
}

impl<T, I> Sorter<'_, T, I>
where
    T: Spatial2D + Spatial3D,
    I: SpatialIndex + ?Sized,
{
    fn visit(&mut self, root: Handle) -> OrderResult<()> {
        let mut stack = vec![self.open(root)?];

        while let Some(frame) = stack.last_mut() {
            let current = frame.handle;

            if let Some(&next) = frame.behind.get(frame.next) {
                frame.next += 1;

                match self.state.get(&next).copied() {
                    Some(Visit::Unvisited) => {
                        let child = self.open(next)?;
                        stack.push(child);
                    }
                    Some(Visit::InProgress) => self.close_cycle(next, current)?,
                    Some(Visit::Done) | None => {}
                }
            } else {
                stack.pop();
                self.state.insert(current, Visit::Done);
                self.order.push(current);
            }
        }

        Ok(())
    }

    /// Mark `handle` in progress and collect the neighbours behind it.
    fn open(&mut self, handle: Handle) -> OrderResult<Frame> {
        let item = self
            .arena
            .get(handle)
            .ok_or(OrderError::StaleHandle(handle))?;
        let aabb3d = *item.aabb3d();

        self.hits.clear();
        self.index
            .find_into(&Query::Rect(*item.aabb2d()), &mut self.hits)?;

        let origin = (0.0, 0.0, 0.0);
        let hexagon = self
            .options
            .require_hex_overlap
            .then(|| hex_bounds(&aabb3d, origin));

        let mut behind = SmallVec::new();
        for hit in &self.hits {
            let other = hit.handle;
            if other == handle || behind.contains(&other) || !self.state.contains_key(&other) {
                continue;
            }
            let Some(neighbor) = self.arena.get(other) else {
                continue;
            };
            let other_aabb3d: &Aabb3 = neighbor.aabb3d();

            if !is_behind(other_aabb3d, &aabb3d) {
                continue;
            }
            if hexagon.is_some_and(|hexagon| !hex_bounds(other_aabb3d, origin).overlaps(&hexagon)) {
                continue;
            }
            behind.push(other);
        }

        self.state.insert(handle, Visit::InProgress);
        Ok(Frame {
            handle,
            behind,
            next: 0,
        })
    }

    /// `from` must precede `to` but is itself still waiting on `to`.
    fn close_cycle(&mut self, from: Handle, to: Handle) -> OrderResult<()> {
        match self.options.cycle_policy {
            CyclePolicy::DropEdge => {
                trace!(%from, %to, "dropping cyclic draw order edge");
                self.dropped_edges += 1;
                Ok(())
            }
            CyclePolicy::Fail => Err(OrderError::Cycle { from, to }),
        }
    }
}

#[cfg(test)]
mod tests {
    use iso_geom::{Aabb2, Aabb3};
    use iso_spatial::GridIndex2D;

    use super::*;

    /// Minimal drawable: screen box plus world box.
    struct Body {
        aabb2d: Aabb2,
        aabb3d: Aabb3,
    }

    impl Spatial2D for Body {
        fn aabb2d(&self) -> &Aabb2 {
            &self.aabb2d
        }
    }

    impl Spatial3D for Body {
        fn aabb3d(&self) -> &Aabb3 {
            &self.aabb3d
        }
    }

    /// All bodies share one screen box so every pair is adjacent.
    fn scene(boxes: &[Aabb3]) -> (Arena<Body>, GridIndex2D, Vec<Handle>) {
        let mut arena = Arena::new();
        let mut grid = GridIndex2D::new((0.0, 0.0), (4, 4), (32.0, 32.0)).unwrap();
        let handles: Vec<_> = boxes
            .iter()
            .map(|&aabb3d| {
                arena.insert(Body {
                    aabb2d: Aabb2::new(0.0, 0.0, 16.0, 16.0),
                    aabb3d,
                })
            })
            .collect();
        for &handle in &handles {
            grid.insert(&arena, handle).unwrap();
        }
        (arena, grid, handles)
    }

    #[test]
    fn test_row_sorts_back_to_front() {
        let (arena, grid, handles) = scene(&[
            Aabb3::new(2.0, 0.0, 0.0, 1.0, 1.0, 1.0),
            Aabb3::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0),
            Aabb3::new(1.0, 0.0, 0.0, 1.0, 1.0, 1.0),
        ]);

        let order = topological_sort(&arena, &grid, handles.clone(), SortOptions::default()).unwrap();
        assert_eq!(order.order, vec![handles[1], handles[2], handles[0]]);
        assert_eq!(order.dropped_edges, 0);
    }

    #[test]
    fn test_unrelated_entities_keep_input_order() {
        // Fully overlapping boxes have no depth relation
        let (arena, grid, handles) = scene(&[
            Aabb3::new(0.0, 0.0, 0.0, 2.0, 2.0, 2.0),
            Aabb3::new(0.5, 0.5, 0.5, 1.0, 1.0, 1.0),
        ]);

        let order = topological_sort(&arena, &grid, handles.clone(), SortOptions::default()).unwrap();
        assert_eq!(order.order, handles);
    }

    #[test]
    fn test_handles_outside_entity_set_are_ignored() {
        let (arena, grid, handles) = scene(&[
            Aabb3::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0),
            Aabb3::new(1.0, 0.0, 0.0, 1.0, 1.0, 1.0),
        ]);

        let order = topological_sort(&arena, &grid, [handles[1]], SortOptions::default()).unwrap();
        assert_eq!(order.order, vec![handles[1]]);
    }

    #[test]
    fn test_duplicate_entities_placed_once() {
        let (arena, grid, handles) = scene(&[Aabb3::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)]);
        let order = topological_sort(
            &arena,
            &grid,
            [handles[0], handles[0]],
            SortOptions::default(),
        )
        .unwrap();
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_stale_entity_is_an_error() {
        let (mut arena, grid, handles) = scene(&[Aabb3::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)]);
        arena.remove(handles[0]);

        let result = topological_sort(&arena, &grid, handles.clone(), SortOptions::default());
        assert!(matches!(result, Err(OrderError::StaleHandle(h)) if h == handles[0]));
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        const LEN: u32 = 10_000;

        // Each body shares a cell only with its immediate neighbours, so the
        // occlusion graph is a single chain `0 -> 1 -> ... -> LEN - 1`
        let mut arena = Arena::new();
        let mut grid = GridIndex2D::new((0.0, 0.0), (LEN + 1, 1), (1.0, 1.0)).unwrap();
        let handles: Vec<_> = (0..LEN)
            .map(|n| {
                let x = n as f32;
                arena.insert(Body {
                    aabb2d: Aabb2::new(x, 0.0, 1.5, 0.5),
                    aabb3d: Aabb3::new(x, 0.0, 0.0, 1.0, 1.0, 1.0),
                })
            })
            .collect();
        for &handle in &handles {
            grid.insert(&arena, handle).unwrap();
        }

        // Front-most first walks the whole chain from a single root
        let order = topological_sort(
            &arena,
            &grid,
            handles.iter().rev().copied(),
            SortOptions::default(),
        )
        .unwrap();
        assert_eq!(order.order, handles);
    }

    #[test]
    fn test_hex_filter_drops_distant_edges() {
        let (arena, grid, handles) = scene(&[
            Aabb3::new(2.0, 0.0, 0.0, 1.0, 1.0, 1.0),
            Aabb3::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0),
        ]);

        let options = SortOptions {
            require_hex_overlap: true,
            ..SortOptions::default()
        };
        // Two tiles apart the hexagons do not overlap, so input order stands
        let order = topological_sort(&arena, &grid, handles.clone(), options).unwrap();
        assert_eq!(order.order, handles);

        let order = topological_sort(&arena, &grid, handles.clone(), SortOptions::default()).unwrap();
        assert_eq!(order.order, vec![handles[1], handles[0]]);
    }
}
