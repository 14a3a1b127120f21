use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use grid_util::rect::Rect;
use log::info;
use petgraph::unionfind::UnionFind;

use crate::{Cell, GridMap, NEUMANN_ORDER};

/// [NavGrid] stores whether each cell is blocked ([true]) or free ([false]) in a [BoolGrid] and
/// keeps the 4-connected components of the free cells in a [UnionFind] structure, so that
/// reachability can be answered without searching. Implements [GridMap].
///
/// The [BoolGrid] is indexed from `(0, 0)`; map coordinates are shifted by the origin before
/// they reach it.
#[derive(Clone, Debug)]
pub struct NavGrid {
    pub grid: BoolGrid,
    origin: Point,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for NavGrid {
    fn default() -> NavGrid {
        NavGrid::new(0, 0, false)
    }
}

impl NavGrid {
    /// Creates a grid whose lowest cell is `(0, 0)`, with every cell set to `blocked`.
    pub fn new(width: usize, height: usize, blocked: bool) -> NavGrid {
        NavGrid::with_origin(Point::new(0, 0), width, height, blocked)
    }

    /// Creates a grid whose lowest cell is `origin`, e.g. `(1, 1)` for 1-based coordinates.
    pub fn with_origin(origin: Point, width: usize, height: usize, blocked: bool) -> NavGrid {
        let mut grid = NavGrid {
            grid: BoolGrid::new(width, height, blocked),
            origin,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    fn local_or_panic(&self, x: i32, y: i32) -> Point {
        match self.local(x, y) {
            Some(p) => p,
            None => panic!(
                "({x}, {y}) is outside the {}x{} grid at {}",
                self.grid.width(),
                self.grid.height(),
                self.origin
            ),
        }
    }

    /// Whether `(x, y)` is blocked. Cells outside the grid count as blocked.
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.local(x, y).map_or(true, |p| self.grid.get_point(p))
    }

    pub fn get_cell(&self, cell: Cell) -> bool {
        self.get(cell.x, cell.y)
    }

    /// Updates a position on the grid. Joins newly connected components and flags the components
    /// as dirty if components are (potentially) broken apart into multiple.
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: i32, y: i32, blocked: bool) {
        let p = self.local_or_panic(x, y);
        let ix = self.grid.get_ix_point(&p);
        if blocked {
            if !self.grid.get_point(p) {
                self.components_dirty = true;
            }
        } else {
            for (dx, dy) in NEUMANN_ORDER {
                let n = Point::new(p.x + dx, p.y + dy);
                if self.grid.point_in_bounds(n) && !self.grid.get_point(n) {
                    self.components.union(ix, self.grid.get_ix_point(&n));
                }
            }
        }
        self.grid.set_point(p, blocked);
    }

    pub fn set_cell(&mut self, cell: Cell, blocked: bool) {
        self.set(cell.x, cell.y, blocked);
    }

    /// Sets every cell of `rect`, given in map coordinates. Blocking marks the components as
    /// dirty; freeing regenerates them.
    ///
    /// Panics if `rect` does not fit inside the grid.
    pub fn set_rectangle(&mut self, rect: &Rect, blocked: bool) {
        if rect.x1 >= rect.x2 || rect.y1 >= rect.y2 {
            return;
        }
        let local = Rect {
            x1: rect.x1 - self.origin.x,
            x2: rect.x2 - self.origin.x,
            y1: rect.y1 - self.origin.y,
            y2: rect.y2 - self.origin.y,
        };
        if local.x1 < 0
            || local.y1 < 0
            || local.x2 as usize > self.grid.width()
            || local.y2 as usize > self.grid.height()
        {
            panic!(
                "{rect:?} is outside the {}x{} grid at {}",
                self.grid.width(),
                self.grid.height(),
                self.origin
            );
        }
        self.grid.set_rectangle(&local, blocked);
        if blocked {
            self.components_dirty = true;
        } else {
            self.generate_components();
        }
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.linear_id(point.x, point.y)
            .map(|ix| self.components.find(ix))
    }

    /// Checks if start and goal are free and on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component. Only exact after
    /// [update](Self::update) when cells have been blocked since the last regeneration;
    /// until then it may report a stale connection but never a false separation.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        match (self.local(start.x, start.y), self.local(goal.x, goal.y)) {
            (Some(start), Some(goal)) => {
                self.grid.get_point(start)
                    || self.grid.get_point(goal)
                    || !self.components.equiv(
                        self.grid.get_ix_point(&start),
                        self.grid.get_ix_point(&goal),
                    )
            }
            _ => true,
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up grid neighbours to the same components.
    pub fn generate_components(&mut self) {
        let (w, h) = (self.grid.width(), self.grid.height());
        info!("Generating connected components for {}x{} grid", w, h);
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        for y in 0..h {
            for x in 0..w {
                if self.grid.get(x, y) {
                    continue;
                }
                let ix = self.grid.get_ix(x, y);
                for (nx, ny) in [(x + 1, y), (x, y + 1)] {
                    if self.grid.index_in_bounds(nx, ny) && !self.grid.get(nx, ny) {
                        self.components.union(ix, self.grid.get_ix(nx, ny));
                    }
                }
            }
        }
    }
}

impl GridMap for NavGrid {
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
    fn is_walkable(&self, x: i32, y: i32) -> bool {
        !self.get(x, y)
    }
    fn origin(&self) -> Cell {
        self.origin
    }
    fn local(&self, x: i32, y: i32) -> Option<Point> {
        let p = Point::new(
            x.checked_sub(self.origin.x)?,
            y.checked_sub(self.origin.y)?,
        );
        self.grid.point_in_bounds(p).then_some(p)
    }
    fn linear_id(&self, x: i32, y: i32) -> Option<usize> {
        self.local(x, y).map(|p| self.grid.get_ix_point(&p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // Corresponds to the following 3x2 grid:
        //  ___
        // | # |
        // | # |
        //  ___
        let mut grid = NavGrid::new(3, 2, false);
        grid.set(1, 0, true);
        grid.set(1, 1, true);
        grid.generate_components();
        let p1 = Point::new(0, 0);
        let p2 = Point::new(1, 1);
        let p3 = Point::new(0, 1);
        let p4 = Point::new(2, 0);
        assert!(grid.unreachable(&p1, &p2));
        assert!(grid.reachable(&p1, &p3));
        assert!(grid.unreachable(&p1, &p4));
        assert_eq!(grid.get_component(&p1), grid.get_component(&p3));
        assert_ne!(grid.get_component(&p1), grid.get_component(&p4));
    }

    /// Asserts that the two corners are connected on a 4-grid.
    #[test]
    fn reachable_around_obstacle() {
        // |S  |
        // | # |
        // |  G|
        //  ___
        let mut grid = NavGrid::new(3, 3, false);
        grid.set(1, 1, true);
        grid.update();
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(2, 2)));
    }

    #[test]
    fn diagonal_contact_does_not_connect() {
        //  ___
        // | #|
        // |# |
        //  __
        let mut grid = NavGrid::new(2, 2, true);
        grid.set(0, 0, false);
        grid.set(1, 1, false);
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(1, 1)));
        assert!(!grid.components_dirty);
    }

    #[test]
    fn opening_a_cell_joins_components() {
        let mut grid = NavGrid::new(3, 1, false);
        grid.set(1, 0, true);
        grid.update();
        let (left, right) = (Point::new(0, 0), Point::new(2, 0));
        assert!(grid.unreachable(&left, &right));
        grid.set(1, 0, false);
        assert!(!grid.components_dirty);
        assert!(grid.reachable(&left, &right));
    }

    #[test]
    fn blocking_marks_components_dirty() {
        let mut grid = NavGrid::new(3, 1, false);
        grid.set(1, 0, true);
        assert!(grid.components_dirty);
        grid.update();
        assert!(!grid.components_dirty);
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(2, 0)));
    }

    #[test]
    fn origin_shifts_bounds() {
        let mut grid = NavGrid::with_origin(Point::new(1, 1), 3, 3, false);
        grid.set(3, 3, true);
        assert!(grid.get(0, 0));
        assert!(!grid.get(1, 1));
        assert!(grid.get(3, 3));
        assert!(grid.get(4, 1));
        assert!(grid.is_walkable(2, 3));
        assert_eq!(grid.linear_id(3, 3), Some(8));
        assert!(grid.unreachable(&Point::new(0, 1), &Point::new(1, 1)));
    }

    #[test]
    fn cells_are_stored_relative_to_the_origin() {
        let mut grid = NavGrid::with_origin(Point::new(-2, 3), 4, 2, false);
        grid.set(-1, 4, true);
        assert!(grid.grid.get(1, 1));
        assert_eq!(grid.grid.values.len(), 1);
        assert_eq!(grid.linear_id(-1, 4), Some(grid.grid.get_ix(1, 1)));
        assert_eq!(grid.cell_of(5), Point::new(-1, 4));
        assert!(!grid.is_walkable(i32::MIN, i32::MAX));
    }

    #[test]
    fn rectangles_follow_the_origin() {
        //  _____
        // |  #  |
        // |  #  |
        // |  #  |
        //  _____
        let mut grid = NavGrid::with_origin(Point::new(1, 1), 5, 3, false);
        let (left, right) = (Point::new(1, 1), Point::new(5, 3));
        grid.set_rectangle(&Rect::new(3, 1, 1, 3), true);
        assert!(grid.components_dirty);
        assert!((1..=3).all(|y| grid.get(3, y)));
        assert!(!grid.get(2, 2) && !grid.get(4, 2));
        grid.update();
        assert!(grid.unreachable(&left, &right));

        grid.set_rectangle(&Rect::new(3, 2, 1, 1), false);
        assert!(!grid.components_dirty);
        assert!(grid.reachable(&left, &right));
    }

    #[test]
    fn empty_rectangle_changes_nothing() {
        let mut grid = NavGrid::new(2, 2, false);
        grid.set_rectangle(&Rect::new(5, 5, 0, 3), true);
        assert!(!grid.components_dirty);
    }

    #[test]
    #[should_panic(expected = "outside the 3x3 grid")]
    fn rectangle_past_the_edge_panics() {
        let mut grid = NavGrid::with_origin(Point::new(1, 1), 3, 3, false);
        grid.set_rectangle(&Rect::new(0, 1, 2, 2), true);
    }

    #[test]
    #[should_panic(expected = "outside the 2x2 grid")]
    fn setting_outside_panics() {
        let mut grid = NavGrid::new(2, 2, false);
        grid.set(2, 0, true);
    }
}
