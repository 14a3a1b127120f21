//! # grid_navigation
//!
//! Navigation primitives for agents moving on a uniform-cost, 4-connected grid. Two queries
//! are provided:
//!
//! - A bounded [DistanceField] (often called a "Dijkstra map") holding the number of
//!   orthogonal steps from every nearby cell to a shared target, so that many agents can walk
//!   down the gradient without searching individually.
//! - Single-pair [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search through a
//!   reusable [Workspace], which keeps its score tables between calls and invalidates them by
//!   advancing a stamp instead of clearing memory.
//!
//! Any type implementing [GridMap] can be searched. [NavGrid] is the crate's own dense grid,
//! which additionally tracks
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory)) so that
//! [Navigator] can reject unreachable goals without flood-filling the map.
pub mod nav_grid;
pub mod navigator;
pub mod queue;
pub mod solver;
pub mod workspace;

use grid_util::point::Point;

pub use crate::nav_grid::NavGrid;
pub use crate::navigator::Navigator;
pub use crate::queue::{PriorityQueue, ScoreLookup};
pub use crate::solver::distance_field::DistanceField;
pub use crate::workspace::Workspace;

/// A grid coordinate. Which corner is `(0, 0)` is up to the [GridMap] that the cell belongs to.
pub type Cell = Point;

/// Neighbour offsets in expansion order: +y, -y, +x, -x. Both the flood fill and A* visit
/// neighbours in exactly this order, which decides between equal-cost alternatives.
pub const NEUMANN_ORDER: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Inline capacity of neighbourhood buffers; a 4-grid never produces more.
pub const N_SMALLVEC_SIZE: usize = 4;

/// Sentinel stored in a [DistanceField] for cells that were not reached.
pub const UNREACHABLE: u32 = u32::MAX;

/// Number of distance fields a [Navigator] keeps before evicting the oldest.
pub const DEFAULT_FIELD_CACHE: usize = 16;

/// Read-only walkability oracle. Cells `origin().x <= x < origin().x + width()` (and likewise
/// for y) are in bounds; anything else is treated as a wall by every algorithm in this crate.
pub trait GridMap {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn is_walkable(&self, x: i32, y: i32) -> bool;

    /// The lowest in-bounds coordinate. Maps using 1-based coordinates return `(1, 1)`.
    fn origin(&self) -> Cell {
        Point::new(0, 0)
    }

    /// `(x, y)` relative to [origin](Self::origin), or [None] if the cell is off the map.
    fn local(&self, x: i32, y: i32) -> Option<Point> {
        let origin = self.origin();
        let p = Point::new(x.checked_sub(origin.x)?, y.checked_sub(origin.y)?);
        let on_map = p.x >= 0
            && p.y >= 0
            && (p.x as usize) < self.width()
            && (p.y as usize) < self.height();
        on_map.then_some(p)
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.local(x, y).is_some()
    }

    /// Linear id `(y - origin.y) * width + (x - origin.x)` of an in-bounds cell.
    fn linear_id(&self, x: i32, y: i32) -> Option<usize> {
        self.local(x, y)
            .map(|p| p.x as usize + p.y as usize * self.width())
    }

    /// Inverse of [linear_id](Self::linear_id).
    fn cell_of(&self, id: usize) -> Cell {
        let width = self.width().max(1);
        self.origin() + Point::new((id % width) as i32, (id / width) as i32)
    }
}

/// Number of orthogonal steps between two cells ignoring obstacles.
pub fn manhattan(p1: &Cell, p2: &Cell) -> u32 {
    p1.x.abs_diff(p2.x) + p1.y.abs_diff(p2.y)
}

/// Builds a [DistanceField] around `target`. See [DistanceField::build].
pub fn build_distance_field<G: GridMap + ?Sized>(
    grid: &G,
    target: Cell,
    radius: i32,
) -> DistanceField {
    DistanceField::build(grid, target, radius)
}

/// Computes a shortest path from `start` to `goal` with a throwaway [Workspace]. Callers
/// issuing many searches should keep a workspace around and use [Workspace::find_path].
pub fn find_path<G: GridMap + ?Sized>(grid: &G, start: Cell, goal: Cell) -> Vec<Cell> {
    Workspace::new().find_path(grid, start, goal)
}
