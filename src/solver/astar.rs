use grid_util::point::Point;
use log::{debug, trace};

use crate::solver::walkable_neighbours;
use crate::workspace::Workspace;
use crate::{manhattan, Cell, GridMap};

impl Workspace {
    /// Computes a shortest 4-connected path from `start` to `goal`, both included. Returns an
    /// empty path when the endpoints coincide, when either endpoint is out of bounds or not
    /// walkable, and when the goal cannot be reached.
    ///
    /// The heuristic is the Manhattan distance, which is consistent on a unit-cost 4-grid, so
    /// the goal's score is final the first time it is popped and closed nodes never reopen.
    /// Improved routes are pushed again instead of being re-keyed in place; entries for nodes
    /// that were closed in the meantime are skipped when popped.
    pub fn find_path<G: GridMap + ?Sized>(
        &mut self,
        grid: &G,
        start: Cell,
        goal: Cell,
    ) -> Vec<Cell> {
        if start == goal {
            trace!("Start and goal are both {}, nothing to search", start);
            return Vec::new();
        }
        let (start_id, goal_id) = match (
            grid.linear_id(start.x, start.y),
            grid.linear_id(goal.x, goal.y),
        ) {
            (Some(s), Some(g)) => (s, g),
            _ => {
                trace!("{} or {} lies outside the grid", start, goal);
                return Vec::new();
            }
        };
        if !grid.is_walkable(start.x, start.y) || !grid.is_walkable(goal.x, goal.y) {
            trace!("{} or {} is not walkable", start, goal);
            return Vec::new();
        }

        self.ensure_capacity(grid.width() * grid.height());
        let stamp = self.advance_stamp();
        debug!("Searching path from {} to {} (stamp {})", start, goal, stamp);

        self.nodes.open(start_id, 0, manhattan(&start, &goal), usize::MAX);
        self.queue.push(start_id, &self.nodes);

        while let Some(current) = self.queue.pop(&self.nodes) {
            // A cheaper copy of this id was already expanded.
            if self.nodes.is_closed(current) {
                continue;
            }
            if current == goal_id {
                let path = self.reconstruct(grid, goal_id);
                debug!(
                    "Found path of {} cells after expanding {} nodes",
                    path.len(),
                    self.expanded
                );
                return path;
            }
            self.nodes.close(current);
            self.expanded += 1;

            let pos = grid.cell_of(current);
            let tentative = self.nodes.g_score[current] + 1;
            for (neighbour, id) in walkable_neighbours(grid, &pos) {
                if self.nodes.is_closed(id) {
                    continue;
                }
                if self.nodes.is_open(id) && tentative >= self.nodes.g_score[id] {
                    continue;
                }
                let h = manhattan(&neighbour, &goal);
                self.nodes.open(id, tentative, h, current);
                self.queue.push(id, &self.nodes);
            }
        }
        debug!(
            "No path from {} to {}, expanded {} nodes",
            start, goal, self.expanded
        );
        Vec::new()
    }

    fn reconstruct<G: GridMap + ?Sized>(&self, grid: &G, goal_id: usize) -> Vec<Point> {
        let parents = &self.nodes.parent;
        let mut path: Vec<Point> = std::iter::successors(Some(goal_id), |&id| {
            Some(parents[id]).filter(|&parent| parent != usize::MAX)
        })
        .map(|id| grid.cell_of(id))
        .collect();
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use grid_util::point::Point;
    use grid_util::rect::Rect;

    use crate::nav_grid::NavGrid;
    use crate::workspace::Workspace;

    fn is_connected(path: &[Point]) -> bool {
        path.windows(2)
            .all(|w| (w[0].x - w[1].x).abs() + (w[0].y - w[1].y).abs() == 1)
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let grid = NavGrid::new(1, 1, false);
        let mut workspace = Workspace::new();
        let start = Point::new(0, 0);
        assert!(workspace.find_path(&grid, start, start).is_empty());
    }

    /// Asserts that the optimal 4 step solution is found.
    #[test]
    fn solve_simple_problem() {
        // |S  |
        // | # |
        // |  G|
        let mut grid = NavGrid::new(3, 3, false);
        grid.set(1, 1, true);
        let mut workspace = Workspace::new();
        let path = workspace.find_path(&grid, Point::new(0, 0), Point::new(2, 2));
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Point::new(0, 0));
        assert_eq!(path[4], Point::new(2, 2));
        assert!(is_connected(&path));
        assert!(!path.contains(&Point::new(1, 1)));
    }

    #[test]
    fn test_complex() {
        let mut grid = NavGrid::new(10, 10, false);
        grid.set_rectangle(&Rect::new(1, 1, 1, 1), true);
        grid.set_rectangle(&Rect::new(5, 0, 1, 1), true);
        grid.set_rectangle(&Rect::new(0, 5, 1, 1), true);
        grid.set_rectangle(&Rect::new(8, 8, 1, 1), true);
        let mut workspace = Workspace::new();
        let path = workspace.find_path(&grid, Point::new(0, 0), Point::new(7, 7));
        assert_eq!(path.len(), 15);
        assert!(is_connected(&path));
    }

    /// Equal-cost alternatives are resolved by the +y, -y, +x, -x expansion order.
    #[test]
    fn ties_follow_expansion_order() {
        let grid = NavGrid::new(2, 2, false);
        let mut workspace = Workspace::new();
        let path = workspace.find_path(&grid, Point::new(0, 0), Point::new(1, 1));
        assert_eq!(
            path,
            vec![Point::new(0, 0), Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn diagonal_gap_is_not_passable() {
        //  __
        // | #|
        // |# |
        //  __
        let mut grid = NavGrid::new(2, 2, false);
        grid.set(1, 0, true);
        grid.set(0, 1, true);
        let mut workspace = Workspace::new();
        assert!(workspace
            .find_path(&grid, Point::new(0, 0), Point::new(1, 1))
            .is_empty());
        // Only the start was ever expanded before the queue ran dry.
        assert_eq!(workspace.last_expanded(), 1);
    }

    #[test]
    fn guards_return_empty_paths() {
        let mut grid = NavGrid::new(4, 4, false);
        grid.set(3, 3, true);
        let mut workspace = Workspace::new();
        let origin = Point::new(0, 0);
        assert!(workspace.find_path(&grid, origin, Point::new(4, 0)).is_empty());
        assert!(workspace.find_path(&grid, Point::new(-1, 0), origin).is_empty());
        assert!(workspace.find_path(&grid, origin, Point::new(3, 3)).is_empty());
        assert!(workspace.find_path(&grid, Point::new(3, 3), origin).is_empty());
        let empty = NavGrid::new(0, 0, false);
        assert!(workspace.find_path(&empty, origin, Point::new(1, 1)).is_empty());
        // None of the guards start a search.
        assert_eq!(workspace.stamp(), 0);
    }

    #[test]
    fn workspace_is_reused_across_grid_sizes() {
        let mut workspace = Workspace::new();
        let large = NavGrid::new(12, 9, false);
        let small = NavGrid::new(3, 5, false);
        let first = workspace.find_path(&large, Point::new(0, 0), Point::new(11, 8));
        assert_eq!(first.len(), 20);
        assert_eq!(workspace.capacity(), 108);
        let second = workspace.find_path(&small, Point::new(2, 4), Point::new(0, 0));
        assert_eq!(second.len(), 7);
        assert!(is_connected(&second));
        assert_eq!(workspace.capacity(), 108);
        let again = workspace.find_path(&large, Point::new(0, 0), Point::new(11, 8));
        assert_eq!(first, again);
        assert_eq!(workspace.stamp(), 3);
    }

    #[test]
    fn detour_around_wall() {
        // |S#  |
        // | # #|
        // |   G|
        let mut grid = NavGrid::new(4, 3, false);
        grid.set(1, 0, true);
        grid.set(1, 1, true);
        grid.set(3, 1, true);
        let path = crate::find_path(&grid, Point::new(0, 0), Point::new(3, 2));
        assert_eq!(path.len(), 6);
        assert!(is_connected(&path));
    }
}
