use std::collections::VecDeque;

use grid_util::grid::{Grid, SimpleGrid};
use grid_util::point::Point;
use itertools::iproduct;
use log::{debug, trace};

use crate::{Cell, GridMap, NEUMANN_ORDER, UNREACHABLE};

/// Step counts from every cell near a target back to that target, as used by agents that
/// follow the gradient downhill instead of searching individually.
///
/// Only cells inside the square window `target ± radius` (clipped to the grid) are stored.
/// Within it, a cell is reached only if a walkable path of at most `radius` steps exists that
/// never leaves the window. Every other lookup reports [None].
#[derive(Clone, Debug)]
pub struct DistanceField {
    target: Point,
    radius: i32,
    /// Map coordinates of the window cell stored at `(0, 0)`.
    min: Point,
    distances: SimpleGrid<u32>,
    reached: usize,
}

impl DistanceField {
    fn empty(target: Point, radius: i32) -> DistanceField {
        DistanceField {
            target,
            radius,
            min: target,
            distances: SimpleGrid::new(0, 0, UNREACHABLE),
            reached: 0,
        }
    }

    /// Flood-fills outward from `target` for at most `radius` steps. A negative radius, a
    /// target outside the grid and a blocked target all give a field in which nothing is
    /// reachable.
    pub fn build<G: GridMap + ?Sized>(grid: &G, target: Cell, radius: i32) -> DistanceField {
        if radius < 0 {
            trace!("Negative radius {} for field around {}", radius, target);
            return DistanceField::empty(target, radius);
        }
        if !grid.in_bounds(target.x, target.y) || !grid.is_walkable(target.x, target.y) {
            trace!("Field target {} is outside the grid or blocked", target);
            return DistanceField::empty(target, radius);
        }

        let origin = grid.origin();
        let r = radius as i64;
        let min_x = (target.x as i64 - r).max(origin.x as i64);
        let min_y = (target.y as i64 - r).max(origin.y as i64);
        let max_x = (target.x as i64 + r).min(origin.x as i64 + grid.width() as i64 - 1);
        let max_y = (target.y as i64 + r).min(origin.y as i64 + grid.height() as i64 - 1);
        let width = (max_x - min_x + 1) as usize;
        let height = (max_y - min_y + 1) as usize;
        let min = Point::new(min_x as i32, min_y as i32);

        let mut distances = SimpleGrid::new(width, height, UNREACHABLE);
        let max_depth = radius as u32;
        let mut queue: VecDeque<Point> = VecDeque::new();
        let start = target - min;
        distances.set_point(start, 0);
        let mut reached = 1;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let next = distances.get_point(current) + 1;
            if next > max_depth {
                continue;
            }
            for (dx, dy) in NEUMANN_ORDER {
                let n = Point::new(current.x + dx, current.y + dy);
                if !distances.point_in_bounds(n) || distances.get_point(n) != UNREACHABLE {
                    continue;
                }
                let cell = n + min;
                if !grid.is_walkable(cell.x, cell.y) {
                    continue;
                }
                distances.set_point(n, next);
                reached += 1;
                queue.push_back(n);
            }
        }
        debug!(
            "Flooded {} cells around {} within radius {}",
            reached, target, radius
        );
        DistanceField {
            target,
            radius,
            min,
            distances,
            reached,
        }
    }

    /// The stored distance of `(x, y)`, including the [UNREACHABLE] sentinel.
    fn stored(&self, x: i32, y: i32) -> Option<u32> {
        let p = Point::new(x.checked_sub(self.min.x)?, y.checked_sub(self.min.y)?);
        self.distances
            .point_in_bounds(p)
            .then(|| self.distances.get_point(p))
    }

    /// Steps from `(x, y)` to the target, or [None] if the cell was not reached.
    pub fn distance_at(&self, x: i32, y: i32) -> Option<u32> {
        self.stored(x, y).filter(|&d| d != UNREACHABLE)
    }

    pub fn distance(&self, cell: &Cell) -> Option<u32> {
        self.distance_at(cell.x, cell.y)
    }

    pub fn target(&self) -> Cell {
        self.target
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Inclusive lower and upper corners of the stored window, if it is not empty.
    pub fn window(&self) -> Option<(Cell, Cell)> {
        let (width, height) = (self.distances.width(), self.distances.height());
        if width == 0 || height == 0 {
            return None;
        }
        let max = self.min + Point::new(width as i32 - 1, height as i32 - 1);
        Some((self.min, max))
    }

    /// Number of reached cells.
    pub fn len(&self) -> usize {
        self.reached
    }

    pub fn is_empty(&self) -> bool {
        self.reached == 0
    }

    /// All reached cells with their distances, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, u32)> + '_ {
        let (width, height) = (self.distances.width(), self.distances.height());
        iproduct!(0..height, 0..width).filter_map(move |(y, x)| {
            let d = self.distances.get(x, y);
            (d != UNREACHABLE).then(|| (self.min + Point::new(x as i32, y as i32), d))
        })
    }

    /// The first neighbour of `cell` (in +y, -y, +x, -x order) that is one step closer to the
    /// target. [None] at the target itself and for unreached cells.
    pub fn next_step(&self, cell: &Cell) -> Option<Cell> {
        let d = self.distance(cell)?;
        if d == 0 {
            return None;
        }
        NEUMANN_ORDER
            .iter()
            .map(|&(dx, dy)| Point::new(cell.x + dx, cell.y + dy))
            .find(|n| self.distance(n) == Some(d - 1))
    }

    /// Walks the gradient from `cell` down to the target. Both ends are included; the path is
    /// empty if `cell` was not reached.
    pub fn path_from(&self, cell: &Cell) -> Vec<Cell> {
        if self.distance(cell).is_none() {
            return Vec::new();
        }
        std::iter::successors(Some(*cell), |c| self.next_step(c)).collect()
    }
}
