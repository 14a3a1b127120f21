use crate::{GridMap, NEUMANN_ORDER, N_SMALLVEC_SIZE};
use grid_util::point::Point;
use smallvec::SmallVec;

pub mod astar;
pub mod distance_field;

/// The walkable 4-neighbours of `pos` in [NEUMANN_ORDER], paired with their linear ids.
pub(crate) fn walkable_neighbours<G: GridMap + ?Sized>(
    grid: &G,
    pos: &Point,
) -> SmallVec<[(Point, usize); N_SMALLVEC_SIZE]> {
    NEUMANN_ORDER
        .iter()
        .map(|&(dx, dy)| Point::new(pos.x + dx, pos.y + dy))
        .filter_map(|p| grid.linear_id(p.x, p.y).map(|id| (p, id)))
        .filter(|(p, _)| grid.is_walkable(p.x, p.y))
        .collect()
}
