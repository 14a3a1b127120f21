use grid_navigation::{build_distance_field, GridMap, NavGrid};
use grid_util::point::Point;
use grid_util::rect::Rect;

// In this example a distance field of radius 5 is flooded on an 11x11 grid using 1-based
// coordinates, once on an open grid and once with a wall at x = 6 that cuts the field in half.
// Each cell prints its distance to the target modulo 10; '#' marks walls and '.' marks cells
// that were not reached.
fn render(grid: &NavGrid, target: Point, radius: i32) {
    let field = build_distance_field(grid, target, radius);
    let origin = grid.origin();
    for y in (origin.y..origin.y + grid.height() as i32).rev() {
        let row: String = (origin.x..origin.x + grid.width() as i32)
            .map(|x| {
                if grid.get(x, y) {
                    '#'
                } else {
                    match field.distance_at(x, y) {
                        Some(d) => char::from_digit(d % 10, 10).unwrap_or('?'),
                        None => '.',
                    }
                }
            })
            .collect();
        println!("{}", row);
    }
    println!("{} cells reached\n", field.len());
}

fn main() {
    let mut grid = NavGrid::with_origin(Point::new(1, 1), 11, 11, false);
    println!("Open grid, target (6, 6):");
    render(&grid, Point::new(6, 6), 5);

    grid.set_rectangle(&Rect::new(6, 1, 1, 11), true);
    println!("Wall at x = 6, target (11, 6):");
    render(&grid, Point::new(11, 6), 5);
}
