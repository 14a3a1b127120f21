use grid_navigation::{GridMap, NavGrid, Navigator};
use grid_util::point::Point;
use grid_util::rect::Rect;

// In this example a path is found on a 7x5 grid with shape
// |      G|
// |  #####|
// |  #    |
// |  # ## |
// |S      |
// where
// - # marks an obstacle
// - S marks the start
// - G marks the goal
//
// Nodes have a 4-neighborhood
fn main() {
    let mut grid = NavGrid::new(7, 5, false);
    grid.set_rectangle(&Rect::new(2, 1, 1, 3), true);
    grid.set_rectangle(&Rect::new(3, 3, 4, 1), true);
    grid.set_rectangle(&Rect::new(4, 1, 2, 1), true);
    grid.generate_components();
    let mut navigator = Navigator::new(grid);
    let start = Point::new(0, 0);
    let goal = Point::new(6, 4);
    let path = navigator.find_path(start, goal);
    if path.is_empty() {
        println!("No path from {} to {}", start, goal);
        return;
    }
    let grid = navigator.grid();
    for y in (0..grid.height() as i32).rev() {
        let row: String = (0..grid.width() as i32)
            .map(|x| {
                let p = Point::new(x, y);
                if p == start {
                    'S'
                } else if p == goal {
                    'G'
                } else if grid.get(x, y) {
                    '#'
                } else if path.contains(&p) {
                    '*'
                } else {
                    ' '
                }
            })
            .collect();
        println!("|{}|", row);
    }
    println!("Path of {} steps:", path.len() - 1);
    for p in path {
        println!("{:?}", p);
    }
}
