use grid_navigation::{DistanceField, GridMap, NavGrid, Workspace};
use grid_util::point::Point;
use std::time::{Duration, Instant};

// Times repeated path searches and field builds on a maze-like grid. For statistically sound
// numbers use `cargo bench` instead.
const SIZE: usize = 256;
const ROUNDS: u32 = 200;

fn maze() -> NavGrid {
    let mut grid = NavGrid::new(SIZE, SIZE, false);
    // Vertical walls every 8 columns, each with a single gap alternating top and bottom.
    for x in (4..SIZE as i32).step_by(8) {
        let gap = if (x / 8) % 2 == 0 { SIZE as i32 - 1 } else { 0 };
        for y in 0..SIZE as i32 {
            if y != gap {
                grid.set(x, y, true);
            }
        }
    }
    grid.generate_components();
    grid
}

fn main() {
    let grid = maze();
    let start = Point::new(0, 0);
    let goal = Point::new(SIZE as i32 - 1, SIZE as i32 - 1);
    let mut workspace = Workspace::with_capacity(grid.width() * grid.height());

    let mut total_time = Duration::ZERO;
    let before = Instant::now();
    let mut length = 0;
    for _ in 0..ROUNDS {
        length = workspace.find_path(&grid, start, goal).len();
    }
    let elapsed = before.elapsed();
    total_time += elapsed;
    println!(
        "Path of {} cells, {} nodes expanded",
        length,
        workspace.last_expanded()
    );
    println!(
        "\tElapsed time: {:.2?}; per search: {:.2?}",
        elapsed,
        elapsed / ROUNDS
    );

    let before = Instant::now();
    let mut reached = 0;
    for _ in 0..ROUNDS {
        reached = DistanceField::build(&grid, Point::new(128, 128), 40).len();
    }
    let elapsed = before.elapsed();
    total_time += elapsed;
    println!("Field reaching {} cells", reached);
    println!(
        "\tElapsed time: {:.2?}; per field: {:.2?}",
        elapsed,
        elapsed / ROUNDS
    );
    println!("\tTotal benchmark time: {:.2?}", total_time);
}
