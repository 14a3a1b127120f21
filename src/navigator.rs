use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, info};

use crate::nav_grid::NavGrid;
use crate::solver::distance_field::DistanceField;
use crate::workspace::Workspace;
use crate::{Cell, GridMap, DEFAULT_FIELD_CACHE};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Owns a [NavGrid] together with everything needed to query it repeatedly: a [Workspace] for
/// path searches and a bounded cache of [DistanceField]s keyed by target and radius, so that
/// agents sharing a target share one field.
///
/// Editing the grid through [set](Self::set) drops every cached field.
#[derive(Clone, Debug)]
pub struct Navigator {
    grid: NavGrid,
    workspace: Workspace,
    fields: FxIndexMap<(Point, i32), DistanceField>,
    field_capacity: usize,
}

impl Navigator {
    pub fn new(grid: NavGrid) -> Navigator {
        let cells = grid.width() * grid.height();
        Navigator {
            grid,
            workspace: Workspace::with_capacity(cells),
            fields: FxIndexMap::default(),
            field_capacity: DEFAULT_FIELD_CACHE,
        }
    }

    /// Limits the number of cached distance fields. At least one field is always kept.
    pub fn with_field_capacity(mut self, capacity: usize) -> Navigator {
        self.field_capacity = capacity.max(1);
        self.evict();
        self
    }

    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Number of distance fields currently cached.
    pub fn cached_fields(&self) -> usize {
        self.fields.len()
    }

    /// Blocks or frees a cell and invalidates cached fields.
    pub fn set(&mut self, x: i32, y: i32, blocked: bool) {
        if self.grid.get(x, y) != blocked {
            self.fields.clear();
        }
        self.grid.set(x, y, blocked);
    }

    /// Regenerates the grid's components if blocking cells has made them stale.
    pub fn update(&mut self) {
        self.grid.update();
    }

    /// Shortest path from `start` to `goal`, both included, or an empty path. Goals on another
    /// component than the start are rejected without searching.
    pub fn find_path(&mut self, start: Cell, goal: Cell) -> Vec<Cell> {
        self.grid.update();
        if start != goal && self.grid.unreachable(&start, &goal) {
            info!("{} is not reachable from {}", goal, start);
            return Vec::new();
        }
        self.workspace.find_path(&self.grid, start, goal)
    }

    /// The distance field around `target`, built on first use and cached afterwards.
    pub fn distance_field(&mut self, target: Cell, radius: i32) -> &DistanceField {
        let key = (target, radius);
        if !self.fields.contains_key(&key) {
            debug!("Building field for {} with radius {}", target, radius);
            let field = DistanceField::build(&self.grid, target, radius);
            self.fields.insert(key, field);
            self.evict();
        }
        &self.fields[&key]
    }

    /// Drops the oldest fields until the cache fits its capacity.
    fn evict(&mut self) {
        while self.fields.len() > self.field_capacity {
            if let Some(((target, radius), _)) = self.fields.shift_remove_index(0) {
                debug!("Evicting field for {} with radius {}", target, radius);
            }
        }
    }
}
