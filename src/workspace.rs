use log::warn;

use crate::queue::{PriorityQueue, ScoreLookup};

/// Per-id search state, indexed by linear id. Entries written by earlier searches stay in the
/// tables; they only count when their stamp equals the current one.
#[derive(Clone, Debug, Default)]
pub(crate) struct NodeTable {
    pub(crate) g_score: Vec<u32>,
    pub(crate) f_score: Vec<u32>,
    pub(crate) parent: Vec<usize>,
    pub(crate) open_stamp: Vec<u64>,
    pub(crate) closed_stamp: Vec<u64>,
    pub(crate) stamp: u64,
}

impl NodeTable {
    fn len(&self) -> usize {
        self.open_stamp.len()
    }

    fn grow(&mut self, cells: usize) {
        if cells > self.len() {
            self.g_score.resize(cells, u32::MAX);
            self.f_score.resize(cells, u32::MAX);
            self.parent.resize(cells, usize::MAX);
            self.open_stamp.resize(cells, 0);
            self.closed_stamp.resize(cells, 0);
        }
    }

    /// Whether `id` has been given scores during the current search.
    #[inline(always)]
    pub(crate) fn is_open(&self, id: usize) -> bool {
        self.open_stamp[id] == self.stamp
    }

    #[inline(always)]
    pub(crate) fn is_closed(&self, id: usize) -> bool {
        self.closed_stamp[id] == self.stamp
    }

    #[inline(always)]
    pub(crate) fn close(&mut self, id: usize) {
        self.closed_stamp[id] = self.stamp;
    }

    /// Records a (better) route to `id` and marks it open for the current search.
    #[inline(always)]
    pub(crate) fn open(&mut self, id: usize, g: u32, h: u32, parent: usize) {
        self.g_score[id] = g;
        self.f_score[id] = g + h;
        self.parent[id] = parent;
        self.open_stamp[id] = self.stamp;
    }
}

impl ScoreLookup for NodeTable {
    fn score(&self, id: usize) -> Option<u32> {
        if id < self.len() && self.is_open(id) {
            Some(self.f_score[id])
        } else {
            None
        }
    }
}

/// Reusable scratch memory for repeated searches. The tables grow to fit the largest grid
/// searched so far and are never cleared between calls: every search advances a stamp and only
/// entries carrying the current stamp are considered.
///
/// A workspace serves one search at a time. Searches that must run concurrently need a
/// workspace each.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    pub(crate) nodes: NodeTable,
    pub(crate) queue: PriorityQueue,
    pub(crate) expanded: usize,
}

impl Workspace {
    pub fn new() -> Workspace {
        Workspace::default()
    }

    /// Creates a workspace that can search grids of up to `cells` cells without reallocating.
    pub fn with_capacity(cells: usize) -> Workspace {
        let mut workspace = Workspace {
            queue: PriorityQueue::with_capacity(cells),
            ..Workspace::default()
        };
        workspace.ensure_capacity(cells);
        workspace
    }

    /// Number of cells the tables currently cover.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Grows every table to hold at least `cells` entries. Never shrinks.
    pub fn ensure_capacity(&mut self, cells: usize) {
        self.nodes.grow(cells);
    }

    /// The stamp of the most recent search; `0` before the first one.
    pub fn stamp(&self) -> u64 {
        self.nodes.stamp
    }

    /// Number of nodes closed by the most recent search.
    pub fn last_expanded(&self) -> usize {
        self.expanded
    }

    /// Starts a new search: invalidates every table entry in O(1) and empties the queue.
    /// When the counter would overflow the stamp tables are wiped and counting restarts at 1,
    /// since stamp 0 marks entries that were never touched.
    pub fn advance_stamp(&mut self) -> u64 {
        let nodes = &mut self.nodes;
        if nodes.stamp == u64::MAX {
            warn!(
                "Search stamp overflowed, clearing {} stamp entries",
                nodes.open_stamp.len()
            );
            nodes.open_stamp.fill(0);
            nodes.closed_stamp.fill(0);
            nodes.stamp = 1;
        } else {
            nodes.stamp += 1;
        }
        self.queue.clear();
        self.expanded = 0;
        nodes.stamp
    }

    #[cfg(test)]
    pub(crate) fn force_stamp(&mut self, stamp: u64) {
        self.nodes.stamp = stamp;
    }
}
