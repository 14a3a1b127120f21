/// Source of priorities for a [PriorityQueue]. The queue only stores ids; every comparison asks
/// the lookup for the id's current score, so a score may change while the id is queued.
pub trait ScoreLookup {
    /// The score of `id`, or [None] if no score has been assigned.
    fn score(&self, id: usize) -> Option<u32>;
}

/// Ids without a score sort after every scored id.
#[inline(always)]
fn priority<S: ScoreLookup + ?Sized>(scores: &S, id: usize) -> u64 {
    scores.score(id).map_or(u64::MAX, u64::from)
}

/// Array-backed binary min-heap over linear ids. Keys live outside the queue in a
/// [ScoreLookup]. Equal scores are never swapped, which keeps the pop order deterministic.
#[derive(Clone, Debug, Default)]
pub struct PriorityQueue {
    heap: Vec<usize>,
    size: usize,
}

impl PriorityQueue {
    pub fn new() -> PriorityQueue {
        PriorityQueue::default()
    }

    pub fn with_capacity(capacity: usize) -> PriorityQueue {
        PriorityQueue {
            heap: Vec::with_capacity(capacity),
            size: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Forgets every queued id but keeps the backing storage for the next search.
    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Queues `id`. Panics if `scores` has no score for it.
    pub fn push<S: ScoreLookup + ?Sized>(&mut self, id: usize, scores: &S) {
        assert!(
            scores.score(id).is_some(),
            "id {id} was pushed without an assigned score"
        );
        if self.size < self.heap.len() {
            self.heap[self.size] = id;
        } else {
            self.heap.push(id);
        }
        self.size += 1;
        self.sift_up(self.size - 1, scores);
    }

    /// Removes and returns the id with the smallest score.
    pub fn pop<S: ScoreLookup + ?Sized>(&mut self, scores: &S) -> Option<usize> {
        if self.size == 0 {
            return None;
        }
        let head = self.heap[0];
        self.size -= 1;
        if self.size > 0 {
            self.heap[0] = self.heap[self.size];
            self.sift_down(0, scores);
        }
        Some(head)
    }

    /// The id that [pop](Self::pop) would return, without removing it.
    pub fn peek(&self) -> Option<usize> {
        if self.size == 0 {
            None
        } else {
            Some(self.heap[0])
        }
    }

    fn sift_up<S: ScoreLookup + ?Sized>(&mut self, mut i: usize, scores: &S) {
        let key = priority(scores, self.heap[i]);
        while i > 0 {
            let parent = (i - 1) / 2;
            if key < priority(scores, self.heap[parent]) {
                self.heap.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down<S: ScoreLookup + ?Sized>(&mut self, mut i: usize, scores: &S) {
        let key = priority(scores, self.heap[i]);
        loop {
            let left = 2 * i + 1;
            if left >= self.size {
                break;
            }
            let right = left + 1;
            let mut child = left;
            let mut child_key = priority(scores, self.heap[left]);
            if right < self.size {
                let right_key = priority(scores, self.heap[right]);
                if right_key < child_key {
                    child = right;
                    child_key = right_key;
                }
            }
            if key > child_key {
                self.heap.swap(i, child);
                i = child;
            } else {
                break;
            }
        }
    }
}
