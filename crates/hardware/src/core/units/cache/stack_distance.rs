//! LRU stack-distance (reuse distance) accounting.
//!
//! Independently of the policy under test, every access's line address is
//! looked up in a recency list. A line found at depth `d` contributes to
//! bucket `d` of either the hit or the miss histogram, depending on what the
//! cache itself decided. The list is bounded, so reuse farther than its
//! capacity is indistinguishable from a first touch.

use crate::common::IndexList;

/// Bounded recency stack with hit/miss distance histograms.
#[derive(Clone, Debug)]
pub struct StackDistance {
    stack: IndexList<u64>,
    capacity: usize,
    hits: Vec<u64>,
    misses: Vec<u64>,
}

/// One histogram row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DistanceRow {
    /// Reuse distance.
    pub depth: usize,
    /// Cache hits at this distance.
    pub hits: u64,
    /// Cache accesses (hits and misses) at this distance.
    pub total: u64,
}

impl StackDistance {
    /// Creates a tracker remembering up to `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            stack: IndexList::with_capacity(capacity),
            capacity,
            hits: vec![0; capacity],
            misses: vec![0; capacity],
        }
    }

    /// Number of lines the stack remembers.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records an access to `line` that the cache resolved as `hit`.
    pub fn record(&mut self, line: u64, hit: bool) {
        let it = self.stack.find(&line);
        match self.stack.distance(it) {
            Some(d) => {
                let bucket = if hit { &mut self.hits } else { &mut self.misses };
                if let Some(count) = bucket.get_mut(d) {
                    *count += 1;
                }
                self.stack.move_to_head(it);
            }
            None => {
                if self.stack.len() == self.capacity {
                    let _ = self.stack.pop_back();
                }
                self.stack.push_front(line);
            }
        }
    }

    /// Histogram rows, one per distance from 0 to `capacity - 1`.
    pub fn rows(&self) -> impl Iterator<Item = DistanceRow> + '_ {
        self.hits
            .iter()
            .zip(&self.misses)
            .enumerate()
            .map(|(depth, (&hits, &misses))| DistanceRow {
                depth,
                hits,
                total: hits + misses,
            })
    }
}
