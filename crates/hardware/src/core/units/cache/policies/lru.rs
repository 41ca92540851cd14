//! Least Recently Used (LRU) Replacement Policy.
//!
//! Every set keeps its resident tags in an [`IndexList`] ordered from most to
//! least recently used. A hit moves the tag to the head; a miss pushes the
//! new tag at the head and, if the set was full, drops the tail.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `access()`: O(W) tag search, O(1) reordering
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Working sets that fit within the associativity
//! - **Worst Case:** Cyclic scans one line larger than the set (every access misses)

use super::{AccessOutcome, ReplacementPolicy};
use crate::common::IndexList;

/// Recency-ordered tags for one set.
#[derive(Clone, Debug)]
struct LruSet {
    entries: IndexList<u64>,
    assoc: usize,
}

impl LruSet {
    fn new(assoc: usize) -> Self {
        Self {
            entries: IndexList::with_capacity(assoc),
            assoc,
        }
    }

    /// Returns the hit depth on a hit, or the outcome of installing on a miss.
    fn access(&mut self, tag: u64) -> (AccessOutcome, Option<usize>) {
        let it = self.entries.find(&tag);
        if let Some(depth) = self.entries.distance(it) {
            self.entries.move_to_head(it);
            return (AccessOutcome::Hit, Some(depth));
        }
        let victim = if self.entries.len() == self.assoc {
            self.entries.pop_back()
        } else {
            None
        };
        self.entries.push_front(tag);
        (AccessOutcome::Miss { victim }, None)
    }
}

/// Fully associative cache with true LRU replacement.
///
/// Also records how deep in the recency order each hit was found.
#[derive(Clone, Debug)]
pub struct FullAssocLruPolicy {
    set: LruSet,
    hit_depth: Vec<u64>,
}

impl FullAssocLruPolicy {
    /// Creates an empty cache holding `assoc` lines.
    pub fn new(assoc: usize) -> Self {
        Self {
            set: LruSet::new(assoc),
            hit_depth: vec![0; assoc],
        }
    }

    /// Hits per recency depth (index 0 is the most recently used line).
    pub fn hit_depths(&self) -> &[u64] {
        &self.hit_depth
    }
}

impl ReplacementPolicy for FullAssocLruPolicy {
    fn access(&mut self, _set: usize, tag: u64) -> AccessOutcome {
        let (outcome, depth) = self.set.access(tag);
        if let Some(slot) = depth.and_then(|d| self.hit_depth.get_mut(d)) {
            *slot += 1;
        }
        outcome
    }

    fn flush(&mut self) {
        self.set.entries.clear();
    }

    fn occupied(&self) -> usize {
        self.set.entries.len()
    }
}

/// Set associative cache with one LRU list per set.
#[derive(Clone, Debug)]
pub struct SetAssocLruPolicy {
    sets: Vec<LruSet>,
}

impl SetAssocLruPolicy {
    /// Creates `sets` empty sets of `assoc` ways.
    pub fn new(sets: usize, assoc: usize) -> Self {
        Self {
            sets: (0..sets).map(|_| LruSet::new(assoc)).collect(),
        }
    }
}

impl ReplacementPolicy for SetAssocLruPolicy {
    #[inline]
    fn access(&mut self, set: usize, tag: u64) -> AccessOutcome {
        self.sets[set].access(tag).0
    }

    fn flush(&mut self) {
        for s in &mut self.sets {
            s.entries.clear();
        }
    }

    fn occupied(&self) -> usize {
        self.sets.iter().map(|s| s.entries.len()).sum()
    }
}
