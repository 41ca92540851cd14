//! Pseudo-LRU (PLRU) Replacement Policy.
//!
//! PLRU approximates the Least Recently Used algorithm using a binary tree of bits.
//! It requires significantly less storage than full LRU (N-1 bits for N ways).
//!
//! Two storage layouts share the tree walk in [`plru_tree`](super::super::plru_tree):
//! the low-associativity variant packs a set's tree into one `u64`, the
//! high-associativity variant spends one byte per tree node.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - victim selection and update: O(log W)
//!   - tag search: O(W)
//! - **Space Complexity:** O(S × W) bits where S is sets, W is ways
//! - **Worst Case:** Pathological cases can cause premature eviction of useful lines

use super::{AccessOutcome, ReplacementPolicy, TagArray};
use crate::core::units::cache::plru_tree;

/// Tree PLRU with one packed `u64` per set (at most 64 ways).
#[derive(Clone, Debug)]
pub struct PlruLowAssocPolicy {
    ways: TagArray,
    trees: Vec<u64>,
}

impl PlruLowAssocPolicy {
    /// Creates `sets` empty sets of `assoc` ways. `assoc` must not exceed
    /// [`MAX_PACKED_WAYS`](plru_tree::MAX_PACKED_WAYS).
    pub fn new(sets: usize, assoc: usize) -> Self {
        Self {
            ways: TagArray::new(sets, assoc),
            trees: vec![0; sets],
        }
    }
}

impl ReplacementPolicy for PlruLowAssocPolicy {
    fn access(&mut self, set: usize, tag: u64) -> AccessOutcome {
        let assoc = self.ways.assoc();
        if let Some(way) = self.ways.find(set, tag) {
            plru_tree::touch(&mut self.trees[set], assoc, way);
            return AccessOutcome::Hit;
        }
        let way = self
            .ways
            .empty_way(set)
            .unwrap_or_else(|| plru_tree::victim(&self.trees[set], assoc));
        let victim = self.ways.install(set, way, tag);
        plru_tree::touch(&mut self.trees[set], assoc, way);
        AccessOutcome::Miss { victim }
    }

    fn flush(&mut self) {
        self.ways.clear();
        self.trees.fill(0);
    }

    fn occupied(&self) -> usize {
        self.ways.occupied()
    }
}

/// Tree PLRU with one byte per node; supports any associativity.
#[derive(Clone, Debug)]
pub struct PlruHighAssocPolicy {
    ways: TagArray,
    /// `assoc` bytes per set; byte 0 of each set is unused so node numbers
    /// index directly.
    nodes: Vec<u8>,
}

impl PlruHighAssocPolicy {
    /// Creates `sets` empty sets of `assoc` ways.
    pub fn new(sets: usize, assoc: usize) -> Self {
        Self {
            ways: TagArray::new(sets, assoc),
            nodes: vec![0; sets * assoc],
        }
    }

    fn tree(&mut self, set: usize) -> &mut [u8] {
        let assoc = self.ways.assoc();
        &mut self.nodes[set * assoc..(set + 1) * assoc]
    }
}

impl ReplacementPolicy for PlruHighAssocPolicy {
    fn access(&mut self, set: usize, tag: u64) -> AccessOutcome {
        let assoc = self.ways.assoc();
        if let Some(way) = self.ways.find(set, tag) {
            plru_tree::touch(self.tree(set), assoc, way);
            return AccessOutcome::Hit;
        }
        let way = match self.ways.empty_way(set) {
            Some(w) => w,
            None => plru_tree::victim(self.tree(set), assoc),
        };
        let victim = self.ways.install(set, way, tag);
        plru_tree::touch(self.tree(set), assoc, way);
        AccessOutcome::Miss { victim }
    }

    fn flush(&mut self) {
        self.ways.clear();
        self.nodes.fill(0);
    }

    fn occupied(&self) -> usize {
        self.ways.occupied()
    }
}
