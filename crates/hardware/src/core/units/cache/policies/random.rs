//! Random Replacement Policy.
//!
//! Victims are drawn uniformly from the resident lines with a seeded
//! `StdRng`, so two runs with the same seed and trace evict identically.

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{AccessOutcome, ReplacementPolicy, TagArray};

/// Fully associative cache with random replacement.
///
/// Resident tags are kept in a slot vector with a tag-to-slot map for O(1)
/// lookup; there is no recency state at all.
#[derive(Clone, Debug)]
pub struct FullAssocRandomPolicy {
    slots: Vec<u64>,
    index: HashMap<u64, usize>,
    assoc: usize,
    rng: StdRng,
}

impl FullAssocRandomPolicy {
    /// Creates an empty cache of `assoc` lines.
    pub fn new(assoc: usize, seed: u64) -> Self {
        Self {
            slots: Vec::with_capacity(assoc),
            index: HashMap::with_capacity(assoc),
            assoc,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReplacementPolicy for FullAssocRandomPolicy {
    fn access(&mut self, _set: usize, tag: u64) -> AccessOutcome {
        if self.index.contains_key(&tag) {
            return AccessOutcome::Hit;
        }
        if self.slots.len() < self.assoc {
            let _ = self.index.insert(tag, self.slots.len());
            self.slots.push(tag);
            return AccessOutcome::Miss { victim: None };
        }
        let slot = self.rng.gen_range(0..self.slots.len());
        let victim = std::mem::replace(&mut self.slots[slot], tag);
        let _ = self.index.remove(&victim);
        let _ = self.index.insert(tag, slot);
        AccessOutcome::Miss {
            victim: Some(victim),
        }
    }

    fn flush(&mut self) {
        self.slots.clear();
        self.index.clear();
    }

    fn occupied(&self) -> usize {
        self.slots.len()
    }
}

/// Set associative cache with random replacement.
///
/// Invalid ways are filled first; a random way is chosen only once the set
/// has been completely filled.
#[derive(Clone, Debug)]
pub struct SetAssocRandomPolicy {
    ways: TagArray,
    rng: StdRng,
}

impl SetAssocRandomPolicy {
    /// Creates `sets` empty sets of `assoc` ways.
    pub fn new(sets: usize, assoc: usize, seed: u64) -> Self {
        Self {
            ways: TagArray::new(sets, assoc),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReplacementPolicy for SetAssocRandomPolicy {
    fn access(&mut self, set: usize, tag: u64) -> AccessOutcome {
        if self.ways.find(set, tag).is_some() {
            return AccessOutcome::Hit;
        }
        let way = match self.ways.empty_way(set) {
            Some(w) => w,
            None => self.rng.gen_range(0..self.ways.assoc()),
        };
        AccessOutcome::Miss {
            victim: self.ways.install(set, way, tag),
        }
    }

    fn flush(&mut self) {
        self.ways.clear();
    }

    fn occupied(&self) -> usize {
        self.ways.occupied()
    }
}
