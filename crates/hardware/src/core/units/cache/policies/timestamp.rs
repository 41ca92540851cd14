//! Timestamp LRU Replacement Policy.
//!
//! Each way records the instruction count of its last reference. Once a set
//! is full, the victim is the way whose stamp is furthest behind the current
//! count; ties go to the lowest way.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per miss in a full set
//! - **Space Complexity:** O(S × W) 64-bit stamps

use super::{AccessOutcome, ReplacementPolicy, TagArray};
use crate::common::InstructionCounter;

/// Exact LRU clocked by the retired-instruction counter.
#[derive(Clone, Debug)]
pub struct TimestampLruPolicy {
    ways: TagArray,
    stamps: Vec<u64>,
    clock: InstructionCounter,
}

impl TimestampLruPolicy {
    /// Creates `sets` empty sets of `assoc` ways reading time from `clock`.
    pub fn new(sets: usize, assoc: usize, clock: InstructionCounter) -> Self {
        Self {
            ways: TagArray::new(sets, assoc),
            stamps: vec![0; sets * assoc],
            clock,
        }
    }

    fn oldest_way(&self, set: usize, now: u64) -> usize {
        let assoc = self.ways.assoc();
        let stamps = &self.stamps[set * assoc..(set + 1) * assoc];
        let mut best = 0;
        let mut best_age = 0;
        for (way, &stamp) in stamps.iter().enumerate() {
            let age = now.wrapping_sub(stamp);
            if age > best_age {
                best = way;
                best_age = age;
            }
        }
        best
    }
}

impl ReplacementPolicy for TimestampLruPolicy {
    fn access(&mut self, set: usize, tag: u64) -> AccessOutcome {
        let now = self.clock.get();
        let assoc = self.ways.assoc();
        if let Some(way) = self.ways.find(set, tag) {
            self.stamps[set * assoc + way] = now;
            return AccessOutcome::Hit;
        }
        let way = match self.ways.empty_way(set) {
            Some(w) => w,
            None => self.oldest_way(set, now),
        };
        self.stamps[set * assoc + way] = now;
        AccessOutcome::Miss {
            victim: self.ways.install(set, way, tag),
        }
    }

    fn flush(&mut self) {
        self.ways.clear();
        self.stamps.fill(0);
    }

    fn occupied(&self) -> usize {
        self.ways.occupied()
    }
}
