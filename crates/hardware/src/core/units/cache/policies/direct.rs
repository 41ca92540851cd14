//! Direct-Mapped Organization.
//!
//! One tag and one valid bit per set. Every miss replaces the resident line.

use bitvec::prelude::*;

use super::{AccessOutcome, ReplacementPolicy};

/// Direct-mapped tag store.
#[derive(Clone, Debug)]
pub struct DirectMappedPolicy {
    tags: Vec<u64>,
    valid: BitVec,
}

impl DirectMappedPolicy {
    /// Creates an empty tag store with `sets` lines.
    pub fn new(sets: usize) -> Self {
        Self {
            tags: vec![0; sets],
            valid: bitvec![0; sets],
        }
    }
}

impl ReplacementPolicy for DirectMappedPolicy {
    #[inline]
    fn access(&mut self, set: usize, tag: u64) -> AccessOutcome {
        if self.valid[set] && self.tags[set] == tag {
            return AccessOutcome::Hit;
        }
        let victim = self.valid[set].then_some(self.tags[set]);
        self.tags[set] = tag;
        self.valid.set(set, true);
        AccessOutcome::Miss { victim }
    }

    fn flush(&mut self) {
        self.valid.fill(false);
    }

    fn occupied(&self) -> usize {
        self.valid.count_ones()
    }
}
