//! Two-bit saturating counter tables.
//!
//! Counters start at 0 (strongly not-taken) and predict taken at 2 or 3. Each
//! table also remembers which entries were ever trained so predictors can
//! report how much of the table a workload touched.

use bitvec::prelude::*;

/// Increments toward 3 on taken, decrements toward 0 on not-taken.
#[inline(always)]
pub const fn saturate(value: u8, taken: bool) -> u8 {
    if taken {
        if value >= 3 { 3 } else { value + 1 }
    } else if value == 0 {
        0
    } else {
        value - 1
    }
}

/// Power-of-two table of 2-bit counters with a touched-entry mask.
#[derive(Clone, Debug)]
pub struct TwoBitCounterArray {
    counters: Vec<u8>,
    valid: BitVec,
    mask: usize,
}

impl TwoBitCounterArray {
    /// Creates a table of `2^lg_entries` counters, all zero.
    pub fn new(lg_entries: u32) -> Self {
        let entries = 1usize << lg_entries;
        Self {
            counters: vec![0; entries],
            valid: bitvec![0; entries],
            mask: entries - 1,
        }
    }

    /// Number of counters.
    #[inline]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Always `false`; tables hold at least one counter.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Index mask (`len() - 1`).
    #[inline(always)]
    pub const fn mask(&self) -> usize {
        self.mask
    }

    /// Counter value at `idx` (reduced modulo the table size).
    #[inline(always)]
    pub fn get(&self, idx: usize) -> u8 {
        self.counters[idx & self.mask]
    }

    /// Returns `true` if the counter at `idx` predicts taken.
    #[inline(always)]
    pub fn predict(&self, idx: usize) -> bool {
        self.get(idx) > 1
    }

    /// Trains the counter at `idx` and marks it valid.
    #[inline(always)]
    pub fn update(&mut self, idx: usize, taken: bool) {
        let idx = idx & self.mask;
        self.counters[idx] = saturate(self.counters[idx], taken);
        self.valid.set(idx, true);
    }

    /// Number of counters trained at least once.
    pub fn count_valid(&self) -> usize {
        self.valid.count_ones()
    }
}
