//! Globally tagged branch predictor.
//!
//! Each (history, PC) pair gets its own counter in a sparse map: the key
//! carries the newest 32 history bits above the 32-bit word address. There is
//! no aliasing at all, which makes this predictor a useful upper bound for
//! what a finite history-indexed table of the same history length can learn.

use std::collections::HashMap;

use super::{BranchPredictor, Prediction, branch_predictor::BranchStats, counters::saturate};
use crate::common::{HistoryRegister, InstructionCounter};

/// Sparse tagged predictor.
#[derive(Debug)]
pub struct GTaggedPredictor {
    pht: HashMap<u64, u8>,
    stats: BranchStats,
}

impl GTaggedPredictor {
    /// Creates an empty predictor.
    pub fn new(icnt: InstructionCounter) -> Self {
        Self {
            pht: HashMap::new(),
            stats: BranchStats::new(icnt),
        }
    }

    /// Key for `pc` under history `ghr`.
    #[inline(always)]
    pub fn key(pc: u64, ghr: &HistoryRegister) -> u64 {
        ((ghr.to_integer() & 0xffff_ffff) << 32) | ((pc >> 2) & 0xffff_ffff)
    }

    /// Number of distinct (history, PC) pairs trained so far.
    pub fn len(&self) -> usize {
        self.pht.len()
    }

    /// Returns `true` before the first update.
    pub fn is_empty(&self) -> bool {
        self.pht.is_empty()
    }
}

impl BranchPredictor for GTaggedPredictor {
    /// Unseen keys predict not-taken; a trained key predicts taken while its
    /// counter is above zero.
    fn predict(&self, pc: u64, ghr: &HistoryRegister) -> Prediction {
        let key = Self::key(pc, ghr);
        let taken = self.pht.get(&key).is_some_and(|&v| v > 0);
        Prediction::new(taken, key)
    }

    fn update(&mut self, pc: u64, key: u64, predicted: bool, taken: bool, _ghr: &HistoryRegister) {
        let e = self.pht.entry(key).or_insert(0);
        *e = saturate(*e, taken);
        self.stats.record(pc, predicted, taken);
    }

    fn name(&self) -> &'static str {
        "gtagged"
    }

    fn stats(&self) -> &BranchStats {
        &self.stats
    }
}
