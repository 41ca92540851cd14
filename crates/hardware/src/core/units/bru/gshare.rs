//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter using an XOR
//! hash. This allows the predictor to distinguish the same branch instruction
//! in different execution contexts.
//!
//! The history register is reduced to 16 bits with [`fold_halves`] before
//! hashing, so registers longer than the table index still influence every
//! index bit.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(1)
//!   - `update()`: O(1)
//! - **Space Complexity:** O(2^N) 2-bit counters for a table of N index bits
//! - **Best Case:** Correlated branches where outcome depends on recent history
//! - **Worst Case:** Uncorrelated branches aliasing into the same counters

use tracing::debug;

use super::{
    BranchPredictor, Prediction, TableUsage, branch_predictor::BranchStats, check_table_size,
    counters::TwoBitCounterArray,
};
use crate::common::{HistoryRegister, InstructionCounter, error::Result, history::fold_halves};

/// GShare Predictor structure.
#[derive(Debug)]
pub struct GSharePredictor {
    /// Pattern History Table of 2-bit saturating counters.
    pht: TwoBitCounterArray,
    /// Extra word-address bits dropped before hashing.
    pc_shift: u32,
    stats: BranchStats,
}

impl GSharePredictor {
    /// Creates a predictor with `2^lg_pht_entries` counters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TableSize`](crate::common::ConfigError::TableSize)
    /// if the table size is out of range.
    pub fn new(icnt: InstructionCounter, lg_pht_entries: u32, pc_shift: u32) -> Result<Self> {
        check_table_size("gshare", lg_pht_entries)?;
        debug!(lg_pht_entries, pc_shift, "gshare predictor");
        Ok(Self {
            pht: TwoBitCounterArray::new(lg_pht_entries),
            pc_shift: pc_shift.min(61),
            stats: BranchStats::new(icnt),
        })
    }

    /// Calculates the index into the Pattern History Table.
    #[inline(always)]
    fn index(&self, pc: u64, ghr: &HistoryRegister) -> usize {
        let word = pc >> (2 + self.pc_shift);
        ((word ^ fold_halves(ghr.to_integer())) as usize) & self.pht.mask()
    }
}

impl BranchPredictor for GSharePredictor {
    /// Returns taken if the counter at the hashed index is 2 or 3.
    fn predict(&self, pc: u64, ghr: &HistoryRegister) -> Prediction {
        let idx = self.index(pc, ghr);
        Prediction::new(self.pht.predict(idx), idx as u64)
    }

    fn update(&mut self, pc: u64, key: u64, predicted: bool, taken: bool, _ghr: &HistoryRegister) {
        self.pht.update(key as usize, taken);
        self.stats.record(pc, predicted, taken);
    }

    fn name(&self) -> &'static str {
        "gshare"
    }

    fn stats(&self) -> &BranchStats {
        &self.stats
    }

    fn utilization(&self) -> Vec<TableUsage> {
        vec![TableUsage {
            table: "pht",
            valid: self.pht.count_valid(),
            entries: self.pht.len(),
        }]
    }
}
