//! History-only indexed predictor.
//!
//! The table is indexed by a hash of the whole global history register; the
//! PC never enters the index and is kept in the entry only for reporting.
//! Counters step through a pair of next-state tables, one per outcome, so
//! the hysteresis can be reshaped without touching the update path.

use tracing::debug;

use super::{
    BranchPredictor, Prediction, TableUsage, branch_predictor::BranchStats, check_table_size,
};
use crate::common::{HistoryRegister, InstructionCounter, error::Result};

const NEXT_TAKEN: [u8; 4] = [1, 2, 3, 3];
const NEXT_NOT_TAKEN: [u8; 4] = [0, 0, 1, 2];

#[derive(Clone, Copy, Debug, Default)]
struct HistoryEntry {
    pc: u64,
    valid: bool,
    counter: u8,
}

/// Uberhistory Predictor structure.
#[derive(Debug)]
pub struct UberHistoryPredictor {
    table: Vec<HistoryEntry>,
    stats: BranchStats,
}

impl UberHistoryPredictor {
    /// Creates a predictor with `2^lg_entries` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TableSize`](crate::common::ConfigError::TableSize)
    /// if the table size is out of range.
    pub fn new(icnt: InstructionCounter, lg_entries: u32) -> Result<Self> {
        check_table_size("uberhistory", lg_entries)?;
        debug!(lg_entries, "uberhistory predictor");
        Ok(Self {
            table: vec![HistoryEntry::default(); 1 << lg_entries],
            stats: BranchStats::new(icnt),
        })
    }

    /// Number of entries written at least once.
    pub fn valid_entries(&self) -> usize {
        self.table.iter().filter(|e| e.valid).count()
    }

    /// Address of the branch that last trained entry `idx`, if any.
    pub fn last_pc(&self, idx: usize) -> Option<u64> {
        self.table.get(idx).filter(|e| e.valid).map(|e| e.pc)
    }
}

impl BranchPredictor for UberHistoryPredictor {
    fn predict(&self, _pc: u64, ghr: &HistoryRegister) -> Prediction {
        let idx = ghr.hash() % self.table.len() as u64;
        Prediction::new(self.table[idx as usize].counter > 1, idx)
    }

    fn update(&mut self, pc: u64, key: u64, predicted: bool, taken: bool, _ghr: &HistoryRegister) {
        let len = self.table.len();
        let e = &mut self.table[key as usize % len];
        e.pc = pc;
        e.valid = true;
        let state = (e.counter & 3) as usize;
        e.counter = if taken {
            NEXT_TAKEN[state]
        } else {
            NEXT_NOT_TAKEN[state]
        };
        self.stats.record(pc, predicted, taken);
    }

    fn name(&self) -> &'static str {
        "uberhistory"
    }

    fn stats(&self) -> &BranchStats {
        &self.stats
    }

    fn utilization(&self) -> Vec<TableUsage> {
        vec![TableUsage {
            table: "history",
            valid: self.valid_entries(),
            entries: self.table.len(),
        }]
    }
}
