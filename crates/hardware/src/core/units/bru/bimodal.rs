//! Bimodal (bi-mode) Branch Predictor.
//!
//! A PC-indexed choice table selects one of two direction tables, one biased
//! toward taken and one toward not-taken, both indexed by PC XOR folded
//! history. Splitting the direction tables by bias keeps branches with
//! opposite tendencies from destructively aliasing in the same counter.
//!
//! The choice counter is only trained when the selected direction table did
//! not already agree with the outcome; a correct prediction from the
//! disfavoured table's point of view does not pull the choice away.

use tracing::debug;

use super::{
    BranchPredictor, Prediction, TableUsage, branch_predictor::BranchStats, check_table_size,
    counters::TwoBitCounterArray,
};
use crate::common::{HistoryRegister, InstructionCounter, error::Result, history::fold_halves};

/// Bimodal Predictor structure.
#[derive(Debug)]
pub struct BimodalPredictor {
    choice: TwoBitCounterArray,
    taken: TwoBitCounterArray,
    not_taken: TwoBitCounterArray,
    stats: BranchStats,
}

impl BimodalPredictor {
    /// Creates a predictor with a `2^lg_choice_entries` choice table and two
    /// `2^lg_pht_entries` direction tables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TableSize`](crate::common::ConfigError::TableSize)
    /// if either table size is out of range.
    pub fn new(
        icnt: InstructionCounter,
        lg_choice_entries: u32,
        lg_pht_entries: u32,
    ) -> Result<Self> {
        check_table_size("bimodal", lg_choice_entries)?;
        check_table_size("bimodal", lg_pht_entries)?;
        debug!(lg_choice_entries, lg_pht_entries, "bimodal predictor");
        Ok(Self {
            choice: TwoBitCounterArray::new(lg_choice_entries),
            taken: TwoBitCounterArray::new(lg_pht_entries),
            not_taken: TwoBitCounterArray::new(lg_pht_entries),
            stats: BranchStats::new(icnt),
        })
    }

    #[inline(always)]
    const fn choice_index(pc: u64) -> usize {
        (pc >> 2) as usize
    }

    #[inline(always)]
    fn index(&self, pc: u64, ghr: &HistoryRegister) -> usize {
        (((pc >> 2) ^ fold_halves(ghr.to_integer())) as usize) & self.taken.mask()
    }
}

impl BranchPredictor for BimodalPredictor {
    fn predict(&self, pc: u64, ghr: &HistoryRegister) -> Prediction {
        let idx = self.index(pc, ghr);
        let taken = if self.choice.predict(Self::choice_index(pc)) {
            self.taken.predict(idx)
        } else {
            self.not_taken.predict(idx)
        };
        Prediction::new(taken, idx as u64)
    }

    fn update(&mut self, pc: u64, key: u64, predicted: bool, taken: bool, _ghr: &HistoryRegister) {
        let c_idx = Self::choice_index(pc);
        let idx = key as usize;
        if self.choice.predict(c_idx) {
            if !(!taken && !self.taken.predict(idx)) {
                self.choice.update(c_idx, taken);
            }
            self.taken.update(idx, taken);
        } else {
            if !(taken && self.not_taken.predict(idx)) {
                self.choice.update(c_idx, taken);
            }
            self.not_taken.update(idx, taken);
        }
        self.stats.record(pc, predicted, taken);
    }

    fn name(&self) -> &'static str {
        "bimodal"
    }

    fn stats(&self) -> &BranchStats {
        &self.stats
    }

    fn utilization(&self) -> Vec<TableUsage> {
        [
            ("choice", &self.choice),
            ("not_taken", &self.not_taken),
            ("taken", &self.taken),
        ]
        .into_iter()
        .map(|(table, t)| TableUsage {
            table,
            valid: t.count_valid(),
            entries: t.len(),
        })
        .collect()
    }
}
