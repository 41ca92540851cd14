//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait that every direction
//! predictor implements, together with the statistics block they share.
//! Prediction and training are split: `predict` is a pure read that hands
//! back an opaque key, and the caller returns that key to `update` once the
//! branch resolves.

use std::collections::BTreeMap;

use crate::common::{HistoryRegister, InstructionCounter};

/// Outcome of a lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prediction {
    /// Predicted direction.
    pub taken: bool,
    /// Opaque table key; pass unchanged to [`BranchPredictor::update`].
    pub key: u64,
}

impl Prediction {
    /// Creates a prediction.
    #[inline(always)]
    pub const fn new(taken: bool, key: u64) -> Self {
        Self { taken, key }
    }
}

/// Fill level of one predictor table, reported at shutdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableUsage {
    /// Table label.
    pub table: &'static str,
    /// Entries written at least once.
    pub valid: usize,
    /// Table capacity.
    pub entries: usize,
}

impl TableUsage {
    /// Fraction of entries ever written, or `None` for an empty table.
    pub fn fraction(&self) -> Option<f64> {
        (self.entries != 0).then(|| self.valid as f64 / self.entries as f64)
    }
}

/// Counters shared by every predictor.
#[derive(Clone, Debug)]
pub struct BranchStats {
    /// Conditional branches resolved.
    pub branches: u64,
    /// Resolved branches whose prediction was wrong.
    pub mispredicts: u64,
    /// Mispredict count per branch address.
    pub mispredict_histogram: BTreeMap<u64, u64>,
    icnt: InstructionCounter,
}

impl BranchStats {
    /// Creates zeroed statistics reading instruction counts from `icnt`.
    pub const fn new(icnt: InstructionCounter) -> Self {
        Self {
            branches: 0,
            mispredicts: 0,
            mispredict_histogram: BTreeMap::new(),
            icnt,
        }
    }

    /// Accounts for one resolved branch.
    #[inline(always)]
    pub fn record(&mut self, pc: u64, predicted: bool, taken: bool) {
        self.branches += 1;
        if predicted != taken {
            self.mispredicts += 1;
            *self.mispredict_histogram.entry(pc).or_insert(0) += 1;
        }
    }

    /// Instructions retired so far.
    pub fn instructions(&self) -> u64 {
        self.icnt.get()
    }

    /// Fraction of branches predicted correctly; `None` before any branch.
    pub fn accuracy(&self) -> Option<f64> {
        (self.branches != 0)
            .then(|| (self.branches - self.mispredicts) as f64 / self.branches as f64)
    }

    /// Mispredicts per thousand retired instructions; `None` before any
    /// instruction retires.
    pub fn mpki(&self) -> Option<f64> {
        let insns = self.instructions();
        (insns != 0).then(|| 1000.0 * self.mispredicts as f64 / insns as f64)
    }
}

/// Trait for branch direction predictors.
pub trait BranchPredictor {
    /// Predicts the direction of the conditional branch at `pc`.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction
    /// * `ghr` - Global history as of this branch
    ///
    /// # Returns
    ///
    /// The predicted direction and the key identifying the counter(s) used.
    fn predict(&self, pc: u64, ghr: &HistoryRegister) -> Prediction;

    /// Trains the predictor with a resolved outcome.
    ///
    /// `ghr` must be the same history the paired [`predict`](Self::predict)
    /// observed; the caller shifts the outcome in afterwards.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction
    /// * `key` - Key returned by `predict`
    /// * `predicted` - Direction returned by `predict`
    /// * `taken` - Resolved direction
    /// * `ghr` - Global history as of this branch
    fn update(&mut self, pc: u64, key: u64, predicted: bool, taken: bool, ghr: &HistoryRegister);

    /// Minimum history register length this predictor reads, in bits.
    fn needed_history_length(&self) -> usize {
        0
    }

    /// Short type name for reports.
    fn name(&self) -> &'static str;

    /// Shared statistics.
    fn stats(&self) -> &BranchStats;

    /// Table fill levels for the shutdown report.
    fn utilization(&self) -> Vec<TableUsage> {
        Vec::new()
    }
}
