//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the conditional-branch direction predictors:
//! gshare, bimodal, gtagged, uberhistory and TAGE. All of them share the
//! [`BranchPredictor`] contract and the [`BranchStats`] block, and are
//! dispatched statically through [`BranchPredictorWrapper`].

pub use self::branch_predictor::{BranchPredictor, BranchStats, Prediction, TableUsage};

/// Bimodal predictor (choice table over two biased direction tables).
pub mod bimodal;

/// Branch predictor trait and common functionality.
pub mod branch_predictor;

/// Two-bit saturating counter tables.
pub mod counters;

/// Global history branch predictor (gshare algorithm).
pub mod gshare;

/// Sparse predictor keyed by exact history and PC.
pub mod gtagged;

/// Tagged Geometric History Length branch predictor.
pub mod tage;

/// Predictor indexed purely by a hash of the global history.
pub mod uberhistory;

use tracing::info;

use self::{
    bimodal::BimodalPredictor, gshare::GSharePredictor, gtagged::GTaggedPredictor,
    tage::TagePredictor, uberhistory::UberHistoryPredictor,
};
use crate::common::{ConfigError, HistoryRegister, InstructionCounter, error::Result};
use crate::config::{PredictorConfig, PredictorKind};

/// Largest supported log2 table size.
pub const MAX_LG_TABLE: u32 = 30;

/// Rejects table sizes that are empty or too large to allocate.
pub(crate) fn check_table_size(predictor: &'static str, lg: u32) -> Result<()> {
    if lg == 0 || lg > MAX_LG_TABLE {
        Err(ConfigError::TableSize {
            predictor,
            lg,
            max: MAX_LG_TABLE,
        })
    } else {
        Ok(())
    }
}

/// Enum wrapper for static dispatch of Branch Predictors.
/// This avoids vtable lookups on the per-branch path.
#[derive(Debug)]
pub enum BranchPredictorWrapper {
    /// gshare.
    GShare(GSharePredictor),
    /// Bimodal.
    Bimodal(BimodalPredictor),
    /// Sparse tagged.
    GTagged(GTaggedPredictor),
    /// History-indexed.
    UberHistory(UberHistoryPredictor),
    /// TAGE.
    Tage(TagePredictor),
}

impl BranchPredictorWrapper {
    /// Creates the predictor selected by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TableSize`] if a table size is out of range.
    pub fn new(config: &PredictorConfig, icnt: InstructionCounter) -> Result<Self> {
        Ok(match config.kind {
            PredictorKind::GShare => Self::GShare(GSharePredictor::new(
                icnt,
                config.lg_pht_entries,
                config.pc_shift,
            )?),
            PredictorKind::Bimodal => Self::Bimodal(BimodalPredictor::new(
                icnt,
                config.lg_choice_entries,
                config.lg_pht_entries,
            )?),
            PredictorKind::GTagged => Self::GTagged(GTaggedPredictor::new(icnt)),
            PredictorKind::UberHistory => {
                Self::UberHistory(UberHistoryPredictor::new(icnt, config.lg_pht_entries)?)
            }
            PredictorKind::Tage => Self::Tage(TagePredictor::new(icnt, config.lg_pht_entries)?),
        })
    }

    /// Kind of the wrapped predictor.
    pub const fn kind(&self) -> PredictorKind {
        match self {
            Self::GShare(_) => PredictorKind::GShare,
            Self::Bimodal(_) => PredictorKind::Bimodal,
            Self::GTagged(_) => PredictorKind::GTagged,
            Self::UberHistory(_) => PredictorKind::UberHistory,
            Self::Tage(_) => PredictorKind::Tage,
        }
    }

    /// Logs table fill levels and, for TAGE, per-component accuracy.
    pub fn log_utilization(&self) {
        let name = self.name();
        for usage in self.utilization() {
            info!(
                predictor = name,
                table = usage.table,
                valid = usage.valid,
                entries = usage.entries,
                percent_valid = usage.fraction().map_or(0.0, |f| 100.0 * f),
                "predictor table utilization"
            );
        }
        if let Self::Tage(bp) = self {
            for p in bp.provider_stats() {
                info!(
                    history_length = ?p.history_length,
                    predictions = p.predictions,
                    correct = p.correct,
                    "tage provider"
                );
            }
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline(always)]
    fn predict(&self, pc: u64, ghr: &HistoryRegister) -> Prediction {
        match self {
            Self::GShare(bp) => bp.predict(pc, ghr),
            Self::Bimodal(bp) => bp.predict(pc, ghr),
            Self::GTagged(bp) => bp.predict(pc, ghr),
            Self::UberHistory(bp) => bp.predict(pc, ghr),
            Self::Tage(bp) => bp.predict(pc, ghr),
        }
    }

    #[inline(always)]
    fn update(&mut self, pc: u64, key: u64, predicted: bool, taken: bool, ghr: &HistoryRegister) {
        match self {
            Self::GShare(bp) => bp.update(pc, key, predicted, taken, ghr),
            Self::Bimodal(bp) => bp.update(pc, key, predicted, taken, ghr),
            Self::GTagged(bp) => bp.update(pc, key, predicted, taken, ghr),
            Self::UberHistory(bp) => bp.update(pc, key, predicted, taken, ghr),
            Self::Tage(bp) => bp.update(pc, key, predicted, taken, ghr),
        }
    }

    fn needed_history_length(&self) -> usize {
        match self {
            Self::GShare(bp) => bp.needed_history_length(),
            Self::Bimodal(bp) => bp.needed_history_length(),
            Self::GTagged(bp) => bp.needed_history_length(),
            Self::UberHistory(bp) => bp.needed_history_length(),
            Self::Tage(bp) => bp.needed_history_length(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::GShare(bp) => bp.name(),
            Self::Bimodal(bp) => bp.name(),
            Self::GTagged(bp) => bp.name(),
            Self::UberHistory(bp) => bp.name(),
            Self::Tage(bp) => bp.name(),
        }
    }

    fn stats(&self) -> &BranchStats {
        match self {
            Self::GShare(bp) => bp.stats(),
            Self::Bimodal(bp) => bp.stats(),
            Self::GTagged(bp) => bp.stats(),
            Self::UberHistory(bp) => bp.stats(),
            Self::Tage(bp) => bp.stats(),
        }
    }

    fn utilization(&self) -> Vec<TableUsage> {
        match self {
            Self::GShare(bp) => bp.utilization(),
            Self::Bimodal(bp) => bp.utilization(),
            Self::GTagged(bp) => bp.utilization(),
            Self::UberHistory(bp) => bp.utilization(),
            Self::Tage(bp) => bp.utilization(),
        }
    }
}
