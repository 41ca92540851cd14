//! Per-run model ownership.
//!
//! [`SimContext`] holds the global history register, the instruction counter
//! handle, the branch predictor and the cache hierarchy. The interpreter
//! drives it with:
//! 1. **Branches:** `predict` before executing, `resolve` once the direction is known.
//! 2. **Memory:** `read` / `write` on the top-level cache.
//! 3. **Retirement:** `retire` to advance the instruction counter.
//!
//! The history register is only ever shifted here, after the predictor has
//! been trained on the outcome.

use std::io::{self, Write};

use tracing::{debug, info};

use crate::common::{HistoryRegister, InstructionCounter, error::Result};
use crate::config::Config;
use crate::core::units::bru::{BranchPredictor, BranchPredictorWrapper, Prediction};
use crate::core::units::cache::CacheHierarchy;
use crate::stats::{self, HierarchyReport, PredictorReport};

/// Models and shared state for one simulation run.
#[derive(Debug)]
pub struct SimContext {
    history: HistoryRegister,
    icnt: InstructionCounter,
    predictor: BranchPredictorWrapper,
    caches: CacheHierarchy,
}

impl SimContext {
    /// Builds the predictor, sizes the history register for it, then builds
    /// the cache levels.
    ///
    /// # Errors
    ///
    /// Returns the first predictor or cache construction error.
    pub fn from_config(config: &Config) -> Result<Self> {
        let icnt = InstructionCounter::new();
        let predictor = BranchPredictorWrapper::new(&config.predictor, icnt.clone())?;
        let history_length = config
            .predictor
            .history_length
            .max(predictor.needed_history_length());
        let caches = CacheHierarchy::new(&config.caches, &icnt)?;

        debug!(
            predictor = predictor.name(),
            history_length,
            cache_levels = caches.len(),
            "simulation context"
        );

        Ok(Self {
            history: HistoryRegister::new(history_length),
            icnt,
            predictor,
            caches,
        })
    }

    /// Predicts the conditional branch at `pc` against the current history.
    #[inline]
    pub fn predict(&self, pc: u64) -> Prediction {
        self.predictor.predict(pc, &self.history)
    }

    /// Trains the predictor with the resolved direction, then shifts it into
    /// the history register.
    #[inline]
    pub fn resolve(&mut self, pc: u64, prediction: Prediction, taken: bool) {
        self.predictor
            .update(pc, prediction.key, prediction.taken, taken, &self.history);
        self.history.push(taken);
    }

    /// Predicts and resolves in one step. Returns the prediction made.
    pub fn branch(&mut self, pc: u64, taken: bool) -> Prediction {
        let prediction = self.predict(pc);
        self.resolve(pc, prediction, taken);
        prediction
    }

    /// Read access at the top-level cache. Returns whether it hit; always
    /// `false` with the cache model disabled.
    #[inline]
    pub fn read(&mut self, addr: u64, num_bytes: usize) -> bool {
        self.caches.read(addr, num_bytes)
    }

    /// Write access at the top-level cache.
    #[inline]
    pub fn write(&mut self, addr: u64, num_bytes: usize) -> bool {
        self.caches.write(addr, num_bytes)
    }

    /// Advances the instruction counter by `n` retired instructions.
    #[inline]
    pub fn retire(&self, n: u64) {
        self.icnt.advance(n);
    }

    /// Global history register.
    pub const fn history(&self) -> &HistoryRegister {
        &self.history
    }

    /// Instruction counter handle.
    pub const fn instruction_counter(&self) -> &InstructionCounter {
        &self.icnt
    }

    /// Active branch predictor.
    pub const fn predictor(&self) -> &BranchPredictorWrapper {
        &self.predictor
    }

    /// Cache levels.
    pub const fn caches(&self) -> &CacheHierarchy {
        &self.caches
    }

    /// Writes the predictor and cache summaries.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from `out`.
    pub fn report<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        stats::write_sections(out, &self.predictor, &self.caches, &[])
    }

    /// Writes the per-address mispredict counts, most frequent first.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from `out`.
    pub fn write_mispredicts<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        stats::write_mispredict_histogram(out, &self.predictor.stats().mispredict_histogram)
    }

    /// Logs table utilization and cache occupancy, then returns the final
    /// report.
    pub fn shutdown(&self) -> String {
        self.predictor.log_utilization();
        for level in self.caches.levels() {
            info!(
                cache = level.name(),
                occupied_lines = level.occupied_lines(),
                occupied_bytes = level.occupied_bytes(),
                total_bytes = level.geometry().total_bytes(),
                "cache occupancy"
            );
            if let Some(depths) = level.hit_depths() {
                for (depth, hits) in depths.iter().enumerate().filter(|(_, h)| **h != 0) {
                    info!(cache = level.name(), depth, hits, "lru hit depth");
                }
            }
        }
        format!(
            "{}{}",
            PredictorReport(&self.predictor),
            HierarchyReport(&self.caches)
        )
    }
}
