//! TAGE (Tagged Geometric History Length) Branch Predictor.
//!
//! TAGE uses a base bimodal predictor and multiple tagged banks indexed with
//! geometrically increasing history lengths. It provides high accuracy by
//! matching long history patterns while falling back to shorter histories
//! or the base predictor when necessary.
//!
//! This configuration has three tagged banks reading 256, 128 and 64 bits of
//! global history. Each entry carries a 2-bit direction counter, a 2-bit
//! usefulness counter and a 12-bit tag.
//!
//! # Algorithm
//!
//! - **Predict:** the bank with the longest history whose tag matches is the
//!   provider; the next matching bank (or the base table) is the alternate.
//! - **Update:** the provider's counter is trained. Its usefulness rises when
//!   it was right and the alternate wrong, and falls in the opposite case.
//! - **Allocate:** on a misprediction, the shortest bank with longer history
//!   than the provider whose usefulness is zero receives a new entry. When no
//!   such bank exists, every candidate's usefulness is decremented instead.
//!   Mispredicts provided by the longest bank allocate nothing.
//! - **Aging:** failed allocations bump an 8-bit counter. When it saturates,
//!   all usefulness counters are cleared.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(B × H / 12) where B is the bank count and H the longest
//!     history (history folding dominates)
//!   - `update()`: O(B × H / 12)
//! - **Space Complexity:** O(T × B) where T is table size per bank

use tracing::debug;

use super::{
    BranchPredictor, Prediction, TableUsage, branch_predictor::BranchStats, check_table_size,
    counters::{TwoBitCounterArray, saturate},
};
use crate::common::{HistoryRegister, InstructionCounter, error::Result};

/// Number of tagged banks.
pub const NUM_BANKS: usize = 3;

/// Simulated history length of each bank, longest first.
pub const HISTORY_LENGTHS: [usize; NUM_BANKS] = [256, 128, 64];

/// Tag width in bits.
const TAG_BITS: usize = 12;
const TAG_MASK: u64 = (1 << TAG_BITS) - 1;

/// Smallest log2 size of a tagged bank.
const MIN_LG_BANK: u32 = 4;

/// An entry in a TAGE bank.
#[derive(Clone, Copy, Debug, Default)]
struct TageEntry {
    /// 2-bit direction counter.
    pred: u8,
    /// 2-bit usefulness counter.
    useful: u8,
    /// 12-bit partial tag.
    tag: u16,
    /// Set once the entry has been allocated.
    valid: bool,
}

/// Per-component prediction counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProviderStats {
    /// History length of the component, `None` for the base table.
    pub history_length: Option<usize>,
    /// Predictions this component provided.
    pub predictions: u64,
    /// Of those, how many were correct.
    pub correct: u64,
}

/// Bank lookups for one (pc, history) pair.
#[derive(Clone, Copy, Debug)]
struct Lookup {
    indices: [usize; NUM_BANKS],
    tags: [u16; NUM_BANKS],
    base: usize,
    provider: Option<usize>,
    alt: Option<usize>,
}

/// TAGE Predictor structure.
#[derive(Debug)]
pub struct TagePredictor {
    /// Base bimodal predictor table.
    base: TwoBitCounterArray,
    /// Tagged component banks, longest history first.
    banks: [Vec<TageEntry>; NUM_BANKS],
    lg_bank: u32,
    bank_mask: usize,
    /// Allocation-failure counter driving the periodic usefulness reset.
    reset_ctr: u8,
    /// Index `NUM_BANKS` is the base table.
    providers: [ProviderStats; NUM_BANKS + 1],
    stats: BranchStats,
}

impl TagePredictor {
    /// Creates a predictor with a `2^lg_pht_entries` base table and tagged
    /// banks a quarter of that size (at least 16 entries each).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TableSize`](crate::common::ConfigError::TableSize)
    /// if the table size is out of range.
    pub fn new(icnt: InstructionCounter, lg_pht_entries: u32) -> Result<Self> {
        check_table_size("tage", lg_pht_entries)?;
        let lg_bank = lg_pht_entries.saturating_sub(2).max(MIN_LG_BANK);
        let entries = 1usize << lg_bank;
        debug!(lg_pht_entries, lg_bank, history_lengths = ?HISTORY_LENGTHS, "tage predictor");

        let mut providers = [ProviderStats::default(); NUM_BANKS + 1];
        for (p, &len) in providers.iter_mut().zip(HISTORY_LENGTHS.iter()) {
            p.history_length = Some(len);
        }

        Ok(Self {
            base: TwoBitCounterArray::new(lg_pht_entries),
            banks: std::array::from_fn(|_| vec![TageEntry::default(); entries]),
            lg_bank,
            bank_mask: entries - 1,
            reset_ctr: 0,
            providers,
            stats: BranchStats::new(icnt),
        })
    }

    /// Prediction counts per component: tagged banks longest first, then the
    /// base table.
    pub const fn provider_stats(&self) -> &[ProviderStats; NUM_BANKS + 1] {
        &self.providers
    }

    #[inline(always)]
    const fn pc_hash(pc: u64) -> u64 {
        (pc >> 2) & TAG_MASK
    }

    /// Calculates the index for a specific bank using PC and folded history.
    #[inline]
    fn index(&self, pc: u64, bank: usize, ghr: &HistoryRegister) -> usize {
        let h = ghr.fold(HISTORY_LENGTHS[bank], self.lg_bank as usize);
        (((pc >> 2) ^ h) as usize) & self.bank_mask
    }

    /// Calculates the tag for a specific bank using PC and folded history.
    #[inline]
    fn tag(pc: u64, bank: usize, ghr: &HistoryRegister) -> u16 {
        let h = ghr.fold(HISTORY_LENGTHS[bank], TAG_BITS);
        ((Self::pc_hash(pc) ^ h) & TAG_MASK) as u16
    }

    fn lookup(&self, pc: u64, ghr: &HistoryRegister) -> Lookup {
        let mut l = Lookup {
            indices: [0; NUM_BANKS],
            tags: [0; NUM_BANKS],
            base: (pc >> 2) as usize & self.base.mask(),
            provider: None,
            alt: None,
        };
        for bank in 0..NUM_BANKS {
            l.indices[bank] = self.index(pc, bank, ghr);
            l.tags[bank] = Self::tag(pc, bank, ghr);
            let e = &self.banks[bank][l.indices[bank]];
            if e.valid && e.tag == l.tags[bank] {
                if l.provider.is_none() {
                    l.provider = Some(bank);
                } else if l.alt.is_none() {
                    l.alt = Some(bank);
                }
            }
        }
        l
    }

    #[inline]
    fn component_prediction(&self, l: &Lookup, bank: Option<usize>) -> bool {
        match bank {
            Some(b) => self.banks[b][l.indices[b]].pred > 1,
            None => self.base.predict(l.base),
        }
    }

    /// Installs a new entry in the shortest bank above the provider that has
    /// a dead entry, or ages the candidates when none does. A provider in the
    /// longest bank has no candidates and leaves all state alone.
    fn allocate(&mut self, l: &Lookup, taken: bool) {
        let limit = l.provider.unwrap_or(NUM_BANKS);
        if limit == 0 {
            return;
        }
        let target = (0..limit).rev().find(|&b| {
            let e = &self.banks[b][l.indices[b]];
            !e.valid || e.useful == 0
        });

        match target {
            Some(b) => {
                self.banks[b][l.indices[b]] = TageEntry {
                    pred: if taken { 2 } else { 1 },
                    useful: 0,
                    tag: l.tags[b],
                    valid: true,
                };
                self.reset_ctr = self.reset_ctr.saturating_sub(1);
            }
            None => {
                for b in 0..limit {
                    let e = &mut self.banks[b][l.indices[b]];
                    e.useful = e.useful.saturating_sub(1);
                }
                self.reset_ctr = self.reset_ctr.saturating_add(1);
                if self.reset_ctr == u8::MAX {
                    debug!("tage usefulness reset");
                    self.reset_ctr = 0;
                    for e in self.banks.iter_mut().flatten() {
                        e.useful = 0;
                    }
                }
            }
        }
    }
}

impl BranchPredictor for TagePredictor {
    /// Returns the provider's direction, or the base table's when no tagged
    /// bank matches. The key records the providing component in its upper
    /// half and the base index in its lower half.
    fn predict(&self, pc: u64, ghr: &HistoryRegister) -> Prediction {
        let l = self.lookup(pc, ghr);
        let taken = self.component_prediction(&l, l.provider);
        let component = l.provider.unwrap_or(NUM_BANKS) as u64;
        Prediction::new(taken, (component << 32) | l.base as u64)
    }

    /// Repeats the lookup against the unchanged history rather than decoding
    /// `key`, since training needs every bank's index and tag. The key is
    /// informational for TAGE.
    fn update(&mut self, pc: u64, _key: u64, predicted: bool, taken: bool, ghr: &HistoryRegister) {
        let l = self.lookup(pc, ghr);
        let provider_pred = self.component_prediction(&l, l.provider);
        let alt_pred = self.component_prediction(&l, l.alt);

        match l.provider {
            Some(b) => {
                let e = &mut self.banks[b][l.indices[b]];
                e.pred = saturate(e.pred, taken);
                if provider_pred != alt_pred {
                    e.useful = if provider_pred == taken {
                        (e.useful + 1).min(3)
                    } else {
                        e.useful.saturating_sub(1)
                    };
                }
            }
            None => self.base.update(l.base, taken),
        }

        let slot = &mut self.providers[l.provider.unwrap_or(NUM_BANKS)];
        slot.predictions += 1;
        if provider_pred == taken {
            slot.correct += 1;
        } else {
            self.allocate(&l, taken);
        }

        self.stats.record(pc, predicted, taken);
    }

    fn needed_history_length(&self) -> usize {
        HISTORY_LENGTHS[0]
    }

    fn name(&self) -> &'static str {
        "tage"
    }

    fn stats(&self) -> &BranchStats {
        &self.stats
    }

    fn utilization(&self) -> Vec<TableUsage> {
        const LABELS: [&str; NUM_BANKS] = ["tagged[256]", "tagged[128]", "tagged[64]"];
        let mut usage = vec![TableUsage {
            table: "base",
            valid: self.base.count_valid(),
            entries: self.base.len(),
        }];
        usage.extend(self.banks.iter().zip(LABELS).map(|(bank, table)| TableUsage {
            table,
            valid: bank.iter().filter(|e| e.valid).count(),
            entries: bank.len(),
        }));
        usage
    }
}
