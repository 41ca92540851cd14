//! Cache Organizations and Replacement Policies.
//!
//! Each policy owns the resident-tag state for every set of one cache and
//! decides hits, victims and installs on its own. The cache wrapper only
//! decomposes addresses and keeps the counters.
//!
//! # Policies
//!
//! - `DirectMapped`: one tag per set.
//! - `FullAssocLru` / `SetAssocLru`: true LRU over recency lists.
//! - `FullAssocRandom` / `SetAssocRandom`: seeded uniform random victims.
//! - `PlruLowAssoc` / `PlruHighAssoc`: binary-tree pseudo-LRU.
//! - `TimestampLru`: exact LRU clocked by the instruction counter.

/// Direct-mapped organization.
pub mod direct;

/// True LRU, fully and set associative.
pub mod lru;

/// Tree pseudo-LRU, packed and byte-per-node.
pub mod plru;

/// Random replacement, fully and set associative.
pub mod random;

/// Exact LRU using the instruction counter as a clock.
pub mod timestamp;

pub use direct::DirectMappedPolicy;
pub use lru::{FullAssocLruPolicy, SetAssocLruPolicy};
pub use plru::{PlruHighAssocPolicy, PlruLowAssocPolicy};
pub use random::{FullAssocRandomPolicy, SetAssocRandomPolicy};
pub use timestamp::TimestampLruPolicy;

use bitvec::prelude::*;

use crate::common::InstructionCounter;
use crate::config::ReplacementPolicy as PolicyType;

/// Result of presenting a tag to a set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The tag was resident.
    Hit,
    /// The tag was installed, displacing `victim` if the slot was occupied.
    Miss {
        /// Tag evicted to make room.
        victim: Option<u64>,
    },
}

impl AccessOutcome {
    /// Returns `true` for [`AccessOutcome::Hit`].
    #[inline(always)]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// Trait for cache organizations.
pub trait ReplacementPolicy {
    /// Looks `tag` up in `set`. On a miss the tag is installed, evicting a
    /// resident tag if the set is full.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `tag` - The address tag.
    fn access(&mut self, set: usize, tag: u64) -> AccessOutcome;

    /// Drops every resident tag and resets recency state.
    fn flush(&mut self);

    /// Number of resident lines.
    fn occupied(&self) -> usize;
}

/// Way-indexed tag storage shared by the array-based policies.
///
/// Tracks per-way valid bits and a per-set "all valid" flag. While a set has
/// never been full, misses scan for an invalid way; once the flag is raised
/// the scan is skipped and the policy's steady-state victim choice applies.
#[derive(Clone, Debug)]
pub(crate) struct TagArray {
    tags: Vec<u64>,
    valid: BitVec,
    all_valid: BitVec,
    assoc: usize,
}

impl TagArray {
    pub(crate) fn new(sets: usize, assoc: usize) -> Self {
        Self {
            tags: vec![0; sets * assoc],
            valid: bitvec![0; sets * assoc],
            all_valid: bitvec![0; sets],
            assoc,
        }
    }

    #[inline(always)]
    pub(crate) const fn assoc(&self) -> usize {
        self.assoc
    }

    /// Way holding `tag` in `set`.
    #[inline]
    pub(crate) fn find(&self, set: usize, tag: u64) -> Option<usize> {
        let base = set * self.assoc;
        (0..self.assoc).find(|&w| self.valid[base + w] && self.tags[base + w] == tag)
    }

    /// First invalid way of a set that has not yet filled. Raises the set's
    /// "all valid" flag when the scan comes up empty.
    pub(crate) fn empty_way(&mut self, set: usize) -> Option<usize> {
        if self.all_valid[set] {
            return None;
        }
        let base = set * self.assoc;
        let way = (0..self.assoc).find(|&w| !self.valid[base + w]);
        if way.is_none() {
            self.all_valid.set(set, true);
        }
        way
    }

    /// Writes `tag` into `way`, returning the tag it displaced.
    pub(crate) fn install(&mut self, set: usize, way: usize, tag: u64) -> Option<u64> {
        let slot = set * self.assoc + way;
        let old = self.valid[slot].then_some(self.tags[slot]);
        self.tags[slot] = tag;
        self.valid.set(slot, true);
        old
    }

    pub(crate) fn clear(&mut self) {
        self.valid.fill(false);
        self.all_valid.fill(false);
    }

    pub(crate) fn occupied(&self) -> usize {
        self.valid.count_ones()
    }
}

/// Enum wrapper for static dispatch of cache organizations.
#[derive(Debug)]
pub enum CachePolicy {
    /// Direct-mapped.
    DirectMapped(DirectMappedPolicy),
    /// Fully associative, true LRU.
    FullAssocLru(FullAssocLruPolicy),
    /// Fully associative, random.
    FullAssocRandom(FullAssocRandomPolicy),
    /// Set associative, true LRU.
    SetAssocLru(SetAssocLruPolicy),
    /// Set associative, random.
    SetAssocRandom(SetAssocRandomPolicy),
    /// Packed tree pseudo-LRU.
    PlruLowAssoc(PlruLowAssocPolicy),
    /// Byte-per-node tree pseudo-LRU.
    PlruHighAssoc(PlruHighAssocPolicy),
    /// Instruction-clocked exact LRU.
    TimestampLru(TimestampLruPolicy),
}

impl CachePolicy {
    /// Builds the state for `kind` over an already validated geometry.
    pub fn new(
        kind: PolicyType,
        sets: usize,
        assoc: usize,
        seed: u64,
        icnt: InstructionCounter,
    ) -> Self {
        match kind {
            PolicyType::DirectMapped => Self::DirectMapped(DirectMappedPolicy::new(sets)),
            PolicyType::FullAssocLru => Self::FullAssocLru(FullAssocLruPolicy::new(assoc)),
            PolicyType::FullAssocRandom => {
                Self::FullAssocRandom(FullAssocRandomPolicy::new(assoc, seed))
            }
            PolicyType::SetAssocLru => Self::SetAssocLru(SetAssocLruPolicy::new(sets, assoc)),
            PolicyType::SetAssocRandom => {
                Self::SetAssocRandom(SetAssocRandomPolicy::new(sets, assoc, seed))
            }
            PolicyType::PlruLowAssoc => Self::PlruLowAssoc(PlruLowAssocPolicy::new(sets, assoc)),
            PolicyType::PlruHighAssoc => {
                Self::PlruHighAssoc(PlruHighAssocPolicy::new(sets, assoc))
            }
            PolicyType::TimestampLru => {
                Self::TimestampLru(TimestampLruPolicy::new(sets, assoc, icnt))
            }
        }
    }

    /// Per-depth hit counts, kept only by the fully associative LRU cache.
    pub fn hit_depths(&self) -> Option<&[u64]> {
        match self {
            Self::FullAssocLru(p) => Some(p.hit_depths()),
            _ => None,
        }
    }
}

impl ReplacementPolicy for CachePolicy {
    #[inline(always)]
    fn access(&mut self, set: usize, tag: u64) -> AccessOutcome {
        match self {
            Self::DirectMapped(p) => p.access(set, tag),
            Self::FullAssocLru(p) => p.access(set, tag),
            Self::FullAssocRandom(p) => p.access(set, tag),
            Self::SetAssocLru(p) => p.access(set, tag),
            Self::SetAssocRandom(p) => p.access(set, tag),
            Self::PlruLowAssoc(p) => p.access(set, tag),
            Self::PlruHighAssoc(p) => p.access(set, tag),
            Self::TimestampLru(p) => p.access(set, tag),
        }
    }

    fn flush(&mut self) {
        match self {
            Self::DirectMapped(p) => p.flush(),
            Self::FullAssocLru(p) => p.flush(),
            Self::FullAssocRandom(p) => p.flush(),
            Self::SetAssocLru(p) => p.flush(),
            Self::SetAssocRandom(p) => p.flush(),
            Self::PlruLowAssoc(p) => p.flush(),
            Self::PlruHighAssoc(p) => p.flush(),
            Self::TimestampLru(p) => p.flush(),
        }
    }

    fn occupied(&self) -> usize {
        match self {
            Self::DirectMapped(p) => p.occupied(),
            Self::FullAssocLru(p) => p.occupied(),
            Self::FullAssocRandom(p) => p.occupied(),
            Self::SetAssocLru(p) => p.occupied(),
            Self::SetAssocRandom(p) => p.occupied(),
            Self::PlruLowAssoc(p) => p.occupied(),
            Self::PlruHighAssoc(p) => p.occupied(),
            Self::TimestampLru(p) => p.occupied(),
        }
    }
}
