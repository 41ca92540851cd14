//! Multi-level cache hierarchy.
//!
//! Levels are stored closest-to-core first; level `i + 1` is the next level
//! of level `i`. A miss at one level forwards a line-aligned, line-sized
//! access of the same type to the level below, so every level sees the
//! miss stream of the level above it.

use super::{Cache, MEMORY_LATENCY};
use crate::common::{AccessType, InstructionCounter, error::Result};
use crate::config::CacheConfig;

/// Ordered cache levels.
#[derive(Debug, Default)]
pub struct CacheHierarchy {
    levels: Vec<Cache>,
}

impl CacheHierarchy {
    /// Builds one level per configuration entry, closest to the core first.
    ///
    /// # Errors
    ///
    /// Returns the first level's construction error.
    pub fn new(configs: &[CacheConfig], icnt: &InstructionCounter) -> Result<Self> {
        let levels = configs
            .iter()
            .map(|c| Cache::new(c, icnt.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { levels })
    }

    /// Wraps already built levels.
    pub const fn from_levels(levels: Vec<Cache>) -> Self {
        Self { levels }
    }

    /// Levels in order.
    pub fn levels(&self) -> &[Cache] {
        &self.levels
    }

    /// Level `i`, if present.
    pub fn level(&self, i: usize) -> Option<&Cache> {
        self.levels.get(i)
    }

    /// Returns `true` if the hierarchy has no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Accesses the top level, forwarding misses downward. Returns whether
    /// the top level hit; an empty hierarchy reports a miss.
    pub fn access(&mut self, addr: u64, num_bytes: usize, op: AccessType) -> bool {
        access_levels(&mut self.levels, addr, num_bytes, op)
    }

    /// Read access at the top level.
    pub fn read(&mut self, addr: u64, num_bytes: usize) -> bool {
        self.access(addr, num_bytes, AccessType::Read)
    }

    /// Write access at the top level.
    pub fn write(&mut self, addr: u64, num_bytes: usize) -> bool {
        self.access(addr, num_bytes, AccessType::Write)
    }

    /// Flushes every level.
    pub fn flush(&mut self) {
        for level in &mut self.levels {
            level.flush();
        }
    }

    /// Average memory access time seen from level `i`. Must be called after
    /// the run since it reads the final counters.
    pub fn amat_from(&self, i: usize) -> f64 {
        self.levels
            .get(i..)
            .unwrap_or_default()
            .iter()
            .rev()
            .fold(MEMORY_LATENCY, |next, level| level.amat_with(next))
    }

    /// Average memory access time seen from the top level.
    pub fn amat(&self) -> f64 {
        self.amat_from(0)
    }
}

fn access_levels(levels: &mut [Cache], addr: u64, num_bytes: usize, op: AccessType) -> bool {
    let Some((cache, below)) = levels.split_first_mut() else {
        return false;
    };
    let hit = cache.access(addr, num_bytes, op);
    if !hit && !below.is_empty() {
        let g = cache.geometry();
        let _ = access_levels(below, g.line_base(addr), g.line_bytes, op);
    }
    hit
}
