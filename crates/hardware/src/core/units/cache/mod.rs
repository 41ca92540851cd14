//! Cache Hierarchy Simulator.
//!
//! This module implements single-level cache models and the hierarchy that
//! chains them. A [`Cache`] decomposes addresses with shift/mask arithmetic
//! over power-of-two geometry, delegates residency to a [`CachePolicy`], and
//! keeps hit/miss counters split by operation. A [`CacheHierarchy`] owns the
//! levels in order and forwards line-aligned misses downward.

/// Level ordering, miss forwarding and AMAT.
pub mod hierarchy;

/// Pseudo-LRU binary tree arithmetic.
pub mod plru_tree;

/// Cache organizations and replacement policies.
pub mod policies;

/// Reuse-distance histograms.
pub mod stack_distance;

pub use self::hierarchy::CacheHierarchy;
pub use self::policies::{AccessOutcome, CachePolicy, ReplacementPolicy};
pub use self::stack_distance::{DistanceRow, StackDistance};

use tracing::{debug, trace};

use crate::common::{AccessType, ConfigError, InstructionCounter, error::Result};
use crate::config::{CacheConfig, ReplacementPolicy as PolicyType};

/// Miss penalty of the last level, in cycles.
pub const MEMORY_LATENCY: f64 = 100.0;

/// Largest `log2(line_bytes * sets * ways)` a geometry may have. Keeps the
/// tag shift and the byte total inside 64 bits.
pub const MAX_GEOMETRY_BITS: u32 = 63;

/// Stack-distance capacity as a multiple of the number of lines.
const STACK_DEPTH_FACTOR: usize = 4;

/// An address split into its cache coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressParts {
    /// Set index.
    pub set: usize,
    /// Tag above the set-index bits.
    pub tag: u64,
    /// Byte offset within the line.
    pub offset: u64,
}

/// Power-of-two cache geometry with its derived shift amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Line size in bytes.
    pub line_bytes: usize,
    /// Ways per set.
    pub assoc: usize,
    /// Number of sets.
    pub sets: usize,
    ln2_line: u32,
    ln2_sets: u32,
}

impl Geometry {
    /// Validates that every parameter is a power of two and that the whole
    /// cache fits below bit 63 of the address.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotPowerOfTwo`] naming the first bad parameter.
    /// - [`ConfigError::AddressWidth`] if line, set and way bits together
    ///   exceed [`MAX_GEOMETRY_BITS`].
    pub fn new(name: &str, line_bytes: usize, assoc: usize, sets: usize) -> Result<Self> {
        for (parameter, value) in [("line_bytes", line_bytes), ("sets", sets), ("ways", assoc)] {
            if !value.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo {
                    name: name.to_string(),
                    parameter,
                    value,
                });
            }
        }
        let (ln2_line, ln2_sets) = (line_bytes.trailing_zeros(), sets.trailing_zeros());
        let bits = ln2_line + ln2_sets + assoc.trailing_zeros();
        if bits > MAX_GEOMETRY_BITS {
            return Err(ConfigError::AddressWidth {
                name: name.to_string(),
                bits,
                max: MAX_GEOMETRY_BITS,
            });
        }
        Ok(Self {
            line_bytes,
            assoc,
            sets,
            ln2_line,
            ln2_sets,
        })
    }

    /// Total capacity in bytes.
    pub const fn total_bytes(&self) -> usize {
        self.line_bytes * self.assoc * self.sets
    }

    /// Total number of lines.
    pub const fn lines(&self) -> usize {
        self.assoc * self.sets
    }

    /// Splits `addr` into set, tag and byte offset.
    #[inline(always)]
    pub const fn index(&self, addr: u64) -> AddressParts {
        AddressParts {
            set: ((addr >> self.ln2_line) as usize) & (self.sets - 1),
            tag: addr >> (self.ln2_line + self.ln2_sets),
            offset: addr & (self.line_bytes as u64 - 1),
        }
    }

    /// Line number of `addr` (address with the offset bits shifted out).
    #[inline(always)]
    pub const fn line_of(&self, addr: u64) -> u64 {
        addr >> self.ln2_line
    }

    /// First byte of the line containing `addr`.
    #[inline(always)]
    pub const fn line_base(&self, addr: u64) -> u64 {
        addr & !(self.line_bytes as u64 - 1)
    }
}

/// Single cache level.
#[derive(Debug)]
pub struct Cache {
    name: String,
    geometry: Geometry,
    kind: PolicyType,
    /// Hit latency in cycles.
    pub latency: u64,
    policy: CachePolicy,
    hits: u64,
    misses: u64,
    rw_hits: [u64; 2],
    rw_misses: [u64; 2],
    stack: Option<StackDistance>,
}

impl Cache {
    /// Creates a cache level from its configuration.
    ///
    /// Fully associative organizations fold every configured line into a
    /// single set. The instruction counter is only read by the timestamp-LRU
    /// organization.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotPowerOfTwo`] if the line size, set count or
    ///   associativity is not a power of two.
    /// - [`ConfigError::AddressWidth`] if the geometry is wider than the
    ///   address.
    /// - [`ConfigError::InvalidAssociativity`] if a direct-mapped cache has
    ///   more than one way, or a packed PLRU cache has more than 64.
    pub fn new(config: &CacheConfig, icnt: InstructionCounter) -> Result<Self> {
        let kind = config.resolved_policy();
        let (assoc, sets) = if kind.is_fully_associative() {
            (config.ways.saturating_mul(config.sets), 1)
        } else {
            (config.ways, config.sets)
        };
        let geometry = Geometry::new(&config.name, config.line_bytes, assoc, sets)?;

        let bad_assoc = match kind {
            PolicyType::DirectMapped => assoc != 1,
            PolicyType::PlruLowAssoc => assoc > plru_tree::MAX_PACKED_WAYS,
            _ => false,
        };
        if bad_assoc {
            return Err(ConfigError::InvalidAssociativity {
                name: config.name.clone(),
                policy: kind.name(),
                assoc,
            });
        }

        debug!(
            name = %config.name,
            policy = kind.name(),
            line_bytes = geometry.line_bytes,
            assoc,
            sets,
            total_bytes = geometry.total_bytes(),
            "cache level"
        );

        Ok(Self {
            name: config.name.clone(),
            geometry,
            kind,
            latency: config.latency,
            policy: CachePolicy::new(kind, sets, assoc, config.seed, icnt),
            hits: 0,
            misses: 0,
            rw_hits: [0; 2],
            rw_misses: [0; 2],
            stack: config
                .stack_distance
                .then(|| StackDistance::new(geometry.lines() * STACK_DEPTH_FACTOR)),
        })
    }

    /// Level name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geometry after validation.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Organization in use.
    pub const fn policy_kind(&self) -> PolicyType {
        self.kind
    }

    /// Splits `addr` into set, tag and byte offset.
    #[inline(always)]
    pub const fn index(&self, addr: u64) -> AddressParts {
        self.geometry.index(addr)
    }

    /// Accesses this level only. Returns `true` on a hit.
    ///
    /// `num_bytes` is accepted for interface symmetry; accesses are assumed
    /// not to cross a line boundary.
    pub fn access(&mut self, addr: u64, _num_bytes: usize, op: AccessType) -> bool {
        let parts = self.geometry.index(addr);
        let outcome = self.policy.access(parts.set, parts.tag);
        let hit = outcome.is_hit();

        if hit {
            self.hits += 1;
            self.rw_hits[op.index()] += 1;
        } else {
            self.misses += 1;
            self.rw_misses[op.index()] += 1;
            if let AccessOutcome::Miss { victim: Some(tag) } = outcome {
                trace!(cache = %self.name, set = parts.set, victim = tag, "evict");
            }
        }

        if let Some(stack) = self.stack.as_mut() {
            stack.record(self.geometry.line_of(addr), hit);
        }
        hit
    }

    /// Shorthand for a read access to this level.
    pub fn read(&mut self, addr: u64, num_bytes: usize) -> bool {
        self.access(addr, num_bytes, AccessType::Read)
    }

    /// Shorthand for a write access to this level.
    pub fn write(&mut self, addr: u64, num_bytes: usize) -> bool {
        self.access(addr, num_bytes, AccessType::Write)
    }

    /// Invalidates every resident line. Counters are kept.
    pub fn flush(&mut self) {
        self.policy.flush();
    }

    /// Total hits.
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Total misses.
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Hits for one operation type.
    pub const fn hits_for(&self, op: AccessType) -> u64 {
        self.rw_hits[op.index()]
    }

    /// Misses for one operation type.
    pub const fn misses_for(&self, op: AccessType) -> u64 {
        self.rw_misses[op.index()]
    }

    /// Total accesses.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Miss ratio, or `None` before the first access.
    pub fn miss_rate(&self) -> Option<f64> {
        let total = self.accesses();
        (total != 0).then(|| self.misses as f64 / total as f64)
    }

    /// Hit ratio, or `None` before the first access.
    pub fn hit_rate(&self) -> Option<f64> {
        self.miss_rate().map(|r| 1.0 - r)
    }

    /// Average access time given the AMAT of the level below. A level that
    /// saw no accesses is treated as never missing.
    pub fn amat_with(&self, next_level: f64) -> f64 {
        let rate = self.miss_rate().unwrap_or(0.0);
        (self.latency as f64).mul_add(1.0 - rate, next_level * rate)
    }

    /// Average access time with main memory directly below this level.
    pub fn amat(&self) -> f64 {
        self.amat_with(MEMORY_LATENCY)
    }

    /// Number of resident lines.
    pub fn occupied_lines(&self) -> usize {
        self.policy.occupied()
    }

    /// Bytes currently held.
    pub fn occupied_bytes(&self) -> usize {
        self.occupied_lines() * self.geometry.line_bytes
    }

    /// Per-depth hit counts of a fully associative LRU cache.
    pub fn hit_depths(&self) -> Option<&[u64]> {
        self.policy.hit_depths()
    }

    /// Reuse-distance histograms, if enabled.
    pub const fn stack_distance(&self) -> Option<&StackDistance> {
        self.stack.as_ref()
    }
}
