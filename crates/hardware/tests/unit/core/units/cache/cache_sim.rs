//! Cache Level Unit Tests.
//!
//! Verifies a single cache level built from `CacheConfig`: address
//! decomposition, hit/miss accounting split by operation, geometry
//! validation, flushing and the single-level AMAT.

use bpsim_core::common::{AccessType, ConfigError, InstructionCounter};
use bpsim_core::config::{CacheConfig, ReplacementPolicy as PolicyType};
use bpsim_core::core::units::cache::{
    AddressParts, Cache, Geometry, MAX_GEOMETRY_BITS, MEMORY_LATENCY,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{cache, replay};

// ══════════════════════════════════════════════════════════
// 1. Address Decomposition
// ══════════════════════════════════════════════════════════

/// Offset, set and tag come from the low, middle and high address bits.
#[test]
fn index_splits_address() {
    let c = cache(&CacheConfig::default());
    assert_eq!(
        c.index(0x12345),
        AddressParts {
            set: 0x34,
            tag: 0x48,
            offset: 0x5,
        }
    );
}

/// Geometry reports total capacity and line count.
#[test]
fn geometry_totals() {
    let c = cache(&CacheConfig::new(64, 4, 128));
    let g = c.geometry();
    assert_eq!(g.total_bytes(), 32 * 1024);
    assert_eq!(g.lines(), 512);
    assert_eq!(g.line_base(0x1234), 0x1200);
}

// ══════════════════════════════════════════════════════════
// 2. Hit/Miss Accounting
// ══════════════════════════════════════════════════════════

/// Four distinct lines then a repeat: one hit, four misses.
#[rstest]
#[case(4)]
#[case(64)]
fn direct_mapped_sequence(#[case] sets: usize) {
    let mut c = cache(&CacheConfig::new(16, 1, sets));
    let pattern = replay(&mut c, &[0, 16, 32, 48, 0]);

    assert_eq!(pattern, vec![false, false, false, false, true]);
    assert_eq!(c.hits(), 1);
    assert_eq!(c.misses(), 4);
    assert_eq!(c.accesses(), 5);
    assert_eq!(c.policy_kind(), PolicyType::DirectMapped);
}

/// Two addresses one cache-size apart conflict in a direct-mapped cache.
#[test]
fn direct_mapped_conflict() {
    let mut c = cache(&CacheConfig::default());
    let pattern = replay(&mut c, &[0, 1024, 0, 1024]);
    assert_eq!(pattern, vec![false; 4]);
    assert_eq!(c.occupied_lines(), 1);
}

/// Bytes within one line share it.
#[test]
fn same_line_hits() {
    let mut c = cache(&CacheConfig::default());
    let pattern = replay(&mut c, &[0x100, 0x104, 0x10f, 0x110]);
    assert_eq!(pattern, vec![false, true, true, false]);
}

/// Reads and writes are counted separately.
#[test]
fn read_write_split() {
    let mut c = cache(&CacheConfig::default());
    let _ = c.read(0x40, 4);
    let _ = c.write(0x40, 4);
    let _ = c.write(0x80, 8);
    let _ = c.access(0x80, 8, AccessType::Read);

    assert_eq!(c.hits_for(AccessType::Read), 1);
    assert_eq!(c.misses_for(AccessType::Read), 1);
    assert_eq!(c.hits_for(AccessType::Write), 1);
    assert_eq!(c.misses_for(AccessType::Write), 1);
}

/// Rates are undefined before the first access.
#[test]
fn rates_undefined_when_idle() {
    let c = cache(&CacheConfig::default());
    assert_eq!(c.hit_rate(), None);
    assert_eq!(c.miss_rate(), None);
}

/// flush empties the cache but keeps the counters.
#[test]
fn flush_keeps_counters() {
    let mut c = cache(&CacheConfig::new(16, 2, 4));
    let _ = replay(&mut c, &[0, 16, 0]);
    c.flush();
    assert_eq!(c.occupied_lines(), 0);
    assert_eq!((c.hits(), c.misses()), (1, 2));
    assert!(!c.read(0, 4), "flushed line must miss");
}

// ══════════════════════════════════════════════════════════
// 3. AMAT
// ══════════════════════════════════════════════════════════

/// A level that never missed costs exactly its latency.
#[test]
fn amat_without_misses_is_latency() {
    let c = cache(&CacheConfig::default().with_latency(3));
    assert_eq!(c.amat(), 3.0);
}

/// One miss in four: latency × 0.75 + memory × 0.25.
#[test]
fn amat_blends_memory_latency() {
    let mut c = cache(&CacheConfig::default().with_latency(2));
    let _ = replay(&mut c, &[0, 0, 0, 0]);
    assert_eq!(c.miss_rate(), Some(0.25));
    assert_eq!(c.amat(), 2.0 * 0.75 + MEMORY_LATENCY * 0.25);
    assert_eq!(c.amat_with(10.0), 2.0 * 0.75 + 10.0 * 0.25);
}

// ══════════════════════════════════════════════════════════
// 4. Validation
// ══════════════════════════════════════════════════════════

/// Non power-of-two geometry names the offending parameter.
#[rstest]
#[case(CacheConfig::new(24, 1, 64), "line_bytes", 24)]
#[case(CacheConfig::new(16, 1, 48), "sets", 48)]
#[case(CacheConfig::new(16, 3, 64), "ways", 3)]
fn rejects_non_power_of_two(
    #[case] config: CacheConfig,
    #[case] parameter: &'static str,
    #[case] value: usize,
) {
    let err = Cache::new(&config, InstructionCounter::new()).expect_err("invalid geometry");
    assert_eq!(
        err,
        ConfigError::NotPowerOfTwo {
            name: "l1D".to_string(),
            parameter,
            value,
        }
    );
}

/// Geometries wider than the address are rejected before any table is built.
#[rstest]
#[case(1 << 40, 1, 1 << 24, 64)]
#[case(1 << 32, 1 << 16, 1 << 16, 64)]
#[case(1 << 32, 1 << 31, 2, 64)]
fn rejects_geometry_wider_than_address(
    #[case] line_bytes: usize,
    #[case] ways: usize,
    #[case] sets: usize,
    #[case] bits: u32,
) {
    let err = Geometry::new("l2", line_bytes, ways, sets).expect_err("too wide");
    assert_eq!(
        err,
        ConfigError::AddressWidth {
            name: "l2".to_string(),
            bits,
            max: MAX_GEOMETRY_BITS,
        }
    );
}

/// The widest accepted geometry still splits the top address bit into the tag.
#[test]
fn widest_geometry_indexes_without_overflow() {
    let g = Geometry::new("l2", 1 << 32, 1, 1 << 31).expect("63 bits fit");
    assert_eq!(g.total_bytes(), 1 << 63);
    let parts = g.index(u64::MAX);
    assert_eq!(parts.tag, 1);
    assert_eq!(parts.set, (1 << 31) - 1);
    assert_eq!(parts.offset, u64::from(u32::MAX));
}

/// Organizations reject associativities they cannot represent.
#[rstest]
#[case(CacheConfig::new(16, 2, 64).with_policy(PolicyType::DirectMapped), 2)]
#[case(CacheConfig::new(16, 128, 4).with_policy(PolicyType::PlruLowAssoc), 128)]
fn rejects_associativity(#[case] config: CacheConfig, #[case] assoc: usize) {
    let err = Cache::new(&config, InstructionCounter::new()).expect_err("bad associativity");
    assert!(matches!(err, ConfigError::InvalidAssociativity { assoc: a, .. } if a == assoc));
}

/// The byte-per-node PLRU has no associativity limit.
#[test]
fn high_assoc_plru_accepts_wide_sets() {
    let config = CacheConfig::new(16, 128, 4).with_policy(PolicyType::PlruHighAssoc);
    assert!(Cache::new(&config, InstructionCounter::new()).is_ok());
}

/// Fully associative organizations fold every line into one set.
#[rstest]
#[case(PolicyType::FullAssocLru)]
#[case(PolicyType::FullAssocRandom)]
fn full_assoc_folds_sets(#[case] policy: PolicyType) {
    let c = cache(&CacheConfig::new(16, 4, 8).with_policy(policy));
    assert_eq!(c.geometry().assoc, 32);
    assert_eq!(c.geometry().sets, 1);
    assert_eq!(c.geometry().total_bytes(), 16 * 32);
}
