//! Cache Hierarchy Tests.
//!
//! Verifies miss forwarding between levels, operation-type propagation,
//! the disabled (empty) hierarchy, and multi-level AMAT.

use bpsim_core::common::{AccessType, ConfigError, InstructionCounter};
use bpsim_core::config::CacheConfig;
use bpsim_core::core::units::cache::{CacheHierarchy, MEMORY_LATENCY};
use pretty_assertions::assert_eq;

/// 16-byte direct-mapped L1 with 4 sets over a 64-byte, 4-way L2.
fn two_levels() -> CacheHierarchy {
    CacheHierarchy::new(
        &[
            CacheConfig::new(16, 1, 4).named("L1").with_latency(1),
            CacheConfig::new(64, 4, 4).named("L2").with_latency(10),
        ],
        &InstructionCounter::new(),
    )
    .expect("valid hierarchy")
}

/// Only L1 misses reach L2, as line-aligned accesses.
#[test]
fn misses_forward_downward() {
    let mut h = two_levels();
    assert!(!h.read(0x4, 4));
    assert!(h.read(0x8, 4));
    assert!(!h.read(0x10, 4));

    let l1 = h.level(0).expect("L1");
    let l2 = h.level(1).expect("L2");
    assert_eq!((l1.hits(), l1.misses()), (1, 2));
    assert_eq!(l2.accesses(), 2);
    assert_eq!((l2.hits(), l2.misses()), (1, 1), "0x10 shares L2's 64-byte line");
}

/// The forwarded access keeps its operation type.
#[test]
fn forwarding_keeps_operation() {
    let mut h = two_levels();
    assert!(!h.write(0x100, 8));
    let l2 = h.level(1).expect("L2");
    assert_eq!(l2.misses_for(AccessType::Write), 1);
    assert_eq!(l2.misses_for(AccessType::Read), 0);
}

/// A level evicted above can still hit below.
#[test]
fn lower_level_catches_conflicts() {
    let mut h = two_levels();
    // 0x0 and 0x40 conflict in L1 set 0 but coexist in L2.
    for addr in [0x0, 0x40, 0x0, 0x40] {
        let _ = h.read(addr, 4);
    }
    let l1 = h.level(0).expect("L1");
    let l2 = h.level(1).expect("L2");
    assert_eq!(l1.misses(), 4);
    assert_eq!((l2.hits(), l2.misses()), (2, 2));
}

/// An empty hierarchy accepts accesses and reports misses.
#[test]
fn empty_hierarchy_is_disabled() {
    let mut h = CacheHierarchy::default();
    assert!(h.is_empty());
    assert!(!h.read(0x1000, 4));
    assert!(!h.write(0x1000, 4));
    assert_eq!(h.amat(), MEMORY_LATENCY);
}

/// AMAT nests each level's miss rate around the level below.
#[test]
fn amat_nests_levels() {
    let mut h = two_levels();
    for addr in [0x4, 0x8, 0x10] {
        let _ = h.read(addr, 4);
    }
    let l2_amat = 10.0 * 0.5 + MEMORY_LATENCY * 0.5;
    assert!((h.amat_from(1) - l2_amat).abs() < 1e-9);

    let expected = 1.0 / 3.0 + (2.0 / 3.0) * l2_amat;
    assert!((h.amat() - expected).abs() < 1e-9);
    assert_eq!(h.amat_from(2), MEMORY_LATENCY);
}

/// flush clears every level.
#[test]
fn flush_all_levels() {
    let mut h = two_levels();
    let _ = h.read(0x0, 4);
    h.flush();
    assert!(h.levels().iter().all(|l| l.occupied_lines() == 0));
    assert_eq!(h.len(), 2);
}

/// A bad level aborts construction with its error.
#[test]
fn bad_level_rejected() {
    let err = CacheHierarchy::new(
        &[
            CacheConfig::new(16, 1, 4).named("L1"),
            CacheConfig::new(16, 4, 6).named("L2"),
        ],
        &InstructionCounter::new(),
    )
    .expect_err("non power-of-two sets");
    assert!(matches!(err, ConfigError::NotPowerOfTwo { ref name, .. } if name == "L2"));
}
