//! Simulation Context Tests.
//!
//! Drives `SimContext` the way an interpreter would: predict, resolve,
//! retire, read and write, then report and shut down.

use bpsim_core::common::ConfigError;
use bpsim_core::config::{CacheConfig, Config, PredictorKind};
use bpsim_core::core::units::bru::BranchPredictor;
use bpsim_core::SimContext;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tracing_subscriber::EnvFilter;

use crate::common::branch_only;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// The history register is sized to the larger of the configured length
/// and what the predictor reads.
#[rstest]
#[case(PredictorKind::Tage, 64, 256)]
#[case(PredictorKind::GShare, 64, 64)]
#[case(PredictorKind::GShare, 100, 100)]
#[case(PredictorKind::GTagged, 0, 1)]
fn history_length(#[case] kind: PredictorKind, #[case] configured: usize, #[case] len: usize) {
    let mut config = branch_only(kind);
    config.predictor.history_length = configured;
    let ctx = SimContext::from_config(&config).expect("valid configuration");
    assert_eq!(ctx.history().len(), len);
}

/// resolve trains the predictor before shifting the outcome in.
#[test]
fn resolve_shifts_history_after_update() {
    let mut ctx = SimContext::from_config(&branch_only(PredictorKind::GShare))
        .expect("valid configuration");
    let p = ctx.predict(0x1000);
    assert_eq!(p.key, 0x400 & 0x3ff);
    ctx.resolve(0x1000, p, true);

    assert_eq!(ctx.history().get(0), Some(true));
    assert_eq!(ctx.predictor().stats().branches, 1);
    assert_eq!(ctx.predictor().stats().mispredicts, 1);
    assert_eq!(ctx.predict(0x1000).key, (0x400 ^ 1) & 0x3ff);
}

/// A loop branch taken nine times then not taken is learned by gshare.
#[test]
fn loop_branch_learned() {
    let mut ctx = SimContext::from_config(&branch_only(PredictorKind::GShare))
        .expect("valid configuration");
    for _ in 0..200 {
        for i in 0..10 {
            let _ = ctx.branch(0x2000, i != 9);
            ctx.retire(5);
        }
    }
    let stats = ctx.predictor().stats();
    assert_eq!(stats.branches, 2000);
    assert_eq!(stats.instructions(), 10_000);
    assert!(stats.accuracy().expect("branches seen") > 0.9);
}

/// With no cache levels the memory model is disabled.
#[test]
fn no_caches_accepts_accesses() {
    let mut ctx = SimContext::from_config(&branch_only(PredictorKind::Bimodal))
        .expect("valid configuration");
    assert!(!ctx.read(0x1000, 4));
    assert!(!ctx.write(0x1000, 4));
    assert!(ctx.caches().is_empty());
}

/// Reads and writes reach the top-level cache.
#[test]
fn accesses_reach_cache() {
    let mut ctx = SimContext::from_config(&Config::with_default_l1()).expect("valid configuration");
    assert!(!ctx.read(0x40, 4));
    assert!(ctx.write(0x44, 4));
    let l1 = ctx.caches().level(0).expect("L1");
    assert_eq!((l1.hits(), l1.misses()), (1, 1));
}

/// Configuration errors surface from construction.
#[test]
fn construction_errors() {
    let mut config = branch_only(PredictorKind::GShare);
    config.caches.push(CacheConfig::new(12, 1, 64));
    let err = SimContext::from_config(&config).expect_err("bad line size");
    assert!(matches!(err, ConfigError::NotPowerOfTwo { parameter: "line_bytes", .. }));

    let mut config = branch_only(PredictorKind::Tage);
    config.predictor.lg_pht_entries = 0;
    let err = SimContext::from_config(&config).expect_err("bad table size");
    assert!(matches!(err, ConfigError::TableSize { predictor: "tage", .. }));
}

/// shutdown returns the same text report writes.
#[test]
fn shutdown_matches_report() {
    init_tracing();
    let config = Config::from_json(
        r#"{
            "predictor": { "kind": "tage", "lg_pht_entries": 10 },
            "caches": [
                { "name": "L1", "ways": 1, "sets": 64 },
                { "name": "L2", "ways": 8, "sets": 1, "latency": 10 }
            ]
        }"#,
    )
    .expect("valid document");
    let mut ctx = SimContext::from_config(&config).expect("valid configuration");
    for i in 0..100u64 {
        let _ = ctx.branch(0x1000 + (i % 4) * 4, i % 3 == 0);
        let _ = ctx.read(i * 8, 4);
        ctx.retire(3);
    }

    let mut out = Vec::new();
    ctx.report(&mut out).expect("write to vec");
    let summary = ctx.shutdown();
    assert_eq!(String::from_utf8(out).expect("utf-8"), summary);
    assert!(summary.starts_with("tage\n"));
    assert!(summary.contains("L1:\n"));
    assert!(summary.contains("L2:\n"));
}

/// The mispredict dump lists every mispredicted branch.
#[test]
fn mispredict_dump() {
    let mut ctx = SimContext::from_config(&branch_only(PredictorKind::GTagged))
        .expect("valid configuration");
    let _ = ctx.branch(0x10, true);
    let _ = ctx.branch(0x20, true);
    let _ = ctx.branch(0x20, false);

    let mut out = Vec::new();
    ctx.write_mispredicts(&mut out).expect("write to vec");
    let dump = String::from_utf8(out).expect("utf-8");
    assert_eq!(dump.lines().count(), 2);
    assert!(dump.contains("10:1\n"));
}
