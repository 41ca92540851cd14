//! Predictor Dispatch Tests.
//!
//! Verifies that the wrapper builds the configured predictor, rejects
//! out-of-range table sizes, and keeps the shared statistics invariants for
//! every predictor on arbitrary branch streams.

use bpsim_core::common::{ConfigError, HistoryRegister, InstructionCounter};
use bpsim_core::config::PredictorKind;
use bpsim_core::core::units::bru::{BranchPredictor, BranchPredictorWrapper};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::predictor_config;

/// Each kind builds the matching predictor.
#[rstest]
#[case(PredictorKind::GShare, "gshare", 0)]
#[case(PredictorKind::Bimodal, "bimodal", 0)]
#[case(PredictorKind::GTagged, "gtagged", 0)]
#[case(PredictorKind::UberHistory, "uberhistory", 0)]
#[case(PredictorKind::Tage, "tage", 256)]
fn builds_configured_kind(
    #[case] kind: PredictorKind,
    #[case] name: &str,
    #[case] history: usize,
) {
    let bp = BranchPredictorWrapper::new(&predictor_config(kind), InstructionCounter::new())
        .expect("valid configuration");
    assert_eq!(bp.kind(), kind);
    assert_eq!(bp.name(), name);
    assert_eq!(bp.needed_history_length(), history);
    assert_eq!(bp.stats().branches, 0);
}

/// Table sizes of zero or above the limit are rejected.
#[rstest]
#[case(PredictorKind::GShare, 0)]
#[case(PredictorKind::Bimodal, 31)]
#[case(PredictorKind::UberHistory, 0)]
#[case(PredictorKind::Tage, 40)]
fn rejects_table_size(#[case] kind: PredictorKind, #[case] lg: u32) {
    let mut config = predictor_config(kind);
    config.lg_pht_entries = lg;
    let err = BranchPredictorWrapper::new(&config, InstructionCounter::new())
        .expect_err("out-of-range table size");
    assert!(matches!(err, ConfigError::TableSize { lg: l, .. } if l == lg));
}

/// gtagged has no fixed table and ignores the size parameter.
#[test]
fn gtagged_ignores_table_size() {
    let mut config = predictor_config(PredictorKind::GTagged);
    config.lg_pht_entries = 0;
    assert!(BranchPredictorWrapper::new(&config, InstructionCounter::new()).is_ok());
}

/// Utilization reports name every table of the predictor.
#[rstest]
#[case(PredictorKind::GShare, &["pht"])]
#[case(PredictorKind::Bimodal, &["choice", "not_taken", "taken"])]
#[case(PredictorKind::GTagged, &[])]
#[case(PredictorKind::UberHistory, &["history"])]
#[case(PredictorKind::Tage, &["base", "tagged[256]", "tagged[128]", "tagged[64]"])]
fn utilization_tables(#[case] kind: PredictorKind, #[case] tables: &[&str]) {
    let bp = BranchPredictorWrapper::new(&predictor_config(kind), InstructionCounter::new())
        .expect("valid configuration");
    let names: Vec<_> = bp.utilization().iter().map(|u| u.table).collect();
    assert_eq!(names, tables);
    bp.log_utilization();
}

fn kind() -> impl Strategy<Value = PredictorKind> {
    proptest::sample::select(PredictorKind::NAMES.map(|(_, k)| k).to_vec())
}

proptest! {
    /// Mispredicts never exceed branches, and the per-address histogram
    /// accounts for every mispredict.
    #[test]
    fn mispredicts_bounded_by_branches(
        kind in kind(),
        stream in proptest::collection::vec((0u64..64, any::<bool>()), 1..200),
    ) {
        let mut bp = BranchPredictorWrapper::new(&predictor_config(kind), InstructionCounter::new())
            .expect("valid configuration");
        let mut ghr = HistoryRegister::new(bp.needed_history_length().max(64));
        for &(slot, taken) in &stream {
            let pc = 0x1000 + slot * 4;
            let p = bp.predict(pc, &ghr);
            bp.update(pc, p.key, p.taken, taken, &ghr);
            ghr.push(taken);
        }
        let stats = bp.stats();
        prop_assert_eq!(stats.branches, stream.len() as u64);
        prop_assert!(stats.mispredicts <= stats.branches);
        prop_assert_eq!(stats.mispredict_histogram.values().sum::<u64>(), stats.mispredicts);
    }

    /// predict is a pure read: repeating it gives the same answer.
    #[test]
    fn predict_is_pure(kind in kind(), pc in any::<u64>(), bits in any::<u64>()) {
        let bp = BranchPredictorWrapper::new(&predictor_config(kind), InstructionCounter::new())
            .expect("valid configuration");
        let mut ghr = HistoryRegister::new(256);
        for i in 0..64 {
            ghr.push((bits >> i) & 1 == 1);
        }
        prop_assert_eq!(bp.predict(pc, &ghr), bp.predict(pc, &ghr));
    }
}
