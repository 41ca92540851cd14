//! Report Rendering Tests.
//!
//! Verifies the predictor and cache summaries, the `n/a` rendering of
//! undefined ratios, section selection, and the ordering of the mispredict
//! histogram dump.

use std::collections::BTreeMap;

use bpsim_core::common::{HistoryRegister, InstructionCounter};
use bpsim_core::config::{CacheConfig, PredictorKind};
use bpsim_core::core::units::bru::{BranchPredictor, BranchPredictorWrapper};
use bpsim_core::core::units::cache::CacheHierarchy;
use bpsim_core::stats::{
    CacheReport, HierarchyReport, PredictorReport, STATS_SECTIONS, write_mispredict_histogram,
    write_sections,
};
use pretty_assertions::assert_eq;

use crate::common::{cache, predictor_config, replay};

fn gshare(icnt: &InstructionCounter) -> BranchPredictorWrapper {
    BranchPredictorWrapper::new(&predictor_config(PredictorKind::GShare), icnt.clone())
        .expect("valid configuration")
}

/// An idle predictor reports undefined ratios.
#[test]
fn predictor_report_idle() {
    let bp = gshare(&InstructionCounter::new());
    assert_eq!(
        PredictorReport(&bp).to_string(),
        "gshare\n\
         n/a% of branches predicted correctly\n\
         n/a mispredicts per kilo insn\n"
    );
}

/// Accuracy is a percentage; MPKI scales by retired instructions.
#[test]
fn predictor_report_rates() {
    let icnt = InstructionCounter::new();
    let mut bp = gshare(&icnt);
    let ghr = HistoryRegister::new(64);
    for taken in [true, true, true, true] {
        let p = bp.predict(0x1000, &ghr);
        bp.update(0x1000, p.key, p.taken, taken, &ghr);
    }
    icnt.advance(1000);
    assert_eq!(
        PredictorReport(&bp).to_string(),
        "gshare\n\
         50.0000% of branches predicted correctly\n\
         2.0000 mispredicts per kilo insn\n"
    );
}

/// A cache report lists geometry then counters.
#[test]
fn cache_report_fields() {
    let mut c = cache(&CacheConfig::default());
    let _ = replay(&mut c, &[0, 16, 32, 48, 0]);
    let _ = c.write(0, 4);
    assert_eq!(
        CacheReport(&c).to_string(),
        "l1D:\n\
         total_cache_size = 1024\n\
         bytes_per_line = 16\n\
         assoc = 1\n\
         num_sets = 64\n\
         hit_rate = 0.3333\n\
         total_access = 6\n\
         hits = 2\n\
         misses = 4\n\
         read_hits = 1\n\
         read_misses = 4\n\
         write_hits = 1\n\
         write_misses = 0\n"
    );
}

/// An idle cache has no hit rate.
#[test]
fn cache_report_idle() {
    let c = cache(&CacheConfig::default());
    assert!(CacheReport(&c).to_string().contains("hit_rate = n/a\n"));
}

/// Reuse-distance rows follow the counters when enabled.
#[test]
fn cache_report_stack_rows() {
    let mut c = cache(&CacheConfig::new(16, 1, 1).with_stack_distance());
    let _ = replay(&mut c, &[0, 0]);
    let report = CacheReport(&c).to_string();
    assert!(report.ends_with("write_misses = 0\n0,1,1\n1,0,0\n2,0,0\n3,0,0\n"));
}

/// The hierarchy report lists every level then the overall AMAT.
#[test]
fn hierarchy_report_order() {
    let h = CacheHierarchy::new(
        &[
            CacheConfig::default().named("L1"),
            CacheConfig::new(64, 4, 64).named("L2"),
        ],
        &InstructionCounter::new(),
    )
    .expect("valid hierarchy");
    let report = HierarchyReport(&h).to_string();
    let l1 = report.find("L1:").expect("L1 section");
    let l2 = report.find("L2:").expect("L2 section");
    assert!(l1 < l2);
    assert!(report.ends_with("amat = 1.0000\n"));
}

/// An empty hierarchy renders nothing.
#[test]
fn hierarchy_report_empty() {
    assert_eq!(HierarchyReport(&CacheHierarchy::default()).to_string(), "");
}

/// Section filters select parts of the report.
#[test]
fn sections_filter() {
    let bp = gshare(&InstructionCounter::new());
    let h = CacheHierarchy::new(&[CacheConfig::default()], &InstructionCounter::new())
        .expect("valid hierarchy");

    let mut all = Vec::new();
    write_sections(&mut all, &bp, &h, &[]).expect("write to vec");
    let mut both = Vec::new();
    write_sections(&mut both, &bp, &h, STATS_SECTIONS).expect("write to vec");
    assert_eq!(all, both);

    let mut branch = Vec::new();
    write_sections(&mut branch, &bp, &h, &["branch"]).expect("write to vec");
    let branch = String::from_utf8(branch).expect("utf-8");
    assert!(branch.starts_with("gshare\n"));
    assert!(!branch.contains("l1D:"));
}

/// Addresses are written in hex, most mispredicted first; equal counts
/// put the higher address first.
#[test]
fn mispredict_histogram_order() {
    let histogram = BTreeMap::from([(0x10, 2), (0x20, 5), (0x30, 2), (0xabc, 1)]);
    let mut out = Vec::new();
    write_mispredict_histogram(&mut out, &histogram).expect("write to vec");
    assert_eq!(
        String::from_utf8(out).expect("utf-8"),
        "20:5\n30:2\n10:2\nabc:1\n"
    );
}
