//! Statistics reporting.
//!
//! This module renders the end-of-run summaries. It provides:
//! 1. **Branch prediction:** Type name, accuracy, and mispredicts per kilo-instruction.
//! 2. **Cache hierarchy:** Geometry, hit/miss counts split by read/write, and
//!    optional reuse-distance rows for every level, top level first.
//! 3. **Mispredict histogram:** Per-address mispredict counts sorted by frequency.
//!
//! Ratios with a zero denominator render as `n/a`.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

use itertools::Itertools;

use crate::common::AccessType;
use crate::core::units::bru::BranchPredictor;
use crate::core::units::cache::{Cache, CacheHierarchy};

/// Section names for selective report output.
///
/// Pass an empty slice to [`write_sections`] to write every section.
pub const STATS_SECTIONS: &[&str] = &["branch", "memory"];

/// Formats an optional ratio, printing `n/a` when it is undefined.
struct Ratio(Option<f64>);

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.4}"),
            None => f.write_str("n/a"),
        }
    }
}

/// Branch predictor summary.
#[derive(Debug)]
pub struct PredictorReport<'a, P: ?Sized>(pub &'a P);

impl<P: BranchPredictor + ?Sized> fmt::Display for PredictorReport<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0.stats();
        writeln!(f, "{}", self.0.name())?;
        writeln!(
            f,
            "{}% of branches predicted correctly",
            Ratio(stats.accuracy().map(|a| 100.0 * a))
        )?;
        writeln!(f, "{} mispredicts per kilo insn", Ratio(stats.mpki()))
    }
}

/// Summary of a single cache level.
#[derive(Debug)]
pub struct CacheReport<'a>(pub &'a Cache);

impl fmt::Display for CacheReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        let g = c.geometry();
        writeln!(f, "{}:", c.name())?;
        writeln!(f, "total_cache_size = {}", g.total_bytes())?;
        writeln!(f, "bytes_per_line = {}", g.line_bytes)?;
        writeln!(f, "assoc = {}", g.assoc)?;
        writeln!(f, "num_sets = {}", g.sets)?;
        writeln!(f, "hit_rate = {}", Ratio(c.hit_rate()))?;
        writeln!(f, "total_access = {}", c.accesses())?;
        writeln!(f, "hits = {}", c.hits())?;
        writeln!(f, "misses = {}", c.misses())?;
        writeln!(f, "read_hits = {}", c.hits_for(AccessType::Read))?;
        writeln!(f, "read_misses = {}", c.misses_for(AccessType::Read))?;
        writeln!(f, "write_hits = {}", c.hits_for(AccessType::Write))?;
        writeln!(f, "write_misses = {}", c.misses_for(AccessType::Write))?;
        if let Some(stack) = c.stack_distance() {
            for row in stack.rows() {
                writeln!(f, "{},{},{}", row.depth, row.hits, row.total)?;
            }
        }
        Ok(())
    }
}

/// Summary of every level, top level first.
#[derive(Debug)]
pub struct HierarchyReport<'a>(pub &'a CacheHierarchy);

impl fmt::Display for HierarchyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in self.0.levels() {
            write!(f, "{}", CacheReport(level))?;
        }
        if !self.0.is_empty() {
            writeln!(f, "amat = {:.4}", self.0.amat())?;
        }
        Ok(())
    }
}

/// Writes the requested report sections.
///
/// # Errors
///
/// Propagates I/O errors from `out`.
pub fn write_sections<W, P>(
    out: &mut W,
    predictor: &P,
    caches: &CacheHierarchy,
    sections: &[&str],
) -> io::Result<()>
where
    W: Write + ?Sized,
    P: BranchPredictor + ?Sized,
{
    let want = |s: &str| sections.is_empty() || sections.contains(&s);
    if want("branch") {
        write!(out, "{}", PredictorReport(predictor))?;
    }
    if want("memory") {
        write!(out, "{}", HierarchyReport(caches))?;
    }
    Ok(())
}

/// Writes `address:count` lines (address in hex) ordered by descending
/// count. Equal counts are ordered by descending address.
///
/// # Errors
///
/// Propagates I/O errors from `out`.
pub fn write_mispredict_histogram<W: Write + ?Sized>(
    out: &mut W,
    histogram: &BTreeMap<u64, u64>,
) -> io::Result<()> {
    for (pc, count) in histogram
        .iter()
        .sorted_by(|x, y| (y.1, y.0).cmp(&(x.1, x.0)))
    {
        writeln!(out, "{pc:x}:{count}")?;
    }
    Ok(())
}
