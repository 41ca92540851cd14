//! Branch predictor and cache hierarchy models for an instruction-set simulator.
//!
//! This crate implements the performance-modeling core that an interpreter
//! drives while it executes a program:
//! 1. **Branch prediction:** gshare, bimodal, gtagged, uberhistory and TAGE direction predictors.
//! 2. **Caches:** Direct-mapped, LRU, random, pseudo-LRU and timestamp-LRU organizations chained into a hierarchy.
//! 3. **Common:** Arena-backed ordered list, global history register, instruction counter.
//! 4. **Simulation:** Configuration, per-run context and statistics reporting.

/// Common types (ordered list, history register, instruction counter, access types, errors).
pub mod common;
/// Model configuration (defaults, selector enums, predictor and cache structures).
pub mod config;
/// Modeled hardware units (branch prediction, caches).
pub mod core;
/// Simulation context owning the predictor, history and caches.
pub mod sim;
/// Statistics reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Per-run context; construct with `SimContext::from_config`.
pub use crate::sim::SimContext;
