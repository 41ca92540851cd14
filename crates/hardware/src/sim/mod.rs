//! Simulation context.
//!
//! Owns every model participating in a run and wires the per-branch and
//! per-access calls an interpreter makes into them.

/// Predictor, history, instruction counter and cache hierarchy of one run.
pub mod context;

pub use context::SimContext;
