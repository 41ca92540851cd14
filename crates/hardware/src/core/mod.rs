//! Core performance models.
//!
//! The predictor and cache models live under [`units`], mirroring where they
//! sit in a processor core.

/// Branch prediction and cache units.
pub mod units;
