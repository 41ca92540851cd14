//! Performance-model units.
//!
//! This module contains the branch prediction unit and the cache hierarchy
//! simulator.

/// Branch direction predictors.
pub mod bru;

/// Cache hierarchy with replacement policies.
pub mod cache;
