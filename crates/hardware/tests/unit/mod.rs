//! # Unit Components
//!
//! Organizes the unit tests by library module: shared data structures,
//! configuration, the modeled units, the simulation context and reporting.




/// Unit tests for the simulation context.
pub mod sim;

/// Unit tests for report rendering.
pub mod stats;
