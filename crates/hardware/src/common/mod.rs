//! Common building blocks shared by the predictor and cache models.
//!
//! This module provides:
//! 1. **Ordered List:** An arena-backed linked list used for recency stacks.
//! 2. **History:** The global branch history register.
//! 3. **Instruction Counter:** A shared handle to the retired-instruction count.
//! 4. **Memory Access:** Read/write classification for cache statistics.
//! 5. **Error Handling:** Configuration errors raised during construction.

/// Retired-instruction counter handle.
pub mod counter;

/// Memory access type definitions.
pub mod data;

/// Error types for model construction.
pub mod error;

/// Global branch history register.
pub mod history;

/// Arena-backed ordered list.
pub mod list;

pub use counter::InstructionCounter;
pub use data::AccessType;
pub use error::ConfigError;
pub use history::HistoryRegister;
pub use list::{Cursor, IndexList};
