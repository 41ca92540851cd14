//! Shared retired-instruction counter.
//!
//! The interpreter advances the counter; predictors read it for
//! per-kilo-instruction rates and the timestamp-LRU cache reads it as a
//! logical clock. Cloning the handle shares the same count.

use std::cell::Cell;
use std::rc::Rc;

/// Cloneable handle to a single monotonically increasing instruction count.
#[derive(Clone, Debug, Default)]
pub struct InstructionCounter(Rc<Cell<u64>>);

impl InstructionCounter {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count.
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    /// Advances the count by `n` instructions.
    #[inline]
    pub fn advance(&self, n: u64) {
        self.0.set(self.0.get().wrapping_add(n));
    }

    /// Overwrites the count. Used when replaying traces that carry their own
    /// instruction numbers.
    #[inline]
    pub fn set(&self, value: u64) {
        self.0.set(value);
    }
}
