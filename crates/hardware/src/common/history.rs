//! Global branch history register.
//!
//! A fixed-length shift register of resolved branch outcomes. Bit 0 is the
//! most recent outcome. Predictors only ever see a shared reference; the
//! simulation context shifts new outcomes in after each update.

use std::fmt;

use bitvec::prelude::*;

/// Shift register of recent branch outcomes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRegister {
    bits: BitVec<usize, Lsb0>,
}

// Printed with the newest outcome as the rightmost character.
impl fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self
            .bits
            .iter()
            .by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        f.write_str(&s)
    }
}

impl HistoryRegister {
    /// Creates a register of `len` bits, all zero. A zero length is raised to
    /// one bit so folds always have input.
    pub fn new(len: usize) -> Self {
        Self {
            bits: bitvec![usize, Lsb0; 0; len.max(1)],
        }
    }

    /// Register length in bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always `false`; a register holds at least one bit.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Shifts in a new outcome at bit 0, discarding the oldest bit.
    pub fn push(&mut self, taken: bool) {
        self.bits.shift_end(1);
        self.bits.set(0, taken);
    }

    /// Outcome `n` branches ago (`0` is the newest).
    pub fn get(&self, n: usize) -> Option<bool> {
        self.bits.get(n).map(|b| *b)
    }

    /// The newest `min(len, 64)` outcomes as an integer, newest in bit 0.
    pub fn to_integer(&self) -> u64 {
        let n = self.bits.len().min(64);
        self.bits[..n].load_le::<u64>()
    }

    /// XOR-folds the newest `range_len` outcomes into `output_bits` bits.
    ///
    /// `range_len` is clamped to the register length; `output_bits` must be
    /// between 1 and 64.
    pub fn fold(&self, range_len: usize, output_bits: usize) -> u64 {
        let output_bits = output_bits.clamp(1, 64);
        let n = range_len.min(self.bits.len());
        let folded = self.bits[..n]
            .chunks(output_bits)
            .fold(0u64, |acc, chunk| acc ^ chunk.load_le::<u64>());
        folded & low_mask(output_bits)
    }

    /// Reduction of the entire register to 64 bits.
    pub fn hash(&self) -> u64 {
        self.fold(self.bits.len(), 64)
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }
}

/// Folds a 64-bit history value down to 16 bits: the upper and lower 32-bit
/// halves are XORed, then the upper and lower 16-bit halves of the result.
#[inline]
pub const fn fold_halves(x: u64) -> u64 {
    let y = (x >> 32) ^ (x & 0xffff_ffff);
    (y >> 16) ^ (y & 0xffff)
}

#[inline]
const fn low_mask(bits: usize) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}
