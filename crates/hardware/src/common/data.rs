//! Memory Access Types.
//!
//! The cache models only distinguish loads from stores; the split drives the
//! per-operation hit and miss counters.

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access.
    Read,

    /// Data write access.
    Write,
}

impl AccessType {
    /// Slot in the per-operation counter arrays (`0` = read, `1` = write).
    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            Self::Read => 0,
            Self::Write => 1,
        }
    }
}
