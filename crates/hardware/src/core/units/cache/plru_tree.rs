//! Binary-tree pseudo-LRU state.
//!
//! The tree for an `assoc`-way set is laid out as an implicit heap: node 1 is
//! the root, node `i` has children `2i` and `2i + 1`, and leaf `assoc + w`
//! stands for way `w`. Only the `assoc - 1` internal nodes carry state, one
//! bit each. A set bit means the left subtree was referenced more recently
//! than the right one, so the victim search turns right at that node.
//!
//! Storage is abstracted by [`TreeBits`] so the same walk serves a packed
//! `u64` (up to 64 ways) and a byte-per-node slice (any associativity).

/// Per-node bit storage for one tree.
pub trait TreeBits {
    /// Reads internal node `node` (`1 <= node < assoc`).
    fn bit(&self, node: usize) -> bool;

    /// Writes internal node `node`.
    fn set_bit(&mut self, node: usize, value: bool);
}

impl TreeBits for u64 {
    #[inline(always)]
    fn bit(&self, node: usize) -> bool {
        (*self >> node) & 1 == 1
    }

    #[inline(always)]
    fn set_bit(&mut self, node: usize, value: bool) {
        if value {
            *self |= 1u64 << node;
        } else {
            *self &= !(1u64 << node);
        }
    }
}

impl TreeBits for [u8] {
    #[inline(always)]
    fn bit(&self, node: usize) -> bool {
        self[node] != 0
    }

    #[inline(always)]
    fn set_bit(&mut self, node: usize, value: bool) {
        self[node] = u8::from(value);
    }
}

/// Largest associativity a packed `u64` tree supports.
pub const MAX_PACKED_WAYS: usize = 64;

/// Walks from the root toward the less recently used side and returns the
/// way at the leaf reached.
#[inline]
pub fn victim<T: TreeBits + ?Sized>(tree: &T, assoc: usize) -> usize {
    let mut node = 1;
    while node < assoc {
        node = 2 * node + usize::from(tree.bit(node));
    }
    node - assoc
}

/// Marks `way` as most recently used: every node on the path from its leaf to
/// the root is pointed at the child the path came through.
#[inline]
pub fn touch<T: TreeBits + ?Sized>(tree: &mut T, assoc: usize, way: usize) {
    let mut node = assoc + way;
    while node > 1 {
        let parent = node / 2;
        tree.set_bit(parent, node % 2 == 0);
        node = parent;
    }
}
