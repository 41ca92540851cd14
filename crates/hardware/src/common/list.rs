//! Arena-backed ordered list.
//!
//! `IndexList` is a doubly-linked sequence whose nodes live in a single `Vec`
//! and link to each other by slot index. Freed slots are pushed onto a free
//! list and reused by later insertions, so a list that is repeatedly filled
//! and drained (recency stacks, per-set LRU lists) settles into a fixed
//! allocation.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `push_front()` / `push_back()` / `pop_back()`: O(1)
//!   - `find()`: O(n) scan from the head
//!   - `move_to_head()` / `move_to_tail()` / `erase()`: O(1)
//! - **Space Complexity:** O(peak length)

/// Handle to an element, produced by [`IndexList::find`].
///
/// The handle records the element's zero-based position from the head at the
/// time it was created. That position is not refreshed when the list changes
/// afterwards. The end cursor (returned when a search fails) makes every
/// list operation a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    slot: Option<usize>,
    distance: usize,
}

impl Cursor {
    /// The "not found" cursor.
    pub const END: Self = Self {
        slot: None,
        distance: 0,
    };

    /// Returns `true` if this is the end cursor.
    #[inline]
    pub const fn is_end(&self) -> bool {
        self.slot.is_none()
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly-linked list stored in a slot arena.
#[derive(Clone, Debug)]
pub struct IndexList<T> {
    slots: Vec<Option<Slot<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for IndexList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IndexList<T> {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` elements before the
    /// arena has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of elements in the list.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The end cursor, for comparisons against [`find`](Self::find) results.
    #[inline]
    pub const fn end(&self) -> Cursor {
        Cursor::END
    }

    /// First element, if any.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|i| self.node(i)).map(|n| &n.value)
    }

    /// Last element, if any.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|i| self.node(i)).map(|n| &n.value)
    }

    /// Value behind a cursor, or `None` for the end cursor.
    pub fn get(&self, cursor: Cursor) -> Option<&T> {
        cursor.slot.and_then(|i| self.node(i)).map(|n| &n.value)
    }

    /// Recorded distance from the head, or `None` for the end cursor.
    #[inline]
    pub const fn distance(&self, cursor: Cursor) -> Option<usize> {
        match cursor.slot {
            Some(_) => Some(cursor.distance),
            None => None,
        }
    }

    /// Inserts `value` at the head.
    pub fn push_front(&mut self, value: T) {
        let idx = self.alloc(Slot {
            value,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(old) => self.set_prev(old, Some(idx)),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
    }

    /// Inserts `value` at the tail.
    pub fn push_back(&mut self, value: T) {
        let idx = self.alloc(Slot {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(old) => self.set_next(old, Some(idx)),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// Removes and returns the tail element; `None` if the list is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.unlink(idx);
        self.release(idx)
    }

    /// Removes the element behind `cursor`. The cursor must not be reused.
    pub fn erase(&mut self, cursor: Cursor) -> Option<T> {
        let idx = cursor.slot?;
        if self.node(idx).is_none() {
            return None;
        }
        self.unlink(idx);
        self.release(idx)
    }

    /// Moves the element behind `cursor` to the head.
    pub fn move_to_head(&mut self, cursor: Cursor) {
        let Some(idx) = cursor.slot else { return };
        if self.len <= 1 || self.head == Some(idx) || self.node(idx).is_none() {
            return;
        }
        self.unlink(idx);
        let old = self.head;
        if let Some(n) = self.node_mut(idx) {
            n.prev = None;
            n.next = old;
        }
        match old {
            Some(o) => self.set_prev(o, Some(idx)),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
    }

    /// Moves the element behind `cursor` to the tail.
    pub fn move_to_tail(&mut self, cursor: Cursor) {
        let Some(idx) = cursor.slot else { return };
        if self.len <= 1 || self.tail == Some(idx) || self.node(idx).is_none() {
            return;
        }
        self.unlink(idx);
        let old = self.tail;
        if let Some(n) = self.node_mut(idx) {
            n.prev = old;
            n.next = None;
        }
        match old {
            Some(o) => self.set_next(o, Some(idx)),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// Drops every element. The arena keeps its allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    fn node(&self, idx: usize) -> Option<&Slot<T>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Slot<T>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn set_prev(&mut self, idx: usize, prev: Option<usize>) {
        if let Some(n) = self.node_mut(idx) {
            n.prev = prev;
        }
    }

    fn set_next(&mut self, idx: usize, next: Option<usize>) {
        if let Some(n) = self.node_mut(idx) {
            n.next = next;
        }
    }

    fn alloc(&mut self, slot: Slot<T>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(slot);
            idx
        } else {
            self.slots.push(Some(slot));
            self.slots.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Option<T> {
        let slot = self.slots.get_mut(idx)?.take()?;
        self.free.push(idx);
        Some(slot.value)
    }

    /// Detaches `idx` from its neighbours and decrements `len`. The slot
    /// itself stays allocated.
    fn unlink(&mut self, idx: usize) {
        let Some((prev, next)) = self.node(idx).map(|n| (n.prev, n.next)) else {
            return;
        };
        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }
        self.len -= 1;
    }
}

impl<T: PartialEq> IndexList<T> {
    /// Scans from the head for the first element equal to `value`.
    ///
    /// Returns the end cursor if no element matches.
    pub fn find(&self, value: &T) -> Cursor {
        let mut cur = self.head;
        let mut distance = 0;
        while let Some(idx) = cur {
            let Some(node) = self.node(idx) else { break };
            if node.value == *value {
                return Cursor {
                    slot: Some(idx),
                    distance,
                };
            }
            cur = node.next;
            distance += 1;
        }
        Cursor::END
    }
}

/// Head-to-tail iterator over an [`IndexList`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    list: &'a IndexList<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.next?)?;
        self.next = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> IntoIterator for &'a IndexList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
