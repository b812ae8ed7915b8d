use std::fmt;
use std::slice;

use crate::nfa::StateID;

/// A set of NFA state identifiers with a fixed capacity.
///
/// Insertion and membership testing take constant time, and so does clearing
/// the whole set. Iteration yields elements in insertion order.
///
/// The data structure is based on: https://research.swtch.com/sparse
/// Memory is zero-initialized rather than left uninitialized. The sets are
/// reused across the entire determinization of an NFA, so the up front cost
/// is paid only once.
#[derive(Clone)]
pub struct SparseSet {
    /// The number of elements currently in this set.
    len: usize,
    /// The elements of this set, in the order in which they were inserted.
    /// Only the first `len` entries are meaningful.
    dense: Box<[StateID]>,
    /// Maps an element to its position in `dense`.
    ///
    /// An id is in the set if and only if
    /// sparse[id] < len && id == dense[sparse[id]].
    sparse: Box<[usize]>,
}

impl SparseSet {
    /// Create a set that can hold the identifiers `0..capacity`.
    pub fn new(capacity: usize) -> SparseSet {
        SparseSet {
            len: 0,
            dense: vec![0; capacity].into_boxed_slice(),
            sparse: vec![0; capacity].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert the given identifier. Returns false if it was already present.
    ///
    /// This panics if `id` is not less than the capacity of this set.
    pub fn insert(&mut self, id: StateID) -> bool {
        if self.contains(id) {
            return false;
        }
        let i = self.len;
        self.dense[i] = id;
        self.sparse[id] = i;
        self.len += 1;
        true
    }

    pub fn contains(&self, id: StateID) -> bool {
        let i = self.sparse[id];
        i < self.len && self.dense[i] == id
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn iter(&self) -> slice::Iter<'_, StateID> {
        self.dense[..self.len].iter()
    }
}

impl fmt::Debug for SparseSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("SparseSet").field(&&self.dense[..self.len]).finish()
    }
}

impl<'a> IntoIterator for &'a SparseSet {
    type Item = &'a StateID;
    type IntoIter = slice::Iter<'a, StateID>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_and_dedup() {
        let mut set = SparseSet::new(10);
        assert!(set.insert(7));
        assert!(set.insert(2));
        assert!(!set.insert(7));
        assert!(set.insert(9));
        assert_eq!(vec![7, 2, 9], set.iter().cloned().collect::<Vec<_>>());
        assert!(set.contains(2));
        assert!(!set.contains(3));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut set = SparseSet::new(4);
        set.insert(3);
        set.insert(0);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(3));
        assert!(!set.contains(0));
        assert!(set.insert(0));
        assert_eq!(1, set.len());
    }

    #[test]
    #[should_panic]
    fn insert_past_capacity_panics() {
        let mut set = SparseSet::new(2);
        set.insert(2);
    }
}
