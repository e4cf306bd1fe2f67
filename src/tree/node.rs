//! Management of nodes
//!
//! A [`Node`] holds up to `2 * ORDER` entries, sorted by their ranges, and one more child slot
//! than it has entries. The child at position `i` sits between entries `i - 1` and `i`, so
//! everything it holds is *meant* to fall strictly between their ranges -- but a child isn't
//! rewritten when a later write covers part of it. Instead, each node is implicitly bounded by the
//! gaps between its ancestors' entries (its "valid" interval), and content outside of that bound is
//! stale. Writes trim stale content off of the nodes they pass through ([`Node::prune_to`]);
//! lookups and reads simply never look outside of the bound.
//!
//! Entries can live in nodes at any height. A write that finds nothing to overwrite goes into the
//! deepest existing node along its way, with vacant child slots on either side, and only the
//! resulting splits move entries up a level.
//!
//! All node storage is allocated up front, at full capacity, so that nothing here allocates except
//! through the [`NodePool`].

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use super::pool::NodePool;
use super::subtree::Subtree;
use crate::error::{Error, Result};
use crate::{Index, Interval};

/// A single range and the value assigned to it
#[derive(Clone)]
pub(crate) struct Entry<I, V> {
    pub range: Interval<I>,
    pub value: V,
}

pub(crate) struct Node<I, V, const ORDER: usize> {
    /// The height of the subtree rooted at this node; zero for leaves
    height: u8,
    entries: Vec<Entry<I, V>>,
    /// Always `entries.len() + 1` slots, sized for the children of a node about to split
    children: Vec<Subtree<I, V, ORDER>>,
}

/// The result of a node overflowing during [`Node::insert`]
///
/// The original node keeps the lower half of the entries. `entry` is the middle entry, to be
/// inserted into the parent with `right` -- the upper half -- as its right child.
pub(crate) struct Split<I, V, const ORDER: usize> {
    pub entry: Entry<I, V>,
    pub right: Box<Node<I, V, ORDER>>,
}

impl<I, V, const ORDER: usize> Node<I, V, ORDER> {
    /// The largest number of entries a node holds between operations
    pub const MAX_ENTRIES: usize = 2 * ORDER;

    // A node holds one entry more than `MAX_ENTRIES` in the moment between an insertion and the
    // split that follows it.
    const ENTRY_CAPACITY: usize = 2 * ORDER + 1;
    const CHILD_CAPACITY: usize = 2 * ORDER + 2;

    /// Creates an empty node at the given height, allocating infallibly
    pub fn new(height: u8) -> Box<Self> {
        let mut children = Vec::with_capacity(Self::CHILD_CAPACITY);
        children.push(Subtree::vacant(height));

        Box::new(Node {
            height,
            entries: Vec::with_capacity(Self::ENTRY_CAPACITY),
            children,
        })
    }

    /// Creates an empty leaf node, reporting allocation failure instead of aborting
    pub fn try_alloc() -> Result<Box<Self>> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(Self::ENTRY_CAPACITY)?;
        let mut children = Vec::new();
        children.try_reserve_exact(Self::CHILD_CAPACITY)?;
        children.push(Subtree::Absent);

        try_box(Node { height: 0, entries, children })
    }

    /// Clears the node and moves it to `height`, keeping its storage
    ///
    /// Any subtrees the node had are released.
    pub fn reset(&mut self, height: u8) {
        self.entries.clear();
        self.children.clear();
        self.children.push(Subtree::vacant(height));
        self.height = height;
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// The number of entries in the node
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Entry<I, V>] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> &Entry<I, V> {
        &self.entries[idx]
    }

    pub fn children(&self) -> &[Subtree<I, V, ORDER>] {
        &self.children
    }

    pub fn child(&self, idx: usize) -> &Subtree<I, V, ORDER> {
        &self.children[idx]
    }

    pub fn child_mut(&mut self, idx: usize) -> &mut Subtree<I, V, ORDER> {
        &mut self.children[idx]
    }

    /// Follows `indices` down from this node, one child position per level
    ///
    /// Every child along the way must be materialized.
    pub fn descend_mut(&mut self, indices: &[usize]) -> &mut Self {
        let mut node = self;
        for &idx in indices {
            node = match &mut node.children[idx] {
                Subtree::Node(child) => &mut **child,
                _ => panic!("figtree invariant violated: path runs through a vacant child slot"),
            };
        }
        node
    }

    /// Turns this empty node into a root above `left` and `right`, with `entry` between them
    pub fn make_root(&mut self, left: Box<Self>, entry: Entry<I, V>, right: Box<Self>) {
        invariant!(self.entries.is_empty());
        invariant!(left.height + 1 == self.height && right.height + 1 == self.height);

        self.children[0] = Subtree::Node(left);
        self.entries.push(entry);
        self.children.push(Subtree::Node(right));
    }
}

impl<I: Index, V, const ORDER: usize> Node<I, V, ORDER> {
    /// The interval strictly between the entries on either side of child `idx`
    ///
    /// This is the bound the child would have if this node's own bound were everything.
    pub fn child_gap(&self, idx: usize) -> Interval<I> {
        let prev = idx.checked_sub(1).map(|i| &self.entries[i].range);
        let next = self.entries.get(idx).map(|e| &e.range);
        Interval::gap(prev, next)
    }

    /// Removes everything in the node that lies outside of `valid`
    ///
    /// Entries entirely outside are removed along with the children on their outer side. Entries
    /// straddling an edge of `valid` are clamped to it, and the child beyond the edge -- which can
    /// then only hold stale content -- is freed.
    ///
    /// If `valid` is empty, the node is left with no entries and a single vacant child.
    pub fn prune_to(&mut self, valid: &Interval<I>) {
        let (lo, hi) = match (valid.start(), valid.end()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => {
                if !self.entries.is_empty() {
                    debug_println!("prune: no valid space left, clearing {} entries", self.len());
                }
                self.reset(self.height);
                return;
            }
        };

        let below = self.entries.iter().take_while(|e| e.range.right() < lo).count();
        if below != 0 {
            // Child `k` is the left child of entry `k`, so the first `below` children go with the
            // entries. The right child of the last removed entry becomes the new child 0.
            self.entries.drain(..below);
            self.children.drain(..below);
        }

        let above = self.entries.iter().rev().take_while(|e| e.range.left() > hi).count();
        if above != 0 {
            let (n_entries, n_children) = (self.entries.len(), self.children.len());
            self.entries.drain(n_entries - above..);
            self.children.drain(n_children - above..);
        }

        if let Some(first) = self.entries.first_mut() {
            if first.range.left() < lo {
                first.range = first.range.restrict(lo, hi);
                self.children[0].free(self.height);
            }
        }

        if let Some(last) = self.entries.last_mut() {
            if last.range.right() > hi {
                last.range = last.range.restrict(lo, hi);
                let last_child = self.children.len() - 1;
                self.children[last_child].free(self.height);
            }
        }

        if below != 0 || above != 0 {
            debug_println!("prune to {valid:?}: dropped {below} entries below, {above} above");
        }
    }

    /// Inserts `entry` at position `idx`, with `right` as its right child
    ///
    /// The child already at position `idx` becomes the entry's left child. If `right` is `None`, a
    /// vacant slot is used.
    ///
    /// If the node overflows, it splits: `self` keeps the first `ORDER` entries and the rest (aside
    /// from the middle entry) are moved into a node taken from `pool`.
    pub fn insert(
        &mut self,
        idx: usize,
        entry: Entry<I, V>,
        right: Option<Box<Self>>,
        pool: &mut NodePool<I, V, ORDER>,
    ) -> Option<Split<I, V, ORDER>> {
        invariant!(idx <= self.len());
        if let Some(prev) = idx.checked_sub(1).map(|i| &self.entries[i]) {
            invariant!(
                prev.range.left_of(&entry.range),
                "figtree invariant violated: inserted {:?} overlaps previous entry {:?}",
                entry.range,
                prev.range,
            );
        }
        if let Some(next) = self.entries.get(idx) {
            invariant!(
                entry.range.left_of(&next.range),
                "figtree invariant violated: inserted {:?} overlaps next entry {:?}",
                entry.range,
                next.range,
            );
        }

        let right = match right {
            Some(node) => {
                invariant!(node.height + 1 == self.height);
                Subtree::Node(node)
            }
            None => Subtree::vacant(self.height),
        };

        self.entries.insert(idx, entry);
        self.children.insert(idx + 1, right);

        if self.entries.len() <= Self::MAX_ENTRIES {
            return None;
        }

        let mut sibling = pool.take(self.height);
        sibling.children.clear();
        sibling.entries.extend(self.entries.drain(ORDER + 1..));
        sibling.children.extend(self.children.drain(ORDER + 1..));

        // `drain` above left exactly ORDER + 1 entries; the last is the one moving up.
        let entry = match self.entries.pop() {
            Some(e) => e,
            None => unreachable!(),
        };

        debug_println!(
            "split node at height {}: pushing up {:?}",
            self.height,
            entry.range
        );

        Some(Split { entry, right: sibling })
    }

    /// Replaces the entries in `start..end` with the single entry `entry`
    ///
    /// The left child of the first replaced entry and the right child of the last one are kept as
    /// the new entry's children. Any children between replaced entries are freed.
    pub fn replace_entries(&mut self, start: usize, end: usize, entry: Entry<I, V>) {
        invariant!(start < end && end <= self.len());

        self.entries.drain(start..end);
        self.entries.insert(start, entry);
        self.children.drain(start + 1..end);
    }
}

// Cloned nodes keep full capacity, so that writes to a cloned tree still never reallocate
impl<I: Clone, V: Clone, const ORDER: usize> Clone for Node<I, V, ORDER> {
    fn clone(&self) -> Self {
        let mut entries = Vec::with_capacity(Self::ENTRY_CAPACITY);
        entries.extend(self.entries.iter().cloned());
        let mut children = Vec::with_capacity(Self::CHILD_CAPACITY);
        children.extend(self.children.iter().cloned());

        Node { height: self.height, entries, children }
    }
}

/// Allocates `val` on the heap, returning an error instead of aborting if allocation fails
fn try_box<T>(val: T) -> Result<Box<T>> {
    let layout = Layout::new::<T>();
    // Required for the allocation below, should be removed at compile-time.
    assert!(layout.size() != 0);

    // SAFETY: `alloc` may produce UB if `layout` has a size of zero. We checked above that the
    // size of `T` (and therefore the size of the layout) is non-zero.
    let maybe_null_ptr = unsafe { alloc::alloc(layout) } as *mut T;

    match NonNull::new(maybe_null_ptr) {
        Some(p) => {
            // SAFETY: `.write()` requires that `p.as_ptr()` is valid for writes, and is properly
            // aligned. This is guaranteed by a non-null return from `alloc::alloc()`. Afterwards,
            // the pointer refers to an initialized `T` in memory allocated by the global allocator
            // with `Layout::new::<T>()`, which is exactly what `Box::from_raw` requires.
            unsafe {
                p.as_ptr().write(val);
                Ok(Box::from_raw(p.as_ptr()))
            }
        }
        None => Err(Error::AllocFailed { size: layout.size() }),
    }
}

#[cfg(test)]
mod tests {
    use super::{Entry, Node};
    use crate::tree::pool::NodePool;
    use crate::tree::subtree::Subtree;
    use crate::Interval;

    type N = Node<u32, char, 2>;

    fn entry(lo: u32, hi: u32, value: char) -> Entry<u32, char> {
        Entry { range: Interval::new(lo, hi), value }
    }

    fn ranges(node: &N) -> Vec<(u32, u32)> {
        node.entries()
            .iter()
            .map(|e| (e.range.left(), e.range.right()))
            .collect()
    }

    // A height-1 node whose children are all materialized leaves, each holding one entry in the
    // middle of its gap.
    fn populated() -> Box<N> {
        let mut pool = NodePool::new();
        let mut node = N::new(1);
        for (i, (lo, hi)) in [(10, 19), (30, 39), (50, 59)].into_iter().enumerate() {
            assert!(node.insert(i, entry(lo, hi, 'x'), None, &mut pool).is_none());
        }
        for (i, at) in [0, 25, 45, 65].into_iter().enumerate() {
            let mut leaf = N::new(0);
            assert!(leaf.insert(0, entry(at, at + 1, 'c'), None, &mut pool).is_none());
            *node.child_mut(i) = Subtree::Node(leaf);
        }
        node
    }

    #[test]
    fn split_keeps_lower_half_in_place() {
        let mut pool = NodePool::new();
        pool.reserve(1).unwrap();

        let mut node = N::new(0);
        for (i, lo) in [0, 10, 20, 30].into_iter().enumerate() {
            assert!(node.insert(i, entry(lo, lo + 5, 'a'), None, &mut pool).is_none());
        }

        let split = node.insert(2, entry(16, 17, 'b'), None, &mut pool).unwrap();
        assert_eq!(ranges(&node), [(0, 5), (10, 15)]);
        assert_eq!(split.entry.range, Interval::new(16, 17));
        assert_eq!(ranges(&split.right), [(20, 25), (30, 35)]);
        assert_eq!(split.right.children().len(), 3);
        assert_eq!(node.children().len(), 3);
    }

    #[test]
    #[should_panic]
    fn insert_rejects_overlap() {
        let mut pool = NodePool::new();
        let mut node = N::new(0);
        node.insert(0, entry(10, 20, 'a'), None, &mut pool);
        node.insert(1, entry(20, 30, 'b'), None, &mut pool);
    }

    #[test]
    fn replace_keeps_outer_children() {
        let mut node = populated();
        node.replace_entries(0, 2, entry(12, 35, 'y'));

        assert_eq!(ranges(&node), [(12, 35), (50, 59)]);
        assert_eq!(node.children().len(), 3);
        let first_child = node.child(0).as_node().unwrap();
        assert_eq!(first_child.entry(0).range, Interval::new(0, 1));
        let second_child = node.child(1).as_node().unwrap();
        assert_eq!(second_child.entry(0).range, Interval::new(45, 46));
    }

    #[test]
    fn prune_removes_outside_entries() {
        let mut node = populated();
        node.prune_to(&Interval::new(21, 44));

        assert_eq!(ranges(&node), [(30, 39)]);
        let left = node.child(0).as_node().unwrap();
        assert_eq!(left.entry(0).range, Interval::new(25, 26));
        let right = node.child(1).as_node().unwrap();
        assert_eq!(right.entry(0).range, Interval::new(45, 46));
    }

    // Clamping a straddling entry frees the child beyond the edge. That child sits entirely outside
    // of the new bound, so nothing still visible is lost.
    #[test]
    fn prune_clamps_straddling_entries() {
        let mut node = populated();
        node.prune_to(&Interval::new(15, 55));

        assert_eq!(ranges(&node), [(15, 19), (30, 39), (50, 55)]);
        assert!(matches!(node.child(0), Subtree::Implicit { height: 0 }));
        assert!(matches!(node.child(3), Subtree::Implicit { height: 0 }));
        assert!(node.child(1).as_node().is_some());
        assert!(node.child(2).as_node().is_some());
    }

    #[test]
    fn prune_to_empty_clears() {
        let mut node = populated();
        node.prune_to(&Interval::empty());

        assert_eq!(node.len(), 0);
        assert_eq!(node.children().len(), 1);
        assert!(matches!(node.child(0), Subtree::Implicit { height: 0 }));
    }

    #[test]
    fn fallible_allocation() {
        let node = N::try_alloc().unwrap();
        assert_eq!(node.height(), 0);
        assert_eq!(node.len(), 0);
        assert!(matches!(node.child(0), Subtree::Absent));
    }
}
