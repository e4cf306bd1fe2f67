//! Implementation of [`FigTree::write`]
//!
//! A write of `value` to `range` makes a single pass down the tree. At every node along the way,
//! content outside of the node's valid bound is pruned, and then one of two things happens:
//!
//! 1. Some of the node's entries overlap `range`. They're replaced (as a group) by the new entry,
//!    and the write is done -- almost. The first replaced entry may have started before `range`,
//!    and the last may have ended after it; the parts sticking out still need to keep their
//!    values, so they're carried out as [`Continuation`]s and written back afterwards.
//! 2. Nothing overlaps, and we move to the child slot that `range` falls into.
//!
//! If the descent runs out of nodes -- the slot is vacant -- the entry is inserted into the last
//! node on the path. Any overflow splits the node, pushing its middle entry up to the parent, and
//! so on up to the root.
//!
//! Continuations are written the same way, but starting from the child slot next to the new entry
//! rather than from the root. The right one goes first, and its splits may move the node that the
//! left one needs to start from, so the recorded [`Path`] is adjusted as it goes ("retargeted").
//! The path only stores child positions, so this adjustment is purely arithmetic.

use std::mem;

use super::node::{Entry, Node, Split};
use super::pool::NodePool;
use super::FigTree;
use crate::error::{Error, Result};
use crate::{Index, Interval};

/// The child positions followed from the root down to the point of a write
///
/// The node at depth `d` is found by following `indices[..d]` from the root; `indices[d]` is the
/// position in that node where the write went (or would go).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Path {
    indices: Vec<usize>,
    /// Depth of the node where entries were replaced, if the write found any to replace. Below
    /// this depth, the paths of the two continuations diverge.
    shared: usize,
}

/// A piece of a replaced entry that still needs to be written back
struct Continuation<I, V> {
    entry: Entry<I, V>,
    /// Bound of the child slot where the write-back starts
    ///
    /// This never includes the range of `entry` itself, which has just been cut out of the entry
    /// *next* to the slot. Pruning the subtree to this bound clears it of anything stale in the
    /// continuation's range.
    valid: Interval<I>,
}

/// The pieces of replaced entries extending past either side of the written range
struct Remainders<I, V> {
    left: Option<Continuation<I, V>>,
    right: Option<Continuation<I, V>>,
}

enum Descent<I, V> {
    /// The range overlapped existing entries, which have already been replaced
    Replaced(Remainders<I, V>),
    /// Nothing overlapped; the entry still needs to be inserted at the end of the path
    Vacant(Entry<I, V>),
}

impl<I: Index, V: Clone, const ORDER: usize> FigTree<I, V, ORDER> {
    /// Assigns `value` to every index in `start..=end`
    ///
    /// Anything previously written to indexes in the range is overwritten; everything else is
    /// left untouched, even when a previous write covered both.
    ///
    /// ## Errors
    ///
    /// This method returns an error if `start > end` or if either end of the range is outside of
    /// the tree's [`Domain`], in which case the tree is unchanged. It can also fail if the
    /// allocator can't provide the nodes the write might need, which is checked before anything
    /// is modified.
    ///
    /// [`Domain`]: crate::Domain
    pub fn write(&mut self, start: I, end: I, value: V) -> Result<()> {
        if start > end {
            return Err(Error::inverted(start, end));
        }
        self.domain.check(start)?;
        self.domain.check(end)?;

        let height = self.root.height();
        self.pool.reserve(NodePool::<I, V, ORDER>::nodes_for_write(height))?;
        let mut path = Path::for_height(height)?;

        let entry = Entry { range: Interval::new(start, end), value };
        debug_println!("write {:?}", entry.range);

        let remainders = self.overwrite(entry, self.domain.interval(), &mut path, false);

        if let Some(right) = remainders.right {
            debug_println!("write back right remainder {:?}", right.entry.range);
            let nested = self.overwrite(right.entry, right.valid, &mut path, true);
            invariant!(
                nested.is_empty(),
                "figtree invariant violated: right remainder overlapped an existing entry",
            );
            path.truncate_to_shared();
        }

        if let Some(left) = remainders.left {
            debug_println!("write back left remainder {:?}", left.entry.range);
            let nested = self.overwrite(left.entry, left.valid, &mut path, false);
            invariant!(
                nested.is_empty(),
                "figtree invariant violated: left remainder overlapped an existing entry",
            );
        }

        Ok(())
    }

    /// Writes `entry`, starting from the child slot at the end of `path` (or the root, if `path`
    /// is empty)
    ///
    /// If `retarget` is true, `path` is kept pointing at the slot where the left continuation
    /// starts, through any splits this write causes.
    fn overwrite(
        &mut self,
        entry: Entry<I, V>,
        valid: Interval<I>,
        path: &mut Path,
        retarget: bool,
    ) -> Remainders<I, V> {
        let start = match path.indices.split_last() {
            None => Some(&mut *self.root),
            Some((&last, above)) => self.root.descend_mut(above).child_mut(last).as_node_mut(),
        };

        match descend(start, entry, valid, path) {
            Descent::Replaced(remainders) => remainders,
            Descent::Vacant(entry) => {
                self.insert_along(path, entry, retarget);
                Remainders { left: None, right: None }
            }
        }
    }

    /// Inserts `entry` at the end of `path`, handling the cascade of splits that may follow
    fn insert_along(&mut self, path: &mut Path, mut entry: Entry<I, V>, retarget: bool) {
        let mut right = None;
        let mut went_right = false;

        for depth in (0..path.indices.len()).rev() {
            let idx = path.indices[depth];
            let node = self.root.descend_mut(&path.indices[..depth]);
            let split = node.insert(idx, entry, right, &mut self.pool);

            if retarget {
                went_right = path.retarget::<ORDER>(depth, went_right, split.is_some());
            }

            match split {
                Some(Split { entry: e, right: r }) => {
                    entry = e;
                    right = Some(r);
                }
                None => {
                    if retarget {
                        path.finish_retarget(depth);
                    }
                    return;
                }
            }
        }

        // Every node on the path split, including the root
        let right = match right {
            Some(r) => r,
            None => panic!("figtree invariant violated: insertion with an empty path"),
        };

        let new_root = self.pool.take(self.root.height() + 1);
        let old_root = mem::replace(&mut self.root, new_root);
        self.root.make_root(old_root, entry, right);
        debug_println!("root split; height is now {}", self.root.height());

        if retarget {
            path.push_root(went_right);
        }
    }
}

/// Walks down from `node`, pruning along the way, until `entry` either overlaps something or
/// reaches a vacant slot
fn descend<I: Index, V: Clone, const ORDER: usize>(
    mut node: Option<&mut Node<I, V, ORDER>>,
    entry: Entry<I, V>,
    mut valid: Interval<I>,
    path: &mut Path,
) -> Descent<I, V> {
    while let Some(n) = node {
        n.prune_to(&valid);

        let range = entry.range;
        let idx = match n.entries().iter().position(|e| !e.range.left_of(&range)) {
            Some(i) if n.entry(i).range.overlaps(&range) => {
                return Descent::Replaced(replace(n, i, entry, valid, path));
            }
            Some(i) => i,
            None => n.len(),
        };

        valid = valid.intersect(&n.child_gap(idx));
        path.indices.push(idx);
        node = n.child_mut(idx).as_node_mut();
    }

    Descent::Vacant(entry)
}

/// Replaces every entry in `node` overlapping `entry`, starting with the one at `first`
///
/// Returns the parts of the first and last replaced entries that stick out from under the new
/// one, and records the slot where the write-backs start at the end of `path`.
fn replace<I: Index, V: Clone, const ORDER: usize>(
    node: &mut Node<I, V, ORDER>,
    first: usize,
    entry: Entry<I, V>,
    valid: Interval<I>,
    path: &mut Path,
) -> Remainders<I, V> {
    let range = entry.range;

    // Only the first overlapping entry can start before `range`. Everything after it that also
    // overlaps must then start inside of it.
    let following = node.entries()[first + 1..]
        .iter()
        .take_while(|e| e.range.left_overlaps(&range))
        .count();
    let end = first + 1 + following;

    let head = node.entry(first);
    let tail = node.entry(end - 1);

    let left = match range.left().predecessor() {
        Some(before) if head.range.left() < range.left() => Some(Continuation {
            entry: Entry {
                range: Interval::new(head.range.left(), before),
                value: head.value.clone(),
            },
            valid: valid.intersect(&node.child_gap(first)),
        }),
        _ => None,
    };

    let right = match range.right().successor() {
        Some(after) if tail.range.right() > range.right() => Some(Continuation {
            entry: Entry {
                range: Interval::new(after, tail.range.right()),
                value: tail.value.clone(),
            },
            valid: valid.intersect(&node.child_gap(end)),
        }),
        _ => None,
    };

    debug_println!(
        "{:?} replaces {} entries at height {}",
        range,
        end - first,
        node.height()
    );

    // The right continuation starts to the right of the new entry, and retargets the path to the
    // left side as it finishes. Without one, the path goes straight to the left side.
    path.record_shared(if right.is_some() { first + 1 } else { first });
    node.replace_entries(first, end, entry);

    Remainders { left, right }
}

impl<I, V> Remainders<I, V> {
    fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl Path {
    /// Creates an empty path with room for every position a write to a tree of `height` records
    ///
    /// A descent records one position per level, and the right write-back can add a new root
    /// before the left one descends.
    fn for_height(height: u8) -> Result<Self> {
        let mut indices = Vec::new();
        indices.try_reserve_exact(height as usize + 3)?;
        Ok(Path { indices, shared: 0 })
    }

    /// Appends `idx` as the position in the node where entries were just replaced
    fn record_shared(&mut self, idx: usize) {
        self.shared = self.indices.len();
        self.indices.push(idx);
    }

    /// Adjusts the path after an insertion at `depth` during the right continuation's write-back,
    /// returning whether the path's node at `depth` is now the right half of a split
    ///
    /// `below_went_right` is the value returned for `depth + 1`, and `split` is whether the node
    /// at `depth` itself just split.
    ///
    /// At the shared depth, the position moves from the right of the new entry to its left. Above
    /// it, the position moves over by one if the path's child became the right half of a split,
    /// because that half was inserted just after the left one. And if this node split too, the
    /// position is rebased into whichever half now holds it.
    pub(super) fn retarget<const ORDER: usize>(
        &mut self,
        depth: usize,
        below_went_right: bool,
        split: bool,
    ) -> bool {
        let mut idx = self.indices[depth];

        if depth == self.shared {
            invariant!(idx != 0);
            idx -= 1;
        } else if depth < self.shared && below_went_right {
            idx += 1;
        }

        let went_right = split && idx > ORDER;
        if went_right {
            idx -= ORDER + 1;
        }

        self.indices[depth] = idx;
        went_right
    }

    /// Completes retargeting once the insertion cascade stops at `depth`
    ///
    /// If the cascade never reached the shared depth, the position there still needs to move to
    /// the left of the new entry.
    pub(super) fn finish_retarget(&mut self, depth: usize) {
        if depth > self.shared {
            invariant!(self.indices[self.shared] != 0);
            self.indices[self.shared] -= 1;
        }
    }

    /// Adjusts the path for a new root above the old one
    pub(super) fn push_root(&mut self, went_right: bool) {
        self.indices.insert(0, went_right as usize);
        self.shared += 1;
    }

    /// Drops everything below the shared depth, leaving the path at the left continuation's slot
    fn truncate_to_shared(&mut self) {
        self.indices.truncate(self.shared + 1);
    }
}

#[cfg(test)]
impl Path {
    pub(super) fn from_parts(indices: Vec<usize>, shared: usize) -> Self {
        Path { indices, shared }
    }

    pub(super) fn indices(&self) -> &[usize] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::Path;

    const ORDER: usize = 2;

    // Replaced at depth 1, position 3 (so the left continuation wants position 2). The right
    // continuation's insertion doesn't split anything.
    #[test]
    fn retarget_without_splits() {
        let mut path = Path::from_parts(vec![1, 3, 0], 1);
        assert!(!path.retarget::<ORDER>(2, false, false));
        path.finish_retarget(2);
        path.truncate_to_shared();
        assert_eq!(path.indices(), [1, 2]);
    }

    #[test]
    fn retarget_stops_at_shared() {
        let mut path = Path::from_parts(vec![1, 3, 0], 1);
        assert!(!path.retarget::<ORDER>(2, false, true));
        assert!(!path.retarget::<ORDER>(1, false, false));
        path.finish_retarget(1);
        path.truncate_to_shared();
        assert_eq!(path.indices(), [1, 2]);
    }

    // The shared node splits with the left continuation's slot past the middle, so it lands in
    // the new right half; the parent position then shifts over to that half.
    #[test]
    fn retarget_through_split_into_right_half() {
        let mut path = Path::from_parts(vec![0, 5, 1], 1);
        assert!(!path.retarget::<ORDER>(2, false, true));
        assert!(path.retarget::<ORDER>(1, false, true));
        assert_eq!(path.indices()[1], 1);
        assert!(!path.retarget::<ORDER>(0, true, false));
        path.finish_retarget(0);
        path.truncate_to_shared();
        assert_eq!(path.indices(), [1, 1]);
    }

    #[test]
    fn retarget_through_split_into_left_half() {
        let mut path = Path::from_parts(vec![2, 2], 1);
        assert!(!path.retarget::<ORDER>(1, false, true));
        assert!(!path.retarget::<ORDER>(0, false, false));
        path.finish_retarget(0);
        assert_eq!(path.indices(), [2, 1]);
    }

    // Replaced in the root of a single-node tree, which the right write-back then splits. The
    // left write-back descends from the new root without growing the path's storage.
    #[test]
    fn path_storage_is_reserved_up_front() {
        let mut path = Path::for_height(0).unwrap();
        let capacity = path.indices.capacity();
        assert!(capacity >= 3);

        path.record_shared(1);
        let went_right = path.retarget::<ORDER>(0, false, true);
        assert!(!went_right);
        path.push_root(went_right);
        path.truncate_to_shared();
        assert_eq!(path.indices(), [0, 0]);

        path.indices.push(0);
        assert_eq!(path.indices.capacity(), capacity);
    }

    #[test]
    fn retarget_through_new_root() {
        let mut path = Path::from_parts(vec![4], 0);
        let went_right = path.retarget::<ORDER>(0, false, true);
        assert!(went_right);
        path.push_root(went_right);
        path.truncate_to_shared();
        assert_eq!(path.indices(), [1, 0]);
    }
}
