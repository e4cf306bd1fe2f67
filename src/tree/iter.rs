//! Wrapper module for [`Read`], the iterator over the contents of a [`FigTree`]
//!
//! [`FigTree`]: crate::FigTree

use std::iter::FusedIterator;

use super::node::Node;
use super::DEFAULT_ORDER;
use crate::{Index, Interval};

/// An iterator over the written ranges that intersect a query, in ascending order
///
/// Each item is a range and the value written to it, clipped to the query. Ranges never overlap,
/// though adjacent ones may carry equal values: separate writes of the same value to neighboring
/// ranges aren't merged.
///
/// Stale content that hasn't been pruned yet is skipped over, so the results are always the same
/// as looking up every index in the query one at a time. The iterator doesn't allocate beyond a
/// stack with one frame per level of the tree.
///
/// This type is produced by the [`read`] and [`iter`] methods on [`FigTree`].
///
/// [`FigTree`]: crate::FigTree
/// [`read`]: crate::FigTree::read
/// [`iter`]: crate::FigTree::iter
pub struct Read<'t, I, V, const ORDER: usize = DEFAULT_ORDER> {
    query: Interval<I>,
    stack: Vec<Frame<'t, I, V, ORDER>>,
}

struct Frame<'t, I, V, const ORDER: usize> {
    node: &'t Node<I, V, ORDER>,
    /// The part of the domain that this node is responsible for
    valid: Interval<I>,
    /// Position in the in-order walk of the node: even values are children, odd values entries
    pos: usize,
}

impl<'t, I: Index, V, const ORDER: usize> Read<'t, I, V, ORDER> {
    pub(super) fn new(
        root: &'t Node<I, V, ORDER>,
        domain: Interval<I>,
        query: Interval<I>,
    ) -> Self {
        let query = query.intersect(&domain);
        let stack = match query.is_empty() {
            true => Vec::new(),
            false => vec![Frame { node: root, valid: domain, pos: 0 }],
        };

        Read { query, stack }
    }
}

impl<'t, I: Index, V, const ORDER: usize> Iterator for Read<'t, I, V, ORDER> {
    type Item = (Interval<I>, &'t V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let (node, valid, pos) = (frame.node, frame.valid, frame.pos);

            if pos > 2 * node.len() {
                self.stack.pop();
                continue;
            }
            frame.pos += 1;

            let idx = pos / 2;
            if pos % 2 == 0 {
                if let Some(child) = node.child(idx).as_node() {
                    let bound = valid.intersect(&node.child_gap(idx));
                    if bound.overlaps(&self.query) {
                        self.stack.push(Frame { node: child, valid: bound, pos: 0 });
                    }
                }
                continue;
            }

            let entry = node.entry(idx);
            if entry.range.right_of(&self.query) {
                // Everything after this in the node is further right still
                self.stack.pop();
                continue;
            }

            let clipped = entry.range.intersect(&valid).intersect(&self.query);
            if !clipped.is_empty() {
                return Some((clipped, &entry.value));
            }
        }
    }
}

impl<'t, I: Index, V, const ORDER: usize> FusedIterator for Read<'t, I, V, ORDER> {}
