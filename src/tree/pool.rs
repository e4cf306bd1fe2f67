//! Wrapper module for [`NodePool`], the source of every node allocated during a write

use super::node::Node;
use crate::error::Result;

/// A stash of pre-allocated, empty nodes
///
/// A write can't stop halfway if the allocator gives up: a split that has already moved half of a
/// node's entries out needs somewhere to put them. So before a write touches the tree, it asks the
/// pool to [`reserve`] enough nodes for the worst case, and every node created during the write is
/// then [`take`]n from the pool without any chance of failure.
///
/// Nodes that weren't needed stay in the pool for the next write.
///
/// [`reserve`]: Self::reserve
/// [`take`]: Self::take
pub(crate) struct NodePool<I, V, const ORDER: usize> {
    spare: Vec<Box<Node<I, V, ORDER>>>,
}

impl<I, V, const ORDER: usize> NodePool<I, V, ORDER> {
    pub fn new() -> Self {
        NodePool { spare: Vec::new() }
    }

    /// The number of nodes a single write can allocate, for a tree of the given height
    ///
    /// An insertion into a tree of height `h` splits at most the `h + 1` nodes on its path, plus
    /// one new root. A write that replaces existing entries inserts nothing itself, but can spawn
    /// two re-insertions: the first into the tree as it was, the second into a tree that may have
    /// grown by a level.
    pub fn nodes_for_write(height: u8) -> usize {
        let h = height as usize;
        (h + 2) + (h + 3)
    }

    /// The number of nodes currently available
    #[cfg(test)]
    pub fn available(&self) -> usize {
        self.spare.len()
    }

    /// Makes sure that at least `count` nodes are available
    pub fn reserve(&mut self, count: usize) -> Result<()> {
        if self.spare.len() >= count {
            return Ok(());
        }

        let missing = count - self.spare.len();
        self.spare.try_reserve(missing)?;
        for _ in 0..missing {
            self.spare.push(Node::try_alloc()?);
        }

        debug_println!("node pool: allocated {missing} nodes");
        Ok(())
    }

    /// Takes an empty node at the given height out of the pool
    ///
    /// ## Panics
    ///
    /// This method panics if the pool is empty, which means the prior call to [`reserve`] didn't
    /// ask for enough nodes.
    ///
    /// [`reserve`]: Self::reserve
    pub fn take(&mut self, height: u8) -> Box<Node<I, V, ORDER>> {
        let mut node = match self.spare.pop() {
            Some(n) => n,
            None => panic!("figtree invariant violated: node pool exhausted during a write"),
        };

        node.reset(height);
        node
    }
}
