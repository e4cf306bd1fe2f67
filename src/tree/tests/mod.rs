//! Various collections of unit tests
//!
//! The bulk of the "we're confident this works" comes from comparing against the flat-array
//! [`Mock`](crate::mock::Mock), either with seeded random writes here or through fuzzing. Each
//! failure found that way is kept as a new manual test case.

/// Manually-written test cases
mod manual;

use super::node::Node;
use super::FigTree;

/// The number of materialized nodes in the tree, counting the root
fn node_count<I, V, const ORDER: usize>(tree: &FigTree<I, V, ORDER>) -> usize {
    fn count<I, V, const ORDER: usize>(node: &Node<I, V, ORDER>) -> usize {
        1 + node.children().iter().filter_map(|c| c.as_node()).map(count).sum::<usize>()
    }

    count(&tree.root)
}

/// The number of entries stored directly in the root node
fn root_len<I, V, const ORDER: usize>(tree: &FigTree<I, V, ORDER>) -> usize {
    tree.root.len()
}
