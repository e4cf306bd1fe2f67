//! Wrapper module for [`Subtree`], the contents of a single child slot

use super::node::Node;

/// A child slot in a [`Node`]
///
/// "No node here" means one of two different things depending on where the slot is. Below a leaf
/// (`height == 0`) there's structurally nothing: the slot is [`Absent`]. Anywhere else, the slot
/// stands for a region that has simply never been written, which would be a whole subtree of
/// default values if it were ever built out -- that's [`Implicit`], which records the height such
/// a subtree would have.
///
/// Writes that reach a vacant slot insert into the parent node directly, so implicit regions never
/// need to be materialized.
///
/// [`Absent`]: Subtree::Absent
/// [`Implicit`]: Subtree::Implicit
#[derive(Clone)]
pub(crate) enum Subtree<I, V, const ORDER: usize> {
    Absent,
    Implicit { height: u8 },
    Node(Box<Node<I, V, ORDER>>),
}

impl<I, V, const ORDER: usize> Subtree<I, V, ORDER> {
    /// The vacant slot for a child of a node at `parent_height`
    pub fn vacant(parent_height: u8) -> Self {
        match parent_height {
            0 => Subtree::Absent,
            h => Subtree::Implicit { height: h - 1 },
        }
    }

    pub fn as_node(&self) -> Option<&Node<I, V, ORDER>> {
        match self {
            Subtree::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut Node<I, V, ORDER>> {
        match self {
            Subtree::Node(n) => Some(n),
            _ => None,
        }
    }

    /// The height of the subtree in this slot, or `None` if the slot is [`Absent`]
    ///
    /// [`Absent`]: Subtree::Absent
    #[cfg(any(test, feature = "fuzz"))]
    pub fn height(&self) -> Option<u8> {
        match self {
            Subtree::Absent => None,
            Subtree::Implicit { height } => Some(*height),
            Subtree::Node(n) => Some(n.height()),
        }
    }

    /// Returns `true` if this is a valid child slot for a node at `parent_height`
    #[cfg(any(test, feature = "fuzz"))]
    pub fn fits_under(&self, parent_height: u8) -> bool {
        match parent_height {
            0 => matches!(self, Subtree::Absent),
            h => self.height() == Some(h - 1),
        }
    }

    /// Releases whatever is in the slot, leaving it vacant
    ///
    /// Nodes exclusively own their children, so dropping the box here releases the whole subtree
    /// below it -- this is the only place the tree frees nodes outside of its own destructor.
    pub fn free(&mut self, parent_height: u8) {
        if let Subtree::Node(_) = self {
            debug_println!("freeing subtree at height {}", parent_height - 1);
        }
        *self = Subtree::vacant(parent_height);
    }
}
