//! Parameterization for [`FigTree`]
//!
//! A tree has two knobs. The branching factor is the const generic `ORDER`, fixed at compile time
//! just like the node capacity of any B-tree: nodes split once they reach `2 * ORDER + 1` entries,
//! into two nodes of `ORDER` entries each plus the middle entry that moves up a level. The index
//! domain is a runtime value, a [`Domain`], and defaults to every value of the index type.
//!
//! ```
//! use figtree::FigTree;
//!
//! // A tree over byte offsets in a 4 KiB page, with smaller nodes than the default
//! type PageTree = FigTree<u16, char, 3>;
//! let tree = PageTree::with_domain(0, 4095).unwrap();
//! assert_eq!(tree.domain().max(), 4095);
//! ```
//!
//! [`FigTree`]: crate::FigTree

use crate::error::{Error, Result};
use crate::{Index, Interval};

/// The default value of `ORDER`; default parameterization for [`FigTree`]
///
/// With this value, nodes hold up to 10 entries between splits. Smaller nodes make each write
/// cheaper to propagate; larger ones make the tree shallower.
///
/// [`FigTree`]: crate::FigTree
pub const DEFAULT_ORDER: usize = 5;

/// The inclusive range of indexes a [`FigTree`] accepts
///
/// Writes that touch anything outside of the domain are rejected with
/// [`Error::OutOfDomain`]. Lookups outside of it simply find nothing.
///
/// [`FigTree`]: crate::FigTree
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Domain<I> {
    min: I,
    max: I,
}

impl<I: Index> Domain<I> {
    /// Creates a domain of `[min, max]`, failing if `min > max`
    pub fn new(min: I, max: I) -> Result<Self> {
        if min > max {
            return Err(Error::EmptyDomain {
                min: format!("{min:?}"),
                max: format!("{max:?}"),
            });
        }

        Ok(Domain { min, max })
    }

    /// The domain covering every value of `I`
    pub fn full() -> Self {
        Domain { min: I::MIN, max: I::MAX }
    }

    /// The smallest index in the domain
    pub fn min(&self) -> I {
        self.min
    }

    /// The largest index in the domain
    pub fn max(&self) -> I {
        self.max
    }

    /// Returns `true` if `index` is part of the domain
    pub fn contains(&self, index: I) -> bool {
        self.min <= index && index <= self.max
    }

    /// Returns an error unless `index` is part of the domain
    pub(crate) fn check(&self, index: I) -> Result<()> {
        match self.contains(index) {
            true => Ok(()),
            false => Err(Error::out_of_domain(index, self.min, self.max)),
        }
    }

    /// The domain, as an interval -- the valid bound of the root node
    pub(crate) fn interval(&self) -> Interval<I> {
        Interval::new(self.min, self.max)
    }
}

impl<I: Index> Default for Domain<I> {
    fn default() -> Self {
        Self::full()
    }
}

/// (*Internal*) Checks that the value of `ORDER` provided for a `FigTree` is within the allowed
/// bounds
pub(crate) const fn assert_reasonable_order<const ORDER: usize>() {
    // Node heights and child positions are small; a node holding more than 255 children at once
    // is far past the point of diminishing returns anyway.
    if ORDER > 127 {
        panic!("cannot construct FigTree: const ORDER must be <= 127");
    }

    // With ORDER = 0 a "split" would produce two empty nodes and push up the only entry, forever.
    if ORDER < 1 {
        panic!("cannot construct FigTree: const ORDER must be >= 1");
    }
}
