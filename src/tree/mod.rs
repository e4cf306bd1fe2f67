//! Wrapper module containing the big-boy tree itself

use std::fmt::{self, Debug, Formatter};

use crate::error::Result;
use crate::param::{self, Domain, DEFAULT_ORDER};
use crate::public_traits::Index;
use crate::range::RangeBounds;
use crate::Interval;

mod insert;
mod iter;
mod node;
mod pool;
mod subtree;
#[cfg(test)]
mod tests;

pub use iter::Read;

use node::Node;
use pool::NodePool;

/// *Raison d'être of the crate*: a B-tree mapping ranges of indexes to values
///
/// The problem it solves is simple to state:
///
/// > Given a fixed, large index space (say, every byte offset in a file), repeatedly assign a
/// value to some range of it, and find out what was most recently assigned at any index
///
/// A flat array works, but costs memory for every index whether or not it's ever written. A tree
/// of non-overlapping ranges costs memory proportional to the number of distinct ranges instead --
/// but then a write has to find every range it covers, delete the ones it swallows whole, and trim
/// the ones it only partly covers, which gets expensive.
///
/// `FigTree` makes writes cheap by being lazy about that cleanup. Each node only claims the part of
/// the index space between its parent's neighboring entries, and anything it holds outside of that
/// is simply ignored until a later write passes through and prunes it. A write overwrites the
/// entries it overlaps at the highest node where it finds any, without ever visiting the subtrees
/// underneath them.
///
/// ## Examples
///
/// ```
/// use figtree::FigTree;
///
/// let mut tree: FigTree<u32, &str> = FigTree::new();
/// tree.write(0, 99, "clean").unwrap();
/// tree.write(40, 59, "dirty").unwrap();
///
/// assert_eq!(tree.lookup(39), Some(&"clean"));
/// assert_eq!(tree.lookup(40), Some(&"dirty"));
/// assert_eq!(tree.lookup(60), Some(&"clean"));
/// assert_eq!(tree.lookup(100), None);
///
/// let ranges: Vec<_> = tree
///     .read(30..50)
///     .unwrap()
///     .map(|(r, v)| (r.to_range().unwrap(), *v))
///     .collect();
/// assert_eq!(ranges, [(30..=39, "clean"), (40..=49, "dirty")]);
/// ```
///
/// ## Parameters
///
/// The index type `I` is one of the unsigned integers (see [`Index`]), and values `V` can be
/// anything -- although writes that cut an existing range in two need to clone its value, so
/// [`write`] requires `V: Clone`.
///
/// The constant `ORDER` sets the size of each node: nodes hold at most `2 * ORDER` entries, and
/// split in half when they overflow. It's required to be between 1 and 127, inclusive. Unlike
/// many B-trees, there's no minimum: nodes that lose entries to pruning are never merged.
///
/// [`write`]: Self::write
pub struct FigTree<I, V, const ORDER: usize = DEFAULT_ORDER> {
    root: Box<Node<I, V, ORDER>>,
    domain: Domain<I>,
    pool: NodePool<I, V, ORDER>,
}

impl<I: Index, V, const ORDER: usize> FigTree<I, V, ORDER> {
    /// Creates a new, empty `FigTree` over every value of `I`
    ///
    /// ## Panics
    ///
    /// This method panics if `ORDER` is not between 1 and 127. It does not check for allocation
    /// failure; use [`try_new`] for that.
    ///
    /// [`try_new`]: Self::try_new
    pub fn new() -> Self {
        param::assert_reasonable_order::<ORDER>();

        FigTree {
            root: Node::new(0),
            domain: Domain::full(),
            pool: NodePool::new(),
        }
    }

    /// Creates a new, empty `FigTree` over the given domain, returning an error if the root node
    /// can't be allocated
    ///
    /// ## Panics
    ///
    /// This method panics if `ORDER` is not between 1 and 127.
    pub fn try_new(domain: Domain<I>) -> Result<Self> {
        param::assert_reasonable_order::<ORDER>();

        Ok(FigTree {
            root: Node::try_alloc()?,
            domain,
            pool: NodePool::new(),
        })
    }

    /// Creates a new, empty `FigTree` accepting only indexes in `min..=max`
    ///
    /// Returns an error if `min > max`, or if allocation fails.
    pub fn with_domain(min: I, max: I) -> Result<Self> {
        Self::try_new(Domain::new(min, max)?)
    }

    /// Returns the range of indexes that the tree accepts
    pub fn domain(&self) -> Domain<I> {
        self.domain
    }

    /// Returns the height of the tree, where a tree with only a root node has height zero
    pub fn height(&self) -> u8 {
        self.root.height()
    }

    /// Returns `true` if nothing has been written to the tree since it was created or cleared
    pub fn is_empty(&self) -> bool {
        self.root.len() == 0
    }

    /// Removes everything from the tree
    ///
    /// The tree keeps its domain, and the root node's storage is reused.
    pub fn clear(&mut self) {
        self.root.reset(0);
    }

    /// Returns the value most recently written to `location`, if there is one
    ///
    /// Indexes outside of the tree's domain can never be written, so looking them up always
    /// returns `None`.
    pub fn lookup(&self, location: I) -> Option<&V> {
        let mut node: &Node<I, V, ORDER> = &self.root;

        'descend: loop {
            for (i, entry) in node.entries().iter().enumerate() {
                if entry.range.contains_point(location) {
                    return Some(&entry.value);
                } else if entry.range.left() > location {
                    node = node.child(i).as_node()?;
                    continue 'descend;
                }
            }

            node = node.child(node.len()).as_node()?;
        }
    }

    /// Returns an iterator over the written ranges intersecting `range`, clipped to it
    ///
    /// Any part of `range` outside of the tree's domain is ignored. Refer to [`Read`] for more
    /// information.
    ///
    /// ## Errors
    ///
    /// This method returns an error if the start of `range` is after its end. Empty ranges (like
    /// `5..5`) are fine, and produce an empty iterator.
    pub fn read<R: RangeBounds<I>>(&self, range: R) -> Result<Read<'_, I, V, ORDER>> {
        let query = range.to_interval()?;
        Ok(Read::new(&self.root, self.domain.interval(), query))
    }

    /// Returns an iterator over everything written to the tree, in ascending order
    pub fn iter(&self) -> Read<'_, I, V, ORDER> {
        let domain = self.domain.interval();
        Read::new(&self.root, domain, domain)
    }
}

impl<I: Index, V, const ORDER: usize> Default for FigTree<I, V, ORDER> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Index, V: Clone, const ORDER: usize> Clone for FigTree<I, V, ORDER> {
    fn clone(&self) -> Self {
        FigTree {
            root: self.root.clone(),
            domain: self.domain,
            pool: NodePool::new(),
        }
    }
}

impl<'t, I: Index, V, const ORDER: usize> IntoIterator for &'t FigTree<I, V, ORDER> {
    type Item = (Interval<I>, &'t V);
    type IntoIter = Read<'t, I, V, ORDER>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<I: Index, V: Debug, const ORDER: usize> Debug for FigTree<I, V, ORDER> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        struct Entries<'t, I, V, const ORDER: usize>(&'t FigTree<I, V, ORDER>);

        impl<I: Index, V: Debug, const ORDER: usize> Debug for Entries<'_, I, V, ORDER> {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                f.debug_map().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("FigTree")
            .field("domain", &self.domain)
            .field("height", &self.height())
            .field("entries", &Entries(self))
            .finish()
    }
}

#[cfg(any(test, feature = "fuzz"))]
macro_rules! valid_assert {
    ($path:ident: $cond:expr) => {
        if !$cond {
            panic!(
                concat!("assertion failed: `", stringify!($cond), "` for path {:?}"),
                $path
            );
        }
    };
}

#[cfg(any(test, feature = "fuzz"))]
macro_rules! valid_assert_eq {
    ($path:ident: $lhs:expr, $rhs:expr) => {
        let left = $lhs;
        let right = $rhs;
        if left != right {
            panic!(
                concat!(
                    "assertion failed: `",
                    stringify!($lhs == $rhs),
                    "` for path {:?}:\n",
                    " left: {:?}\n",
                    "right: {:?}",
                ),
                $path, left, right,
            );
        }
    };
}

#[cfg(any(test, feature = "fuzz"))]
impl<I: Index, V, const ORDER: usize> FigTree<I, V, ORDER> {
    /// (*Test-only*) Validates the tree, panicking if any of the structural rules are broken
    ///
    /// This method basically exists for tests so that we can quickly narrow down exactly when a
    /// failure is introduced in a particular test case. On top of the shape of each node, it checks
    /// that the tree's effective contents -- with stale content filtered out -- are sorted,
    /// disjoint, and inside the domain.
    pub fn validate(&self) {
        let mut path = Vec::new();
        Self::validate_node(&self.root, &mut path);

        let domain = self.domain.interval();
        let mut previous: Option<Interval<I>> = None;
        for (range, _) in self.iter() {
            valid_assert!(path: domain.contains(&range));
            if let Some(p) = previous {
                valid_assert!(path: p.left_of(&range));
            }
            previous = Some(range);
        }
    }

    /// Called by `validate` to check a single node and its children
    fn validate_node(node: &Node<I, V, ORDER>, path: &mut Vec<usize>) {
        valid_assert!(path: node.len() <= Node::<I, V, ORDER>::MAX_ENTRIES);
        valid_assert_eq!(path: node.children().len(), node.len() + 1);

        let entries = node.entries();
        for (i, entry) in entries.iter().enumerate() {
            valid_assert!(path: !entry.range.is_empty());
            if i != 0 {
                valid_assert!(path: entries[i - 1].range.left_of(&entry.range));
            }
        }

        for (i, child) in node.children().iter().enumerate() {
            path.push(i);
            valid_assert!(path: child.fits_under(node.height()));
            if let Some(c) = child.as_node() {
                Self::validate_node(c, path);
            }
            path.pop();
        }
    }
}
