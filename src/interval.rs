//! Closed intervals over an [`Index`] domain, with an explicit empty state
//!
//! Every key in a [`FigTree`] is an [`Interval`], as is every bound the tree computes while
//! descending. Because indexes are unsigned and bounded, "one before the minimum" can't be
//! represented -- so instead of ever computing `left - 1` directly, the empty interval is its own
//! state, and anything that would step off the edge of the domain produces it.
//!
//! All of the operations here are total and never allocate.
//!
//! [`FigTree`]: crate::FigTree

use crate::Index;
use std::fmt::{self, Debug, Formatter};
use std::ops::RangeInclusive;

/// A closed range `[left, right]` of indexes, or the empty interval
///
/// Empty intervals always compare equal to each other, regardless of how they were produced.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Interval<I> {
    left: I,
    right: I,
    nonempty: bool,
}

impl<I: Index> Interval<I> {
    /// Creates the interval `[left, right]`
    ///
    /// If `left > right`, the result is the empty interval.
    pub fn new(left: I, right: I) -> Self {
        if left > right {
            return Self::empty();
        }

        Interval { left, right, nonempty: true }
    }

    /// Creates the interval containing only `index`
    pub fn point(index: I) -> Self {
        Interval { left: index, right: index, nonempty: true }
    }

    /// Returns the empty interval
    pub fn empty() -> Self {
        Interval { left: I::MIN, right: I::MIN, nonempty: false }
    }

    /// Returns the interval covering every value of `I`
    pub fn full() -> Self {
        Interval { left: I::MIN, right: I::MAX, nonempty: true }
    }

    /// Returns `true` if the interval contains no indexes
    pub fn is_empty(&self) -> bool {
        !self.nonempty
    }

    /// Returns the lower edge of the interval, if it isn't empty
    pub fn start(&self) -> Option<I> {
        self.nonempty.then_some(self.left)
    }

    /// Returns the upper edge of the interval, if it isn't empty
    pub fn end(&self) -> Option<I> {
        self.nonempty.then_some(self.right)
    }

    /// Converts the interval to a standard library range, if it isn't empty
    pub fn to_range(&self) -> Option<RangeInclusive<I>> {
        self.nonempty.then(|| self.left..=self.right)
    }

    /// (*Internal*) Lower edge, for intervals known to be non-empty
    pub(crate) fn left(&self) -> I {
        weak_invariant!(
            self.nonempty,
            "figtree invariant violated: took the left edge of an empty interval"
        );
        self.left
    }

    /// (*Internal*) Upper edge, for intervals known to be non-empty
    pub(crate) fn right(&self) -> I {
        weak_invariant!(
            self.nonempty,
            "figtree invariant violated: took the right edge of an empty interval"
        );
        self.right
    }

    /// Returns `true` if at least one index is in both intervals
    pub fn overlaps(&self, other: &Self) -> bool {
        self.nonempty && other.nonempty && self.left <= other.right && other.left <= self.right
    }

    /// Returns `true` if `index` is within the interval
    pub fn contains_point(&self, index: I) -> bool {
        self.nonempty && self.left <= index && index <= self.right
    }

    /// Returns `true` if every index in `other` is also in `self`
    ///
    /// The empty interval is contained in every interval.
    pub fn contains(&self, other: &Self) -> bool {
        !other.nonempty || (self.nonempty && self.left <= other.left && other.right <= self.right)
    }

    /// Returns `true` if every index in `self` is strictly less than every index in `other`
    pub fn left_of(&self, other: &Self) -> bool {
        self.nonempty && other.nonempty && self.right < other.left
    }

    /// Returns `true` if every index in `self` is strictly greater than every index in `other`
    pub fn right_of(&self, other: &Self) -> bool {
        self.nonempty && other.nonempty && self.left > other.right
    }

    /// Returns `true` if the left edge of `self` lies inside `other`
    ///
    /// The right edge of `self` may or may not extend past `other`. Among the entries following
    /// the first one that overlaps a new range, this is exactly the set that also overlaps it.
    pub fn left_overlaps(&self, other: &Self) -> bool {
        self.nonempty && other.contains_point(self.left)
    }

    /// Returns `true` if the right edge of `self` lies inside `other`
    ///
    /// The mirror image of [`left_overlaps`](Self::left_overlaps).
    pub fn right_overlaps(&self, other: &Self) -> bool {
        self.nonempty && other.contains_point(self.right)
    }

    /// Clamps the interval to `[lo, hi]`
    ///
    /// The result is empty if `lo > hi`, if `self` is empty, or if nothing in `self` falls within
    /// `[lo, hi]`.
    pub fn restrict(&self, lo: I, hi: I) -> Self {
        if !self.nonempty || lo > hi {
            return Self::empty();
        }

        Self::new(self.left.max(lo), self.right.min(hi))
    }

    /// Returns the indexes that are in both `self` and `other`
    pub fn intersect(&self, other: &Self) -> Self {
        match other.nonempty {
            true => self.restrict(other.left, other.right),
            false => Self::empty(),
        }
    }

    /// Returns the interval strictly between two optional neighbors
    ///
    /// A missing neighbor leaves that side open to the edge of `I`. If there's no room between the
    /// neighbors -- including when a neighbor touches `I::MIN` or `I::MAX` on the relevant side --
    /// the result is empty.
    pub fn gap(prev: Option<&Self>, next: Option<&Self>) -> Self {
        let lo = match prev {
            None => I::MIN,
            Some(p) => match p.right().successor() {
                Some(i) => i,
                None => return Self::empty(),
            },
        };
        let hi = match next {
            None => I::MAX,
            Some(n) => match n.left().predecessor() {
                Some(i) => i,
                None => return Self::empty(),
            },
        };

        Self::new(lo, hi)
    }
}

impl<I: Index> Default for Interval<I> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<I: Index> From<RangeInclusive<I>> for Interval<I> {
    fn from(range: RangeInclusive<I>) -> Self {
        let (left, right) = range.into_inner();
        Interval::new(left, right)
    }
}

impl<I: Debug> Debug for Interval<I> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.nonempty {
            true => write!(f, "[{:?}, {:?}]", self.left, self.right),
            false => f.write_str("[]"),
        }
    }
}
