//! Types to go with a custom [`std::ops::RangeBounds`] trait
//!
//! [`FigTree::read`] accepts any of the standard library's range types. We can't use the
//! standard library's trait directly, because an excluded start bound would need an increment
//! that may not exist at `I::MAX`; this module provides a version of the trait with distinct
//! [`StartBound`] and [`EndBound`] types (adapted from [`Bound`](std::ops::Bound)) that simply
//! can't express one.
//!
//! The main addition is [`RangeBounds::to_interval`], which resolves any supported range to the
//! closed [`Interval`] that the tree works with.
//!
//! [`FigTree::read`]: crate::FigTree::read

#[cfg(feature = "fuzz")]
use arbitrary::Arbitrary;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::error::{Error, Result};
use crate::{Index, Interval};

/// The starting bound of a range
///
/// Refer to the [module documentation](self) for more information.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzz", derive(Arbitrary))]
pub enum StartBound<T> {
    Included(T),
    Unbounded,
}

/// The ending bound of a range
///
/// Refer to the [module documentation](self) for more information.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzz", derive(Arbitrary))]
pub enum EndBound<T> {
    Included(T),
    Excluded(T),
    Unbounded,
}

/// A `std::ops::RangeBounds`-like trait that disallows exclusive start bounds
///
/// Aside from disallowing exclusive starting bounds, this trait is essentially the same as the
/// standard library's version. Implementations are provided for all of the range types in
/// [`std::ops`], because none of them have exclusive start bounds.
pub trait RangeBounds<T> {
    /// Returns the starting bound of the range
    fn start_bound(&self) -> StartBound<&T>;
    /// Returns the ending bound of the range
    fn end_bound(&self) -> EndBound<&T>;

    /// Returns `true` if `item` is contained within the range
    fn contains(&self, item: &T) -> bool
    where
        T: Ord,
    {
        (match self.start_bound() {
            StartBound::Included(start) => start <= item,
            StartBound::Unbounded => true,
        }) && (match self.end_bound() {
            EndBound::Included(end) => item <= end,
            EndBound::Excluded(end) => item < end,
            EndBound::Unbounded => true,
        })
    }

    /// Returns whether the start of the range is after the end
    ///
    /// A range like `5..5` is empty, but not inverted; `6..5` and `6..=5` are both inverted.
    fn starts_after_end(&self) -> bool
    where
        T: Ord,
    {
        match (self.start_bound(), self.end_bound()) {
            (StartBound::Unbounded, _) | (_, EndBound::Unbounded) => false,

            (StartBound::Included(x), EndBound::Included(y)) => x > y,
            (StartBound::Included(x), EndBound::Excluded(y)) => x > y,
        }
    }

    /// Resolves the range to a closed [`Interval`]
    ///
    /// Unbounded sides extend to `T::MIN` or `T::MAX`. Empty ranges (like `5..5`, or `..0`)
    /// produce the empty interval; inverted ranges (like `6..5`) are an error.
    fn to_interval(&self) -> Result<Interval<T>>
    where
        T: Index,
    {
        if self.starts_after_end() {
            let start = match self.start_bound() {
                StartBound::Included(s) => *s,
                StartBound::Unbounded => T::MIN,
            };
            let end = match self.end_bound() {
                EndBound::Included(e) | EndBound::Excluded(e) => *e,
                EndBound::Unbounded => T::MAX,
            };
            return Err(Error::inverted(start, end));
        }

        let lo = match self.start_bound() {
            StartBound::Included(s) => *s,
            StartBound::Unbounded => T::MIN,
        };
        let hi = match self.end_bound() {
            EndBound::Included(e) => *e,
            EndBound::Excluded(e) => match e.predecessor() {
                Some(e) => e,
                None => return Ok(Interval::empty()),
            },
            EndBound::Unbounded => T::MAX,
        };

        Ok(Interval::new(lo, hi))
    }
}

impl<T> StartBound<T> {
    fn as_ref(&self) -> StartBound<&T> {
        match self {
            StartBound::Included(v) => StartBound::Included(v),
            StartBound::Unbounded => StartBound::Unbounded,
        }
    }
}

impl<T> EndBound<T> {
    fn as_ref(&self) -> EndBound<&T> {
        match self {
            EndBound::Included(v) => EndBound::Included(v),
            EndBound::Excluded(v) => EndBound::Excluded(v),
            EndBound::Unbounded => EndBound::Unbounded,
        }
    }
}

// Blanket implementation for references
impl<T, R> RangeBounds<T> for &R
where
    R: RangeBounds<T>,
{
    fn start_bound(&self) -> StartBound<&T> {
        (*self).start_bound()
    }
    fn end_bound(&self) -> EndBound<&T> {
        (*self).end_bound()
    }
}

impl<T> RangeBounds<T> for (StartBound<T>, EndBound<T>) {
    fn start_bound(&self) -> StartBound<&T> {
        self.0.as_ref()
    }
    fn end_bound(&self) -> EndBound<&T> {
        self.1.as_ref()
    }
}

impl<T> RangeBounds<T> for RangeInclusive<T> {
    fn start_bound(&self) -> StartBound<&T> {
        StartBound::Included(self.start())
    }
    fn end_bound(&self) -> EndBound<&T> {
        EndBound::Included(self.end())
    }
}

impl<T> RangeBounds<T> for RangeFull {
    fn start_bound(&self) -> StartBound<&T> {
        StartBound::Unbounded
    }
    fn end_bound(&self) -> EndBound<&T> {
        EndBound::Unbounded
    }
}

// Helper macro to implement `RangeBounds` for the ranges with `start` and `end` fields that we can
// use.
macro_rules! impl_rangebounds {
    ( $base_ty:ident: $start:ident .. $end:ident ) => {
        impl<T> RangeBounds<T> for $base_ty<T> {
            impl_rangebounds!(@bound start_bound StartBound start $start);
            impl_rangebounds!(@bound end_bound EndBound end $end);
        }
    };

    (@bound $method:ident $ty:ident $field:ident Included) => {
        fn $method(&self) -> $ty<&T> {
            $ty::Included(&self.$field)
        }
    };
    (@bound $method:ident $ty:ident $field:ident Excluded) => {
        fn $method(&self) -> $ty<&T> {
            $ty::Excluded(&self.$field)
        }
    };
    (@bound $method:ident $ty:ident $get:ident Unbounded) => {
        fn $method(&self) -> $ty<&T> {
            $ty::Unbounded
        }
    };
}

impl_rangebounds!(Range: Included..Excluded);
impl_rangebounds!(RangeFrom: Included..Unbounded);
impl_rangebounds!(RangeTo: Unbounded..Excluded);
impl_rangebounds!(RangeToInclusive: Unbounded..Included);

#[cfg(test)]
mod tests {
    use super::{EndBound, RangeBounds, StartBound};
    use crate::{Error, Interval};

    #[test]
    fn resolves_std_ranges() {
        assert_eq!((3_u8..7).to_interval().unwrap(), Interval::new(3, 6));
        assert_eq!((3_u8..=7).to_interval().unwrap(), Interval::new(3, 7));
        assert_eq!((250_u8..).to_interval().unwrap(), Interval::new(250, 255));
        assert_eq!((..=4_u8).to_interval().unwrap(), Interval::new(0, 4));
        assert_eq!(RangeBounds::<u8>::to_interval(&..).unwrap(), Interval::full());
    }

    #[test]
    fn empty_but_not_inverted() {
        assert!((..0_u8).to_interval().unwrap().is_empty());
        assert!((5_u8..5).to_interval().unwrap().is_empty());
        let bounds = (StartBound::Included(0_u16), EndBound::Excluded(0_u16));
        assert!(bounds.to_interval().unwrap().is_empty());
    }

    #[test]
    fn contains_respects_each_bound() {
        assert!(RangeBounds::contains(&(3_u8..7), &3));
        assert!(!RangeBounds::contains(&(3_u8..7), &7));
        assert!(RangeBounds::contains(&(3_u8..=7), &7));
        assert!(!RangeBounds::contains(&(3_u8..=7), &2));
        assert!(RangeBounds::contains(&(..=4_u8), &0));
        assert!(RangeBounds::<u8>::contains(&.., &255));

        let bounds = (StartBound::Unbounded, EndBound::Excluded(10_u16));
        assert!(bounds.contains(&9));
        assert!(!bounds.contains(&10));
    }

    #[test]
    fn inverted_is_an_error() {
        let (hi, lo) = (6_u8, 5_u8);
        assert!(matches!((hi..lo).to_interval(), Err(Error::InvertedRange { .. })));
        assert!(matches!((hi..=lo).to_interval(), Err(Error::InvertedRange { .. })));
    }
}
