//! Public-facing traits for implementing [`FigTree`](crate::FigTree)

use std::fmt::Debug;

/// Blanket trait for types that can be used as an index in a [`FigTree`]
///
/// Indexes are positions in a bounded, dense domain -- typically byte offsets. The tree never does
/// arithmetic on them beyond stepping to the neighboring position, and it never assumes that such
/// a neighbor exists: stepping past [`MIN`] or [`MAX`] simply produces `None`, which the interval
/// code turns into an empty range. This is why the tree can store a range ending at `u64::MAX`
/// without anything overflowing.
///
/// Implementations are provided for all of the unsigned primitive integers.
///
/// [`FigTree`]: crate::FigTree
/// [`MIN`]: Self::MIN
/// [`MAX`]: Self::MAX
pub trait Index: Debug + Copy + Ord {
    /// The smallest value of the type
    const MIN: Self;
    /// The largest value of the type
    const MAX: Self;

    /// Returns the index immediately after `self`, or `None` if `self` is the maximum
    fn successor(self) -> Option<Self>;

    /// Returns the index immediately before `self`, or `None` if `self` is the minimum
    fn predecessor(self) -> Option<Self>;
}

macro_rules! impl_for_unsigned_primitive {
    ($ty:ident) => {
        impl Index for $ty {
            const MIN: $ty = $ty::MIN;
            const MAX: $ty = $ty::MAX;

            fn successor(self) -> Option<Self> {
                self.checked_add(1)
            }

            fn predecessor(self) -> Option<Self> {
                self.checked_sub(1)
            }
        }
    };
}

impl_for_unsigned_primitive!(u8);
impl_for_unsigned_primitive!(u16);
impl_for_unsigned_primitive!(u32);
impl_for_unsigned_primitive!(u64);
impl_for_unsigned_primitive!(u128);
impl_for_unsigned_primitive!(usize);
