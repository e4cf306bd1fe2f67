//! Mock implementation with essentially the same API as [`FigTree`], but backed by a vector
//!
//! [`FigTree`]: crate::FigTree

use crate::range::RangeBounds;
use crate::{Index, Interval};

/// A mock, inefficient implementation of the [`FigTree`](crate::FigTree) interface
///
/// Every index in the domain gets its own cell, so this is only usable for small domains (or the
/// `u8`/`u16` index types). Invalid arguments panic, instead of producing an error.
#[derive(Debug, Clone)]
pub struct Mock<I, V> {
    min: I,
    cells: Vec<Option<V>>,
}

/// The largest number of cells we're willing to allocate for a single mock
const MAX_CELLS: u64 = 1 << 20;

impl<I, V> Mock<I, V>
where
    I: Index + Into<u64> + TryFrom<u64>,
    V: Clone + PartialEq,
{
    /// Creates a new, empty mock over `min..=max`
    pub fn new(min: I, max: I) -> Self {
        if min > max {
            panic!("empty domain");
        }

        let size = max.into() - min.into() + 1;
        if size > MAX_CELLS {
            panic!("domain too large for a mock");
        }

        Mock { min, cells: vec![None; size as usize] }
    }

    /// Creates a new, empty mock over every value of `I`
    pub fn full() -> Self {
        Self::new(I::MIN, I::MAX)
    }

    fn offset(&self, index: I) -> Option<usize> {
        let off = index.into().checked_sub(self.min.into())?;
        (off < self.cells.len() as u64).then_some(off as usize)
    }

    fn index_at(&self, offset: usize) -> I {
        match I::try_from(self.min.into() + offset as u64) {
            Ok(i) => i,
            Err(_) => panic!("offset out of range"),
        }
    }

    pub fn write(&mut self, start: I, end: I, value: V) {
        if start > end {
            panic!("inverted range");
        }

        let (lo, hi) = match (self.offset(start), self.offset(end)) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => panic!("index out of domain"),
        };

        for cell in &mut self.cells[lo..=hi] {
            *cell = Some(value.clone());
        }
    }

    pub fn lookup(&self, location: I) -> Option<&V> {
        self.cells[self.offset(location)?].as_ref()
    }

    /// Returns the maximal runs of equal values intersecting `range`, clipped to it
    pub fn read<R: RangeBounds<I>>(&self, range: R) -> Vec<(I, I, V)> {
        if range.starts_after_end() {
            panic!("inverted range");
        }

        let mut runs: Vec<(I, I, V)> = Vec::new();
        for (offset, cell) in self.cells.iter().enumerate() {
            let index = self.index_at(offset);
            let value = match cell {
                Some(v) if range.contains(&index) => v,
                _ => continue,
            };

            match runs.last_mut() {
                Some((_, end, v)) if v == value && end.successor() == Some(index) => *end = index,
                _ => runs.push((index, index, value.clone())),
            }
        }

        runs
    }
}

/// Collects the output of [`FigTree::read`] into maximal runs of equal values, the same form that
/// [`Mock::read`] produces
///
/// The tree doesn't merge neighboring ranges with equal values, so its raw output can't be compared
/// directly.
///
/// [`FigTree::read`]: crate::FigTree::read
pub fn coalesce<'v, I, V>(items: impl IntoIterator<Item = (Interval<I>, &'v V)>) -> Vec<(I, I, V)>
where
    I: Index,
    V: 'v + Clone + PartialEq,
{
    let mut runs: Vec<(I, I, V)> = Vec::new();
    for (range, value) in items {
        let (start, end) = match range.to_range() {
            Some(r) => r.into_inner(),
            None => panic!("empty range in read output"),
        };

        match runs.last_mut() {
            Some((_, e, v)) if v == value && e.successor() == Some(start) => *e = end,
            _ => runs.push((start, end, value.clone())),
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::{coalesce, Mock};
    use crate::Interval;

    #[test]
    fn overwrite_and_read() {
        let mut mock: Mock<u8, char> = Mock::full();
        mock.write(10, 20, 'a');
        mock.write(15, 16, 'b');
        mock.write(17, 30, 'a');

        assert_eq!(mock.lookup(14), Some(&'a'));
        assert_eq!(mock.lookup(16), Some(&'b'));
        assert_eq!(mock.lookup(31), None);
        assert_eq!(mock.read(..), [(10, 14, 'a'), (15, 16, 'b'), (17, 30, 'a')]);
        assert_eq!(mock.read(12..=15), [(12, 14, 'a'), (15, 15, 'b')]);
        assert_eq!(mock.read(12..15), [(12, 14, 'a')]);
        assert!(mock.read(15..15).is_empty());
    }

    #[test]
    fn custom_domain() {
        let mut mock: Mock<u16, u8> = Mock::new(100, 199);
        mock.write(100, 199, 1);
        assert_eq!(mock.lookup(99), None);
        assert_eq!(mock.lookup(200), None);
        assert_eq!(mock.read(..), [(100, 199, 1)]);
    }

    #[test]
    fn coalesce_merges_neighbors() {
        let (a, b) = ('a', 'b');
        let items = [
            (Interval::new(0_u8, 3), &a),
            (Interval::new(4, 4), &a),
            (Interval::new(6, 9), &a),
            (Interval::new(10, 11), &b),
        ];
        assert_eq!(coalesce(items), [(0, 4, 'a'), (6, 9, 'a'), (10, 11, 'b')]);
    }
}
