//! Error types for [`FigTree`] operations
//!
//! Only conditions the caller can do something about are reported through [`Error`]: a bad
//! argument, or the allocator refusing to hand out memory for new nodes. Broken internal
//! invariants are bugs in this crate and panic instead, with a message naming the failed check.
//!
//! [`FigTree`]: crate::FigTree

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can be returned by [`FigTree`](crate::FigTree) operations
///
/// Index values are stored pre-formatted (via their `Debug` implementation) so that the error type
/// doesn't need to be generic over the index type.
#[derive(Error, Debug)]
pub enum Error {
    /// The start of a range was after its end
    ///
    /// Ranges passed to [`write`] are inclusive on both ends, so a single index is written with
    /// `start == end`.
    ///
    /// [`write`]: crate::FigTree::write
    #[error("invalid range: start {start} is after end {end}")]
    InvertedRange { start: String, end: String },

    /// An index fell outside of the domain the tree was configured with
    #[error("index {index} is outside of the tree's domain [{min}, {max}]")]
    OutOfDomain {
        index: String,
        min: String,
        max: String,
    },

    /// A custom domain was requested with its minimum above its maximum
    #[error("cannot construct a domain with min {min} greater than max {max}")]
    EmptyDomain { min: String, max: String },

    /// The allocator failed to provide memory for a new node
    #[error("failed to allocate a node of {size} bytes")]
    AllocFailed { size: usize },

    /// Reserving space for node contents or the node pool failed
    #[error("failed to reserve node storage")]
    Reserve(#[from] TryReserveError),
}

/// A `Result` type alias using this crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn inverted<I: std::fmt::Debug>(start: I, end: I) -> Self {
        Error::InvertedRange {
            start: format!("{start:?}"),
            end: format!("{end:?}"),
        }
    }

    pub(crate) fn out_of_domain<I: std::fmt::Debug>(index: I, min: I, max: I) -> Self {
        Error::OutOfDomain {
            index: format!("{index:?}"),
            min: format!("{min:?}"),
            max: format!("{max:?}"),
        }
    }
}
