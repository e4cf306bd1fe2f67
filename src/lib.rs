//! # Figtree -- an interval-keyed B-tree with lazy overwrites
//!
//! Sometimes you need to know, for every byte of some large address space, which thing last
//! touched it: which write to a block device, which allocation in a heap, which edit to a file.
//! This crate exports a single type -- [`FigTree`] -- for exactly that. It maps ranges of indexes
//! in a bounded domain to values, where each write assigns a value to a whole range at once and
//! overwrites whatever was there before.
//!
//! ### Notable features
//!
//! * Writes cost `O(log n)` node visits, no matter how many previous ranges they cover. Covered
//!     ranges aren't visited individually; a whole subtree can be made obsolete by a single entry
//!     above it, and is only cleaned up once a later write passes through it.
//! * Lookups of a single index, and in-order reads of every range intersecting a query
//! * Fallible allocation -- everything a write might need is reserved before the tree is touched,
//!     so running out of memory is reported as an [`Error`] with the tree left intact
//! * Configurable node size (the const generic `ORDER`) and index domain (a [`Domain`])
//!
//! ### Feature flags
//!
//! * `serde` -- implements `Serialize` and `Deserialize` for [`FigTree`], as a sequence of
//!     `(start, end, value)` triples
//! * `fuzz` -- exposes the flat-array mock and the tree's internal validation, for use by the
//!     fuzzing harness in this repository
//!
//! ### Naming
//!
//! A strangler fig grows over its host tree until the host is entirely covered and rots away
//! inside of it. Writes to this tree do much the same to the entries underneath them.

#![deny(unsafe_op_in_unsafe_fn)]

#[macro_use]
mod macros;

pub mod param;
pub mod range;

mod error;
mod interval;
mod public_traits;
mod tree;

#[cfg(any(test, feature = "fuzz"))]
pub mod mock;

#[cfg(feature = "serde")]
mod serde;

pub use error::{Error, Result};
pub use interval::Interval;
pub use param::{Domain, DEFAULT_ORDER};
pub use public_traits::Index;
pub use tree::{FigTree, Read};
