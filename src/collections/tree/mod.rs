//! Threaded binary search tree map.
//!
//! - [`ThreadedMap`]: ordered map with unique keys, bidirectional positions
//!   and cursors, bounds and range queries.
//! - [`Comparator`]: key ordering injected at construction.
//! - [`InvariantViolation`]: what [`ThreadedMap::check_invariants`] reports.

#[cfg(any(test, feature = "proptest"))]
pub mod arbitrary;
mod compare;
mod cursor;
mod invariant;
mod iter;
mod map;
mod navigate;
mod node;
mod remove;
mod serialize;

pub use compare::{Comparator, NaturalOrder, PairCompare, ReverseOrder};
pub use cursor::{Cursor, CursorMut};
pub use invariant::InvariantViolation;
pub use iter::{IntoIter, Iter, Keys, Range, Values};
pub use map::ThreadedMap;
pub use node::{Node, Position};
