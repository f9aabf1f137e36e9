//! Collections.
//!
//! - `pair`: the two-field element type stored by the maps
//! - `tree`: the threaded binary search tree map

pub mod pair;
pub mod tree;

pub use pair::{make_pair, Pair};
pub use tree::{Comparator, Cursor, CursorMut, InvariantViolation, NaturalOrder, Position, ReverseOrder, ThreadedMap};
