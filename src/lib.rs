//! # `threaded_map` - Ordered Map over a Threaded Binary Search Tree
//!
//! An ordered key-value container with unique keys, in the shape of a classic
//! standard-library map: `insert`, `find`, `erase`, `lower_bound`,
//! `upper_bound`, `equal_range`, bidirectional positions and an
//! `operator[]`-style `get_or_insert_default`.
//!
//! ## Architecture
//!
//! ### Threads instead of parent pointers
//!
//! Each node has two links. A link is either a `Child` subtree or a `Thread`
//! naming the in-order neighbor on that side. Stepping to the next element is
//! one thread hop, or a descent to the leftmost node of the right subtree, so
//! iteration needs neither a stack nor parent pointers.
//!
//! ### The sentinel
//!
//! `Position::End` is both `end()` and the target of the threads leaving the
//! smallest and largest elements. The map caches the root and both extremes,
//! so `begin()` and the step back from `end()` are O(1). Navigation wraps:
//! `next(end())` is `begin()`.
//!
//! ### Nodes and handles
//!
//! Nodes live in a [`NodeAlloc`] implementation, by default the [`NodePool`]
//! arena, and are named by generational [`NodeId`] handles. A position whose
//! element has been erased stops resolving instead of reading freed memory.
//!
//! ### Balance
//!
//! There is none. Every operation is O(height); inserting keys in sorted order
//! builds a linked list.
//!
//! ## Example
//!
//! ```rust
//! use threaded_map::ThreadedMap;
//!
//! let mut map = ThreadedMap::new();
//! for k in [5, 2, 8, 1, 9] {
//!     map.insert(k, k * 10);
//! }
//!
//! // Duplicates are rejected and leave the stored value alone.
//! let (pos, inserted) = map.insert(5, 0);
//! assert!(!inserted);
//! assert_eq!(map.get_at(pos), Some((&5, &50)));
//!
//! // Bounds and positions.
//! let first = map.lower_bound(&2);
//! let last = map.upper_bound(&5);
//! map.erase_range(first, last);
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 8, 9]);
//!
//! // Circular navigation through the sentinel.
//! assert_eq!(map.key_at(map.prev(map.end())), Some(&9));
//! assert_eq!(map.next(map.end()), map.begin());
//!
//! *map.get_or_insert_default(3) += 1;
//! assert_eq!(map[&3], 1);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `trace!`/`debug!` events for structural changes.
//! - `proptest`: export `collections::tree::arbitrary` strategies.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

// Logging macros: forward to `tracing` when the feature is on, vanish otherwise.
#[cfg(feature = "tracing")]
macro_rules! log_trace {
    ($($arg:tt)*) => { tracing::trace!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! log_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod alloc;
pub mod collections;

pub use alloc::{AllocError, NodeAlloc, NodeId, NodePool};
pub use collections::{
    make_pair,
    Comparator,
    Cursor,
    CursorMut,
    InvariantViolation,
    NaturalOrder,
    Pair,
    Position,
    ReverseOrder,
    ThreadedMap,
};

/// Builds a [`ThreadedMap`] from `key => value` pairs.
///
/// Later duplicates are ignored, as with [`ThreadedMap::insert`].
///
/// ```
/// # use threaded_map::threaded_map;
/// let map = threaded_map! { 2 => "two", 1 => "one", 2 => "again" };
/// assert_eq!(map.len(), 2);
/// assert_eq!(map[&2], "two");
/// ```
#[macro_export]
macro_rules! threaded_map {
    ($($k:expr => $v:expr),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut m = $crate::ThreadedMap::new();
            $(
                m.insert($k, $v);
            )*
            m
        }
    };
}

// Compile-time assertions for node layout
const _: () = {
    use core::mem;

    // Handles are two `u32`s.
    assert!(mem::size_of::<NodeId>() == 8);

    // A position adds only a tag to a handle.
    assert!(mem::size_of::<Position>() <= 12);

    // A node is its element plus two links.
    assert!(mem::size_of::<collections::tree::Node<u64, ()>>() <= 8 + 2 * 16);
};
