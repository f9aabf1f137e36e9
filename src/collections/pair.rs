//! `Pair`: the two-field element type stored by the maps.

use serde::{Deserialize, Serialize};

/// A key-value pair.
///
/// Equality and ordering are lexicographic on `(first, second)`, which is what
/// the maps' own relational operators build on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pair<K, V> {
    /// The key. Inside a map this is never handed out mutably.
    pub first: K,
    /// The mapped value.
    pub second: V,
}

impl<K, V> Pair<K, V> {
    /// Creates a pair.
    pub const fn new(first: K, second: V) -> Self {
        Self { first, second }
    }

    /// Splits the pair into a tuple.
    pub fn into_tuple(self) -> (K, V) {
        (self.first, self.second)
    }

    /// Borrows both fields as a tuple of references.
    pub fn as_refs(&self) -> (&K, &V) {
        (&self.first, &self.second)
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    fn from((first, second): (K, V)) -> Self {
        Self { first, second }
    }
}

impl<K, V> From<Pair<K, V>> for (K, V) {
    fn from(pair: Pair<K, V>) -> Self {
        pair.into_tuple()
    }
}

/// Shorthand for [`Pair::new`].
pub const fn make_pair<K, V>(first: K, second: V) -> Pair<K, V> {
    Pair::new(first, second)
}
