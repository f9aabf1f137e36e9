//! Key comparison strategies.

use crate::collections::Pair;
use core::cmp::Ordering;

/// A strict weak order over `Q`, injected into a map at construction.
///
/// Keys that compare `Equal` are treated as the same key.
pub trait Comparator<Q: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &Q, b: &Q) -> Ordering;

    /// Returns `true` if `a` is ordered before `b`.
    #[inline]
    fn less(&self, a: &Q, b: &Q) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Orders keys by their `Ord` implementation. The default comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<Q: ?Sized + Ord> Comparator<Q> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys by the reverse of their `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder;

impl<Q: ?Sized + Ord> Comparator<Q> for ReverseOrder {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        b.cmp(a)
    }
}

impl<Q: ?Sized, F> Comparator<Q> for F
where
    F: Fn(&Q, &Q) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        self(a, b)
    }
}

/// Orders whole elements by key, using a map's key comparator.
#[derive(Debug, Clone, Copy)]
pub struct PairCompare<'a, C> {
    comparator: &'a C,
}

impl<'a, C> PairCompare<'a, C> {
    pub(crate) fn new(comparator: &'a C) -> Self {
        Self { comparator }
    }
}

impl<K, V, C: Comparator<K>> Comparator<Pair<K, V>> for PairCompare<'_, C> {
    #[inline]
    fn compare(&self, a: &Pair<K, V>, b: &Pair<K, V>) -> Ordering {
        self.comparator.compare(&a.first, &b.first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::make_pair;

    #[test]
    fn test_natural_and_reverse() {
        assert!(NaturalOrder.less(&1, &2));
        assert!(!NaturalOrder.less(&2, &2));
        assert!(ReverseOrder.less(&2, &1));
        assert_eq!(Comparator::<str>::compare(&NaturalOrder, "a", "b"), Ordering::Less);
    }

    #[test]
    fn test_closure_comparator() {
        let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
        assert!(by_len.less(&"ab", &"abc"));
        assert_eq!(by_len.compare(&"ab", &"cd"), Ordering::Equal);
    }

    #[test]
    fn test_pair_compare_ignores_value() {
        let natural = NaturalOrder;
        let cmp = PairCompare::new(&natural);
        assert_eq!(cmp.compare(&make_pair(1, 9), &make_pair(1, 0)), Ordering::Equal);
        assert!(cmp.less(&make_pair(1, 9), &make_pair(2, 0)));
    }
}
