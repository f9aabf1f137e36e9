//! Standard iterators over a map.
//!
//! Borrowing iterators walk threads from both ends at once; no stack is kept,
//! since every step is a single successor or predecessor lookup.

use super::compare::Comparator;
use super::map::ThreadedMap;
use super::navigate::{predecessor, successor};
use super::node::{Node, Position};
use crate::alloc::{NodeAlloc, NodeId};
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Bound, RangeBounds};

impl<K, V, C, A> ThreadedMap<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    /// Iterates over the elements in key order.
    pub fn iter(&self) -> Iter<'_, K, V, A> {
        Iter {
            alloc: &self.alloc,
            front: self.header.first,
            back: self.header.last,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> Keys<'_, K, V, A> {
        Keys { inner: self.iter() }
    }

    /// Iterates over the values in key order.
    pub fn values(&self) -> Values<'_, K, V, A> {
        Values { inner: self.iter() }
    }

    /// Iterates over the elements whose keys fall inside `range`.
    ///
    /// # Panics
    /// Panics if the start of the range is ordered after its end, or if both
    /// bounds are the same excluded key.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V, A>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
    {
        match (range.start_bound(), range.end_bound()) {
            (Bound::Excluded(s), Bound::Excluded(e)) if self.comparator.compare(s, e) == Ordering::Equal => {
                panic!("range start and end are equal and excluded")
            }
            (Bound::Included(s) | Bound::Excluded(s), Bound::Included(e) | Bound::Excluded(e))
                if self.comparator.less(e, s) =>
            {
                panic!("range start is greater than range end")
            }
            _ => {}
        }

        let first = match range.start_bound() {
            Bound::Included(key) => self.lower_bound(key),
            Bound::Excluded(key) => self.upper_bound(key),
            Bound::Unbounded => self.begin(),
        };
        let stop = match range.end_bound() {
            Bound::Included(key) => self.upper_bound(key),
            Bound::Excluded(key) => self.lower_bound(key),
            Bound::Unbounded => Position::End,
        };

        let (front, back) = if first == stop {
            (None, None)
        } else {
            (first.node(), self.prev(stop).node())
        };
        Range {
            alloc: &self.alloc,
            front,
            back,
            _marker: PhantomData,
        }
    }
}

/// Reads the element held by `id` for the lifetime of the allocator borrow.
fn entry<'a, K, V, A>(alloc: &'a A, id: NodeId) -> (&'a K, &'a V)
where
    A: NodeAlloc<Node<K, V>>,
{
    let node = &alloc[id];
    (node.key(), node.value())
}

/// An iterator over the elements of a [`ThreadedMap`] in key order.
pub struct Iter<'a, K, V, A> {
    alloc: &'a A,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
    _marker: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V, A> Iterator for Iter<'a, K, V, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = successor(self.alloc, id).node();
        Some(entry(self.alloc, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, A> DoubleEndedIterator for Iter<'_, K, V, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = predecessor(self.alloc, id).node();
        Some(entry(self.alloc, id))
    }
}

impl<K, V, A> ExactSizeIterator for Iter<'_, K, V, A> where A: NodeAlloc<Node<K, V>> {}

impl<K, V, A> FusedIterator for Iter<'_, K, V, A> where A: NodeAlloc<Node<K, V>> {}

impl<K, V, A> Clone for Iter<'_, K, V, A> {
    fn clone(&self) -> Self {
        Self {
            alloc: self.alloc,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<K, V, A> fmt::Debug for Iter<'_, K, V, A>
where
    K: fmt::Debug,
    V: fmt::Debug,
    A: NodeAlloc<Node<K, V>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of a [`ThreadedMap`].
pub struct Keys<'a, K, V, A> {
    inner: Iter<'a, K, V, A>,
}

impl<'a, K, V, A> Iterator for Keys<'a, K, V, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, A> DoubleEndedIterator for Keys<'_, K, V, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V, A> ExactSizeIterator for Keys<'_, K, V, A> where A: NodeAlloc<Node<K, V>> {}

impl<K, V, A> FusedIterator for Keys<'_, K, V, A> where A: NodeAlloc<Node<K, V>> {}

/// An iterator over the values of a [`ThreadedMap`], in key order.
pub struct Values<'a, K, V, A> {
    inner: Iter<'a, K, V, A>,
}

impl<'a, K, V, A> Iterator for Values<'a, K, V, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, A> DoubleEndedIterator for Values<'_, K, V, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V, A> ExactSizeIterator for Values<'_, K, V, A> where A: NodeAlloc<Node<K, V>> {}

impl<K, V, A> FusedIterator for Values<'_, K, V, A> where A: NodeAlloc<Node<K, V>> {}

/// An iterator over a key range of a [`ThreadedMap`].
pub struct Range<'a, K, V, A> {
    alloc: &'a A,
    front: Option<NodeId>,
    back: Option<NodeId>,
    _marker: PhantomData<&'a Node<K, V>>,
}

impl<K, V, A> Range<'_, K, V, A> {
    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<'a, K, V, A> Iterator for Range<'a, K, V, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.front?;
        if self.back == Some(id) {
            self.finish();
        } else {
            self.front = successor(self.alloc, id).node();
        }
        Some(entry(self.alloc, id))
    }
}

impl<K, V, A> DoubleEndedIterator for Range<'_, K, V, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.back?;
        if self.front == Some(id) {
            self.finish();
        } else {
            self.back = predecessor(self.alloc, id).node();
        }
        Some(entry(self.alloc, id))
    }
}

impl<K, V, A> FusedIterator for Range<'_, K, V, A> where A: NodeAlloc<Node<K, V>> {}

/// An owning iterator over the elements of a [`ThreadedMap`] in key order.
pub struct IntoIter<K, V, C, A> {
    map: ThreadedMap<K, V, C, A>,
}

impl<K, V, C, A> Iterator for IntoIter<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.map.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.len(), Some(self.map.len()))
    }
}

impl<K, V, C, A> DoubleEndedIterator for IntoIter<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    fn next_back(&mut self) -> Option<(K, V)> {
        self.map.pop_last()
    }
}

impl<K, V, C, A> ExactSizeIterator for IntoIter<K, V, C, A> where A: NodeAlloc<Node<K, V>> {}

impl<K, V, C, A> FusedIterator for IntoIter<K, V, C, A> where A: NodeAlloc<Node<K, V>> {}

impl<K, V, C, A> IntoIterator for ThreadedMap<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { map: self }
    }
}

impl<'a, K, V, C, A> IntoIterator for &'a ThreadedMap<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
