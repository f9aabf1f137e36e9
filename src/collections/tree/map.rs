//! `ThreadedMap`: an ordered map over a threaded binary search tree.
//!
//! Nodes live in a node allocator (a `NodePool` arena by default) and refer to
//! each other through generational handles. Each side of a node is either a
//! child subtree or a thread to the in-order neighbor on that side, which is
//! what lets positions step forwards and backwards without parent pointers.
//!
//! The sentinel is not a node: it is the `Position::End` thread target plus a
//! small header caching the root and both extremes, so `begin()`, `end()` and
//! the step back from `end()` are O(1).
//!
//! The tree is not rebalanced. Operations are O(height), which degrades to
//! O(n) for sorted insertion orders.

use super::compare::{Comparator, NaturalOrder, PairCompare};
use super::navigate::{leftmost, rightmost, successor};
use super::node::{Header, Link, Node, Position, Side};
use crate::alloc::{AllocError, NodeAlloc, NodeId, NodePool};
use crate::collections::Pair;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::mem;
use core::ops::Index;
use std::alloc::{handle_alloc_error, Layout};

/// An ordered map with unique keys.
///
/// `C` orders the keys (see [`Comparator`]); `A` owns the nodes (see
/// [`NodeAlloc`]). Insertion never overwrites: inserting a key that is already
/// present leaves the map untouched and reports the existing position.
pub struct ThreadedMap<K, V, C = NaturalOrder, A = NodePool<Node<K, V>>> {
    pub(crate) header: Header,
    pub(crate) len: usize,
    pub(crate) comparator: C,
    pub(crate) alloc: A,
    _marker: PhantomData<Node<K, V>>,
}

impl<K, V> ThreadedMap<K, V> {
    /// Creates an empty map ordered by `K: Ord`.
    pub fn new() -> Self {
        Self::with_comparator_in(NaturalOrder, NodePool::new())
    }
}

impl<K, V, C> ThreadedMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_in(comparator, NodePool::new())
    }
}

impl<K, V, C, A> ThreadedMap<K, V, C, A> {
    /// Creates an empty map ordered by `comparator` whose nodes live in `alloc`.
    pub const fn with_comparator_in(comparator: C, alloc: A) -> Self {
        Self {
            header: Header {
                root: None,
                first: None,
                last: None,
            },
            len: 0,
            comparator,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Creates an empty map with the default comparator whose nodes live in `alloc`.
    pub fn new_in(alloc: A) -> Self
    where
        C: Default,
    {
        Self::with_comparator_in(C::default(), alloc)
    }

    /// Returns the number of elements in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the key comparator.
    pub fn key_comp(&self) -> &C {
        &self.comparator
    }

    /// Returns a comparator over whole elements that orders them by key.
    pub fn value_comp(&self) -> PairCompare<'_, C> {
        PairCompare::new(&self.comparator)
    }

    /// Returns the node allocator.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Position of the smallest element, or `end()` if the map is empty.
    #[inline]
    pub fn begin(&self) -> Position {
        Position::from(self.header.first)
    }

    /// The sentinel position.
    #[inline]
    pub fn end(&self) -> Position {
        Position::End
    }

    /// Exchanges the contents of two maps without visiting any node.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<K, V, C, A> ThreadedMap<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    /// Upper bound on the number of elements, as reported by the allocator.
    pub fn max_size(&self) -> usize {
        self.alloc.max_size()
    }

    /// Returns the smallest key and its value.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.alloc[self.header.first?];
        Some((node.key(), node.value()))
    }

    /// Returns the largest key and its value.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.alloc[self.header.last?];
        Some((node.key(), node.value()))
    }

    /// Removes every element, releasing each node through the allocator.
    pub fn clear(&mut self) {
        let mut pos = self.begin();
        while let Position::Node(id) = pos {
            // Step first: the right subtree of `id` is still intact.
            pos = successor(&self.alloc, id);
            drop(self.alloc.free(id));
        }
        log_trace!(released = self.len, "cleared map");
        self.header = Header::default();
        self.len = 0;
    }

    /// Calls `f` on every element in key order, with mutable access to values.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        let mut pos = self.begin();
        while let Position::Node(id) = pos {
            let element = &mut self.alloc[id].element;
            f(&element.first, &mut element.second);
            pos = successor(&self.alloc, id);
        }
    }

    fn alloc_node(&mut self, key: K, value: V, left: Link, right: Link) -> Result<NodeId, AllocError> {
        let result = self.alloc.alloc(Node::new(Pair::new(key, value), left, right));
        if result.is_err() {
            log_debug!(len = self.len, "node allocation failed");
        }
        result
    }
}

// Lookup.
impl<K, V, C, A> ThreadedMap<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    pub(crate) fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        let mut cur = self.header.root?;
        loop {
            let node = &self.alloc[cur];
            let link = match self.comparator.compare(key, node.key().borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(cur),
            };
            // A thread on the side we need means the key is absent.
            cur = link.child()?;
        }
    }

    /// Returns the position of `key`, or `end()` if it is absent.
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        Position::from(self.find_node(key))
    }

    /// Returns `1` if `key` is present and `0` otherwise.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        usize::from(self.find_node(key).is_some())
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        self.find_node(key).is_some()
    }

    /// Returns a reference to the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        self.find_node(key).map(|id| self.alloc[id].value())
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        let node = &self.alloc[self.find_node(key)?];
        Some((node.key(), node.value()))
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        let id = self.find_node(key)?;
        Some(&mut self.alloc[id].element.second)
    }

    /// Position of the first element whose key is not ordered before `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Position
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        let mut result = Position::End;
        let mut cur = self.header.root;
        while let Some(id) = cur {
            let node = &self.alloc[id];
            if self.comparator.less(node.key().borrow(), key) {
                cur = node.right.child();
            } else {
                result = Position::Node(id);
                cur = node.left.child();
            }
        }
        result
    }

    /// Position of the first element whose key is ordered after `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Position
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        let mut result = Position::End;
        let mut cur = self.header.root;
        while let Some(id) = cur {
            let node = &self.alloc[id];
            if self.comparator.less(key, node.key().borrow()) {
                result = Position::Node(id);
                cur = node.left.child();
            } else {
                cur = node.right.child();
            }
        }
        result
    }

    /// Returns `(lower_bound(key), upper_bound(key))`.
    pub fn equal_range<Q>(&self, key: &Q) -> (Position, Position)
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }
}

// Insertion.
impl<K, V, C, A> ThreadedMap<K, V, C, A>
where
    C: Comparator<K>,
    A: NodeAlloc<Node<K, V>>,
{
    /// Links a new node for `key` unless an equal key is present.
    ///
    /// The node is allocated before any link changes, so a failed allocation
    /// leaves the tree exactly as it was.
    fn try_insert_with<F>(&mut self, key: K, value: F) -> Result<(NodeId, bool), AllocError>
    where
        F: FnOnce() -> V,
    {
        let Some(mut cur) = self.header.root else {
            let end = Link::Thread(Position::End);
            let id = self.alloc_node(key, value(), end, end)?;
            self.header = Header {
                root: Some(id),
                first: Some(id),
                last: Some(id),
            };
            self.len = 1;
            log_trace!("inserted root");
            return Ok((id, true));
        };

        loop {
            let node = &self.alloc[cur];
            let side = match self.comparator.compare(&key, node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Ok((cur, false)),
            };

            match node.link(side) {
                Link::Child(next) => cur = next,
                Link::Thread(neighbor) => {
                    // The new leaf inherits `cur`'s thread on `side` and threads
                    // back to `cur` on the other side.
                    let back = Link::Thread(Position::Node(cur));
                    let (left, right) = match side {
                        Side::Left => (Link::Thread(neighbor), back),
                        Side::Right => (back, Link::Thread(neighbor)),
                    };
                    let id = self.alloc_node(key, value(), left, right)?;
                    *self.alloc[cur].link_mut(side) = Link::Child(id);

                    if neighbor.is_end() {
                        match side {
                            Side::Left => self.header.first = Some(id),
                            Side::Right => self.header.last = Some(id),
                        }
                    }
                    self.len += 1;
                    log_trace!(len = self.len, ?side, "inserted leaf");
                    return Ok((id, true));
                }
            }
        }
    }

    /// Inserts `key` with `value` unless the key is already present.
    ///
    /// Returns the position of the element with that key and whether it was
    /// newly inserted. On a duplicate, `value` is dropped and the stored
    /// element is untouched.
    ///
    /// # Errors
    /// Returns `AllocError` if the allocator cannot provide a node; the map is
    /// left unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Position, bool), AllocError> {
        let (id, inserted) = self.try_insert_with(key, || value)?;
        Ok((Position::Node(id), inserted))
    }

    /// Inserts `key` with `value` unless the key is already present.
    ///
    /// Like [`try_insert`](Self::try_insert), but allocation failure is
    /// reported through [`handle_alloc_error`], as `Vec::push` does.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        match self.try_insert(key, value) {
            Ok(result) => result,
            Err(AllocError) => handle_alloc_error(Layout::new::<Node<K, V>>()),
        }
    }

    /// Inserts with a position hint. The hint is advisory and currently unused.
    pub fn insert_hint(&mut self, _hint: Position, key: K, value: V) -> Position {
        self.insert(key, value).0
    }

    /// Inserts every pair in order; later duplicates are dropped.
    ///
    /// # Errors
    /// Stops at the first allocation failure. Pairs inserted before it stay.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), AllocError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.try_insert(key, value)?;
        }
        Ok(())
    }

    /// Builds a map from pairs with an explicit comparator and allocator.
    ///
    /// # Errors
    /// Returns `AllocError` if the allocator runs out of nodes.
    pub fn try_from_iter_in<I>(iter: I, comparator: C, alloc: A) -> Result<Self, AllocError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::with_comparator_in(comparator, alloc);
        map.try_extend(iter)?;
        Ok(map)
    }

    /// Returns the value under `key`, inserting `f()` first if the key is absent.
    ///
    /// # Errors
    /// Returns `AllocError` if the key is absent and no node can be allocated.
    pub fn try_get_or_insert_with<F>(&mut self, key: K, f: F) -> Result<&mut V, AllocError>
    where
        F: FnOnce() -> V,
    {
        let (id, _) = self.try_insert_with(key, f)?;
        Ok(&mut self.alloc[id].element.second)
    }

    /// Returns the value under `key`, inserting `f()` first if the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        match self.try_insert_with(key, f) {
            Ok((id, _)) => &mut self.alloc[id].element.second,
            Err(AllocError) => handle_alloc_error(Layout::new::<Node<K, V>>()),
        }
    }

    /// Returns the value under `key`, inserting `V::default()` first if absent.
    ///
    /// This always leaves `key` present, even when the caller only reads.
    ///
    /// # Errors
    /// Returns `AllocError` if the key is absent and no node can be allocated.
    pub fn try_get_or_insert_default(&mut self, key: K) -> Result<&mut V, AllocError>
    where
        V: Default,
    {
        self.try_get_or_insert_with(key, V::default)
    }

    /// Returns the value under `key`, inserting `V::default()` first if absent.
    ///
    /// This always leaves `key` present, even when the caller only reads.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Deep-copies the map into a fresh allocator configured like `self`'s.
    ///
    /// Elements are re-inserted in pre-order, which reproduces the source
    /// tree's shape exactly. No node is shared with `self`.
    ///
    /// # Errors
    /// Returns `AllocError` if the new allocator runs out of nodes.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        K: Clone,
        V: Clone,
        C: Clone,
    {
        let mut copy = Self::with_comparator_in(self.comparator.clone(), self.alloc.empty_like());
        let mut stack: Vec<NodeId> = self.header.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.alloc[id];
            copy.try_insert(node.key().clone(), node.value().clone())?;
            if let Link::Child(right) = node.right {
                stack.push(right);
            }
            if let Link::Child(left) = node.left {
                stack.push(left);
            }
        }
        Ok(copy)
    }
}

impl<K, V, C, A> ThreadedMap<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    /// Height of the tree, counting nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.header.root.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.alloc[id];
            stack.extend(node.left.child().map(|l| (l, depth + 1)));
            stack.extend(node.right.child().map(|r| (r, depth + 1)));
        }
        height
    }

    /// Smallest and largest node under the root, found by descending.
    pub(crate) fn walked_extremes(&self) -> Option<(NodeId, NodeId)> {
        let root = self.header.root?;
        Some((leftmost(&self.alloc, root), rightmost(&self.alloc, root)))
    }
}

impl<K, V> Default for ThreadedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, A> Clone for ThreadedMap<K, V, C, A>
where
    K: Clone,
    V: Clone,
    C: Clone + Comparator<K>,
    A: NodeAlloc<Node<K, V>>,
{
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(AllocError) => handle_alloc_error(Layout::new::<Node<K, V>>()),
        }
    }
}

impl<K, V, C, A> fmt::Debug for ThreadedMap<K, V, C, A>
where
    K: fmt::Debug,
    V: fmt::Debug,
    A: NodeAlloc<Node<K, V>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, A> PartialEq for ThreadedMap<K, V, C, A>
where
    K: PartialEq,
    V: PartialEq,
    A: NodeAlloc<Node<K, V>>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K, V, C, A> Eq for ThreadedMap<K, V, C, A>
where
    K: Eq,
    V: Eq,
    A: NodeAlloc<Node<K, V>>,
{
}

impl<K, V, C, A> PartialOrd for ThreadedMap<K, V, C, A>
where
    K: PartialOrd,
    V: PartialOrd,
    A: NodeAlloc<Node<K, V>>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K, V, C, A> Ord for ThreadedMap<K, V, C, A>
where
    K: Ord,
    V: Ord,
    A: NodeAlloc<Node<K, V>>,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K, V, C, A> Hash for ThreadedMap<K, V, C, A>
where
    K: Hash,
    V: Hash,
    A: NodeAlloc<Node<K, V>>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for (key, value) in self.iter() {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K, V, C, A, Q> Index<&Q> for ThreadedMap<K, V, C, A>
where
    Q: ?Sized,
    K: Borrow<Q>,
    C: Comparator<Q>,
    A: NodeAlloc<Node<K, V>>,
{
    type Output = V;

    /// # Panics
    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no entry found for key"),
        }
    }
}

impl<K, V, C, A> Extend<(K, V)> for ThreadedMap<K, V, C, A>
where
    C: Comparator<K>,
    A: NodeAlloc<Node<K, V>>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, C, A> Extend<(&'a K, &'a V)> for ThreadedMap<K, V, C, A>
where
    K: Copy + 'a,
    V: Copy + 'a,
    C: Comparator<K>,
    A: NodeAlloc<Node<K, V>>,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K, V, C, A> FromIterator<(K, V)> for ThreadedMap<K, V, C, A>
where
    C: Comparator<K> + Default,
    A: NodeAlloc<Node<K, V>> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_comparator_in(C::default(), A::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ThreadedMap<K, V>
where
    K: Ord,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::tree::ReverseOrder;

    fn keys<C, A>(map: &ThreadedMap<i32, i32, C, A>) -> Vec<i32>
    where
        A: NodeAlloc<Node<i32, i32>>,
    {
        map.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_empty_map() {
        let map: ThreadedMap<i32, i32> = ThreadedMap::new();
        assert!(map.is_empty());
        assert_eq!(map.begin(), map.end());
        assert_eq!(map.find(&42), map.end());
        assert_eq!(map.count(&42), 0);
        assert_eq!(map.first_key_value(), None);
        assert_eq!(map.height(), 0);
        assert!(map.max_size() > 0);
        map.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut map = ThreadedMap::new();
        for k in [4, 2, 6, 1, 3, 5, 7] {
            let (pos, inserted) = map.insert(k, k * 10);
            assert!(inserted);
            assert_eq!(map.get_at(pos), Some((&k, &(k * 10))));
        }
        assert_eq!(keys(&map), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(map.height(), 3);
        assert_eq!(map.first_key_value(), Some((&1, &10)));
        assert_eq!(map.last_key_value(), Some((&7, &70)));
        map.check_invariants().unwrap();
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut map = ThreadedMap::new();
        let (first, inserted) = map.insert("k", 1);
        assert!(inserted);
        let (again, inserted) = map.insert("k", 2);
        assert!(!inserted);
        assert_eq!(first, again);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"k"), Some(&1));
    }

    #[test]
    fn test_bounds() {
        let map: ThreadedMap<i32, ()> = [10, 20, 30].into_iter().map(|k| (k, ())).collect();

        assert_eq!(map.key_at(map.lower_bound(&20)), Some(&20));
        assert_eq!(map.key_at(map.upper_bound(&20)), Some(&30));
        assert_eq!(map.key_at(map.lower_bound(&15)), Some(&20));
        assert_eq!(map.key_at(map.upper_bound(&15)), Some(&20));
        assert_eq!(map.lower_bound(&31), map.end());
        assert_eq!(map.upper_bound(&30), map.end());
        assert_eq!(map.lower_bound(&0), map.begin());

        let (lo, hi) = map.equal_range(&20);
        assert_eq!(map.next(lo), hi);
        let (lo, hi) = map.equal_range(&25);
        assert_eq!(lo, hi);
    }

    #[test]
    fn test_get_or_insert_default() {
        let mut map = ThreadedMap::new();
        map.insert(5, String::from("a"));
        assert_eq!(map.get_or_insert_default(5), "a");
        assert_eq!(map.len(), 1);

        assert_eq!(map.get_or_insert_default(9), "");
        assert_eq!(map.len(), 2);

        *map.get_or_insert_default(9) = String::from("nine");
        assert_eq!(map[&9], "nine");
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut map = ThreadedMap::new();
        map.insert(String::from("alpha"), 1);
        map.insert(String::from("beta"), 2);
        assert_eq!(map.get("beta"), Some(&2));
        assert!(map.contains_key("alpha"));
        assert_eq!(map.find("gamma"), map.end());
    }

    #[test]
    fn test_custom_comparator() {
        let mut map = ThreadedMap::with_comparator(ReverseOrder);
        map.extend([(1, 1), (3, 3), (2, 2)]);
        let order: Vec<i32> = map.keys().copied().collect();
        assert_eq!(order, vec![3, 2, 1]);

        let mut by_abs = ThreadedMap::with_comparator(|a: &i32, b: &i32| a.abs().cmp(&b.abs()));
        assert!(by_abs.insert(-2, "neg").1);
        assert!(!by_abs.insert(2, "pos").1);
        assert_eq!(by_abs.get(&2), Some(&"neg"));
        by_abs.check_invariants().unwrap();
    }

    #[test]
    fn test_value_comp() {
        let map: ThreadedMap<i32, i32> = ThreadedMap::new();
        let cmp = map.value_comp();
        assert!(cmp.less(&Pair::new(1, 100), &Pair::new(2, 0)));
        assert!(map.key_comp().less(&1, &2));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a: ThreadedMap<i32, i32> = [(4, 0), (2, 0), (6, 0), (1, 0)].into();
        let mut b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.height(), b.height());

        b.insert(9, 9);
        b.erase(&4);
        assert_eq!(keys(&a), vec![1, 2, 4, 6]);
        assert_eq!(keys(&b), vec![1, 2, 6, 9]);

        a.clear();
        assert_eq!(b.len(), 4);
        b.check_invariants().unwrap();
    }

    #[test]
    fn test_swap() {
        let mut a: ThreadedMap<i32, i32> = [(1, 1)].into();
        let mut b: ThreadedMap<i32, i32> = [(2, 2), (3, 3)].into();
        let pos = b.find(&3);
        a.swap(&mut b);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
        // Positions travel with their nodes.
        assert_eq!(a.key_at(pos), Some(&3));
    }

    #[test]
    fn test_failed_insert_leaves_map_unchanged() {
        let mut map = ThreadedMap::with_comparator_in(NaturalOrder, NodePool::with_limit(3));
        map.try_extend([(2, 0), (1, 0), (3, 0)]).unwrap();
        let before = map.try_clone().unwrap();

        assert_eq!(map.try_insert(4, 0), Err(AllocError));
        assert_eq!(map.try_get_or_insert_default(0), Err(AllocError));
        assert_eq!(map, before);
        map.check_invariants().unwrap();

        // Duplicates need no node and still succeed.
        assert_eq!(map.try_insert(2, 5).map(|(_, inserted)| inserted), Ok(false));
        assert_eq!(map.max_size(), 3);
    }

    #[test]
    fn test_clone_keeps_pool_limit() {
        let mut map = ThreadedMap::with_comparator_in(NaturalOrder, NodePool::with_limit(2));
        map.insert(1, 'a');
        let mut copy = map.clone();
        assert_eq!(copy.max_size(), 2);
        assert_eq!(copy.try_insert(2, 'b').map(|(_, inserted)| inserted), Ok(true));
        assert_eq!(copy.try_insert(3, 'c'), Err(AllocError));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_relational_operators() {
        let a: ThreadedMap<i32, i32> = [(1, 1), (2, 2)].into();
        let b: ThreadedMap<i32, i32> = [(1, 1), (2, 3)].into();
        let c: ThreadedMap<i32, i32> = [(1, 1)].into();
        assert!(a < b);
        assert!(c < a);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_for_each_mut() {
        let mut map: ThreadedMap<i32, i32> = [(1, 1), (2, 2), (3, 3)].into();
        let mut seen = Vec::new();
        map.for_each_mut(|k, v| {
            seen.push(*k);
            *v *= 10;
        });
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![10, 20, 30]);
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn test_index_missing_key_panics() {
        let map: ThreadedMap<i32, i32> = ThreadedMap::new();
        let _ = map[&1];
    }
}
