//! Positions and cursors: bidirectional navigation over a map.
//!
//! A [`Position`] is a bare `Copy` handle that the map resolves on demand.
//! Stepping is circular through the sentinel: past the largest element lies
//! `end()`, and past `end()` lies the smallest element again.
//!
//! [`Cursor`] and [`CursorMut`] pair a position with a borrow of the map.

use super::compare::NaturalOrder;
use super::map::ThreadedMap;
use super::navigate::{predecessor, successor};
use super::node::{Node, Position};
use crate::alloc::{NodeAlloc, NodePool};
use crate::collections::Pair;
use core::fmt;
use core::ptr;

impl<K, V, C, A> ThreadedMap<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    /// Returns `true` if `pos` names an element of this map.
    pub fn is_valid(&self, pos: Position) -> bool {
        match pos {
            Position::End => false,
            Position::Node(id) => self.alloc.get(id).is_some(),
        }
    }

    /// Position following `pos` in key order.
    ///
    /// `next(end())` is `begin()`. A position whose element was erased steps to
    /// `end()`.
    pub fn next(&self, pos: Position) -> Position {
        match pos {
            Position::End => self.begin(),
            Position::Node(id) if self.alloc.get(id).is_some() => successor(&self.alloc, id),
            Position::Node(_) => Position::End,
        }
    }

    /// Position preceding `pos` in key order.
    ///
    /// `prev(end())` is the largest element and `prev(begin())` is `end()`.
    pub fn prev(&self, pos: Position) -> Position {
        match pos {
            Position::End => Position::from(self.header.last),
            Position::Node(id) if self.alloc.get(id).is_some() => predecessor(&self.alloc, id),
            Position::Node(_) => Position::End,
        }
    }

    /// Key and value at `pos`; `None` for `end()` or an erased element.
    pub fn get_at(&self, pos: Position) -> Option<(&K, &V)> {
        self.pair_at(pos).map(Pair::as_refs)
    }

    /// The stored pair at `pos`.
    pub fn pair_at(&self, pos: Position) -> Option<&Pair<K, V>> {
        let node = self.alloc.get(pos.node()?)?;
        Some(&node.element)
    }

    /// The key at `pos`.
    pub fn key_at(&self, pos: Position) -> Option<&K> {
        self.pair_at(pos).map(|pair| &pair.first)
    }

    /// Mutable access to the value at `pos`. Keys are never handed out mutably.
    pub fn value_at_mut(&mut self, pos: Position) -> Option<&mut V> {
        let node = self.alloc.get_mut(pos.node()?)?;
        Some(&mut node.element.second)
    }

    /// A read-only cursor at `pos`.
    pub fn cursor_at(&self, pos: Position) -> Cursor<'_, K, V, C, A> {
        Cursor { map: self, pos }
    }

    /// A read-only cursor at the smallest element.
    pub fn cursor_front(&self) -> Cursor<'_, K, V, C, A> {
        self.cursor_at(self.begin())
    }

    /// A read-only cursor at the largest element.
    pub fn cursor_back(&self) -> Cursor<'_, K, V, C, A> {
        self.cursor_at(Position::from(self.header.last))
    }

    /// A mutable cursor at `pos`.
    pub fn cursor_mut_at(&mut self, pos: Position) -> CursorMut<'_, K, V, C, A> {
        CursorMut { map: self, pos }
    }

    /// A mutable cursor at the smallest element.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, C, A> {
        let pos = self.begin();
        self.cursor_mut_at(pos)
    }
}

/// A read-only cursor over a [`ThreadedMap`].
pub struct Cursor<'a, K, V, C = NaturalOrder, A = NodePool<Node<K, V>>> {
    map: &'a ThreadedMap<K, V, C, A>,
    pos: Position,
}

impl<'a, K, V, C, A> Cursor<'a, K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    /// The position the cursor is at.
    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Returns `true` at the sentinel.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos.is_end()
    }

    /// The element under the cursor.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.map.get_at(self.pos)
    }

    /// The key under the cursor.
    pub fn key(&self) -> Option<&'a K> {
        self.map.key_at(self.pos)
    }

    /// The value under the cursor.
    pub fn value(&self) -> Option<&'a V> {
        self.get().map(|(_, value)| value)
    }

    /// Steps to the next element, wrapping through `end()`.
    pub fn move_next(&mut self) {
        self.pos = self.map.next(self.pos);
    }

    /// Steps to the previous element, wrapping through `end()`.
    pub fn move_prev(&mut self) {
        self.pos = self.map.prev(self.pos);
    }
}

impl<K, V, C, A> Clone for Cursor<'_, K, V, C, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C, A> Copy for Cursor<'_, K, V, C, A> {}

impl<K, V, C, A> PartialEq for Cursor<'_, K, V, C, A> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.map, other.map) && self.pos == other.pos
    }
}

impl<K, V, C, A> Eq for Cursor<'_, K, V, C, A> {}

impl<K, V, C, A> fmt::Debug for Cursor<'_, K, V, C, A>
where
    K: fmt::Debug,
    V: fmt::Debug,
    A: NodeAlloc<Node<K, V>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// A cursor over a [`ThreadedMap`] that can change values and erase elements.
pub struct CursorMut<'a, K, V, C = NaturalOrder, A = NodePool<Node<K, V>>> {
    map: &'a mut ThreadedMap<K, V, C, A>,
    pos: Position,
}

impl<'a, K, V, C, A> CursorMut<'a, K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    /// The position the cursor is at.
    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Returns `true` at the sentinel.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos.is_end()
    }

    /// The element under the cursor.
    pub fn get(&self) -> Option<(&K, &V)> {
        self.map.get_at(self.pos)
    }

    /// The value under the cursor, mutably.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.map.value_at_mut(self.pos)
    }

    /// Steps to the next element, wrapping through `end()`.
    pub fn move_next(&mut self) {
        self.pos = self.map.next(self.pos);
    }

    /// Steps to the previous element, wrapping through `end()`.
    pub fn move_prev(&mut self) {
        self.pos = self.map.prev(self.pos);
    }

    /// Erases the element under the cursor and moves to the one after it.
    ///
    /// At `end()` or an erased position this returns `None` and does not move.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let id = self.pos.node()?;
        if !self.map.is_valid(self.pos) {
            return None;
        }
        let (element, next) = self.map.remove_node(id);
        self.pos = next;
        Some(element.into_tuple())
    }

    /// A read-only view of this cursor for the duration of the borrow.
    pub fn as_cursor(&self) -> Cursor<'_, K, V, C, A> {
        Cursor {
            map: &*self.map,
            pos: self.pos,
        }
    }
}

impl<'a, K, V, C, A> From<CursorMut<'a, K, V, C, A>> for Cursor<'a, K, V, C, A> {
    fn from(cursor: CursorMut<'a, K, V, C, A>) -> Self {
        Cursor {
            map: cursor.map,
            pos: cursor.pos,
        }
    }
}

impl<K, V, C, A> fmt::Debug for CursorMut<'_, K, V, C, A>
where
    K: fmt::Debug,
    V: fmt::Debug,
    A: NodeAlloc<Node<K, V>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ThreadedMap<i32, &'static str> {
        [(2, "two"), (1, "one"), (3, "three")].into()
    }

    #[test]
    fn test_circular_navigation() {
        let map = sample();
        let end = map.end();
        assert_eq!(map.key_at(map.next(end)), Some(&1));
        assert_eq!(map.key_at(map.prev(end)), Some(&3));
        assert_eq!(map.prev(map.begin()), end);
        assert_eq!(map.next(map.find(&3)), end);

        let empty: ThreadedMap<i32, i32> = ThreadedMap::new();
        assert_eq!(empty.next(empty.end()), empty.end());
        assert_eq!(empty.prev(empty.end()), empty.end());
    }

    #[test]
    fn test_stale_position() {
        let mut map = sample();
        let pos = map.find(&1);
        assert!(map.is_valid(pos));
        map.erase(&1);
        assert!(!map.is_valid(pos));
        assert_eq!(map.get_at(pos), None);
        assert_eq!(map.next(pos), map.end());
        assert_eq!(map.value_at_mut(pos), None);
    }

    #[test]
    fn test_two_child_erase_moves_successor() {
        let mut map = sample();
        let root = map.find(&2);
        let three = map.find(&3);
        map.erase_at(root);

        // The root keeps its node and now holds the successor.
        assert_eq!(map.key_at(root), Some(&3));
        assert!(!map.is_valid(three));
        assert_eq!(map.get_at(three), None);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        map.check_invariants().unwrap();
    }

    #[test]
    fn test_cursor_walk() {
        let map = sample();
        let mut cursor = map.cursor_front();
        let mut seen = Vec::new();
        while let Some(key) = cursor.key() {
            seen.push(*key);
            cursor.move_next();
        }
        assert_eq!(seen, vec![1, 2, 3]);
        assert!(cursor.is_end());

        cursor.move_prev();
        assert_eq!(cursor.get(), Some((&3, &"three")));
        assert_eq!(cursor, map.cursor_back());
    }

    #[test]
    fn test_cursor_mut_edit_and_remove() {
        let mut map = sample();
        let pos = map.find(&2);
        let mut cursor = map.cursor_mut_at(pos);
        *cursor.value_mut().unwrap() = "TWO";
        assert_eq!(cursor.remove_current(), Some((2, "TWO")));
        assert_eq!(cursor.get(), Some((&3, &"three")));

        cursor.move_next();
        assert!(cursor.is_end());
        assert_eq!(cursor.remove_current(), None);

        let read: Cursor<'_, _, _> = cursor.into();
        assert!(read.is_end());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_cursor_mut_to_cursor_and_back() {
        let mut map = sample();
        let pos = {
            let mut cursor = map.cursor_front_mut();
            cursor.move_next();
            cursor.as_cursor().position()
        };
        let cursor = map.cursor_mut_at(pos);
        assert_eq!(cursor.get(), Some((&2, &"two")));
    }
}
