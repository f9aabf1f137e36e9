//! Deletion.
//!
//! A node with at most one child is spliced out directly, and the threads
//! that pointed at it are redirected to its in-order neighbors. A node with
//! two children keeps its place in the tree: its in-order successor (which
//! has no left child) is spliced out instead, and the successor's element is
//! moved into the node. Handles to the successor's node are invalidated by
//! that move, which is why range erasure counts steps instead of comparing
//! against its end position.

use super::compare::Comparator;
use super::map::ThreadedMap;
use super::navigate::{leftmost, parent_of, predecessor, rightmost, successor};
use super::node::{Link, Node, Position, Side};
use crate::alloc::{NodeAlloc, NodeId};
use crate::collections::Pair;
use core::borrow::Borrow;
use core::mem;

impl<K, V, C, A> ThreadedMap<K, V, C, A>
where
    A: NodeAlloc<Node<K, V>>,
{
    /// Removes the element held by `id`.
    ///
    /// Returns the element and the position of the element that followed it.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> (Pair<K, V>, Position) {
        let node = &self.alloc[id];
        if let (Link::Child(_), Link::Child(right)) = (node.left, node.right) {
            let mut parent = (id, Side::Right);
            let mut next = right;
            while let Link::Child(left) = self.alloc[next].left {
                parent = (next, Side::Left);
                next = left;
            }
            log_trace!(len = self.len, "erase: two children, promoting successor");
            let promoted = self.unlink(next, Some(parent));
            let removed = mem::replace(&mut self.alloc[id].element, promoted);
            return (removed, Position::Node(id));
        }

        let next = successor(&self.alloc, id);
        let parent = parent_of(&self.alloc, id);
        (self.unlink(id, parent), next)
    }

    /// Detaches a node with at most one child and releases it.
    fn unlink(&mut self, id: NodeId, parent: Option<(NodeId, Side)>) -> Pair<K, V> {
        let node = &self.alloc[id];
        let (left, right) = (node.left, node.right);
        let prev = predecessor(&self.alloc, id);
        let next = successor(&self.alloc, id);

        let replacement = match (left, right) {
            (Link::Thread(_), Link::Thread(_)) => {
                log_trace!(len = self.len, "erase: leaf");
                // The parent's side becomes a thread to whichever neighbor lies
                // beyond the removed leaf on that side.
                match parent {
                    Some((_, Side::Left)) => Link::Thread(prev),
                    Some((_, Side::Right)) | None => Link::Thread(next),
                }
            }
            (Link::Child(l), Link::Thread(_)) => {
                log_trace!(len = self.len, "erase: left child only");
                let max = rightmost(&self.alloc, l);
                self.alloc[max].right = Link::Thread(next);
                Link::Child(l)
            }
            (Link::Thread(_), Link::Child(r)) => {
                log_trace!(len = self.len, "erase: right child only");
                let min = leftmost(&self.alloc, r);
                self.alloc[min].left = Link::Thread(prev);
                Link::Child(r)
            }
            (Link::Child(_), Link::Child(_)) => unreachable!("unlink of a node with two children"),
        };

        match parent {
            Some((p, side)) => *self.alloc[p].link_mut(side) = replacement,
            None => self.header.root = replacement.child(),
        }
        if self.header.first == Some(id) {
            self.header.first = next.node();
        }
        if self.header.last == Some(id) {
            self.header.last = prev.node();
        }
        self.len -= 1;
        self.alloc.free(id).element
    }

    /// Erases the element at `pos` and returns the position of the element
    /// that followed it.
    ///
    /// `end()` and positions whose element is already gone are ignored and
    /// yield `end()`.
    pub fn erase_at(&mut self, pos: Position) -> Position {
        match pos {
            Position::Node(id) if self.alloc.get(id).is_some() => self.remove_node(id).1,
            _ => Position::End,
        }
    }

    /// Erases the half-open range `[first, last)` and returns the position of
    /// the element `last` referred to.
    ///
    /// If `last` is not reachable from `first`, everything from `first` to the
    /// end is erased.
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        let mut count = 0usize;
        let mut pos = first;
        while pos != last {
            match pos {
                Position::Node(id) if self.alloc.get(id).is_some() => {
                    pos = successor(&self.alloc, id);
                    count += 1;
                }
                _ => break,
            }
        }

        let mut pos = first;
        for _ in 0..count {
            pos = self.erase_at(pos);
        }
        log_trace!(erased = count, len = self.len, "erased range");
        pos
    }

    /// Removes and returns the smallest element.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.header.first?;
        Some(self.remove_node(id).0.into_tuple())
    }

    /// Removes and returns the largest element.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = self.header.last?;
        Some(self.remove_node(id).0.into_tuple())
    }

    /// Keeps only the elements for which `f` returns `true`, visiting them in
    /// key order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut pos = self.begin();
        while let Position::Node(id) = pos {
            let element = &mut self.alloc[id].element;
            pos = if f(&element.first, &mut element.second) {
                successor(&self.alloc, id)
            } else {
                self.remove_node(id).1
            };
        }
    }

    /// Removes `key` and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        let id = self.find_node(key)?;
        Some(self.remove_node(id).0.into_tuple())
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` and returns the number of elements removed, `0` or `1`.
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Comparator<Q>,
    {
        usize::from(self.remove_entry(key).is_some())
    }
}
