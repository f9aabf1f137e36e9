//! Tree cells and the links between them.

use crate::alloc::NodeId;
use crate::collections::Pair;
use core::fmt;

/// A location in a map: one of its elements, or the sentinel.
///
/// `End` is the sentinel. It sits one past the largest element and one before
/// the smallest, so navigation wraps through it in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// The sentinel; `end()` of the map.
    End,
    /// An element, named by the handle of the node that holds it.
    Node(NodeId),
}

impl Position {
    /// Returns `true` for the sentinel.
    #[inline]
    pub const fn is_end(self) -> bool {
        matches!(self, Position::End)
    }

    /// Returns the node handle, or `None` for the sentinel.
    #[inline]
    pub const fn node(self) -> Option<NodeId> {
        match self {
            Position::End => None,
            Position::Node(id) => Some(id),
        }
    }
}

impl From<Option<NodeId>> for Position {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Position::End, Position::Node)
    }
}

/// One side of a node.
///
/// A `Child` link owns a subtree holding the keys on that side. A `Thread`
/// link marks that there is no subtree there and instead points at the
/// in-order neighbor on that side, or at the sentinel past an extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    Child(NodeId),
    Thread(Position),
}

impl Link {
    #[inline]
    pub(crate) fn child(self) -> Option<NodeId> {
        match self {
            Link::Child(id) => Some(id),
            Link::Thread(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A tree cell holding one element.
///
/// Left always holds the smaller keys.
pub struct Node<K, V> {
    // The key stays assignable here: two-child removal moves the successor's
    // element into this node.
    pub(crate) element: Pair<K, V>,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(element: Pair<K, V>, left: Link, right: Link) -> Self {
        Self {
            element,
            left,
            right,
        }
    }

    /// The key stored in this node.
    #[inline]
    pub fn key(&self) -> &K {
        &self.element.first
    }

    /// The mapped value stored in this node.
    #[inline]
    pub fn value(&self) -> &V {
        &self.element.second
    }

    #[inline]
    pub(crate) fn link(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn link_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", self.key())
            .field("value", self.value())
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

/// The sentinel's bookkeeping: the root and the cached extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Header {
    pub(crate) root: Option<NodeId>,
    pub(crate) first: Option<NodeId>,
    pub(crate) last: Option<NodeId>,
}
