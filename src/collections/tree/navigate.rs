//! In-order navigation over threads.
//!
//! None of these walks need parent pointers: a `Thread` link already names the
//! neighbor, and a `Child` link leads to a subtree whose extreme is the neighbor.

use super::node::{Link, Node, Position, Side};
use crate::alloc::{NodeAlloc, NodeId};

/// Smallest node of the subtree rooted at `id`.
pub(crate) fn leftmost<K, V, A>(alloc: &A, mut id: NodeId) -> NodeId
where
    A: NodeAlloc<Node<K, V>>,
{
    while let Link::Child(left) = alloc[id].left {
        id = left;
    }
    id
}

/// Largest node of the subtree rooted at `id`.
pub(crate) fn rightmost<K, V, A>(alloc: &A, mut id: NodeId) -> NodeId
where
    A: NodeAlloc<Node<K, V>>,
{
    while let Link::Child(right) = alloc[id].right {
        id = right;
    }
    id
}

/// In-order successor of a live node; `End` past the maximum.
pub(crate) fn successor<K, V, A>(alloc: &A, id: NodeId) -> Position
where
    A: NodeAlloc<Node<K, V>>,
{
    match alloc[id].right {
        Link::Thread(next) => next,
        Link::Child(right) => Position::Node(leftmost(alloc, right)),
    }
}

/// In-order predecessor of a live node; `End` before the minimum.
pub(crate) fn predecessor<K, V, A>(alloc: &A, id: NodeId) -> Position
where
    A: NodeAlloc<Node<K, V>>,
{
    match alloc[id].left {
        Link::Thread(prev) => prev,
        Link::Child(left) => Position::Node(rightmost(alloc, left)),
    }
}

/// Finds the node whose child link points at `id`, and on which side.
///
/// If `id` is a left child of `p`, then `p` is the successor of the largest
/// node under `id`, so the right thread leaving that node lands on `p`.
/// Symmetrically for right children. The root has neither and yields `None`.
pub(crate) fn parent_of<K, V, A>(alloc: &A, id: NodeId) -> Option<(NodeId, Side)>
where
    A: NodeAlloc<Node<K, V>>,
{
    let max = rightmost(alloc, id);
    if let Link::Thread(Position::Node(p)) = alloc[max].right {
        if alloc[p].left == Link::Child(id) {
            return Some((p, Side::Left));
        }
    }

    let min = leftmost(alloc, id);
    if let Link::Thread(Position::Node(p)) = alloc[min].left {
        if alloc[p].right == Link::Child(id) {
            return Some((p, Side::Right));
        }
    }

    None
}
