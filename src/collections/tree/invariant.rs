//! Structural self-check.
//!
//! `check_invariants` walks the whole tree over child links only, then checks
//! every thread against the in-order sequence it produced. It is meant for
//! tests and debugging; no mutation calls it.

use super::compare::Comparator;
use super::map::ThreadedMap;
use super::node::{Link, Node, Position};
use crate::alloc::{NodeAlloc, NodeId};
use core::fmt;

/// A broken structural invariant, as reported by
/// [`ThreadedMap::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A child link names a node the allocator does not hold.
    DanglingChild(NodeId),
    /// A node is reachable through more than one child link.
    Cycle(NodeId),
    /// The cached length disagrees with the number of reachable nodes.
    LengthMismatch {
        /// The map's element count.
        recorded: usize,
        /// Nodes reachable from the root.
        reachable: usize,
    },
    /// The allocator holds nodes the tree cannot reach.
    LeakedNodes {
        /// Nodes held by the allocator.
        allocated: usize,
        /// Nodes reachable from the root.
        reachable: usize,
    },
    /// Two in-order neighbors are not strictly increasing.
    OutOfOrder {
        /// In-order index of the second element.
        index: usize,
    },
    /// A thread does not point at the in-order neighbor on its side.
    MisdirectedThread(NodeId),
    /// A cached extreme or the root disagrees with the tree.
    StaleHeader,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingChild(id) => write!(f, "child link to missing node {id:?}"),
            Self::Cycle(id) => write!(f, "node {id:?} reached twice"),
            Self::LengthMismatch { recorded, reachable } => {
                write!(f, "length is {recorded} but {reachable} nodes are reachable")
            }
            Self::LeakedNodes { allocated, reachable } => {
                write!(f, "{allocated} nodes allocated but only {reachable} reachable")
            }
            Self::OutOfOrder { index } => write!(f, "keys out of order at index {index}"),
            Self::MisdirectedThread(id) => write!(f, "thread of node {id:?} skips its neighbor"),
            Self::StaleHeader => f.write_str("header does not match the tree"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

impl<K, V, C, A> ThreadedMap<K, V, C, A>
where
    C: Comparator<K>,
    A: NodeAlloc<Node<K, V>>,
{
    /// Verifies the tree structure from scratch.
    ///
    /// Checks that child links form a tree, keys increase strictly in order,
    /// every thread names the in-order neighbor on its side (the sentinel at
    /// the extremes), and the length and header caches agree with the tree.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let order = self.in_order()?;

        if order.len() != self.len {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.len,
                reachable: order.len(),
            });
        }
        if self.alloc.len() != order.len() {
            return Err(InvariantViolation::LeakedNodes {
                allocated: self.alloc.len(),
                reachable: order.len(),
            });
        }

        for (index, pair) in order.windows(2).enumerate() {
            if !self.comparator.less(self.alloc[pair[0]].key(), self.alloc[pair[1]].key()) {
                return Err(InvariantViolation::OutOfOrder { index: index + 1 });
            }
        }

        let at = |i: Option<usize>| i.and_then(|i| order.get(i)).copied().map_or(Position::End, Position::Node);
        for (i, &id) in order.iter().enumerate() {
            let node = &self.alloc[id];
            if let Link::Thread(prev) = node.left {
                if prev != at(i.checked_sub(1)) {
                    return Err(InvariantViolation::MisdirectedThread(id));
                }
            }
            if let Link::Thread(next) = node.right {
                if next != at(Some(i + 1)) {
                    return Err(InvariantViolation::MisdirectedThread(id));
                }
            }
        }

        let walked = self.walked_extremes();
        let cached = self.header.first.zip(self.header.last);
        let listed = order.first().copied().zip(order.last().copied());
        if walked != cached || cached != listed {
            return Err(InvariantViolation::StaleHeader);
        }
        Ok(())
    }

    /// Collects node handles in order, following child links only.
    fn in_order(&self) -> Result<Vec<NodeId>, InvariantViolation> {
        let mut order = Vec::with_capacity(self.len);
        let mut seen = vec![false; self.alloc.max_size().min(self.len.saturating_mul(2) + 1)];
        let mut visit = |id: NodeId| -> Result<(), InvariantViolation> {
            if self.alloc.get(id).is_none() {
                return Err(InvariantViolation::DanglingChild(id));
            }
            if id.index() >= seen.len() {
                seen.resize(id.index() + 1, false);
            }
            if std::mem::replace(&mut seen[id.index()], true) {
                return Err(InvariantViolation::Cycle(id));
            }
            Ok(())
        };

        let mut stack = Vec::new();
        let mut cur = self.header.root;
        if let Some(root) = cur {
            visit(root)?;
        }
        loop {
            while let Some(id) = cur {
                stack.push(id);
                cur = self.alloc[id].left.child();
                if let Some(left) = cur {
                    visit(left)?;
                }
            }
            let Some(id) = stack.pop() else { break };
            order.push(id);
            cur = self.alloc[id].right.child();
            if let Some(right) = cur {
                visit(right)?;
            }
        }
        Ok(order)
    }
}
