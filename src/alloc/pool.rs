//! `NodePool`: a generational slot arena for tree nodes.
//!
//! Slots live in a single `Vec` and are recycled through an intrusive free
//! list. Every slot carries a generation counter that advances when the slot is
//! released, so handles to released nodes stop resolving (ABA protection).

use super::allocator::{AllocError, NodeAlloc, NodeId};
use core::fmt;
use core::mem;
use core::ops::{Index, IndexMut};

/// Marks the end of the free list.
const NO_SLOT: u32 = u32::MAX;

enum SlotState<T> {
    /// Released; holds the index of the next free slot.
    Free { next_free: u32 },
    /// Handed out by `allocate`, not yet constructed.
    Reserved,
    Occupied(T),
}

struct Slot<T> {
    generation: u32,
    state: SlotState<T>,
}

/// The default node allocator.
pub struct NodePool<T> {
    slots: Vec<Slot<T>>,
    free_head: u32,
    /// Constructed values.
    len: usize,
    /// Reserved plus constructed slots.
    in_use: usize,
    limit: Option<usize>,
}

impl<T> NodePool<T> {
    /// Creates an empty pool bounded only by the handle space.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: NO_SLOT,
            len: 0,
            in_use: 0,
            limit: None,
        }
    }

    /// Creates an empty pool with room for `capacity` nodes before it regrows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Creates a pool that refuses to hand out more than `limit` slots at once.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Number of slots backing the pool, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn slot_limit() -> usize {
        // `NO_SLOT` is never a valid index.
        let handle_space = NO_SLOT as usize;
        let addressable = isize::MAX as usize / mem::size_of::<Slot<T>>().max(1);
        handle_space.min(addressable)
    }

    fn occupied(&self, id: NodeId) -> Option<&T> {
        let slot = self.slots.get(id.index())?;
        match &slot.state {
            SlotState::Occupied(value) if slot.generation == id.generation() => Some(value),
            _ => None,
        }
    }

    fn occupied_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index())?;
        match &mut slot.state {
            SlotState::Occupied(value) if slot.generation == id.generation() => Some(value),
            _ => None,
        }
    }
}

impl<T> NodeAlloc<T> for NodePool<T> {
    fn allocate(&mut self) -> Result<NodeId, AllocError> {
        if self.in_use >= self.max_size() {
            return Err(AllocError);
        }

        if self.free_head != NO_SLOT {
            let index = self.free_head;
            let slot = &mut self.slots[index as usize];
            let SlotState::Free { next_free } = slot.state else {
                unreachable!("free list points at a live slot");
            };
            self.free_head = next_free;
            slot.state = SlotState::Reserved;
            self.in_use += 1;
            return Ok(NodeId::new(index, slot.generation));
        }

        let index = u32::try_from(self.slots.len()).map_err(|_| AllocError)?;
        self.slots.push(Slot {
            generation: 0,
            state: SlotState::Reserved,
        });
        self.in_use += 1;
        Ok(NodeId::new(index, 0))
    }

    fn construct(&mut self, id: NodeId, value: T) {
        let slot = &mut self.slots[id.index()];
        assert!(
            slot.generation == id.generation() && matches!(slot.state, SlotState::Reserved),
            "construct on a slot that is not reserved: {id:?}"
        );
        slot.state = SlotState::Occupied(value);
        self.len += 1;
    }

    fn destroy(&mut self, id: NodeId) -> T {
        assert!(self.occupied(id).is_some(), "destroy on an empty slot: {id:?}");
        let slot = &mut self.slots[id.index()];
        match mem::replace(&mut slot.state, SlotState::Reserved) {
            SlotState::Occupied(value) => {
                self.len -= 1;
                value
            }
            _ => unreachable!(),
        }
    }

    fn deallocate(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return;
        };
        if slot.generation != id.generation() || matches!(slot.state, SlotState::Free { .. }) {
            return;
        }
        if matches!(slot.state, SlotState::Occupied(_)) {
            self.len -= 1;
        }
        slot.state = SlotState::Free {
            next_free: self.free_head,
        };
        // Advancing the generation retires every outstanding handle to this slot.
        slot.generation = slot.generation.wrapping_add(1);
        self.free_head = id.index() as u32;
        self.in_use -= 1;
    }

    #[inline]
    fn get(&self, id: NodeId) -> Option<&T> {
        self.occupied(id)
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.occupied_mut(id)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn max_size(&self) -> usize {
        let bound = Self::slot_limit();
        self.limit.map_or(bound, |limit| limit.min(bound))
    }

    fn empty_like(&self) -> Self {
        Self {
            limit: self.limit,
            ..Self::new()
        }
    }
}

impl<T> Index<NodeId> for NodePool<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        match self.occupied(id) {
            Some(value) => value,
            None => panic!("no node at {id:?}"),
        }
    }
}

impl<T> IndexMut<NodeId> for NodePool<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.occupied_mut(id) {
            Some(value) => value,
            None => panic!("no node at {id:?}"),
        }
    }
}

impl<T> Default for NodePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for NodePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePool")
            .field("len", &self.len)
            .field("in_use", &self.in_use)
            .field("capacity", &self.slots.len())
            .field("limit", &self.limit)
            .finish()
    }
}
