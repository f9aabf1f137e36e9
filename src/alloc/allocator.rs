//! The node allocator interface and its handle and error types.

use core::fmt;
use core::ops::{Index, IndexMut};

/// A generational handle to a slot in a node allocator.
///
/// The index names the slot; the generation names one particular occupancy of
/// it. Once a slot is released its generation moves on, so a handle kept past
/// the release never resolves again, even after the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Creates a handle from its raw parts.
    ///
    /// Only allocators should mint handles; a handle that was never returned by
    /// [`NodeAlloc::allocate`] simply fails to resolve.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index.
    pub const fn index(&self) -> usize {
        self.index as usize
    }

    /// Returns the generation of the slot occupancy this handle refers to.
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// A single-node allocator for linked containers.
///
/// The container only ever asks for one slot at a time. Reserving a slot and
/// placing a value in it are separate steps, as are taking the value out and
/// releasing the slot, so a container can acquire the memory for a node before
/// it starts rewriting links.
///
/// Indexing with a handle that does not name a constructed value panics, the
/// same way slice indexing does; use [`get`](NodeAlloc::get) to probe.
pub trait NodeAlloc<T>: Index<NodeId, Output = T> + IndexMut<NodeId> {
    /// Reserves one slot.
    ///
    /// # Errors
    /// Returns `AllocError` if no further slot can be handed out.
    fn allocate(&mut self) -> Result<NodeId, AllocError>;

    /// Places `value` into a slot returned by [`allocate`](NodeAlloc::allocate).
    ///
    /// # Panics
    /// Panics if `id` does not name a reserved, empty slot.
    fn construct(&mut self, id: NodeId, value: T);

    /// Moves the value out of its slot, leaving the slot reserved.
    ///
    /// # Panics
    /// Panics if `id` does not name a constructed value.
    fn destroy(&mut self, id: NodeId) -> T;

    /// Releases a reserved slot. Any value still in it is dropped.
    ///
    /// Releasing a handle that is already released is a no-op.
    fn deallocate(&mut self, id: NodeId);

    /// Returns the value in the slot, if `id` names a constructed value.
    fn get(&self, id: NodeId) -> Option<&T>;

    /// Returns the value in the slot mutably, if `id` names a constructed value.
    fn get_mut(&mut self, id: NodeId) -> Option<&mut T>;

    /// Number of constructed values.
    fn len(&self) -> usize;

    /// Returns `true` if no slot holds a value.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upper bound on the number of slots this allocator can hand out.
    fn max_size(&self) -> usize;

    /// Creates an empty allocator with the same configuration as `self`.
    fn empty_like(&self) -> Self
    where
        Self: Sized;

    /// Reserves a slot and constructs `value` in it.
    ///
    /// # Errors
    /// Returns `AllocError` if no slot is available; `value` is dropped.
    fn alloc(&mut self, value: T) -> Result<NodeId, AllocError> {
        let id = self.allocate()?;
        self.construct(id, value);
        Ok(id)
    }

    /// Destroys the value in the slot and releases it.
    ///
    /// # Panics
    /// Panics if `id` does not name a constructed value.
    fn free(&mut self, id: NodeId) -> T {
        let value = self.destroy(id);
        self.deallocate(id);
        value
    }
}

/// The error type for allocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("node allocation failed")
    }
}

impl std::error::Error for AllocError {}
