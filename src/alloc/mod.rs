//! Node allocation for linked containers.
//!
//! - `allocator`: the `NodeAlloc` interface, generational `NodeId` handles and `AllocError`
//! - `pool`: `NodePool`, the default free-list arena

pub mod allocator;
pub mod pool;

pub use allocator::{AllocError, NodeAlloc, NodeId};
pub use pool::NodePool;
