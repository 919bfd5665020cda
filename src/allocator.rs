//! # Allocator
//!
//! The single external collaborator responsible for producing and reclaiming
//! the one backing region a [`crate::table_memory::TableMemory`] ever owns.
//!
//! A `RecordAllocator` is consulted exactly twice per `TableMemory` lifetime:
//! once at `create`, to reserve a region large enough for `CAPACITY` records,
//! and once at `destroy`, to release it. No other operation allocates.

use std::collections::TryReserveError;

use thiserror::Error;

/// The only recoverable failure mode in this crate: allocation at
/// construction time.
#[derive(Debug, Error)]
pub enum AllocatorError {
    /// The allocator could not reserve a contiguous region of the requested
    /// capacity.
    #[error("failed to allocate storage for {requested} records: {source}")]
    OutOfMemory {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}

/// External collaborator that owns the backing storage for record families.
///
/// Implementations must hand back a region with *exactly* the requested
/// capacity reserved and zero records used; `TableMemory` never asks the
/// allocator to grow or shrink a region it already holds.
pub trait RecordAllocator<V> {
    /// Reserve a contiguous region capable of holding `capacity` records,
    /// with none populated yet.
    fn allocate(&self, capacity: usize) -> Result<Vec<V>, AllocatorError>;

    /// Return a previously allocated region to the allocator. The region is
    /// dropped; implementations that track allocation statistics may hook
    /// this to update them.
    fn release(&self, storage: Vec<V>) {
        drop(storage);
    }
}

/// Default [`RecordAllocator`] backed by the global heap allocator.
///
/// This is the allocator a standalone binding of this crate reaches for when
/// it has no arena/slab allocator of its own to hand in — the crate is
/// otherwise agnostic to where the backing region comes from.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl<V> RecordAllocator<V> for HeapAllocator {
    fn allocate(&self, capacity: usize) -> Result<Vec<V>, AllocatorError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|source| AllocatorError::OutOfMemory {
                requested: capacity,
                source,
            })?;
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_allocator_reserves_requested_capacity() {
        let allocator = HeapAllocator;
        let storage: Vec<u64> = allocator.allocate(16).expect("allocation");
        assert_eq!(storage.len(), 0);
        assert!(storage.capacity() >= 16);
    }

    #[test]
    fn heap_allocator_zero_capacity_is_legal() {
        let allocator = HeapAllocator;
        let storage: Vec<u64> = allocator.allocate(0).expect("allocation");
        assert_eq!(storage.len(), 0);
    }
}
