mod invariants;

use crate::allocator::HeapAllocator;
use crate::record_policy::RecordPolicy;
use crate::table_memory::{InitialState, TableMemory};

/// Test-only record: `(key, payload)`, capacity 16 (matches spec.md's S1/S3
/// scenarios).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Entry {
    pub key: u64,
    pub payload: u64,
}

pub(super) struct EntryPolicy;

impl RecordPolicy for EntryPolicy {
    type Key = u64;
    type Value = Entry;
    const CAPACITY: usize = 16;

    fn key_of(value: &Entry) -> u64 {
        value.key
    }

    fn tombstone_from(key: u64) -> Entry {
        Entry { key, payload: 0 }
    }
}

pub(super) fn entry(key: u64, payload: u64) -> Entry {
    Entry { key, payload }
}

pub(super) fn new_mutable() -> TableMemory<EntryPolicy> {
    TableMemory::<EntryPolicy>::create(&HeapAllocator, InitialState::Mutable, "test")
        .expect("allocation")
}

pub(super) fn new_immutable_flushed() -> TableMemory<EntryPolicy> {
    TableMemory::<EntryPolicy>::create(&HeapAllocator, InitialState::ImmutableFlushed, "test")
        .expect("allocation")
}
