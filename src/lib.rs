//! # ledgertable
//!
//! The mutable/immutable memtable of a log-structured merge (LSM) storage
//! engine for a financial-ledger record store: a fixed-capacity, statically
//! allocated, dual-state sorted buffer that ingests recently written
//! records, keeps them searchable, freezes atomically for flushing, and
//! recycles its storage once the flush completes.
//!
//! ## Scope
//!
//! This crate implements only the memtable core. The surrounding engine —
//! consensus, wire protocol, journaling, grooves/caches, on-disk sorted
//! runs — is out of scope; those layers are modeled here purely as the thin
//! trait boundaries the memtable consumes or exposes:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`table_memory`] | The memtable itself: `TableMemory<P>` and its state machine |
//! | [`record_policy`] | `RecordPolicy` — fixes key/value types, ordering, and `CAPACITY` |
//! | [`allocator`] | `RecordAllocator` — the external collaborator owning backing storage |
//! | [`search`] | The upper-bound binary search shared by point lookups |
//!
//! ## Key Properties
//!
//! - **No hidden allocation.** `storage` is reserved once, at
//!   [`TableMemory::create`], and never resized afterward.
//! - **Deferred sort.** Inserts are O(1); sorting happens once, lazily, at
//!   [`TableMemory::freeze`] (or at a test-only [`TableMemory::get`]).
//! - **Single-writer.** No locks, no atomics, no awaitable points — every
//!   operation runs to completion on the calling thread.
//!
//! ## Quick Start
//!
//! ```
//! use ledgertable::allocator::HeapAllocator;
//! use ledgertable::record_policy::RecordPolicy;
//! use ledgertable::table_memory::{InitialState, TableMemory};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Transfer {
//!     id: u64,
//!     amount_cents: i64,
//! }
//!
//! struct TransferPolicy;
//!
//! impl RecordPolicy for TransferPolicy {
//!     type Key = u64;
//!     type Value = Transfer;
//!     const CAPACITY: usize = 1024;
//!
//!     fn key_of(value: &Transfer) -> u64 {
//!         value.id
//!     }
//!
//!     fn tombstone_from(key: u64) -> Transfer {
//!         Transfer { id: key, amount_cents: 0 }
//!     }
//! }
//!
//! let allocator = HeapAllocator;
//! let mut table = TableMemory::<TransferPolicy>::create(
//!     &allocator,
//!     InitialState::Mutable,
//!     "transfers",
//! )
//! .unwrap();
//!
//! table.put(Transfer { id: 1, amount_cents: 500 });
//! table.put(Transfer { id: 2, amount_cents: -200 });
//!
//! table.freeze(/* snapshot_min = */ 1);
//! assert_eq!(table.key_min(), 1);
//! assert_eq!(table.key_max(), 2);
//!
//! // ... an external flusher reads `table.values_used()`, writes it
//! // durably, then marks the buffer flushed:
//! table.mark_flushed();
//! table.thaw();
//! assert_eq!(table.len(), 0);
//! ```

#![allow(dead_code)]

pub mod allocator;
pub mod record_policy;
pub mod search;
pub mod table_memory;
