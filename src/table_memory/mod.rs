//! # TableMemory
//!
//! The mutable/immutable memtable: a fixed-capacity, statically allocated,
//! dual-state sorted buffer of records from one logical record family.
//!
//! ## Design Invariants
//!
//! - `storage` is allocated exactly once, at [`TableMemory::create`], and
//!   never resized; its reserved capacity is [`RecordPolicy::CAPACITY`] for
//!   the entire lifetime of the buffer.
//! - `0 <= len <= CAPACITY` always.
//! - `is_sorted == true` implies `storage[0..len)` is non-decreasing by
//!   `key_of`. The converse does not hold: `is_sorted` may be conservatively
//!   `false` even over content that happens to be sorted.
//! - In state `Immutable`, `is_sorted` is always `true`.
//! - In state `Immutable { flushed: true, .. }`, the buffer's contents are
//!   logically obsolete; the only legal transition is [`TableMemory::thaw`].
//!
//! ## Lifecycle
//!
//! A `TableMemory` is created once at engine start, reused across many
//! `Mutable -> Immutable -> flushed -> Mutable` cycles, and destroyed at
//! engine shutdown, which returns `storage` to the allocator.
//!
//! ## Sort Deferral
//!
//! Sorting is deferred from `put` to `freeze` (or to a test-only `get`): the
//! hot insert path is a capacity assertion, a store, and a comparison against
//! the previously inserted key — nothing that depends on the rest of the
//! buffer's contents. This is the correct trade-off for a log-structured
//! ingest pattern, where most `put` sequences arrive already ordered and the
//! worst case (an unsorted fill) is paid exactly once, at freeze time.

#[cfg(test)]
mod tests;

use tracing::{debug, info, trace};

use crate::allocator::{AllocatorError, RecordAllocator};
use crate::record_policy::RecordPolicy;
use crate::search::upper_bound;

/// Lifecycle phase of a [`TableMemory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMemoryState {
    /// Accepting `put`s; not yet visible to a flusher.
    Mutable,
    /// Frozen for flushing. `flushed` becomes `true` once an external
    /// flusher has durably written the buffer's contents; only then may
    /// [`TableMemory::thaw`] be called.
    Immutable { flushed: bool, snapshot_min: u64 },
}

/// The shape a freshly [`TableMemory::create`]d buffer starts in.
///
/// Mirrors the two constructor shapes spec.md describes: a plain empty
/// mutable buffer, or a buffer already in the "already flushed" immutable
/// shape — useful when an engine holds a pair of buffers and one must start
/// pre-drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialState {
    Mutable,
    ImmutableFlushed,
}

/// A fixed-capacity, statically allocated mutable/immutable memtable for one
/// record family described by `P`.
///
/// See the module-level documentation for the invariants this type upholds
/// between public operations.
pub struct TableMemory<P: RecordPolicy> {
    storage: Vec<P::Value>,
    len: usize,
    is_sorted: bool,
    state: TableMemoryState,
    label: &'static str,
}

impl<P: RecordPolicy> TableMemory<P> {
    /// Allocates `storage` (capacity [`RecordPolicy::CAPACITY`]) via
    /// `allocator` and returns a buffer in `initial_state`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocatorError`] if the allocator cannot reserve the
    /// requested capacity. This is the only fallible operation in the
    /// buffer's entire lifetime.
    pub fn create(
        allocator: &impl RecordAllocator<P::Value>,
        initial_state: InitialState,
        label: &'static str,
    ) -> Result<Self, AllocatorError> {
        let storage = allocator.allocate(P::CAPACITY)?;

        let state = match initial_state {
            InitialState::Mutable => TableMemoryState::Mutable,
            InitialState::ImmutableFlushed => TableMemoryState::Immutable {
                flushed: true,
                snapshot_min: 0,
            },
        };

        info!(label, capacity = P::CAPACITY, ?state, "TableMemory created");

        Ok(Self {
            storage,
            len: 0,
            is_sorted: true,
            state,
            label,
        })
    }

    /// Returns `storage` to `allocator`. No other cleanup is performed.
    pub fn destroy(self, allocator: &impl RecordAllocator<P::Value>) {
        info!(label = self.label, len = self.len, "TableMemory destroyed");
        allocator.release(self.storage);
    }

    /// Clears `len` to zero and sets `is_sorted` to `true`, preserving
    /// `storage`, `label`, and the state *tag*: a `Mutable` buffer resets to
    /// `Mutable`; an `Immutable` buffer resets to
    /// `Immutable { flushed: true, snapshot_min: 0 }`.
    pub fn reset(&mut self) {
        self.storage.truncate(0);
        self.len = 0;
        self.is_sorted = true;
        self.state = match self.state {
            TableMemoryState::Mutable => TableMemoryState::Mutable,
            TableMemoryState::Immutable { .. } => TableMemoryState::Immutable {
                flushed: true,
                snapshot_min: 0,
            },
        };
        debug!(label = self.label, state = ?self.state, "TableMemory reset");
    }

    /// Appends `value` to the buffer.
    ///
    /// # Panics
    ///
    /// Panics if `state != Mutable` or `len == CAPACITY`. Both are contract
    /// violations: the write pipeline is responsible for freezing a full
    /// buffer before attempting further `put`s.
    pub fn put(&mut self, value: P::Value) {
        assert!(
            matches!(self.state, TableMemoryState::Mutable),
            "put() called on a TableMemory that is not Mutable"
        );
        assert!(
            self.len < P::CAPACITY,
            "put() called on a TableMemory at capacity ({})",
            P::CAPACITY
        );

        // `is_sorted` is weakened *before* the store becomes visible to a
        // reader: compare the incoming key against the previous tail before
        // appending, since after appending `storage[len]` both aliases
        // (old tail / new tail) would read the same slot's old value.
        if self.is_sorted && self.len > 0 {
            let prev_key = P::key_of(&self.storage[self.len - 1]);
            let new_key = P::key_of(&value);
            self.is_sorted = prev_key <= new_key;
        }

        self.storage.push(value);
        self.len += 1;

        trace!(label = self.label, len = self.len, is_sorted = self.is_sorted, "put");
    }

    /// Test/fuzz-only point lookup.
    ///
    /// Production lookups are served by an external cache/groove layer, not
    /// by the memtable — this exists for test and property-based
    /// verification harnesses.
    ///
    /// Sorts `storage[0..len)` in place (idempotent canonicalization, not a
    /// content change) if `is_sorted` is currently `false`, then performs an
    /// upper-bound binary search. On an exact match, returns a reference to
    /// the *last-inserted* record with that key (see [`crate::search`]).
    #[cfg(any(test, feature = "verification"))]
    pub fn get(&mut self, key: &P::Key) -> Option<&P::Value> {
        self.ensure_sorted();

        let idx = upper_bound(&self.storage[..self.len], key, P::key_of);
        if idx > 0 && P::key_of(&self.storage[idx - 1]) == *key {
            Some(&self.storage[idx - 1])
        } else {
            None
        }
    }

    /// Transitions `Mutable -> Immutable`, canonicalizing sort order and
    /// tagging the buffer with `snapshot_min`.
    ///
    /// Sorts `storage[0..len)` in place (stably, so "last writer wins" for
    /// duplicate keys is preserved) if not already sorted. A `len == 0`
    /// buffer is born already `flushed` since there is nothing to write.
    ///
    /// # Panics
    ///
    /// Panics if `state != Mutable`.
    pub fn freeze(&mut self, snapshot_min: u64) {
        assert!(
            matches!(self.state, TableMemoryState::Mutable),
            "freeze() called on a TableMemory that is not Mutable"
        );

        self.ensure_sorted();

        self.state = TableMemoryState::Immutable {
            flushed: self.len == 0,
            snapshot_min,
        };

        debug!(
            label = self.label,
            len = self.len,
            snapshot_min,
            flushed = self.len == 0,
            "TableMemory frozen"
        );
    }

    /// Marks an `Immutable` buffer as flushed.
    ///
    /// Called by the external flusher once it has durably written
    /// `values_used()`. Only after this may [`TableMemory::thaw`] be called.
    ///
    /// # Panics
    ///
    /// Panics if `state != Immutable { .. }`.
    pub fn mark_flushed(&mut self) {
        match &mut self.state {
            TableMemoryState::Immutable { flushed, .. } => {
                *flushed = true;
            }
            TableMemoryState::Mutable => {
                panic!("mark_flushed() called on a TableMemory that is not Immutable");
            }
        }
        debug!(label = self.label, "TableMemory marked flushed");
    }

    /// Transitions `Immutable { flushed: true, .. } -> Mutable`, truncating
    /// `len` to zero. `storage` is retained; no reallocation occurs.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not `Immutable { flushed: true, .. }`.
    pub fn thaw(&mut self) {
        match self.state {
            TableMemoryState::Immutable { flushed: true, .. } => {}
            _ => panic!("thaw() called on a TableMemory that is not flushed-Immutable"),
        }

        self.storage.truncate(0);
        self.len = 0;
        self.is_sorted = true;
        self.state = TableMemoryState::Mutable;

        debug!(label = self.label, "TableMemory thawed");
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` iff no records are live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `storage[0..len)` is currently known to be sorted. Exposed
    /// for tests and external property checks; `TableMemory`'s own
    /// operations never need to read this from outside.
    pub fn is_sorted(&self) -> bool {
        self.is_sorted
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TableMemoryState {
        self.state
    }

    /// Borrowed view of the live records.
    ///
    /// Valid only until the next mutating call (`put`, `get`, `freeze`,
    /// `thaw`, `reset`) — re-borrowing across such a call is undefined and
    /// the scheduling model (spec.md §5) forbids it from being raced with a
    /// flusher's own read of this same borrow.
    pub fn values_used(&self) -> &[P::Value] {
        &self.storage[..self.len]
    }

    /// Smallest key in the buffer.
    ///
    /// # Panics
    ///
    /// Panics if `state != Immutable` or `len == 0`.
    pub fn key_min(&self) -> P::Key {
        self.assert_immutable_nonempty();
        P::key_of(&self.storage[0])
    }

    /// Largest key in the buffer.
    ///
    /// # Panics
    ///
    /// Panics if `state != Immutable` or `len == 0`.
    pub fn key_max(&self) -> P::Key {
        self.assert_immutable_nonempty();
        P::key_of(&self.storage[self.len - 1])
    }

    fn assert_immutable_nonempty(&self) {
        assert!(
            matches!(self.state, TableMemoryState::Immutable { .. }),
            "key_min()/key_max() require an Immutable TableMemory"
        );
        assert!(self.len > 0, "key_min()/key_max() require a non-empty TableMemory");
    }

    /// Sorts `storage[0..len)` by `key_of` if `is_sorted` is currently
    /// `false`, then marks it sorted. Idempotent: a second call with no
    /// intervening `put` performs no comparisons beyond the initial check.
    fn ensure_sorted(&mut self) {
        if self.is_sorted {
            return;
        }
        // `sort_by` is a stable sort (guaranteed by the standard library),
        // which is load-bearing: duplicate keys must retain insertion order
        // so the upper-bound search in `get` resolves to the last writer.
        self.storage[..self.len].sort_by(|a, b| P::key_of(a).cmp(&P::key_of(b)));
        self.is_sorted = true;
    }
}
