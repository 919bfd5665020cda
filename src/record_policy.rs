//! # RecordPolicy
//!
//! The external collaborator that fixes a record family's shape: the record
//! type itself, the key it is ordered by, the key's total order, the
//! tombstone encoding, and the compile-time buffer capacity.
//!
//! `TableMemory` is generic over a single `P: RecordPolicy` type parameter
//! rather than over `(K, V, CAPACITY)` directly, so that a binding crate can
//! express "one memtable per record family" as one small unit type per
//! family implementing this trait.

/// Fixes the record type, key type, ordering, tombstone encoding, and
/// capacity for one memtable instantiation.
///
/// # Contract
///
/// - `key_of` is a pure function: for a given `Value`, it always returns the
///   same `Key`. `TableMemory` relies on this to defer sorting safely — it
///   never re-derives a key for a record already placed in `storage`.
/// - `Key`'s `Ord` implementation must be a total order (monotone,
///   antisymmetric, transitive). `TableMemory`'s sort and binary search are
///   only correct under a total order.
/// - `CAPACITY` is the maximum number of records a single `TableMemory` of
///   this policy can hold before it must be frozen. It is a property of the
///   record family, not of any one buffer instance.
pub trait RecordPolicy {
    /// The ordering key extracted from a record.
    type Key: Ord + Clone;

    /// The record type stored in the buffer.
    type Value: Clone;

    /// Maximum number of records a single buffer may hold.
    const CAPACITY: usize;

    /// Extracts the ordering key from a record.
    fn key_of(value: &Self::Value) -> Self::Key;

    /// Builds a tombstone record for `key`.
    ///
    /// Declared here for completeness with spec.md's RecordPolicy surface;
    /// the memtable itself never calls this — tombstones arrive as ordinary
    /// `put` values from the write pipeline, which is the layer that decides
    /// a key should be logically deleted.
    fn tombstone_from(key: Self::Key) -> Self::Value;
}
