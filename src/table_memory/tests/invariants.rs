//! General invariant checks from spec.md §8, properties 1-4, run over
//! randomized insert sequences.

use rand::prelude::*;

use super::{entry, new_mutable, EntryPolicy};
use crate::record_policy::RecordPolicy;
use crate::table_memory::TableMemoryState;

fn is_non_decreasing(keys: &[u64]) -> bool {
    keys.windows(2).all(|w| w[0] <= w[1])
}

/// Properties 1-2: `0 <= len <= CAPACITY`, and `is_sorted` only ever
/// understates sortedness, never overstates it.
#[test]
fn randomized_inserts_respect_len_and_sortedness_invariants() {
    let mut rng = StdRng::seed_from_u64(42);

    for _trial in 0..50 {
        let mut table = new_mutable();
        let count = rng.random_range(0..=EntryPolicy::CAPACITY);

        for _ in 0..count {
            let key = rng.random_range(0..100u64);
            table.put(entry(key, key));

            assert!(table.len() <= EntryPolicy::CAPACITY);
            if table.is_sorted() {
                let keys: Vec<u64> = table.values_used().iter().map(|e| e.key).collect();
                assert!(is_non_decreasing(&keys));
            }
        }
    }
}

/// Property 3: in `Immutable` state, `is_sorted` is always true.
#[test]
fn immutable_state_is_always_sorted() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut table = new_mutable();

    for _ in 0..EntryPolicy::CAPACITY {
        let key = rng.random_range(0..1000u64);
        table.put(entry(key, key));
    }
    table.freeze(0);

    assert!(table.is_sorted());
    assert!(matches!(table.state(), TableMemoryState::Immutable { .. }));
}

/// Property 4: freeze() followed by values_used() yields a non-decreasing
/// key sequence, for a fully-filled buffer inserted in reverse order.
#[test]
fn freeze_yields_non_decreasing_sequence_worst_case_fill() {
    let mut table = new_mutable();
    for key in (0..EntryPolicy::CAPACITY as u64).rev() {
        table.put(entry(key, key));
    }
    table.freeze(0);

    let keys: Vec<u64> = table.values_used().iter().map(|e| e.key).collect();
    assert!(is_non_decreasing(&keys));
    assert_eq!(keys.len(), EntryPolicy::CAPACITY);
}

#[test]
fn fill_to_capacity_exactly_is_legal() {
    let mut table = new_mutable();
    for key in 0..EntryPolicy::CAPACITY as u64 {
        table.put(entry(key, key));
    }
    assert_eq!(table.len(), EntryPolicy::CAPACITY);
}
