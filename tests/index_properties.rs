// Property tests
// The index is checked against a BTreeSet model over random workloads.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serve_engine::{HybridIndex, Options};

#[derive(Debug, Clone)]
enum Op {
    Insert(i32),
    Remove(i32),
    Query(i32),
    Range(i32, i32),
}

fn value() -> impl Strategy<Value = i32> {
    prop_oneof![-500..500i32, any::<i32>()]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => value().prop_map(Op::Insert),
        2 => value().prop_map(Op::Remove),
        2 => value().prop_map(Op::Query),
        1 => (value(), value()).prop_map(|(a, b)| Op::Range(a, b)),
    ]
}

/// Small blocks so a few hundred values exercise splits and merges.
fn small_index() -> HybridIndex {
    HybridIndex::with_options(Options::default().with_target_block_size(8)).unwrap()
}

proptest! {
    #[test]
    fn build_round_trips_membership(
        values in prop::collection::vec(-2000..2000i32, 0..3000),
        probes in prop::collection::vec(-2100..2100i32, 0..200),
    ) {
        let model: BTreeSet<i32> = values.iter().copied().collect();
        let mut buffer = values.clone();
        let mut index = HybridIndex::new();
        index.build(&mut buffer);

        prop_assert_eq!(&buffer, &model.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(index.len(), model.len());
        for x in values.iter().chain(probes.iter()) {
            prop_assert_eq!(index.query(*x), model.contains(x));
        }
        index.check_invariants().unwrap();
    }

    #[test]
    fn range_query_matches_model(
        values in prop::collection::vec(any::<i32>(), 0..500),
        low in any::<i32>(),
        high in any::<i32>(),
    ) {
        let model: BTreeSet<i32> = values.iter().copied().collect();
        let index = small_values_index(&values);
        let expected: Vec<i32> = if low <= high {
            model.range(low..=high).copied().collect()
        } else {
            Vec::new()
        };
        prop_assert_eq!(index.range_query(low, high), expected);
    }

    #[test]
    fn mixed_workload_matches_model(
        seed in prop::collection::vec(value(), 0..200),
        ops in prop::collection::vec(op(), 0..400),
    ) {
        let mut model: BTreeSet<i32> = seed.iter().copied().collect();
        let mut index = small_index();
        index.build(&mut seed.clone());

        for op in ops {
            match op {
                Op::Insert(x) => {
                    prop_assert_eq!(index.insert(x), model.insert(x));
                }
                Op::Remove(x) => {
                    prop_assert_eq!(index.remove(x), model.remove(&x));
                }
                Op::Query(x) => {
                    prop_assert_eq!(index.query(x), model.contains(&x));
                }
                Op::Range(a, b) => {
                    let (low, high) = (a.min(b), a.max(b));
                    let expected: Vec<i32> = model.range(low..=high).copied().collect();
                    prop_assert_eq!(index.range_query(low, high), expected);
                }
            }
            prop_assert!(index.check_invariants().is_ok());
        }
        prop_assert!(index.iter().eq(model.iter().copied()));
        for b in index.blocks() {
            prop_assert!(b.len() <= index.options().max_block_size);
        }
    }
}

fn small_values_index(values: &[i32]) -> HybridIndex {
    let mut index = small_index();
    index.build(&mut values.to_vec());
    index
}
