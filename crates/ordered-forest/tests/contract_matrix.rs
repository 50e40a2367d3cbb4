//! Behavior every engine shares, checked against `std::collections::BTreeSet`.

use std::collections::BTreeSet as Oracle;

use ordered_forest::{AvlSet, BTreeSet, Compare, OrderedSet, RbSet, SplaySet};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Clone, Copy, Debug, Default)]
struct Descending;

impl Compare<i32> for Descending {
    fn less(&self, a: &i32, b: &i32) -> bool {
        a > b
    }
}

fn engines() -> Vec<Box<dyn OrderedSet<i32>>> {
    vec![
        Box::new(AvlSet::<i32>::new()),
        Box::new(RbSet::<i32>::new()),
        Box::new(SplaySet::<i32>::new()),
        Box::new(BTreeSet::<i32>::with_degree(2).unwrap()),
        Box::new(BTreeSet::<i32>::with_degree(3).unwrap()),
        Box::new(BTreeSet::<i32>::new()),
    ]
}

fn keys_of(set: &dyn OrderedSet<i32>) -> Vec<i32> {
    let mut out = Vec::with_capacity(set.len());
    set.for_each(&mut |k| out.push(*k));
    out
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Add(i32),
    Find(i32),
    Remove(i32),
}

fn apply(set: &mut dyn OrderedSet<i32>, oracle: &mut Oracle<i32>, op: Op) {
    match op {
        Op::Add(k) => assert_eq!(set.add(k), oracle.insert(k), "{} add {k}", set.name()),
        Op::Find(k) => assert_eq!(set.find(&k), oracle.contains(&k), "{} find {k}", set.name()),
        Op::Remove(k) => {
            assert_eq!(set.remove(&k), oracle.remove(&k), "{} remove {k}", set.name())
        }
    }
    if let Err(e) = set.assert_valid() {
        panic!("{} after {op:?}: {e}", set.name());
    }
    assert_eq!(set.len(), oracle.len());
}

#[test]
fn oracle_random_sequence_matrix() {
    for mut set in engines() {
        let mut rng = StdRng::seed_from_u64(1337);
        let mut oracle = Oracle::new();
        for _ in 0..10_000 {
            let k = rng.gen_range(0..512);
            let op = match rng.gen_range(0..3) {
                0 => Op::Add(k),
                1 => Op::Find(k),
                _ => Op::Remove(k),
            };
            apply(set.as_mut(), &mut oracle, op);
        }
        assert_eq!(keys_of(set.as_ref()), oracle.iter().copied().collect::<Vec<_>>());
    }
}

#[test]
fn round_trip_matrix() {
    for mut set in engines() {
        assert!(set.add(42));
        assert!(set.find(&42));
        assert!(set.remove(&42));
        assert!(!set.find(&42));
        assert!(set.add(42));
        assert!(!set.add(42));
        assert_eq!(set.len(), 1);
        set.assert_valid().unwrap();
    }
}

#[test]
fn empty_set_matrix() {
    for mut set in engines() {
        assert!(set.is_empty());
        assert!(!set.find(&1));
        assert!(!set.remove(&1));
        set.clear();
        set.clear();
        assert!(set.is_empty());
        set.assert_valid().unwrap();
    }
}

#[test]
fn idempotent_clear_matrix() {
    for mut set in engines() {
        for k in 0..100 {
            set.add(k);
        }
        set.clear();
        assert!(set.is_empty());
        assert_eq!(keys_of(set.as_ref()), Vec::<i32>::new());
        set.clear();
        assert!(set.is_empty());
        set.assert_valid().unwrap();
        // Cleared sets are reusable.
        assert!(set.add(5));
        assert!(set.find(&5));
        set.assert_valid().unwrap();
    }
}

#[test]
fn shuffled_fill_and_drain_matrix() {
    let mut keys: Vec<i32> = (0..2_000).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(7));
    for mut set in engines() {
        for &k in &keys {
            assert!(set.add(k));
        }
        set.assert_valid().unwrap();
        assert_eq!(keys_of(set.as_ref()), (0..2_000).collect::<Vec<_>>());
        for &k in keys.iter().rev() {
            assert!(set.remove(&k), "{} remove {k}", set.name());
        }
        assert!(set.is_empty());
        set.assert_valid().unwrap();
    }
}

macro_rules! value_semantics {
    ($name:ident, $ty:ty, $make:expr) => {
        mod $name {
            use super::*;

            fn make() -> $ty {
                $make
            }

            #[test]
            fn single_key() {
                let mut set = make();
                set.add(9);
                assert_eq!(set.to_vec(), vec![9]);
                assert_eq!(set.len(), 1);
            }

            #[test]
            fn copy_is_independent() {
                let mut a = make();
                a.extend([3, 1, 2]);
                let mut b = a.clone();
                assert!(b.add(10));
                assert!(b.remove(&1));
                assert!(!a.find(&10));
                assert!(a.find(&1));
                assert_eq!(a.to_vec(), vec![1, 2, 3]);
                assert_eq!(b.to_vec(), vec![2, 3, 10]);
                a.assert_valid().unwrap();
                b.assert_valid().unwrap();
            }

            #[test]
            fn copy_assign_replaces_content() {
                let mut a = make();
                a.extend(0..50);
                let mut b = make();
                b.extend([100, 200]);
                b.clone_from(&a);
                assert_eq!(b.to_vec(), (0..50).collect::<Vec<_>>());
                b.assert_valid().unwrap();
                a.clear();
                assert_eq!(b.len(), 50);
            }

            #[test]
            fn move_out_leaves_source_empty() {
                let mut a = make();
                a.extend([5, 4, 6]);
                let mut b = a.take();
                assert_eq!(b.to_vec(), vec![4, 5, 6]);
                assert!(a.is_empty());
                for k in [4, 5, 6] {
                    assert!(!a.find(&k));
                }
                a.clear();
                a.assert_valid().unwrap();
                assert!(a.add(1));
                // Through the trait so every engine takes `&mut`.
                assert!(OrderedSet::find(&mut b, &5));
                b.assert_valid().unwrap();

                let c = b;
                assert_eq!(c.len(), 3);
            }

            #[test]
            fn large_set_clone_and_teardown() {
                let mut a = make();
                a.extend(0..20_000);
                a.assert_valid().unwrap();
                let b = a.clone();
                a.clear();
                assert!(a.is_empty());
                assert_eq!(b.len(), 20_000);
                assert!(b.to_vec().windows(2).all(|w| w[0] < w[1]));
                drop(b);
            }
        }
    };
}

value_semantics!(avl_values, AvlSet<i32>, AvlSet::new());
value_semantics!(rb_values, RbSet<i32>, RbSet::new());
value_semantics!(splay_values, SplaySet<i32>, SplaySet::new());
value_semantics!(btree_values, BTreeSet<i32>, BTreeSet::with_degree(2).unwrap());

#[test]
fn custom_comparator_matrix() {
    let descending = |a: &i32, b: &i32| a > b;
    let mut avl = AvlSet::<i32, Descending>::with_comparator(Descending);
    let mut rb = RbSet::<i32, _>::with_comparator(descending);
    let mut splay = SplaySet::<i32, Descending>::with_comparator(Descending);
    let mut btree = BTreeSet::<i32, Descending>::with_degree_and_comparator(2, Descending).unwrap();

    let sets: [&mut dyn OrderedSet<i32>; 4] = [&mut avl, &mut rb, &mut splay, &mut btree];
    for set in sets {
        for k in [5, 1, 9, 3, 7, 3] {
            set.add(k);
        }
        set.assert_valid().unwrap();
        assert_eq!(keys_of(set), vec![9, 7, 5, 3, 1]);
        assert!(set.remove(&9));
        assert!(!set.remove(&9));
        assert_eq!(keys_of(set), vec![7, 5, 3, 1]);
    }

    assert!(BTreeSet::<i32, Descending>::with_degree_and_comparator(1, Descending).is_err());
}

#[test]
fn equivalent_keys_collapse_matrix() {
    // Ordering by absolute value makes -3 and 3 the same key.
    let by_abs = |a: &i32, b: &i32| a.abs() < b.abs();
    let mut set = AvlSet::<i32, _>::with_comparator(by_abs);
    assert!(set.add(3));
    assert!(!set.add(-3));
    assert!(set.contains(&-3));
    assert!(set.remove(&-3));
    assert!(set.is_empty());

    let mut set = SplaySet::<i32, _>::with_comparator(by_abs);
    assert!(set.add(-4));
    assert!(!set.add(4));
    assert_eq!(set.to_vec(), vec![-4]);
}

#[test]
fn names_matrix() {
    let names: Vec<String> = engines().iter().map(|s| s.name().into_owned()).collect();
    assert_eq!(
        names,
        vec![
            "AVL Tree",
            "RB Tree",
            "Splay Tree",
            "B-Tree (N=2)",
            "B-Tree (N=3)",
            "B-Tree (N=16)",
        ]
    );
}

fn op_strategy() -> impl Strategy<Value = Op> {
    (0u8..3, -64i32..64).prop_map(|(kind, k)| match kind {
        0 => Op::Add(k),
        1 => Op::Find(k),
        _ => Op::Remove(k),
    })
}

proptest! {
    #[test]
    fn oracle_equivalence(ops in prop::collection::vec(op_strategy(), 0..300)) {
        for mut set in engines() {
            let mut oracle = Oracle::new();
            for &op in &ops {
                apply(set.as_mut(), &mut oracle, op);
            }
            prop_assert_eq!(keys_of(set.as_ref()), oracle.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn sorted_without_duplicates(keys in prop::collection::vec(any::<i32>(), 0..400)) {
        for mut set in engines() {
            for &k in &keys {
                set.add(k);
            }
            let out = keys_of(set.as_ref());
            prop_assert!(out.windows(2).all(|w| w[0] < w[1]));
            let expected: Oracle<i32> = keys.iter().copied().collect();
            prop_assert_eq!(out.len(), expected.len());
        }
    }
}
