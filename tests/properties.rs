use std::collections::BTreeSet;
use std::ops::Bound;

use ordered_tree::{Direction, RbTree};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(i16),
    Remove(i16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<i16>().prop_map(|k| Op::Insert(k % 200)),
        2 => any::<i16>().prop_map(|k| Op::Remove(k % 200)),
    ]
}

fn bound() -> impl Strategy<Value = Bound<i16>> {
    prop_oneof![
        Just(Bound::Unbounded),
        (-120i16..120).prop_map(Bound::Included),
        (-120i16..120).prop_map(Bound::Excluded),
    ]
}

fn within(k: i16, low: Bound<&i16>, high: Bound<&i16>) -> bool {
    let above = match low {
        Bound::Unbounded => true,
        Bound::Included(low) => k >= *low,
        Bound::Excluded(low) => k > *low,
    };
    let below = match high {
        Bound::Unbounded => true,
        Bound::Included(high) => k <= *high,
        Bound::Excluded(high) => k < *high,
    };
    above && below
}

fn build(keys: &[i16]) -> RbTree<i16> {
    let mut tree = RbTree::natural();
    for &k in keys {
        tree.insert(k).unwrap();
    }
    tree
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(ops in prop::collection::vec(op(), 0..300)) {
        let mut tree = RbTree::natural();
        let mut model = Vec::new();
        for op in ops {
            match op {
                Op::Insert(k) => {
                    tree.insert(k).unwrap();
                    model.push(k);
                }
                Op::Remove(k) => {
                    let removed = tree.remove(&k);
                    let pos = model.iter().position(|&m| m == k);
                    prop_assert_eq!(removed.is_some(), pos.is_some());
                    if let Some(pos) = pos {
                        model.swap_remove(pos);
                    }
                }
            }
            prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
            prop_assert_eq!(tree.len(), model.len());
        }
        model.sort();
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), model);
    }

    #[test]
    fn in_order_walk_is_strictly_ascending(keys in prop::collection::btree_set(any::<i32>(), 0..200)) {
        let mut tree = RbTree::natural();
        for &k in keys.iter().rev() {
            tree.insert(k).unwrap();
        }
        let walked: Vec<_> = tree.iter().copied().collect();
        prop_assert!(walked.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(walked, keys.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn membership_round_trips(
        keys in prop::collection::btree_set(-500i16..500, 0..150),
        probes in prop::collection::vec(-600i16..600, 0..50),
    ) {
        let keys: Vec<_> = keys.into_iter().collect();
        let mut tree = build(&keys);
        let (gone, kept) = keys.split_at(keys.len() / 3);
        for k in gone {
            prop_assert_eq!(tree.remove(k), Some(*k));
        }
        let live: BTreeSet<_> = kept.iter().copied().collect();
        for k in kept {
            prop_assert_eq!(tree.find(k), Some(k));
        }
        for k in gone {
            prop_assert_eq!(tree.find(k), None);
        }
        for k in probes {
            prop_assert_eq!(tree.contains(&k), live.contains(&k));
        }
    }

    #[test]
    fn range_matches_filtered_walk(
        keys in prop::collection::btree_set(-100i16..100, 0..120),
        low in bound(),
        high in bound(),
    ) {
        let keys: Vec<_> = keys.into_iter().collect();
        let tree = build(&keys);
        let (low, high) = (low.as_ref(), high.as_ref());

        let expected: Vec<_> = tree.iter().filter(|&&k| within(k, low, high)).collect();
        let forward: Vec<_> = tree.range_iter(low, high, Direction::Ascending).collect();
        prop_assert_eq!(&forward, &expected);

        let mut backward: Vec<_> = tree.range_iter(low, high, Direction::Descending).collect();
        backward.reverse();
        prop_assert_eq!(&backward, &expected);

        let sliced = tree.slice((low, high), Direction::Ascending).unwrap();
        prop_assert_eq!(sliced.len(), expected.len());
        prop_assert_eq!(sliced, expected);
    }

    #[test]
    fn filter_matches_predicate(keys in prop::collection::vec(any::<i16>(), 0..200), modulus in 1i16..7) {
        let tree = build(&keys);
        let everything = tree.filter(|_| true).unwrap();
        prop_assert_eq!(everything.len(), tree.len());
        prop_assert!(everything.iter().copied().eq(tree.iter()));

        let picked = tree.filter(|k| k % modulus == 0).unwrap();
        let expected: Vec<_> = tree.iter().filter(|&&k| k % modulus == 0).collect();
        prop_assert_eq!(picked, expected);
    }
}
