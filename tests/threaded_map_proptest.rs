use proptest::prelude::*;
use std::collections::BTreeMap;
use std::ops::Bound;
use threaded_map::ThreadedMap;

#[derive(Debug, Clone)]
enum Operation {
    Insert(u8, u16),
    Erase(u8),
    Get(u8),
    LowerBound(u8),
    UpperBound(u8),
    EraseRange(u8, u8),
    PopFirst,
    PopLast,
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Operation::Insert(k, v)),
        2 => any::<u8>().prop_map(Operation::Erase),
        1 => any::<u8>().prop_map(Operation::Get),
        1 => any::<u8>().prop_map(Operation::LowerBound),
        1 => any::<u8>().prop_map(Operation::UpperBound),
        1 => (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Operation::EraseRange(a.min(b), a.max(b))),
        1 => Just(Operation::PopFirst),
        1 => Just(Operation::PopLast),
    ]
}

proptest! {
    #[test]
    fn test_threaded_map_matches_std_map(ops in proptest::collection::vec(operation(), 1..200)) {
        let mut std_map = BTreeMap::new();
        let mut map = ThreadedMap::new();

        for op in ops {
            match op {
                Operation::Insert(k, v) => {
                    let fresh = !std_map.contains_key(&k);
                    std_map.entry(k).or_insert(v);
                    let (pos, inserted) = map.insert(k, v);
                    prop_assert_eq!(inserted, fresh, "insert result mismatch for key {}", k);
                    prop_assert_eq!(map.get_at(pos).map(|(_, v)| v), std_map.get(&k));
                }
                Operation::Erase(k) => {
                    let expected = usize::from(std_map.remove(&k).is_some());
                    prop_assert_eq!(map.erase(&k), expected, "erase mismatch for key {}", k);
                }
                Operation::Get(k) => {
                    prop_assert_eq!(map.get(&k), std_map.get(&k), "get mismatch for key {}", k);
                    prop_assert_eq!(map.count(&k), usize::from(std_map.contains_key(&k)));
                }
                Operation::LowerBound(k) => {
                    let expected = std_map.range(k..).next().map(|(k, _)| k);
                    prop_assert_eq!(map.key_at(map.lower_bound(&k)), expected);
                }
                Operation::UpperBound(k) => {
                    let expected = std_map.range((Bound::Excluded(k), Bound::Unbounded)).next().map(|(k, _)| k);
                    prop_assert_eq!(map.key_at(map.upper_bound(&k)), expected);
                }
                Operation::EraseRange(lo, hi) => {
                    std_map.retain(|k, _| !(lo..hi).contains(k));
                    let (first, last) = (map.lower_bound(&lo), map.lower_bound(&hi));
                    map.erase_range(first, last);
                }
                Operation::PopFirst => {
                    prop_assert_eq!(map.pop_first(), std_map.pop_first());
                }
                Operation::PopLast => {
                    prop_assert_eq!(map.pop_last(), std_map.pop_last());
                }
            }

            prop_assert!(map.check_invariants().is_ok(), "{:?}", map.check_invariants());
            prop_assert_eq!(map.len(), std_map.len(), "length mismatch");
        }

        // Final consistency check, both directions.
        prop_assert!(map.iter().eq(std_map.iter()));
        prop_assert!(map.iter().rev().eq(std_map.iter().rev()));
    }

    #[test]
    fn test_range_matches_std_map(
        keys in proptest::collection::vec(any::<u8>(), 0..64),
        a in any::<u8>(),
        b in any::<u8>(),
    ) {
        let (lo, hi) = (a.min(b), a.max(b));
        let std_map: BTreeMap<u8, ()> = keys.iter().map(|&k| (k, ())).collect();
        let map: ThreadedMap<u8, ()> = keys.iter().map(|&k| (k, ())).collect();

        prop_assert!(map.range(lo..=hi).eq(std_map.range(lo..=hi)));
        prop_assert!(map.range(lo..hi).rev().eq(std_map.range(lo..hi).rev()));
        prop_assert!(map.range(..hi).eq(std_map.range(..hi)));
    }

    #[test]
    fn test_clone_preserves_shape(keys in proptest::collection::vec(any::<u16>(), 0..128)) {
        let map: ThreadedMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        let copy = map.clone();
        prop_assert_eq!(&copy, &map);
        prop_assert_eq!(copy.height(), map.height());
        prop_assert!(copy.check_invariants().is_ok());
    }
}
