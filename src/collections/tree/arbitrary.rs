//! `proptest` strategies for maps (feature `proptest`).

use super::map::ThreadedMap;
use core::fmt::Debug;
use proptest::collection::{vec, SizeRange};
use proptest::prelude::*;

/// Maps built from random pairs, inserted in generation order.
pub fn arb_map<K, V>(
    keys: impl Strategy<Value = K>,
    values: impl Strategy<Value = V>,
    size: impl Into<SizeRange>,
) -> impl Strategy<Value = ThreadedMap<K, V>>
where
    K: Ord + Debug,
    V: Debug,
{
    vec((keys, values), size).prop_map(|pairs| pairs.into_iter().collect())
}

/// Key insertion orders that produce very different tree shapes.
///
/// Ascending and descending runs build a degenerate spine; shuffled keys
/// build a bushier tree. Keys are distinct and below `max_len`.
pub fn arb_insertion_order(max_len: u32) -> impl Strategy<Value = Vec<u32>> {
    let ascending = (0..=max_len).prop_map(|n| (0..n).collect::<Vec<_>>());
    let descending = (0..=max_len).prop_map(|n| (0..n).rev().collect::<Vec<_>>());
    let shuffled = (0..=max_len).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle());
    prop_oneof![ascending, descending, shuffled]
}

/// Maps over `u32` keys in one of the shapes of [`arb_insertion_order`],
/// each value the square of its key.
pub fn arb_shaped_map(max_len: u32) -> impl Strategy<Value = ThreadedMap<u32, u64>> {
    arb_insertion_order(max_len).prop_map(|keys| keys.into_iter().map(|k| (k, u64::from(k) * u64::from(k))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_arb_map_is_valid(map in arb_map(0i16..100, any::<u8>(), 0..40)) {
            prop_assert!(map.check_invariants().is_ok());
            prop_assert!(map.len() <= 40);
        }

        #[test]
        fn test_shaped_maps_drain_cleanly(mut map in arb_shaped_map(48)) {
            let expected = map.len();
            let mut drained = 0;
            while map.pop_first().is_some() {
                drained += 1;
                prop_assert!(map.check_invariants().is_ok());
            }
            prop_assert_eq!(drained, expected);
        }

        #[test]
        fn test_orders_are_permutations(order in arb_insertion_order(32)) {
            let mut sorted = order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..order.len() as u32).collect::<Vec<_>>());
        }
    }
}
