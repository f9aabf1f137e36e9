//! `serde` support: a map serializes as a map in key order.

use super::compare::Comparator;
use super::map::ThreadedMap;
use super::node::Node;
use crate::alloc::NodeAlloc;
use core::fmt;
use core::marker::PhantomData;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl<K, V, C, A> Serialize for ThreadedMap<K, V, C, A>
where
    K: Serialize,
    V: Serialize,
    A: NodeAlloc<Node<K, V>>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

struct MapVisitor<K, V, C, A> {
    _marker: PhantomData<fn() -> ThreadedMap<K, V, C, A>>,
}

impl<'de, K, V, C, A> Visitor<'de> for MapVisitor<K, V, C, A>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
    A: NodeAlloc<Node<K, V>> + Default,
{
    type Value = ThreadedMap<K, V, C, A>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut map = ThreadedMap::new_in(A::default());
        // Duplicate keys keep the first value, as `insert` does.
        while let Some((key, value)) = access.next_entry()? {
            map.try_insert(key, value).map_err(de::Error::custom)?;
        }
        Ok(map)
    }
}

impl<'de, K, V, C, A> Deserialize<'de> for ThreadedMap<K, V, C, A>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
    A: NodeAlloc<Node<K, V>> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapVisitor { _marker: PhantomData })
    }
}

#[cfg(test)]
mod tests {
    use crate::collections::tree::{ReverseOrder, ThreadedMap};

    #[test]
    fn test_json_is_in_key_order() {
        let map: ThreadedMap<String, i32> = [("b", 2), ("a", 1), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (String::from(k), v))
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a":1,"b":2,"c":3}"#);

        let back: ThreadedMap<String, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
        back.check_invariants().unwrap();
    }

    #[test]
    fn test_deserialize_with_comparator() {
        let map: ThreadedMap<u8, bool, ReverseOrder> = serde_json::from_str(r#"{"1":true,"3":false,"2":true}"#).unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let map: ThreadedMap<String, i32> = serde_json::from_str(r#"{"k":1,"k":2}"#).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["k"], 1);
    }
}
