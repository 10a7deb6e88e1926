//! # Insertion-Ordered ``{ piece -> V }`` Map

use core::{fmt, marker::PhantomData};

use compact_str::CompactString;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::types::{WLHashMap, WLHashSet, hash_map_with_capacity};

/// A map of ``{ piece -> V }`` which iterates in insertion order.
///
/// Insertion order is load-bearing: it fixes model ids,
/// and breaks ties when pruning by probability.
///
/// Serializes as a map, in insertion order.
#[derive(Debug, Clone)]
pub struct PieceMap<V> {
    entries: Vec<(CompactString, V)>,
    index: WLHashMap<CompactString, usize>,
}

impl<V> Default for PieceMap<V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<V: PartialEq> PartialEq for PieceMap<V> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.entries == other.entries
    }
}

impl<V> PieceMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: hash_map_with_capacity(capacity),
        }
    }

    /// The number of pieces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the map empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Does the map contain `piece`?
    pub fn contains(
        &self,
        piece: &str,
    ) -> bool {
        self.index.contains_key(piece)
    }

    /// The insertion position of `piece`.
    pub fn position(
        &self,
        piece: &str,
    ) -> Option<usize> {
        self.index.get(piece).copied()
    }

    /// Look up the value for `piece`.
    pub fn get(
        &self,
        piece: &str,
    ) -> Option<&V> {
        self.position(piece).map(|idx| &self.entries[idx].1)
    }

    /// The entry at an insertion position.
    pub fn get_index(
        &self,
        idx: usize,
    ) -> Option<(&str, &V)> {
        self.entries.get(idx).map(|(k, v)| (k.as_str(), v))
    }

    /// Insert a value.
    ///
    /// Replacing an existing piece keeps its position.
    ///
    /// ## Returns
    /// The previous value, if any.
    pub fn insert<K: Into<CompactString>>(
        &mut self,
        piece: K,
        value: V,
    ) -> Option<V> {
        let piece = piece.into();
        match self.index.get(&piece) {
            Some(&idx) => Some(core::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.index.insert(piece.clone(), self.entries.len());
                self.entries.push((piece, value));
                None
            }
        }
    }

    /// Get a mutable value for `piece`, appending `default` if absent.
    pub fn get_or_insert(
        &mut self,
        piece: &str,
        default: V,
    ) -> &mut V {
        let idx = match self.index.get(piece) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.index.insert(piece.into(), idx);
                self.entries.push((piece.into(), default));
                idx
            }
        };
        &mut self.entries[idx].1
    }

    /// Iterate over ``(piece, value)`` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over pieces in insertion order.
    pub fn pieces(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Mutably iterate over values in insertion order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    /// Build a new map without the pieces in `removed`.
    ///
    /// Survivors keep their relative order.
    pub fn without(
        self,
        removed: &WLHashSet<CompactString>,
    ) -> Self {
        self.entries
            .into_iter()
            .filter(|(k, _)| !removed.contains(k))
            .collect()
    }

    /// Map values, preserving order.
    pub fn map_values<U, F>(
        self,
        mut f: F,
    ) -> PieceMap<U>
    where
        F: FnMut(&str, V) -> U,
    {
        let PieceMap { entries, index } = self;
        let entries = entries
            .into_iter()
            .map(|(k, v)| {
                let u = f(k.as_str(), v);
                (k, u)
            })
            .collect();
        PieceMap { entries, index }
    }
}

impl<K: Into<CompactString>, V> FromIterator<(K, V)> for PieceMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for PieceMap<V> {
    type Item = (CompactString, V);
    type IntoIter = std::vec::IntoIter<(CompactString, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for PieceMap<V> {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct PieceMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for PieceMapVisitor<V> {
    type Value = PieceMap<V>;

    fn expecting(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        formatter.write_str("a map of pieces")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> Result<Self::Value, A::Error> {
        let mut map = PieceMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<CompactString, V>()? {
            map.insert(k, v);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for PieceMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PieceMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order() {
        let mut map: PieceMap<u32> = PieceMap::new();
        assert!(map.is_empty());

        assert_eq!(map.insert("zebra", 1), None);
        assert_eq!(map.insert("apple", 2), None);
        assert_eq!(map.insert("mango", 3), None);
        assert_eq!(map.insert("apple", 20), Some(2));

        assert_eq!(map.len(), 3);
        assert_eq!(map.pieces().collect::<Vec<_>>(), vec!["zebra", "apple", "mango"]);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![1, 20, 3]);

        assert_eq!(map.position("mango"), Some(2));
        assert_eq!(map.get_index(1), Some(("apple", &20)));
        assert_eq!(map.get("pear"), None);
        assert!(map.contains("zebra"));
    }

    #[test]
    fn test_get_or_insert() {
        let mut map: PieceMap<f64> = PieceMap::new();
        *map.get_or_insert("b", 0.0) += 1.5;
        *map.get_or_insert("a", 0.0) += 1.0;
        *map.get_or_insert("b", 0.0) += 1.5;

        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("b", &3.0), ("a", &1.0)]);

        for v in map.values_mut() {
            *v *= 2.0;
        }
        assert_eq!(map.get("b"), Some(&6.0));
    }

    #[test]
    fn test_without() {
        let map: PieceMap<u32> = [("a", 1), ("b", 2), ("c", 3), ("d", 4)].into_iter().collect();

        let removed: WLHashSet<CompactString> = ["b", "d"].into_iter().map(Into::into).collect();
        let map = map.without(&removed);

        assert_eq!(map.pieces().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(map.position("c"), Some(1));
        assert!(!map.contains("b"));
    }

    #[test]
    fn test_map_values() {
        let map: PieceMap<u32> = [("a", 1), ("b", 2)].into_iter().collect();
        let map = map.map_values(|piece, v| format!("{piece}{v}"));
        assert_eq!(map.get("b").map(String::as_str), Some("b2"));
        assert_eq!(map.position("b"), Some(1));
    }

    #[test]
    fn test_serde_keeps_order() {
        let map: PieceMap<u32> = [("zz", 1), ("aa", 2), ("mm", 3)].into_iter().collect();

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zz":1,"aa":2,"mm":3}"#);

        let loaded: PieceMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, map);
        assert_eq!(loaded.pieces().collect::<Vec<_>>(), vec!["zz", "aa", "mm"]);
    }
}
