/*!
The canonical map type and its owning iterator.
*/

use super::value::Error;
use super::*;
use alloc::collections::{BTreeMap, btree_map};
use alloc::vec::Vec;

// The canonical encoding of a key. Byte vectors order lexicographically,
// shorter first on a common prefix, which is exactly the dCBOR key order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct MapKey(Vec<u8>);

/// A dCBOR map, kept in canonical key order.
///
/// Keys are unique by canonical encoding, so inserting a key that encodes
/// the same as an existing one fails rather than replacing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Map(BTreeMap<MapKey, (Value, Value)>);

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<(), Error>
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        let key = key.into();
        let encoded = MapKey(encode(&key));
        if self.0.contains_key(&encoded) {
            return Err(Error::DuplicateMapKey);
        }
        self.0.insert(encoded, (key, value.into()));
        Ok(())
    }

    /// Insert an entry whose key encoding the decoder has already checked for
    /// order and uniqueness.
    pub(crate) fn insert_canonical(&mut self, encoded_key: Vec<u8>, key: Value, value: Value) {
        self.0.insert(MapKey(encoded_key), (key, value));
    }

    pub fn get<K>(&self, key: K) -> Option<&Value>
    where
        K: Into<Value>,
    {
        self.0
            .get(&MapKey(encode(&key.into())))
            .map(|(_, value)| value)
    }

    pub fn contains_key<K>(&self, key: K) -> bool
    where
        K: Into<Value>,
    {
        self.get(key).is_some()
    }

    /// Look up `key` and convert the value found.
    pub fn extract<K, T>(&self, key: K) -> Result<T, Error>
    where
        K: Into<Value>,
        T: TryFrom<Value, Error = Error>,
    {
        self.get(key).cloned().ok_or(Error::MissingKey)?.try_into()
    }

    /// Entries in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.values().map(|(key, value)| (key, value))
    }

    /// Entries in canonical key order, with each key's encoding.
    pub(crate) fn encoded_entries(&self) -> impl Iterator<Item = (&[u8], &Value)> {
        self.0
            .iter()
            .map(|(encoded, (_, value))| (encoded.0.as_slice(), value))
    }

    /// Build a map from key/value pairs, failing on the first duplicate key.
    pub fn try_from_iter<I, K, V>(iter: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value)?;
        }
        Ok(map)
    }
}

/// An owning iterator over the entries of a [`Map`], in canonical key order.
#[derive(Debug)]
pub struct IntoIter(btree_map::IntoValues<MapKey, (Value, Value)>);

impl Iterator for IntoIter {
    type Item = (Value, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl ExactSizeIterator for IntoIter {}

impl IntoIterator for Map {
    type Item = (Value, Value);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.0.into_values())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;

    #[test]
    fn canonical_order() {
        let mut m = Map::new();
        m.insert("aa", 3).unwrap();
        m.insert(100, 2).unwrap();
        m.insert("b", 4).unwrap();
        m.insert(-1, 5).unwrap();
        m.insert(10, 1).unwrap();
        m.insert(false, 6).unwrap();

        let keys: Vec<_> = m.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![
                Value::from(10),
                Value::from(100),
                Value::from(-1),
                Value::from("b"),
                Value::from("aa"),
                Value::FALSE,
            ]
        );
    }

    #[test]
    fn duplicate_keys() {
        let mut m = Map::new();
        m.insert(1, "one").unwrap();
        assert_eq!(m.insert(1u8, "uno"), Err(Error::DuplicateMapKey));
        // A float key that is integral becomes the same integer key
        assert_eq!(m.insert(1.0, "ein"), Err(Error::DuplicateMapKey));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(1), Some(&Value::from("one")));

        assert_eq!(
            Map::try_from_iter([("a", 1), ("b", 2), ("a", 3)]),
            Err(Error::DuplicateMapKey)
        );
    }

    #[test]
    fn extract() {
        let m = Map::try_from_iter([("a", 1), ("b", 2)]).unwrap();
        assert_eq!(m.extract::<_, i32>("a"), Ok(1));
        assert_eq!(m.extract::<_, u8>("b"), Ok(2));
        assert_eq!(m.extract::<_, i32>("c"), Err(Error::MissingKey));
        assert!(m.contains_key("b"));
        assert!(!m.contains_key("c"));
    }

    #[test]
    fn into_iter() {
        let m = Map::try_from_iter([("b", 2), ("a", 1), ("c", 3)]).unwrap();
        let mut iter = m.into_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some((Value::from("a"), Value::from(1))));
        assert_eq!(iter.next_back(), Some((Value::from("c"), Value::from(3))));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next(), Some((Value::from("b"), Value::from(2))));
        assert_eq!(iter.next(), None);
    }
}
