use alloc::string::String;
use core::fmt;

use indexmap::IndexMap;
use vc_utils::hash::FixedHashState;

use crate::value::Value;

// -----------------------------------------------------------------------------
// Mapping

/// An insertion-ordered map from string keys to [`Value`]s.
///
/// This is the output of serialization and the input of deserialization.
///
/// # Examples
///
/// ```
/// use vc_dto::value::{Mapping, Value};
///
/// let mut map = Mapping::new();
/// map.insert("name", "Alice");
/// map.insert("age", 30);
///
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["name", "age"]);
/// assert_eq!(map.get("age"), Some(&Value::Int(30)));
/// assert!(!map.is_list());
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct Mapping(IndexMap<String, Value, FixedHashState>);

impl Mapping {
    /// Creates an empty mapping.
    #[inline]
    pub fn new() -> Self {
        Self(IndexMap::with_hasher(FixedHashState))
    }

    /// Creates an empty mapping with at least the given capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity_and_hasher(capacity, FixedHashState))
    }

    /// Builds a list-shaped mapping, keyed `"0".."n-1"`.
    pub fn from_list(items: impl IntoIterator<Item = Value>) -> Self {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect()
    }

    /// Inserts a value, keeping the position of an existing key.
    ///
    /// Returns the previous value, if any.
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the mapping is non-empty and its keys are exactly
    /// `"0", "1", .., "n-1"` in this order.
    ///
    /// Anything else, including an empty mapping, is struct-like.
    pub fn is_list(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .keys()
                .enumerate()
                .all(|(index, key)| is_index_key(key, index))
    }

    /// Iterates over the keys in insertion order.
    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over the values in insertion order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.0.values()
    }

    /// Iterates over the entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

// The canonical decimal spelling of `index`, no sign and no leading zeros.
fn is_index_key(key: &str, index: usize) -> bool {
    let bytes = key.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return false;
    }
    bytes.iter().all(u8::is_ascii_digit) && key.parse::<usize>() == Ok(index)
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Mapping {
    #[inline]
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
