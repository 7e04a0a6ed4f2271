use core::any::TypeId;
use core::fmt::Debug;

use crate::hash::NoOpHashMap;
use crate::hash::hashbrown::hash_map::Entry;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map with [`TypeId`] as the fixed key type.
///
/// No `HashMap` specific API is exposed, so the backing storage can change
/// without breaking callers.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use vc_utils::TypeIdMap;
///
/// let mut map = TypeIdMap::new();
/// assert!(map.try_insert(TypeId::of::<u8>(), || "u8"));
/// assert!(!map.try_insert(TypeId::of::<u8>(), || "again"));
/// assert_eq!(map.get_type::<u8>(), Some(&"u8"));
/// ```
pub struct TypeIdMap<V>(NoOpHashMap<TypeId, V>);

impl<V> TypeIdMap<V> {
    /// Creates an empty `TypeIdMap`.
    #[inline]
    pub const fn new() -> Self {
        Self(NoOpHashMap::with_hasher(crate::hash::NoOpHashState))
    }

    /// Inserts the value produced by `f` if `type_id` is absent.
    ///
    /// Returns `false`, leaving the map unchanged, when the key already exists.
    #[inline]
    pub fn try_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> bool {
        match self.0.entry(type_id) {
            Entry::Vacant(entry) => {
                entry.insert(f());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Returns the value for `type_id`, inserting the result of `f` first if absent.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        self.0.entry(type_id).or_insert_with(f)
    }

    /// Returns a reference to the value corresponding to the type.
    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    /// Returns a reference to the value corresponding to `T`.
    #[inline(always)]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    /// Inserts a key-value pair, returning the previous value.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, v: V) -> Option<V> {
        self.0.insert(type_id, v)
    }

    /// Removes a key, returning its value if it was present.
    #[inline]
    pub fn remove(&mut self, type_id: &TypeId) -> Option<V> {
        self.0.remove(type_id)
    }

    /// Clears the map, keeping the allocated memory.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns `true` if the map contains the key.
    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all values in arbitrary order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.0.values()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for TypeIdMap<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V: Debug> Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::TypeIdMap;
    use core::any::TypeId;

    #[test]
    fn insert_and_remove() {
        let mut map = TypeIdMap::new();
        assert!(map.is_empty());

        map.insert(TypeId::of::<u32>(), 1);
        *map.get_or_insert(TypeId::of::<u32>(), || 7) += 1;
        *map.get_or_insert(TypeId::of::<i8>(), || 7) += 1;

        assert_eq!(map.get_type::<u32>(), Some(&2));
        assert_eq!(map.get_type::<i8>(), Some(&8));
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(&TypeId::of::<u32>()), Some(2));
        assert!(!map.contains(&TypeId::of::<u32>()));

        map.clear();
        assert!(map.is_empty());
    }
}
