use core::any::TypeId;
use core::fmt;

use crate::hash::FixedHashState;
use crate::hash::hashbrown::HashMap;

// -----------------------------------------------------------------------------
// TypeIdMap

/// Values keyed by [`TypeId`].
///
/// Class descriptors and resolved type names are both looked up by the
/// `TypeId` of the Rust type standing in for a class. A `TypeId` is already a
/// well distributed hash, so the fixed hasher is enough.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use tyjson_utils::TypeIdMap;
///
/// let mut names = TypeIdMap::new();
/// names.insert(TypeId::of::<u8>(), "byte");
///
/// *names.get_or_insert(TypeId::of::<u8>(), || "unused") = "octet";
/// assert_eq!(names.get(&TypeId::of::<u8>()), Some(&"octet"));
/// assert!(!names.contains(&TypeId::of::<u16>()));
/// ```
pub struct TypeIdMap<V> {
    inner: HashMap<TypeId, V, FixedHashState>,
}

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            inner: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Returns the value for `id`, creating it with `make` first if absent.
    pub fn get_or_insert(&mut self, id: TypeId, make: impl FnOnce() -> V) -> &mut V {
        self.inner.entry(id).or_insert_with(make)
    }

    #[inline]
    pub fn get(&self, id: &TypeId) -> Option<&V> {
        self.inner.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: &TypeId) -> Option<&mut V> {
        self.inner.get_mut(id)
    }

    /// Inserts `value`, returning the one it replaced.
    #[inline]
    pub fn insert(&mut self, id: TypeId, value: V) -> Option<V> {
        self.inner.insert(id, value)
    }

    #[inline]
    pub fn contains(&self, id: &TypeId) -> bool {
        self.inner.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
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
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}
