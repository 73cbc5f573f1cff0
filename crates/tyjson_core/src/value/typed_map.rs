use core::fmt;

use crate::value::TypedValue;
use crate::value::key_index::KeyIndex;

// -----------------------------------------------------------------------------
// TypedMap

/// An insertion-ordered map from [`TypedValue`] keys to values.
///
/// Keys follow the same equality as [`TypedSet`](crate::TypedSet) members:
/// scalars by value, objects and containers by identity.
///
/// # Examples
///
/// ```
/// use tyjson_core::{TypedMap, TypedValue};
///
/// let mut map = TypedMap::new();
/// assert_eq!(map.insert("a".into(), 1.into()), None);
/// assert_eq!(map.insert("a".into(), 2.into()), Some(TypedValue::Number(1.0)));
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get(&"a".into()), Some(&TypedValue::Number(2.0)));
/// ```
#[derive(Clone, Default)]
pub struct TypedMap {
    entries: Vec<(TypedValue, TypedValue)>,
    index: KeyIndex,
}

impl TypedMap {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: KeyIndex::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: KeyIndex::with_capacity(capacity),
        }
    }

    fn position(&self, key: &TypedValue) -> Option<usize> {
        self.index.find(key, |i| &self.entries[i].0)
    }

    /// Inserts an entry, returning the previous value of an equal key.
    ///
    /// An existing entry keeps its position.
    pub fn insert(&mut self, key: TypedValue, value: TypedValue) -> Option<TypedValue> {
        match self.position(&key) {
            Some(index) => Some(core::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.index.insert(&key, self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &TypedValue) -> Option<&TypedValue> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    pub fn get_mut(&mut self, key: &TypedValue) -> Option<&mut TypedValue> {
        let index = self.position(key)?;
        Some(&mut self.entries[index].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &TypedValue) -> bool {
        self.position(key).is_some()
    }

    pub fn remove(&mut self, key: &TypedValue) -> Option<TypedValue> {
        let index = self.position(key)?;
        let (_, value) = self.entries.remove(index);
        self.index.rebuild(self.entries.iter().map(|(k, _)| k));
        Some(value)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&TypedValue, &TypedValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &TypedValue> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &TypedValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Equal sizes and every entry of one found in the other.
impl PartialEq for TypedMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, value)| match other.get(key) {
                Some(found) => found == value,
                None => other.iter().any(|(k, v)| k == key && v == value),
            })
    }
}

impl fmt::Debug for TypedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Extend<(TypedValue, TypedValue)> for TypedMap {
    fn extend<I: IntoIterator<Item = (TypedValue, TypedValue)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl FromIterator<(TypedValue, TypedValue)> for TypedMap {
    fn from_iter<I: IntoIterator<Item = (TypedValue, TypedValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl IntoIterator for TypedMap {
    type Item = (TypedValue, TypedValue);
    type IntoIter = std::vec::IntoIter<(TypedValue, TypedValue)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
