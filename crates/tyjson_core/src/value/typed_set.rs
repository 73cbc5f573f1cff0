use core::fmt;

use crate::value::TypedValue;
use crate::value::key_index::KeyIndex;

// -----------------------------------------------------------------------------
// TypedSet

/// An insertion-ordered set of [`TypedValue`]s.
///
/// Scalars are deduplicated by value (`NaN` equals `NaN`, `0.0` equals
/// `-0.0`). Objects and containers are compared by identity and never
/// collapse, so every inserted one is kept.
///
/// Re-inserting an equal value replaces the stored one.
///
/// # Examples
///
/// ```
/// use tyjson_core::{TypedSet, TypedValue};
///
/// let mut set = TypedSet::new();
/// assert!(set.insert(1.into()));
/// assert!(set.insert("a".into()));
/// assert!(!set.insert(1.into()));
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(&TypedValue::from("a")));
/// ```
#[derive(Clone, Default)]
pub struct TypedSet {
    values: Vec<TypedValue>,
    index: KeyIndex,
}

impl TypedSet {
    #[inline]
    pub const fn new() -> Self {
        Self {
            values: Vec::new(),
            index: KeyIndex::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            index: KeyIndex::with_capacity(capacity),
        }
    }

    fn position(&self, value: &TypedValue) -> Option<usize> {
        self.index.find(value, |i| &self.values[i])
    }

    /// Adds a value, returning `false` if an equal one was already present.
    ///
    /// The stored value is replaced in that case.
    pub fn insert(&mut self, value: TypedValue) -> bool {
        match self.position(&value) {
            Some(index) => {
                self.values[index] = value;
                false
            }
            None => {
                self.index.insert(&value, self.values.len());
                self.values.push(value);
                true
            }
        }
    }

    pub fn contains(&self, value: &TypedValue) -> bool {
        self.position(value).is_some()
    }

    /// Removes a value by value equality.
    pub fn remove(&mut self, value: &TypedValue) -> Option<TypedValue> {
        let index = self.position(value)?;
        let removed = self.values.remove(index);
        self.index.rebuild(self.values.iter());
        Some(removed)
    }

    /// Iterates in insertion order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, TypedValue> {
        self.values.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the values in insertion order.
    #[inline]
    pub fn into_vec(self) -> Vec<TypedValue> {
        self.values
    }
}

/// Equal sizes and every member of one found in the other.
///
/// Identity-compared members fall back to structural equality here, so two
/// clones of a set compare equal.
impl PartialEq for TypedSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|value| other.contains(value) || other.iter().any(|o| o == value))
    }
}

impl fmt::Debug for TypedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.iter()).finish()
    }
}

impl Extend<TypedValue> for TypedSet {
    fn extend<I: IntoIterator<Item = TypedValue>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl FromIterator<TypedValue> for TypedSet {
    fn from_iter<I: IntoIterator<Item = TypedValue>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for TypedSet {
    type Item = TypedValue;
    type IntoIter = std::vec::IntoIter<TypedValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a TypedSet {
    type Item = &'a TypedValue;
    type IntoIter = core::slice::Iter<'a, TypedValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::TypedSet;
    use crate::{DynamicObject, TypedValue};

    struct Marker;

    #[test]
    fn scalars_collapse_objects_do_not() {
        let object = TypedValue::object(DynamicObject::of::<Marker>());
        let set: TypedSet = [
            TypedValue::from(1),
            TypedValue::from(1.0),
            object.clone(),
            object,
            TypedValue::from(-0.0),
            TypedValue::from(0),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn remove_keeps_order() {
        let mut set: TypedSet = ["a", "b", "c"].into_iter().map(TypedValue::from).collect();
        assert_eq!(set.remove(&"b".into()), Some("b".into()));
        assert!(set.contains(&"c".into()));
        let rest: Vec<_> = set.iter().filter_map(TypedValue::as_str).collect();
        assert_eq!(rest, ["a", "c"]);
    }

    #[test]
    fn order_insensitive_equality() {
        let a: TypedSet = [1, 2, 3].into_iter().map(TypedValue::from).collect();
        let b: TypedSet = [3, 1, 2].into_iter().map(TypedValue::from).collect();
        assert_eq!(a, b);
        assert_eq!(a, a.clone());
    }
}
