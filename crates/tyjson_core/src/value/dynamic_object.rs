use crate::value::{Object, TypedValue};
use crate::{ConvertError, Ctor};

// -----------------------------------------------------------------------------
// DynamicObject

/// A map-backed [`Object`] standing in for any class.
///
/// Useful when the classes only exist as registry entries. The class identity
/// is still a Rust type, usually an empty marker struct.
///
/// Fields keep insertion order; every key is accepted by
/// [`set_field`](Object::set_field).
///
/// # Examples
///
/// ```
/// use tyjson_core::{Ctor, DynamicObject, Object, TypedValue};
///
/// struct Invoice;
///
/// let invoice = DynamicObject::of::<Invoice>()
///     .with("number", "A-17")
///     .with("total", 99.5);
///
/// assert_eq!(invoice.ctor(), Ctor::of::<Invoice>());
/// assert_eq!(invoice.field("total"), Some(TypedValue::Number(99.5)));
/// assert_eq!(invoice.field("missing"), None);
/// ```
#[derive(Clone, Debug)]
pub struct DynamicObject {
    ctor: Ctor,
    fields: Vec<(String, TypedValue)>,
}

impl DynamicObject {
    /// Creates an empty instance of the class `ctor`.
    #[inline]
    pub const fn new(ctor: Ctor) -> Self {
        Self {
            ctor,
            fields: Vec::new(),
        }
    }

    /// Creates an empty instance of the class represented by `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(Ctor::of::<T>())
    }

    /// Builder form of [`insert`](Self::insert).
    #[inline]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TypedValue>) -> Option<TypedValue> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<TypedValue> {
        let index = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(index).1)
    }

    /// Iterates the fields in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &TypedValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Object for DynamicObject {
    #[inline]
    fn ctor(&self) -> Ctor {
        self.ctor
    }

    fn field(&self, key: &str) -> Option<TypedValue> {
        self.get(key).cloned()
    }

    fn set_field(&mut self, key: &str, value: TypedValue) -> Result<(), ConvertError> {
        self.insert(key, value);
        Ok(())
    }

    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    /// Same class and the same set of fields, regardless of order.
    fn object_eq(&self, other: &dyn Object) -> bool {
        let Some(other) = other.downcast_ref::<Self>() else {
            return false;
        };
        self.ctor == other.ctor
            && self.len() == other.len()
            && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl PartialEq for DynamicObject {
    fn eq(&self, other: &Self) -> bool {
        self.object_eq(other)
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicObject;
    use crate::TypedValue;

    struct Marker;

    #[test]
    fn insert_overwrites_in_place() {
        let mut object = DynamicObject::of::<Marker>().with("a", 1).with("b", 2);
        assert_eq!(object.insert("a", 3), Some(TypedValue::Number(1.0)));
        let keys: Vec<_> = object.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn order_insensitive_equality() {
        let a = DynamicObject::of::<Marker>().with("a", 1).with("b", true);
        let b = DynamicObject::of::<Marker>().with("b", true).with("a", 1);
        assert_eq!(a, b);
        assert_ne!(a, DynamicObject::of::<Marker>().with("a", 1));
    }
}
