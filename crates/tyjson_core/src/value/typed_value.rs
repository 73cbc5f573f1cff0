use core::hash::{Hash, Hasher};

use time::OffsetDateTime;
use tyjson_utils::hash::FixedHashState;

use crate::value::{Object, RegExp, TypedMap, TypedSet};

// -----------------------------------------------------------------------------
// TypedValue

/// A value on the typed side of a conversion.
///
/// Unlike a plain JSON value, a `TypedValue` knows whether it is a date, a
/// set or a map, and an object carries the identity of its class.
///
/// An *absent* value ("undefined") is expressed as `Option::None` by the APIs
/// that can produce or accept one; `Null` is an explicit JSON `null`.
///
/// # Examples
///
/// ```
/// use tyjson_core::{TypedSet, TypedValue};
///
/// let value: TypedValue = [1.0, 2.0, 2.0].into_iter().map(TypedValue::from).collect::<TypedSet>().into();
/// assert_eq!(value.kind_name(), "set");
/// assert_eq!(value.as_set().map(TypedSet::len), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Date(OffsetDateTime),
    RegExp(RegExp),
    Object(Box<dyn Object>),
    Array(Vec<TypedValue>),
    Set(TypedSet),
    Map(TypedMap),
}

impl TypedValue {
    /// Wraps a class instance.
    #[inline]
    pub fn object(object: impl Object) -> Self {
        Self::Object(Box::new(object))
    }

    /// Returns the lowercase kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::RegExp(_) => "regexp",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn Object> {
        match self {
            Self::Object(o) => Some(&**o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[TypedValue]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&TypedSet> {
        match self {
            Self::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TypedMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Downcasts an object value to a concrete class.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_object()?.downcast_ref::<T>()
    }
}

// -----------------------------------------------------------------------------
// Set/Map key semantics

/// Value equality used for set members and map keys.
///
/// Scalars compare by value (`NaN` equals `NaN`, `0.0` equals `-0.0`).
/// Objects and containers compare by identity, and an owned value has no
/// identity to share, so they never compare equal.
pub(crate) fn same_value(a: &TypedValue, b: &TypedValue) -> bool {
    match (a, b) {
        (TypedValue::Null, TypedValue::Null) => true,
        (TypedValue::Boolean(a), TypedValue::Boolean(b)) => a == b,
        (TypedValue::Number(a), TypedValue::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
        (TypedValue::String(a), TypedValue::String(b)) => a == b,
        (TypedValue::Date(a), TypedValue::Date(b)) => a == b,
        (TypedValue::RegExp(a), TypedValue::RegExp(b)) => a == b,
        _ => false,
    }
}

/// Hash consistent with [`same_value`], `None` for identity-compared values.
pub(crate) fn value_hash(value: &TypedValue) -> Option<u64> {
    use core::hash::BuildHasher;

    let mut hasher = FixedHashState.build_hasher();
    match value {
        TypedValue::Null => 0_u8.hash(&mut hasher),
        TypedValue::Boolean(b) => (1_u8, b).hash(&mut hasher),
        TypedValue::Number(n) => {
            let canonical = if *n == 0.0 {
                0.0_f64
            } else if n.is_nan() {
                f64::NAN
            } else {
                *n
            };
            (2_u8, canonical.to_bits()).hash(&mut hasher);
        }
        TypedValue::String(s) => (3_u8, s).hash(&mut hasher),
        TypedValue::Date(d) => (4_u8, d.unix_timestamp_nanos()).hash(&mut hasher),
        TypedValue::RegExp(r) => (5_u8, r).hash(&mut hasher),
        TypedValue::Object(_) | TypedValue::Array(_) | TypedValue::Set(_) | TypedValue::Map(_) => {
            return None;
        }
    }
    Some(hasher.finish())
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for TypedValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TypedValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl From<String> for TypedValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for TypedValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<OffsetDateTime> for TypedValue {
    #[inline]
    fn from(value: OffsetDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<RegExp> for TypedValue {
    #[inline]
    fn from(value: RegExp) -> Self {
        Self::RegExp(value)
    }
}

impl From<Box<dyn Object>> for TypedValue {
    #[inline]
    fn from(value: Box<dyn Object>) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<TypedValue>> for TypedValue {
    #[inline]
    fn from(value: Vec<TypedValue>) -> Self {
        Self::Array(value)
    }
}

impl From<TypedSet> for TypedValue {
    #[inline]
    fn from(value: TypedSet) -> Self {
        Self::Set(value)
    }
}

impl From<TypedMap> for TypedValue {
    #[inline]
    fn from(value: TypedMap) -> Self {
        Self::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{TypedValue, same_value, value_hash};

    #[test]
    fn zero_and_nan_keys() {
        let pos = TypedValue::Number(0.0);
        let neg = TypedValue::Number(-0.0);
        assert!(same_value(&pos, &neg));
        assert_eq!(value_hash(&pos), value_hash(&neg));

        let nan = TypedValue::Number(f64::NAN);
        assert!(same_value(&nan, &nan.clone()));
        assert_eq!(value_hash(&nan), value_hash(&TypedValue::Number(-f64::NAN)));
    }

    #[test]
    fn containers_have_identity() {
        let a = TypedValue::Array(vec![1.into()]);
        assert!(!same_value(&a, &a.clone()));
        assert!(value_hash(&a).is_none());
        assert_eq!(a, a.clone());
    }
}
