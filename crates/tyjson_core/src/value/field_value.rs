use time::OffsetDateTime;

use crate::value::{Object, RegExp, TypedMap, TypedSet, TypedValue};
use crate::{ConvertError, ScalarKind};

// -----------------------------------------------------------------------------
// FieldValue

/// Conversion between a Rust field type and [`TypedValue`].
///
/// `to_typed` returns `None` when the field is unset; only `Option<T>` (or a
/// type with its own notion of "unset") does that.
///
/// # Examples
///
/// ```
/// use tyjson_core::{FieldValue, TypedValue};
///
/// let unset: Option<u32> = None;
/// assert_eq!(unset.to_typed(), None);
/// assert_eq!(Some(7_u32).to_typed(), Some(TypedValue::Number(7.0)));
///
/// let back: Option<u32> = FieldValue::from_typed(TypedValue::Number(7.0)).unwrap();
/// assert_eq!(back, Some(7));
/// assert!(<u32 as FieldValue>::from_typed(TypedValue::Number(-1.0)).is_err());
/// ```
pub trait FieldValue: Sized {
    fn to_typed(&self) -> Option<TypedValue>;

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError>;
}

#[inline]
fn mismatch(expected: &str, found: &TypedValue) -> ConvertError {
    ConvertError::shape_mismatch(expected, found.kind_name())
}

// -----------------------------------------------------------------------------
// Scalars

impl FieldValue for TypedValue {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(self.clone())
    }

    #[inline]
    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        Ok(value)
    }
}

impl FieldValue for bool {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::Boolean(*self))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::Boolean(b) => Ok(b),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl FieldValue for f64 {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::Number(*self))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::Number(n) => Ok(n),
            other => Err(mismatch("number", &other)),
        }
    }
}

impl FieldValue for f32 {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::Number(f64::from(*self)))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::Number(n) => Ok(n as f32),
            other => Err(mismatch("number", &other)),
        }
    }
}

macro_rules! impl_integer_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                #[inline]
                fn to_typed(&self) -> Option<TypedValue> {
                    Some(TypedValue::Number(*self as f64))
                }

                fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
                    match value {
                        TypedValue::Number(n)
                            if n.fract() == 0.0 && n >= <$ty>::MIN as f64 && n <= <$ty>::MAX as f64 =>
                        {
                            Ok(n as $ty)
                        }
                        TypedValue::Number(n) => Err(ConvertError::invalid_scalar(
                            ScalarKind::Number,
                            format!("{n} does not fit `{}`", ::core::stringify!($ty)),
                        )),
                        other => Err(mismatch("number", &other)),
                    }
                }
            }
        )*
    };
}

impl_integer_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FieldValue for String {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::String(self.clone()))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::String(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl FieldValue for OffsetDateTime {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::Date(*self))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::Date(d) => Ok(d),
            other => Err(mismatch("date", &other)),
        }
    }
}

impl FieldValue for RegExp {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::RegExp(self.clone()))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::RegExp(r) => Ok(r),
            other => Err(mismatch("regexp", &other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Objects and containers

impl FieldValue for Box<dyn Object> {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::Object(self.clone()))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::Object(o) => Ok(o),
            other => Err(mismatch("object", &other)),
        }
    }
}

impl FieldValue for TypedSet {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::Set(self.clone()))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::Set(s) => Ok(s),
            other => Err(mismatch("set", &other)),
        }
    }
}

impl FieldValue for TypedMap {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::Map(self.clone()))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::Map(m) => Ok(m),
            other => Err(mismatch("map", &other)),
        }
    }
}

/// Unset elements are written as `Null`.
impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_typed(&self) -> Option<TypedValue> {
        Some(TypedValue::Array(
            self.iter()
                .map(|item| item.to_typed().unwrap_or(TypedValue::Null))
                .collect(),
        ))
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::Array(items) => items.into_iter().map(T::from_typed).collect(),
            other => Err(mismatch("array", &other)),
        }
    }
}

/// `None` is unset; `Null` converts back to `None`.
impl<T: FieldValue> FieldValue for Option<T> {
    #[inline]
    fn to_typed(&self) -> Option<TypedValue> {
        self.as_ref().and_then(T::to_typed)
    }

    fn from_typed(value: TypedValue) -> Result<Self, ConvertError> {
        match value {
            TypedValue::Null => Ok(None),
            other => T::from_typed(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FieldValue;
    use crate::{ErrorKind, TypedValue};

    #[test]
    fn integers_reject_fractions() {
        let err = <i32 as FieldValue>::from_typed(TypedValue::Number(1.5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidScalar);
        assert_eq!(<i32 as FieldValue>::from_typed(TypedValue::Number(-4.0)).unwrap(), -4);
    }

    #[test]
    fn nested_vectors() {
        let grid = vec![vec![1_u8, 2], vec![3]];
        let typed = grid.to_typed().unwrap();
        let back: Vec<Vec<u8>> = FieldValue::from_typed(typed).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn shape_errors() {
        let err = <String as FieldValue>::from_typed(TypedValue::Boolean(true)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeShapeMismatch);
    }
}
