use core::any::Any;
use core::fmt::Debug;

use crate::value::TypedValue;
use crate::{ConvertError, Ctor};

// -----------------------------------------------------------------------------
// AsAny

/// Upcast helpers, implemented for every sized `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// -----------------------------------------------------------------------------
// Object

/// An instance of a registered class.
///
/// The converter never looks at the Rust layout of a class. It reads and
/// writes members by key through [`field`](Object::field) and
/// [`set_field`](Object::set_field), and learns the runtime class through
/// [`ctor`](Object::ctor).
///
/// Most structs implement this trait with [`impl_object!`](crate::impl_object);
/// implement it by hand to run code in [`on_deserialized`](Object::on_deserialized).
///
/// # Examples
///
/// ```
/// use tyjson_core::{ConvertError, Ctor, FieldValue, Object, TypedValue};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Temperature {
///     celsius: Option<f64>,
///     fahrenheit: f64,
/// }
///
/// impl Object for Temperature {
///     fn ctor(&self) -> Ctor {
///         Ctor::of::<Self>()
///     }
///
///     fn field(&self, key: &str) -> Option<TypedValue> {
///         match key {
///             "celsius" => self.celsius.to_typed(),
///             _ => None,
///         }
///     }
///
///     fn set_field(&mut self, key: &str, value: TypedValue) -> Result<(), ConvertError> {
///         match key {
///             "celsius" => self.celsius = FieldValue::from_typed(value)?,
///             _ => return Err(ConvertError::unknown_member(self.ctor(), key)),
///         }
///         Ok(())
///     }
///
///     fn clone_object(&self) -> Box<dyn Object> {
///         Box::new(self.clone())
///     }
///
///     fn object_eq(&self, other: &dyn Object) -> bool {
///         other.downcast_ref::<Self>().is_some_and(|other| other == self)
///     }
///
///     fn on_deserialized(&mut self) {
///         self.fahrenheit = self.celsius.unwrap_or_default() * 1.8 + 32.0;
///     }
/// }
/// ```
pub trait Object: AsAny + Debug + Send + Sync {
    /// Returns the runtime class of this instance.
    fn ctor(&self) -> Ctor;

    /// Returns the value of a member, or `None` if it is unset.
    fn field(&self, key: &str) -> Option<TypedValue>;

    /// Assigns a member.
    fn set_field(&mut self, key: &str, value: TypedValue) -> Result<(), ConvertError>;

    /// Clones this instance behind a new box.
    fn clone_object(&self) -> Box<dyn Object>;

    /// Compares two instances, `false` for different classes.
    fn object_eq(&self, other: &dyn Object) -> bool;

    /// Called once after deserialization assigned every member it could.
    fn on_deserialized(&mut self) {}
}

impl dyn Object {
    /// Returns `true` if the concrete type is `T`.
    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Converts a boxed object into its concrete type.
    ///
    /// Returns the box unchanged if the concrete type is not `T`.
    pub fn downcast<T: Object>(self: Box<Self>) -> Result<Box<T>, Box<dyn Object>> {
        if self.is::<T>() {
            match self.into_any().downcast::<T>() {
                Ok(concrete) => Ok(concrete),
                // `is` has checked the concrete type.
                Err(_) => unreachable!(),
            }
        } else {
            Err(self)
        }
    }
}

impl Clone for Box<dyn Object> {
    #[inline]
    fn clone(&self) -> Self {
        self.clone_object()
    }
}

impl PartialEq for dyn Object {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.object_eq(other)
    }
}

// -----------------------------------------------------------------------------
// impl_object

/// Implements [`Object`] and [`FieldValue`] for a struct.
///
/// Every listed field becomes a member whose key is the field name. The
/// field types must implement [`FieldValue`]; use `Option<T>` for members
/// that may be unset. The struct must implement `Clone` and `PartialEq`.
///
/// # Examples
///
/// ```
/// use tyjson_core::{Object, TypedValue, impl_object};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct User {
///     name: Option<String>,
///     tags: Vec<String>,
/// }
///
/// impl_object!(User { name, tags });
///
/// let mut user = User::default();
/// user.set_field("name", TypedValue::from("ada")).unwrap();
/// assert_eq!(user.name.as_deref(), Some("ada"));
/// assert!(user.set_field("age", TypedValue::from(36)).is_err());
/// ```
///
/// [`FieldValue`]: crate::FieldValue
#[macro_export]
macro_rules! impl_object {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Object for $ty {
            fn ctor(&self) -> $crate::Ctor {
                $crate::Ctor::of::<$ty>()
            }

            #[allow(unused_variables)]
            fn field(&self, key: &str) -> ::core::option::Option<$crate::TypedValue> {
                $(
                    if key == ::core::stringify!($field) {
                        return $crate::FieldValue::to_typed(&self.$field);
                    }
                )*
                ::core::option::Option::None
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                key: &str,
                value: $crate::TypedValue,
            ) -> ::core::result::Result<(), $crate::ConvertError> {
                $(
                    if key == ::core::stringify!($field) {
                        self.$field = $crate::FieldValue::from_typed(value)?;
                        return ::core::result::Result::Ok(());
                    }
                )*
                ::core::result::Result::Err($crate::ConvertError::unknown_member(
                    $crate::Ctor::of::<$ty>(),
                    key,
                ))
            }

            fn clone_object(&self) -> ::std::boxed::Box<dyn $crate::Object> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn object_eq(&self, other: &dyn $crate::Object) -> bool {
                other
                    .downcast_ref::<$ty>()
                    .is_some_and(|other| ::core::cmp::PartialEq::eq(other, self))
            }
        }

        impl $crate::FieldValue for $ty {
            fn to_typed(&self) -> ::core::option::Option<$crate::TypedValue> {
                ::core::option::Option::Some($crate::TypedValue::Object(::std::boxed::Box::new(
                    ::core::clone::Clone::clone(self),
                )))
            }

            fn from_typed(
                value: $crate::TypedValue,
            ) -> ::core::result::Result<Self, $crate::ConvertError> {
                match value {
                    $crate::TypedValue::Object(object) => match object.downcast::<$ty>() {
                        ::core::result::Result::Ok(concrete) => ::core::result::Result::Ok(*concrete),
                        ::core::result::Result::Err(other) => ::core::result::Result::Err(
                            $crate::ConvertError::shape_mismatch(
                                $crate::Ctor::of::<$ty>().name(),
                                other.ctor().name(),
                            ),
                        ),
                    },
                    other => ::core::result::Result::Err($crate::ConvertError::shape_mismatch(
                        $crate::Ctor::of::<$ty>().name(),
                        other.kind_name(),
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{Ctor, Object, TypedValue};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Leaf {
        label: Option<String>,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Branch {
        leaf: Option<Leaf>,
        any: Option<Box<dyn Object>>,
    }

    impl_object!(Leaf { label });
    impl_object!(Branch { leaf, any });

    #[test]
    fn downcast_round() {
        let boxed: Box<dyn Object> = Box::new(Leaf { label: Some("x".into()) });
        assert!(boxed.is::<Leaf>());
        assert_eq!(boxed.ctor(), Ctor::of::<Leaf>());
        let boxed = boxed.downcast::<Branch>().unwrap_err();
        let leaf = boxed.downcast::<Leaf>().unwrap();
        assert_eq!(leaf.label.as_deref(), Some("x"));
    }

    #[test]
    fn nested_fields() {
        let mut branch = Branch::default();
        branch
            .set_field("leaf", TypedValue::object(Leaf { label: Some("a".into()) }))
            .unwrap();
        branch
            .set_field("any", TypedValue::object(Leaf::default()))
            .unwrap();
        assert_eq!(branch.leaf.as_ref().and_then(|l| l.label.as_deref()), Some("a"));
        assert!(branch.any.as_ref().is_some_and(|a| a.is::<Leaf>()));

        let err = branch.set_field("leaf", TypedValue::object(Branch::default()));
        assert!(err.is_err());
    }

    #[test]
    fn equality_through_dyn() {
        let a: Box<dyn Object> = Box::new(Leaf { label: Some("x".into()) });
        let b = a.clone();
        assert!(a == b);
        let c: Box<dyn Object> = Box::new(Branch::default());
        assert!(a != c);
    }
}
