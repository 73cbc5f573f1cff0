//! The type-hint protocol for polymorphic values.
//!
//! When a value's runtime class differs from the class its declaration
//! expects, the serializer records the runtime class in the plain object
//! (a *type hint*), and the deserializer reads it back to pick the class to
//! instantiate. Three pluggable traits take part:
//!
//! - [`NameResolver`]: the name of a class inside hints.
//! - [`TypeHintEmitter`]: writes a hint while serializing.
//! - [`TypeResolver`]: reads a hint while deserializing.
//!
//! The defaults store the short type name under the `"__type"` key. All three
//! traits are implemented for matching closures.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use tyjson_core::{Ctor, DynamicObject, KnownTypes};
//! use tyjson_core::resolve::{HintKeyEmitter, HintKeyResolver, TypeHintEmitter, TypeResolver};
//!
//! struct Animal;
//! struct Dog;
//!
//! let mut known = KnownTypes::default();
//! known.insert(Ctor::of::<Animal>()).unwrap();
//! known.insert(Ctor::of::<Dog>()).unwrap();
//!
//! let mut plain = serde_json::Map::new();
//! let dog = DynamicObject::of::<Dog>();
//! HintKeyEmitter::default().emit_type_hint(&mut plain, &dog, Ctor::of::<Animal>(), &known);
//! assert_eq!(plain["__type"], json!("Dog"));
//!
//! let resolved = HintKeyResolver::default()
//!     .resolve_constructor(&plain, Ctor::of::<Animal>(), &known)
//!     .unwrap();
//! assert_eq!(resolved, Ctor::of::<Dog>());
//! ```

use std::borrow::Cow;

use log::{trace, warn};

use crate::convert::plain_kind;
use crate::value::Object;
use crate::{ConvertError, Ctor, KnownTypes, PlainObject, PlainValue};

/// Default key of the type hint inside a plain object.
pub const DEFAULT_HINT_KEY: &str = "__type";

// -----------------------------------------------------------------------------
// NameResolver

/// Maps a class to the name written in type hints.
pub trait NameResolver: Send + Sync {
    fn resolve_name(&self, ctor: Ctor) -> String;
}

impl<F> NameResolver for F
where
    F: Fn(Ctor) -> String + Send + Sync,
{
    #[inline]
    fn resolve_name(&self, ctor: Ctor) -> String {
        self(ctor)
    }
}

/// Uses the short type name, see [`Ctor::name`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortTypeName;

impl NameResolver for ShortTypeName {
    #[inline]
    fn resolve_name(&self, ctor: Ctor) -> String {
        ctor.name().to_owned()
    }
}

// -----------------------------------------------------------------------------
// TypeResolver

/// Picks the class to instantiate for a plain object.
pub trait TypeResolver: Send + Sync {
    fn resolve_constructor(
        &self,
        plain: &PlainObject,
        expected: Ctor,
        known: &KnownTypes,
    ) -> Result<Ctor, ConvertError>;
}

impl<F> TypeResolver for F
where
    F: Fn(&PlainObject, Ctor, &KnownTypes) -> Result<Ctor, ConvertError> + Send + Sync,
{
    #[inline]
    fn resolve_constructor(
        &self,
        plain: &PlainObject,
        expected: Ctor,
        known: &KnownTypes,
    ) -> Result<Ctor, ConvertError> {
        self(plain, expected, known)
    }
}

/// Reads the class name from a fixed key.
///
/// A missing or `null` hint means the expected class.
#[derive(Debug, Clone)]
pub struct HintKeyResolver {
    key: Cow<'static, str>,
}

impl HintKeyResolver {
    #[inline]
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self { key: key.into() }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for HintKeyResolver {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_HINT_KEY)
    }
}

impl TypeResolver for HintKeyResolver {
    fn resolve_constructor(
        &self,
        plain: &PlainObject,
        expected: Ctor,
        known: &KnownTypes,
    ) -> Result<Ctor, ConvertError> {
        match plain.get(self.key()) {
            None | Some(PlainValue::Null) => Ok(expected),
            Some(PlainValue::String(name)) => {
                trace!("type hint `{name}` in place of `{expected}`");
                known.resolve(name)
            }
            Some(other) => Err(ConvertError::shape_mismatch("string type hint", plain_kind(other))),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeHintEmitter

/// Records the runtime class of `source` into its plain form.
pub trait TypeHintEmitter: Send + Sync {
    fn emit_type_hint(
        &self,
        target: &mut PlainObject,
        source: &dyn Object,
        expected: Ctor,
        known: &KnownTypes,
    );
}

impl<F> TypeHintEmitter for F
where
    F: Fn(&mut PlainObject, &dyn Object, Ctor, &KnownTypes) + Send + Sync,
{
    #[inline]
    fn emit_type_hint(
        &self,
        target: &mut PlainObject,
        source: &dyn Object,
        expected: Ctor,
        known: &KnownTypes,
    ) {
        self(target, source, expected, known);
    }
}

/// Writes the class name under a fixed key, only when the runtime class
/// differs from the expected one.
#[derive(Debug, Clone)]
pub struct HintKeyEmitter {
    key: Cow<'static, str>,
}

impl HintKeyEmitter {
    #[inline]
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self { key: key.into() }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for HintKeyEmitter {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_HINT_KEY)
    }
}

impl TypeHintEmitter for HintKeyEmitter {
    fn emit_type_hint(
        &self,
        target: &mut PlainObject,
        source: &dyn Object,
        expected: Ctor,
        known: &KnownTypes,
    ) {
        let actual = source.ctor();
        if actual != expected {
            let hint = PlainValue::String(known.name_for(actual));
            if let Some(member) = target.insert(self.key().to_owned(), hint) {
                warn!(
                    "type hint `{}` of `{actual}` replaced a member written under the same key ({member})",
                    self.key(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{HintKeyEmitter, HintKeyResolver, TypeResolver, TypeHintEmitter};
    use crate::{Ctor, DynamicObject, ErrorKind, KnownTypes, PlainObject};

    struct Shape;
    struct Circle;

    fn object(value: serde_json::Value) -> PlainObject {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn absent_hint_is_expected() {
        let known = KnownTypes::default();
        let resolved = HintKeyResolver::default()
            .resolve_constructor(&object(json!({ "r": 1 })), Ctor::of::<Shape>(), &known)
            .unwrap();
        assert_eq!(resolved, Ctor::of::<Shape>());
    }

    #[test]
    fn bad_hints() {
        let known = KnownTypes::default();
        let resolver = HintKeyResolver::new("kind");

        let err = resolver
            .resolve_constructor(&object(json!({ "kind": "Square" })), Ctor::of::<Shape>(), &known)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvableConstructor);

        let err = resolver
            .resolve_constructor(&object(json!({ "kind": 3 })), Ctor::of::<Shape>(), &known)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeShapeMismatch);
    }

    #[test]
    fn no_hint_for_expected_class() {
        let known = KnownTypes::default();
        let mut plain = PlainObject::new();
        let circle = DynamicObject::of::<Circle>();
        HintKeyEmitter::default().emit_type_hint(&mut plain, &circle, Ctor::of::<Circle>(), &known);
        assert!(plain.is_empty());

        let emitter = |target: &mut PlainObject, source: &dyn crate::Object, _: Ctor, _: &KnownTypes| {
            target.insert("@class".into(), json!(source.ctor().path()));
        };
        emitter.emit_type_hint(&mut plain, &circle, Ctor::of::<Shape>(), &known);
        assert!(plain["@class"].as_str().is_some_and(|p| p.ends_with("Circle")));
    }

    #[test]
    fn hint_replaces_member_with_same_key() {
        let known = KnownTypes::default();
        let mut plain = object(json!({ "r": 2, "kind": "round" }));
        let circle = DynamicObject::of::<Circle>();
        HintKeyEmitter::new("kind").emit_type_hint(&mut plain, &circle, Ctor::of::<Shape>(), &known);

        assert_eq!(plain.len(), 2);
        assert_eq!(plain["kind"], json!("Circle"));
        assert_eq!(serde_json::to_string(&plain).unwrap(), r#"{"r":2,"kind":"Circle"}"#);
    }
}
