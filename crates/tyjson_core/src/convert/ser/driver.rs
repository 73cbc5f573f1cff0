use crate::convert::context::ConvertContext;
use crate::convert::scalar::scalar_to_plain;
use crate::convert::{Conversion, ConvertError, Settings};
use crate::value::Object;
use crate::{Ctor, KnownTypes, PlainValue, TypeRegistry, TypeTag, TypedMap, TypedSet, TypedValue};

// -----------------------------------------------------------------------------
// Serializer

/// Converts typed values to plain JSON.
///
/// # Serialization rules
///
/// - An absent value, or `Null` without [`Settings::preserve_null`], is left
///   out. A member flagged `emit_default_value` writes the default of its
///   type instead.
/// - Scalars: numbers (integral values without a fraction), strings,
///   booleans, dates as RFC 3339 strings, regular expressions as
///   `"/source/flags"`.
/// - Objects: the members of the registered class, in declaration order. A
///   registered runtime class different from the expected one writes its own
///   members and a type hint.
/// - Arrays recurse by depth. Sets become arrays. Maps become arrays of
///   `[key, value]` pairs, or objects under [`MapShape::Object`].
///
/// The root type must be registered, otherwise the call fails with
/// [`ConvertError::UnregisteredRootType`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tyjson_core::{ClassSchema, DynamicObject, RegistryBuilder, Serializer, Settings, TypeTag, TypedValue};
///
/// struct Animal;
/// struct Dog;
/// struct Zoo;
///
/// let mut builder = RegistryBuilder::new();
/// builder
///     .register(ClassSchema::dynamic::<Animal>().field("name", TypeTag::STRING))
///     .unwrap()
///     .register(ClassSchema::dynamic::<Dog>().extends::<Animal>().field("bark", TypeTag::BOOLEAN))
///     .unwrap()
///     .register(ClassSchema::dynamic::<Zoo>().field("star", TypeTag::object::<Animal>()))
///     .unwrap();
/// let registry = builder.build().unwrap();
/// let settings = Settings::default();
///
/// let rex = DynamicObject::of::<Dog>().with("name", "Rex").with("bark", true);
/// let zoo = DynamicObject::of::<Zoo>().with("star", TypedValue::object(rex));
///
/// let plain = Serializer::new(&registry, &settings)
///     .serialize_value(Some(&TypedValue::object(zoo)), &TypeTag::object::<Zoo>())
///     .unwrap();
///
/// assert_eq!(
///     plain,
///     Some(json!({ "star": { "name": "Rex", "bark": true, "__type": "Dog" } })),
/// );
/// ```
///
/// [`MapShape::Object`]: crate::MapShape::Object
#[derive(Clone, Copy)]
pub struct Serializer<'a> {
    registry: &'a TypeRegistry,
    settings: &'a Settings,
}

impl<'a> Serializer<'a> {
    #[inline]
    pub const fn new(registry: &'a TypeRegistry, settings: &'a Settings) -> Self {
        Self { registry, settings }
    }

    /// Runs one traversal rooted at `root`.
    fn run<T>(
        &self,
        root: &TypeTag,
        f: impl FnOnce(&mut SerializeRun<'a>) -> Result<T, ConvertError>,
    ) -> Result<Conversion<T>, ConvertError> {
        let mut cx = ConvertContext::new(self.registry, self.settings);
        cx.check_root(root)?;
        let known = cx.known_types_for(root)?;
        let mut run = SerializeRun { cx, known };
        let value = f(&mut run)?;
        Ok(Conversion {
            value,
            errors: run.cx.into_errors(),
        })
    }

    /// Serializes a value of any shape, `None` if nothing is written.
    pub fn serialize_value(
        &self,
        value: Option<&TypedValue>,
        tag: &TypeTag,
    ) -> Result<Option<PlainValue>, ConvertError> {
        self.serialize_value_with_report(value, tag).map(|c| c.value)
    }

    pub fn serialize_value_with_report(
        &self,
        value: Option<&TypedValue>,
        tag: &TypeTag,
    ) -> Result<Conversion<Option<PlainValue>>, ConvertError> {
        self.run(tag, |run| run.value(value, tag))
    }

    /// Serializes an instance expected to be of class `expected`.
    pub fn serialize_object(&self, object: &dyn Object, expected: Ctor) -> Result<PlainValue, ConvertError> {
        self.serialize_object_with_report(object, expected).map(|c| c.value)
    }

    pub fn serialize_object_with_report(
        &self,
        object: &dyn Object,
        expected: Ctor,
    ) -> Result<Conversion<PlainValue>, ConvertError> {
        self.run(&TypeTag::Object(expected), |run| run.object(object, expected))
    }

    /// Serializes an array nested `depth` times.
    pub fn serialize_array(
        &self,
        values: &[TypedValue],
        element: &TypeTag,
        depth: usize,
    ) -> Result<PlainValue, ConvertError> {
        self.serialize_array_with_report(values, element, depth).map(|c| c.value)
    }

    pub fn serialize_array_with_report(
        &self,
        values: &[TypedValue],
        element: &TypeTag,
        depth: usize,
    ) -> Result<Conversion<PlainValue>, ConvertError> {
        let root = TypeTag::array_of_depth(element.clone(), depth);
        self.run(&root, |run| run.array(values, element, depth.max(1)))
    }

    pub fn serialize_set(&self, values: &TypedSet, element: &TypeTag) -> Result<PlainValue, ConvertError> {
        self.serialize_set_with_report(values, element).map(|c| c.value)
    }

    pub fn serialize_set_with_report(
        &self,
        values: &TypedSet,
        element: &TypeTag,
    ) -> Result<Conversion<PlainValue>, ConvertError> {
        let root = TypeTag::set_of(element.clone());
        self.run(&root, |run| run.set(values, element))
    }

    pub fn serialize_map(
        &self,
        map: &TypedMap,
        key: &TypeTag,
        value: &TypeTag,
    ) -> Result<PlainValue, ConvertError> {
        self.serialize_map_with_report(map, key, value).map(|c| c.value)
    }

    pub fn serialize_map_with_report(
        &self,
        map: &TypedMap,
        key: &TypeTag,
        value: &TypeTag,
    ) -> Result<Conversion<PlainValue>, ConvertError> {
        let root = TypeTag::map_of(key.clone(), value.clone());
        self.run(&root, |run| run.map(map, key, value))
    }
}

// -----------------------------------------------------------------------------
// SerializeRun

/// State of one serializer traversal.
pub(super) struct SerializeRun<'a> {
    pub cx: ConvertContext<'a>,
    pub known: KnownTypes,
}

impl SerializeRun<'_> {
    /// Dispatches on the tag. `Ok(None)` means nothing is written.
    pub fn value(
        &mut self,
        value: Option<&TypedValue>,
        tag: &TypeTag,
    ) -> Result<Option<PlainValue>, ConvertError> {
        let value = match value {
            None => return Ok(None),
            Some(TypedValue::Null) if self.cx.settings.preserve_null => return Ok(Some(PlainValue::Null)),
            Some(TypedValue::Null) => return Ok(None),
            Some(value) => value,
        };

        match (tag, value) {
            (TypeTag::Scalar(kind), _) => match scalar_to_plain(*kind, value) {
                Ok(plain) => Ok(Some(plain)),
                Err(error) => self.cx.report(error).map(|()| None),
            },
            (TypeTag::Object(expected), TypedValue::Object(object)) => {
                self.object(&**object, *expected).map(Some)
            }
            (TypeTag::Array { element, depth }, TypedValue::Array(items)) => {
                self.array(items, element, *depth).map(Some)
            }
            (TypeTag::Set(element), TypedValue::Set(values)) => self.set(values, element).map(Some),
            (TypeTag::Map { key, value: item }, TypedValue::Map(map)) => self.map(map, key, item).map(Some),
            _ => self.mismatch(tag.shape_name(), value),
        }
    }

    /// Reports a value of the wrong shape, which is then left out.
    pub fn mismatch<T>(&mut self, expected: &str, found: &TypedValue) -> Result<Option<T>, ConvertError> {
        self.cx
            .report(ConvertError::shape_mismatch(expected, found.kind_name()))
            .map(|()| None)
    }
}
