use crate::convert::context::ConvertContext;
use crate::convert::scalar::{plain_kind, scalar_from_plain};
use crate::convert::{Conversion, ConvertError, Settings};
use crate::value::Object;
use crate::{Ctor, KnownTypes, PlainValue, TypeRegistry, TypeTag, TypedMap, TypedSet, TypedValue};

// -----------------------------------------------------------------------------
// Deserializer

/// Converts plain JSON back to typed values.
///
/// # Deserialization rules
///
/// - `null` is absent, or `Null` with [`Settings::preserve_null`].
/// - Scalars are read back from their serialized form. Dates are also
///   accepted as milliseconds since the Unix epoch.
/// - Objects: the class is picked by the [`TypeResolver`], then every member
///   is read by its serialized name. A missing required member is reported
///   and the instance is still returned. [`Object::on_deserialized`] runs last.
/// - Arrays keep positions, failed elements become `Null`. Failed set
///   elements and map entries are left out.
///
/// A type hint can only name classes in the [`KnownTypes`] of the call: the
/// root's known subtypes and [`Settings::known_types`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tyjson_core::{ClassSchema, Ctor, Deserializer, DynamicObject, RegistryBuilder, Settings, TypeTag};
///
/// struct Shape;
/// struct Circle;
///
/// let mut builder = RegistryBuilder::new();
/// builder
///     .register(ClassSchema::dynamic::<Shape>().known_subtype::<Circle>())
///     .unwrap()
///     .register(ClassSchema::dynamic::<Circle>().field("r", TypeTag::NUMBER))
///     .unwrap();
/// let registry = builder.build().unwrap();
/// let settings = Settings::default();
/// let de = Deserializer::new(&registry, &settings);
///
/// let tag = TypeTag::array_of(TypeTag::object::<Shape>());
/// let known = de.known_types_for(&tag).unwrap();
/// let shapes = de
///     .deserialize_value(&json!([{ "__type": "Circle", "r": 2 }, {}]), &tag, &known)
///     .unwrap()
///     .unwrap();
///
/// let shapes = shapes.as_array().unwrap();
/// assert_eq!(shapes[0].as_object().unwrap().ctor(), Ctor::of::<Circle>());
/// assert_eq!(shapes[1].as_object().unwrap().ctor(), Ctor::of::<Shape>());
/// assert_eq!(
///     shapes[0].downcast_ref::<DynamicObject>().unwrap().get("r"),
///     Some(&2.into()),
/// );
/// ```
///
/// [`TypeResolver`]: crate::resolve::TypeResolver
#[derive(Clone, Copy)]
pub struct Deserializer<'a> {
    registry: &'a TypeRegistry,
    settings: &'a Settings,
}

impl<'a> Deserializer<'a> {
    #[inline]
    pub const fn new(registry: &'a TypeRegistry, settings: &'a Settings) -> Self {
        Self { registry, settings }
    }

    /// Builds the table of classes that type hints may name when converting
    /// a value of type `tag`.
    ///
    /// Ambiguous names are passed to the error handler.
    pub fn known_types_for(&self, tag: &TypeTag) -> Result<KnownTypes, ConvertError> {
        ConvertContext::new(self.registry, self.settings).known_types_for(tag)
    }

    /// Runs one traversal with the given table.
    fn run<T>(
        &self,
        root: &TypeTag,
        known: &KnownTypes,
        f: impl FnOnce(&mut DeserializeRun<'a, '_>) -> Result<T, ConvertError>,
    ) -> Result<Conversion<T>, ConvertError> {
        let cx = ConvertContext::new(self.registry, self.settings);
        cx.check_root(root)?;
        let mut run = DeserializeRun { cx, known };
        let value = f(&mut run)?;
        Ok(Conversion {
            value,
            errors: run.cx.into_errors(),
        })
    }

    /// Runs one traversal with a table built for `root`. Errors raised while
    /// building the table are part of the report.
    fn run_reported<T>(
        &self,
        root: &TypeTag,
        f: impl FnOnce(&mut DeserializeRun<'a, '_>) -> Result<T, ConvertError>,
    ) -> Result<Conversion<T>, ConvertError> {
        let mut cx = ConvertContext::new(self.registry, self.settings);
        cx.check_root(root)?;
        let known = cx.known_types_for(root)?;
        let mut run = DeserializeRun { cx, known: &known };
        let value = f(&mut run)?;
        Ok(Conversion {
            value,
            errors: run.cx.into_errors(),
        })
    }

    // -------------------------------------------------------------------------
    // Any value

    /// Deserializes a value of any shape, `None` if it is absent or failed.
    pub fn deserialize_value(
        &self,
        plain: &PlainValue,
        tag: &TypeTag,
        known: &KnownTypes,
    ) -> Result<Option<TypedValue>, ConvertError> {
        self.run(tag, known, |run| run.value(plain, tag)).map(|c| c.value)
    }

    pub fn deserialize_value_with_report(
        &self,
        plain: &PlainValue,
        tag: &TypeTag,
    ) -> Result<Conversion<Option<TypedValue>>, ConvertError> {
        self.run_reported(tag, |run| run.value(plain, tag))
    }

    // -------------------------------------------------------------------------
    // Object

    pub fn deserialize_object(
        &self,
        plain: &PlainValue,
        expected: Ctor,
        known: &KnownTypes,
    ) -> Result<Option<Box<dyn Object>>, ConvertError> {
        self.run(&TypeTag::Object(expected), known, |run| run.root_object(plain, expected))
            .map(|c| c.value)
    }

    pub fn deserialize_object_with_report(
        &self,
        plain: &PlainValue,
        expected: Ctor,
    ) -> Result<Conversion<Option<Box<dyn Object>>>, ConvertError> {
        self.run_reported(&TypeTag::Object(expected), |run| run.root_object(plain, expected))
    }

    // -------------------------------------------------------------------------
    // Containers

    pub fn deserialize_array(
        &self,
        plain: &PlainValue,
        element: &TypeTag,
        depth: usize,
        known: &KnownTypes,
    ) -> Result<Option<Vec<TypedValue>>, ConvertError> {
        let root = TypeTag::array_of_depth(element.clone(), depth);
        self.run(&root, known, |run| run.root_array(plain, element, depth.max(1)))
            .map(|c| c.value)
    }

    pub fn deserialize_array_with_report(
        &self,
        plain: &PlainValue,
        element: &TypeTag,
        depth: usize,
    ) -> Result<Conversion<Option<Vec<TypedValue>>>, ConvertError> {
        let root = TypeTag::array_of_depth(element.clone(), depth);
        self.run_reported(&root, |run| run.root_array(plain, element, depth.max(1)))
    }

    pub fn deserialize_set(
        &self,
        plain: &PlainValue,
        element: &TypeTag,
        known: &KnownTypes,
    ) -> Result<Option<TypedSet>, ConvertError> {
        let root = TypeTag::set_of(element.clone());
        self.run(&root, known, |run| run.root_set(plain, element))
            .map(|c| c.value)
    }

    pub fn deserialize_set_with_report(
        &self,
        plain: &PlainValue,
        element: &TypeTag,
    ) -> Result<Conversion<Option<TypedSet>>, ConvertError> {
        let root = TypeTag::set_of(element.clone());
        self.run_reported(&root, |run| run.root_set(plain, element))
    }

    pub fn deserialize_map(
        &self,
        plain: &PlainValue,
        key: &TypeTag,
        value: &TypeTag,
        known: &KnownTypes,
    ) -> Result<Option<TypedMap>, ConvertError> {
        let root = TypeTag::map_of(key.clone(), value.clone());
        self.run(&root, known, |run| run.map(plain, key, value))
            .map(|c| c.value)
    }

    pub fn deserialize_map_with_report(
        &self,
        plain: &PlainValue,
        key: &TypeTag,
        value: &TypeTag,
    ) -> Result<Conversion<Option<TypedMap>>, ConvertError> {
        let root = TypeTag::map_of(key.clone(), value.clone());
        self.run_reported(&root, |run| run.map(plain, key, value))
    }
}

// -----------------------------------------------------------------------------
// DeserializeRun

/// State of one deserializer traversal.
pub(super) struct DeserializeRun<'a, 'k> {
    pub cx: ConvertContext<'a>,
    pub known: &'k KnownTypes,
}

impl DeserializeRun<'_, '_> {
    /// Dispatches on the tag. `Ok(None)` means absent or failed.
    pub fn value(&mut self, plain: &PlainValue, tag: &TypeTag) -> Result<Option<TypedValue>, ConvertError> {
        if plain.is_null() {
            return Ok(self.cx.settings.preserve_null.then_some(TypedValue::Null));
        }
        match (tag, plain) {
            (TypeTag::Scalar(kind), _) => match scalar_from_plain(*kind, plain) {
                Ok(value) => Ok(Some(value)),
                Err(error) => self.cx.report(error).map(|()| None),
            },
            (TypeTag::Object(expected), PlainValue::Object(map)) => {
                Ok(self.object(map, *expected)?.map(TypedValue::Object))
            }
            (TypeTag::Array { element, depth }, PlainValue::Array(items)) => {
                Ok(Some(TypedValue::Array(self.array(items, element, *depth)?)))
            }
            (TypeTag::Set(element), PlainValue::Array(items)) => {
                Ok(Some(TypedValue::Set(self.set(items, element)?)))
            }
            (TypeTag::Map { key, value }, _) => Ok(self.map(plain, key, value)?.map(TypedValue::Map)),
            _ => self.mismatch(tag.shape_name(), plain),
        }
    }

    /// Reports a plain value of the wrong shape, which is then left out.
    pub fn mismatch<T>(&mut self, expected: &str, found: &PlainValue) -> Result<Option<T>, ConvertError> {
        self.cx
            .report(ConvertError::shape_mismatch(expected, plain_kind(found)))
            .map(|()| None)
    }

    fn root_object(&mut self, plain: &PlainValue, expected: Ctor) -> Result<Option<Box<dyn Object>>, ConvertError> {
        match plain {
            PlainValue::Object(map) => self.object(map, expected),
            PlainValue::Null => Ok(None),
            other => self.mismatch("object", other),
        }
    }

    fn root_array(
        &mut self,
        plain: &PlainValue,
        element: &TypeTag,
        depth: usize,
    ) -> Result<Option<Vec<TypedValue>>, ConvertError> {
        match plain {
            PlainValue::Array(items) => self.array(items, element, depth).map(Some),
            PlainValue::Null => Ok(None),
            other => self.mismatch("array", other),
        }
    }

    fn root_set(&mut self, plain: &PlainValue, element: &TypeTag) -> Result<Option<TypedSet>, ConvertError> {
        match plain {
            PlainValue::Array(items) => self.set(items, element).map(Some),
            PlainValue::Null => Ok(None),
            other => self.mismatch("set", other),
        }
    }
}
