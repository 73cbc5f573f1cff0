use std::sync::Arc;

use log::{debug, trace};
use serde_core::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer as JsonWriter};

use tyjson_core::{
    Conversion, ConvertError, Ctor, Deserializer, Object, PlainValue, Serializer, Settings, TypeRegistry, TypeTag,
    TypedMap, TypedSet, TypedValue,
};

// -----------------------------------------------------------------------------
// TypedJson

/// JSON text in and out of typed values.
///
/// Owns a shared [`TypeRegistry`] and the [`Settings`] used by every call.
/// Text is read and written with `serde_json`; [`Settings::indent`] turns on
/// pretty printing.
///
/// # Examples
///
/// ```
/// use tyjson::{ClassSchema, RegistryBuilder, Settings, TypeTag, TypedJson, impl_object};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Book {
///     title: Option<String>,
///     pages: Option<u32>,
/// }
///
/// impl_object!(Book { title, pages });
///
/// let mut builder = RegistryBuilder::new();
/// builder
///     .register(
///         ClassSchema::of::<Book>()
///             .field("title", TypeTag::STRING)
///             .required()
///             .field("pages", TypeTag::NUMBER),
///     )
///     .unwrap();
/// let json = TypedJson::new(builder.build().unwrap(), Settings::default());
///
/// let book = json.parse_as::<Book>(r#"{"title":"Dune","pages":412}"#).unwrap().unwrap();
/// assert_eq!(book.title.as_deref(), Some("Dune"));
///
/// let text = json.stringify(&book, tyjson::Ctor::of::<Book>()).unwrap();
/// assert_eq!(text, r#"{"title":"Dune","pages":412}"#);
/// ```
#[derive(Debug, Clone)]
pub struct TypedJson {
    registry: Arc<TypeRegistry>,
    settings: Settings,
}

impl TypedJson {
    pub fn new(registry: impl Into<Arc<TypeRegistry>>, settings: Settings) -> Self {
        Self {
            registry: registry.into(),
            settings,
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces the settings, keeping the registry.
    pub fn with_settings(&self, settings: Settings) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            settings,
        }
    }

    #[inline]
    fn serializer(&self) -> Serializer<'_> {
        Serializer::new(&self.registry, &self.settings)
    }

    #[inline]
    fn deserializer(&self) -> Deserializer<'_> {
        Deserializer::new(&self.registry, &self.settings)
    }

    // -------------------------------------------------------------------------
    // Plain values

    /// Converts a typed value to a plain JSON tree, `None` if nothing is
    /// written.
    pub fn to_plain(&self, value: Option<&TypedValue>, tag: &TypeTag) -> Result<Option<PlainValue>, ConvertError> {
        self.serializer().serialize_value(value, tag)
    }

    /// Converts a plain JSON tree to a typed value, `None` if it is absent
    /// or could not be converted.
    pub fn from_plain(&self, plain: &PlainValue, tag: &TypeTag) -> Result<Option<TypedValue>, ConvertError> {
        self.from_plain_with_report(plain, tag).map(|c| c.value)
    }

    pub fn from_plain_with_report(
        &self,
        plain: &PlainValue,
        tag: &TypeTag,
    ) -> Result<Conversion<Option<TypedValue>>, ConvertError> {
        self.deserializer().deserialize_value_with_report(plain, tag)
    }

    // -------------------------------------------------------------------------
    // Parse

    /// Parses `text` as a value of type `tag`.
    pub fn parse(&self, text: &str, tag: &TypeTag) -> Result<Option<TypedValue>, ConvertError> {
        self.parse_with_report(text, tag).map(|c| c.value)
    }

    pub fn parse_with_report(&self, text: &str, tag: &TypeTag) -> Result<Conversion<Option<TypedValue>>, ConvertError> {
        let plain = read_text(text)?;
        self.from_plain_with_report(&plain, tag)
    }

    /// Parses `text` as an instance of `T`.
    pub fn parse_as<T: Object>(&self, text: &str) -> Result<Option<T>, ConvertError> {
        self.parse_as_with_report(text).map(|c| c.value)
    }

    /// Parses `text` as an instance of `T`, keeping every reported error.
    ///
    /// A type hint selecting a class other than `T` is a shape mismatch at
    /// `$`. It goes to the error handler like any other, and the result is
    /// `None` if the handler lets it pass.
    pub fn parse_as_with_report<T: Object>(&self, text: &str) -> Result<Conversion<Option<T>>, ConvertError> {
        let plain = read_text(text)?;
        let Conversion { value, mut errors } = self
            .deserializer()
            .deserialize_object_with_report(&plain, Ctor::of::<T>())?;

        let value = match value.map(|object| object.downcast::<T>()) {
            None => None,
            Some(Ok(concrete)) => Some(*concrete),
            Some(Err(other)) => {
                let error = ConvertError::TypeShapeMismatch {
                    expected: Ctor::of::<T>().name().into(),
                    found: other.ctor().name().into(),
                    path: "$".to_owned(),
                };
                self.settings.error_handler.handle(&error)?;
                errors.push(error);
                None
            }
        };
        Ok(Conversion { value, errors })
    }

    /// Parses `text` as an array nested `depth` times.
    pub fn parse_as_array(
        &self,
        text: &str,
        element: &TypeTag,
        depth: usize,
    ) -> Result<Option<Vec<TypedValue>>, ConvertError> {
        let plain = read_text(text)?;
        self.deserializer()
            .deserialize_array_with_report(&plain, element, depth)
            .map(|c| c.value)
    }

    pub fn parse_as_set(&self, text: &str, element: &TypeTag) -> Result<Option<TypedSet>, ConvertError> {
        let plain = read_text(text)?;
        self.deserializer()
            .deserialize_set_with_report(&plain, element)
            .map(|c| c.value)
    }

    pub fn parse_as_map(&self, text: &str, key: &TypeTag, value: &TypeTag) -> Result<Option<TypedMap>, ConvertError> {
        let plain = read_text(text)?;
        self.deserializer()
            .deserialize_map_with_report(&plain, key, value)
            .map(|c| c.value)
    }

    // -------------------------------------------------------------------------
    // Stringify

    /// Writes an instance expected to be of class `expected`.
    pub fn stringify(&self, object: &dyn Object, expected: Ctor) -> Result<String, ConvertError> {
        let plain = self.serializer().serialize_object(object, expected)?;
        self.write_text(&plain)
    }

    /// Writes a value of any shape, `None` if nothing is written.
    pub fn stringify_value(&self, value: Option<&TypedValue>, tag: &TypeTag) -> Result<Option<String>, ConvertError> {
        match self.to_plain(value, tag)? {
            Some(plain) => self.write_text(&plain).map(Some),
            None => Ok(None),
        }
    }

    pub fn stringify_as_array(
        &self,
        values: &[TypedValue],
        element: &TypeTag,
        depth: usize,
    ) -> Result<String, ConvertError> {
        let plain = self.serializer().serialize_array(values, element, depth)?;
        self.write_text(&plain)
    }

    pub fn stringify_as_set(&self, values: &TypedSet, element: &TypeTag) -> Result<String, ConvertError> {
        let plain = self.serializer().serialize_set(values, element)?;
        self.write_text(&plain)
    }

    pub fn stringify_as_map(&self, map: &TypedMap, key: &TypeTag, value: &TypeTag) -> Result<String, ConvertError> {
        let plain = self.serializer().serialize_map(map, key, value)?;
        self.write_text(&plain)
    }

    // -------------------------------------------------------------------------
    // Text

    fn write_text(&self, plain: &PlainValue) -> Result<String, ConvertError> {
        let Some(width) = self.settings.indent else {
            return Ok(serde_json::to_string(plain)?);
        };

        let indent = " ".repeat(width);
        let mut buffer = Vec::new();
        let mut writer = JsonWriter::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
        plain.serialize(&mut writer)?;
        trace!("wrote {} bytes of indented JSON", buffer.len());
        String::from_utf8(buffer).map_err(|err| ConvertError::custom(err.to_string()))
    }
}

fn read_text(text: &str) -> Result<PlainValue, ConvertError> {
    serde_json::from_str(text).map_err(|err| {
        debug!("rejected JSON text: {err}");
        ConvertError::from(err)
    })
}
