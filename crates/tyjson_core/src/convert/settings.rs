use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::Ctor;
use crate::convert::{ErrorHandler, LogErrors};
use crate::resolve::{DEFAULT_HINT_KEY, NameResolver, ShortTypeName, TypeHintEmitter, TypeResolver};

// -----------------------------------------------------------------------------
// MapShape

/// Plain encoding of map values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapShape {
    /// An array of `[key, value]` pairs, for any key type.
    #[default]
    Array,
    /// A JSON object. Keys must be strings; maps with other keys fall back to
    /// [`MapShape::Array`].
    Object,
}

// -----------------------------------------------------------------------------
// Settings

/// Options of a conversion, passed explicitly to every call.
///
/// # Examples
///
/// ```
/// use tyjson_core::{MapShape, Settings};
/// use tyjson_core::convert::FailFast;
///
/// struct Cat;
///
/// let settings = Settings::new()
///     .with_known_type::<Cat>()
///     .with_error_handler(FailFast)
///     .with_type_hint_key("$type")
///     .with_map_shape(MapShape::Object)
///     .with_indent(2);
///
/// assert_eq!(settings.type_hint_key, "$type");
/// assert_eq!(settings.known_types.len(), 1);
/// ```
#[derive(Clone)]
pub struct Settings {
    /// Classes accepted in type hints in addition to the root class's known
    /// subtypes.
    pub known_types: Vec<Ctor>,
    pub name_resolver: Arc<dyn NameResolver>,
    /// Hint reader; `None` reads [`type_hint_key`](Self::type_hint_key).
    pub type_resolver: Option<Arc<dyn TypeResolver>>,
    /// Hint writer; `None` writes [`type_hint_key`](Self::type_hint_key).
    pub type_hint_emitter: Option<Arc<dyn TypeHintEmitter>>,
    pub error_handler: Arc<dyn ErrorHandler>,
    pub type_hint_key: Cow<'static, str>,
    /// Keep explicit `null`s instead of treating them as absent.
    pub preserve_null: bool,
    pub map_shape: MapShape,
    /// Indentation of text output, compact if `None`.
    pub indent: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            known_types: Vec::new(),
            name_resolver: Arc::new(ShortTypeName),
            type_resolver: None,
            type_hint_emitter: None,
            error_handler: Arc::new(LogErrors),
            type_hint_key: Cow::Borrowed(DEFAULT_HINT_KEY),
            preserve_null: false,
            map_shape: MapShape::Array,
            indent: None,
        }
    }
}

impl Settings {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_known_type<T: ?Sized + 'static>(mut self) -> Self {
        self.known_types.push(Ctor::of::<T>());
        self
    }

    pub fn with_known_types(mut self, ctors: impl IntoIterator<Item = Ctor>) -> Self {
        self.known_types.extend(ctors);
        self
    }

    pub fn with_name_resolver(mut self, resolver: impl NameResolver + 'static) -> Self {
        self.name_resolver = Arc::new(resolver);
        self
    }

    pub fn with_type_resolver(mut self, resolver: impl TypeResolver + 'static) -> Self {
        self.type_resolver = Some(Arc::new(resolver));
        self
    }

    pub fn with_type_hint_emitter(mut self, emitter: impl TypeHintEmitter + 'static) -> Self {
        self.type_hint_emitter = Some(Arc::new(emitter));
        self
    }

    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    pub fn with_type_hint_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.type_hint_key = key.into();
        self
    }

    pub fn with_preserve_null(mut self, preserve_null: bool) -> Self {
        self.preserve_null = preserve_null;
        self
    }

    pub fn with_map_shape(mut self, map_shape: MapShape) -> Self {
        self.map_shape = map_shape;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("known_types", &self.known_types)
            .field("type_hint_key", &self.type_hint_key)
            .field("preserve_null", &self.preserve_null)
            .field("map_shape", &self.map_shape)
            .field("indent", &self.indent)
            .finish_non_exhaustive()
    }
}
