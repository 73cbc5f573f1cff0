use core::fmt;

use crate::Ctor;

// -----------------------------------------------------------------------------
// ScalarKind

/// The scalar kinds understood by the converter.
///
/// Each kind has one fixed plain encoding:
///
/// | kind      | plain JSON                                   |
/// |-----------|----------------------------------------------|
/// | `Number`  | number, integral values written as integers  |
/// | `String`  | string                                       |
/// | `Boolean` | `true` / `false`                             |
/// | `Date`    | RFC 3339 string (epoch millis accepted back) |
/// | `RegExp`  | `"/source/flags"` string                     |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Number,
    String,
    Boolean,
    Date,
    RegExp,
}

impl ScalarKind {
    /// Returns the lowercase name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::RegExp => "regexp",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// TypeTag

/// Describes the expected shape of a value.
///
/// Container tags carry the tags of their elements, so a single `TypeTag`
/// describes an arbitrarily nested structure.
///
/// # Examples
///
/// ```
/// use tyjson_core::TypeTag;
///
/// struct Pet;
///
/// // Map<String, Set<Pet>>
/// let tag = TypeTag::map_of(TypeTag::STRING, TypeTag::set_of(TypeTag::object::<Pet>()));
/// assert_eq!(tag.to_string(), "Map<string, Set<Pet>>");
///
/// // number[][]
/// let grid = TypeTag::array_of_depth(TypeTag::NUMBER, 2);
/// assert_eq!(grid.to_string(), "Array<number; 2>");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeTag {
    /// A scalar value.
    Scalar(ScalarKind),
    /// An instance of a registered class.
    Object(Ctor),
    /// An array nested `depth` times, with `element` at the innermost level.
    Array { element: Box<TypeTag>, depth: usize },
    /// A set of `element`s, written as an array.
    Set(Box<TypeTag>),
    /// A map, written as an array of `[key, value]` pairs.
    Map { key: Box<TypeTag>, value: Box<TypeTag> },
}

impl TypeTag {
    pub const NUMBER: TypeTag = TypeTag::Scalar(ScalarKind::Number);
    pub const STRING: TypeTag = TypeTag::Scalar(ScalarKind::String);
    pub const BOOLEAN: TypeTag = TypeTag::Scalar(ScalarKind::Boolean);
    pub const DATE: TypeTag = TypeTag::Scalar(ScalarKind::Date);
    pub const REGEXP: TypeTag = TypeTag::Scalar(ScalarKind::RegExp);

    /// Tag for an instance of the class represented by `T`.
    #[inline]
    pub fn object<T: ?Sized + 'static>() -> Self {
        Self::Object(Ctor::of::<T>())
    }

    /// Tag for a one-dimensional array.
    #[inline]
    pub fn array_of(element: TypeTag) -> Self {
        Self::array_of_depth(element, 1)
    }

    /// Tag for an array nested `depth` times.
    ///
    /// A `depth` of zero is treated as one.
    #[inline]
    pub fn array_of_depth(element: TypeTag, depth: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            depth: depth.max(1),
        }
    }

    /// Tag for a set.
    #[inline]
    pub fn set_of(element: TypeTag) -> Self {
        Self::Set(Box::new(element))
    }

    /// Tag for a map.
    #[inline]
    pub fn map_of(key: TypeTag, value: TypeTag) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Returns `true` for array, set and map tags.
    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Array { .. } | Self::Set(_) | Self::Map { .. })
    }

    /// Returns the outermost shape name, as used in shape mismatch errors.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Object(_) => "object",
            Self::Array { .. } => "array",
            Self::Set(_) => "set",
            Self::Map { .. } => "map",
        }
    }

    /// Calls `f` for every class constructor mentioned anywhere in this tag.
    pub fn for_each_ctor(&self, f: &mut impl FnMut(Ctor)) {
        match self {
            Self::Scalar(_) => {}
            Self::Object(ctor) => f(*ctor),
            Self::Array { element, .. } | Self::Set(element) => element.for_each_ctor(f),
            Self::Map { key, value } => {
                key.for_each_ctor(f);
                value.for_each_ctor(f);
            }
        }
    }
}

impl From<ScalarKind> for TypeTag {
    #[inline]
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.name()),
            Self::Object(ctor) => f.write_str(ctor.name()),
            Self::Array { element, depth: 1 } => write!(f, "Array<{element}>"),
            Self::Array { element, depth } => write!(f, "Array<{element}; {depth}>"),
            Self::Set(element) => write!(f, "Set<{element}>"),
            Self::Map { key, value } => write!(f, "Map<{key}, {value}>"),
        }
    }
}
