use std::sync::Arc;

use log::warn;
use thiserror::Error;

use crate::{Ctor, ScalarKind};

// -----------------------------------------------------------------------------
// ConvertError

/// Error raised while converting between typed values and plain JSON.
///
/// Every variant except [`UnregisteredRootType`](Self::UnregisteredRootType)
/// is recoverable: it is passed to the [`ErrorHandler`], and the conversion
/// goes on with the offending entry left out unless the handler returns it.
///
/// `path` fields hold the location of the offending value, such as
/// `$.pets[1].name`, and are filled in when the error is reported.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("cannot resolve constructor `{name}`{}", at(.path))]
    UnresolvableConstructor { name: String, path: String },

    #[error("expected {expected}, found {found}{}", at(.path))]
    TypeShapeMismatch {
        expected: String,
        found: String,
        path: String,
    },

    #[error("missing required member `{member}` of `{class}`{}", at(.path))]
    MissingRequiredMember {
        class: Ctor,
        member: String,
        path: String,
    },

    #[error("type name `{name}` is claimed by both `{first:?}` and `{second:?}`")]
    AmbiguousTypeName { name: String, first: Ctor, second: Ctor },

    #[error("root type `{ctor:?}` is not registered")]
    UnregisteredRootType { ctor: Ctor },

    #[error("invalid {kind} value: {value}{}", at(.path))]
    InvalidScalar {
        kind: ScalarKind,
        value: String,
        path: String,
    },

    #[error("{message}{}", at(.path))]
    Custom { message: String, path: String },

    #[error("malformed JSON: {0}")]
    Json(Arc<serde_json::Error>),
}

fn at(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at `{path}`")
    }
}

/// Discriminant of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnresolvableConstructor,
    TypeShapeMismatch,
    MissingRequiredMember,
    AmbiguousTypeName,
    UnregisteredRootType,
    InvalidScalar,
    Custom,
    Json,
}

impl ConvertError {
    /// A value of the wrong shape.
    pub fn shape_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeShapeMismatch {
            expected: expected.into(),
            found: found.into(),
            path: String::new(),
        }
    }

    /// A scalar of the right shape that cannot be read.
    pub fn invalid_scalar(kind: ScalarKind, value: impl Into<String>) -> Self {
        Self::InvalidScalar {
            kind,
            value: value.into(),
            path: String::new(),
        }
    }

    /// A free-form error, mostly for custom member hooks.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
            path: String::new(),
        }
    }

    /// `set_field` was called with a key the class does not have.
    pub fn unknown_member(class: Ctor, key: &str) -> Self {
        Self::custom(format!("`{class}` has no member `{key}`"))
    }

    pub(crate) fn unresolvable(name: impl Into<String>) -> Self {
        Self::UnresolvableConstructor {
            name: name.into(),
            path: String::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnresolvableConstructor { .. } => ErrorKind::UnresolvableConstructor,
            Self::TypeShapeMismatch { .. } => ErrorKind::TypeShapeMismatch,
            Self::MissingRequiredMember { .. } => ErrorKind::MissingRequiredMember,
            Self::AmbiguousTypeName { .. } => ErrorKind::AmbiguousTypeName,
            Self::UnregisteredRootType { .. } => ErrorKind::UnregisteredRootType,
            Self::InvalidScalar { .. } => ErrorKind::InvalidScalar,
            Self::Custom { .. } => ErrorKind::Custom,
            Self::Json(_) => ErrorKind::Json,
        }
    }

    /// Returns `true` for errors that abort a conversion without reaching
    /// the error handler.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnregisteredRootType { .. } | Self::Json(_))
    }

    /// Returns the location of the error, empty if it has none.
    pub fn path(&self) -> &str {
        match self {
            Self::UnresolvableConstructor { path, .. }
            | Self::TypeShapeMismatch { path, .. }
            | Self::MissingRequiredMember { path, .. }
            | Self::InvalidScalar { path, .. }
            | Self::Custom { path, .. } => path,
            Self::AmbiguousTypeName { .. } | Self::UnregisteredRootType { .. } | Self::Json(_) => "",
        }
    }

    /// Sets the location if the error does not carry one yet.
    pub(crate) fn locate(&mut self, location: impl FnOnce() -> String) {
        match self {
            Self::UnresolvableConstructor { path, .. }
            | Self::TypeShapeMismatch { path, .. }
            | Self::MissingRequiredMember { path, .. }
            | Self::InvalidScalar { path, .. }
            | Self::Custom { path, .. }
                if path.is_empty() =>
            {
                *path = location();
            }
            _ => {}
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    #[inline]
    fn from(error: serde_json::Error) -> Self {
        Self::Json(Arc::new(error))
    }
}

// -----------------------------------------------------------------------------
// ErrorHandler

/// Decides what happens to a recoverable error.
///
/// Returning `Ok(())` records the error and continues; returning `Err` aborts
/// the conversion with that error.
///
/// Closures of the form `Fn(&ConvertError) -> Result<(), ConvertError>` are
/// handlers too.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, error: &ConvertError) -> Result<(), ConvertError>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&ConvertError) -> Result<(), ConvertError> + Send + Sync,
{
    #[inline]
    fn handle(&self, error: &ConvertError) -> Result<(), ConvertError> {
        self(error)
    }
}

/// Logs every error with `log::warn!` and continues. The default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrors;

impl ErrorHandler for LogErrors {
    fn handle(&self, error: &ConvertError) -> Result<(), ConvertError> {
        warn!("{error}");
        Ok(())
    }
}

/// Aborts on the first error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl ErrorHandler for FailFast {
    #[inline]
    fn handle(&self, error: &ConvertError) -> Result<(), ConvertError> {
        Err(error.clone())
    }
}

// -----------------------------------------------------------------------------
// Conversion

/// A conversion result together with every error reported on the way.
#[derive(Debug, Clone)]
pub struct Conversion<T> {
    pub value: T,
    pub errors: Vec<ConvertError>,
}

impl<T> Conversion<T> {
    /// Returns `true` if no error was reported.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Conversion<U> {
        Conversion {
            value: f(self.value),
            errors: self.errors,
        }
    }
}
