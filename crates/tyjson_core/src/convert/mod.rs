//! Conversion between typed values and plain JSON.
//!
//! - [`Serializer`]: typed values to [`PlainValue`](crate::PlainValue).
//! - [`Deserializer`]: plain values back to typed values.
//! - [`Settings`]: options threaded into every call.
//! - [`ConvertError`], [`ErrorHandler`]: error reporting.
//!
//! Every top-level call runs one depth-first traversal. Recoverable errors
//! are passed to [`Settings::error_handler`] with the location of the
//! offending value and collected; the traversal then goes on and returns a
//! best-effort result. The `*_with_report` variants return the collected
//! errors next to the value.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use tyjson_core::{ClassSchema, Ctor, Deserializer, ErrorKind, RegistryBuilder, Settings, TypeTag};
//!
//! struct Pet;
//!
//! let mut builder = RegistryBuilder::new();
//! builder
//!     .register(
//!         ClassSchema::dynamic::<Pet>()
//!             .field("name", TypeTag::STRING)
//!             .required()
//!             .field("age", TypeTag::NUMBER),
//!     )
//!     .unwrap();
//! let registry = builder.build().unwrap();
//! let settings = Settings::default();
//!
//! let report = Deserializer::new(&registry, &settings)
//!     .deserialize_object_with_report(&json!({ "age": "old" }), Ctor::of::<Pet>())
//!     .unwrap();
//!
//! let kinds: Vec<_> = report.errors.iter().map(|e| e.kind()).collect();
//! assert_eq!(kinds, [ErrorKind::MissingRequiredMember, ErrorKind::TypeShapeMismatch]);
//! assert_eq!(report.errors[1].path(), "$.age");
//!
//! // The instance is still produced, without the failed members.
//! let pet = report.value.unwrap();
//! assert_eq!(pet.field("name"), None);
//! assert_eq!(pet.field("age"), None);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod context;
mod de;
mod error;
mod scalar;
mod ser;
mod settings;

// -----------------------------------------------------------------------------
// Exports

pub use de::Deserializer;
pub use error::{Conversion, ConvertError, ErrorHandler, ErrorKind, FailFast, LogErrors};
pub use ser::Serializer;
pub use settings::{MapShape, Settings};

pub(crate) use scalar::plain_kind;
