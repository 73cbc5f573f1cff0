//! Type-directed conversion between typed object graphs and plain JSON trees.
//!
//! Plain JSON drops static type information: which concrete class a value
//! belongs to, whether a field holds a set, a map or a nested array, and what
//! its elements are. This crate keeps that information in a [`TypeRegistry`]
//! and uses it to walk both directions of the conversion.
//!
//! ## Menu
//!
//! - [`Ctor`]: identity of a class, backed by a Rust type.
//! - [`info`]: [`TypeTag`], member and class descriptors.
//! - [`value`]: the typed side, [`TypedValue`] and the [`Object`] trait.
//! - [`registry`]: [`ClassSchema`], [`RegistryBuilder`], [`TypeRegistry`], [`KnownTypes`].
//! - [`resolve`]: the type-hint protocol used for polymorphic values.
//! - [`convert`]: [`Serializer`], [`Deserializer`], [`Settings`] and errors.
//!
//! # Examples
//!
//! ```
//! use tyjson_core::{ClassSchema, RegistryBuilder, Serializer, Settings, TypeTag};
//! use tyjson_core::impl_object;
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Point {
//!     x: Option<f64>,
//!     y: Option<f64>,
//! }
//!
//! impl_object!(Point { x, y });
//!
//! let mut builder = RegistryBuilder::new();
//! builder
//!     .register(
//!         ClassSchema::of::<Point>()
//!             .field("x", TypeTag::NUMBER)
//!             .field("y", TypeTag::NUMBER)
//!             .emit_default(),
//!     )
//!     .unwrap();
//! let registry = builder.build().unwrap();
//! let settings = Settings::default();
//!
//! let point = Point { x: Some(1.5), y: None };
//! let plain = Serializer::new(&registry, &settings)
//!     .serialize_object(&point, tyjson_core::Ctor::of::<Point>())
//!     .unwrap();
//!
//! assert_eq!(plain, serde_json::json!({ "x": 1.5, "y": 0 }));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod ctor;

pub mod convert;
pub mod info;
pub mod registry;
pub mod resolve;
pub mod value;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use convert::{Conversion, ConvertError, Deserializer, ErrorKind, MapShape, Serializer, Settings};
pub use ctor::Ctor;
pub use info::{ScalarKind, TypeTag};
pub use registry::{ClassSchema, KnownTypes, RegistryBuilder, RegistryError, TypeRegistry};
pub use value::{DynamicObject, FieldValue, Object, RegExp, TypedMap, TypedSet, TypedValue};

/// Plain JSON value tree, the untyped side of every conversion.
pub type PlainValue = serde_json::Value;

/// Plain JSON object, the untyped form of a registered class instance.
pub type PlainObject = serde_json::Map<String, serde_json::Value>;
