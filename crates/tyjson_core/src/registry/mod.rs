//! Class registration.
//!
//! ## Menu
//!
//! - [`ClassSchema`]: declarative description of one class.
//! - [`RegistryBuilder`]: collects schemas and member declarations, then
//!   merges inheritance and computes known subtypes.
//! - [`TypeRegistry`]: the immutable result, shared by every conversion.
//! - [`KnownTypes`]: per-call table of classes that type hints may name.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, schemas can be submitted next to the
//! type they describe with [`submit_schema!`] and collected later by
//! [`RegistryBuilder::auto_register`]. Collection relies on the [`inventory`]
//! crate and therefore on link-time constructors, which the major platforms
//! support.
//!
//! [`submit_schema!`]: crate::submit_schema
//! [`inventory`]: https://docs.rs/inventory

mod builder;
mod error;
mod known_types;
mod schema;
mod type_registry;

pub use builder::RegistryBuilder;
pub use error::RegistryError;
pub use known_types::KnownTypes;
pub use schema::ClassSchema;
pub use type_registry::TypeRegistry;
