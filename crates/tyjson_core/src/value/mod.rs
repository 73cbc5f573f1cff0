//! The typed side of a conversion.
//!
//! - [`TypedValue`]: a value whose shape is known, including class identity.
//! - [`Object`]: implemented by every registered class.
//! - [`FieldValue`]: conversion between Rust field types and [`TypedValue`].
//! - [`impl_object!`](crate::impl_object): implements both for a plain struct.
//! - [`DynamicObject`]: a map-backed [`Object`] without a dedicated struct.
//! - [`TypedSet`] and [`TypedMap`]: insertion-ordered containers.

// -----------------------------------------------------------------------------
// Modules

mod dynamic_object;
mod field_value;
mod key_index;
mod object;
mod regexp;
mod typed_map;
mod typed_set;
mod typed_value;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic_object::DynamicObject;
pub use field_value::FieldValue;
pub use object::{AsAny, Object};
pub use regexp::RegExp;
pub use typed_map::TypedMap;
pub use typed_set::TypedSet;
pub use typed_value::TypedValue;

pub(crate) use typed_value::{same_value, value_hash};
