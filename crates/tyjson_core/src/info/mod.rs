//! Static metadata: type tags and the descriptors kept by the registry.
//!
//! - [`TypeTag`]: shape of a value, recursively including element types.
//! - [`MemberDescriptor`]: one declared field of a registered class.
//! - [`ClassDescriptor`]: one registered class, its members and known subtypes.

// -----------------------------------------------------------------------------
// Modules

mod class;
mod member;
mod type_tag;

// -----------------------------------------------------------------------------
// Exports

pub use class::{ClassDescriptor, ObjectFactory};
pub use member::{MemberDeserializeFn, MemberDescriptor, MemberSerializeFn};
pub use type_tag::{ScalarKind, TypeTag};
