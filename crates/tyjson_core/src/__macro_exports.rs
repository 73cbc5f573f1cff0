//! Items used by the macros of this crate. Not public API.

#[cfg(feature = "auto_register")]
pub use inventory;

#[cfg(feature = "auto_register")]
pub use auto_register::SchemaRegistration;

#[cfg(feature = "auto_register")]
mod auto_register {
    use crate::ClassSchema;

    /// A schema submitted with [`submit_schema!`](crate::submit_schema).
    pub struct SchemaRegistration(pub fn() -> ClassSchema);

    inventory::collect!(SchemaRegistration);
}

/// Submits a [`ClassSchema`] for [`RegistryBuilder::auto_register`].
///
/// Accepts the path of a `fn() -> ClassSchema`, or an expression building
/// the schema. Expands to nothing without the `auto_register` feature.
///
/// # Examples
///
/// ```
/// use tyjson_core::{ClassSchema, Ctor, RegistryBuilder, TypeTag, submit_schema};
///
/// struct Badge;
///
/// submit_schema!(ClassSchema::dynamic::<Badge>().field("label", TypeTag::STRING));
///
/// let mut builder = RegistryBuilder::new();
/// builder.auto_register().unwrap();
/// let registry = builder.build().unwrap();
///
/// # #[cfg(feature = "auto_register")]
/// assert!(registry.is_registered(Ctor::of::<Badge>()));
/// ```
///
/// [`ClassSchema`]: crate::ClassSchema
/// [`RegistryBuilder::auto_register`]: crate::RegistryBuilder::auto_register
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_schema {
    (fn $schema:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::__macro_exports::SchemaRegistration($schema)
        }
    };
    ($schema:expr) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::__macro_exports::SchemaRegistration(|| $schema)
        }
    };
}

#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! submit_schema {
    ($($tt:tt)*) => {};
}
