use thiserror::Error;

use crate::Ctor;

// -----------------------------------------------------------------------------
// RegistryError

/// Error raised while registering classes or building the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("member `{member}` of `{class}` declares the container type `{ctor:?}` as an object")]
    ContainerDeclaredAsObject {
        class: Ctor,
        member: String,
        ctor: Ctor,
    },

    #[error("`{class}` extends `{base}`, which is not registered")]
    UnknownBase { class: Ctor, base: Ctor },

    #[error("inheritance cycle through `{class}`")]
    InheritanceCycle { class: Ctor },

    #[error("`{subtype}` is declared as a known subtype of `{class}` but is not registered")]
    NotRegistered { class: Ctor, subtype: Ctor },
}
