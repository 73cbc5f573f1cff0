use std::borrow::Cow;
use std::sync::Arc;

use crate::info::{MemberDeserializeFn, MemberDescriptor, MemberSerializeFn, ObjectFactory};
use crate::value::{DynamicObject, Object};
use crate::{Ctor, TypeTag};

// -----------------------------------------------------------------------------
// ClassSchema

/// Declarative description of one class, consumed by
/// [`RegistryBuilder::register`](crate::RegistryBuilder::register).
///
/// The modifier methods (`required`, `emit_default`, ...) apply to the member
/// added last, and do nothing if no member was added yet.
///
/// # Examples
///
/// ```
/// use tyjson_core::{ClassSchema, TypeTag};
///
/// struct Animal;
/// struct Lion;
///
/// let schema = ClassSchema::dynamic::<Lion>()
///     .extends::<Animal>()
///     .field("name", TypeTag::STRING)
///     .required()
///     .field("mane_length", TypeTag::NUMBER)
///     .serialized_as("mane");
///
/// assert_eq!(schema.members().len(), 2);
/// assert_eq!(schema.members()[1].serialized_name(), "mane");
/// ```
#[derive(Clone)]
pub struct ClassSchema {
    ctor: Ctor,
    factory: ObjectFactory,
    base: Option<Ctor>,
    members: Vec<MemberDescriptor>,
    known_subtypes: Vec<Ctor>,
}

impl ClassSchema {
    /// Schema of a struct class, instantiated with `T::default()`.
    pub fn of<T: Object + Default>() -> Self {
        Self::with_factory(Ctor::of::<T>(), Arc::new(|| Box::new(T::default()) as Box<dyn Object>))
    }

    /// Schema of a class represented by a [`DynamicObject`].
    pub fn dynamic<T: ?Sized + 'static>() -> Self {
        let ctor = Ctor::of::<T>();
        Self::with_factory(ctor, Arc::new(move || Box::new(DynamicObject::new(ctor)) as Box<dyn Object>))
    }

    /// Schema with an explicit factory.
    pub fn with_factory(ctor: Ctor, factory: ObjectFactory) -> Self {
        Self {
            ctor,
            factory,
            base: None,
            members: Vec::new(),
            known_subtypes: Vec::new(),
        }
    }

    /// Inherits the members and known subtypes of `B`.
    pub fn extends<B: ?Sized + 'static>(mut self) -> Self {
        self.base = Some(Ctor::of::<B>());
        self
    }

    /// Declares a subtype usable wherever this class is expected.
    pub fn known_subtype<S: ?Sized + 'static>(mut self) -> Self {
        let ctor = Ctor::of::<S>();
        if !self.known_subtypes.contains(&ctor) {
            self.known_subtypes.push(ctor);
        }
        self
    }

    /// Adds a prepared member descriptor.
    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Adds a member with default options.
    #[inline]
    pub fn field(self, key: impl Into<Cow<'static, str>>, type_tag: TypeTag) -> Self {
        self.member(MemberDescriptor::new(key, type_tag))
    }

    fn map_last(mut self, f: impl FnOnce(MemberDescriptor) -> MemberDescriptor) -> Self {
        if let Some(last) = self.members.pop() {
            self.members.push(f(last));
        }
        self
    }

    pub fn required(self) -> Self {
        self.map_last(MemberDescriptor::required)
    }

    pub fn emit_default(self) -> Self {
        self.map_last(MemberDescriptor::emit_default)
    }

    pub fn serialized_as(self, name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        self.map_last(|member| member.serialized_as(name))
    }

    pub fn serialize_with(self, f: MemberSerializeFn) -> Self {
        self.map_last(|member| member.serialize_with(f))
    }

    pub fn deserialize_with(self, f: MemberDeserializeFn) -> Self {
        self.map_last(|member| member.deserialize_with(f))
    }

    #[inline]
    pub fn ctor(&self) -> Ctor {
        self.ctor
    }

    #[inline]
    pub fn base(&self) -> Option<Ctor> {
        self.base
    }

    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    #[inline]
    pub fn known_subtypes(&self) -> &[Ctor] {
        &self.known_subtypes
    }

    pub(crate) fn into_parts(self) -> SchemaParts {
        SchemaParts {
            ctor: self.ctor,
            factory: self.factory,
            base: self.base,
            members: self.members,
            known_subtypes: self.known_subtypes,
        }
    }
}

pub(crate) struct SchemaParts {
    pub ctor: Ctor,
    pub factory: ObjectFactory,
    pub base: Option<Ctor>,
    pub members: Vec<MemberDescriptor>,
    pub known_subtypes: Vec<Ctor>,
}

#[cfg(test)]
mod tests {
    use super::ClassSchema;
    use crate::{Ctor, TypeTag};

    struct Sample;

    #[test]
    fn modifiers_without_member_are_ignored() {
        let schema = ClassSchema::dynamic::<Sample>().required().emit_default();
        assert!(schema.members().is_empty());
    }

    #[test]
    fn dynamic_factory_keeps_ctor() {
        let schema = ClassSchema::dynamic::<Sample>()
            .field("a", TypeTag::NUMBER)
            .emit_default()
            .known_subtype::<u8>()
            .known_subtype::<u8>();

        assert_eq!(schema.known_subtypes(), [Ctor::of::<u8>()]);
        assert!(schema.members()[0].emit_default_value());

        let parts = schema.into_parts();
        assert_eq!((parts.factory)().ctor(), Ctor::of::<Sample>());
    }
}
