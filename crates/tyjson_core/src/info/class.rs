use std::fmt;
use std::sync::Arc;

use tyjson_utils::hash::HashMap;

use crate::Ctor;
use crate::info::MemberDescriptor;
use crate::value::Object;

/// Creates a bare instance of a registered class.
pub type ObjectFactory = Arc<dyn Fn() -> Box<dyn Object> + Send + Sync>;

// -----------------------------------------------------------------------------
// ClassDescriptor

/// Registry record of one class.
///
/// Members keep insertion order, which is also the serialization order.
/// Overwriting a member by key keeps its original position.
///
/// Descriptors are created by [`RegistryBuilder`] and are immutable once the
/// [`TypeRegistry`] has been built.
///
/// [`RegistryBuilder`]: crate::registry::RegistryBuilder
/// [`TypeRegistry`]: crate::registry::TypeRegistry
#[derive(Clone)]
pub struct ClassDescriptor {
    ctor: Ctor,
    is_explicitly_registered: bool,
    factory: Option<ObjectFactory>,
    base: Option<Ctor>,
    members: Vec<MemberDescriptor>,
    member_index: HashMap<String, usize>,
    declared_subtypes: Vec<Ctor>,
    known_subtypes: Vec<Ctor>,
}

impl ClassDescriptor {
    pub(crate) fn new(ctor: Ctor) -> Self {
        Self {
            ctor,
            is_explicitly_registered: false,
            factory: None,
            base: None,
            members: Vec::new(),
            member_index: HashMap::default(),
            declared_subtypes: Vec::new(),
            known_subtypes: Vec::new(),
        }
    }

    #[inline]
    pub fn ctor(&self) -> Ctor {
        self.ctor
    }

    /// Returns `true` if the class was marked as registered, not only
    /// referenced by member declarations.
    #[inline]
    pub fn is_explicitly_registered(&self) -> bool {
        self.is_explicitly_registered
    }

    /// Returns the class this one extends, if any.
    #[inline]
    pub fn base(&self) -> Option<Ctor> {
        self.base
    }

    /// Returns the members in declaration order.
    ///
    /// After the registry is built this includes inherited members,
    /// base members first.
    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Returns the member with the given key.
    pub fn member(&self, key: &str) -> Option<&MemberDescriptor> {
        self.member_index.get(key).map(|&index| &self.members[index])
    }

    /// Returns the subtypes declared directly on this class.
    #[inline]
    pub fn declared_subtypes(&self) -> &[Ctor] {
        &self.declared_subtypes
    }

    /// Returns the reflexive transitive closure of known subtypes,
    /// starting with this class itself.
    #[inline]
    pub fn known_subtypes(&self) -> &[Ctor] {
        &self.known_subtypes
    }

    /// Creates a bare instance, or `None` if the class has no factory.
    pub fn instantiate(&self) -> Option<Box<dyn Object>> {
        self.factory.as_ref().map(|factory| factory())
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Adds or overwrites a member, returning the previous descriptor.
    pub(crate) fn insert_member(&mut self, member: MemberDescriptor) -> Option<MemberDescriptor> {
        match self.member_index.get(member.key()) {
            Some(&index) => Some(core::mem::replace(&mut self.members[index], member)),
            None => {
                self.member_index.insert(member.key().to_owned(), self.members.len());
                self.members.push(member);
                None
            }
        }
    }

    pub(crate) fn mark_registered(&mut self, factory: ObjectFactory) {
        self.is_explicitly_registered = true;
        self.factory = Some(factory);
    }

    pub(crate) fn set_base(&mut self, base: Ctor) {
        self.base = Some(base);
    }

    pub(crate) fn add_declared_subtype(&mut self, subtype: Ctor) {
        if !self.declared_subtypes.contains(&subtype) {
            self.declared_subtypes.push(subtype);
        }
    }

    /// Replaces the member list, used when inherited members are merged.
    pub(crate) fn set_members(&mut self, members: Vec<MemberDescriptor>) {
        self.member_index.clear();
        self.members.clear();
        for member in members {
            self.insert_member(member);
        }
    }

    pub(crate) fn set_known_subtypes(&mut self, closure: Vec<Ctor>) {
        self.known_subtypes = closure;
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("ctor", &self.ctor)
            .field("is_explicitly_registered", &self.is_explicitly_registered)
            .field("base", &self.base)
            .field("members", &self.members)
            .field("known_subtypes", &self.known_subtypes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::ClassDescriptor;
    use crate::info::MemberDescriptor;
    use crate::{Ctor, TypeTag};

    struct Sample;

    #[test]
    fn overwrite_keeps_position() {
        let mut class = ClassDescriptor::new(Ctor::of::<Sample>());
        class.insert_member(MemberDescriptor::new("a", TypeTag::NUMBER));
        class.insert_member(MemberDescriptor::new("b", TypeTag::STRING));
        let old = class.insert_member(MemberDescriptor::new("a", TypeTag::BOOLEAN).required());

        assert_eq!(old.map(|m| m.type_tag().clone()), Some(TypeTag::NUMBER));
        let keys: Vec<_> = class.members().iter().map(|m| m.key()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert!(class.member("a").is_some_and(|m| m.is_required()));
    }
}
