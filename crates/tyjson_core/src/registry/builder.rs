use log::{debug, warn};
use tyjson_utils::TypeIdMap;
use tyjson_utils::hash::HashSet;

use crate::info::{ClassDescriptor, MemberDescriptor, ObjectFactory};
use crate::registry::{ClassSchema, RegistryError, TypeRegistry};
use crate::{Ctor, TypeTag};

// -----------------------------------------------------------------------------
// RegistryBuilder

/// Mutable registration phase of a [`TypeRegistry`].
///
/// Classes are created on first mention, so a member may be declared before
/// its owner is marked as registered. Only explicitly registered classes can
/// be used as roots of a conversion.
///
/// # Examples
///
/// ```
/// use tyjson_core::{Ctor, RegistryBuilder, TypeTag};
/// use tyjson_core::info::MemberDescriptor;
///
/// struct Note;
///
/// let mut builder = RegistryBuilder::new();
/// let note = Ctor::of::<Note>();
/// builder.register_member(note, MemberDescriptor::new("text", TypeTag::STRING)).unwrap();
///
/// // Re-declaring a member with a container shape is allowed but flagged.
/// builder
///     .register_member(note, MemberDescriptor::new("text", TypeTag::array_of(TypeTag::STRING)))
///     .unwrap();
/// assert_eq!(builder.conflicts(), 1);
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    classes: TypeIdMap<ClassDescriptor>,
    order: Vec<Ctor>,
    conflicts: usize,
}

impl RegistryBuilder {
    #[inline]
    pub const fn new() -> Self {
        Self {
            classes: TypeIdMap::new(),
            order: Vec::new(),
            conflicts: 0,
        }
    }

    fn class_mut(&mut self, ctor: Ctor) -> &mut ClassDescriptor {
        let order = &mut self.order;
        self.classes.get_or_insert(ctor.id(), || {
            order.push(ctor);
            ClassDescriptor::new(ctor)
        })
    }

    /// Number of member overwrites that switched between a container and a
    /// non-container shape.
    #[inline]
    pub fn conflicts(&self) -> usize {
        self.conflicts
    }

    /// Adds or overwrites a member of `ctor`, returning the replaced one.
    ///
    /// # Errors
    ///
    /// [`RegistryError::ContainerDeclaredAsObject`] if the member's tag uses a
    /// container type as an object class, at any nesting level.
    pub fn register_member(
        &mut self,
        ctor: Ctor,
        member: MemberDescriptor,
    ) -> Result<Option<MemberDescriptor>, RegistryError> {
        check_member_tag(ctor, member.key(), member.type_tag())?;

        let class = self.class_mut(ctor);
        let conflict = class
            .member(member.key())
            .is_some_and(|old| old.shape_conflicts_with(&member));
        if conflict {
            warn!(
                "member `{}` of `{ctor}` is redeclared as `{}`, changing its container shape",
                member.key(),
                member.type_tag(),
            );
        }
        let old = class.insert_member(member);
        if conflict {
            self.conflicts += 1;
        }
        Ok(old)
    }

    /// Marks `ctor` as explicitly registered.
    pub fn mark_registered(&mut self, ctor: Ctor, factory: ObjectFactory) {
        self.class_mut(ctor).mark_registered(factory);
    }

    /// Declares `subtype` as usable wherever `ctor` is expected.
    pub fn add_known_subtype(&mut self, ctor: Ctor, subtype: Ctor) {
        self.class_mut(ctor).add_declared_subtype(subtype);
    }

    /// Makes `ctor` inherit the members of `base`.
    pub fn set_base(&mut self, ctor: Ctor, base: Ctor) {
        self.class_mut(ctor).set_base(base);
    }

    /// Registers a whole class.
    pub fn register(&mut self, schema: ClassSchema) -> Result<&mut Self, RegistryError> {
        let parts = schema.into_parts();
        let ctor = parts.ctor;

        for member in &parts.members {
            check_member_tag(ctor, member.key(), member.type_tag())?;
        }
        for member in parts.members {
            self.register_member(ctor, member)?;
        }
        for subtype in parts.known_subtypes {
            self.add_known_subtype(ctor, subtype);
        }
        if let Some(base) = parts.base {
            self.set_base(ctor, base);
        }
        self.mark_registered(ctor, parts.factory);
        Ok(self)
    }

    /// Registers every schema submitted with [`submit_schema!`].
    ///
    /// Returns the number of schemas found, always zero without the
    /// `auto_register` feature.
    ///
    /// [`submit_schema!`]: crate::submit_schema
    pub fn auto_register(&mut self) -> Result<usize, RegistryError> {
        #[cfg(feature = "auto_register")]
        {
            let mut count = 0;
            for registration in inventory::iter::<crate::__macro_exports::SchemaRegistration> {
                self.register((registration.0)())?;
                count += 1;
            }
            debug!("auto-registered {count} schemas");
            Ok(count)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            Ok(0)
        }
    }

    /// Finishes registration.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotRegistered`] for a declared subtype that was never registered.
    /// - [`RegistryError::UnknownBase`] for a base class that was never registered.
    /// - [`RegistryError::InheritanceCycle`] if a class is its own ancestor.
    pub fn build(mut self) -> Result<TypeRegistry, RegistryError> {
        self.check_declared_subtypes()?;
        self.check_bases()?;
        self.merge_inherited()?;

        let closures: Vec<(Ctor, Vec<Ctor>)> = self
            .order
            .iter()
            .map(|&ctor| (ctor, self.subtype_closure(ctor)))
            .collect();
        for (ctor, closure) in closures {
            if let Some(class) = self.classes.get_mut(&ctor.id()) {
                class.set_known_subtypes(closure);
            }
        }

        debug!(
            "type registry built: {} classes, {} member shape conflicts",
            self.order.len(),
            self.conflicts,
        );
        Ok(TypeRegistry::from_parts(self.classes, self.order))
    }

    // -------------------------------------------------------------------------
    // Build steps

    fn is_registered(&self, ctor: Ctor) -> bool {
        self.classes
            .get(&ctor.id())
            .is_some_and(ClassDescriptor::is_explicitly_registered)
    }

    fn check_declared_subtypes(&self) -> Result<(), RegistryError> {
        for class in self.order.iter().filter_map(|c| self.classes.get(&c.id())) {
            if let Some(&subtype) = class
                .declared_subtypes()
                .iter()
                .find(|&&subtype| !self.is_registered(subtype))
            {
                return Err(RegistryError::NotRegistered {
                    class: class.ctor(),
                    subtype,
                });
            }
        }
        Ok(())
    }

    fn check_bases(&self) -> Result<(), RegistryError> {
        for &ctor in &self.order {
            let mut seen = HashSet::<Ctor>::default();
            seen.insert(ctor);
            let mut current = ctor;
            while let Some(base) = self.classes.get(&current.id()).and_then(ClassDescriptor::base) {
                if !self.is_registered(base) {
                    return Err(RegistryError::UnknownBase { class: current, base });
                }
                if !seen.insert(base) {
                    return Err(RegistryError::InheritanceCycle { class: ctor });
                }
                current = base;
            }
        }
        Ok(())
    }

    /// Ancestors of `ctor`, root first, ending with `ctor` itself.
    fn lineage(&self, ctor: Ctor) -> Vec<Ctor> {
        let mut chain = vec![ctor];
        let mut current = ctor;
        while let Some(base) = self.classes.get(&current.id()).and_then(ClassDescriptor::base) {
            chain.push(base);
            current = base;
        }
        chain.reverse();
        chain
    }

    /// Prepends base members, inherits declared subtypes and records every
    /// derived class as a subtype of its base.
    fn merge_inherited(&mut self) -> Result<(), RegistryError> {
        let mut merged = Vec::new();
        for &ctor in &self.order {
            let lineage = self.lineage(ctor);
            if lineage.len() == 1 {
                continue;
            }
            let mut members = Vec::new();
            let mut subtypes = Vec::new();
            for ancestor in &lineage {
                if let Some(class) = self.classes.get(&ancestor.id()) {
                    members.extend(class.members().iter().cloned());
                    subtypes.extend(class.declared_subtypes().iter().copied());
                }
            }
            merged.push((ctor, lineage, members, subtypes));
        }

        for (ctor, lineage, members, subtypes) in merged {
            for pair in lineage.windows(2) {
                self.class_mut(pair[0]).add_declared_subtype(pair[1]);
            }
            let class = self.class_mut(ctor);
            class.set_members(members);
            for subtype in subtypes.into_iter().filter(|s| *s != ctor) {
                class.add_declared_subtype(subtype);
            }
        }
        self.check_declared_subtypes()
    }

    /// Direct edges of the subtype graph: declared subtypes, then every class
    /// mentioned by a member tag.
    fn direct_subtypes(class: &ClassDescriptor) -> Vec<Ctor> {
        let mut edges = class.declared_subtypes().to_vec();
        for member in class.members() {
            member.type_tag().for_each_ctor(&mut |ctor| {
                if !edges.contains(&ctor) {
                    edges.push(ctor);
                }
            });
        }
        edges
    }

    /// Reflexive transitive closure, `ctor` first, then depth-first order.
    fn subtype_closure(&self, ctor: Ctor) -> Vec<Ctor> {
        let mut closure = Vec::new();
        let mut visited = HashSet::<Ctor>::default();
        let mut stack = vec![ctor];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            closure.push(current);
            if let Some(class) = self.classes.get(&current.id()) {
                // Reversed so the first declared edge is visited first.
                stack.extend(Self::direct_subtypes(class).into_iter().rev());
            }
        }
        closure
    }
}

/// Rejects container types used as object classes.
fn check_member_tag(class: Ctor, member: &str, tag: &TypeTag) -> Result<(), RegistryError> {
    let mut offending = None;
    tag.for_each_ctor(&mut |ctor| {
        if offending.is_none() && ctor.is_container_builtin() {
            offending = Some(ctor);
        }
    });
    match offending {
        Some(ctor) => Err(RegistryError::ContainerDeclaredAsObject {
            class,
            member: member.to_owned(),
            ctor,
        }),
        None => Ok(()),
    }
}
