use tyjson_utils::TypeIdMap;

use crate::Ctor;
use crate::info::ClassDescriptor;

// -----------------------------------------------------------------------------
// TypeRegistry

/// The immutable store of class descriptors.
///
/// Produced by [`RegistryBuilder::build`], after which inheritance is merged
/// and every class's known-subtype closure is computed. The registry is
/// `Send + Sync` and is usually shared through an `Arc`.
///
/// # Examples
///
/// ```
/// use tyjson_core::{ClassSchema, Ctor, RegistryBuilder, TypeTag};
///
/// struct Animal;
/// struct Dog;
///
/// let mut builder = RegistryBuilder::new();
/// builder
///     .register(ClassSchema::dynamic::<Animal>().field("name", TypeTag::STRING))
///     .unwrap()
///     .register(ClassSchema::dynamic::<Dog>().extends::<Animal>())
///     .unwrap();
/// let registry = builder.build().unwrap();
///
/// let dog = registry.lookup(Ctor::of::<Dog>()).unwrap();
/// assert!(dog.member("name").is_some());
///
/// let animal = registry.lookup(Ctor::of::<Animal>()).unwrap();
/// assert_eq!(animal.known_subtypes(), [Ctor::of::<Animal>(), Ctor::of::<Dog>()]);
/// ```
///
/// [`RegistryBuilder::build`]: crate::RegistryBuilder::build
#[derive(Debug, Default)]
pub struct TypeRegistry {
    classes: TypeIdMap<ClassDescriptor>,
    order: Vec<Ctor>,
}

impl TypeRegistry {
    pub(crate) fn from_parts(classes: TypeIdMap<ClassDescriptor>, order: Vec<Ctor>) -> Self {
        Self { classes, order }
    }

    /// Returns the descriptor of `ctor`, registered or only referenced.
    #[inline]
    pub fn lookup(&self, ctor: Ctor) -> Option<&ClassDescriptor> {
        self.classes.get(&ctor.id())
    }

    /// Returns `true` if the registry holds any descriptor for `ctor`.
    #[inline]
    pub fn contains(&self, ctor: Ctor) -> bool {
        self.classes.contains(&ctor.id())
    }

    /// Returns `true` if `ctor` was explicitly registered.
    pub fn is_registered(&self, ctor: Ctor) -> bool {
        self.lookup(ctor)
            .is_some_and(ClassDescriptor::is_explicitly_registered)
    }

    /// Iterates descriptors in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.order.iter().filter_map(|ctor| self.lookup(*ctor))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
