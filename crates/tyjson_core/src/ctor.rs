use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::value::{TypedMap, TypedSet, TypedValue};

// -----------------------------------------------------------------------------
// Ctor

/// Identity of a class, the "constructor" of an object.
///
/// A class is represented by a Rust type. Two `Ctor`s are equal exactly when
/// they were created from the same type; the type path and short name are
/// carried along for naming and diagnostics.
///
/// # Examples
///
/// ```
/// use tyjson_core::Ctor;
///
/// mod zoo {
///     pub struct Lion;
/// }
///
/// let ctor = Ctor::of::<zoo::Lion>();
/// assert_eq!(ctor.name(), "Lion");
/// assert!(ctor.path().ends_with("zoo::Lion"));
/// assert_eq!(ctor, Ctor::of::<zoo::Lion>());
/// ```
#[derive(Clone, Copy)]
pub struct Ctor {
    id: TypeId,
    path: &'static str,
    name: &'static str,
}

impl Ctor {
    /// Returns the constructor for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        let path = type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            path,
            name: short_name(path),
        }
    }

    /// Returns the [`TypeId`] of the underlying type.
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path, e.g. `my_crate::zoo::Lion`.
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the short type name, e.g. `Lion`.
    ///
    /// This is the default name written into type hints.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this constructor names a standard container type.
    ///
    /// Containers have dedicated type tags and may never be declared as
    /// plain objects.
    pub fn is_container_builtin(&self) -> bool {
        if self.id == TypeId::of::<TypedSet>()
            || self.id == TypeId::of::<TypedMap>()
            || self.id == TypeId::of::<Vec<TypedValue>>()
        {
            return true;
        }

        let base = strip_generics(self.path);
        base.starts_with('[')
            || base.starts_with("&[")
            || CONTAINER_PATHS.iter().any(|p| base == *p)
    }
}

const CONTAINER_PATHS: &[&str] = &[
    "alloc::vec::Vec",
    "alloc::collections::vec_deque::VecDeque",
    "alloc::collections::linked_list::LinkedList",
    "alloc::collections::btree::set::BTreeSet",
    "alloc::collections::btree::map::BTreeMap",
    "std::collections::hash::set::HashSet",
    "std::collections::hash::map::HashMap",
    "hashbrown::set::HashSet",
    "hashbrown::map::HashMap",
];

#[inline]
fn strip_generics(path: &'static str) -> &'static str {
    match path.find('<') {
        Some(index) => &path[..index],
        None => path,
    }
}

fn short_name(path: &'static str) -> &'static str {
    let base = strip_generics(path);
    match base.rfind("::") {
        Some(index) => &base[index + 2..],
        None => base,
    }
}

// -----------------------------------------------------------------------------
// Traits

impl PartialEq for Ctor {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Ctor {}

impl Hash for Ctor {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Ctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ctor({})", self.path)
    }
}

impl fmt::Display for Ctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::Ctor;
    use std::collections::{BTreeMap, HashSet};

    struct Plain;
    struct Wrapper<T>(T);

    #[test]
    fn short_names() {
        assert_eq!(Ctor::of::<Plain>().name(), "Plain");
        assert_eq!(Ctor::of::<Wrapper<Plain>>().name(), "Wrapper");
        assert_eq!(Ctor::of::<u32>().name(), "u32");
    }

    #[test]
    fn container_detection() {
        assert!(Ctor::of::<Vec<u8>>().is_container_builtin());
        assert!(Ctor::of::<[u8; 4]>().is_container_builtin());
        assert!(Ctor::of::<HashSet<String>>().is_container_builtin());
        assert!(Ctor::of::<BTreeMap<String, u8>>().is_container_builtin());
        assert!(Ctor::of::<crate::TypedSet>().is_container_builtin());
        assert!(!Ctor::of::<Plain>().is_container_builtin());
        assert!(!Ctor::of::<Wrapper<Vec<u8>>>().is_container_builtin());
    }

    #[test]
    fn identity_ignores_name() {
        mod a {
            pub struct Same;
        }
        mod b {
            pub struct Same;
        }
        let first = Ctor::of::<a::Same>();
        let second = Ctor::of::<b::Same>();
        assert_eq!(first.name(), second.name());
        assert_ne!(first, second);
    }
}
