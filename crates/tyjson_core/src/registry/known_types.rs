use std::fmt;
use std::sync::Arc;

use tyjson_utils::TypeIdMap;
use tyjson_utils::hash::HashMap;

use crate::resolve::{NameResolver, ShortTypeName};
use crate::{ConvertError, Ctor};

// -----------------------------------------------------------------------------
// KnownTypes

/// Table of the classes a type hint may name during one conversion.
///
/// Names come from a [`NameResolver`]. Two different classes resolving to the
/// same name make that name ambiguous: it is dropped from the lookup, and
/// resolving it fails with [`ConvertError::AmbiguousTypeName`].
///
/// The table is built once per top-level call and never changes afterwards.
///
/// # Examples
///
/// ```
/// use tyjson_core::{Ctor, KnownTypes};
///
/// mod land { pub struct Lion; }
/// mod sea { pub struct Lion; }
/// struct Seal;
///
/// let mut known = KnownTypes::default();
/// known.insert(Ctor::of::<Seal>()).unwrap();
/// known.insert(Ctor::of::<land::Lion>()).unwrap();
/// assert!(known.insert(Ctor::of::<sea::Lion>()).is_err());
///
/// assert_eq!(known.resolve("Seal").unwrap(), Ctor::of::<Seal>());
/// assert!(known.is_ambiguous("Lion"));
/// assert!(known.resolve("Lion").is_err());
/// ```
#[derive(Clone)]
pub struct KnownTypes {
    by_name: HashMap<String, Ctor>,
    names: TypeIdMap<String>,
    ambiguous: HashMap<String, (Ctor, Ctor)>,
    resolver: Arc<dyn NameResolver>,
}

impl Default for KnownTypes {
    fn default() -> Self {
        Self::new(Arc::new(ShortTypeName))
    }
}

impl KnownTypes {
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self {
            by_name: HashMap::default(),
            names: TypeIdMap::new(),
            ambiguous: HashMap::default(),
            resolver,
        }
    }

    /// Adds a class under its resolved name.
    ///
    /// Adding the same class twice does nothing.
    ///
    /// # Errors
    ///
    /// [`ConvertError::AmbiguousTypeName`] if the name is already taken by
    /// another class. The name is ambiguous from then on.
    pub fn insert(&mut self, ctor: Ctor) -> Result<(), ConvertError> {
        if self.names.contains(&ctor.id()) {
            return Ok(());
        }
        let name = self.resolver.resolve_name(ctor);
        self.names.insert(ctor.id(), name.clone());

        if self.ambiguous.contains_key(&name) {
            return Ok(());
        }
        match self.by_name.remove(&name) {
            Some(first) => {
                self.ambiguous.insert(name.clone(), (first, ctor));
                Err(ConvertError::AmbiguousTypeName {
                    name,
                    first,
                    second: ctor,
                })
            }
            None => {
                self.by_name.insert(name, ctor);
                Ok(())
            }
        }
    }

    /// Returns the class registered under `name`.
    ///
    /// # Errors
    ///
    /// [`ConvertError::AmbiguousTypeName`] for an ambiguous name,
    /// [`ConvertError::UnresolvableConstructor`] for an unknown one.
    pub fn resolve(&self, name: &str) -> Result<Ctor, ConvertError> {
        if let Some(&ctor) = self.by_name.get(name) {
            return Ok(ctor);
        }
        match self.ambiguous.get(name) {
            Some(&(first, second)) => Err(ConvertError::AmbiguousTypeName {
                name: name.to_owned(),
                first,
                second,
            }),
            None => Err(ConvertError::unresolvable(name)),
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<Ctor> {
        self.by_name.get(name).copied()
    }

    /// Returns the name written in type hints for `ctor`.
    pub fn name_for(&self, ctor: Ctor) -> String {
        match self.names.get(&ctor.id()) {
            Some(name) => name.clone(),
            None => self.resolver.resolve_name(ctor),
        }
    }

    #[inline]
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous.contains_key(name)
    }

    /// Returns `true` if `ctor` was added, even under an ambiguous name.
    #[inline]
    pub fn contains(&self, ctor: Ctor) -> bool {
        self.names.contains(&ctor.id())
    }

    /// Number of names that resolve to a class.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl fmt::Debug for KnownTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnownTypes")
            .field("by_name", &self.by_name)
            .field("ambiguous", &self.ambiguous)
            .finish_non_exhaustive()
    }
}
