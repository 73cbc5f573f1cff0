use std::fmt::{self, Write};
use std::sync::Arc;

use crate::convert::{ConvertError, Settings};
use crate::resolve::{HintKeyEmitter, HintKeyResolver, TypeHintEmitter, TypeResolver};
use crate::{Ctor, KnownTypes, TypeRegistry, TypeTag};

// -----------------------------------------------------------------------------
// PathStack

#[derive(Debug, Clone)]
enum Segment {
    Member(String),
    Index(usize),
    MapKey(usize),
    MapValue(usize),
}

/// Location of the value being converted, rendered as `$.pets[1].name`.
///
/// Map entries render as `{index}.key` and `{index}.value`.
#[derive(Debug, Default, Clone)]
pub(crate) struct PathStack {
    stack: Vec<Segment>,
}

impl PathStack {
    #[inline]
    fn push(&mut self, segment: Segment) {
        self.stack.push(segment);
    }

    #[inline]
    fn pop(&mut self) {
        self.stack.pop();
    }
}

impl fmt::Display for PathStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('$')?;
        for segment in &self.stack {
            match segment {
                Segment::Member(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::MapKey(index) => write!(f, "{{{index}}}.key")?,
                Segment::MapValue(index) => write!(f, "{{{index}}}.value")?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// ConvertContext

/// State of one top-level conversion call.
pub(crate) struct ConvertContext<'a> {
    pub registry: &'a TypeRegistry,
    pub settings: &'a Settings,
    pub resolver: Arc<dyn TypeResolver>,
    pub emitter: Arc<dyn TypeHintEmitter>,
    path: PathStack,
    errors: Vec<ConvertError>,
}

impl<'a> ConvertContext<'a> {
    pub fn new(registry: &'a TypeRegistry, settings: &'a Settings) -> Self {
        let key = settings.type_hint_key.clone();
        Self {
            registry,
            settings,
            resolver: match &settings.type_resolver {
                Some(resolver) => Arc::clone(resolver),
                None => Arc::new(HintKeyResolver::new(key.clone())),
            },
            emitter: match &settings.type_hint_emitter {
                Some(emitter) => Arc::clone(emitter),
                None => Arc::new(HintKeyEmitter::new(key)),
            },
            path: PathStack::default(),
            errors: Vec::new(),
        }
    }

    /// Fails if any class in `tag` is not explicitly registered.
    pub fn check_root(&self, tag: &TypeTag) -> Result<(), ConvertError> {
        let mut unregistered = None;
        tag.for_each_ctor(&mut |ctor| {
            if unregistered.is_none() && !self.registry.is_registered(ctor) {
                unregistered = Some(ctor);
            }
        });
        match unregistered {
            Some(ctor) => Err(ConvertError::UnregisteredRootType { ctor }),
            None => Ok(()),
        }
    }

    /// Builds the known-types table for a conversion rooted at `tag`.
    ///
    /// Ambiguous names are reported.
    pub fn known_types_for(&mut self, tag: &TypeTag) -> Result<KnownTypes, ConvertError> {
        let mut known = KnownTypes::new(Arc::clone(&self.settings.name_resolver));
        let mut roots = Vec::new();
        tag.for_each_ctor(&mut |ctor| roots.push(ctor));

        let settings = self.settings;
        let registry = self.registry;
        let subtypes = roots
            .iter()
            .filter_map(|&root| registry.lookup(root))
            .flat_map(|class| class.known_subtypes().iter().copied());

        let candidates: Vec<Ctor> = settings.known_types.iter().copied().chain(subtypes).collect();
        for ctor in candidates {
            if let Err(error) = known.insert(ctor) {
                self.report(error)?;
            }
        }
        Ok(known)
    }

    // -------------------------------------------------------------------------
    // Path

    #[inline]
    pub fn enter_member(&mut self, key: &str) {
        self.path.push(Segment::Member(key.to_owned()));
    }

    #[inline]
    pub fn enter_index(&mut self, index: usize) {
        self.path.push(Segment::Index(index));
    }

    #[inline]
    pub fn enter_map_key(&mut self, index: usize) {
        self.path.push(Segment::MapKey(index));
    }

    #[inline]
    pub fn enter_map_value(&mut self, index: usize) {
        self.path.push(Segment::MapValue(index));
    }

    #[inline]
    pub fn leave(&mut self) {
        self.path.pop();
    }

    // -------------------------------------------------------------------------
    // Errors

    /// Stamps the current path into `error`, records it and asks the handler
    /// whether to go on.
    pub fn report(&mut self, mut error: ConvertError) -> Result<(), ConvertError> {
        let path = &self.path;
        error.locate(|| path.to_string());
        let verdict = self.settings.error_handler.handle(&error);
        self.errors.push(error);
        verdict
    }

    #[inline]
    pub fn into_errors(self) -> Vec<ConvertError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::ConvertContext;
    use crate::{ConvertError, Settings, TypeRegistry};

    #[test]
    fn path_rendering() {
        let registry = TypeRegistry::default();
        let settings = Settings::default();
        let mut cx = ConvertContext::new(&registry, &settings);

        cx.enter_member("pets");
        cx.enter_index(1);
        cx.enter_member("scores");
        cx.enter_map_value(0);
        cx.report(ConvertError::custom("boom")).unwrap();
        cx.leave();
        cx.leave();
        cx.report(ConvertError::custom("bang")).unwrap();

        let errors = cx.into_errors();
        assert_eq!(errors[0].path(), "$.pets[1].scores{0}.value");
        assert_eq!(errors[1].path(), "$.pets[1]");
    }
}
