use super::driver::SerializeRun;

use crate::convert::ConvertError;
use crate::convert::scalar::default_plain;
use crate::info::MemberDescriptor;
use crate::value::Object;
use crate::{Ctor, PlainObject, PlainValue, TypedValue};

impl SerializeRun<'_> {
    /// Writes the members of `object` and its type hint.
    ///
    /// The member list is the runtime class's when that class is registered,
    /// the expected class's otherwise.
    pub fn object(&mut self, object: &dyn Object, expected: Ctor) -> Result<PlainValue, ConvertError> {
        let registry = self.cx.registry;
        let actual = object.ctor();
        let class = if actual != expected && registry.is_registered(actual) {
            registry.lookup(actual)
        } else {
            registry.lookup(expected)
        };

        let mut target = PlainObject::new();
        for member in class.into_iter().flat_map(|class| class.members()) {
            let name = member.serialized_name();
            self.cx.enter_member(name);
            let result = self.member(object, member);
            self.cx.leave();
            if let Some(plain) = result? {
                target.insert(name.to_owned(), plain);
            }
        }

        self.cx
            .emitter
            .emit_type_hint(&mut target, object, expected, &self.known);
        Ok(PlainValue::Object(target))
    }

    fn member(&mut self, object: &dyn Object, member: &MemberDescriptor) -> Result<Option<PlainValue>, ConvertError> {
        let value = match object.field(member.key()) {
            Some(TypedValue::Null) if !self.cx.settings.preserve_null => None,
            value => value,
        };

        let Some(value) = value else {
            return Ok(member
                .emit_default_value()
                .then(|| default_plain(member.type_tag(), self.cx.settings.map_shape)));
        };

        match member.serializer() {
            Some(serialize) => match serialize(&value) {
                Ok(plain) => Ok(Some(plain)),
                Err(error) => self.cx.report(error).map(|()| None),
            },
            None => self.value(Some(&value), member.type_tag()),
        }
    }
}
