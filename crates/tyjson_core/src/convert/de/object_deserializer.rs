use super::driver::DeserializeRun;

use crate::convert::ConvertError;
use crate::info::MemberDescriptor;
use crate::value::Object;
use crate::{Ctor, PlainObject, PlainValue};

impl DeserializeRun<'_, '_> {
    /// Resolves the class of `plain`, instantiates it and assigns every
    /// member found.
    ///
    /// `Ok(None)` if the class cannot be resolved or is not registered.
    pub fn object(&mut self, plain: &PlainObject, expected: Ctor) -> Result<Option<Box<dyn Object>>, ConvertError> {
        let resolved = match self.cx.resolver.resolve_constructor(plain, expected, self.known) {
            Ok(ctor) => ctor,
            Err(error) => return self.cx.report(error).map(|()| None),
        };

        let registry = self.cx.registry;
        let class = registry
            .lookup(resolved)
            .filter(|class| class.is_explicitly_registered());
        let Some((class, mut instance)) = class.and_then(|class| Some((class, class.instantiate()?))) else {
            let error = ConvertError::unresolvable(self.known.name_for(resolved));
            return self.cx.report(error).map(|()| None);
        };

        for member in class.members() {
            self.cx.enter_member(member.serialized_name());
            let result = self.member(&mut *instance, member, plain.get(member.serialized_name()));
            self.cx.leave();
            result?;
        }

        instance.on_deserialized();
        Ok(Some(instance))
    }

    fn member(
        &mut self,
        instance: &mut dyn Object,
        member: &MemberDescriptor,
        plain: Option<&PlainValue>,
    ) -> Result<(), ConvertError> {
        let Some(plain) = plain else {
            if member.is_required() {
                self.cx.report(ConvertError::MissingRequiredMember {
                    class: instance.ctor(),
                    member: member.key().to_owned(),
                    path: String::new(),
                })?;
            }
            return Ok(());
        };

        let value = match member.deserializer() {
            Some(deserialize) => match deserialize(plain) {
                Ok(value) => Some(value),
                Err(error) => return self.cx.report(error),
            },
            None => self.value(plain, member.type_tag())?,
        };

        if let Some(value) = value
            && let Err(error) = instance.set_field(member.key(), value)
        {
            self.cx.report(error)?;
        }
        Ok(())
    }
}
