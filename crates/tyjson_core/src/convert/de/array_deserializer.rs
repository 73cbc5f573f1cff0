use super::driver::DeserializeRun;

use crate::convert::ConvertError;
use crate::{PlainValue, TypeTag, TypedValue};

impl DeserializeRun<'_, '_> {
    /// Reads an array nested `depth` times. Failed elements become `Null`.
    pub fn array(
        &mut self,
        items: &[PlainValue],
        element: &TypeTag,
        depth: usize,
    ) -> Result<Vec<TypedValue>, ConvertError> {
        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.cx.enter_index(index);
            let result = if depth > 1 {
                match item {
                    PlainValue::Array(inner) => self
                        .array(inner, element, depth - 1)
                        .map(|inner| Some(TypedValue::Array(inner))),
                    PlainValue::Null => Ok(None),
                    other => self.mismatch("array", other),
                }
            } else {
                self.value(item, element)
            };
            self.cx.leave();
            output.push(result?.unwrap_or(TypedValue::Null));
        }
        Ok(output)
    }
}
