use super::driver::DeserializeRun;

use crate::convert::ConvertError;
use crate::{PlainValue, TypeTag, TypedSet};

impl DeserializeRun<'_, '_> {
    /// Reads a set from an array, skipping failed elements.
    pub fn set(&mut self, items: &[PlainValue], element: &TypeTag) -> Result<TypedSet, ConvertError> {
        let mut output = TypedSet::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.cx.enter_index(index);
            let result = self.value(item, element);
            self.cx.leave();
            if let Some(value) = result? {
                output.insert(value);
            }
        }
        Ok(output)
    }
}
