use super::driver::SerializeRun;

use crate::convert::ConvertError;
use crate::{PlainValue, TypeTag, TypedSet};

impl SerializeRun<'_> {
    /// Writes a set as an array in iteration order, leaving out failed elements.
    pub fn set(&mut self, values: &TypedSet, element: &TypeTag) -> Result<PlainValue, ConvertError> {
        let mut output = Vec::with_capacity(values.len());
        for (index, item) in values.iter().enumerate() {
            self.cx.enter_index(index);
            let result = self.value(Some(item), element);
            self.cx.leave();
            output.extend(result?);
        }
        Ok(PlainValue::Array(output))
    }
}
