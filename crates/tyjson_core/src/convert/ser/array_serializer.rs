use super::driver::SerializeRun;

use crate::convert::ConvertError;
use crate::{PlainValue, TypeTag, TypedValue};

impl SerializeRun<'_> {
    /// Writes an array nested `depth` times.
    ///
    /// Elements keep their positions: absent or failed ones become `null`.
    pub fn array(
        &mut self,
        items: &[TypedValue],
        element: &TypeTag,
        depth: usize,
    ) -> Result<PlainValue, ConvertError> {
        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.cx.enter_index(index);
            let result = if depth > 1 {
                match item {
                    TypedValue::Array(inner) => self.array(inner, element, depth - 1).map(Some),
                    TypedValue::Null => Ok(None),
                    other => self.mismatch("array", other),
                }
            } else {
                self.value(Some(item), element)
            };
            self.cx.leave();
            output.push(result?.unwrap_or(PlainValue::Null));
        }
        Ok(PlainValue::Array(output))
    }
}
