use super::driver::DeserializeRun;

use crate::convert::{ConvertError, MapShape};
use crate::{PlainObject, PlainValue, ScalarKind, TypeTag, TypedMap, TypedValue};

impl DeserializeRun<'_, '_> {
    /// Reads a map from `[key, value]` pairs, or from an object under
    /// [`MapShape::Object`].
    ///
    /// `Ok(None)` for `null` or a value of the wrong shape.
    pub fn map(
        &mut self,
        plain: &PlainValue,
        key: &TypeTag,
        value: &TypeTag,
    ) -> Result<Option<TypedMap>, ConvertError> {
        let accepts_object = self.cx.settings.map_shape == MapShape::Object;
        match plain {
            PlainValue::Array(entries) => self.map_from_pairs(entries, key, value).map(Some),
            PlainValue::Object(entries) if accepts_object => self.map_from_object(entries, key, value),
            PlainValue::Null => Ok(None),
            other if accepts_object => self.mismatch("map array or object", other),
            other => self.mismatch("map", other),
        }
    }

    /// Entries with a failed key are left out, a failed value becomes `Null`.
    fn map_from_pairs(
        &mut self,
        entries: &[PlainValue],
        key: &TypeTag,
        value: &TypeTag,
    ) -> Result<TypedMap, ConvertError> {
        let mut output = TypedMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let pair = match entry {
                PlainValue::Array(pair) if pair.len() == 2 => pair,
                PlainValue::Array(pair) => {
                    self.cx.enter_index(index);
                    let error = ConvertError::shape_mismatch(
                        "[key, value] pair",
                        format!("array of length {}", pair.len()),
                    );
                    let verdict = self.cx.report(error);
                    self.cx.leave();
                    verdict?;
                    continue;
                }
                other => {
                    self.cx.enter_index(index);
                    let verdict = self.mismatch::<()>("[key, value] pair", other);
                    self.cx.leave();
                    verdict?;
                    continue;
                }
            };

            self.cx.enter_map_key(index);
            let typed_key = self.value(&pair[0], key);
            self.cx.leave();
            let Some(typed_key) = typed_key? else {
                continue;
            };

            self.cx.enter_map_value(index);
            let typed_value = self.value(&pair[1], value);
            self.cx.leave();
            output.insert(typed_key, typed_value?.unwrap_or(TypedValue::Null));
        }
        Ok(output)
    }

    /// Object keys are read as strings, so the key type must be `string`.
    fn map_from_object(
        &mut self,
        entries: &PlainObject,
        key: &TypeTag,
        value: &TypeTag,
    ) -> Result<Option<TypedMap>, ConvertError> {
        if *key != TypeTag::Scalar(ScalarKind::String) {
            let error = ConvertError::shape_mismatch(format!("map with {key} keys"), "object");
            return self.cx.report(error).map(|()| None);
        }

        let mut output = TypedMap::with_capacity(entries.len());
        for (name, item) in entries {
            self.cx.enter_member(name);
            let typed_value = self.value(item, value);
            self.cx.leave();
            if let Some(typed_value) = typed_value? {
                output.insert(TypedValue::String(name.clone()), typed_value);
            }
        }
        Ok(Some(output))
    }
}
