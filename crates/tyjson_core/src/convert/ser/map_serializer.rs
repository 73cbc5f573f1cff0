use super::driver::SerializeRun;

use crate::convert::{ConvertError, MapShape};
use crate::{PlainObject, PlainValue, ScalarKind, TypeTag, TypedMap, TypedValue};

impl SerializeRun<'_> {
    /// Writes a map as `[key, value]` pairs, or as an object under
    /// [`MapShape::Object`] when every key is a string.
    pub fn map(&mut self, map: &TypedMap, key: &TypeTag, value: &TypeTag) -> Result<PlainValue, ConvertError> {
        let string_keys = *key == TypeTag::Scalar(ScalarKind::String)
            && map.keys().all(|k| matches!(k, TypedValue::String(_)));
        if self.cx.settings.map_shape == MapShape::Object && string_keys {
            self.map_as_object(map, value)
        } else {
            self.map_as_pairs(map, key, value)
        }
    }

    /// Entries whose key fails are left out; a failed value becomes `null`.
    fn map_as_pairs(&mut self, map: &TypedMap, key: &TypeTag, value: &TypeTag) -> Result<PlainValue, ConvertError> {
        let mut output = Vec::with_capacity(map.len());
        for (index, (k, v)) in map.iter().enumerate() {
            self.cx.enter_map_key(index);
            let plain_key = self.value(Some(k), key);
            self.cx.leave();
            let Some(plain_key) = plain_key? else {
                continue;
            };

            self.cx.enter_map_value(index);
            let plain_value = self.value(Some(v), value);
            self.cx.leave();
            let plain_value = plain_value?.unwrap_or(PlainValue::Null);

            output.push(PlainValue::Array(vec![plain_key, plain_value]));
        }
        Ok(PlainValue::Array(output))
    }

    /// Entries whose value is absent or fails are left out.
    fn map_as_object(&mut self, map: &TypedMap, value: &TypeTag) -> Result<PlainValue, ConvertError> {
        let mut output = PlainObject::new();
        for (k, v) in map.iter() {
            let TypedValue::String(name) = k else {
                continue;
            };
            self.cx.enter_member(name);
            let plain_value = self.value(Some(v), value);
            self.cx.leave();
            if let Some(plain_value) = plain_value? {
                output.insert(name.clone(), plain_value);
            }
        }
        Ok(PlainValue::Object(output))
    }
}
