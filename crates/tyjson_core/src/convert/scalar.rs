use serde_json::Number;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::convert::{ConvertError, MapShape};
use crate::{PlainObject, PlainValue, RegExp, ScalarKind, TypeTag, TypedValue};

/// Largest magnitude below which every integral `f64` is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Kind name of a plain value, as used in shape mismatch errors.
pub(crate) fn plain_kind(value: &PlainValue) -> &'static str {
    match value {
        PlainValue::Null => "null",
        PlainValue::Bool(_) => "boolean",
        PlainValue::Number(_) => "number",
        PlainValue::String(_) => "string",
        PlainValue::Array(_) => "array",
        PlainValue::Object(_) => "object",
    }
}

// -----------------------------------------------------------------------------
// Typed -> plain

/// Integral values are written without a fraction.
pub(crate) fn number_to_plain(n: f64) -> Result<PlainValue, ConvertError> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(PlainValue::from(n as i64));
    }
    Number::from_f64(n)
        .map(PlainValue::Number)
        .ok_or_else(|| ConvertError::invalid_scalar(ScalarKind::Number, n.to_string()))
}

pub(crate) fn date_to_plain(date: OffsetDateTime) -> Result<PlainValue, ConvertError> {
    date.format(&Rfc3339)
        .map(PlainValue::String)
        .map_err(|err| ConvertError::invalid_scalar(ScalarKind::Date, err.to_string()))
}

pub(crate) fn scalar_to_plain(kind: ScalarKind, value: &TypedValue) -> Result<PlainValue, ConvertError> {
    match (kind, value) {
        (ScalarKind::Number, TypedValue::Number(n)) => number_to_plain(*n),
        (ScalarKind::String, TypedValue::String(s)) => Ok(PlainValue::String(s.clone())),
        (ScalarKind::Boolean, TypedValue::Boolean(b)) => Ok(PlainValue::Bool(*b)),
        (ScalarKind::Date, TypedValue::Date(d)) => date_to_plain(*d),
        (ScalarKind::RegExp, TypedValue::RegExp(r)) => Ok(PlainValue::String(r.to_literal())),
        _ => Err(ConvertError::shape_mismatch(kind.name(), value.kind_name())),
    }
}

/// Plain value written for an absent member with `emit_default_value`.
pub(crate) fn default_plain(tag: &TypeTag, map_shape: MapShape) -> PlainValue {
    match tag {
        TypeTag::Scalar(ScalarKind::Number) => PlainValue::from(0),
        TypeTag::Scalar(ScalarKind::String) => PlainValue::String(String::new()),
        TypeTag::Scalar(ScalarKind::Boolean) => PlainValue::Bool(false),
        TypeTag::Scalar(ScalarKind::Date) => {
            date_to_plain(OffsetDateTime::UNIX_EPOCH).unwrap_or(PlainValue::Null)
        }
        TypeTag::Scalar(ScalarKind::RegExp) => PlainValue::String(RegExp::default().to_literal()),
        TypeTag::Object(_) => PlainValue::Object(PlainObject::new()),
        TypeTag::Map { .. } if map_shape == MapShape::Object => PlainValue::Object(PlainObject::new()),
        TypeTag::Array { .. } | TypeTag::Set(_) | TypeTag::Map { .. } => PlainValue::Array(Vec::new()),
    }
}

// -----------------------------------------------------------------------------
// Plain -> typed

pub(crate) fn scalar_from_plain(kind: ScalarKind, value: &PlainValue) -> Result<TypedValue, ConvertError> {
    let mismatch = || ConvertError::shape_mismatch(kind.name(), plain_kind(value));
    match kind {
        ScalarKind::Number => match value {
            PlainValue::Number(n) => n
                .as_f64()
                .map(TypedValue::Number)
                .ok_or_else(|| ConvertError::invalid_scalar(kind, n.to_string())),
            _ => Err(mismatch()),
        },
        ScalarKind::String => match value {
            PlainValue::String(s) => Ok(TypedValue::String(s.clone())),
            _ => Err(mismatch()),
        },
        ScalarKind::Boolean => match value {
            PlainValue::Bool(b) => Ok(TypedValue::Boolean(*b)),
            _ => Err(mismatch()),
        },
        ScalarKind::Date => match value {
            PlainValue::String(s) => OffsetDateTime::parse(s, &Rfc3339)
                .map(TypedValue::Date)
                .map_err(|err| ConvertError::invalid_scalar(kind, format!("`{s}`: {err}"))),
            PlainValue::Number(n) => date_from_millis(n),
            _ => Err(mismatch()),
        },
        ScalarKind::RegExp => match value {
            PlainValue::String(s) => RegExp::parse_literal(s)
                .map(TypedValue::RegExp)
                .ok_or_else(|| ConvertError::invalid_scalar(kind, format!("`{s}`"))),
            _ => Err(mismatch()),
        },
    }
}

/// Milliseconds since the Unix epoch.
fn date_from_millis(n: &Number) -> Result<TypedValue, ConvertError> {
    let invalid = || ConvertError::invalid_scalar(ScalarKind::Date, n.to_string());
    let millis = n.as_f64().filter(|ms| ms.is_finite()).ok_or_else(invalid)?;
    let nanos = (millis * 1_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map(TypedValue::Date)
        .map_err(|_| invalid())
}
