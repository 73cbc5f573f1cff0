use std::borrow::Cow;

use crate::info::TypeTag;
use crate::value::TypedValue;
use crate::{ConvertError, PlainValue};

/// Custom serialization hook for a single member.
pub type MemberSerializeFn = fn(&TypedValue) -> Result<PlainValue, ConvertError>;

/// Custom deserialization hook for a single member.
pub type MemberDeserializeFn = fn(&PlainValue) -> Result<TypedValue, ConvertError>;

// -----------------------------------------------------------------------------
// MemberDescriptor

/// Metadata of one declared member of a registered class.
///
/// # Examples
///
/// ```
/// use tyjson_core::TypeTag;
/// use tyjson_core::info::MemberDescriptor;
///
/// let member = MemberDescriptor::new("created_at", TypeTag::DATE)
///     .serialized_as("createdAt")
///     .required();
///
/// assert_eq!(member.key(), "created_at");
/// assert_eq!(member.serialized_name(), "createdAt");
/// assert!(member.is_required());
/// assert!(!member.emit_default_value());
/// ```
#[derive(Clone, Debug)]
pub struct MemberDescriptor {
    key: Cow<'static, str>,
    serialized_name: Option<Cow<'static, str>>,
    type_tag: TypeTag,
    is_required: bool,
    emit_default_value: bool,
    serializer: Option<MemberSerializeFn>,
    deserializer: Option<MemberDeserializeFn>,
}

impl MemberDescriptor {
    /// Creates a member that is optional and omitted when unset.
    pub fn new(key: impl Into<Cow<'static, str>>, type_tag: TypeTag) -> Self {
        Self {
            key: key.into(),
            serialized_name: None,
            type_tag,
            is_required: false,
            emit_default_value: false,
            serializer: None,
            deserializer: None,
        }
    }

    /// Marks the member as required during deserialization.
    #[inline]
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Emits a type default during serialization when the member is unset.
    #[inline]
    pub fn emit_default(mut self) -> Self {
        self.emit_default_value = true;
        self
    }

    /// Uses `name` as the key in the plain JSON object.
    #[inline]
    pub fn serialized_as(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.serialized_name = Some(name.into());
        self
    }

    /// Replaces the built-in serialization of this member.
    #[inline]
    pub fn serialize_with(mut self, f: MemberSerializeFn) -> Self {
        self.serializer = Some(f);
        self
    }

    /// Replaces the built-in deserialization of this member.
    #[inline]
    pub fn deserialize_with(mut self, f: MemberDeserializeFn) -> Self {
        self.deserializer = Some(f);
        self
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the key used in plain JSON, which defaults to [`key`](Self::key).
    #[inline]
    pub fn serialized_name(&self) -> &str {
        self.serialized_name.as_deref().unwrap_or(&self.key)
    }

    #[inline]
    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.is_required
    }

    #[inline]
    pub fn emit_default_value(&self) -> bool {
        self.emit_default_value
    }

    #[inline]
    pub fn serializer(&self) -> Option<MemberSerializeFn> {
        self.serializer
    }

    #[inline]
    pub fn deserializer(&self) -> Option<MemberDeserializeFn> {
        self.deserializer
    }

    /// Returns `true` if replacing `self` by `other` changes between a
    /// container shape and a scalar or object shape.
    pub(crate) fn shape_conflicts_with(&self, other: &MemberDescriptor) -> bool {
        self.type_tag.is_container() != other.type_tag.is_container()
    }
}
