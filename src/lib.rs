#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod typed_json;

pub use tyjson_utils as utils;

pub use tyjson_core::{convert, info, registry, resolve, value};

pub use tyjson_core::{
    ClassSchema, Conversion, ConvertError, Ctor, Deserializer, DynamicObject, ErrorKind, FieldValue, KnownTypes,
    MapShape, Object, PlainObject, PlainValue, RegExp, RegistryBuilder, RegistryError, ScalarKind, Serializer,
    Settings, TypeRegistry, TypeTag, TypedMap, TypedSet, TypedValue,
};
pub use tyjson_core::{impl_object, submit_schema};

pub use typed_json::TypedJson;
