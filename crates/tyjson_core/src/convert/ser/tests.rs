use std::sync::{Arc, Mutex};

use serde_json::json;
use time::macros::datetime;

use crate::convert::FailFast;
use crate::{
    ClassSchema, ConvertError, Ctor, DynamicObject, ErrorKind, MapShape, PlainValue, RegExp,
    RegistryBuilder, Serializer, Settings, TypeRegistry, TypeTag, TypedMap, TypedSet, TypedValue,
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Pet {
    name: Option<String>,
    age: Option<f64>,
    tags: Option<TypedSet>,
}

crate::impl_object!(Pet { name, age, tags });

struct Animal;
struct Cat;
struct Owner;
struct Stray;

fn registry() -> TypeRegistry {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            ClassSchema::of::<Pet>()
                .field("name", TypeTag::STRING)
                .field("age", TypeTag::NUMBER)
                .emit_default()
                .field("tags", TypeTag::set_of(TypeTag::STRING)),
        )
        .unwrap()
        .register(ClassSchema::dynamic::<Animal>().field("name", TypeTag::STRING))
        .unwrap()
        .register(
            ClassSchema::dynamic::<Cat>()
                .extends::<Animal>()
                .field("lives", TypeTag::NUMBER),
        )
        .unwrap()
        .register(
            ClassSchema::dynamic::<Owner>()
                .field("pet", TypeTag::object::<Animal>())
                .field("since", TypeTag::DATE)
                .serialized_as("owner_since")
                .field("pattern", TypeTag::REGEXP)
                .field("scores", TypeTag::map_of(TypeTag::STRING, TypeTag::NUMBER))
                .field("grid", TypeTag::array_of_depth(TypeTag::NUMBER, 2)),
        )
        .unwrap();
    builder.build().unwrap()
}

fn ignore(_: &ConvertError) -> Result<(), ConvertError> {
    Ok(())
}

fn quiet() -> Settings {
    Settings::new().with_error_handler(ignore)
}

#[test]
fn emit_default_for_absent_member() {
    let registry = registry();
    let settings = quiet();
    let ser = Serializer::new(&registry, &settings);

    let plain = ser.serialize_object(&Pet::default(), Ctor::of::<Pet>()).unwrap();
    assert_eq!(plain, json!({ "age": 0 }));

    let pet = Pet {
        name: Some("Tom".into()),
        age: Some(3.0),
        tags: Some(["calm", "grey", "calm"].into_iter().map(TypedValue::from).collect()),
    };
    let plain = ser.serialize_object(&pet, Ctor::of::<Pet>()).unwrap();
    assert_eq!(plain, json!({ "name": "Tom", "age": 3, "tags": ["calm", "grey"] }));
}

#[test]
fn subtype_writes_own_members_and_hint() {
    let registry = registry();
    let settings = quiet();
    let ser = Serializer::new(&registry, &settings);

    let cat = DynamicObject::of::<Cat>().with("name", "Tom").with("lives", 9);
    let owner = DynamicObject::of::<Owner>().with("pet", TypedValue::object(cat.clone()));
    let plain = ser.serialize_object(&owner, Ctor::of::<Owner>()).unwrap();
    assert_eq!(
        plain,
        json!({ "pet": { "name": "Tom", "lives": 9, "__type": "Cat" } })
    );

    // Serialized as itself, no hint is needed.
    let plain = ser.serialize_object(&cat, Ctor::of::<Cat>()).unwrap();
    assert_eq!(plain, json!({ "name": "Tom", "lives": 9 }));
}

#[test]
fn scalars_and_containers() {
    let registry = registry();
    let settings = quiet();
    let ser = Serializer::new(&registry, &settings);

    let scores: TypedMap = [("a", 1), ("b", 2)]
        .into_iter()
        .map(|(k, v)| (TypedValue::from(k), TypedValue::from(v)))
        .collect();
    let grid = TypedValue::Array(vec![
        TypedValue::Array(vec![1.into(), 2.into()]),
        TypedValue::Array(vec![3.5.into()]),
    ]);
    let owner = DynamicObject::of::<Owner>()
        .with("since", datetime!(2020-01-02 03:04:05 UTC))
        .with("pattern", RegExp::new("^a+$", "i"))
        .with("scores", scores)
        .with("grid", grid);

    let plain = ser.serialize_object(&owner, Ctor::of::<Owner>()).unwrap();
    assert_eq!(
        plain,
        json!({
            "owner_since": "2020-01-02T03:04:05Z",
            "pattern": "/^a+$/i",
            "scores": [["a", 1], ["b", 2]],
            "grid": [[1, 2], [3.5]],
        })
    );

    let settings = quiet().with_map_shape(MapShape::Object);
    let ser = Serializer::new(&registry, &settings);
    let plain = ser.serialize_object(&owner, Ctor::of::<Owner>()).unwrap();
    assert_eq!(plain["scores"], json!({ "a": 1, "b": 2 }));
}

#[test]
fn map_with_object_values() {
    let registry = registry();
    let settings = quiet();
    let ser = Serializer::new(&registry, &settings);

    let map: TypedMap = [(TypedValue::from(7), TypedValue::object(Pet::default()))]
        .into_iter()
        .collect();
    let plain = ser
        .serialize_map(&map, &TypeTag::NUMBER, &TypeTag::object::<Pet>())
        .unwrap();
    assert_eq!(plain, json!([[7, { "age": 0 }]]));
}

#[test]
fn mismatches_are_localized() {
    let registry = registry();
    let settings = quiet();
    let ser = Serializer::new(&registry, &settings);

    let grid = vec![
        TypedValue::Array(vec![1.into()]),
        TypedValue::from("row"),
        TypedValue::Array(vec![TypedValue::from(true), 2.into()]),
    ];
    let report = ser
        .serialize_array_with_report(&grid, &TypeTag::NUMBER, 2)
        .unwrap();
    assert_eq!(report.value, json!([[1], null, [null, 2]]));

    let paths: Vec<_> = report.errors.iter().map(ConvertError::path).collect();
    assert_eq!(paths, ["$[1]", "$[2][0]"]);
    assert!(report.errors.iter().all(|e| e.kind() == ErrorKind::TypeShapeMismatch));
}

#[test]
fn failed_set_elements_are_left_out() {
    let registry = registry();
    let settings = quiet();
    let ser = Serializer::new(&registry, &settings);

    let set: TypedSet = [TypedValue::from(1), "x".into(), TypedValue::from(f64::NAN)]
        .into_iter()
        .collect();
    let report = ser.serialize_set_with_report(&set, &TypeTag::NUMBER).unwrap();
    assert_eq!(report.value, json!([1]));
    let kinds: Vec<_> = report.errors.iter().map(ConvertError::kind).collect();
    assert_eq!(kinds, [ErrorKind::TypeShapeMismatch, ErrorKind::InvalidScalar]);
}

#[test]
fn null_handling() {
    let registry = registry();
    let pet = DynamicObject::of::<Owner>().with("pattern", TypedValue::Null);

    let settings = quiet();
    let plain = Serializer::new(&registry, &settings)
        .serialize_object(&pet, Ctor::of::<Owner>())
        .unwrap();
    assert_eq!(plain, json!({}));

    let settings = quiet().with_preserve_null(true);
    let plain = Serializer::new(&registry, &settings)
        .serialize_object(&pet, Ctor::of::<Owner>())
        .unwrap();
    assert_eq!(plain, json!({ "pattern": null }));

    let nothing = Serializer::new(&registry, &settings)
        .serialize_value(None, &TypeTag::STRING)
        .unwrap();
    assert_eq!(nothing, None);
}

#[test]
fn custom_member_serializer() {
    fn upper(value: &TypedValue) -> Result<PlainValue, ConvertError> {
        value
            .as_str()
            .map(|s| PlainValue::String(s.to_uppercase()))
            .ok_or_else(|| ConvertError::custom("not a string"))
    }

    let mut builder = RegistryBuilder::new();
    builder
        .register(
            ClassSchema::dynamic::<Stray>()
                .field("code", TypeTag::STRING)
                .serialize_with(upper),
        )
        .unwrap();
    let registry = builder.build().unwrap();
    let settings = quiet();
    let ser = Serializer::new(&registry, &settings);

    let plain = ser
        .serialize_object(&DynamicObject::of::<Stray>().with("code", "ab"), Ctor::of::<Stray>())
        .unwrap();
    assert_eq!(plain, json!({ "code": "AB" }));

    let report = ser
        .serialize_object_with_report(
            &DynamicObject::of::<Stray>().with("code", 1),
            Ctor::of::<Stray>(),
        )
        .unwrap();
    assert_eq!(report.value, json!({}));
    assert_eq!(report.errors[0].to_string(), "not a string at `$.code`");
}

#[test]
fn unregistered_root_is_fatal() {
    let registry = registry();
    let seen = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&seen);
    let settings = Settings::new().with_error_handler(move |_: &ConvertError| -> Result<(), ConvertError> {
        *counter.lock().unwrap() += 1;
        Ok(())
    });

    let err = Serializer::new(&registry, &settings)
        .serialize_array(&[], &TypeTag::object::<Stray>(), 1)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnregisteredRootType);
    assert!(err.is_fatal());
    assert_eq!(*seen.lock().unwrap(), 0);
}

#[test]
fn fail_fast_aborts() {
    let registry = registry();
    let settings = Settings::new().with_error_handler(FailFast);
    let pet = DynamicObject::of::<Owner>()
        .with("pattern", 5)
        .with("grid", TypedValue::Array(vec![]));

    let err = Serializer::new(&registry, &settings)
        .serialize_object(&pet, Ctor::of::<Owner>())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeShapeMismatch);
    assert_eq!(err.path(), "$.pattern");
}

#[test]
fn text_keeps_declared_member_order() {
    struct Ledger;

    let mut builder = RegistryBuilder::new();
    builder
        .register(
            ClassSchema::dynamic::<Ledger>()
                .field("zeta", TypeTag::NUMBER)
                .field("alpha", TypeTag::NUMBER)
                .field("mid", TypeTag::object::<Animal>()),
        )
        .unwrap()
        .register(ClassSchema::dynamic::<Animal>().field("name", TypeTag::STRING))
        .unwrap()
        .register(
            ClassSchema::dynamic::<Cat>()
                .extends::<Animal>()
                .field("lives", TypeTag::NUMBER),
        )
        .unwrap();
    let registry = builder.build().unwrap();
    let settings = quiet();

    // Values set in a different order than declared.
    let ledger = DynamicObject::of::<Ledger>()
        .with("mid", TypedValue::object(DynamicObject::of::<Cat>().with("lives", 9).with("name", "Tom")))
        .with("alpha", 2)
        .with("zeta", 1);
    let plain = Serializer::new(&registry, &settings)
        .serialize_object(&ledger, Ctor::of::<Ledger>())
        .unwrap();
    assert_eq!(
        serde_json::to_string(&plain).unwrap(),
        r#"{"zeta":1,"alpha":2,"mid":{"name":"Tom","lives":9,"__type":"Cat"}}"#
    );
}
