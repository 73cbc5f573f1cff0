use serde_json::json;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::convert::FailFast;
use crate::{
    ClassSchema, ConvertError, Ctor, Deserializer, DynamicObject, ErrorKind, FieldValue, MapShape,
    Object, PlainValue, RegistryBuilder, Serializer, Settings, TypeRegistry, TypeTag, TypedMap,
    TypedSet, TypedValue,
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Temperature {
    celsius: Option<f64>,
    fahrenheit: f64,
}

impl Object for Temperature {
    fn ctor(&self) -> Ctor {
        Ctor::of::<Self>()
    }

    fn field(&self, key: &str) -> Option<TypedValue> {
        match key {
            "celsius" => self.celsius.to_typed(),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: TypedValue) -> Result<(), ConvertError> {
        match key {
            "celsius" => self.celsius = FieldValue::from_typed(value)?,
            _ => return Err(ConvertError::unknown_member(self.ctor(), key)),
        }
        Ok(())
    }

    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn object_eq(&self, other: &dyn Object) -> bool {
        other.downcast_ref::<Self>().is_some_and(|other| other == self)
    }

    fn on_deserialized(&mut self) {
        self.fahrenheit = self.celsius.unwrap_or_default() * 1.8 + 32.0;
    }
}

struct Animal;
struct Dog;
struct Cat;
struct Owner;
struct Unlisted;

fn registry() -> TypeRegistry {
    let mut builder = RegistryBuilder::new();
    builder
        .register(ClassSchema::of::<Temperature>().field("celsius", TypeTag::NUMBER))
        .unwrap()
        .register(
            ClassSchema::dynamic::<Animal>()
                .field("name", TypeTag::STRING)
                .required(),
        )
        .unwrap()
        .register(
            ClassSchema::dynamic::<Dog>()
                .extends::<Animal>()
                .field("bark", TypeTag::BOOLEAN),
        )
        .unwrap()
        .register(ClassSchema::dynamic::<Cat>().extends::<Animal>())
        .unwrap()
        .register(
            ClassSchema::dynamic::<Owner>()
                .field("pet", TypeTag::object::<Animal>())
                .field("since", TypeTag::DATE)
                .field("tags", TypeTag::set_of(TypeTag::STRING))
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

fn read_owner(plain: PlainValue, settings: &Settings) -> (DynamicObject, Vec<ConvertError>) {
    let registry = registry();
    let report = Deserializer::new(&registry, settings)
        .deserialize_object_with_report(&plain, Ctor::of::<Owner>())
        .unwrap();
    let object = report.value.unwrap().downcast::<DynamicObject>().unwrap();
    (*object, report.errors)
}

#[test]
fn round_trip_keeps_subtypes() {
    let registry = registry();
    let settings = quiet();

    let rex = DynamicObject::of::<Dog>().with("name", "Rex").with("bark", true);
    let tags: TypedSet = ["good", "loud"].into_iter().map(TypedValue::from).collect();
    let scores: TypedMap = [(TypedValue::from("fetch"), TypedValue::from(9))].into_iter().collect();
    let grid = TypedValue::Array(vec![
        TypedValue::Array(vec![1.into(), 2.5.into()]),
        TypedValue::Array(vec![]),
    ]);
    let original = DynamicObject::of::<Owner>()
        .with("pet", TypedValue::object(rex))
        .with("since", datetime!(2021-06-01 08:00:00 UTC))
        .with("tags", tags)
        .with("scores", scores)
        .with("grid", grid);

    let plain = Serializer::new(&registry, &settings)
        .serialize_object(&original, Ctor::of::<Owner>())
        .unwrap();
    assert_eq!(plain["pet"]["__type"], json!("Dog"));

    let de = Deserializer::new(&registry, &settings);
    let known = de.known_types_for(&TypeTag::object::<Owner>()).unwrap();
    let restored = de
        .deserialize_object(&plain, Ctor::of::<Owner>(), &known)
        .unwrap()
        .unwrap();

    assert_eq!(TypedValue::Object(restored), TypedValue::object(original));
}

#[test]
fn missing_required_member_keeps_partial_instance() {
    let (owner, errors) = read_owner(json!({ "pet": { "__type": "Dog", "bark": true } }), &quiet());

    let pet = owner.get("pet").unwrap().downcast_ref::<DynamicObject>().unwrap();
    assert_eq!(pet.ctor(), Ctor::of::<Dog>());
    assert_eq!(pet.get("bark"), Some(&TypedValue::Boolean(true)));
    assert_eq!(pet.get("name"), None);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind(), ErrorKind::MissingRequiredMember);
    assert_eq!(errors[0].path(), "$.pet.name");
}

#[test]
fn null_is_not_missing() {
    let (owner, errors) = read_owner(json!({ "pet": { "name": null } }), &quiet());
    assert!(errors.is_empty());
    let pet = owner.get("pet").unwrap().downcast_ref::<DynamicObject>().unwrap();
    assert_eq!(pet.ctor(), Ctor::of::<Animal>());
    assert!(pet.is_empty());

    let (owner, _) = read_owner(json!({ "pet": { "name": null } }), &quiet().with_preserve_null(true));
    let pet = owner.get("pet").unwrap().downcast_ref::<DynamicObject>().unwrap();
    assert_eq!(pet.get("name"), Some(&TypedValue::Null));
}

#[test]
fn unknown_hint_is_reported() {
    let (owner, errors) = read_owner(
        json!({ "pet": { "__type": "Horse", "name": "Ed" }, "tags": ["a"] }),
        &quiet(),
    );
    assert_eq!(owner.get("pet"), None);
    assert_eq!(owner.get("tags").and_then(TypedValue::as_set).map(TypedSet::len), Some(1));
    assert_eq!(errors[0].kind(), ErrorKind::UnresolvableConstructor);
    assert_eq!(errors[0].to_string(), "cannot resolve constructor `Horse` at `$.pet`");

    // Registered, but not reachable from `Owner`.
    let (_, errors) = read_owner(json!({ "pet": { "__type": "Temperature" } }), &quiet());
    assert_eq!(errors[0].kind(), ErrorKind::UnresolvableConstructor);

    let (_, errors) = read_owner(json!({ "pet": { "__type": 3 } }), &quiet());
    assert_eq!(errors[0].kind(), ErrorKind::TypeShapeMismatch);
}

#[test]
fn ambiguous_names() {
    mod a {
        pub struct Item;
    }
    mod b {
        pub struct Item;
    }
    struct Holder;

    let mut builder = RegistryBuilder::new();
    builder
        .register(ClassSchema::dynamic::<a::Item>())
        .unwrap()
        .register(ClassSchema::dynamic::<b::Item>())
        .unwrap()
        .register(
            ClassSchema::dynamic::<Holder>()
                .known_subtype::<b::Item>()
                .field("item", TypeTag::object::<a::Item>()),
        )
        .unwrap();
    let registry = builder.build().unwrap();
    let settings = quiet();

    let report = Deserializer::new(&registry, &settings)
        .deserialize_object_with_report(
            &json!({ "item": { "__type": "Item" } }),
            Ctor::of::<Holder>(),
        )
        .unwrap();
    let kinds: Vec<_> = report.errors.iter().map(ConvertError::kind).collect();
    assert_eq!(kinds, [ErrorKind::AmbiguousTypeName, ErrorKind::AmbiguousTypeName]);
    let holder = report.value.unwrap();
    assert_eq!(holder.field("item"), None);

    // Without a hint the expected class is used.
    let report = Deserializer::new(&registry, &settings)
        .deserialize_object_with_report(&json!({ "item": {} }), Ctor::of::<Holder>())
        .unwrap();
    let holder = report.value.unwrap();
    let item = holder.downcast_ref::<DynamicObject>().unwrap().get("item").unwrap();
    assert_eq!(item.as_object().unwrap().ctor(), Ctor::of::<a::Item>());
}

#[test]
fn maps() {
    let registry = registry();
    let key = TypeTag::STRING;
    let value = TypeTag::NUMBER;

    let settings = quiet();
    let de = Deserializer::new(&registry, &settings);
    let report = de
        .deserialize_map_with_report(&json!([["a", 1], ["b"], 5, [2, 3]]), &key, &value)
        .unwrap();
    let map = report.value.unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"a".into()), Some(&TypedValue::Number(1.0)));
    let paths: Vec<_> = report.errors.iter().map(ConvertError::path).collect();
    assert_eq!(paths, ["$[1]", "$[2]", "${3}.key"]);

    let report = de
        .deserialize_map_with_report(&json!({ "a": 1 }), &key, &value)
        .unwrap();
    assert!(report.value.is_none());
    assert_eq!(report.errors[0].kind(), ErrorKind::TypeShapeMismatch);

    let settings = quiet().with_map_shape(MapShape::Object);
    let de = Deserializer::new(&registry, &settings);
    let report = de
        .deserialize_map_with_report(&json!({ "a": 1, "b": "two" }), &key, &value)
        .unwrap();
    let map = report.value.unwrap();
    assert_eq!(map.get(&"a".into()), Some(&TypedValue::Number(1.0)));
    assert!(!map.contains_key(&"b".into()));
    assert_eq!(report.errors[0].path(), "$.b");

    // Pairs are still accepted.
    let report = de
        .deserialize_map_with_report(&json!([["c", 3]]), &key, &value)
        .unwrap();
    assert_eq!(report.value.unwrap().len(), 1);

    let report = de
        .deserialize_map_with_report(&json!({ "1": 1 }), &TypeTag::NUMBER, &value)
        .unwrap();
    assert!(report.value.is_none());
    assert_eq!(report.errors[0].kind(), ErrorKind::TypeShapeMismatch);
}

#[test]
fn sets_and_nested_arrays() {
    let registry = registry();
    let settings = quiet();
    let de = Deserializer::new(&registry, &settings);

    let report = de
        .deserialize_set_with_report(&json!([1, 1, "x", 2]), &TypeTag::NUMBER)
        .unwrap();
    let set = report.value.unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(report.errors[0].path(), "$[2]");

    let report = de
        .deserialize_array_with_report(&json!([[1, 2], 3, null, [true]]), &TypeTag::NUMBER, 2)
        .unwrap();
    assert_eq!(
        report.value.unwrap(),
        vec![
            TypedValue::Array(vec![1.into(), 2.into()]),
            TypedValue::Null,
            TypedValue::Null,
            TypedValue::Array(vec![TypedValue::Null]),
        ]
    );
    let paths: Vec<_> = report.errors.iter().map(ConvertError::path).collect();
    assert_eq!(paths, ["$[1]", "$[3][0]"]);

    let report = de
        .deserialize_array_with_report(&json!({}), &TypeTag::NUMBER, 1)
        .unwrap();
    assert!(report.value.is_none());
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn dates_from_millis() {
    let (owner, errors) = read_owner(json!({ "since": 0 }), &quiet());
    assert!(errors.is_empty());
    assert_eq!(owner.get("since"), Some(&TypedValue::Date(OffsetDateTime::UNIX_EPOCH)));

    let (owner, errors) = read_owner(json!({ "since": "yesterday" }), &quiet());
    assert_eq!(owner.get("since"), None);
    assert_eq!(errors[0].kind(), ErrorKind::InvalidScalar);
    assert_eq!(errors[0].path(), "$.since");
}

#[test]
fn on_deserialized_runs_last() {
    let registry = registry();
    let settings = quiet();
    let de = Deserializer::new(&registry, &settings);
    let known = de.known_types_for(&TypeTag::object::<Temperature>()).unwrap();

    let object = de
        .deserialize_object(&json!({ "celsius": 100 }), Ctor::of::<Temperature>(), &known)
        .unwrap()
        .unwrap();
    let temperature = object.downcast::<Temperature>().unwrap();
    assert_eq!(temperature.celsius, Some(100.0));
    assert_eq!(temperature.fahrenheit, 212.0);
}

#[test]
fn custom_member_deserializer() {
    fn from_code(plain: &PlainValue) -> Result<TypedValue, ConvertError> {
        match plain.as_str() {
            Some("on") => Ok(TypedValue::Boolean(true)),
            Some("off") => Ok(TypedValue::Boolean(false)),
            _ => Err(ConvertError::custom("expected `on` or `off`")),
        }
    }
    struct Switch;

    let mut builder = RegistryBuilder::new();
    builder
        .register(
            ClassSchema::dynamic::<Switch>()
                .field("state", TypeTag::BOOLEAN)
                .deserialize_with(from_code),
        )
        .unwrap();
    let registry = builder.build().unwrap();
    let settings = quiet();
    let de = Deserializer::new(&registry, &settings);

    let report = de
        .deserialize_object_with_report(&json!({ "state": "on" }), Ctor::of::<Switch>())
        .unwrap();
    let switch = report.value.unwrap();
    assert_eq!(switch.field("state"), Some(TypedValue::Boolean(true)));

    let report = de
        .deserialize_object_with_report(&json!({ "state": true }), Ctor::of::<Switch>())
        .unwrap();
    assert_eq!(report.value.unwrap().field("state"), None);
    assert_eq!(report.errors[0].to_string(), "expected `on` or `off` at `$.state`");
}

#[test]
fn typed_member_mismatch() {
    let registry = registry();
    let settings = quiet();
    let report = Deserializer::new(&registry, &settings)
        .deserialize_object_with_report(&json!({ "celsius": "hot" }), Ctor::of::<Temperature>())
        .unwrap();
    let temperature = report.value.unwrap().downcast::<Temperature>().unwrap();
    assert_eq!(temperature.celsius, None);
    assert_eq!(report.errors[0].path(), "$.celsius");
}

#[test]
fn fail_fast_and_fatal_errors() {
    let registry = registry();
    let settings = Settings::new().with_error_handler(FailFast);
    let de = Deserializer::new(&registry, &settings);

    let err = de
        .deserialize_object_with_report(&json!({ "pet": {} }), Ctor::of::<Owner>())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredMember);
    assert_eq!(err.path(), "$.pet.name");

    let err = de
        .deserialize_object_with_report(&json!({}), Ctor::of::<Unlisted>())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnregisteredRootType);
}

#[cfg(feature = "auto_register")]
mod auto_register {
    use crate::{ClassSchema, Ctor, RegistryBuilder, TypeTag, submit_schema};

    struct Badge;
    struct Ribbon;

    fn badge_schema() -> ClassSchema {
        ClassSchema::dynamic::<Badge>().field("label", TypeTag::STRING)
    }

    submit_schema!(fn badge_schema);
    submit_schema!(ClassSchema::dynamic::<Ribbon>().field("color", TypeTag::STRING));

    #[test]
    fn submitted_schemas_are_collected() {
        let mut builder = RegistryBuilder::new();
        assert!(builder.auto_register().unwrap() >= 2);
        let registry = builder.build().unwrap();
        assert!(registry.is_registered(Ctor::of::<Badge>()));
        assert!(registry.is_registered(Ctor::of::<Ribbon>()));
    }
}
