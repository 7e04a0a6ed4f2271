use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::{DtoError, InvalidArgumentError, TypeError};
use crate::info::{ClassInfo, FromMapping, OpaqueInfo, TypeKind};
use crate::object::ObjectRef;
use crate::resolve::{DEFAULT_MAX_DEPTH, check_depth};
use crate::shape::{PropertyShape, ShapeExtractor};
use crate::value::{Mapping, Value};

/// Builds objects from [`Mapping`]s.
///
/// Keys are matched against the property names of the target class. For
/// each property, in shape order:
///
/// - a missing key falls back to the declared default, or to null when the
///   property is nullable, and is an error otherwise;
/// - null is passed through for nullable properties and is an error otherwise;
/// - a property declared with a DTO class is resolved from an instance of
///   that class (kept as is), a mapping, or any other value given to the
///   class constructor as its only argument;
/// - a property declared with an opaque type is built by the type's constructor;
/// - a typed collection resolves each element the same way.
///
/// The values are then passed to the constructor in shape order.
pub struct DeserializationResolver {
    extractor: Arc<ShapeExtractor>,
    max_depth: usize,
}

impl DeserializationResolver {
    pub fn new(extractor: Arc<ShapeExtractor>) -> Self {
        Self {
            extractor,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds an instance of `class` from `data`.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgumentError::UnknownProperties`] listing every key that
    ///   is not a property of the class.
    /// - [`InvalidArgumentError::MissingProperty`] for a missing key without fallback.
    /// - [`InvalidArgumentError::NotNullable`] for a null non-nullable property.
    /// - [`DtoError::InvalidShape`] if a visited class has an unsupported shape.
    /// - [`DtoError::Type`] if the constructor rejects a value.
    pub fn build(&self, class: &'static ClassInfo, data: Mapping) -> Result<ObjectRef, DtoError> {
        self.build_checked(class, data, 0)
    }

    fn build_checked(
        &self,
        class: &'static ClassInfo,
        data: Mapping,
        depth: usize,
    ) -> Result<ObjectRef, DtoError> {
        let shapes = self.extractor.shapes(class)?;

        let unknown: Vec<String> = data
            .keys()
            .filter(|key| !shapes.iter().any(|shape| shape.name() == *key))
            .map(String::from)
            .collect();
        if !unknown.is_empty() {
            return Err(InvalidArgumentError::UnknownProperties {
                class: class.name(),
                names: unknown,
            }
            .into());
        }

        self.build_with(class, &shapes, data, depth)
    }

    fn build_with(
        &self,
        class: &'static ClassInfo,
        shapes: &[PropertyShape],
        mut data: Mapping,
        depth: usize,
    ) -> Result<ObjectRef, DtoError> {
        check_depth(depth, self.max_depth)?;

        let mut args = Vec::with_capacity(shapes.len());
        for shape in shapes {
            let value = match data.remove(shape.name()) {
                Some(value) => self.resolve_property(shape, value, depth)?,
                None if shape.is_optional() => shape.default_value(),
                None => {
                    return Err(InvalidArgumentError::MissingProperty {
                        class: class.name(),
                        property: shape.name(),
                    }
                    .into());
                }
            };

            if value.is_null() && !shape.is_nullable() {
                return Err(InvalidArgumentError::NotNullable {
                    class: class.name(),
                    property: shape.name(),
                }
                .into());
            }
            args.push(value);
        }

        class.instantiate(args)
    }

    fn resolve_property(
        &self,
        shape: &PropertyShape,
        value: Value,
        depth: usize,
    ) -> Result<Value, DtoError> {
        if value.is_null() {
            return Ok(value);
        }
        self.resolve_typed(shape.declared_type().kind(), value, depth + 1)
    }

    fn resolve_typed(
        &self,
        kind: &TypeKind,
        value: Value,
        depth: usize,
    ) -> Result<Value, DtoError> {
        match kind {
            TypeKind::Class(info) => self.resolve_class(info(), value, depth),
            TypeKind::Opaque(info) => resolve_opaque(info(), value),
            TypeKind::Array(Some(item)) if !item.is_builtin() => {
                self.resolve_items(item, value, depth)
            }
            _ => Ok(value),
        }
    }

    fn resolve_items(
        &self,
        item: &TypeKind,
        value: Value,
        depth: usize,
    ) -> Result<Value, DtoError> {
        check_depth(depth, self.max_depth)?;
        let resolve = |value: Value| {
            if value.is_null() {
                Ok(value)
            } else {
                self.resolve_typed(item, value, depth + 1)
            }
        };

        match value {
            Value::List(items) => items
                .into_iter()
                .map(resolve)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Value::Map(map) => map
                .into_iter()
                .map(|(key, value)| -> Result<_, DtoError> { Ok((key, resolve(value)?)) })
                .collect::<Result<Mapping, _>>()
                .map(Value::Map),
            other => Ok(other),
        }
    }

    fn resolve_class(
        &self,
        class: &'static ClassInfo,
        value: Value,
        depth: usize,
    ) -> Result<Value, DtoError> {
        let value = match value {
            Value::Object(obj) if class.is_instance(&*obj) => return Ok(Value::Object(obj)),
            // A class built from mappings receives lists as list-shaped mappings.
            Value::List(items) if !class.from_mapping().is_none() => {
                Value::Map(Mapping::from_list(items))
            }
            other => other,
        };

        match value {
            Value::Map(map) => match class.from_mapping() {
                FromMapping::Derived => self.build_checked(class, map, depth),
                FromMapping::Custom(build) => build(map),
                FromMapping::None if !map.is_list() => {
                    let shapes = self.extractor.shapes(class)?;
                    self.build_with(class, &shapes, map, depth)
                }
                FromMapping::None => class.instantiate(vec![Value::Map(map)]),
            }
            .map(Value::Object),
            other => class.instantiate(vec![other]).map(Value::Object),
        }
    }
}

fn resolve_opaque(info: &'static OpaqueInfo, value: Value) -> Result<Value, DtoError> {
    match value {
        Value::Opaque(obj) if info.is_instance(&*obj) => Ok(Value::Opaque(obj)),
        other => match info.constructor() {
            Some(construct) => Ok(Value::Opaque(construct(other)?)),
            None => Err(TypeError::mismatch(info.name(), other.kind()).into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::DeserializationResolver;
    use crate::error::{DtoError, InvalidArgumentError, TypeError};
    use crate::fixtures::{Address, Ledger, Measure, Money, Org, Person, Team, User};
    use crate::object::DtoClass;
    use crate::resolve::SerializationResolver;
    use crate::shape::ShapeExtractor;
    use crate::value::{Mapping, Value};

    fn resolver() -> DeserializationResolver {
        DeserializationResolver::new(Arc::new(ShapeExtractor::new()))
    }

    fn user_data(age: Option<i64>) -> Mapping {
        let mut data = Mapping::new();
        data.insert("id", 1);
        data.insert("name", "Alice");
        if let Some(age) = age {
            data.insert("age", age);
        }
        data
    }

    #[test]
    fn builds_with_defaults() {
        let obj = resolver().build(User::class_info(), user_data(None)).unwrap();
        let user = obj.downcast_ref::<User>().unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Alice");
        assert_eq!(user.role, None);
    }

    #[test]
    fn unknown_keys_are_reported_together() {
        let mut data = user_data(Some(30));
        data.insert("bogus", true);

        let err = resolver().build(User::class_info(), data).unwrap_err();
        match err {
            DtoError::InvalidArgument(InvalidArgumentError::UnknownProperties { class, names }) => {
                assert_eq!(class, "User");
                assert_eq!(names, ["age", "bogus"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_and_null_properties() {
        let mut data = Mapping::new();
        data.insert("id", 1);
        let err = resolver().build(User::class_info(), data).unwrap_err();
        assert!(matches!(
            err,
            DtoError::InvalidArgument(InvalidArgumentError::MissingProperty {
                property: "name",
                ..
            })
        ));

        let mut data = user_data(None);
        data.insert("name", Value::Null);
        let err = resolver().build(User::class_info(), data).unwrap_err();
        assert!(matches!(
            err,
            DtoError::InvalidArgument(InvalidArgumentError::NotNullable { property: "name", .. })
        ));
    }

    #[test]
    fn constructor_rejects_wrong_types() {
        let mut data = user_data(None);
        data.insert("id", "one");
        let err = resolver().build(User::class_info(), data).unwrap_err();
        assert!(matches!(
            err,
            DtoError::Type(TypeError::Argument { param: "id", .. })
        ));
    }

    #[test]
    fn nested_mappings_become_objects() {
        let mut address = Mapping::new();
        address.insert("street", "Main St");
        address.insert("city", "Springfield");
        let mut data = Mapping::new();
        data.insert("name", "Bob");
        data.insert("address", address);

        let obj = resolver().build(Person::class_info(), data).unwrap();
        let person = obj.downcast_ref::<Person>().unwrap();
        assert_eq!(person.address.city, "Springfield");

        // An instance is kept as is.
        let shared = Arc::new(Address::new("Elm St", "Shelbyville"));
        let mut data = Mapping::new();
        data.insert("name", "Ann");
        data.insert("address", Value::Object(shared.clone()));
        let obj = resolver().build(Person::class_info(), data).unwrap();
        let person = obj.downcast_ref::<Person>().unwrap();
        assert!(Arc::ptr_eq(&person.address, &shared));
    }

    #[test]
    fn nested_classes_without_mapping_support_ignore_extra_keys() {
        let mut address = Mapping::new();
        address.insert("street", "Main St");
        address.insert("city", "Springfield");
        address.insert("zip", "12345");
        let mut data = Mapping::new();
        data.insert("name", "Bob");
        data.insert("address", address);

        assert!(resolver().build(Person::class_info(), data).is_ok());
    }

    #[test]
    fn nested_mapping_support() {
        // `Team` validates its keys, `Badge` has a custom hook.
        let mut team = Mapping::new();
        team.insert("name", "core");
        team.insert("sites", Value::List(vec![]));
        let mut badge = Mapping::new();
        badge.insert("label", "gold");
        let mut data = Mapping::new();
        data.insert("team", team.clone());
        data.insert("badge", badge);

        let obj = resolver().build(Org::class_info(), data).unwrap();
        let org = obj.downcast_ref::<Org>().unwrap();
        assert_eq!(org.team.name, "core");
        assert_eq!(org.badge.as_ref().map(|b| b.text.as_str()), Some("gold"));

        // A plain value goes to the constructor.
        let mut data = Mapping::new();
        data.insert("team", team.clone());
        data.insert("badge", "silver");
        let obj = resolver().build(Org::class_info(), data).unwrap();
        let org = obj.downcast_ref::<Org>().unwrap();
        assert_eq!(org.badge.as_ref().map(|b| b.text.as_str()), Some("silver"));

        team.insert("extra", 1);
        let mut data = Mapping::new();
        data.insert("team", team);
        let err = resolver().build(Org::class_info(), data).unwrap_err();
        assert!(matches!(
            err,
            DtoError::InvalidArgument(InvalidArgumentError::UnknownProperties { class: "Team", .. })
        ));
    }

    #[test]
    fn typed_collections_resolve_each_element() {
        let member = |name: &str| {
            let mut m = Mapping::new();
            m.insert("street", name);
            m.insert("city", "Springfield");
            Value::Map(m)
        };
        let mut data = Mapping::new();
        data.insert("name", "core");
        data.insert("sites", Value::List(vec![member("a"), member("b")]));

        let obj = resolver().build(Team::class_info(), data).unwrap();
        let team = obj.downcast_ref::<Team>().unwrap();
        let streets: Vec<&str> = team.sites.iter().map(|a| a.street.as_str()).collect();
        assert_eq!(streets, ["a", "b"]);
    }

    #[test]
    fn opaque_values_use_their_constructor() {
        let mut data = Mapping::new();
        data.insert("total", "2.50 EUR");
        data.insert("entries", Value::List(vec![Value::from("1.00 USD")]));

        let obj = resolver().build(Ledger::class_info(), data).unwrap();
        let ledger = obj.downcast_ref::<Ledger>().unwrap();
        assert_eq!(ledger.total, Money::new(250, "EUR"));
        assert_eq!(ledger.entries, [Money::new(100, "USD")]);

        let mut data = Mapping::new();
        data.insert("total", true);
        data.insert("entries", Value::List(vec![]));
        let err = resolver().build(Ledger::class_info(), data).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn list_shaped_mappings_go_to_the_constructor() {
        // `Address` has no mapping support and takes two arguments.
        let list = Mapping::from_list([Value::from("Main St"), Value::from("Springfield")]);
        let mut data = Mapping::new();
        data.insert("name", "Bob");
        data.insert("address", list.clone());
        let err = resolver().build(Person::class_info(), data).unwrap_err();
        assert!(matches!(
            err,
            DtoError::Type(TypeError::ArgumentCount { class: "Address", min: 2, max: 2, given: 1 })
        ));

        // `Measure` takes any single value.
        let obj = resolver()
            .resolve_class(Measure::class_info(), Value::Map(list.clone()), 0)
            .unwrap();
        let measure = obj.as_object().and_then(|o| o.downcast_ref::<Measure>()).unwrap();
        assert_eq!(measure.value, Value::Map(list));
    }

    #[test]
    fn empty_mappings_are_struct_like() {
        let mut data = Mapping::new();
        data.insert("name", "Bob");
        data.insert("address", Mapping::new());
        let err = resolver().build(Person::class_info(), data).unwrap_err();
        assert!(matches!(
            err,
            DtoError::InvalidArgument(InvalidArgumentError::MissingProperty {
                class: "Address",
                property: "street",
            })
        ));
    }

    #[test]
    fn lists_reach_the_mapping_hook() {
        let items = vec![Value::Int(1), Value::Int(2)];
        for team in [Value::List(items.clone()), Value::Map(Mapping::from_list(items))] {
            let mut data = Mapping::new();
            data.insert("team", team);
            let err = resolver().build(Org::class_info(), data).unwrap_err();
            assert!(err.is_invalid_argument());
            assert_eq!(err.to_string(), "unknown properties `0, 1` for DTO `Team`");
        }
    }

    #[test]
    fn serialized_output_builds_an_equal_object() {
        let extractor = Arc::new(ShapeExtractor::new());
        let person = Person::new("Bob", Arc::new(Address::new("Main St", "Springfield")));

        let map = SerializationResolver::new(Arc::clone(&extractor))
            .to_mapping(&person)
            .unwrap();
        let obj = DeserializationResolver::new(extractor)
            .build(Person::class_info(), map)
            .unwrap();

        let copy = obj.downcast_ref::<Person>().unwrap();
        assert_eq!(copy.name, person.name);
        assert_eq!(*copy.address, *person.address);
    }
}
