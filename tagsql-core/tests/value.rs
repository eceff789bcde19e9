#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::{
        borrow::Cow,
        collections::{BTreeMap, HashMap},
        rc::Rc,
        sync::mpsc::Sender,
    };
    use tagsql_core::{Kind, Member, MetaError, Reflect, Scalar, Value, to_value};

    struct Point {
        x: i32,
        label: Option<String>,
    }

    impl Reflect for Point {
        fn type_name() -> Cow<'static, str> {
            Cow::Borrowed("Point")
        }
        fn reflect(&self) -> Value {
            Value::structure(
                Self::type_name(),
                r#"table:"points""#,
                vec![
                    Member::new("x", r#"db:"x_coord""#, self.x.reflect()),
                    Member::new("label", "", self.label.reflect()),
                ],
            )
        }
        fn reflect_type() -> Value {
            Value::structure(
                Self::type_name(),
                r#"table:"points""#,
                vec![
                    Member::deferred("x", r#"db:"x_coord""#, i32::reflect_type),
                    Member::deferred("label", "", Option::<String>::reflect_type),
                ],
            )
        }
    }

    fn meta_error(error: &tagsql_core::Error) -> &MetaError {
        error.downcast_ref::<MetaError>().expect("a MetaError")
    }

    #[test]
    fn value_scalars() {
        let value = 42_i32.reflect();
        assert_eq!(value.kind(), Kind::Scalar);
        assert_eq!(value.type_name(), "i32");
        assert_eq!(value.scalar_value(), Some(&Scalar::Int(42)));
        assert!(!value.is_pointer());
        assert!(value.children().is_empty());

        let value = "hello".reflect();
        assert_eq!(value.type_name(), "str");
        assert_eq!(value.scalar_value(), Some(&Scalar::Text("hello".into())));

        let value = Decimal::new(1234, 2).reflect();
        assert_eq!(value.type_name(), "Decimal");
        assert_eq!(value.scalar_value().unwrap().to_string(), "12.34");
        assert!(Decimal::reflect_type().scalar_value().unwrap().is_zero());
    }

    #[test]
    fn value_pointers() {
        let value = Some(Box::new(7_u8)).reflect();
        assert!(value.is_pointer());
        assert_eq!(value.type_name(), "u8");
        assert_eq!(value.scalar_value(), Some(&Scalar::UInt(7)));

        let value = Option::<u8>::None.reflect();
        assert!(value.is_pointer());
        assert_eq!(value.scalar_value(), Some(&Scalar::UInt(0)));

        let shared = Rc::new(Point { x: 1, label: None });
        assert_eq!(shared.reflect().kind(), Kind::Struct);
        assert!(shared.reflect().is_pointer());
    }

    #[test]
    fn value_struct_children() {
        let point = Point {
            x: 3,
            label: Some("origin".into()),
        };
        let value = to_value(&point).unwrap();
        assert_eq!(value.kind(), Kind::Struct);
        assert_eq!(value.tag(), r#"table:"points""#);
        assert_eq!(value.len(), 2);

        let children = value.annotated_children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].0.name(), Some("x"));
        assert_eq!(children[0].1, r#"db:"x_coord""#);
        assert_eq!(children[1].0.name(), Some("label"));
        assert_eq!(children[1].1, "");
        for (child, _) in &children {
            assert_eq!(child.parent().unwrap().type_name(), "Point");
        }

        let label = value.child("label").unwrap();
        assert!(label.is_pointer());
        assert_eq!(label.scalar_value(), Some(&Scalar::Text("origin".into())));
        assert_eq!(
            value.child(0).unwrap().scalar_value(),
            Some(&Scalar::Int(3))
        );
        let found = value.children_by_keys(["label", "x"]).unwrap();
        assert_eq!(found[0].name(), Some("label"));
        assert_eq!(found[1].name(), Some("x"));
    }

    #[test]
    fn value_child_errors() {
        let value = to_value(&Point { x: 0, label: None }).unwrap();
        let error = value.child("missing").unwrap_err();
        assert!(matches!(meta_error(&error), MetaError::NoSuchChild { .. }));
        let error = 5_i64.reflect().child(0).unwrap_err();
        assert!(matches!(meta_error(&error), MetaError::NoChildren(..)));
        let error = 5_i64.reflect().new_element().unwrap_err();
        assert!(matches!(meta_error(&error), MetaError::NotACollection(..)));
    }

    #[test]
    fn value_zero_struct() {
        let value = Point::reflect_type();
        assert_eq!(value.kind(), Kind::Struct);
        let children = value.children();
        assert_eq!(children.len(), 2);
        assert!(children[0].scalar_value().unwrap().is_zero());
        assert!(children[1].is_pointer());
    }

    #[test]
    fn value_collections() {
        let items = vec![
            Point { x: 1, label: None },
            Point { x: 2, label: None },
        ];
        let value = items.reflect();
        assert_eq!(value.kind(), Kind::Sequence);
        assert_eq!(value.type_name(), "Vec<Point>");
        let children = value.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].name(), Some("1"));
        assert_eq!(value.child("1").unwrap().child("x").unwrap().scalar_value(), Some(&Scalar::Int(2)));

        let empty: Vec<Point> = Vec::new();
        let element = empty.reflect().new_element().unwrap();
        assert_eq!(element.kind(), Kind::Struct);
        assert_eq!(element.type_name(), "Point");

        let array = <[u16; 3]>::reflect_type();
        assert_eq!(array.len(), 3);

        let map: HashMap<String, i32> = [("b".to_string(), 2), ("a".to_string(), 1)].into();
        let value = map.reflect();
        assert_eq!(value.kind(), Kind::Mapping);
        let names: Vec<_> = value
            .children()
            .iter()
            .map(|v| v.name().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(value.child("b").unwrap().scalar_value(), Some(&Scalar::Int(2)));

        let map: BTreeMap<String, Point> = BTreeMap::new();
        assert_eq!(map.reflect().new_element().unwrap().type_name(), "Point");
    }

    #[test]
    fn value_channel() {
        let value = Sender::<Point>::reflect_type();
        assert_eq!(value.kind(), Kind::Empty);
        assert!(value.children().is_empty());
        assert_eq!(value.new_element().unwrap().type_name(), "Point");
    }

    #[test]
    fn value_nil() {
        let error = to_value(&()).unwrap_err();
        assert!(matches!(meta_error(&error), MetaError::InvalidValue(..)));
        let error = to_value(&serde_json::Value::Null).unwrap_err();
        assert!(matches!(meta_error(&error), MetaError::InvalidValue(..)));
        assert!(to_value(&Option::<i32>::None).is_ok());
    }

    #[test]
    fn value_json() {
        let value = to_value(&Point {
            x: 9,
            label: Some("nine".into()),
        })
        .unwrap();
        assert_eq!(
            value.to_json(),
            serde_json::json!({ "x": 9, "label": "nine" })
        );
        let json = serde_json::json!({ "id": 1, "tags": ["a", "b"] });
        let value = to_value(&json).unwrap();
        assert_eq!(value.kind(), Kind::Mapping);
        assert_eq!(value.child("tags").unwrap().kind(), Kind::Sequence);
        assert_eq!(value.to_json(), json);
    }
}
