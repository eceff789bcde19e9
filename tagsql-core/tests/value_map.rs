#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::borrow::Cow;
    use tagsql_core::{Member, Reflect, Value, ValueMap, to_struct};

    struct Line {
        sku: String,
        quantity: u32,
    }

    impl Reflect for Line {
        fn type_name() -> Cow<'static, str> {
            Cow::Borrowed("Line")
        }
        fn reflect(&self) -> Value {
            Value::structure(
                Self::type_name(),
                "",
                vec![
                    Member::new("sku", "", self.sku.reflect()),
                    Member::new("quantity", "", self.quantity.reflect()),
                ],
            )
        }
        fn reflect_type() -> Value {
            Value::structure(
                Self::type_name(),
                "",
                vec![
                    Member::deferred("sku", "", String::reflect_type),
                    Member::deferred("quantity", "", u32::reflect_type),
                ],
            )
        }
    }

    /// Members with their raw tags, the values are fixed.
    struct Tagged(&'static [(&'static str, &'static str)]);

    impl Reflect for Tagged {
        fn type_name() -> Cow<'static, str> {
            Cow::Borrowed("Order")
        }
        fn reflect(&self) -> Value {
            let values = |name: &str| match name {
                "id" => 7_i64.reflect(),
                "customer" => "ada".reflect(),
                "lines" => vec![Line {
                    sku: "X1".into(),
                    quantity: 2,
                }]
                .reflect(),
                _ => String::new().reflect(),
            };
            Value::structure(
                Self::type_name(),
                "",
                self.0
                    .iter()
                    .map(|(name, tag)| Member::new(*name, *tag, values(name)))
                    .collect(),
            )
        }
        fn reflect_type() -> Value {
            Value::structure(Self::type_name(), "", Vec::new())
        }
    }

    #[test]
    fn value_map_exclude() {
        let order = Tagged(&[
            ("id", ""),
            ("customer", r#"hash:"-""#),
            ("lines", ""),
            ("note", r#"hash:"yes""#),
        ]);
        let value = to_struct(&order).unwrap();
        let map = value.value_map("hash");
        assert_eq!(map.len(), 3);
        assert!(map.get("customer").is_none());
        assert_eq!(map.get("lines"), Some(&json!([{ "sku": "X1", "quantity": 2 }])));
        assert_eq!(
            map.to_json().to_string(),
            r#"{"id":7,"lines":[{"quantity":2,"sku":"X1"}],"note":""}"#
        );
        assert_eq!(map.hash(), "d17c98e13bccf4d09dfbfa239a62f5ce530ac172");
    }

    #[test]
    fn value_map_include() {
        let order = Tagged(&[
            ("id", r#"hash:"""#),
            ("customer", ""),
            ("note", ""),
        ]);
        let value = to_struct(&order).unwrap();
        let map = value.value_map("hash");
        assert_eq!(map.to_json(), json!({ "id": 7 }));
        assert_eq!(map.hash(), "784f9382156ed25a9f0b94102a68cccf0240c765");
    }

    #[test]
    fn value_map_all() {
        let order = Tagged(&[("id", ""), ("customer", r#"db:"client""#)]);
        let value = to_struct(&order).unwrap();
        let map = value.value_map("hash");
        assert_eq!(map.to_json(), json!({ "id": 7, "customer": "ada" }));
        let again = to_struct(&order).unwrap().value_map("hash");
        assert_eq!(map.hash(), again.hash());
        assert_eq!(map.hash().len(), 40);
    }

    #[test]
    fn value_map_with_values() {
        let order = Tagged(&[
            ("id", r#"hash:"key""#),
            ("customer", r#"hash:"skip""#),
            ("note", ""),
        ]);
        let value = to_struct(&order).unwrap();
        let fields = value.fields();
        let map = ValueMap::with_values(&fields, "hash", "skip", "key");
        assert_eq!(map.to_json(), json!({ "id": 7, "note": "" }));

        let order = Tagged(&[("id", r#"hash:"key""#), ("customer", "")]);
        let value = to_struct(&order).unwrap();
        let map = ValueMap::with_values(&value.fields(), "hash", "skip", "key");
        assert_eq!(map.to_json(), json!({ "id": 7 }));
        assert_eq!(
            ValueMap::with_values(&value.fields(), "hash", "skip", "none").len(),
            2
        );
    }
}
