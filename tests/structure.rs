#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use tagsql::{
        Dialect, MetaError, PrimaryKeyType, Reflect, Struct, StructConfig, Tag, Tags, to_struct,
    };
    use tagsql_postgres::PostgresDialect;

    #[derive(Reflect, Default)]
    #[tag(table = "customers")]
    pub struct Customer {
        #[tag = "a:\"-\" b:\"customer_id\""]
        pub id: i64,
        #[tag(b = "full_name")]
        pub name: String,
        #[tag(a = "", b = "-")]
        pub email: String,
        #[tag(hash = "-")]
        pub orders: Vec<Order>,
    }

    #[derive(Reflect, Default)]
    pub struct Order {
        #[tag(db = "order_id", pk)]
        pub id: i64,
        #[tag(db = "sku", pk)]
        pub sku: String,
        pub quantity: u32,
    }

    #[derive(Reflect)]
    pub struct Fingerprint {
        #[tag(hash)]
        pub id: i64,
        pub note: String,
    }

    fn customer() -> Customer {
        Customer {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            orders: vec![Order {
                id: 7,
                sku: "X1".into(),
                quantity: 2,
            }],
        }
    }

    #[test]
    fn tag_name_precedence() {
        let value = to_struct(&customer()).unwrap();
        let fields = value.fields();
        assert_eq!(
            fields.tag_names(&["a", "b"]),
            ["customer_id", "full_name", "email", "orders"]
        );
        assert_eq!(fields.tag_names(&["b"]), ["customer_id", "full_name", "email", "orders"]);
        assert_eq!(value.tag_name(["table"]), "customers");
        assert_eq!(value.tag_name(["missing"]), "Customer");
    }

    #[test]
    fn parallel_lists() {
        let value = to_struct(&customer()).unwrap();
        let fields = value.fields();
        let templator = PostgresDialect::new().templator();
        let columns = fields.columns(&templator.column_spec());
        assert_eq!(fields.len(), 4);
        assert_eq!(fields.names().len(), fields.len());
        assert_eq!(fields.tag_names(&["b"]).len(), fields.len());
        assert_eq!(fields.identifiers().len(), fields.len());
        assert_eq!(columns.len(), fields.len());
        assert_eq!(
            columns.iter().map(|c| c.field.as_str()).collect::<Vec<_>>(),
            fields.names()
        );
    }

    #[test]
    fn collection_member() {
        let value = to_struct(&customer()).unwrap();
        let fields = value.fields();
        let orders = fields.by_name("orders").unwrap();
        assert!(orders.multi_valued());
        assert!(fields.by_name("id").is_some_and(|f| !f.multi_valued()));
        let orders = orders.to_struct().unwrap();
        assert_eq!(orders.name(), "orders");
        assert_eq!(orders.type_name(), "Order");
        assert_eq!(orders.parent().unwrap().name(), "Customer");
        assert_eq!(orders.tags().get("hash"), Some(&Tag::new(["-"])));
        assert_eq!(orders.fields().tag_names(&["db"]), ["order_id", "sku", "quantity"]);
    }

    #[test]
    fn collections_unwrap() {
        let batch = vec![customer(), Customer::default()];
        assert_eq!(to_struct(&batch).unwrap().type_name(), "Customer");
        let empty: Vec<Customer> = Vec::new();
        let empty = to_struct(&empty).unwrap();
        assert_eq!(empty.fields().names(), ["id", "name", "email", "orders"]);
        let keyed = HashMap::from([("first".to_string(), customer())]);
        assert_eq!(to_struct(&keyed).unwrap().type_name(), "Customer");
        let error = to_struct(&vec![1, 2]).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<MetaError>(),
            Some(MetaError::NotAStruct { .. })
        ));
    }

    #[test]
    fn configured_struct() {
        let value = Struct::new(
            &customer(),
            StructConfig::default()
                .with_name("Clients")
                .with_namespace(["crm", "public"])
                .with_uuid("fixed")
                .with_tags(Tags::parse(r#"table:"clients""#), false)
                .with_attributes([("owner", "sales")], false),
        )
        .unwrap();
        assert_eq!(value.name(), "Clients");
        assert_eq!(value.type_name(), "Customer");
        assert_eq!(value.uuid(), "fixed");
        assert_eq!(value.identifier(), "crm.public.clients");
        assert_eq!(value.tag_name(["table"]), "clients");
        assert_eq!(value.attributes().get("owner").map(String::as_str), Some("sales"));
        let fields = value.fields();
        assert_eq!(fields[1].identifier(), "crm.public.clients.name");
    }

    #[test]
    fn composite_primary_key() {
        let order = Order::default();
        let value = to_struct(&order).unwrap();
        let templator = PostgresDialect::new().templator();
        let mut spec = templator.column_spec();
        spec.primary_key_tag = "pk".into();
        let columns = value.fields().columns(&spec);
        assert_eq!(
            columns.iter().map(|c| c.primary_key).collect::<Vec<_>>(),
            [
                PrimaryKeyType::PartOfPrimaryKey,
                PrimaryKeyType::PartOfPrimaryKey,
                PrimaryKeyType::None
            ]
        );
        assert_eq!(
            columns.iter().map(|c| c.data_type.as_str()).collect::<Vec<_>>(),
            ["bigint", "text", "bigint"]
        );
    }

    #[test]
    fn value_map_hash() {
        let value = to_struct(&Fingerprint {
            id: 7,
            note: "ignored".into(),
        })
        .unwrap();
        let map = value.value_map("hash");
        assert_eq!(map.len(), 1);
        assert_eq!(map.hash(), "784f9382156ed25a9f0b94102a68cccf0240c765");
        let map = to_struct(&customer()).unwrap().value_map("hash");
        assert_eq!(
            map.0.keys().map(String::as_str).collect::<Vec<_>>(),
            ["email", "id", "name"]
        );
    }
}
