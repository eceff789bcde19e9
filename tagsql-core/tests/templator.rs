#[cfg(test)]
mod tests {
    use indoc::indoc;
    use std::borrow::Cow;
    use tagsql_core::{
        Artifact, Data, Member, MetaError, Reflect, Struct, StructConfig, Templates, Templator,
        TemplatorConfig, TypeMap, Value, floor_char_boundary,
    };

    struct Reading {
        sensor: String,
        at: i64,
        celsius: f64,
    }

    impl Reflect for Reading {
        fn type_name() -> Cow<'static, str> {
            Cow::Borrowed("Reading")
        }
        fn reflect(&self) -> Value {
            Value::structure(
                Self::type_name(),
                r#"table:"Readings""#,
                vec![
                    Member::new("sensor", r#"db:"sensor" key:"""#, self.sensor.reflect()),
                    Member::new("at", r#"db:"at" key:"" last:"max(at)""#, self.at.reflect()),
                    Member::new("celsius", r#"db:"temp" type:"real""#, self.celsius.reflect()),
                ],
            )
        }
        fn reflect_type() -> Value {
            Value::structure(
                Self::type_name(),
                r#"table:"Readings""#,
                vec![
                    Member::deferred("sensor", r#"db:"sensor" key:"""#, String::reflect_type),
                    Member::deferred("at", r#"db:"at" key:"" last:"max(at)""#, i64::reflect_type),
                    Member::deferred("celsius", r#"db:"temp" type:"real""#, f64::reflect_type),
                ],
            )
        }
    }

    fn config() -> TemplatorConfig {
        TemplatorConfig::default()
            .with_schema("metrics")
            .with_table_name_tags(["table"])
            .with_field_name_tags(["db"])
            .with_last_insert_tags(["last"])
            .with_data_type_tag("type")
            .with_primary_key_tag("key")
            .with_fallback_type("blob")
    }

    fn templator() -> Templator {
        Templator::new(config(), Templates::default())
            .with_type_map(TypeMap::new().with("String", "varchar").with("i64", "bigint"))
            .with_template(
                Artifact::CreateTable,
                indoc! {r#"
                    create table {{ .Table.Identifier }} (
                    {{- range $i, $c := .Columns }}{{ if $i }},{{ end }}
                        {{ $c.Name }} {{ $c.Type }}
                    {{- end }}
                    {{- if .PrimaryKey }},
                        primary key ({{ join ", " .PrimaryKey }})
                    {{- end }}
                    )"#},
            )
            .with_template(
                Artifact::GetMostRecent,
                "select {{ join \", \" .LastInsert }} from {{ .Table.Identifier }}",
            )
            .with_template(
                Artifact::Get,
                "select * from {{ .Table.Name }}{{ if .rowlimit }} limit {{ .rowlimit }}{{ end }}",
            )
    }

    fn reading() -> Reading {
        Reading {
            sensor: "north".into(),
            at: 1700000000,
            celsius: 21.5,
        }
    }

    #[test]
    fn templator_create_table() {
        let sql = templator()
            .render(Artifact::CreateTable, &reading())
            .unwrap();
        assert_eq!(
            sql,
            indoc! {"
                create table metrics.readings (
                    sensor varchar,
                    at bigint,
                    temp real,
                    primary key (sensor, at)
                )"}
        );
    }

    #[test]
    fn templator_most_recent() {
        let sql = templator()
            .render(Artifact::GetMostRecent, &reading())
            .unwrap();
        assert_eq!(sql, "select max(at) from metrics.readings");
    }

    #[test]
    fn templator_extra_data() {
        let templator = templator();
        assert_eq!(
            templator.render(Artifact::Get, &reading()).unwrap(),
            "select * from readings"
        );
        assert_eq!(
            templator
                .render_with(Artifact::Get, &reading(), [("rowlimit", 10)])
                .unwrap(),
            "select * from readings limit 10"
        );
        let templator = templator.with_data("rowlimit", 5);
        assert_eq!(
            templator.render(Artifact::Get, &reading()).unwrap(),
            "select * from readings limit 5"
        );
    }

    #[test]
    fn templator_context() {
        let templator = templator();
        let value = tagsql_core::to_struct(&reading()).unwrap();
        let context = templator.context(&value);
        assert_eq!(context.path(&["Struct", "Name"]), Data::from("Reading"));
        assert_eq!(context.path(&["Table", "Schema"]), Data::from("metrics"));
        assert_eq!(context.path(&["Config", "FallbackType"]), Data::from("blob"));
        assert_eq!(
            context.path(&["PrimaryKey"]),
            Data::list(["sensor", "at"])
        );
        let fields = context.path(&["Struct", "Fields"]);
        let fields = fields.as_list().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[2].field("TagName"), Data::from("temp"));
        assert_eq!(fields[2].field("Type"), Data::from("real"));
        assert_eq!(fields[2].field("Kind"), Data::from("Scalar"));
        assert_eq!(fields[0].field("PrimaryKey"), Data::from(true));
    }

    #[test]
    fn templator_functions() {
        let templator = templator().with_function("shout", |args| {
            Ok(Data::Str(format!("{}!", args[0]).to_uppercase()))
        });
        assert_eq!(
            templator
                .render_text("{{ .Table.Name | shout }}", &reading())
                .unwrap(),
            "READINGS!"
        );
        assert!(templator.funcs().contains("shout"));
        assert!(templator.funcs().contains("joinslices"));
    }

    #[test]
    fn templator_errors() {
        let templator = templator().with_template(Artifact::Put, "{{ if }}");
        let error = templator.render(Artifact::Put, &reading()).unwrap_err();
        assert!(error.to_string().contains("Put"));
        assert!(
            error
                .chain()
                .any(|e| matches!(e.downcast_ref::<MetaError>(), Some(MetaError::TemplateSyntax { .. })))
        );
        let error = templator.render(Artifact::Put, &3_u8).unwrap_err();
        assert!(
            error
                .chain()
                .any(|e| matches!(e.downcast_ref::<MetaError>(), Some(MetaError::NotAStruct { .. })))
        );
    }

    #[test]
    fn templator_config_merge() {
        let base = config();
        let merged = base.clone().merge(
            &TemplatorConfig::default()
                .with_table("custom")
                .with_tagged_fields_only(true),
        );
        assert_eq!(merged.schema, "metrics");
        assert_eq!(merged.table, "custom");
        assert_eq!(merged.field_name_tags, ["db"]);
        assert!(merged.tagged_fields_only);
        let merged = merged.merge(&TemplatorConfig::default());
        assert!(!merged.tagged_fields_only);
        assert_eq!(merged.table, "custom");

        let templator = templator().with_config(&TemplatorConfig::default().with_table("Custom"));
        assert_eq!(
            templator.render(Artifact::Get, &reading()).unwrap(),
            "select * from custom"
        );
    }

    #[test]
    fn artifact_names() {
        assert_eq!(Artifact::ALL.len(), 9);
        assert_eq!(Artifact::PutTempToTable.to_string(), "PutTempToTable");
        let templates = Templates::default().with(Artifact::DropTable, "drop");
        assert_eq!(templates.get(Artifact::DropTable), "drop");
        assert_eq!(templates.get(Artifact::Put), "");
    }

    #[test]
    fn templator_long_multibyte_output() {
        log::set_max_level(log::LevelFilter::Debug);
        let text = "é".repeat(300);
        let rendered = Templator::default()
            .with_template(Artifact::CreateTable, text.as_str())
            .render(Artifact::CreateTable, &Value::structure("S", "", vec![]))
            .unwrap();
        assert_eq!(rendered, text);
        assert_eq!(floor_char_boundary(&text, 497), 496);
        assert_eq!(floor_char_boundary(&text, 496), 496);
        assert_eq!(floor_char_boundary("abc", 497), 3);
        assert_eq!(floor_char_boundary("", 0), 0);
    }

    #[test]
    fn templator_namespace_separator() {
        let value = Struct::new(
            &reading(),
            StructConfig::default()
                .with_namespace(["Lab", "Metrics"])
                .with_namespace_separator("::"),
        )
        .unwrap();
        let templator = Templator::default()
            .with_template(Artifact::DropTable, "{{ .Table.Schema }}|{{ .Table.Identifier }}");
        assert_eq!(
            templator
                .render_struct(Artifact::DropTable, &value, Vec::<(String, Data)>::new())
                .unwrap(),
            "Lab::Metrics|lab::metrics::reading"
        );
    }
}
