#[cfg(test)]
mod tests {
    use indoc::indoc;
    use tagsql::{
        Artifact, Data, Dialect, Error, MetaError, Reflect, Templator, TemplatorConfig,
    };
    use tagsql_postgres::PostgresDialect;
    use tagsql_tests::init_logs;

    #[derive(Reflect)]
    #[tag(table = "Things")]
    pub struct Thing {
        #[tag(pk = "true", name = "id_hash")]
        pub identifier: String,
        #[tag(name = "Payload", pgtype = "jsonb")]
        pub value: String,
        #[tag(name = "-")]
        pub created: i64,
    }

    fn thing() -> Thing {
        Thing {
            identifier: "2c62".into(),
            value: "{}".into(),
            created: 0,
        }
    }

    fn templator() -> Templator {
        PostgresDialect::new().templator().with_config(
            &TemplatorConfig::default()
                .with_field_name_tags(["name"])
                .with_primary_key_tag("pk"),
        )
    }

    fn has_error(error: &Error, predicate: impl Fn(&MetaError) -> bool) -> bool {
        error
            .chain()
            .any(|e| e.downcast_ref::<MetaError>().is_some_and(&predicate))
    }

    #[test]
    fn create_table() {
        init_logs();
        assert_eq!(
            templator().render(Artifact::CreateTable, &thing()).unwrap(),
            indoc! {"
                CREATE TABLE IF NOT EXISTS public.things (
                \tid_hash\ttext,
                \tpayload\tjsonb,
                \tcreated\tbigint,
                \tPRIMARY KEY ( id_hash )
                )"}
        );
    }

    #[test]
    fn put() {
        init_logs();
        assert_eq!(
            templator().render(Artifact::Put, &thing()).unwrap(),
            indoc! {"
                insert into public.things (
                \tid_hash,
                \tpayload,
                \tcreated
                ) values (
                \t:id_hash,
                \t:payload,
                \t:created
                ) on conflict ( id_hash ) do nothing"}
        );
        assert_eq!(
            templator().render(Artifact::PutTempToTable, &thing()).unwrap(),
            indoc! {"
                insert into public.things
                select distinct on ( tmp.id_hash ) tmp.*
                from _tmp_things tmp
                on conflict ( id_hash ) do nothing"}
        );
    }

    #[test]
    fn get_with_row_limit() {
        init_logs();
        let templator = templator();
        assert_eq!(
            templator
                .render_with(Artifact::Get, &thing(), [("rowlimit", 10)])
                .unwrap(),
            indoc! {"
                select
                \tid_hash,
                \tpayload,
                \tcreated
                from
                \tpublic.things
                limit 10"}
        );
        let batch = vec![thing(), thing()];
        assert_eq!(
            templator.render(Artifact::Get, &batch).unwrap(),
            templator.render(Artifact::Get, &thing()).unwrap(),
        );
    }

    #[test]
    fn custom_template_and_data() {
        init_logs();
        let templator = templator()
            .with_data("Owner", "ops")
            .with_function("quote", |args: &[Data]| {
                let text = args.first().map(ToString::to_string).unwrap_or_default();
                Ok(Data::Str(format!("'{}'", text)))
            })
            .with_template(
                Artifact::DropTable,
                "drop table {{ .Table.Identifier }} -- {{ quote .Owner }}",
            );
        assert_eq!(
            templator.render(Artifact::DropTable, &thing()).unwrap(),
            "drop table public.things -- 'ops'"
        );
        assert_eq!(
            templator
                .render_text("{{ pgtype .Struct.TypeName }}/{{ pgtype \"i64\" }}", &thing())
                .unwrap(),
            "text/bigint"
        );
    }

    #[test]
    fn errors() {
        init_logs();
        let templator = templator();
        let error = templator
            .render_text(
                r#"{{ joinslices " " "," .PrimaryKey (pluck "Name" .Columns) }}"#,
                &thing(),
            )
            .unwrap_err();
        assert!(has_error(&error, |e| matches!(e, MetaError::LengthMismatch(v) if *v == [1, 3])));
        let error = templator
            .clone()
            .with_template(Artifact::Get, "select {{ .Table.Name ")
            .render(Artifact::Get, &thing())
            .unwrap_err();
        assert!(has_error(&error, |e| matches!(e, MetaError::TemplateSyntax { .. })));
        let error = templator.render(Artifact::Get, &"text").unwrap_err();
        assert!(has_error(&error, |e| matches!(e, MetaError::NotAStruct { .. })));
        let error = templator.render(Artifact::Get, &()).unwrap_err();
        assert!(has_error(&error, |e| matches!(e, MetaError::InvalidValue(..))));
    }
}
