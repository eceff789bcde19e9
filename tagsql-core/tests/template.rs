#[cfg(test)]
mod tests {
    use indoc::indoc;
    use tagsql_core::{Data, FuncMap, MetaError, Template, join_slices};

    fn render(text: &str, data: &Data) -> tagsql_core::Result<String> {
        let funcs = FuncMap::builtin();
        Template::parse("test", text, &funcs)?.execute(data, &funcs)
    }

    fn context() -> Data {
        Data::map([
            ("Name", Data::from("orders")),
            ("Empty", Data::from("")),
            ("Count", Data::from(3)),
            ("Names", Data::list(["id", "total"])),
            ("Types", Data::list(["bigint", "numeric"])),
            (
                "Columns",
                Data::list([
                    Data::map([("Name", "id"), ("Type", "bigint")]),
                    Data::map([("Name", "total"), ("Type", "numeric")]),
                ]),
            ),
            (
                "Nested",
                Data::map([("Inner", Data::map([("Value", "deep")]))]),
            ),
        ])
    }

    #[test]
    fn template_fields() {
        let data = context();
        assert_eq!(render("table {{ .Name }};", &data).unwrap(), "table orders;");
        assert_eq!(render("{{ .Nested.Inner.Value }}", &data).unwrap(), "deep");
        assert_eq!(render("[{{ .Missing }}]", &data).unwrap(), "[]");
        assert_eq!(render("{{ .Names }}", &data).unwrap(), "[id total]");
        assert_eq!(render("{{ $.Count }}", &data).unwrap(), "3");
    }

    #[test]
    fn template_pipelines() {
        let data = context();
        assert_eq!(render("{{ .Name | toupper }}", &data).unwrap(), "ORDERS");
        assert_eq!(render("{{ join \", \" .Names }}", &data).unwrap(), "id, total");
        assert_eq!(
            render("{{ .Name | replace \"o\" \"0\" 1 }}", &data).unwrap(),
            "0rders"
        );
        assert_eq!(
            render("{{ replaceall \"r\" \"R\" .Name }}", &data).unwrap(),
            "oRdeRs"
        );
        assert_eq!(
            render("{{ printf \"%s(%d)\" .Name .Count }}", &data).unwrap(),
            "orders(3)"
        );
        assert_eq!(
            render("{{ joinslices \" \" \", \" .Names .Types }}", &data).unwrap(),
            "id bigint, total numeric"
        );
        assert_eq!(
            render("{{ pluck \"Type\" .Columns | join \"/\" }}", &data).unwrap(),
            "bigint/numeric"
        );
        assert_eq!(render("{{ \"CamelCase\" | tosnake }}", &data).unwrap(), "camel_case");
        assert_eq!(render("{{ len .Names }}", &data).unwrap(), "2");
        assert_eq!(render("{{ index .Names 1 }}", &data).unwrap(), "total");
        assert_eq!(
            render("{{ coalesce .Names (toslice .Missing) \"x\" | join \",\" }}", &data).unwrap(),
            "id,total"
        );
    }

    #[test]
    fn template_control() {
        let data = context();
        let text = indoc! {r#"
            {{- range $i, $c := .Columns }}
            {{- if $i }},{{ end }}
            {{ $c.Name }} {{ $c.Type }}
            {{- end }}
        "#};
        assert_eq!(render(text, &data).unwrap(), "\nid bigint,\ntotal numeric\n");

        let text = "{{ if .Empty }}a{{ else if eq .Count 3 }}b{{ else }}c{{ end }}";
        assert_eq!(render(text, &data).unwrap(), "b");
        let text = "{{ with .Nested.Inner }}{{ .Value }}{{ else }}none{{ end }}";
        assert_eq!(render(text, &data).unwrap(), "deep");
        let text = "{{ range .Missing }}x{{ else }}empty{{ end }}";
        assert_eq!(render(text, &data).unwrap(), "empty");
        let text = "{{ $n := .Name }}{{ if true }}{{ $n = \"other\" }}{{ end }}{{ $n }}";
        assert_eq!(render(text, &data).unwrap(), "other");
        assert_eq!(render("a {{/* note */}} b", &data).unwrap(), "a  b");
        assert_eq!(render("a {{- /* note */ -}} b", &data).unwrap(), "ab");
    }

    #[test]
    fn template_syntax_errors() {
        let data = context();
        for text in [
            "{{ if .Name }}unterminated",
            "{{ end }}",
            "{{ .Name ",
            "{{ nosuchfunction .Name }}",
            "{{ $undefined }}",
            "line\n{{ \"unterminated }}",
        ] {
            let error = render(text, &data).unwrap_err();
            assert!(
                matches!(
                    error.downcast_ref::<MetaError>(),
                    Some(MetaError::TemplateSyntax { .. })
                ),
                "{}: {:?}",
                text,
                error
            );
        }
        let error = render("ok\n  {{ end }}", &data).unwrap_err();
        match error.downcast_ref::<MetaError>() {
            Some(MetaError::TemplateSyntax { line, column, .. }) => {
                assert_eq!((*line, *column), (2, 5));
            }
            _ => panic!("unexpected error {:?}", error),
        }
    }

    #[test]
    fn template_execution_errors() {
        let data = Data::map([
            ("A", Data::list(["1", "2"])),
            ("B", Data::list(["1"])),
        ]);
        let error = render("{{ joinslices \",\" \";\" .A .B }}", &data).unwrap_err();
        assert!(
            error
                .chain()
                .any(|e| matches!(e.downcast_ref::<MetaError>(), Some(MetaError::LengthMismatch(..))))
        );
        let error = render("{{ not }}", &data).unwrap_err();
        assert!(
            error
                .chain()
                .any(|e| matches!(e.downcast_ref::<MetaError>(), Some(MetaError::Function { .. })))
        );
    }

    #[test]
    fn template_custom_function() {
        let funcs = FuncMap::builtin().with("quote", |args| {
            Ok(Data::Str(format!("\"{}\"", args.first().cloned().unwrap_or_default())))
        });
        let template = Template::parse("custom", "{{ .Name | quote }}", &funcs).unwrap();
        assert_eq!(template.name(), "custom");
        assert_eq!(template.execute(&context(), &funcs).unwrap(), "\"orders\"");
    }

    #[test]
    fn join_slices_lengths() {
        assert_eq!(
            join_slices(" ", ", ", &[vec!["a", "b"], vec!["x", "y"]]).unwrap(),
            "a x, b y"
        );
        assert_eq!(join_slices::<&str>(" ", ", ", &[]).unwrap(), "");
        let error = join_slices(" ", ", ", &[vec!["a"], vec![]]).unwrap_err();
        assert_eq!(
            error.downcast_ref::<MetaError>(),
            Some(&MetaError::LengthMismatch(vec![1, 0]))
        );
    }
}
