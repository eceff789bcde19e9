use indoc::indoc;
use tagsql_core::Templates;

/// The Postgres texts of every artifact.
///
/// Columns and primary key come from `.Columns` and `.PrimaryKey`, so names and
/// types are always resolved over the same fields.
pub fn postgres_templates() -> Templates {
    Templates {
        create_schema: "create schema if not exists {{ .Config.Schema | tolower }}".into(),
        drop_schema: "drop schema if exists {{ .Config.Schema | tolower }}".into(),
        create_table: indoc! {r#"
            CREATE TABLE IF NOT EXISTS {{ .Table.Identifier }} (
            	{{- $columns := joinslices "\t" ",\n\t" (pluck "Name" .Columns) (pluck "Type" .Columns) -}}
            	{{- if $columns }}{{ print "\n\t" $columns }}{{ end -}}
            	{{- if .PrimaryKey }}{{ printf ",\n\tPRIMARY KEY ( %s )" (join ", " .PrimaryKey) }}{{ end }}
            )"#}
        .into(),
        create_temp_table: indoc! {"
            create temp table _tmp_{{ .Table.Name }} (
            	like {{ .Table.Identifier }} excluding constraints
            )"}
        .into(),
        drop_table: "drop table if exists {{ .Table.Identifier }}".into(),
        get: indoc! {r#"
            select
            	{{ pluck "Name" .Columns | join ",\n\t" }}
            from
            	{{ .Table.Identifier }}
            {{- if .rowlimit }}
            limit {{ .rowlimit }}
            {{- end }}"#}
        .into(),
        get_most_recent: indoc! {r#"
            select
            	{{ join ",\n\t" .LastInsert }}
            from
            	{{ .Table.Identifier }}"#}
        .into(),
        put: indoc! {r#"
            insert into {{ .Table.Identifier }} (
            	{{- $names := pluck "Name" .Columns }}
            	{{ join ",\n\t" $names }}
            ) values (
            	:{{ join ",\n\t:" $names }}
            )
            {{- if .PrimaryKey }} on conflict ( {{ join ", " .PrimaryKey }} ) do nothing{{ end }}"#}
        .into(),
        put_temp_to_table: indoc! {r#"
            insert into {{ .Table.Identifier }}
            select distinct
            {{- if .PrimaryKey }} on ( tmp.{{ join ", tmp." .PrimaryKey }} ){{ end }} tmp.*
            from _tmp_{{ .Table.Name }} tmp
            {{- if .PrimaryKey }}
            on conflict ( {{ join ", " .PrimaryKey }} ) do nothing
            {{- end }}"#}
        .into(),
    }
}
