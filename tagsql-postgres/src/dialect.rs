use crate::{FALLBACK_TYPE, postgres_templates, postgres_type_map};
use tagsql_core::{Data, Dialect, FuncMap, MetaError, Templates, TemplatorConfig, TypeMap};

pub struct PostgresDialect {}

impl PostgresDialect {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for PostgresDialect {
    const NAME: &'static str = "postgres";

    fn config(&self) -> TemplatorConfig {
        TemplatorConfig::default()
            .with_schema("public")
            .with_table_name_tags(["table"])
            .with_field_name_tags(["pg", "postgres", "db", "sql"])
            .with_last_insert_tags(["pgli"])
            .with_tagged_fields_only(false)
            .with_data_type_tag("pgtype")
            .with_primary_key_tag("primarykey")
            .with_fallback_type(FALLBACK_TYPE)
    }

    fn templates(&self) -> Templates {
        postgres_templates()
    }

    fn type_map(&self) -> TypeMap {
        postgres_type_map()
    }

    /// `pgtype` maps one Rust type name, `pgtypes` every name of its
    /// arguments. Unknown names become `text`.
    fn functions(&self) -> FuncMap {
        let single = self.type_map();
        let many = single.clone();
        FuncMap::new()
            .with("pgtype", move |args| match args {
                [name] => Ok(Data::from(pg_type(&single, name))),
                _ => Err(MetaError::Function {
                    name: "pgtype".into(),
                    message: format!("wrong number of args: want 1 got {}", args.len()),
                }
                .into()),
            })
            .with("pgtypes", move |args| {
                Ok(Data::list(
                    args.iter()
                        .flat_map(|v| match v {
                            Data::List(items) => items.clone(),
                            Data::Nil => Vec::new(),
                            v => vec![v.clone()],
                        })
                        .map(|v| pg_type(&many, &v)),
                ))
            })
    }
}

fn pg_type(types: &TypeMap, name: &Data) -> String {
    let name = name.to_string();
    match types.to(&name) {
        Some(v) => v.to_string(),
        None => {
            log::debug!("No postgres type for `{}`, using {}", name, FALLBACK_TYPE);
            FALLBACK_TYPE.to_string()
        }
    }
}
