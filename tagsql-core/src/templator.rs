use crate::{
    Column, ColumnSpec, Data, Field, FuncMap, Reflect, Result, Struct, Template, TypeMap,
    coalesce, identifier, join_namespace, to_struct, truncate_long,
};
use anyhow::Context;
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

/// The SQL artifacts a [`Templator`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Artifact {
    CreateSchema,
    DropSchema,
    CreateTable,
    CreateTempTable,
    DropTable,
    Get,
    GetMostRecent,
    Put,
    PutTempToTable,
}

impl Artifact {
    pub const ALL: [Artifact; 9] = [
        Artifact::CreateSchema,
        Artifact::DropSchema,
        Artifact::CreateTable,
        Artifact::CreateTempTable,
        Artifact::DropTable,
        Artifact::Get,
        Artifact::GetMostRecent,
        Artifact::Put,
        Artifact::PutTempToTable,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Artifact::CreateSchema => "CreateSchema",
            Artifact::DropSchema => "DropSchema",
            Artifact::CreateTable => "CreateTable",
            Artifact::CreateTempTable => "CreateTempTable",
            Artifact::DropTable => "DropTable",
            Artifact::Get => "Get",
            Artifact::GetMostRecent => "GetMostRecent",
            Artifact::Put => "Put",
            Artifact::PutTempToTable => "PutTempToTable",
        }
    }
}

impl Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Template text of every artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Templates {
    pub create_schema: String,
    pub drop_schema: String,
    pub create_table: String,
    pub create_temp_table: String,
    pub drop_table: String,
    pub get: String,
    pub get_most_recent: String,
    pub put: String,
    pub put_temp_to_table: String,
}

impl Templates {
    pub fn get(&self, artifact: Artifact) -> &str {
        match artifact {
            Artifact::CreateSchema => &self.create_schema,
            Artifact::DropSchema => &self.drop_schema,
            Artifact::CreateTable => &self.create_table,
            Artifact::CreateTempTable => &self.create_temp_table,
            Artifact::DropTable => &self.drop_table,
            Artifact::Get => &self.get,
            Artifact::GetMostRecent => &self.get_most_recent,
            Artifact::Put => &self.put,
            Artifact::PutTempToTable => &self.put_temp_to_table,
        }
    }

    pub fn with(mut self, artifact: Artifact, text: impl Into<String>) -> Self {
        let slot = match artifact {
            Artifact::CreateSchema => &mut self.create_schema,
            Artifact::DropSchema => &mut self.drop_schema,
            Artifact::CreateTable => &mut self.create_table,
            Artifact::CreateTempTable => &mut self.create_temp_table,
            Artifact::DropTable => &mut self.drop_table,
            Artifact::Get => &mut self.get,
            Artifact::GetMostRecent => &mut self.get_most_recent,
            Artifact::Put => &mut self.put,
            Artifact::PutTempToTable => &mut self.put_temp_to_table,
        };
        *slot = text.into();
        self
    }
}

/// Dialect specific keys consumed by the templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatorConfig {
    /// Explicit schema, replaces the struct namespace when not empty.
    pub schema: String,
    /// Explicit table name, wins over the table naming tags when not empty.
    pub table: String,
    pub table_name_tags: Vec<String>,
    pub field_name_tags: Vec<String>,
    /// Tags holding the expressions that read the last inserted values.
    pub last_insert_tags: Vec<String>,
    pub tagged_fields_only: bool,
    pub data_type_tag: String,
    pub primary_key_tag: String,
    /// Column type used when neither the tag nor the type map give one.
    pub fallback_type: String,
}

impl TemplatorConfig {
    /// Values of `other` win when not empty, `tagged_fields_only` is always
    /// taken from `other`.
    pub fn merge(mut self, other: &TemplatorConfig) -> Self {
        fn take<T: Clone>(target: &mut T, value: &T, empty: bool) {
            if !empty {
                *target = value.clone();
            }
        }
        take(&mut self.schema, &other.schema, other.schema.is_empty());
        take(&mut self.table, &other.table, other.table.is_empty());
        take(
            &mut self.table_name_tags,
            &other.table_name_tags,
            other.table_name_tags.is_empty(),
        );
        take(
            &mut self.field_name_tags,
            &other.field_name_tags,
            other.field_name_tags.is_empty(),
        );
        take(
            &mut self.last_insert_tags,
            &other.last_insert_tags,
            other.last_insert_tags.is_empty(),
        );
        self.tagged_fields_only = other.tagged_fields_only;
        take(
            &mut self.data_type_tag,
            &other.data_type_tag,
            other.data_type_tag.is_empty(),
        );
        take(
            &mut self.primary_key_tag,
            &other.primary_key_tag,
            other.primary_key_tag.is_empty(),
        );
        take(
            &mut self.fallback_type,
            &other.fallback_type,
            other.fallback_type.is_empty(),
        );
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_table_name_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.table_name_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field_name_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.field_name_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_last_insert_tags(
        mut self,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.last_insert_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tagged_fields_only(mut self, tagged_fields_only: bool) -> Self {
        self.tagged_fields_only = tagged_fields_only;
        self
    }

    pub fn with_data_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.data_type_tag = tag.into();
        self
    }

    pub fn with_primary_key_tag(mut self, tag: impl Into<String>) -> Self {
        self.primary_key_tag = tag.into();
        self
    }

    pub fn with_fallback_type(mut self, fallback_type: impl Into<String>) -> Self {
        self.fallback_type = fallback_type.into();
        self
    }
}

impl From<&TemplatorConfig> for Data {
    fn from(value: &TemplatorConfig) -> Self {
        Data::map([
            ("Schema", Data::from(&value.schema)),
            ("Table", Data::from(&value.table)),
            ("TableNameTags", Data::list(&value.table_name_tags)),
            ("FieldNameTags", Data::list(&value.field_name_tags)),
            ("LastInsertTags", Data::list(&value.last_insert_tags)),
            ("TaggedFieldsOnly", Data::from(value.tagged_fields_only)),
            ("DataTypeTag", Data::from(&value.data_type_tag)),
            ("PrimaryKeyTag", Data::from(&value.primary_key_tag)),
            ("FallbackType", Data::from(&value.fallback_type)),
        ])
    }
}

/// Renders the artifacts of a dialect from the shape of a value.
///
/// A templator never changes once built: the builder methods return a new
/// one, and every render builds its own context.
#[derive(Debug, Clone, Default)]
pub struct Templator {
    config: TemplatorConfig,
    templates: Templates,
    funcs: FuncMap,
    data: BTreeMap<String, Data>,
    type_map: TypeMap,
}

impl Templator {
    pub fn new(config: TemplatorConfig, templates: Templates) -> Self {
        Self {
            config,
            templates,
            funcs: FuncMap::builtin(),
            data: BTreeMap::new(),
            type_map: TypeMap::default(),
        }
    }

    pub fn config(&self) -> &TemplatorConfig {
        &self.config
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    pub fn funcs(&self) -> &FuncMap {
        &self.funcs
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.type_map
    }

    /// Merges `config` over the current configuration.
    pub fn with_config(mut self, config: &TemplatorConfig) -> Self {
        self.config = self.config.merge(config);
        self
    }

    pub fn with_template(mut self, artifact: Artifact, text: impl Into<String>) -> Self {
        self.templates = self.templates.with(artifact, text);
        self
    }

    pub fn with_function<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Data]) -> Result<Data> + Send + Sync + 'static,
    {
        self.funcs = self.funcs.with(name, func);
        self
    }

    pub fn with_functions(mut self, funcs: &FuncMap) -> Self {
        self.funcs = self.funcs.merge(funcs);
        self
    }

    /// Extra top level entry of every render context.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Data>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_type_map(mut self, type_map: TypeMap) -> Self {
        self.type_map = type_map;
        self
    }

    pub fn column_spec(&self) -> ColumnSpec {
        ColumnSpec {
            naming_tags: self.config.field_name_tags.clone(),
            type_tag: self.config.data_type_tag.clone(),
            primary_key_tag: self.config.primary_key_tag.clone(),
            tagged_only: self.config.tagged_fields_only,
            type_map: self.type_map.clone(),
            fallback_type: self.config.fallback_type.clone(),
        }
    }

    /// Name of the table, the configured one or the struct tag name.
    pub fn table_name(&self, value: &Struct) -> String {
        if self.config.table.is_empty() {
            value.tag_name(&self.config.table_name_tags)
        } else {
            self.config.table.clone()
        }
        .to_lowercase()
    }

    /// The configured schema or the struct namespace.
    pub fn table_namespace(&self, value: &Struct) -> Vec<String> {
        if self.config.schema.is_empty() {
            value.namespace().to_vec()
        } else {
            vec![self.config.schema.clone()]
        }
    }

    /// Data every template receives.
    pub fn context(&self, value: &Struct) -> Data {
        let spec = self.column_spec();
        let fields = value.fields();
        let columns = fields.columns(&spec);
        let table = self.table_name(value);
        let namespace = self.table_namespace(value);
        let last_insert = fields.with_tag_true(&self.config.last_insert_tags);
        let last_insert = coalesce(
            &last_insert.non_empty_tag_values(&self.config.last_insert_tags),
            &last_insert
                .tag_names(&self.config.field_name_tags)
                .iter()
                .map(|v| v.to_lowercase())
                .collect::<Vec<_>>(),
            "",
        );
        let mut context = self.data.clone();
        context.extend([
            ("Config".to_string(), Data::from(&self.config)),
            (
                "Struct".to_string(),
                Data::map([
                    ("Name", Data::from(value.name())),
                    ("TypeName", Data::from(value.type_name())),
                    ("Identifier", Data::from(value.identifier())),
                    ("Namespace", Data::list(value.namespace())),
                    ("UUID", Data::from(value.uuid())),
                    ("Tags", Data::from(value.tags())),
                    ("Attributes", Data::map(value.attributes().iter())),
                    (
                        "Fields",
                        Data::list(fields.iter().map(|f| self.field_data(f, &spec))),
                    ),
                ]),
            ),
            (
                "Table".to_string(),
                Data::map([
                    ("Name", Data::from(&table)),
                    (
                        "Schema",
                        Data::from(join_namespace(&namespace, value.namespace_separator())),
                    ),
                    (
                        "Identifier",
                        Data::from(identifier(&namespace, &table, value.namespace_separator())),
                    ),
                ]),
            ),
            (
                "Columns".to_string(),
                Data::list(columns.iter().map(column_data)),
            ),
            (
                "PrimaryKey".to_string(),
                Data::list(
                    columns
                        .iter()
                        .filter(|c| c.primary_key.is_key())
                        .map(|c| c.name.as_str()),
                ),
            ),
            ("LastInsert".to_string(), Data::list(last_insert)),
        ]);
        Data::Map(context)
    }

    fn field_data(&self, field: &Field, spec: &ColumnSpec) -> Data {
        let column = Column::new(field, spec);
        Data::map([
            ("Name", Data::from(field.name())),
            ("TagName", Data::from(column.name.as_str())),
            ("Identifier", Data::from(field.identifier())),
            (
                "TagIdentifier",
                Data::from(field.tag_identifier(&self.config.field_name_tags)),
            ),
            ("TypeName", Data::from(field.type_name())),
            ("Kind", Data::from(format!("{:?}", field.kind()))),
            ("Tags", Data::from(field.tags())),
            ("Type", Data::from(column.data_type.as_str())),
            ("PrimaryKey", Data::from(column.primary_key.is_key())),
        ])
    }

    /// Renders `artifact` for the shape of `value`.
    pub fn render<T: Reflect + ?Sized>(&self, artifact: Artifact, value: &T) -> Result<String> {
        self.render_with(artifact, value, BTreeMap::<String, Data>::new())
    }

    /// Like [`Templator::render`], with extra context entries such as `rowlimit`.
    pub fn render_with<T, K, V>(
        &self,
        artifact: Artifact,
        value: &T,
        data: impl IntoIterator<Item = (K, V)>,
    ) -> Result<String>
    where
        T: Reflect + ?Sized,
        K: Into<String>,
        V: Into<Data>,
    {
        let value = to_struct(value).with_context(|| format!("rendering {}", artifact))?;
        self.render_struct(artifact, &value, data)
    }

    pub fn render_struct<K: Into<String>, V: Into<Data>>(
        &self,
        artifact: Artifact,
        value: &Struct,
        data: impl IntoIterator<Item = (K, V)>,
    ) -> Result<String> {
        let text = self.templates.get(artifact);
        let result = self
            .execute(artifact.name(), text, value, data)
            .with_context(|| format!("rendering {} for `{}`", artifact, value.name()))?;
        log::debug!("Rendered {}:\n{}", artifact, truncate_long!(result));
        Ok(result)
    }

    /// Renders an arbitrary template text against the context of `value`.
    pub fn render_text<T: Reflect + ?Sized>(&self, text: &str, value: &T) -> Result<String> {
        let value = to_struct(value)?;
        self.execute("text", text, &value, BTreeMap::<String, Data>::new())
    }

    fn execute<K: Into<String>, V: Into<Data>>(
        &self,
        name: &str,
        text: &str,
        value: &Struct,
        data: impl IntoIterator<Item = (K, V)>,
    ) -> Result<String> {
        let template = Template::parse(name, text, &self.funcs)?;
        let mut context = self.context(value);
        if let Data::Map(entries) = &mut context {
            entries.extend(data.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        template.execute(&context, &self.funcs)
    }
}

fn column_data(column: &Column) -> Data {
    Data::map([
        ("Name", Data::from(column.name.as_str())),
        ("Field", Data::from(column.field.as_str())),
        ("Type", Data::from(column.data_type.as_str())),
        ("PrimaryKey", Data::from(column.primary_key.is_key())),
    ])
}
