use crate::{
    DEFAULT_SEPARATOR, Field, Fields, Kind, MetaError, Reflect, Result, Tag, Tags, Value, ValueMap,
    identifier, to_value,
};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Identity token of a struct: a v4 uuid without dashes.
pub fn new_uuid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The value describing the shape of a struct or of a collection of structs.
///
/// A sequence or mapping is represented by its first element or, when empty,
/// by a zero valued element.
pub(crate) fn representative(value: Value) -> Value {
    match value.kind() {
        Kind::Sequence | Kind::Mapping => match value.children().into_iter().next() {
            Some(first) => first,
            None => {
                log::warn!(
                    "`{}` is empty, its element type is used as representative",
                    value.type_name()
                );
                value.new_element().unwrap_or(value)
            }
        },
        _ => value,
    }
}

/// Named, namespaced view over a struct shaped [`Value`].
#[derive(Debug, Clone)]
pub struct Struct {
    name: String,
    namespace: Vec<String>,
    namespace_separator: String,
    uuid: String,
    attributes: BTreeMap<String, String>,
    tags: Tags,
    parent: Option<Box<Struct>>,
    value: Value,
}

/// Overrides applied by [`Struct::new`].
#[derive(Debug, Clone, Default)]
pub struct StructConfig {
    pub name: Option<String>,
    pub namespace: Option<Vec<String>>,
    pub namespace_separator: Option<String>,
    pub uuid: Option<String>,
    pub tags: Option<Tags>,
    /// Replace the struct tags instead of merging key by key.
    pub remove_existing_tags: bool,
    pub attributes: Option<BTreeMap<String, String>>,
    /// Replace the attributes instead of merging key by key.
    pub remove_existing_attributes: bool,
}

impl StructConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.namespace = Some(namespace.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_namespace_separator(mut self, separator: impl Into<String>) -> Self {
        self.namespace_separator = Some(separator.into());
        self
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_tags(mut self, tags: Tags, remove_existing: bool) -> Self {
        self.tags = Some(tags);
        self.remove_existing_tags = remove_existing;
        self
    }

    pub fn with_attributes(
        mut self,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
        remove_existing: bool,
    ) -> Self {
        self.attributes = Some(
            attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self.remove_existing_attributes = remove_existing;
        self
    }
}

/// Introspects `value` as a struct, unwrapping one level of collection.
pub fn to_struct<T: Reflect + ?Sized>(value: &T) -> Result<Struct> {
    Struct::from_value(to_value(value)?)
}

impl Struct {
    /// Builds the struct and applies the overrides of `config`.
    pub fn new<T: Reflect + ?Sized>(value: &T, config: StructConfig) -> Result<Struct> {
        let mut result = to_struct(value)?;
        result.configure(config);
        Ok(result)
    }

    pub fn from_value(value: Value) -> Result<Struct> {
        let value = representative(value);
        if value.kind() != Kind::Struct {
            return Err(MetaError::NotAStruct {
                kind: value.kind(),
                type_name: value.type_name().to_string(),
            }
            .into());
        }
        log::debug!("Introspecting struct `{}`", value.type_name());
        Ok(Struct {
            name: value.type_name().to_string(),
            namespace: Vec::new(),
            namespace_separator: DEFAULT_SEPARATOR.into(),
            uuid: new_uuid(),
            attributes: BTreeMap::new(),
            tags: Tags::parse(value.tag()),
            parent: None,
            value,
        })
    }

    pub fn configure(&mut self, config: StructConfig) -> &mut Self {
        if let Some(name) = config.name.filter(|v| !v.is_empty()) {
            self.name = name;
        }
        if let Some(namespace) = config.namespace.filter(|v| !v.is_empty()) {
            self.namespace = namespace;
        }
        if let Some(separator) = config.namespace_separator.filter(|v| !v.is_empty()) {
            self.namespace_separator = separator;
        }
        if let Some(uuid) = config.uuid.filter(|v| !v.is_empty()) {
            self.uuid = uuid;
        }
        if config.remove_existing_tags {
            self.tags = Tags::default();
        }
        if let Some(tags) = config.tags {
            self.tags.merge(&tags);
        }
        if config.remove_existing_attributes {
            self.attributes.clear();
        }
        if let Some(attributes) = config.attributes {
            self.attributes.extend(attributes);
        }
        self
    }

    /// Falls back to the type name, never empty for a named type.
    pub fn name(&self) -> &str {
        if self.name.is_empty() {
            self.value.type_name()
        } else {
            &self.name
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    pub fn set_namespace(
        &mut self,
        namespace: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        self.namespace = namespace.into_iter().map(Into::into).collect();
        self
    }

    pub fn namespace_separator(&self) -> &str {
        &self.namespace_separator
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn set_uuid(&mut self, uuid: impl Into<String>) -> &mut Self {
        self.uuid = uuid.into();
        self
    }

    /// Replaces the identity token and returns it.
    pub fn new_uuid(&mut self) -> &str {
        self.uuid = new_uuid();
        &self.uuid
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn parent(&self) -> Option<&Struct> {
        self.parent.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn type_name(&self) -> &str {
        self.value.type_name()
    }

    pub fn identifier(&self) -> String {
        identifier(&self.namespace, self.name(), &self.namespace_separator)
    }

    /// First non negated, non empty struct tag among `keys`, else the name.
    pub fn tag_name<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> String {
        self.tags
            .non_empty_value(keys)
            .map(|t| t.first().to_string())
            .unwrap_or_else(|| self.name().to_string())
    }

    pub fn tag_identifier<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> String {
        identifier(
            &self.namespace,
            &self.tag_name(keys),
            &self.namespace_separator,
        )
    }

    pub fn fields(&self) -> Fields<'_> {
        self.value
            .annotated_children()
            .into_iter()
            .map(|(value, tag)| Field::new(value, tag, self))
            .collect()
    }

    pub fn value_map(&self, tag_key: &str) -> ValueMap {
        ValueMap::from_fields(&self.fields(), tag_key)
    }

    pub(crate) fn derived(value: Value, name: &str, tags: Tags, parent: &Struct) -> Result<Struct> {
        let mut result = Struct::from_value(value)?;
        result.name = name.to_string();
        result.namespace = parent.namespace.clone();
        result.namespace_separator = parent.namespace_separator.clone();
        result.uuid = parent.uuid.clone();
        result.tags = tags;
        result.parent = Some(Box::new(parent.clone()));
        Ok(result)
    }

    /// Sets a single struct tag.
    pub fn set_tag(&mut self, key: impl Into<String>, tag: Tag) -> &mut Self {
        self.tags.set(key, tag);
        self
    }
}

/// Several structs, typically one per row type of a batch.
#[derive(Debug, Clone, Default)]
pub struct Structs(pub Vec<Struct>);

impl Structs {
    pub fn to_structs<T: Reflect>(items: &[T]) -> Result<Structs> {
        items.iter().map(to_struct).collect::<Result<_>>().map(Structs)
    }

    pub fn tag_names<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        self.0.iter().map(|s| s.tag_name(keys)).collect()
    }

    pub fn identifiers(&self) -> Vec<String> {
        self.0.iter().map(Struct::identifier).collect()
    }

    /// Keyed by name, a later struct replaces an earlier one with the same name.
    pub fn to_struct_map(&self) -> BTreeMap<String, Struct> {
        self.0
            .iter()
            .map(|s| (s.name().to_string(), s.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Struct> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
