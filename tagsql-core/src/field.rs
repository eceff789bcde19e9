use crate::{Kind, Result, Struct, Tag, Tags, Value, identifier};

/// One member of a [`Struct`]: its value, its annotation and its owner.
#[derive(Debug, Clone)]
pub struct Field<'s> {
    name: String,
    raw_tag: String,
    tags: Tags,
    value: Value,
    parent: &'s Struct,
}

impl<'s> Field<'s> {
    pub(crate) fn new(value: Value, raw_tag: &str, parent: &'s Struct) -> Self {
        Self {
            name: value.name().unwrap_or_default().to_string(),
            raw_tag: raw_tag.to_string(),
            tags: Tags::parse(raw_tag),
            value,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw_tag(&self) -> &str {
        &self.raw_tag
    }

    /// Parsed annotation, computed once when the field was built.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn parent(&self) -> &'s Struct {
        self.parent
    }

    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    pub fn type_name(&self) -> &str {
        self.value.type_name()
    }

    pub fn has_tag<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> bool {
        self.tags.exists(keys)
    }

    pub fn has_tag_true<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> bool {
        self.tags.is_true(keys)
    }

    pub fn has_tag_false<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> bool {
        self.tags.is_false(keys)
    }

    pub fn has_tag_value(&self, key: &str, value: &str) -> bool {
        self.tags.contains(key, value)
    }

    /// First of `keys` present and not negated.
    pub fn tag<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> Option<&Tag> {
        self.tags.value(keys)
    }

    /// Walks `keys` in order: negated and empty candidates are skipped, the
    /// first non empty value wins, otherwise the member name.
    pub fn tag_name<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> String {
        self.tags
            .non_empty_value(keys)
            .map(|t| t.first().to_string())
            .unwrap_or_else(|| self.name.clone())
    }

    /// The value of a single `key` or the member name.
    pub fn tagged_name(&self, key: &str) -> String {
        self.tag_name([key])
    }

    pub fn non_empty_tag_value<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> &str {
        self.tags
            .non_empty_value(keys)
            .map(Tag::first)
            .unwrap_or_default()
    }

    /// `parent identifier` + separator + lowercased member name.
    pub fn identifier(&self) -> String {
        self.namespaced(&self.name)
    }

    /// `parent identifier` + separator + lowercased tag name.
    pub fn tag_identifier<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> String {
        self.namespaced(&self.tag_name(keys))
    }

    fn namespaced(&self, name: &str) -> String {
        identifier(
            &[self.parent.identifier()],
            name,
            self.parent.namespace_separator(),
        )
    }

    /// Sequences and mappings, `Vec<u8>` included.
    pub fn multi_valued(&self) -> bool {
        matches!(self.kind(), Kind::Sequence | Kind::Mapping)
    }

    /// Zero valued element of a collection member.
    pub fn element(&self) -> Result<Value> {
        self.value.new_element()
    }

    /// The member as a struct of its own, named after the member and owned by
    /// this field's struct. Collections of structs are represented by their
    /// element.
    pub fn to_struct(&self) -> Result<Struct> {
        Struct::derived(
            self.value.clone(),
            &self.name,
            self.tags.clone(),
            self.parent,
        )
    }
}
