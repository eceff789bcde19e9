use crate::{Field, TypeMap};

/// Indicates how (or if) a column participates in the primary key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyType {
    /// Single-column primary key.
    PrimaryKey,
    /// Member of a composite primary key.
    PartOfPrimaryKey,
    /// Not part of the primary key.
    #[default]
    None,
}

impl PrimaryKeyType {
    pub fn is_key(&self) -> bool {
        *self != PrimaryKeyType::None
    }
}

/// How fields become columns.
#[derive(Debug, Clone, Default)]
pub struct ColumnSpec {
    /// Naming tag keys, in priority order.
    pub naming_tags: Vec<String>,
    /// Tag holding an explicit column type.
    pub type_tag: String,
    /// Tag marking primary key members.
    pub primary_key_tag: String,
    /// Keep only the fields carrying a true naming tag.
    pub tagged_only: bool,
    pub type_map: TypeMap,
    /// Type used when neither the tag nor the type map give one.
    pub fallback_type: String,
}

/// One column descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Member name.
    pub field: String,
    /// Lowercased column name.
    pub name: String,
    pub data_type: String,
    pub primary_key: PrimaryKeyType,
}

impl Column {
    pub fn new(field: &Field, spec: &ColumnSpec) -> Self {
        let data_type = [field.non_empty_tag_value([&spec.type_tag])]
            .into_iter()
            .chain(field.value().mapped_type(&spec.type_map))
            .find(|v| !v.is_empty())
            .unwrap_or(spec.fallback_type.as_str())
            .to_string();
        let primary_key = if !spec.primary_key_tag.is_empty()
            && field.has_tag_true([&spec.primary_key_tag])
        {
            PrimaryKeyType::PrimaryKey
        } else {
            PrimaryKeyType::None
        };
        Self {
            field: field.name().to_string(),
            name: field.tag_name(&spec.naming_tags).to_lowercase(),
            data_type,
            primary_key,
        }
    }
}

/// Marks the members of a composite key as such.
pub fn mark_composite_key(columns: &mut [Column]) {
    if columns.iter().filter(|c| c.primary_key.is_key()).count() > 1 {
        for column in columns.iter_mut().filter(|c| c.primary_key.is_key()) {
            column.primary_key = PrimaryKeyType::PartOfPrimaryKey;
        }
    }
}
