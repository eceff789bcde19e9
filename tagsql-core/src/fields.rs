use crate::{Column, ColumnSpec, Field, Kind, Tags, coalesce, mark_composite_key};
use std::{collections::BTreeMap, ops::Deref};

/// Ordered fields of a struct.
///
/// Filters keep the relative order, projections return one entry per field so
/// lists projected from the same `Fields` line up by position.
#[derive(Debug, Clone, Default)]
pub struct Fields<'s>(Vec<Field<'s>>);

impl<'s> Fields<'s> {
    pub fn filtered_by(&self, mut predicate: impl FnMut(&Field<'s>) -> bool) -> Fields<'s> {
        self.0.iter().filter(|f| predicate(f)).cloned().collect()
    }

    /// Fields having any of `keys`, negated or not.
    pub fn with_tag<S: AsRef<str>>(&self, keys: &[S]) -> Fields<'s> {
        self.filtered_by(|f| f.has_tag(keys))
    }

    pub fn without_tag<S: AsRef<str>>(&self, keys: &[S]) -> Fields<'s> {
        self.filtered_by(|f| !f.has_tag(keys))
    }

    pub fn with_tag_true<S: AsRef<str>>(&self, keys: &[S]) -> Fields<'s> {
        self.filtered_by(|f| f.has_tag_true(keys))
    }

    pub fn with_tag_false(&self, key: &str) -> Fields<'s> {
        self.filtered_by(|f| f.has_tag_false([key]))
    }

    pub fn with_tag_value(&self, key: &str, value: &str) -> Fields<'s> {
        self.filtered_by(|f| f.has_tag_value(key, value))
    }

    pub fn without_tag_value(&self, key: &str, value: &str) -> Fields<'s> {
        self.filtered_by(|f| !f.has_tag_value(key, value))
    }

    /// Fields named in `names`, in the order of the struct.
    pub fn by_names<S: AsRef<str>>(&self, names: &[S]) -> Fields<'s> {
        self.filtered_by(|f| names.iter().any(|n| n.as_ref() == f.name()))
    }

    pub fn by_name(&self, name: &str) -> Option<&Field<'s>> {
        self.0.iter().find(|f| f.name() == name)
    }

    pub fn by_type_names<S: AsRef<str>>(&self, type_names: &[S]) -> Fields<'s> {
        self.filtered_by(|f| type_names.iter().any(|n| n.as_ref() == f.type_name()))
    }

    pub fn by_kinds(&self, kinds: &[Kind]) -> Fields<'s> {
        self.filtered_by(|f| kinds.contains(&f.kind()))
    }

    pub fn multi_valued(&self) -> Fields<'s> {
        self.filtered_by(Field::multi_valued)
    }

    /// The only field, if there is exactly one.
    pub fn field(&self) -> Option<&Field<'s>> {
        match self.0.as_slice() {
            [field] => Some(field),
            _ => None,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|f| f.name().to_string()).collect()
    }

    pub fn tag_names<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        self.0.iter().map(|f| f.tag_name(keys)).collect()
    }

    pub fn identifiers(&self) -> Vec<String> {
        self.0.iter().map(Field::identifier).collect()
    }

    pub fn tag_identifiers<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        self.0.iter().map(|f| f.tag_identifier(keys)).collect()
    }

    pub fn type_names(&self) -> Vec<String> {
        self.0.iter().map(|f| f.type_name().to_string()).collect()
    }

    pub fn kinds(&self) -> Vec<Kind> {
        self.0.iter().map(Field::kind).collect()
    }

    /// Empty string where no key has a usable value.
    pub fn non_empty_tag_values<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        self.0
            .iter()
            .map(|f| f.non_empty_tag_value(keys).to_string())
            .collect()
    }

    /// The explicit tag value where present, else the Rust type name.
    pub fn tag_type_names<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        coalesce(&self.non_empty_tag_values(keys), &self.type_names(), "")
    }

    pub fn tags(&self) -> BTreeMap<String, Tags> {
        self.0
            .iter()
            .map(|f| (f.name().to_string(), f.tags().clone()))
            .collect()
    }

    /// Column descriptors: name, type and primary key flag in a single record
    /// per field.
    pub fn columns(&self, spec: &ColumnSpec) -> Vec<Column> {
        let fields = if spec.tagged_only {
            self.with_tag_true(&spec.naming_tags)
        } else {
            self.clone()
        };
        let mut columns: Vec<_> = fields.iter().map(|f| Column::new(f, spec)).collect();
        mark_composite_key(&mut columns);
        columns
    }
}

impl<'s> Deref for Fields<'s> {
    type Target = [Field<'s>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'s> FromIterator<Field<'s>> for Fields<'s> {
    fn from_iter<T: IntoIterator<Item = Field<'s>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'s> IntoIterator for Fields<'s> {
    type Item = Field<'s>;
    type IntoIter = std::vec::IntoIter<Field<'s>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, 's> IntoIterator for &'a Fields<'s> {
    type Item = &'a Field<'s>;
    type IntoIter = std::slice::Iter<'a, Field<'s>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
