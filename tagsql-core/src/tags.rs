use crate::separated_by;
use std::fmt::{self, Display, Write};

/// First tag value marking a member as disabled for that key.
pub const NEGATION: &str = "-";

/// Ordered values of one annotation key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag(Vec<String>);

impl Tag {
    pub fn new<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self(values.into_iter().map(Into::into).collect())
    }

    /// Comma separated values, `""` gives a single empty value.
    pub fn parse(value: &str) -> Self {
        Self::new(value.split(','))
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    pub fn is_false(&self) -> bool {
        self.first() == NEGATION
    }

    pub fn is_true(&self) -> bool {
        !self.is_false()
    }

    /// Value at `index`, empty when out of bounds or when the tag is negated.
    pub fn at(&self, index: usize) -> &str {
        if self.is_false() {
            return "";
        }
        self.0.get(index).map(String::as_str).unwrap_or_default()
    }

    pub fn contains<S: AsRef<str>>(&self, values: impl IntoIterator<Item = S>) -> bool {
        values
            .into_iter()
            .any(|v| self.0.iter().any(|t| t == v.as_ref()))
    }

    pub fn not_contains<S: AsRef<str>>(&self, values: impl IntoIterator<Item = S>) -> bool {
        !self.contains(values)
    }

    /// Position of the first of `values` present in the tag.
    pub fn index<S: AsRef<str>>(&self, values: impl IntoIterator<Item = S>) -> Option<usize> {
        values
            .into_iter()
            .find_map(|v| self.0.iter().position(|t| t == v.as_ref()))
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Parsed annotation of a member: keys in the order they first appeared.
///
/// Lookups taking several keys honor the order given by the caller, never the
/// order of the annotation. Absence is reported as `None` or `false`, never as
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<(String, Tag)>);

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Tags {
    /// Parses `key:"v1,v2" other:"x"`. Fragments that do not match are skipped
    /// and a repeated key keeps the last values.
    pub fn parse(raw: &str) -> Self {
        let mut result = Tags::default();
        let mut skipped = false;
        let mut rest = raw;
        while !rest.is_empty() {
            let key_len = rest.find(|c| !is_word(c)).unwrap_or(rest.len());
            let (key, after) = rest.split_at(key_len);
            if let Some(quoted) = after.strip_prefix(":\"")
                && let Some(end) = quoted.find('"')
            {
                result.set(key, Tag::parse(&quoted[..end]));
                rest = &quoted[end + 1..];
                continue;
            }
            let mut chars = rest.chars();
            if chars.next().is_some_and(|c| !c.is_whitespace()) {
                skipped = true;
            }
            // A failed key is a suffix of a failed key, skip it whole.
            rest = if key_len > 0 { after } else { chars.as_str() };
        }
        if skipped {
            log::trace!("Skipped malformed fragments in tag `{}`", raw);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.0.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// First of `keys` present and not negated.
    pub fn value<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> Option<&Tag> {
        keys.into_iter()
            .filter_map(|k| self.get(k.as_ref()))
            .find(|t| t.is_true())
    }

    /// First of `keys` present, not negated and with a non empty first value.
    pub fn non_empty_value<S: AsRef<str>>(
        &self,
        keys: impl IntoIterator<Item = S>,
    ) -> Option<&Tag> {
        keys.into_iter()
            .filter_map(|k| self.get(k.as_ref()))
            .find(|t| t.is_true() && !t.first().is_empty())
    }

    /// Subset holding only `keys`, in the caller's order.
    pub fn by_keys<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> Tags {
        let mut result = Tags::default();
        for key in keys {
            if let Some(tag) = self.get(key.as_ref()) {
                result.set(key.as_ref(), tag.clone());
            }
        }
        result
    }

    pub fn exists<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> bool {
        keys.into_iter().any(|k| self.get(k.as_ref()).is_some())
    }

    /// Any of `keys` present and not negated.
    pub fn is_true<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> bool {
        keys.into_iter()
            .any(|k| self.get(k.as_ref()).is_some_and(Tag::is_true))
    }

    /// Any of `keys` present and negated.
    pub fn is_false<S: AsRef<str>>(&self, keys: impl IntoIterator<Item = S>) -> bool {
        keys.into_iter()
            .any(|k| self.get(k.as_ref()).is_some_and(Tag::is_false))
    }

    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.get(key).is_some_and(|t| t.contains([value]))
    }

    pub fn not_contains(&self, key: &str, value: &str) -> bool {
        self.get(key).is_none_or(|t| t.not_contains([value]))
    }

    /// Replaces the values of `key`, appending the key when new.
    pub fn set(&mut self, key: impl Into<String>, tag: Tag) -> &mut Self {
        let key = key.into();
        match self.get_mut(&key) {
            Some(current) => *current = tag,
            None => self.0.push((key, tag)),
        }
        self
    }

    pub fn prepend(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.insert(key, value, 0)
    }

    pub fn append(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        match self.get_mut(key) {
            Some(tag) => tag.0.push(value.into()),
            None => {
                self.set(key, Tag::new([value]));
            }
        }
        self
    }

    /// Overwrites the value at `index`, padding with empty values.
    pub fn replace(&mut self, key: &str, value: impl Into<String>, index: usize) -> &mut Self {
        if self.get(key).is_none() {
            self.set(key, Tag::default());
        }
        if let Some(tag) = self.get_mut(key) {
            if tag.0.len() <= index {
                tag.0.resize(index + 1, String::new());
            }
            tag.0[index] = value.into();
        }
        self
    }

    /// Inserts the value at `index`, shifting the following ones and padding
    /// with empty values.
    pub fn insert(&mut self, key: &str, value: impl Into<String>, index: usize) -> &mut Self {
        if self.get(key).is_none() {
            self.set(key, Tag::default());
        }
        if let Some(tag) = self.get_mut(key) {
            if tag.0.len() < index {
                tag.0.resize(index, String::new());
            }
            tag.0.insert(index, value.into());
        }
        self
    }

    /// Sets every key of `other`, keeping the keys only present here.
    pub fn merge(&mut self, other: &Tags) -> &mut Self {
        for (key, tag) in other.iter() {
            self.set(key, tag.clone());
        }
        self
    }
}

impl Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        separated_by(
            &mut out,
            self.iter(),
            |out, (k, v)| {
                let _ = write!(out, "{}:\"{}\"", k, v);
            },
            " ",
        );
        f.write_str(&out)
    }
}

impl<K: Into<String>> FromIterator<(K, Tag)> for Tags {
    fn from_iter<T: IntoIterator<Item = (K, Tag)>>(iter: T) -> Self {
        let mut result = Tags::default();
        for (k, v) in iter {
            result.set(k, v);
        }
        result
    }
}
