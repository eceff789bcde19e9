use std::fmt::{self, Display};

pub const DEFAULT_SEPARATOR: &str = ".";

/// A possibly namespaced name such as `public.orders`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name {
    pub namespace: Vec<String>,
    pub name: String,
    pub separator: String,
}

impl Name {
    pub fn new(
        namespace: impl IntoIterator<Item = impl Into<String>>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into_iter().map(Into::into).collect(),
            name: name.into(),
            separator: DEFAULT_SEPARATOR.into(),
        }
    }

    /// The last segment is the name, the rest is the namespace. Empty segments are dropped.
    pub fn parse(text: &str, separator: &str) -> Self {
        let separator = if separator.is_empty() {
            DEFAULT_SEPARATOR
        } else {
            separator
        };
        let mut namespace: Vec<String> = text
            .split(separator)
            .filter(|v| !v.is_empty())
            .map(Into::into)
            .collect();
        let name = namespace.pop().unwrap_or_default();
        Self {
            namespace,
            name,
            separator: separator.into(),
        }
    }

    pub fn identifier(&self) -> String {
        identifier(&self.namespace, &self.name, &self.separator)
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_namespace(
            self.namespace.iter().map(String::as_str).chain([self.name.as_str()]),
            &self.separator,
        ))
    }
}

/// Joins the non empty parts.
pub fn join_namespace<S: AsRef<str>>(parts: impl IntoIterator<Item = S>, separator: &str) -> String {
    let mut out = String::new();
    crate::separated_by(
        &mut out,
        parts.into_iter().filter(|v| !v.as_ref().is_empty()),
        |out, v| out.push_str(v.as_ref()),
        separator,
    );
    out
}

/// Lowercased `namespace ++ [name]` joined by `separator`.
pub fn identifier<S: AsRef<str>>(namespace: &[S], name: &str, separator: &str) -> String {
    join_namespace(
        namespace.iter().map(AsRef::as_ref).chain([name]),
        separator,
    )
    .to_lowercase()
}
