use std::collections::BTreeMap;

/// Translation between Rust type names (as given by [`crate::Reflect::type_name`])
/// and the type names of an external system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMap {
    pub to: BTreeMap<String, String>,
    pub from: BTreeMap<String, String>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `rust` -> `external`, and `external` -> `rust` unless the reverse
    /// direction already has an entry.
    pub fn with(mut self, rust: impl Into<String>, external: impl Into<String>) -> Self {
        let (rust, external) = (rust.into(), external.into());
        self.from
            .entry(external.clone())
            .or_insert_with(|| rust.clone());
        self.to.insert(rust, external);
        self
    }

    pub fn with_from(mut self, external: impl Into<String>, rust: impl Into<String>) -> Self {
        self.from.insert(external.into(), rust.into());
        self
    }

    pub fn to(&self, rust: &str) -> Option<&str> {
        self.to.get(rust).map(String::as_str)
    }

    pub fn from(&self, external: &str) -> Option<&str> {
        self.from.get(external).map(String::as_str)
    }

    /// `to` over every name, empty where unmapped so positions are kept.
    pub fn to_all<S: AsRef<str>>(&self, rust: &[S]) -> Vec<String> {
        rust.iter()
            .map(|v| self.to(v.as_ref()).unwrap_or_default().to_string())
            .collect()
    }
}

/// Type maps keyed by system name, for example `postgres`.
#[derive(Debug, Clone, Default)]
pub struct TypeMaps(BTreeMap<String, TypeMap>);

impl TypeMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, system: impl Into<String>, map: TypeMap) -> Self {
        self.0.insert(system.into(), map);
        self
    }

    pub fn get(&self, system: &str) -> Option<&TypeMap> {
        self.0.get(system)
    }

    pub fn systems(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
