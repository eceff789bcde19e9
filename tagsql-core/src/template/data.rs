use crate::{Tag, Tags};
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Write},
};

/// Dynamic value flowing through templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Data {
    /// Missing keys and absent values, printed as the empty string.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Data>),
    Map(BTreeMap<String, Data>),
}

impl Data {
    pub fn map<K: Into<String>, V: Into<Data>>(entries: impl IntoIterator<Item = (K, V)>) -> Data {
        Data::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn list<V: Into<Data>>(items: impl IntoIterator<Item = V>) -> Data {
        Data::List(items.into_iter().map(Into::into).collect())
    }

    /// `false`, zero, empty and nil are false.
    pub fn truth(&self) -> bool {
        match self {
            Data::Nil => false,
            Data::Bool(v) => *v,
            Data::Int(v) => *v != 0,
            Data::Float(v) => *v != 0.0,
            Data::Str(v) => !v.is_empty(),
            Data::List(v) => !v.is_empty(),
            Data::Map(v) => !v.is_empty(),
        }
    }

    /// The entry `name` of a map, nil for anything else.
    pub fn field(&self, name: &str) -> Data {
        match self {
            Data::Map(v) => v.get(name).cloned().unwrap_or_default(),
            _ => Data::Nil,
        }
    }

    pub fn path<S: AsRef<str>>(&self, path: &[S]) -> Data {
        match path.split_first() {
            None => self.clone(),
            Some((first, rest)) => match self {
                Data::Map(v) => v
                    .get(first.as_ref())
                    .map(|v| v.path(rest))
                    .unwrap_or_default(),
                _ => Data::Nil,
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Data]> {
        match self {
            Data::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Data::Nil)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Data::Nil => "nil",
            Data::Bool(..) => "bool",
            Data::Int(..) => "int",
            Data::Float(..) => "float",
            Data::Str(..) => "string",
            Data::List(..) => "list",
            Data::Map(..) => "map",
        }
    }

    /// Loose equality: integers and floats compare by value.
    pub fn loose_eq(&self, other: &Data) -> bool {
        match (self, other) {
            (Data::Int(a), Data::Float(b)) | (Data::Float(b), Data::Int(a)) => *a as f64 == *b,
            _ => self == other,
        }
    }
}

fn write_float(out: &mut String, value: f64) {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        out.push_str(itoa::Buffer::new().format(value as i64));
    } else if value.is_finite() {
        out.push_str(ryu::Buffer::new().format_finite(value));
    } else {
        let _ = write!(out, "{}", value);
    }
}

impl Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        match self {
            Data::Nil => {}
            Data::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Data::Int(v) => out.push_str(itoa::Buffer::new().format(*v)),
            Data::Float(v) => write_float(&mut out, *v),
            Data::Str(v) => out.push_str(v),
            Data::List(v) => {
                out.push('[');
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{}", item);
                }
                out.push(']');
            }
            Data::Map(v) => {
                out.push_str("map[");
                for (i, (key, item)) in v.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{}:{}", key, item);
                }
                out.push(']');
            }
        }
        f.write_str(&out)
    }
}

impl From<bool> for Data {
    fn from(value: bool) -> Self {
        Data::Bool(value)
    }
}

impl From<i64> for Data {
    fn from(value: i64) -> Self {
        Data::Int(value)
    }
}

impl From<i32> for Data {
    fn from(value: i32) -> Self {
        Data::Int(value.into())
    }
}

impl From<usize> for Data {
    fn from(value: usize) -> Self {
        Data::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Data {
    fn from(value: f64) -> Self {
        Data::Float(value)
    }
}

impl From<&str> for Data {
    fn from(value: &str) -> Self {
        Data::Str(value.to_string())
    }
}

impl From<String> for Data {
    fn from(value: String) -> Self {
        Data::Str(value)
    }
}

impl From<&String> for Data {
    fn from(value: &String) -> Self {
        Data::Str(value.clone())
    }
}

impl<T: Into<Data>> From<Vec<T>> for Data {
    fn from(value: Vec<T>) -> Self {
        Data::list(value)
    }
}

impl<T: Into<Data>> From<Option<T>> for Data {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl<V: Into<Data>> From<BTreeMap<String, V>> for Data {
    fn from(value: BTreeMap<String, V>) -> Self {
        Data::map(value)
    }
}

impl From<&Tag> for Data {
    fn from(value: &Tag) -> Self {
        Data::list(value.values())
    }
}

impl From<&Tags> for Data {
    fn from(value: &Tags) -> Self {
        Data::map(value.iter().map(|(k, v)| (k, Data::from(v))))
    }
}
