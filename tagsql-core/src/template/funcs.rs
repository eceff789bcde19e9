use super::Data;
use crate::{MetaError, Result, coalesce};
use convert_case::{Case, Casing};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt::{self, Debug, Write},
    sync::Arc,
};

/// A function callable from template text.
pub type Func = Arc<dyn Fn(&[Data]) -> Result<Data> + Send + Sync>;

/// Named template functions. Immutable once handed to a template, extended
/// by building a new map.
#[derive(Clone, Default)]
pub struct FuncMap(BTreeMap<String, Func>);

impl FuncMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Data]) -> Result<Data> + Send + Sync + 'static,
    {
        self.insert(name, func);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&[Data]) -> Result<Data> + Send + Sync + 'static,
    {
        self.0.insert(name.into(), Arc::new(func));
    }

    pub fn get(&self, name: &str) -> Option<&Func> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Functions of `other` are added, replacing the ones with the same name.
    pub fn merge(mut self, other: &FuncMap) -> Self {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// The standard library available to every template.
    pub fn builtin() -> Self {
        Self::new()
            .with("and", |args| {
                let last = at_least("and", args, 1)?;
                Ok(args.iter().find(|v| !v.truth()).unwrap_or(last).clone())
            })
            .with("or", |args| {
                let last = at_least("or", args, 1)?;
                Ok(args.iter().find(|v| v.truth()).unwrap_or(last).clone())
            })
            .with("not", |args| {
                let [v] = exact("not", args)?;
                Ok(Data::Bool(!v.truth()))
            })
            .with("eq", |args| {
                at_least("eq", args, 2)?;
                Ok(Data::Bool(args[1..].iter().any(|v| args[0].loose_eq(v))))
            })
            .with("ne", |args| {
                let [a, b] = exact("ne", args)?;
                Ok(Data::Bool(!a.loose_eq(b)))
            })
            .with("lt", |args| compare("lt", args, Ordering::is_lt))
            .with("le", |args| compare("le", args, Ordering::is_le))
            .with("gt", |args| compare("gt", args, Ordering::is_gt))
            .with("ge", |args| compare("ge", args, Ordering::is_ge))
            .with("len", |args| {
                let [v] = exact("len", args)?;
                Ok(match v {
                    Data::Str(v) => v.len().into(),
                    Data::List(v) => v.len().into(),
                    Data::Map(v) => v.len().into(),
                    Data::Nil => Data::Int(0),
                    _ => return Err(function_error("len", format!("len of {}", v.type_name()))),
                })
            })
            .with("index", |args| {
                at_least("index", args, 1)?;
                args[1..]
                    .iter()
                    .try_fold(args[0].clone(), |current, key| index(&current, key))
            })
            .with("print", |args| Ok(Data::Str(print(args))))
            .with("printf", |args| {
                at_least("printf", args, 1)?;
                Ok(Data::Str(printf(&args[0].to_string(), &args[1..])))
            })
            .with("coalesce", |args| {
                let [primary, secondary, default] = exact("coalesce", args)?;
                Ok(Data::list(coalesce(
                    &strings(primary),
                    &strings(secondary),
                    &default.to_string(),
                )))
            })
            .with("join", |args| {
                let [separator, values] = exact("join", args)?;
                Ok(Data::Str(strings(values).join(&separator.to_string())))
            })
            .with("joinslices", |args| {
                at_least("joinslices", args, 2)?;
                let lists: Vec<_> = args[2..].iter().map(strings).collect();
                join_slices(&args[0].to_string(), &args[1].to_string(), &lists).map(Data::Str)
            })
            .with("mapkeys", |args| {
                let [map] = exact("mapkeys", args)?;
                Ok(match map {
                    Data::Map(v) => Data::list(v.keys()),
                    _ => Data::List(Vec::new()),
                })
            })
            .with("mapvalues", |args| {
                let [map] = exact("mapvalues", args)?;
                Ok(match map {
                    Data::Map(v) => Data::list(v.values().map(ToString::to_string)),
                    _ => Data::List(Vec::new()),
                })
            })
            .with("replace", |args| {
                let [old, new, n, s] = exact("replace", args)?;
                let (old, new, s) = (old.to_string(), new.to_string(), s.to_string());
                Ok(Data::Str(match n {
                    Data::Int(n) if *n >= 0 => s.replacen(&old, &new, *n as usize),
                    _ => s.replace(&old, &new),
                }))
            })
            .with("replaceall", |args| {
                let [old, new, s] = exact("replaceall", args)?;
                Ok(Data::Str(
                    s.to_string().replace(&old.to_string(), &new.to_string()),
                ))
            })
            .with("tolower", |args| {
                let [v] = exact("tolower", args)?;
                Ok(Data::Str(v.to_string().to_lowercase()))
            })
            .with("toupper", |args| {
                let [v] = exact("toupper", args)?;
                Ok(Data::Str(v.to_string().to_uppercase()))
            })
            .with("tosnake", |args| {
                let [v] = exact("tosnake", args)?;
                Ok(Data::Str(v.to_string().to_case(Case::Snake)))
            })
            .with("tolowerslices", |args| {
                Ok(Data::list(
                    args.iter()
                        .flat_map(strings)
                        .map(|v| v.to_lowercase()),
                ))
            })
            .with("toupperslices", |args| {
                Ok(Data::list(
                    args.iter()
                        .flat_map(strings)
                        .map(|v| v.to_uppercase()),
                ))
            })
            .with("tostrings", |args| {
                let [v] = exact("tostrings", args)?;
                Ok(Data::list(strings(v)))
            })
            .with("toslice", |args| {
                let [v] = exact("toslice", args)?;
                Ok(match v {
                    Data::List(..) => v.clone(),
                    _ => {
                        log::debug!("toslice: {} is not a list", v.type_name());
                        Data::List(Vec::new())
                    }
                })
            })
            .with("pluck", |args| {
                let [key, items] = exact("pluck", args)?;
                let key = key.to_string();
                Ok(Data::list(
                    items
                        .as_list()
                        .unwrap_or_default()
                        .iter()
                        .map(|v| v.field(&key)),
                ))
            })
    }
}

impl Debug for FuncMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.keys()).finish()
    }
}

fn function_error(name: &str, message: impl Into<String>) -> crate::Error {
    MetaError::Function {
        name: name.to_string(),
        message: message.into(),
    }
    .into()
}

fn exact<'a, const N: usize>(name: &str, args: &'a [Data]) -> Result<&'a [Data; N]> {
    args.try_into().map_err(|_| {
        function_error(
            name,
            format!("wrong number of args: want {} got {}", N, args.len()),
        )
    })
}

/// Checks the count and returns the last argument.
fn at_least<'a>(name: &str, args: &'a [Data], count: usize) -> Result<&'a Data> {
    match args.last() {
        Some(last) if args.len() >= count => Ok(last),
        _ => Err(function_error(
            name,
            format!("wrong number of args: want at least {} got {}", count, args.len()),
        )),
    }
}

fn compare(name: &str, args: &[Data], accept: fn(Ordering) -> bool) -> Result<Data> {
    let [a, b] = exact(name, args)?;
    let ordering = match (a, b) {
        (Data::Int(a), Data::Int(b)) => Some(a.cmp(b)),
        (Data::Int(a), Data::Float(b)) => (*a as f64).partial_cmp(b),
        (Data::Float(a), Data::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Data::Float(a), Data::Float(b)) => a.partial_cmp(b),
        (Data::Str(a), Data::Str(b)) => Some(a.cmp(b)),
        _ => None,
    };
    ordering.map(|v| Data::Bool(accept(v))).ok_or_else(|| {
        function_error(
            name,
            format!("incompatible types {} and {}", a.type_name(), b.type_name()),
        )
    })
}

fn index(item: &Data, key: &Data) -> Result<Data> {
    match (item, key) {
        (Data::List(items), Data::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .ok_or_else(|| function_error("index", format!("index out of range: {}", i))),
        (Data::Map(entries), key) => Ok(entries.get(&key.to_string()).cloned().unwrap_or_default()),
        (Data::Nil, _) => Ok(Data::Nil),
        _ => Err(function_error(
            "index",
            format!("cannot index {} with {}", item.type_name(), key.type_name()),
        )),
    }
}

/// Lists are taken element by element, nil is empty, anything else is one value.
fn strings(value: &Data) -> Vec<String> {
    match value {
        Data::List(v) => v.iter().map(ToString::to_string).collect(),
        Data::Nil => Vec::new(),
        v => vec![v.to_string()],
    }
}

/// Operands are separated by a space when neither side is a string.
fn print(args: &[Data]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !matches!(arg, Data::Str(..)) && !matches!(args[i - 1], Data::Str(..)) {
            out.push(' ');
        }
        let _ = write!(out, "{}", arg);
    }
    out
}

/// `%s`, `%v`, `%d` print the argument, `%q` quotes it, `%%` is a percent sign.
fn printf(format: &str, args: &[Data]) -> String {
    let mut out = String::new();
    let mut args = args.iter();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let _ = match (chars.next(), args.clone().next()) {
            (Some('%'), _) => write!(out, "%"),
            (None, _) => write!(out, "%!(NOVERB)"),
            (Some(verb), None) => write!(out, "%!{}(MISSING)", verb),
            (Some(verb), Some(arg)) => {
                args.next();
                match verb {
                    's' | 'v' | 'd' | 't' => write!(out, "{}", arg),
                    'q' => write!(out, "{:?}", arg.to_string()),
                    _ => write!(out, "%!{}({})", verb, arg),
                }
            }
        };
    }
    let extra: Vec<_> = args.map(ToString::to_string).collect();
    if !extra.is_empty() {
        let _ = write!(out, "%!(EXTRA {})", extra.join(", "));
    }
    out
}

/// Zips equally long lists: the values at the same index are joined by
/// `element_separator`, the rows by `index_separator`.
pub fn join_slices<S: AsRef<str>>(
    element_separator: &str,
    index_separator: &str,
    lists: &[Vec<S>],
) -> Result<String> {
    let lengths: Vec<usize> = lists.iter().map(Vec::len).collect();
    if lengths.windows(2).any(|w| w[0] != w[1]) {
        return Err(MetaError::LengthMismatch(lengths).into());
    }
    let rows = lengths.first().copied().unwrap_or_default();
    let mut out = String::new();
    for i in 0..rows {
        if i > 0 {
            out.push_str(index_separator);
        }
        for (j, list) in lists.iter().enumerate() {
            if j > 0 {
                out.push_str(element_separator);
            }
            out.push_str(list[i].as_ref());
        }
    }
    Ok(out)
}
