use crate::{MetaError, Result, TypeMap};
use rust_decimal::Decimal;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use std::{
    borrow::Cow,
    fmt::{self, Debug, Display},
    rc::{Rc, Weak},
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Structural category of a [`Value`], computed once when the value is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Scalar,
    Struct,
    Sequence,
    Mapping,
    /// Channels and the untyped nil: nothing to traverse.
    Empty,
}

/// Leaf payload of a scalar [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    Int(i128),
    UInt(u128),
    Float(f64),
    Char(char),
    Text(String),
    Decimal(Decimal),
    Date(Date),
    Time(Time),
    Timestamp(PrimitiveDateTime),
    TimestampWithTimezone(OffsetDateTime),
    Uuid(Uuid),
}

impl Scalar {
    /// True for the zero value of the underlying type.
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Boolean(v) => !v,
            Scalar::Int(v) => *v == 0,
            Scalar::UInt(v) => *v == 0,
            Scalar::Float(v) => *v == 0.0,
            Scalar::Char(v) => *v == '\0',
            Scalar::Text(v) => v.is_empty(),
            Scalar::Decimal(v) => v.is_zero(),
            Scalar::Date(v) => *v == Date::MIN,
            Scalar::Time(v) => *v == Time::MIDNIGHT,
            Scalar::Timestamp(v) => *v == PrimitiveDateTime::MIN,
            Scalar::TimestampWithTimezone(v) => *v == OffsetDateTime::UNIX_EPOCH,
            Scalar::Uuid(v) => v.is_nil(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Scalar::Boolean(v) => JsonValue::Bool(*v),
            Scalar::Int(v) => i64::try_from(*v)
                .map(JsonValue::from)
                .unwrap_or_else(|_| JsonValue::String(v.to_string())),
            Scalar::UInt(v) => u64::try_from(*v)
                .map(JsonValue::from)
                .unwrap_or_else(|_| JsonValue::String(v.to_string())),
            Scalar::Float(v) => Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Scalar::Text(v) => JsonValue::String(v.clone()),
            _ => JsonValue::String(self.to_string()),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(v) => Display::fmt(v, f),
            Scalar::Int(v) => Display::fmt(v, f),
            Scalar::UInt(v) => Display::fmt(v, f),
            Scalar::Float(v) => Display::fmt(v, f),
            Scalar::Char(v) => Display::fmt(v, f),
            Scalar::Text(v) => f.write_str(v),
            Scalar::Decimal(v) => Display::fmt(v, f),
            Scalar::Date(v) => Display::fmt(v, f),
            Scalar::Time(v) => Display::fmt(v, f),
            Scalar::Timestamp(v) => Display::fmt(v, f),
            Scalar::TimestampWithTimezone(v) => Display::fmt(v, f),
            Scalar::Uuid(v) => Display::fmt(v, f),
        }
    }
}

/// Produces the zero value of an element or member type.
pub type ValueFn = fn() -> Value;

#[derive(Clone)]
enum MemberValue {
    Ready(Value),
    Deferred(ValueFn),
}

/// One named member of a struct shaped [`Value`], carrying its raw annotation.
#[derive(Clone)]
pub struct Member {
    name: Cow<'static, str>,
    tag: Cow<'static, str>,
    value: MemberValue,
}

impl Member {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        tag: impl Into<Cow<'static, str>>,
        value: Value,
    ) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            value: MemberValue::Ready(value),
        }
    }

    /// Member whose value is the zero value of its type, built only when read.
    /// Zero valued structs use this so recursive types stay finite.
    pub fn deferred(
        name: impl Into<Cow<'static, str>>,
        tag: impl Into<Cow<'static, str>>,
        value: ValueFn,
    ) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            value: MemberValue::Deferred(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> Value {
        match &self.value {
            MemberValue::Ready(v) => v.clone(),
            MemberValue::Deferred(f) => f(),
        }
    }
}

impl Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .finish()
    }
}

#[derive(Clone)]
enum Content {
    Nil,
    Scalar(Scalar),
    Struct {
        tag: Cow<'static, str>,
        members: Rc<[Member]>,
    },
    Sequence {
        items: Rc<[Value]>,
        element: ValueFn,
    },
    Mapping {
        entries: Rc<[(String, Value)]>,
        element: ValueFn,
    },
    Channel {
        element: ValueFn,
    },
}

#[derive(Clone)]
struct Node {
    name: Option<String>,
    type_name: Cow<'static, str>,
    pointer: bool,
    content: Content,
    parent: Weak<Node>,
}

/// Key used by [`Value::child`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKey<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for ChildKey<'_> {
    fn from(value: usize) -> Self {
        ChildKey::Index(value)
    }
}

impl<'a> From<&'a str> for ChildKey<'a> {
    fn from(value: &'a str) -> Self {
        ChildKey::Name(value)
    }
}

impl Display for ChildKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildKey::Index(v) => Display::fmt(v, f),
            ChildKey::Name(v) => f.write_str(v),
        }
    }
}

/// Reflective description of one runtime value.
///
/// Values are immutable and cheap to clone. Children are produced on demand by
/// [`Value::children`], each one holding a weak reference to its producer.
#[derive(Clone)]
pub struct Value(Rc<Node>);

impl Value {
    fn new(type_name: impl Into<Cow<'static, str>>, content: Content) -> Self {
        Self(Rc::new(Node {
            name: None,
            type_name: type_name.into(),
            pointer: false,
            content,
            parent: Weak::new(),
        }))
    }

    /// Untyped nil, the only value introspection refuses.
    pub fn nil() -> Self {
        Self::new("()", Content::Nil)
    }

    pub fn scalar(type_name: impl Into<Cow<'static, str>>, value: Scalar) -> Self {
        Self::new(type_name, Content::Scalar(value))
    }

    pub fn structure(
        type_name: impl Into<Cow<'static, str>>,
        tag: impl Into<Cow<'static, str>>,
        members: Vec<Member>,
    ) -> Self {
        Self::new(
            type_name,
            Content::Struct {
                tag: tag.into(),
                members: members.into(),
            },
        )
    }

    pub fn sequence(
        type_name: impl Into<Cow<'static, str>>,
        items: Vec<Value>,
        element: ValueFn,
    ) -> Self {
        Self::new(
            type_name,
            Content::Sequence {
                items: items.into(),
                element,
            },
        )
    }

    pub fn mapping(
        type_name: impl Into<Cow<'static, str>>,
        entries: Vec<(String, Value)>,
        element: ValueFn,
    ) -> Self {
        Self::new(
            type_name,
            Content::Mapping {
                entries: entries.into(),
                element,
            },
        )
    }

    pub fn channel(type_name: impl Into<Cow<'static, str>>, element: ValueFn) -> Self {
        Self::new(type_name, Content::Channel { element })
    }

    /// Marks the value as reached through a pointer or reference.
    pub fn into_pointer(self) -> Self {
        let mut node = Rc::unwrap_or_clone(self.0);
        node.pointer = true;
        Self(Rc::new(node))
    }

    pub fn kind(&self) -> Kind {
        match self.0.content {
            Content::Scalar(..) => Kind::Scalar,
            Content::Struct { .. } => Kind::Struct,
            Content::Sequence { .. } => Kind::Sequence,
            Content::Mapping { .. } => Kind::Mapping,
            Content::Nil | Content::Channel { .. } => Kind::Empty,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.0.content, Content::Nil)
    }

    /// Field name, map key or sequence index under which the parent produced this value.
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn type_name(&self) -> &str {
        &self.0.type_name
    }

    pub fn is_pointer(&self) -> bool {
        self.0.pointer
    }

    pub fn parent(&self) -> Option<Value> {
        self.0.parent.upgrade().map(Value)
    }

    pub fn scalar_value(&self) -> Option<&Scalar> {
        match &self.0.content {
            Content::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Struct level annotation, empty for anything else.
    pub fn tag(&self) -> &str {
        match &self.0.content {
            Content::Struct { tag, .. } => tag,
            _ => "",
        }
    }

    pub fn len(&self) -> usize {
        match &self.0.content {
            Content::Struct { members, .. } => members.len(),
            Content::Sequence { items, .. } => items.len(),
            Content::Mapping { entries, .. } => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn adopt(&self, child: Value, name: String) -> Value {
        let mut node = Rc::unwrap_or_clone(child.0);
        node.name = Some(name);
        node.parent = Rc::downgrade(&self.0);
        Value(Rc::new(node))
    }

    /// Fresh children, in declaration order for structs and index order for sequences.
    pub fn children(&self) -> Vec<Value> {
        self.annotated_children()
            .into_iter()
            .map(|(v, _)| v)
            .collect()
    }

    /// Children paired with their raw annotation (empty outside structs).
    pub fn annotated_children(&self) -> Vec<(Value, &str)> {
        match &self.0.content {
            Content::Struct { members, .. } => members
                .iter()
                .map(|m| (self.adopt(m.value(), m.name().to_string()), m.tag()))
                .collect(),
            Content::Sequence { items, .. } => items
                .iter()
                .enumerate()
                .map(|(i, v)| (self.adopt(v.clone(), i.to_string()), ""))
                .collect(),
            Content::Mapping { entries, .. } => entries
                .iter()
                .map(|(k, v)| (self.adopt(v.clone(), k.clone()), ""))
                .collect(),
            Content::Nil | Content::Scalar(..) | Content::Channel { .. } => Vec::new(),
        }
    }

    pub fn child<'k>(&self, key: impl Into<ChildKey<'k>>) -> Result<Value> {
        let key = key.into();
        let found = match (&self.0.content, key) {
            (Content::Struct { members, .. }, ChildKey::Index(i)) => members
                .get(i)
                .map(|m| self.adopt(m.value(), m.name().to_string())),
            (Content::Struct { members, .. }, ChildKey::Name(name)) => members
                .iter()
                .find(|m| m.name() == name)
                .map(|m| self.adopt(m.value(), name.to_string())),
            (Content::Sequence { items, .. }, ChildKey::Index(i)) => {
                items.get(i).map(|v| self.adopt(v.clone(), i.to_string()))
            }
            (Content::Sequence { items, .. }, ChildKey::Name(name)) => name
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i).map(|v| self.adopt(v.clone(), i.to_string()))),
            (Content::Mapping { entries, .. }, key) => {
                let key = key.to_string();
                entries
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(k, v)| self.adopt(v.clone(), k.clone()))
            }
            (Content::Nil | Content::Scalar(..) | Content::Channel { .. }, ..) => {
                return Err(MetaError::NoChildren(self.type_name().to_string()).into());
            }
        };
        found.ok_or_else(|| {
            MetaError::NoSuchChild {
                type_name: self.type_name().to_string(),
                key: key.to_string(),
            }
            .into()
        })
    }

    pub fn children_by_keys<'k>(
        &self,
        keys: impl IntoIterator<Item = impl Into<ChildKey<'k>>>,
    ) -> Result<Vec<Value>> {
        keys.into_iter().map(|k| self.child(k)).collect()
    }

    /// Zero value of the element type of a sequence, mapping or channel.
    pub fn new_element(&self) -> Result<Value> {
        match &self.0.content {
            Content::Sequence { element, .. }
            | Content::Mapping { element, .. }
            | Content::Channel { element } => Ok(element()),
            _ => Err(MetaError::NotACollection(self.type_name().to_string()).into()),
        }
    }

    pub fn mapped_type<'m>(&self, types: &'m TypeMap) -> Option<&'m str> {
        types.to(self.type_name())
    }

    pub fn to_json(&self) -> JsonValue {
        match &self.0.content {
            Content::Nil | Content::Channel { .. } => JsonValue::Null,
            Content::Scalar(v) => v.to_json(),
            Content::Struct { members, .. } => JsonValue::Object(
                members
                    .iter()
                    .map(|m| (m.name().to_string(), m.value().to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
            Content::Sequence { items, .. } => {
                JsonValue::Array(items.iter().map(Value::to_json).collect())
            }
            Content::Mapping { entries, .. } => JsonValue::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Value");
        s.field("kind", &self.kind())
            .field("type_name", &self.type_name());
        if let Some(name) = self.name() {
            s.field("name", &name);
        }
        if self.is_pointer() {
            s.field("pointer", &true);
        }
        match &self.0.content {
            Content::Scalar(v) => s.field("value", v),
            Content::Struct { members, .. } => s.field("members", members),
            Content::Sequence { items, .. } => s.field("items", items),
            Content::Mapping { entries, .. } => s.field("entries", entries),
            Content::Nil | Content::Channel { .. } => &mut s,
        };
        s.finish()
    }
}
