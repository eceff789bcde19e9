use crate::{MetaError, Result, Scalar, Value};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    rc::Rc,
    sync::{
        Arc,
        mpsc::{Receiver, Sender, SyncSender},
    },
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Describes a Rust type and its values as a [`Value`] tree.
///
/// Implemented for scalars, pointer like wrappers, collections and, through
/// `#[derive(Reflect)]`, for user structs.
///
/// # Contract
/// - `type_name` names the type after removing pointer like wrappers, so
///   `Option<Box<i32>>` and `i32` share the name `i32`.
/// - `reflect_type` describes the zero value. Struct members of a zero value
///   must be deferred ([`crate::Member::deferred`]) so that recursive types do
///   not recurse eagerly.
pub trait Reflect {
    fn type_name() -> Cow<'static, str>;
    fn reflect(&self) -> Value;
    fn reflect_type() -> Value;
}

/// Introspect a value, failing only on the untyped nil.
pub fn to_value<T: Reflect + ?Sized>(value: &T) -> Result<Value> {
    let result = value.reflect();
    if result.is_nil() {
        return Err(MetaError::InvalidValue(format!(
            "cannot introspect a nil of type `{}`",
            T::type_name()
        ))
        .into());
    }
    Ok(result)
}

macro_rules! impl_reflect {
    (@impl $source:ty, $convert:expr, $zero:expr) => {
        impl Reflect for $source {
            fn type_name() -> Cow<'static, str> {
                Cow::Borrowed(stringify!($source))
            }
            fn reflect(&self) -> Value {
                Value::scalar(Self::type_name(), ($convert)(self))
            }
            fn reflect_type() -> Value {
                <$source as Reflect>::reflect(&$zero)
            }
        }
    };
    ($source:ty, $variant:ident as $target:ty, $zero:expr) => {
        impl_reflect!(@impl $source, |v: &$source| Scalar::$variant(*v as $target), $zero);
    };
    ($source:ty, $variant:ident, $zero:expr) => {
        impl_reflect!(@impl $source, |v: &$source| Scalar::$variant(v.clone()), $zero);
    };
}

impl_reflect!(bool, Boolean, false);
impl_reflect!(i8, Int as i128, 0);
impl_reflect!(i16, Int as i128, 0);
impl_reflect!(i32, Int as i128, 0);
impl_reflect!(i64, Int as i128, 0);
impl_reflect!(i128, Int as i128, 0);
impl_reflect!(isize, Int as i128, 0);
impl_reflect!(u8, UInt as u128, 0);
impl_reflect!(u16, UInt as u128, 0);
impl_reflect!(u32, UInt as u128, 0);
impl_reflect!(u64, UInt as u128, 0);
impl_reflect!(u128, UInt as u128, 0);
impl_reflect!(usize, UInt as u128, 0);
impl_reflect!(f32, Float as f64, 0.0);
impl_reflect!(f64, Float as f64, 0.0);
impl_reflect!(char, Char, '\0');
impl_reflect!(String, Text, String::new());
impl_reflect!(Decimal, Decimal, Decimal::ZERO);
impl_reflect!(Date, Date, Date::MIN);
impl_reflect!(Time, Time, Time::MIDNIGHT);
impl_reflect!(PrimitiveDateTime, Timestamp, PrimitiveDateTime::MIN);
impl_reflect!(OffsetDateTime, TimestampWithTimezone, OffsetDateTime::UNIX_EPOCH);
impl_reflect!(Uuid, Uuid, Uuid::nil());

impl Reflect for str {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("str")
    }
    fn reflect(&self) -> Value {
        Value::scalar(Self::type_name(), Scalar::Text(self.to_string()))
    }
    fn reflect_type() -> Value {
        Value::scalar(Self::type_name(), Scalar::Text(String::new()))
    }
}

impl Reflect for Cow<'_, str> {
    fn type_name() -> Cow<'static, str> {
        <str as Reflect>::type_name()
    }
    fn reflect(&self) -> Value {
        <str as Reflect>::reflect(self)
    }
    fn reflect_type() -> Value {
        <str as Reflect>::reflect_type()
    }
}

impl Reflect for () {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("()")
    }
    fn reflect(&self) -> Value {
        Value::nil()
    }
    fn reflect_type() -> Value {
        Value::nil()
    }
}

impl Reflect for Value {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("Value")
    }
    fn reflect(&self) -> Value {
        self.clone()
    }
    fn reflect_type() -> Value {
        Value::nil()
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }
    fn reflect(&self) -> Value {
        match self {
            Some(v) => v.reflect(),
            None => T::reflect_type(),
        }
        .into_pointer()
    }
    fn reflect_type() -> Value {
        T::reflect_type().into_pointer()
    }
}

macro_rules! impl_reflect_pointer {
    ($($pointer:ident),+) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $pointer<T> {
                fn type_name() -> Cow<'static, str> {
                    T::type_name()
                }
                fn reflect(&self) -> Value {
                    (**self).reflect().into_pointer()
                }
                fn reflect_type() -> Value {
                    T::reflect_type().into_pointer()
                }
            }
        )+
    };
}

impl_reflect_pointer!(Box, Rc, Arc);

impl<T: Reflect + ?Sized> Reflect for &T {
    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }
    fn reflect(&self) -> Value {
        (**self).reflect().into_pointer()
    }
    fn reflect_type() -> Value {
        T::reflect_type().into_pointer()
    }
}

macro_rules! impl_reflect_sequence {
    ($($sequence:ident),+) => {
        $(
            impl<T: Reflect> Reflect for $sequence<T> {
                fn type_name() -> Cow<'static, str> {
                    Cow::Owned(format!("{}<{}>", stringify!($sequence), T::type_name()))
                }
                fn reflect(&self) -> Value {
                    Value::sequence(
                        Self::type_name(),
                        self.iter().map(|v| v.reflect()).collect(),
                        T::reflect_type,
                    )
                }
                fn reflect_type() -> Value {
                    Value::sequence(Self::type_name(), Vec::new(), T::reflect_type)
                }
            }
        )+
    };
}

impl_reflect_sequence!(Vec, VecDeque, HashSet, BTreeSet);

impl<T: Reflect> Reflect for [T] {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("[{}]", T::type_name()))
    }
    fn reflect(&self) -> Value {
        Value::sequence(
            Self::type_name(),
            self.iter().map(|v| v.reflect()).collect(),
            T::reflect_type,
        )
    }
    fn reflect_type() -> Value {
        Value::sequence(Self::type_name(), Vec::new(), T::reflect_type)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("[{}; {}]", T::type_name(), N))
    }
    fn reflect(&self) -> Value {
        Value::sequence(
            Self::type_name(),
            self.iter().map(|v| v.reflect()).collect(),
            T::reflect_type,
        )
    }
    fn reflect_type() -> Value {
        Value::sequence(
            Self::type_name(),
            (0..N).map(|_| T::reflect_type()).collect(),
            T::reflect_type,
        )
    }
}

impl<K: Reflect + ToString, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("HashMap<{}, {}>", K::type_name(), V::type_name()))
    }
    fn reflect(&self) -> Value {
        let mut entries: Vec<_> = self
            .iter()
            .map(|(k, v)| (k.to_string(), v.reflect()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::mapping(Self::type_name(), entries, V::reflect_type)
    }
    fn reflect_type() -> Value {
        Value::mapping(Self::type_name(), Vec::new(), V::reflect_type)
    }
}

impl<K: Reflect + ToString, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("BTreeMap<{}, {}>", K::type_name(), V::type_name()))
    }
    fn reflect(&self) -> Value {
        Value::mapping(
            Self::type_name(),
            self.iter()
                .map(|(k, v)| (k.to_string(), v.reflect()))
                .collect(),
            V::reflect_type,
        )
    }
    fn reflect_type() -> Value {
        Value::mapping(Self::type_name(), Vec::new(), V::reflect_type)
    }
}

macro_rules! impl_reflect_channel {
    ($($channel:ident),+) => {
        $(
            impl<T: Reflect> Reflect for $channel<T> {
                fn type_name() -> Cow<'static, str> {
                    Cow::Owned(format!("{}<{}>", stringify!($channel), T::type_name()))
                }
                fn reflect(&self) -> Value {
                    Self::reflect_type()
                }
                fn reflect_type() -> Value {
                    Value::channel(Self::type_name(), T::reflect_type)
                }
            }
        )+
    };
}

impl_reflect_channel!(Sender, SyncSender, Receiver);

impl Reflect for JsonValue {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("JsonValue")
    }
    fn reflect(&self) -> Value {
        match self {
            JsonValue::Null => Value::nil(),
            JsonValue::Bool(v) => v.reflect(),
            JsonValue::Number(v) => {
                if let Some(v) = v.as_i64() {
                    v.reflect()
                } else if let Some(v) = v.as_u64() {
                    v.reflect()
                } else {
                    v.as_f64().unwrap_or_default().reflect()
                }
            }
            JsonValue::String(v) => v.reflect(),
            JsonValue::Array(items) => Value::sequence(
                "Vec<JsonValue>",
                items.iter().map(|v| v.reflect()).collect(),
                JsonValue::reflect_type,
            ),
            JsonValue::Object(entries) => Value::mapping(
                "Map<String, JsonValue>",
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.reflect()))
                    .collect(),
                JsonValue::reflect_type,
            ),
        }
    }
    fn reflect_type() -> Value {
        Value::nil()
    }
}
