//! The Value Model (C2, spec.md §3/§4.2).
//!
//! A single `Value` type serves both as the engine's internal representation
//! of input values (coerced variables and argument literals) and of output
//! values (resolver results) — per spec.md §3, the two are "distinguished by
//! context, not by representation".

mod object;
mod response_map;

pub use self::object::Object;
pub use self::response_map::ResponseMap;

use serde::{ser::SerializeMap, Serialize, Serializer};

/// A GraphQL value, orthogonal to any wire format (spec.md §3).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `null`.
    Null,
    /// A signed 32-bit integer.
    Int(i32),
    /// An IEEE-754 double.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// A Unicode string.
    String(String),
    /// An enum member, carrying only its symbolic name.
    Enum(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A map of field name to value (spec.md §4.2's generic Value model;
    /// lexicographically sorted on the wire). Holds coerced input-object
    /// values and raw resolver-constructed data, never a selection set's
    /// own output — see [`ResponseMap`] for that.
    Object(Object),
    /// The insertion-ordered output of resolving a selection set (spec.md
    /// §4.4.1), used for both the top-level `data` and every object-typed
    /// field's completed value.
    ResponseMap(ResponseMap),
}

impl Value {
    /// Constructs `Value::Null`.
    pub fn null() -> Self {
        Self::Null
    }

    /// Does this value represent `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// View the underlying string, if this is a `String` or `Enum` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// View the underlying `i32`, if this is an `Int` value.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// View the underlying `f64`, if this is a `Float` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// View the underlying `bool`, if this is a `Boolean` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// View the underlying list, if this is a `List` value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// View the underlying object, if this is an `Object` value.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// View the underlying response map, if this is a `ResponseMap` value.
    pub fn as_response_map(&self) -> Option<&ResponseMap> {
        match self {
            Self::ResponseMap(m) => Some(m),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl From<ResponseMap> for Value {
    fn from(m: ResponseMap) -> Self {
        Self::ResponseMap(m)
    }
}

/// Wire-form conversion (spec.md §4.2): `Null → null`, `Int/Float → number`,
/// `String → string`, `Boolean → boolean`, `Enum(n) → string n`,
/// `List → array`, `Object → object with lexicographic key order`.
/// `ResponseMap → object with source key order` (spec.md §4.4.1/§4.4.4),
/// deliberately not sorted like `Object`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Int(i) => serializer.serialize_i32(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::String(s) | Self::Enum(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for key in obj.sorted_keys() {
                    map.serialize_entry(key, obj.get(key).expect("key came from this object"))?;
                }
                map.end()
            }
            Self::ResponseMap(response_map) => {
                let mut map = serializer.serialize_map(Some(response_map.len()))?;
                for (key, value) in response_map.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
