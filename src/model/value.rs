//! Core value types navigated by paths

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::traits::{Mapping, Navigable, Record, Sequence};

/// A dynamically shaped value.
///
/// Scalars, the two built-in containers and user-supplied runtime types all
/// share this representation so a single path can cross them freely.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    String(String),
    /// Built-in growable sequence
    List(Vec<Value>),
    /// Built-in insertion-ordered mapping
    Map(IndexMap<String, Value>),
    /// Value of a user-supplied runtime type
    Object(Box<dyn Navigable>),
}

/// Declared type of an attribute, element or function input.
///
/// This is what the conversion chain converts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Any,
    Boolean,
    Integer,
    Decimal,
    String,
    List,
    Map,
    /// A runtime type identified by its type name
    Object(Arc<str>),
}

impl ValueType {
    /// Declared type for a user-supplied runtime type
    pub fn object(type_name: impl Into<Arc<str>>) -> Self {
        Self::Object(type_name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            ValueType::Any => "Any",
            ValueType::Boolean => "Boolean",
            ValueType::Integer => "Integer",
            ValueType::Decimal => "Decimal",
            ValueType::String => "String",
            ValueType::List => "List",
            ValueType::Map => "Map",
            ValueType::Object(name) => name,
        }
    }

    /// Whether `value` can be stored under this type without conversion.
    ///
    /// `Null` is accepted everywhere.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Any, _) | (_, Value::Null) => true,
            (ValueType::Boolean, Value::Boolean(_))
            | (ValueType::Integer, Value::Integer(_))
            | (ValueType::Decimal, Value::Decimal(_))
            | (ValueType::String, Value::String(_))
            | (ValueType::List, Value::List(_))
            | (ValueType::Map, Value::Map(_)) => true,
            (ValueType::List, Value::Object(object)) => object.as_sequence().is_some(),
            (ValueType::Map, Value::Object(object)) => object.as_mapping().is_some(),
            (ValueType::Object(name), Value::Object(object)) => object.type_name() == &**name,
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Wrap a user-supplied runtime type
    pub fn object(object: impl Navigable + 'static) -> Self {
        Self::Object(Box::new(object))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// An empty built-in mapping
    pub fn map() -> Self {
        Self::Map(IndexMap::new())
    }

    /// Runtime type identity
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Decimal(_) => "Decimal",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Object(object) => object.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn Navigable> {
        match self {
            Value::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&dyn Sequence> {
        match self {
            Value::List(items) => Some(items),
            Value::Object(object) => object.as_sequence(),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut dyn Sequence> {
        match self {
            Value::List(items) => Some(items),
            Value::Object(object) => object.as_sequence_mut(),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&dyn Mapping> {
        match self {
            Value::Map(entries) => Some(entries),
            Value::Object(object) => object.as_mapping(),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut dyn Mapping> {
        match self {
            Value::Map(entries) => Some(entries),
            Value::Object(object) => object.as_mapping_mut(),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&dyn Record> {
        match self {
            Value::Object(object) => object.as_record(),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        match self {
            Value::Object(object) => object.as_record_mut(),
            _ => None,
        }
    }
}

fn sequence_eq(a: &dyn Sequence, b: &dyn Sequence) -> bool {
    a.len() == b.len() && (0..a.len()).all(|i| a.get(i) == b.get(i))
}

fn mapping_eq(a: &dyn Mapping, b: &dyn Mapping) -> bool {
    a.len() == b.len() && a.keys().all(|key| a.get(key) == b.get(key))
}

fn record_eq(a: &dyn Record, b: &dyn Record) -> bool {
    a.attributes() == b.attributes()
        && a
            .attributes()
            .iter()
            .all(|attr| a.attribute(&attr.name) == b.attribute(&attr.name))
}

// Objects compare structurally through whatever capabilities they expose.
fn object_eq(a: &dyn Navigable, b: &dyn Navigable) -> bool {
    if a.type_name() != b.type_name() {
        return false;
    }
    match (a.as_sequence(), b.as_sequence()) {
        (Some(x), Some(y)) => return sequence_eq(x, y),
        (None, None) => {}
        _ => return false,
    }
    match (a.as_mapping(), b.as_mapping()) {
        (Some(x), Some(y)) => return mapping_eq(x, y),
        (None, None) => {}
        _ => return false,
    }
    match (a.as_record(), b.as_record()) {
        (Some(x), Some(y)) => record_eq(x, y),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => object_eq(a.as_ref(), b.as_ref()),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Integer(i) => write!(f, "Integer({i})"),
            Value::Decimal(d) => write!(f, "Decimal({d})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(entries) => f.debug_map().entries(entries).finish(),
            Value::Object(object) => fmt::Debug::fmt(object, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::String(s) => f.write_str(s),
            _ => match serde_json::to_string(self) {
                Ok(json) => f.write_str(&json),
                Err(_) => write!(f, "{self:?}"),
            },
        }
    }
}

struct SequenceRef<'a>(&'a dyn Sequence);
struct MappingRef<'a>(&'a dyn Mapping);
struct RecordRef<'a>(&'a dyn Record);

impl Serialize for SequenceRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for index in 0..self.0.len() {
            if let Some(item) = self.0.get(index) {
                seq.serialize_element(item)?;
            }
        }
        seq.end()
    }
}

impl Serialize for MappingRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for key in self.0.keys() {
            if let Some(value) = self.0.get(key) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl Serialize for RecordRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let attributes = self.0.attributes();
        let mut map = serializer.serialize_map(Some(attributes.len()))?;
        for attr in attributes {
            let value = self.0.attribute(&attr.name).unwrap_or_default();
            map.serialize_entry(&*attr.name, value.as_ref())?;
        }
        map.end()
    }
}

/// JSON number when an `f64` holds the decimal exactly, string otherwise
fn serialize_decimal<S: Serializer>(d: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    match d.to_f64() {
        Some(f) if Decimal::from_str(&f.to_string()).ok() == Some(*d) => serializer.serialize_f64(f),
        _ => serializer.serialize_str(&d.to_string()),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Decimal(d) => serialize_decimal(d, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => items.serialize(serializer),
            Value::Map(entries) => entries.serialize(serializer),
            Value::Object(object) => {
                if let Some(sequence) = object.as_sequence() {
                    SequenceRef(sequence).serialize(serializer)
                } else if let Some(mapping) = object.as_mapping() {
                    MappingRef(mapping).serialize(serializer)
                } else if let Some(record) = object.as_record() {
                    RecordRef(record).serialize(serializer)
                } else {
                    serializer.serialize_str(object.type_name())
                }
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::from(3).type_name(), "Integer");
        assert_eq!(Value::from(vec![Value::from("x")]).type_name(), "List");
        assert_eq!(Value::map().type_name(), "Map");
    }

    #[test]
    fn test_value_type_accepts() {
        assert!(ValueType::Integer.accepts(&Value::from(1)));
        assert!(!ValueType::Integer.accepts(&Value::from("1")));
        assert!(ValueType::String.accepts(&Value::Null));
        assert!(ValueType::Any.accepts(&Value::from(true)));
        assert!(!ValueType::object("Address").accepts(&Value::map()));
    }

    #[test]
    fn test_structural_equality() {
        let a = Value::from(vec![Value::from(1), Value::from("two")]);
        let b = Value::from(vec![Value::from(1), Value::from("two")]);
        assert_eq!(a, b);
        assert_ne!(a, Value::from(vec![Value::from(1)]));
        assert_ne!(Value::from(1), Value::from("1"));
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(Value::from("Ada").to_string(), "Ada");
        assert_eq!(Value::Null.to_string(), "null");
        let mut entries = IndexMap::new();
        entries.insert("tags".to_string(), Value::from(vec![Value::from("x")]));
        assert_eq!(Value::Map(entries).to_string(), r#"{"tags":["x"]}"#);
    }
}
