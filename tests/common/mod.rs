//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use objpath::{
    AttributeInfo, ContainerFactories, Mapping, Navigable, Record, RecordSchema, Value, ValueType,
};

pub fn address_schema() -> Arc<RecordSchema> {
    RecordSchema::builder("Address")
        .property("city", ValueType::String)
        .property("zip", ValueType::String)
        .build()
}

pub fn person_schema() -> Arc<RecordSchema> {
    RecordSchema::builder("Person")
        .property("name", ValueType::String)
        .property("age", ValueType::Integer)
        .property("tags", ValueType::List)
        .property("address", ValueType::object("Address"))
        .read_only_property("id", ValueType::Integer)
        .field("nickname", ValueType::String)
        .build()
}

/// `{name: "Ada", tags: ["x", "y"], address: null}`
pub fn ada() -> Value {
    person_schema()
        .instantiate()
        .with("name", "Ada")
        .with("age", 36)
        .with("id", 1)
        .with(
            "tags",
            Value::List(vec![Value::from("x"), Value::from("y")]),
        )
        .into_value()
}

pub fn address_factories() -> ContainerFactories {
    ContainerFactories::new().with_schema(&address_schema())
}

pub fn json(value: serde_json::Value) -> Value {
    value.into()
}

static CONTACT_ATTRIBUTES: LazyLock<Vec<AttributeInfo>> = LazyLock::new(|| {
    vec![
        AttributeInfo::property("first", ValueType::String),
        AttributeInfo::property("last", ValueType::String),
        AttributeInfo::read_only("fullName", ValueType::String),
    ]
});

/// Hand-written record with a computed property
#[derive(Debug, Clone)]
pub struct Contact {
    pub first: Value,
    pub last: Value,
}

impl Contact {
    pub fn new(first: &str, last: &str) -> Value {
        Value::object(Self {
            first: first.into(),
            last: last.into(),
        })
    }
}

impl Navigable for Contact {
    fn type_name(&self) -> &str {
        "Contact"
    }

    fn as_record(&self) -> Option<&dyn Record> {
        Some(self)
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        Some(self)
    }
}

impl Record for Contact {
    fn attributes(&self) -> &[AttributeInfo] {
        &CONTACT_ATTRIBUTES
    }

    fn attribute(&self, name: &str) -> Option<Cow<'_, Value>> {
        match name {
            "first" => Some(Cow::Borrowed(&self.first)),
            "last" => Some(Cow::Borrowed(&self.last)),
            "fullName" => Some(Cow::Owned(Value::String(format!(
                "{} {}",
                self.first.as_str().unwrap_or_default(),
                self.last.as_str().unwrap_or_default()
            )))),
            _ => None,
        }
    }

    fn attribute_mut(&mut self, name: &str) -> Option<&mut Value> {
        match name {
            "first" => Some(&mut self.first),
            "last" => Some(&mut self.last),
            _ => None,
        }
    }
}

/// Mapping of boolean flags with a fixed key set: entries can be replaced,
/// new keys are refused
#[derive(Debug, Clone)]
pub struct Flags(pub IndexMap<String, Value>);

impl Flags {
    pub fn new(keys: &[&str]) -> Value {
        Value::object(Self(
            keys.iter()
                .map(|key| (key.to_string(), Value::Boolean(false)))
                .collect(),
        ))
    }
}

impl Navigable for Flags {
    fn type_name(&self) -> &str {
        "Flags"
    }

    fn as_mapping(&self) -> Option<&dyn Mapping> {
        Some(self)
    }

    fn as_mapping_mut(&mut self) -> Option<&mut dyn Mapping> {
        Some(self)
    }
}

impl Mapping for Flags {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.0.keys().map(String::as_str))
    }

    fn value_type(&self) -> ValueType {
        ValueType::Boolean
    }
}
