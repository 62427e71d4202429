//! Schema-described records
//!
//! [`DynamicRecord`] lets callers describe a record-like runtime type with a
//! [`RecordSchema`] instead of implementing [`Record`] by hand.

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;

use super::traits::{AttributeInfo, Navigable, Record};
use super::value::{Value, ValueType};

/// Attribute table of a record type
#[derive(Debug, PartialEq, Eq)]
pub struct RecordSchema {
    type_name: Arc<str>,
    attributes: Vec<AttributeInfo>,
}

/// Builder for [`RecordSchema`]
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    type_name: Arc<str>,
    attributes: Vec<AttributeInfo>,
}

impl RecordSchemaBuilder {
    pub fn property(mut self, name: impl Into<Arc<str>>, value_type: ValueType) -> Self {
        self.attributes
            .push(AttributeInfo::property(name, value_type));
        self
    }

    pub fn read_only_property(mut self, name: impl Into<Arc<str>>, value_type: ValueType) -> Self {
        self.attributes
            .push(AttributeInfo::read_only(name, value_type));
        self
    }

    pub fn field(mut self, name: impl Into<Arc<str>>, value_type: ValueType) -> Self {
        self.attributes.push(AttributeInfo::field(name, value_type));
        self
    }

    pub fn attribute(mut self, info: AttributeInfo) -> Self {
        self.attributes.push(info);
        self
    }

    pub fn build(self) -> Arc<RecordSchema> {
        Arc::new(RecordSchema {
            type_name: self.type_name,
            attributes: self.attributes,
        })
    }
}

impl RecordSchema {
    pub fn builder(type_name: impl Into<Arc<str>>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            type_name: type_name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared type of values of this schema
    pub fn value_type(&self) -> ValueType {
        ValueType::Object(Arc::clone(&self.type_name))
    }

    pub fn attributes(&self) -> &[AttributeInfo] {
        &self.attributes
    }

    /// A new record with every attribute set to `Null`
    pub fn instantiate(self: &Arc<Self>) -> DynamicRecord {
        let values = self
            .attributes
            .iter()
            .map(|attr| (Arc::clone(&attr.name), Value::Null))
            .collect();
        DynamicRecord {
            schema: Arc::clone(self),
            values,
        }
    }
}

/// A record whose attribute table comes from a [`RecordSchema`]
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    schema: Arc<RecordSchema>,
    values: IndexMap<Arc<str>, Value>,
}

impl DynamicRecord {
    /// Builder-style attribute assignment; names the schema does not declare are ignored
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Store a value under a declared attribute, bypassing read-only flags.
    ///
    /// Returns `false` when the schema has no such attribute.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => {
                log::warn!(
                    "`{}` declares no attribute `{name}`, value dropped",
                    self.schema.type_name
                );
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn into_value(self) -> Value {
        Value::object(self)
    }
}

impl From<DynamicRecord> for Value {
    fn from(record: DynamicRecord) -> Self {
        record.into_value()
    }
}

impl Navigable for DynamicRecord {
    fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    fn as_record(&self) -> Option<&dyn Record> {
        Some(self)
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        Some(self)
    }
}

impl Record for DynamicRecord {
    fn attributes(&self) -> &[AttributeInfo] {
        self.schema.attributes()
    }

    fn attribute(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.values.get(name).map(Cow::Borrowed)
    }

    fn attribute_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }
}
