//! Zero-value constructors for `set_creating`

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::model::{RecordSchema, Value, ValueType};

/// Constructor of a fresh value
pub type Factory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Caller-supplied mapping from a declared type to a zero-value constructor.
///
/// Consulted when `set_creating` meets an absent intermediate; the declared
/// type of the accessor that leads to it picks the factory.
#[derive(Clone, Default)]
pub struct ContainerFactories {
    factories: FxHashMap<ValueType, Factory>,
}

impl ContainerFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty `List` and `Map` for their declared types
    pub fn with_builtin_containers(self) -> Self {
        self.with(ValueType::List, || Value::List(Vec::new()))
            .with(ValueType::Map, || Value::Map(IndexMap::new()))
    }

    pub fn with(mut self, value_type: ValueType, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.insert(value_type, factory);
        self
    }

    /// Records of `schema` with every attribute `Null`
    pub fn with_schema(self, schema: &Arc<RecordSchema>) -> Self {
        let schema = Arc::clone(schema);
        self.with(schema.value_type(), move || schema.instantiate().into_value())
    }

    pub fn insert(&mut self, value_type: ValueType, factory: impl Fn() -> Value + Send + Sync + 'static) {
        self.factories.insert(value_type, Arc::new(factory));
    }

    /// A fresh value for `value_type`, if a factory is registered
    pub fn create(&self, value_type: &ValueType) -> Option<Value> {
        self.factories.get(value_type).map(|factory| factory())
    }

    pub fn contains(&self, value_type: &ValueType) -> bool {
        self.factories.contains_key(value_type)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ContainerFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.factories.keys().map(ValueType::name).collect();
        types.sort_unstable();
        f.debug_struct("ContainerFactories")
            .field("types", &types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_factory_creates_null_records() {
        let schema = RecordSchema::builder("Address")
            .property("city", ValueType::String)
            .build();
        let factories = ContainerFactories::new().with_schema(&schema);

        let created = factories.create(&ValueType::object("Address")).unwrap();
        assert_eq!(created.type_name(), "Address");
        assert_eq!(
            created.as_record().unwrap().attribute("city").unwrap().into_owned(),
            Value::Null
        );
        assert!(factories.create(&ValueType::Map).is_none());
    }

    #[test]
    fn test_builtin_containers() {
        let factories = ContainerFactories::new().with_builtin_containers();
        assert_eq!(factories.len(), 2);
        assert_eq!(factories.create(&ValueType::List), Some(Value::List(vec![])));
        assert_eq!(factories.create(&ValueType::Map), Some(Value::map()));
    }
}
