//! Capability traits probed on user-supplied runtime types
//!
//! A runtime type opts into navigation by implementing [`Navigable`] and
//! answering one or more capability probes. The accessor cache asks the probes
//! in a fixed order (sequence, mapping, record) the first time it meets a type,
//! and caches what it learned under the type name.
//!
//! All instances reporting the same [`Navigable::type_name`] must expose the
//! same capabilities, the same attribute table and the same read-only flags.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use dyn_clone::DynClone;
use indexmap::IndexMap;

use super::value::{Value, ValueType};

/// A value of a runtime type unknown to the engine
pub trait Navigable: DynClone + fmt::Debug + Send + Sync {
    /// Runtime type identity; also the descriptor cache key.
    ///
    /// Cached apart from the built-in value types, so names like `Map` or
    /// `List` do not clash with them.
    fn type_name(&self) -> &str;

    fn as_sequence(&self) -> Option<&dyn Sequence> {
        None
    }

    fn as_sequence_mut(&mut self) -> Option<&mut dyn Sequence> {
        None
    }

    fn as_mapping(&self) -> Option<&dyn Mapping> {
        None
    }

    fn as_mapping_mut(&mut self) -> Option<&mut dyn Mapping> {
        None
    }

    fn as_record(&self) -> Option<&dyn Record> {
        None
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }
}

dyn_clone::clone_trait_object!(Navigable);

/// Ordered, countable access
pub trait Sequence: Send + Sync {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&Value>;

    fn get_mut(&mut self, index: usize) -> Option<&mut Value>;

    /// Declared type of the elements
    fn element_type(&self) -> ValueType {
        ValueType::Any
    }

    /// Whether elements may be replaced
    fn is_read_only(&self) -> bool {
        false
    }

    /// Grow by one element. Sequences that cannot grow hand the value back.
    fn push(&mut self, value: Value) -> Result<(), Value> {
        Err(value)
    }
}

/// Keyed lookup
pub trait Mapping: Send + Sync {
    fn get(&self, key: &str) -> Option<&Value>;

    fn get_mut(&mut self, key: &str) -> Option<&mut Value>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    fn len(&self) -> usize {
        self.keys().count()
    }

    /// Declared type of the values
    fn value_type(&self) -> ValueType {
        ValueType::Any
    }

    /// Whether entries may be replaced
    fn is_read_only(&self) -> bool {
        false
    }

    /// Insert a new key. Mappings that do not permit insertion hand the value back.
    fn insert(&mut self, key: &str, value: Value) -> Result<(), Value> {
        let _ = key;
        Err(value)
    }
}

/// How an attribute is exposed by its record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Getter, with a setter when writable
    Property,
    /// Public field-like access
    Field,
}

/// One named attribute of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: Arc<str>,
    pub value_type: ValueType,
    pub kind: AttributeKind,
    pub writable: bool,
}

impl AttributeInfo {
    /// A read-write property
    pub fn property(name: impl Into<Arc<str>>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            kind: AttributeKind::Property,
            writable: true,
        }
    }

    /// A getter without setter
    pub fn read_only(name: impl Into<Arc<str>>, value_type: ValueType) -> Self {
        Self {
            writable: false,
            ..Self::property(name, value_type)
        }
    }

    /// A public field
    pub fn field(name: impl Into<Arc<str>>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            kind: AttributeKind::Field,
            writable: true,
        }
    }
}

/// Named attribute access
pub trait Record: Send + Sync {
    fn attributes(&self) -> &[AttributeInfo];

    /// Read an attribute. Computed properties may return owned values.
    fn attribute(&self, name: &str) -> Option<Cow<'_, Value>>;

    /// Storage slot of an attribute; `None` for computed properties
    fn attribute_mut(&mut self, name: &str) -> Option<&mut Value>;
}

impl Sequence for Vec<Value> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&Value> {
        self.as_slice().get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.as_mut_slice().get_mut(index)
    }

    fn push(&mut self, value: Value) -> Result<(), Value> {
        Vec::push(self, value);
        Ok(())
    }
}

impl Mapping for IndexMap<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        IndexMap::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        IndexMap::get_mut(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        IndexMap::contains_key(self, key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(IndexMap::keys(self).map(String::as_str))
    }

    fn len(&self) -> usize {
        IndexMap::len(self)
    }

    fn insert(&mut self, key: &str, value: Value) -> Result<(), Value> {
        IndexMap::insert(self, key.to_string(), value);
        Ok(())
    }
}
