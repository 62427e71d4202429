//! Path navigation over dynamic object graphs
//!
//! Given a root [`Value`] and a path such as `customer.addresses[2].city` or
//! `nickname.orElse('none')`, a [`Navigator`] reads, writes or creates the value
//! the path leads to. Paths cross records, sequences, mappings and registered
//! functions uniformly; parsed paths and per-type accessors are cached.
//!
//! ```rust
//! use objpath::{ContainerFactories, Navigator, RecordSchema, Value, ValueType};
//!
//! let address = RecordSchema::builder("Address")
//!     .property("city", ValueType::String)
//!     .build();
//! let person = RecordSchema::builder("Person")
//!     .property("name", ValueType::String)
//!     .property("address", address.value_type())
//!     .build();
//!
//! let mut root = person.instantiate().with("name", "Ada").into_value();
//! let navigator = Navigator::new();
//!
//! assert!(navigator.get(&root, "address.city").is_err());
//! navigator
//!     .set_creating(
//!         &mut root,
//!         "address.city",
//!         "Berlin",
//!         &ContainerFactories::new().with_schema(&address),
//!     )
//!     .unwrap();
//! assert_eq!(navigator.get(&root, "address.city").unwrap(), Value::from("Berlin"));
//! ```

pub mod access;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod registry;

// Re-export main types
pub use access::{AccessorCache, AccessorDescriptor};
pub use config::{NavigatorConfig, PathCacheConfig};
pub use error::{Absence, AttributeFailure, ErrorKind, Location, PathError, Result};
pub use evaluator::{ContainerFactories, NavigationContext, Navigator, NavigatorBuilder};
pub use model::{
    AttributeInfo, AttributeKind, ConversionChain, Converter, DynamicRecord, Mapping, Navigable,
    Record, RecordSchema, Sequence, Value, ValueType,
};
pub use parser::{PathCache, PathExpression, Segment, parse_path as parse};
pub use registry::{
    FunctionBuilder, FunctionCategory, FunctionError, FunctionMetadata, FunctionRegistry,
    PathFunction,
};
