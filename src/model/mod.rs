//! Value model: dynamic values, capability traits, records and conversions

pub mod json;
pub mod record;
pub mod traits;
pub mod type_coercion;
pub mod value;

pub use record::{DynamicRecord, RecordSchema, RecordSchemaBuilder};
pub use traits::{AttributeInfo, AttributeKind, Mapping, Navigable, Record, Sequence};
pub use type_coercion::{
    ConversionChain, ConversionResult, Converter, IdentityConverter, NumericConverter,
    StringParseConverter,
};
pub use value::{Value, ValueType};
