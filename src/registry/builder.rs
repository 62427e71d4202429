//! Function builder pattern for easy registration

use super::{FunctionCategory, FunctionMetadata, FunctionRegistry, PathFunction};
use crate::error::Result;
use crate::model::ValueType;

pub struct FunctionBuilder {
    metadata: FunctionMetadata,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>, category: FunctionCategory) -> Self {
        Self {
            metadata: FunctionMetadata::new(name, category),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    /// Exactly `count` arguments
    pub fn arguments(self, count: usize) -> Self {
        self.arity(count, Some(count))
    }

    pub fn arity(mut self, min_args: usize, max_args: Option<usize>) -> Self {
        self.metadata.min_args = min_args;
        self.metadata.max_args = max_args;
        self
    }

    pub fn input_type(mut self, input_type: ValueType) -> Self {
        self.metadata.input_type = input_type;
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.metadata.examples.push(example.into());
        self
    }

    pub fn build(self) -> FunctionMetadata {
        self.metadata
    }

    pub fn register(self, registry: &FunctionRegistry, function: impl PathFunction + 'static) -> Result<()> {
        registry.register_with_metadata(self.metadata, function)
    }
}
