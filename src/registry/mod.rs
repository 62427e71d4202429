//! Named path functions
//!
//! Functions are stateless transformations from the current navigation value
//! (plus the segment's literal arguments) to the next value. They are
//! registered once during startup and only looked up afterwards.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::error::{PathError, Result};
use crate::model::{Value, ValueType};

pub mod builder;
pub mod defaults;

pub use builder::FunctionBuilder;

/// Error raised by a function implementation
pub type FunctionError = Box<dyn std::error::Error + Send + Sync>;

/// A pluggable path function
pub trait PathFunction: Send + Sync {
    fn apply(&self, input: &Value, args: &[Arc<str>]) -> std::result::Result<Value, FunctionError>;

    /// Type the input is converted to before [`apply`](Self::apply) runs
    fn input_type(&self) -> ValueType {
        ValueType::Any
    }
}

impl<F> PathFunction for F
where
    F: Fn(&Value, &[Arc<str>]) -> std::result::Result<Value, FunctionError> + Send + Sync,
{
    fn apply(&self, input: &Value, args: &[Arc<str>]) -> std::result::Result<Value, FunctionError> {
        self(input, args)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCategory {
    Collection,
    String,
    Utility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionMetadata {
    pub name: String,
    pub category: FunctionCategory,
    pub description: String,
    pub min_args: usize,
    /// `None` means no upper bound
    pub max_args: Option<usize>,
    /// Type the navigator converts the input to before invocation
    pub input_type: ValueType,
    pub examples: Vec<String>,
}

impl FunctionMetadata {
    /// Metadata accepting any number of arguments and any input
    pub fn new(name: impl Into<String>, category: FunctionCategory) -> Self {
        Self {
            name: name.into(),
            category,
            description: String::new(),
            min_args: 0,
            max_args: None,
            input_type: ValueType::Any,
            examples: Vec::new(),
        }
    }

    pub fn accepts_arity(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.is_none_or(|max| count <= max)
    }
}

/// Wrong number of arguments for a function
#[derive(Debug, Clone, Error)]
#[error("`{name}` takes {expected} arguments, got {actual}")]
pub struct ArityError {
    pub name: String,
    pub expected: String,
    pub actual: usize,
}

impl ArityError {
    fn new(metadata: &FunctionMetadata, actual: usize) -> Self {
        let expected = match metadata.max_args {
            Some(max) if max == metadata.min_args => max.to_string(),
            Some(max) => format!("{} to {max}", metadata.min_args),
            None => format!("at least {}", metadata.min_args),
        };
        Self {
            name: metadata.name.clone(),
            expected,
            actual,
        }
    }
}

/// A function together with its metadata
pub struct RegisteredFunction {
    metadata: FunctionMetadata,
    function: Box<dyn PathFunction>,
}

impl RegisteredFunction {
    pub fn metadata(&self) -> &FunctionMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn input_type(&self) -> &ValueType {
        &self.metadata.input_type
    }

    /// Check arity, then run the function
    pub fn invoke(&self, input: &Value, args: &[Arc<str>]) -> std::result::Result<Value, FunctionError> {
        if !self.metadata.accepts_arity(args.len()) {
            return Err(Box::new(ArityError::new(&self.metadata, args.len())));
        }
        self.function.apply(input, args)
    }
}

impl fmt::Debug for RegisteredFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredFunction")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Thread-safe function registry.
///
/// Names are unique: a second registration under a bound name fails and the
/// first one stays active.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: RwLock<FxHashMap<String, Arc<RegisteredFunction>>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard function set
    pub fn with_standard_functions() -> Self {
        let registry = Self::new();
        {
            let mut functions = registry.functions.write();
            for (metadata, function) in defaults::standard_functions() {
                functions.insert(
                    metadata.name.clone(),
                    Arc::new(RegisteredFunction { metadata, function }),
                );
            }
        }
        registry
    }

    /// Register under `name`, taking the input type from the function itself
    pub fn register(&self, name: impl Into<String>, function: impl PathFunction + 'static) -> Result<()> {
        let metadata = FunctionMetadata {
            input_type: function.input_type(),
            ..FunctionMetadata::new(name, FunctionCategory::Utility)
        };
        self.register_with_metadata(metadata, function)
    }

    pub fn register_with_metadata(
        &self,
        metadata: FunctionMetadata,
        function: impl PathFunction + 'static,
    ) -> Result<()> {
        self.insert(metadata, Box::new(function))
    }

    /// Add the standard function set.
    ///
    /// All or nothing: if any standard name is already bound, nothing is
    /// registered and the first clashing name is reported.
    pub fn register_standard_functions(&self) -> Result<()> {
        let standard = defaults::standard_functions();
        let mut functions = self.functions.write();
        if let Some((metadata, _)) = standard
            .iter()
            .find(|(metadata, _)| functions.contains_key(&metadata.name))
        {
            log::warn!(
                "function `{}` is already registered, skipping the standard set",
                metadata.name
            );
            return Err(PathError::DuplicateFunctionName {
                name: metadata.name.clone(),
            });
        }
        for (metadata, function) in standard {
            log::debug!("registered function `{}`", metadata.name);
            functions.insert(
                metadata.name.clone(),
                Arc::new(RegisteredFunction { metadata, function }),
            );
        }
        Ok(())
    }

    fn insert(&self, metadata: FunctionMetadata, function: Box<dyn PathFunction>) -> Result<()> {
        let mut functions = self.functions.write();
        if functions.contains_key(&metadata.name) {
            log::warn!(
                "function `{}` is already registered, keeping the first registration",
                metadata.name
            );
            return Err(PathError::DuplicateFunctionName {
                name: metadata.name,
            });
        }
        log::debug!("registered function `{}`", metadata.name);
        functions.insert(
            metadata.name.clone(),
            Arc::new(RegisteredFunction { metadata, function }),
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<RegisteredFunction>> {
        self.functions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| PathError::unknown_function(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.read().contains_key(name)
    }

    pub fn metadata(&self, name: &str) -> Option<FunctionMetadata> {
        self.functions
            .read()
            .get(name)
            .map(|function| function.metadata.clone())
    }

    /// Registered names, sorted
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.function_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn constant(value: i64) -> impl PathFunction {
        move |_: &Value, _: &[Arc<str>]| -> std::result::Result<Value, FunctionError> {
            Ok(Value::from(value))
        }
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let registry = FunctionRegistry::new();
        registry.register("answer", constant(42)).unwrap();
        let err = registry.register("answer", constant(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateFunctionName);

        let function = registry.lookup("answer").unwrap();
        assert_eq!(function.invoke(&Value::Null, &[]).unwrap(), Value::from(42));
    }

    #[test]
    fn test_unknown_function() {
        let registry = FunctionRegistry::new();
        let err = registry.lookup("missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownFunction);
        assert_eq!(err.to_string(), "unknown function `missing`");
    }

    #[test]
    fn test_arity_is_checked_before_invocation() {
        let registry = FunctionRegistry::new();
        let metadata = FunctionMetadata {
            min_args: 1,
            max_args: Some(2),
            ..FunctionMetadata::new("pick", FunctionCategory::Utility)
        };
        registry
            .register_with_metadata(metadata, constant(1))
            .unwrap();
        let function = registry.lookup("pick").unwrap();

        let err = function.invoke(&Value::Null, &[]).unwrap_err();
        assert_eq!(err.to_string(), "`pick` takes 1 to 2 arguments, got 0");
        assert!(function.invoke(&Value::Null, &["a".into()]).is_ok());
    }

    #[test]
    fn test_standard_functions_collide_with_user_names() {
        let registry = FunctionRegistry::new();
        registry.register("trim", constant(0)).unwrap();
        let err = registry.register_standard_functions().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateFunctionName);

        // nothing from the standard set lands when one name clashes
        assert_eq!(registry.function_names(), vec!["trim".to_string()]);
        let trim = registry.lookup("trim").unwrap();
        assert_eq!(trim.invoke(&Value::from(" a "), &[]).unwrap(), Value::from(0));
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = FunctionRegistry::with_standard_functions();
        let names = registry.function_names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(registry.contains("orElse"));
        assert_eq!(registry.len(), 8);
    }
}
