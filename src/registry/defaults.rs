//! Standard function set
//!
//! Opt-in through [`FunctionRegistry::with_standard_functions`] or
//! [`FunctionRegistry::register_standard_functions`].
//!
//! [`FunctionRegistry::with_standard_functions`]: super::FunctionRegistry::with_standard_functions
//! [`FunctionRegistry::register_standard_functions`]: super::FunctionRegistry::register_standard_functions

use std::sync::Arc;

use super::builder::FunctionBuilder;
use super::{FunctionCategory, FunctionError, FunctionMetadata, PathFunction};
use crate::model::{Value, ValueType};

type FunctionResult = Result<Value, FunctionError>;

fn not_defined(name: &str, input: &Value) -> FunctionError {
    format!("{name}() is not defined for {}", input.type_name()).into()
}

fn length(len: usize) -> Value {
    Value::Integer(i64::try_from(len).unwrap_or(i64::MAX))
}

fn size(input: &Value, _: &[Arc<str>]) -> FunctionResult {
    if input.is_null() {
        return Ok(Value::Integer(0));
    }
    if let Value::String(text) = input {
        return Ok(length(text.chars().count()));
    }
    if let Some(sequence) = input.as_sequence() {
        return Ok(length(sequence.len()));
    }
    if let Some(mapping) = input.as_mapping() {
        return Ok(length(mapping.len()));
    }
    Err(not_defined("size", input))
}

fn element(name: &str, input: &Value, pick: fn(usize) -> Option<usize>) -> FunctionResult {
    if input.is_null() {
        return Ok(Value::Null);
    }
    let sequence = input.as_sequence().ok_or_else(|| not_defined(name, input))?;
    Ok(pick(sequence.len())
        .and_then(|index| sequence.get(index))
        .cloned()
        .unwrap_or_default())
}

fn first(input: &Value, _: &[Arc<str>]) -> FunctionResult {
    element("first", input, |len| (len > 0).then_some(0))
}

fn last(input: &Value, _: &[Arc<str>]) -> FunctionResult {
    element("last", input, |len| len.checked_sub(1))
}

fn keys(input: &Value, _: &[Arc<str>]) -> FunctionResult {
    if input.is_null() {
        return Ok(Value::Null);
    }
    if let Some(mapping) = input.as_mapping() {
        return Ok(Value::List(mapping.keys().map(Value::from).collect()));
    }
    if let Some(record) = input.as_record() {
        return Ok(Value::List(
            record
                .attributes()
                .iter()
                .map(|info| Value::from(&*info.name))
                .collect(),
        ));
    }
    Err(not_defined("keys", input))
}

fn map_text(name: &str, input: &Value, op: fn(&str) -> String) -> FunctionResult {
    match input {
        Value::Null => Ok(Value::Null),
        Value::String(text) => Ok(Value::String(op(text))),
        other => Err(not_defined(name, other)),
    }
}

fn upper(input: &Value, _: &[Arc<str>]) -> FunctionResult {
    map_text("upper", input, str::to_uppercase)
}

fn lower(input: &Value, _: &[Arc<str>]) -> FunctionResult {
    map_text("lower", input, str::to_lowercase)
}

fn trim(input: &Value, _: &[Arc<str>]) -> FunctionResult {
    map_text("trim", input, |text| text.trim().to_string())
}

fn or_else(input: &Value, args: &[Arc<str>]) -> FunctionResult {
    match (input, args) {
        (Value::Null, [fallback]) => Ok(Value::from(&**fallback)),
        (Value::Null, _) => Err("orElse() needs a fallback argument".into()),
        (value, _) => Ok(value.clone()),
    }
}

fn entry(
    builder: FunctionBuilder,
    function: impl PathFunction + 'static,
) -> (FunctionMetadata, Box<dyn PathFunction>) {
    (builder.build(), Box::new(function))
}

pub(crate) fn standard_functions() -> Vec<(FunctionMetadata, Box<dyn PathFunction>)> {
    use FunctionCategory as Category;

    vec![
        entry(
            FunctionBuilder::new("size", Category::Collection)
                .description("Number of elements, entries or characters; 0 for null")
                .arguments(0)
                .example("tags.size()"),
            size,
        ),
        entry(
            FunctionBuilder::new("first", Category::Collection)
                .description("First element of a sequence, null when empty")
                .arguments(0)
                .example("tags.first()"),
            first,
        ),
        entry(
            FunctionBuilder::new("last", Category::Collection)
                .description("Last element of a sequence, null when empty")
                .arguments(0)
                .example("tags.last()"),
            last,
        ),
        entry(
            FunctionBuilder::new("keys", Category::Collection)
                .description("Keys of a mapping or attribute names of a record")
                .arguments(0)
                .example("phones.keys()"),
            keys,
        ),
        entry(
            FunctionBuilder::new("upper", Category::String)
                .description("Upper-cased text")
                .arguments(0)
                .input_type(ValueType::String)
                .example("name.upper()"),
            upper,
        ),
        entry(
            FunctionBuilder::new("lower", Category::String)
                .description("Lower-cased text")
                .arguments(0)
                .input_type(ValueType::String)
                .example("name.lower()"),
            lower,
        ),
        entry(
            FunctionBuilder::new("trim", Category::String)
                .description("Text without surrounding whitespace")
                .arguments(0)
                .input_type(ValueType::String)
                .example("name.trim()"),
            trim,
        ),
        entry(
            FunctionBuilder::new("orElse", Category::Utility)
                .description("The input, or the argument as text when the input is null")
                .arguments(1)
                .example("nickname.orElse('none')"),
            or_else,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FunctionRegistry;

    fn call(name: &str, input: Value, args: &[&str]) -> FunctionResult {
        let args: Vec<Arc<str>> = args.iter().map(|arg| Arc::from(*arg)).collect();
        FunctionRegistry::with_standard_functions()
            .lookup(name)
            .unwrap()
            .invoke(&input, &args)
    }

    fn tags() -> Value {
        Value::from(vec![Value::from("x"), Value::from("y")])
    }

    #[test]
    fn test_collection_functions() {
        assert_eq!(call("size", tags(), &[]).unwrap(), Value::from(2));
        assert_eq!(call("size", Value::from("héllo"), &[]).unwrap(), Value::from(5));
        assert_eq!(call("size", Value::Null, &[]).unwrap(), Value::from(0));
        assert_eq!(call("first", tags(), &[]).unwrap(), Value::from("x"));
        assert_eq!(call("last", tags(), &[]).unwrap(), Value::from("y"));
        assert_eq!(call("last", Value::List(vec![]), &[]).unwrap(), Value::Null);
        assert!(call("first", Value::from(1), &[]).is_err());
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut entries = indexmap::IndexMap::new();
        entries.insert("b".to_string(), Value::from(1));
        entries.insert("a".to_string(), Value::from(2));
        let value = Value::from(entries);
        assert_eq!(
            call("keys", value, &[]).unwrap(),
            Value::from(vec![Value::from("b"), Value::from("a")])
        );
    }

    #[test]
    fn test_text_functions() {
        assert_eq!(call("upper", Value::from("ada"), &[]).unwrap(), Value::from("ADA"));
        assert_eq!(call("lower", Value::from("ADA"), &[]).unwrap(), Value::from("ada"));
        assert_eq!(call("trim", Value::from("  a "), &[]).unwrap(), Value::from("a"));
        assert_eq!(call("upper", Value::Null, &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_or_else() {
        assert_eq!(
            call("orElse", Value::Null, &["n/a"]).unwrap(),
            Value::from("n/a")
        );
        assert_eq!(
            call("orElse", Value::from("set"), &["n/a"]).unwrap(),
            Value::from("set")
        );
        assert!(call("orElse", Value::Null, &[]).is_err());
    }
}
