//! Type conversion chain
//!
//! Converters are tried in a fixed order and the first one that produces a
//! value wins:
//!
//! 1. identity: the value is already assignable to the target
//! 2. numeric widening and narrowing; narrowing that would lose information fails
//! 3. string parsing for unambiguous formats (integers, decimals, `true`/`false`)
//! 4. custom converters, in registration order
//!
//! When none applies the chain fails with [`PathError::UnconvertibleValue`].

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::value::{Value, ValueType};
use crate::error::{PathError, Result};

/// Outcome of a conversion through the chain
pub type ConversionResult = Result<Value>;

/// A pure, deterministic conversion step.
///
/// Returning `None` means "not applicable"; the chain moves on to the next
/// converter.
pub trait Converter: Send + Sync {
    fn name(&self) -> &str;

    fn convert(&self, value: &Value, target: &ValueType) -> Option<Value>;
}

/// Accepts values already assignable to the target
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl Converter for IdentityConverter {
    fn name(&self) -> &str {
        "identity"
    }

    fn convert(&self, value: &Value, target: &ValueType) -> Option<Value> {
        target.accepts(value).then(|| value.clone())
    }
}

/// Integer to decimal widening and lossless decimal to integer narrowing
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericConverter;

impl Converter for NumericConverter {
    fn name(&self) -> &str {
        "numeric"
    }

    fn convert(&self, value: &Value, target: &ValueType) -> Option<Value> {
        match (value, target) {
            (Value::Integer(i), ValueType::Decimal) => Some(Value::Decimal(Decimal::from(*i))),
            (Value::Decimal(d), ValueType::Integer) => narrow_to_integer(*d).map(Value::Integer),
            _ => None,
        }
    }
}

fn narrow_to_integer(d: Decimal) -> Option<i64> {
    if d.fract().is_zero() { d.to_i64() } else { None }
}

/// Parses strings holding unambiguous scalar literals
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParseConverter;

impl Converter for StringParseConverter {
    fn name(&self) -> &str {
        "string-parse"
    }

    fn convert(&self, value: &Value, target: &ValueType) -> Option<Value> {
        let Value::String(text) = value else {
            return None;
        };
        let text = text.trim();
        match target {
            ValueType::Integer => i64::from_str(text).ok().map(Value::Integer),
            ValueType::Decimal => Decimal::from_str(text).ok().map(Value::Decimal),
            ValueType::Boolean => {
                if text.eq_ignore_ascii_case("true") {
                    Some(Value::Boolean(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Some(Value::Boolean(false))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Ordered list of converters.
///
/// Built once, then shared read-only between navigations.
#[derive(Clone)]
pub struct ConversionChain {
    converters: Vec<Arc<dyn Converter>>,
    builtin: usize,
}

impl ConversionChain {
    /// Chain with the built-in stages only
    pub fn new() -> Self {
        let converters: Vec<Arc<dyn Converter>> = vec![
            Arc::new(IdentityConverter),
            Arc::new(NumericConverter),
            Arc::new(StringParseConverter),
        ];
        let builtin = converters.len();
        Self {
            converters,
            builtin,
        }
    }

    /// Append a custom converter after the built-in stages and earlier customs
    pub fn register(&mut self, converter: impl Converter + 'static) -> &mut Self {
        log::debug!("registering converter `{}`", converter.name());
        self.converters.push(Arc::new(converter));
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_converter(mut self, converter: impl Converter + 'static) -> Self {
        self.register(converter);
        self
    }

    /// Names in the order they are tried
    pub fn converter_names(&self) -> Vec<&str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    /// Number of custom converters
    pub fn custom_count(&self) -> usize {
        self.converters.len() - self.builtin
    }

    /// Convert a value to the target type
    pub fn convert(&self, value: &Value, target: &ValueType) -> ConversionResult {
        self.converters
            .iter()
            .find_map(|converter| {
                let converted = converter.convert(value, target)?;
                log::trace!(
                    "converter `{}` turned {} into {target}",
                    converter.name(),
                    value.type_name()
                );
                Some(converted)
            })
            .ok_or_else(|| PathError::unconvertible(value.type_name(), target.name()))
    }

    /// Convert, borrowing when the value is already assignable
    pub fn convert_cow<'v>(&self, value: &'v Value, target: &ValueType) -> Result<Cow<'v, Value>> {
        if target.accepts(value) {
            Ok(Cow::Borrowed(value))
        } else {
            self.convert(value, target).map(Cow::Owned)
        }
    }

    /// Convert an owned value, moving it through when already assignable
    pub fn convert_owned(&self, value: Value, target: &ValueType) -> ConversionResult {
        if target.accepts(&value) {
            Ok(value)
        } else {
            self.convert(&value, target)
        }
    }
}

impl Default for ConversionChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConversionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionChain")
            .field("converters", &self.converter_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_numeric_string_to_integer() {
        let chain = ConversionChain::new();
        assert_eq!(
            chain.convert(&Value::from("42"), &ValueType::Integer).unwrap(),
            Value::Integer(42)
        );
        let err = chain
            .convert(&Value::from("abc"), &ValueType::Integer)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnconvertibleValue);
        assert_eq!(err.to_string(), "cannot convert String to Integer");
    }

    #[test]
    fn test_decimal_narrowing_refuses_to_truncate() {
        let chain = ConversionChain::new();
        let whole = Value::Decimal(Decimal::from_str("7.00").unwrap());
        let fraction = Value::Decimal(Decimal::from_str("7.5").unwrap());
        let huge = Value::Decimal(Decimal::from_str("99999999999999999999").unwrap());

        assert_eq!(
            chain.convert(&whole, &ValueType::Integer).unwrap(),
            Value::Integer(7)
        );
        assert!(chain.convert(&fraction, &ValueType::Integer).is_err());
        assert!(chain.convert(&huge, &ValueType::Integer).is_err());
        assert_eq!(
            chain.convert(&Value::from(3), &ValueType::Decimal).unwrap(),
            Value::Decimal(Decimal::from(3))
        );
    }

    #[test]
    fn test_boolean_literals_ignore_case() {
        let chain = ConversionChain::new();
        assert_eq!(
            chain.convert(&Value::from("TRUE"), &ValueType::Boolean).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            chain.convert(&Value::from("False"), &ValueType::Boolean).unwrap(),
            Value::Boolean(false)
        );
        assert!(chain.convert(&Value::from("yes"), &ValueType::Boolean).is_err());
    }

    struct ToText;

    impl Converter for ToText {
        fn name(&self) -> &str {
            "to-text"
        }

        fn convert(&self, value: &Value, target: &ValueType) -> Option<Value> {
            match (value, target) {
                (Value::Integer(i), ValueType::String) => Some(Value::String(i.to_string())),
                _ => None,
            }
        }
    }

    struct Shadow;

    impl Converter for Shadow {
        fn name(&self) -> &str {
            "shadow"
        }

        fn convert(&self, _value: &Value, target: &ValueType) -> Option<Value> {
            (target == &ValueType::String).then(|| Value::from("shadowed"))
        }
    }

    #[test]
    fn test_custom_converters_run_in_registration_order() {
        let chain = ConversionChain::new()
            .with_converter(ToText)
            .with_converter(Shadow);
        assert_eq!(chain.custom_count(), 2);
        assert_eq!(
            chain.converter_names(),
            vec!["identity", "numeric", "string-parse", "to-text", "shadow"]
        );
        assert_eq!(
            chain.convert(&Value::from(5), &ValueType::String).unwrap(),
            Value::from("5")
        );
        // identity still runs before every custom converter
        assert_eq!(
            chain.convert(&Value::from("kept"), &ValueType::String).unwrap(),
            Value::from("kept")
        );
    }

    #[test]
    fn test_convert_cow_borrows_assignable_values() {
        let chain = ConversionChain::new();
        let value = Value::from("x");
        assert!(matches!(
            chain.convert_cow(&value, &ValueType::Any).unwrap(),
            Cow::Borrowed(_)
        ));
        assert!(matches!(
            chain.convert_cow(&Value::from("1"), &ValueType::Integer).unwrap(),
            Cow::Owned(Value::Integer(1))
        ));
    }
}
