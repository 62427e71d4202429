//! Bridging between `serde_json` documents and [`Value`]

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use super::value::Value;

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else {
                    // u64 beyond i64 and floats both land here
                    let text = n.to_string();
                    Decimal::from_str(&text)
                        .or_else(|_| Decimal::from_scientific(&text))
                        .map(Value::Decimal)
                        .unwrap_or(Value::String(text))
                }
            }
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Render as a JSON document; objects become JSON objects of their contents
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_roundtrip_shapes() {
        let doc = json!({
            "name": "Ada",
            "age": 36,
            "ratio": 0.5,
            "tags": ["x", "y"],
            "address": null
        });
        let value = Value::from(doc.clone());

        let Value::Map(entries) = &value else {
            panic!("expected a map, got {value:?}");
        };
        assert_eq!(entries.get("age"), Some(&Value::Integer(36)));
        assert_eq!(
            entries.get("ratio"),
            Some(&Value::Decimal(Decimal::from_str("0.5").unwrap()))
        );
        assert_eq!(entries.get("address"), Some(&Value::Null));

        assert_eq!(value.to_json()["tags"], json!(["x", "y"]));
        assert_eq!(value.to_json()["name"], json!("Ada"));
    }

    #[test]
    fn test_decimals_render_as_json_numbers() {
        let doc = json!({"price": 1.5, "ratio": 0.1, "count": 3});
        assert_eq!(Value::from(doc.clone()).to_json(), doc);

        let precise = Value::Decimal(Decimal::from_str("0.1234567890123456789").unwrap());
        assert_eq!(precise.to_json(), json!("0.1234567890123456789"));
    }
}
