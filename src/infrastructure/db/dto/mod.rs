pub mod captured_request;
pub mod response_rule;

pub use captured_request::{RequestRow, RequestSummaryRow};
pub use response_rule::ResponseRuleRow;

use serde_json::{Map, Value};

/// Serialize a structured field to storable text. A value that cannot be
/// serialized degrades to a sentinel error payload instead of failing the
/// whole write.
pub(crate) fn serialize_value(value: &Value) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| r#"{"error":"Unable to serialize value"}"#.to_string())
}

/// Parse stored text back into an object map; malformed or non-object text
/// degrades to an empty map.
pub(crate) fn parse_object(value: &str) -> Map<String, Value> {
    match serde_json::from_str(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Parse stored text back into an arbitrary value; malformed text degrades to
/// the raw string.
pub(crate) fn parse_unknown(value: Option<&str>) -> Value {
    let Some(text) = value else {
        return Value::Null;
    };
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_json_object_when_round_tripped_should_return_same_map() {
        let value = json!({"a": 1, "b": [true, null]});

        let stored = serialize_value(&value);
        let parsed = parse_object(&stored);

        assert_eq!(Value::Object(parsed), value);
    }

    #[test]
    fn given_malformed_text_when_parsed_as_object_should_return_empty_map() {
        assert!(parse_object("{not json").is_empty());
        assert!(parse_object("42").is_empty());
    }

    #[test]
    fn given_malformed_text_when_parsed_as_unknown_should_return_raw_string() {
        let parsed = parse_unknown(Some("plain text payload"));
        assert_eq!(parsed, Value::String("plain text payload".to_string()));
    }

    #[test]
    fn given_missing_text_when_parsed_as_unknown_should_return_null() {
        assert_eq!(parse_unknown(None), Value::Null);
    }
}
