use serde_json::Value;

/// Whether a value counts as "not answered".
///
/// Null, empty strings, empty arrays and empty objects are blank. Booleans and
/// numbers always count as answered.
pub fn is_blank(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::String(s) => s.is_empty(),
    Value::Array(items) => items.is_empty(),
    Value::Object(map) => map.is_empty(),
    Value::Bool(_) | Value::Number(_) => false,
  }
}

/// Length of a text answer in characters. Non-strings have no length.
pub fn text_len(value: &Value) -> usize {
  value.as_str().map(|s| s.chars().count()).unwrap_or(0)
}

/// A declaration is only accepted when it is literally `true`.
pub fn is_checked(value: &Value) -> bool {
  matches!(value, Value::Bool(true))
}
