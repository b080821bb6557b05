use serde_json::Value;

/// True when a field value counts as missing: absent, null, a blank
/// string, or an empty collection.
pub(super) fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        _ => false,
    }
}

/// True when the named field of a record counts as missing
pub(super) fn field_missing(record: &Value, key: &str) -> bool {
    is_missing(record.get(key))
}

/// The trimmed string at `key`, when present and non-empty
pub(super) fn string_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// The record's name under `key`, or an empty string for messages
pub(super) fn name_or_empty(record: &Value, key: &str) -> String {
    string_field(record, key).unwrap_or_default().to_string()
}

/// An identifier as text; authors write both strings and numbers
pub(super) fn id_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

/// A value rendered for an issue message: strings bare, anything else
/// in its JSON form.
pub(super) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
