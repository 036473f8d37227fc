//! Encoded JSON fields.
//!
//! Column lists, page properties, and widget lists are stored as JSON text.
//! Writes keep whatever text the caller sent; reads decode leniently, so a
//! malformed blob degrades to an empty value instead of failing the request.
//! Edits that write a blob back decode it strictly.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::Properties;

/// A blob field as it arrives in a request body.
///
/// Clients may send either the encoded text (`"[{\"id\":\"status\"}]"`) or the
/// structured value itself. Both are stored as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlobInput {
    Encoded(String),
    Structured(JsonValue),
}

impl BlobInput {
    /// The text form that gets stored.
    pub fn into_text(self) -> String {
        match self {
            BlobInput::Encoded(s) => s,
            BlobInput::Structured(v) => v.to_string(),
        }
    }
}

impl From<JsonValue> for BlobInput {
    fn from(v: JsonValue) -> Self {
        BlobInput::Structured(v)
    }
}

/// Decode a stored blob, falling back to `T::default()` when it is empty or
/// does not parse.
pub fn decode_or_default<T>(raw: &str, field: &'static str) -> T
where
    T: DeserializeOwned + Default,
{
    if raw.trim().is_empty() {
        return T::default();
    }
    match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                subsystem = crate::logging::SUBSYSTEM_CORE,
                component = "blob",
                field,
                error = %e,
                "Stored blob failed to decode, using empty value"
            );
            T::default()
        }
    }
}

/// Decode a stored blob that is about to be edited and written back.
///
/// Empty text is `T::default()`; text that does not parse is an error, so the
/// stored value is never replaced by an edit of the fallback.
pub fn decode_for_edit<T>(raw: &str, field: &'static str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(raw).map_err(|e| {
        Error::InvalidInput(format!(
            "Stored {} could not be decoded, replace it before editing: {}",
            field, e
        ))
    })
}

/// Decode a properties blob. Anything that is not a JSON object is empty.
pub fn decode_properties(raw: &str) -> Properties {
    match decode_or_default::<JsonValue>(raw, "properties") {
        JsonValue::Object(map) => map,
        JsonValue::Null => Properties::new(),
        other => {
            warn!(
                subsystem = crate::logging::SUBSYSTEM_CORE,
                component = "blob",
                field = "properties",
                kind = json_kind(&other),
                "Properties blob is not an object, using empty value"
            );
            Properties::new()
        }
    }
}

/// Render a property value the way it is displayed and compared.
///
/// Strings are used verbatim; numbers and booleans use their JSON text;
/// null and containers render as empty.
pub fn property_text(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

/// Accept `true`/`false`, `0`/`1` (any number, nonzero is true), or the
/// strings `"true"`/`"false"`/`"1"`/`"0"`. `null` reads as false.
pub fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(false);
    }
    bool_from_json(&value).ok_or_else(|| de::Error::custom(format!("expected boolean, got {}", value)))
}

/// Optional form of [`lenient_bool`]; `null` reads as absent.
pub fn lenient_opt_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => bool_from_json(&v)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected boolean, got {}", v))),
    }
}

fn bool_from_json(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0),
        JsonValue::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Distinguish an omitted field (`None`) from an explicit `null`
/// (`Some(None)`). Use with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Flags {
        #[serde(deserialize_with = "lenient_bool")]
        required: bool,
        #[serde(default, deserialize_with = "lenient_opt_bool")]
        optional: Option<bool>,
        #[serde(default, deserialize_with = "double_option")]
        parent: Option<Option<String>>,
    }

    #[test]
    fn test_blob_input_accepts_text_and_structure() {
        let encoded: BlobInput = serde_json::from_value(json!("[1,2]")).unwrap();
        assert_eq!(encoded.into_text(), "[1,2]");

        let structured: BlobInput = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(structured.into_text(), "[1,2]");
    }

    #[test]
    fn test_decode_or_default_malformed_is_empty() {
        let v: Vec<String> = decode_or_default("{not json", "columns");
        assert!(v.is_empty());
        let v: Vec<String> = decode_or_default("", "columns");
        assert!(v.is_empty());
        let v: Vec<String> = decode_or_default(r#"["a"]"#, "columns");
        assert_eq!(v, vec!["a"]);
    }

    #[test]
    fn test_decode_for_edit_rejects_malformed() {
        let err = decode_for_edit::<Vec<String>>("{not json", "columns").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("columns")));

        let v: Vec<String> = decode_for_edit("  ", "columns").unwrap();
        assert!(v.is_empty());
        let v: Vec<String> = decode_for_edit(r#"["a"]"#, "columns").unwrap();
        assert_eq!(v, vec!["a"]);
    }

    #[test]
    fn test_decode_properties_non_object() {
        assert!(decode_properties("[]").is_empty());
        assert!(decode_properties("null").is_empty());
        assert!(decode_properties("garbage").is_empty());
        let props = decode_properties(r#"{"status":"Done"}"#);
        assert_eq!(props.get("status"), Some(&json!("Done")));
    }

    #[test]
    fn test_property_text() {
        assert_eq!(property_text(Some(&json!("Todo"))), "Todo");
        assert_eq!(property_text(Some(&json!(3))), "3");
        assert_eq!(property_text(Some(&json!(true))), "true");
        assert_eq!(property_text(Some(&JsonValue::Null)), "");
        assert_eq!(property_text(None), "");
    }

    #[test]
    fn test_lenient_bool_forms() {
        let f: Flags = serde_json::from_value(json!({"required": 1})).unwrap();
        assert!(f.required);
        assert_eq!(f.optional, None);

        let f: Flags = serde_json::from_value(json!({"required": 0, "optional": true})).unwrap();
        assert!(!f.required);
        assert_eq!(f.optional, Some(true));

        let f: Flags = serde_json::from_value(json!({"required": "false", "optional": null})).unwrap();
        assert!(!f.required);
        assert_eq!(f.optional, None);

        assert!(serde_json::from_value::<Flags>(json!({"required": "maybe"})).is_err());
    }

    #[test]
    fn test_double_option_distinguishes_null() {
        let f: Flags = serde_json::from_value(json!({"required": true})).unwrap();
        assert_eq!(f.parent, None);

        let f: Flags = serde_json::from_value(json!({"required": true, "parent": null})).unwrap();
        assert_eq!(f.parent, Some(None));

        let f: Flags = serde_json::from_value(json!({"required": true, "parent": "p1"})).unwrap();
        assert_eq!(f.parent, Some(Some("p1".to_string())));
    }
}
