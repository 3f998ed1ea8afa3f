//! Serialization helpers for backend payloads
//!
//! The backend emits record identifiers as integers on some routes and as
//! strings on others. These helpers normalise both to `String`.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Deserialize an identifier that may be a JSON string or number.
///
/// # Usage
/// ```rust
/// use serde::Deserialize;
/// use wastewise_domain::utils::serde::id_string;
///
/// #[derive(Deserialize)]
/// struct Record {
///     #[serde(deserialize_with = "id_string")]
///     id: String,
/// }
///
/// let record: Record = serde_json::from_str(r#"{"id": 42}"#).unwrap();
/// assert_eq!(record.id, "42");
/// ```
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

/// Optional variant of [`id_string`]; `null` and a missing field map to `None`.
///
/// Use together with `#[serde(default)]`.
pub fn option_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => {
            Err(de::Error::custom(format!("expected string or number id, got {other}")))
        }
    }
}
