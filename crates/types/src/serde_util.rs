use serde::{Deserialize, Deserializer};

/// Accepts `"12"`, `12`, or `null` and yields an optional string.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Str(s)) if s.trim().is_empty() => None,
        Some(Value::Str(s)) => Some(s),
        Some(Value::Int(n)) => Some(n.to_string()),
        Some(Value::Float(n)) => Some(n.to_string()),
        None => None,
    })
}
