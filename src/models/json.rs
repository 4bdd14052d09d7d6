//! Empty-string canonicalization for catalog JSON.
//!
//! The catalog uses `""` and `null` interchangeably for missing strings.
//! Both deserialize to `None`, and `None` (or an empty string) is written
//! back as `null`, so cached files round-trip to the same value.

use serde::{Deserialize, Deserializer, Serializer};

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.as_deref() {
        Some(s) if !s.is_empty() => serializer.serialize_some(s),
        _ => serializer.serialize_none(),
    }
}
