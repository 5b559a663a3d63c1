//! Shared Serde deserializers
//!
//! Meter snapshots come from different exporters; some emit ids as numbers,
//! some as strings.

use serde::{Deserialize, Deserializer};

/// Deserialize an identifier given either as a string or as an integer
///
/// - `"m-17"` → `"m-17"`
/// - `17` → `"17"`
pub fn deserialize_id_flexible<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
        UInt(u64),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) => {
            if s.trim().is_empty() {
                Err(D::Error::custom("meter id cannot be empty"))
            } else {
                Ok(s)
            }
        },
        StringOrInt::Int(i) => Ok(i.to_string()),
        StringOrInt::UInt(u) => Ok(u.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(deserialize_with = "deserialize_id_flexible")]
        id: String,
    }

    #[test]
    fn test_id_from_string_and_number() {
        let r: Record = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(r.id, "abc");

        let r: Record = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(r.id, "7");
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(serde_json::from_str::<Record>(r#"{"id": "  "}"#).is_err());
        assert!(serde_json::from_str::<Record>(r#"{"id": null}"#).is_err());
    }
}
