//! Data Transfer Objects for remote API requests and responses.
//!
//! All DTOs use Serde. Response DTOs are lenient: field names accept both the
//! service's snake_case and camelCase aliases, ids may arrive as strings or
//! numbers, and null lists decode as empty.

pub mod auth;
pub mod shorten;
pub mod visits;

/// Deserializes an identifier sent either as a JSON string or a number.
pub(crate) mod flexible_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "super::flexible_id::deserialize")]
        id: String,
    }

    #[test]
    fn test_flexible_id_accepts_string_and_number() {
        let text: Holder = serde_json::from_value(json!({ "id": "a1b2" })).unwrap();
        let number: Holder = serde_json::from_value(json!({ "id": 42 })).unwrap();

        assert_eq!(text.id, "a1b2");
        assert_eq!(number.id, "42");
    }

    #[test]
    fn test_flexible_id_rejects_objects() {
        let result: Result<Holder, _> = serde_json::from_value(json!({ "id": { "x": 1 } }));
        assert!(result.is_err());
    }
}
