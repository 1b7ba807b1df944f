//! JSON encoding of stored records.
//!
//! Absent and malformed values both decode to "no record"; a corrupt blob is
//! never reported as an error.
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::StoreError;

/// Decode `raw` as `T`, or `None` when absent or not valid JSON for `T`.
pub fn decode<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "Undecodable record, treating as absent");
            None
        }
    }
}

/// Decode `raw` as `T`, substituting `T::default()` for absent or corrupt data.
pub fn decode_or_default<T: DeserializeOwned + Default>(key: &str, raw: Option<&str>) -> T {
    decode(key, raw).unwrap_or_default()
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::NotificationSettings;

    #[test]
    fn test_absent_value_is_default() {
        let list: Vec<String> = decode_or_default("k", None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_non_json_is_default() {
        let list: Vec<String> = decode_or_default("k", Some("definitely not json"));
        assert!(list.is_empty());

        let settings: NotificationSettings = decode_or_default("k", Some("{broken"));
        assert_eq!(settings, NotificationSettings::default());
    }

    #[test]
    fn test_json_null_is_default() {
        let list: Vec<String> = decode_or_default("k", Some("null"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_wrong_shape_is_absent() {
        let value: Option<Vec<String>> = decode("k", Some(r#"{"a":1}"#));
        assert!(value.is_none());
    }

    #[test]
    fn test_encode_list() {
        let text = encode(&vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(text, r#"["a","b"]"#);
    }

    #[test]
    fn test_encode_borrowed_slice() {
        let labels = ["경제".to_string(), "세계".to_string()];
        let text = encode(&labels[..]).unwrap();
        assert_eq!(text, r#"["경제","세계"]"#);
    }
}
