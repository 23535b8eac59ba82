use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A table row: an open JSON object.
///
/// Records carry two conventional fields, both filled in on insertion when
/// the caller leaves them out:
/// - `id` — a generated unique string identifier
/// - `created_at` — an RFC 3339 timestamp
///
/// Everything else is whatever the caller supplies.
pub type Record = Map<String, Value>;

/// Generates a fresh unique record id.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as an RFC 3339 string, the `created_at` wire format.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The record's `id`, when present and a string.
pub fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Builds a record from (key, value) pairs. Test and seed helper.
pub fn record_from(fields: Vec<(&str, Value)>) -> Record {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = fresh_id();
        let b = fresh_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_now_is_rfc3339() {
        let ts = now_rfc3339();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_record_id() {
        let record = record_from(vec![("id", Value::String("abc".into()))]);
        assert_eq!(record_id(&record), Some("abc"));

        let no_id = record_from(vec![("name", Value::String("A".into()))]);
        assert_eq!(record_id(&no_id), None);
    }
}
