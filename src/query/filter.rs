use crate::core::Record;
use serde_json::Value;

/// Exact-match equality, the only filter operator the contract carries.
#[derive(Debug, Clone)]
pub(crate) struct EqFilter {
    pub column: String,
    pub value: Value,
}

impl EqFilter {
    /// A record matches only when the column is present and equal; a
    /// missing column never matches, not even a filter on null.
    pub fn matches(&self, record: &Record) -> bool {
        record
            .get(&self.column)
            .is_some_and(|v| values_equal(v, &self.value))
    }
}

/// Equality with numeric widening: `1` and `1.0` are the same value, the
/// way a loosely typed caller would expect.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record_from;
    use serde_json::json;

    #[test]
    fn test_eq_matches_exact_value() {
        let filter = EqFilter {
            column: "name".into(),
            value: json!("A"),
        };
        assert!(filter.matches(&record_from(vec![("name", json!("A"))])));
        assert!(!filter.matches(&record_from(vec![("name", json!("B"))])));
    }

    #[test]
    fn test_missing_column_never_matches() {
        let filter = EqFilter {
            column: "name".into(),
            value: json!(null),
        };
        assert!(!filter.matches(&record_from(vec![("other", json!(1))])));
        // but an explicit null does
        assert!(filter.matches(&record_from(vec![("name", json!(null))])));
    }

    #[test]
    fn test_numeric_widening() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!(2)));
        assert!(!values_equal(&json!(1), &json!("1")));
    }
}
