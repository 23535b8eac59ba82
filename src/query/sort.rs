use crate::core::Record;
use serde_json::Value;
use std::cmp::Ordering;

/// A single sort key. A later `order` call on the builder replaces an
/// earlier one; there is no multi-key sort at this layer.
#[derive(Debug, Clone)]
pub(crate) struct OrderKey {
    pub column: String,
    pub ascending: bool,
}

/// Stable sort by one column. Null and absent values sort last regardless
/// of direction.
pub(crate) fn sort_records(rows: &mut [Record], key: &OrderKey) {
    rows.sort_by(|a, b| {
        let a_val = a.get(&key.column).filter(|v| !v.is_null());
        let b_val = b.get(&key.column).filter(|v| !v.is_null());

        match (a_val, b_val) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ord = compare_values(a, b);
                if key.ascending { ord } else { ord.reverse() }
            }
        }
    });
}

/// Same-type comparison; incomparable pairs are treated as equal so the
/// stable sort leaves them in insertion order.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record_from;
    use serde_json::json;

    fn rows(values: &[Value]) -> Vec<Record> {
        values
            .iter()
            .map(|v| record_from(vec![("col", v.clone())]))
            .collect()
    }

    fn column(rows: &[Record]) -> Vec<Value> {
        rows.iter()
            .map(|r| r.get("col").cloned().unwrap_or(Value::Null))
            .collect()
    }

    #[test]
    fn test_descending_sort() {
        let mut data = rows(&[json!(1), json!(3), json!(2)]);
        sort_records(
            &mut data,
            &OrderKey {
                column: "col".into(),
                ascending: false,
            },
        );
        assert_eq!(column(&data), vec![json!(3), json!(2), json!(1)]);
    }

    #[test]
    fn test_nulls_last_in_both_directions() {
        for ascending in [true, false] {
            let mut data = rows(&[json!(null), json!(2), json!(1)]);
            sort_records(
                &mut data,
                &OrderKey {
                    column: "col".into(),
                    ascending,
                },
            );
            assert!(data[2].get("col").unwrap().is_null(), "null must sort last");
        }
    }

    #[test]
    fn test_missing_column_sorts_last() {
        let mut data = vec![
            record_from(vec![("other", json!(1))]),
            record_from(vec![("col", json!("a"))]),
        ];
        sort_records(
            &mut data,
            &OrderKey {
                column: "col".into(),
                ascending: true,
            },
        );
        assert_eq!(data[0].get("col"), Some(&json!("a")));
    }

    #[test]
    fn test_sort_is_stable() {
        let mut data = vec![
            record_from(vec![("col", json!(1)), ("tag", json!("first"))]),
            record_from(vec![("col", json!(1)), ("tag", json!("second"))]),
        ];
        sort_records(
            &mut data,
            &OrderKey {
                column: "col".into(),
                ascending: true,
            },
        );
        assert_eq!(data[0]["tag"], json!("first"));
        assert_eq!(data[1]["tag"], json!("second"));
    }
}
