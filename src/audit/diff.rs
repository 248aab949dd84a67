//! Diff generation for audit logging
//!
//! Produces human-readable summaries of changes between before and after
//! snapshots. Only top-level fields are compared.

use serde_json::Value;

/// Generate a human-readable diff between two JSON values
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                match after_obj.get(key) {
                    Some(after_val) if before_val != after_val => {
                        changes.push(format!(
                            "{}: {} -> {}",
                            key,
                            format_value(before_val),
                            format_value(after_val)
                        ));
                    }
                    Some(_) => {}
                    None => {
                        changes.push(format!(
                            "{}: {} -> (removed)",
                            key,
                            format_value(before_val)
                        ));
                    }
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before != after => Some(format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )),
        _ => None,
    }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.len() > 50 {
                format!("\"{}...\"", &s[..47])
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_change() {
        let before = json!({"name": "Rent", "amount": -120000});
        let after = json!({"name": "Rent", "amount": -125000});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("amount: -120000 -> -125000"));
        assert!(!diff.contains("name")); // unchanged
    }

    #[test]
    fn test_string_change_quoted() {
        let before = json!({"status": "active"});
        let after = json!({"status": "paused"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("status: \"active\" -> \"paused\""));
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"memo": "old"});
        let after = json!({"payee": "Grocer"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("memo: \"old\" -> (removed)"));
        assert!(diff.contains("payee: (added) -> \"Grocer\""));
    }

    #[test]
    fn test_no_changes_yields_none() {
        let value = json!({"name": "Test", "amount": 100});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_null_and_array_formatting() {
        let before = json!({"next_date": null, "tags": [1, 2]});
        let after = json!({"next_date": "2026-03-01", "tags": [1, 2, 3]});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("next_date: null -> \"2026-03-01\""));
        assert!(diff.contains("tags: [2 items] -> [3 items]"));
    }

    #[test]
    fn test_long_strings_truncated() {
        let before = json!({"memo": "m".repeat(100)});
        let after = json!({"memo": "short"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }
}
