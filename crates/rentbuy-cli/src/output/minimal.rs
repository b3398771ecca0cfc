use serde_json::Value;

/// Key answer of each command, in priority order.
const PRIORITY_KEYS: [&str; 4] = [
    "recommendation",
    "wealthGap",
    "remainingPrincipal",
    "policyVersion",
];

/// Print just the key answer value from the output, falling back to the
/// first field of the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                // A model run pairs the verdict with the signed difference
                if key == "recommendation" {
                    if let Some(diff) = map.get("diff") {
                        return format!("{} ({})", format_minimal(val), format_minimal(diff));
                    }
                }
                return format_minimal(val);
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
