use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Schedules print their level payment; for object results, well-known
/// fields are tried in priority order before falling back to the first
/// field.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // A schedule's single most useful number is the level payment.
    if let Value::Array(rows) = result {
        if let Some(Value::Object(first)) = rows.first() {
            if let Some(payment) = first.get("payment") {
                println!("{}", format_minimal(payment));
                return;
            }
        }
    }

    let priority_keys = [
        "level_payment",
        "remaining_balance",
        "cumulative_interest",
        "total_interest",
    ];

    if let Value::Object(map) = result {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result));
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
