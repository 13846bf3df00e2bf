use serde_json::Value;

use super::format_value;

/// Print just the two portfolio scalars from the allocation result.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result {
        let mut printed = false;
        for key in ["cash_after_initial_allocation", "current_portfolio_return"] {
            if let Some(val) = map.get(key) {
                println!("{}: {}", key, format_value(val));
                printed = true;
            }
        }
        if printed {
            return;
        }

        // Unknown shape: fall back to the first field.
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result));
}
