use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format_value;

/// Render the allocation result: the instrument rows as a table, the two
/// portfolio scalars below it, then warnings and methodology.
pub fn print_table(value: &Value) {
    let envelope = value.as_object();
    let result = envelope.and_then(|m| m.get("result"));

    match result.and_then(|r| r.get("rows")).and_then(Value::as_array) {
        Some(rows) => print_rows(rows),
        None => {
            // Not the allocation envelope; render whatever we got.
            print_flat_object(result.unwrap_or(value));
            return;
        }
    }

    if let Some(Value::Object(res_map)) = result {
        for key in ["cash_after_initial_allocation", "current_portfolio_return"] {
            if let Some(val) = res_map.get(key) {
                println!("{}: {}", key, format_value(val));
            }
        }
    }

    if let Some(Value::Array(warnings)) = envelope.and_then(|m| m.get("warnings")) {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.and_then(|m| m.get("methodology")) {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            println!("{}", format_value(row));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }

    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}
