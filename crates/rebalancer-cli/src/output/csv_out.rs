use serde_json::Value;
use std::io;

use super::format_value;

/// Write the instrument row table as CSV to stdout. The summary scalars
/// are not part of the table; use the json or minimal formats for those.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let rows = value
        .as_object()
        .and_then(|m| m.get("result"))
        .and_then(|r| r.get("rows"))
        .and_then(Value::as_array);

    match rows {
        Some(rows) => write_rows_csv(&mut wtr, rows),
        None => {
            // Fall back to field,value pairs for non-envelope shapes.
            if let Value::Object(map) = value {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &csv_cell(val)]);
                }
            } else {
                let _ = wtr.write_record([&csv_cell(value)]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_rows_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(csv_cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        _ => format_value(value),
    }
}
