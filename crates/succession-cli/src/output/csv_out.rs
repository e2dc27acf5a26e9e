use serde_json::{Map, Value};
use std::io;

use super::cell;

type Writer<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// A report is written as one row per recipient, since that is the part a
/// spreadsheet user wants. Other objects fall back to field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Object(map) => match map.get("recipients") {
            Some(Value::Array(rows)) => write_records(&mut wtr, rows),
            _ => write_fields(&mut wtr, map),
        },
        Value::Array(arr) => write_records(&mut wtr, arr),
        other => {
            let _ = wtr.write_record([cell(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut Writer<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &cell(val)]);
    }
}

fn write_records(wtr: &mut Writer<'_>, arr: &[Value]) {
    if !arr.iter().all(Value::is_object) {
        for item in arr {
            let _ = wtr.write_record([cell(item)]);
        }
        return;
    }

    let headers: Vec<&str> = match arr.first() {
        Some(Value::Object(first)) => first.keys().map(String::as_str).collect(),
        _ => return,
    };
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
