use serde_json::Value;
use std::io;

use super::{format_scalar, split_sections};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// A result holding a list (cashflows, units, payoffs) is written as that
/// list, one row per entry; otherwise as two-column field/value rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let sections = split_sections(map);
            match sections.tables.first() {
                Some((_, rows)) if sections.tables.len() == 1 => write_rows(&mut wtr, rows),
                _ => {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in &sections.fields {
                        let _ = wtr.write_record([key.as_str(), val.as_str()]);
                    }
                }
            }
        }
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_scalar(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_scalar(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
