use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, split_sections};

/// Format output as tables: headline fields first, then one table per
/// nested list (cashflows, units, payoffs).
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result(result, map),
            _ => print_object(map),
        },
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", format_scalar(value)),
    }
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    print_object(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>) {
    let sections = split_sections(map);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &sections.fields {
        builder.push_record([key.as_str(), val.as_str()]);
    }
    println!("{}", Table::from(builder));

    for (name, rows) in sections.tables {
        println!("\n{}:", name);
        print_rows(rows);
    }
}

fn print_rows(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_scalar(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }

    println!("{}", Table::from(builder));
}
