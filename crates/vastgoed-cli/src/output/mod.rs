pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Result fields split for tabular display.
pub struct Sections<'a> {
    /// Scalar fields; nested objects flattened with dotted keys
    pub fields: Vec<(String, String)>,
    /// Arrays of objects (cashflows, units, payoffs, ...)
    pub tables: Vec<(String, &'a [Value])>,
}

pub fn split_sections(map: &Map<String, Value>) -> Sections<'_> {
    let mut sections = Sections {
        fields: Vec::new(),
        tables: Vec::new(),
    };
    collect(map, "", &mut sections);
    sections
}

fn collect<'a>(map: &'a Map<String, Value>, prefix: &str, out: &mut Sections<'a>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) if !is_coverage(val) => collect(inner, &name, out),
            Value::Array(items) if items.iter().any(Value::is_object) => {
                out.tables.push((name, items.as_slice()))
            }
            _ => out.fields.push((name, format_scalar(val))),
        }
    }
}

/// `{"finite": "1.25"}`: a coverage ratio.
fn is_coverage(value: &Value) -> bool {
    matches!(value, Value::Object(m) if m.len() == 1 && m.contains_key("finite"))
}

/// Render one JSON value as a single cell.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) if s == "unbounded" => "∞".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(m) => match m.get("finite") {
            Some(v) if m.len() == 1 => format_scalar(v),
            _ => serde_json::to_string(value).unwrap_or_default(),
        },
    }
}
