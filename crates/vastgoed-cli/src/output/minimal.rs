use serde_json::Value;

use super::format_scalar;

/// Headline figure per command, in order of priority.
const PRIORITY_KEYS: [&str; 9] = [
    "debt_free_delta_months",
    "months_to_debt_free",
    "irr_pct",
    "one_time_total",
    "total",
    "annual_amount",
    "tax_annual",
    "monthly_payment",
    "own_capital",
];

/// Print just the key answer value from the output.
///
/// Looks for the headline fields first, then falls back to the first field
/// in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_scalar(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result_obj));
}
