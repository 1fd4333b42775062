use serde_json::Value;

use super::format_scalar;

/// Fields that answer each command in one value, by priority.
const PRIORITY_KEYS: [&str; 3] = ["months_to_debt_free", "recommended", "available_budget"];

/// Print just the headline answer: months to debt freedom for a plan, the
/// recommended strategy for a comparison, the surplus for a budget.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = value.get("result").unwrap_or(value);
    let summary = result.get("summary");

    for key in PRIORITY_KEYS {
        let found = summary
            .and_then(|s| s.get(key))
            .or_else(|| result.get(key))
            .filter(|v| !v.is_null());
        if let Some(val) = found {
            return format_scalar(val);
        }
    }

    match result {
        Value::Object(map) => map
            .iter()
            .next()
            .map(|(key, val)| format!("{}: {}", key, format_scalar(val)))
            .unwrap_or_default(),
        other => format_scalar(other),
    }
}
