pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

// ---------------------------------------------------------------------------
// Row extraction shared by the table and CSV formatters
// ---------------------------------------------------------------------------

/// A tabular slice of a command result (schedule, payoff order, ...).
#[derive(Debug, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

const SCHEDULE_COLUMNS: [(&str, &str); 6] = [
    ("loan", "loan_name"),
    ("mandatory", "mandatory_payment"),
    ("extra", "extra_payment"),
    ("paid", "total_payment"),
    ("next_interest", "interest_accrued"),
    ("remaining", "remaining_balance"),
];

const PAYOFF_COLUMNS: [(&str, &str); 5] = [
    ("loan", "loan_name"),
    ("month", "payoff_month"),
    ("date", "payoff_date"),
    ("paid", "total_paid"),
    ("interest", "total_interest"),
];

const OUTCOME_COLUMNS: [(&str, &str); 5] = [
    ("strategy", "strategy"),
    ("months", "months_to_debt_free"),
    ("debt_free", "debt_free_date"),
    ("paid", "total_paid"),
    ("interest", "total_interest"),
];

const CATEGORY_COLUMNS: [(&str, &str); 5] = [
    ("category", "category"),
    ("kind", "kind"),
    ("total", "total"),
    ("entries", "entry_count"),
    ("share", "share"),
];

/// Pull every tabular section out of a `result` object, most detailed first.
pub fn sections(result: &Value) -> Vec<Section> {
    let mut out = Vec::new();

    if let Some(schedule) = result.get("schedule").and_then(Value::as_array) {
        let mut headers = vec!["month", "date"];
        headers.extend(SCHEDULE_COLUMNS.iter().map(|(h, _)| *h));
        let rows = schedule
            .iter()
            .flat_map(|snapshot| {
                let month = cell(snapshot.get("month"));
                let date = cell(snapshot.get("date"));
                payments(snapshot).map(move |payment| {
                    let mut row = vec![month.clone(), date.clone()];
                    row.extend(pick(payment, &SCHEDULE_COLUMNS));
                    row
                })
            })
            .collect();
        out.push(Section {
            title: "Schedule",
            headers,
            rows,
        });
    }

    if let Some(payoffs) = result
        .get("summary")
        .and_then(|s| s.get("payoff_order"))
        .and_then(Value::as_array)
    {
        out.push(section("Payoff order", &PAYOFF_COLUMNS, payoffs.iter()));
    }

    let outcomes: Vec<&Value> = ["snowball", "avalanche"]
        .iter()
        .filter_map(|key| result.get(*key))
        .filter(|v| v.is_object())
        .collect();
    if !outcomes.is_empty() {
        out.push(section("Strategies", &OUTCOME_COLUMNS, outcomes.into_iter()));
    }

    let categories: Vec<&Value> = ["income_categories", "expense_categories"]
        .iter()
        .filter_map(|key| result.get(*key).and_then(Value::as_array))
        .flatten()
        .collect();
    if !categories.is_empty() {
        out.push(section("Categories", &CATEGORY_COLUMNS, categories.into_iter()));
    }

    out
}

/// Scalar fields of a result object; nested arrays and objects are left to
/// [`sections`], except for a nested `summary` whose scalars are inlined.
pub fn scalar_fields(result: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = result else {
        return Vec::new();
    };
    let mut fields = Vec::new();
    for (key, val) in map {
        match val {
            Value::Object(inner) if key == "summary" => {
                for (inner_key, inner_val) in inner {
                    if !inner_val.is_array() && !inner_val.is_object() {
                        fields.push((inner_key.clone(), format_scalar(inner_val)));
                    }
                }
            }
            Value::Array(_) | Value::Object(_) => {}
            _ => fields.push((key.clone(), format_scalar(val))),
        }
    }
    fields
}

pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn section<'a>(
    title: &'static str,
    columns: &[(&'static str, &str)],
    items: impl Iterator<Item = &'a Value>,
) -> Section {
    Section {
        title,
        headers: columns.iter().map(|(h, _)| *h).collect(),
        rows: items.map(|item| pick(item, columns)).collect(),
    }
}

fn payments(snapshot: &Value) -> impl Iterator<Item = &Value> {
    snapshot
        .get("payments")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn pick(item: &Value, columns: &[(&str, &str)]) -> Vec<String> {
    columns.iter().map(|(_, key)| cell(item.get(*key))).collect()
}

fn cell(value: Option<&Value>) -> String {
    value.map(format_scalar).unwrap_or_default()
}
