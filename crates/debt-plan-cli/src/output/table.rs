use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_scalar, scalar_fields, sections, Section};

/// Render a command result as tables: headline fields, then each section.
pub fn print_table(value: &Value) {
    let Some(result) = value.get("result") else {
        print_fields(&scalar_fields(value));
        return;
    };

    print_fields(&scalar_fields(result));
    for section in sections(result) {
        print_section(&section);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", format_scalar(w));
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(fields: &[(String, String)]) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.as_str(), val.as_str()]);
    }
    println!("{}", Table::from(builder));
}

fn print_section(section: &Section) {
    println!("\n{}:", section.title);
    if section.rows.is_empty() {
        println!("(empty)");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(section.headers.iter().copied());
    for row in &section.rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    println!("{}", Table::from(builder));
}
