use serde_json::Value;
use std::io;

use super::{scalar_fields, sections};

/// Write the most detailed section of a result as CSV to stdout: the
/// schedule for a plan, per-strategy rows for a comparison, categories for a
/// budget. Falls back to `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);
    if let Err(e) = write_result(&mut wtr, result) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_result<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> csv::Result<()> {
    match sections(result).into_iter().next() {
        Some(section) => {
            wtr.write_record(&section.headers)?;
            for row in &section.rows {
                wtr.write_record(row)?;
            }
        }
        None => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in scalar_fields(result) {
                wtr.write_record([key, val])?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}
