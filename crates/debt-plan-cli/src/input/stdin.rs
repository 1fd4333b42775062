use serde_json::Value;
use std::io::{self, Read};

/// Read a piped JSON or YAML document from stdin.
///
/// Returns None when stdin is a TTY (interactive) or nothing was piped.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document(text: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // JSON documents open with a brace or bracket; anything else is YAML
    let value: Value = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| format!("Failed to parse stdin as JSON: {e}"))?
    } else {
        serde_yaml::from_str(trimmed).map_err(|e| format!("Failed to parse stdin as YAML: {e}"))?
    };
    Ok(Some(value))
}
