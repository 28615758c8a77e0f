//! JSON I/O handling for CLI
//!
//! - Input: single JSON object via stdin
//! - Output: single JSON object per line via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};
use crate::validation::{FieldErrors, FormValues};

/// Read one JSON object of form values from stdin
pub fn read_form() -> CliResult<FormValues> {
    read_form_from(io::stdin().lock())
}

/// Strings are taken as-is, numbers and booleans as their JSON text,
/// null as the empty string.
pub fn read_form_from<R: Read>(mut reader: R) -> CliResult<FormValues> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let object = match serde_json::from_str::<Value>(&input)? {
        Value::Object(map) => map,
        other => {
            return Err(CliError::io_error(format!(
                "Expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut pairs = Vec::with_capacity(object.len());
    for (name, value) in object {
        let text = match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            Value::Bool(_) | Value::Number(_) => value.to_string(),
            other => {
                return Err(CliError::io_error(format!(
                    "Field '{}' must be a scalar, got {}",
                    name,
                    json_kind(&other)
                )))
            }
        };
        pairs.push((name, text));
    }

    Ok(FormValues::from_pairs(pairs))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    write_json_to(
        &mut io::stdout().lock(),
        &serde_json::json!({ "status": "ok", "data": data }),
    )
}

/// Write the rejected fields of a submission to stdout
pub fn write_invalid(errors: &FieldErrors) -> CliResult<()> {
    write_json_to(
        &mut io::stdout().lock(),
        &serde_json::json!({ "status": "invalid", "errors": errors }),
    )
}

/// Write an error response to stdout
pub fn write_error(error: &CliError) -> CliResult<()> {
    write_json_to(
        &mut io::stdout().lock(),
        &serde_json::json!({
            "status": "error",
            "code": error.code_str(),
            "message": error.message()
        }),
    )
}

pub fn write_json_to<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
