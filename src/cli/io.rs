//! JSON I/O handling for CLI
//!
//! - Input: a mapping source (JSON) or a raw document source via stdin
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read all of stdin as raw bytes, unchanged
pub fn read_stdin_bytes() -> CliResult<Vec<u8>> {
    let mut buf = Vec::new();
    io::stdin().lock().read_to_end(&mut buf)?;
    Ok(buf)
}

/// Read one JSON value (possibly spanning lines) from stdin
pub fn read_json() -> CliResult<Value> {
    let bytes = read_stdin_bytes()?;
    parse_json(&bytes)
}

fn parse_json(bytes: &[u8]) -> CliResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
