//! # Output
//!
//! Writes generated values to stdout or to a file. Files ending in
//! `.yaml` / `.yml` are written as YAML, everything else as pretty JSON.

use crate::error::{CliError, CliResult};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

/// Renders a value for the given destination.
pub fn render(value: &Value, destination: Option<&Path>) -> CliResult<String> {
    let ext = destination
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .unwrap_or("json");
    match ext {
        "yaml" | "yml" => serde_yaml::to_string(value)
            .map_err(|e| CliError::General(format!("YAML serialization failed: {}", e))),
        _ => serde_json::to_string_pretty(value)
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e))),
    }
}

/// Writes a value to `destination`, or prints it when absent.
pub fn emit(value: &Value, destination: Option<&Path>) -> CliResult<()> {
    let text = render(value, destination)?;

    let Some(path) = destination else {
        println!("{}", text);
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    info!(path = ?path, "output written");
    Ok(())
}
