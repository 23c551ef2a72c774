use serde::Serialize;

use crate::error::Result;

/// Render any report as pretty JSON.
pub fn render<T: Serialize>(report: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
