//! Cell extraction and formatting for table rows

use super::registry::CellFormat;
use crate::model::parse_timestamp;
use chrono::{Local, NaiveDate};
use serde_json::Value;

/// Extract a value from JSON using a dot-notation path
///
/// Numeric segments index into arrays. Arrays of records render as their
/// joined names, arrays of scalars as their joined values.
pub fn extract_json_value(item: &Value, path: &str) -> String {
    let current = match lookup(item, path) {
        Some(v) => v,
        None => return "-".to_string(),
    };

    match current {
        Value::String(s) if s.is_empty() => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) if arr.is_empty() => "-".to_string(),
        Value::Array(arr) => {
            let parts: Option<Vec<String>> = arr
                .iter()
                .map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Object(o) => o.get("name").and_then(Value::as_str).map(str::to_string),
                    _ => None,
                })
                .collect();
            parts
                .map(|p| p.join(", "))
                .unwrap_or_else(|| format!("[{} items]", arr.len()))
        },
        Value::Object(o) => o
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| "[object]".to_string()),
    }
}

/// Resolve a dot path without rendering
pub fn lookup<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = item;
    for part in path.split('.') {
        current = match part.parse::<usize>() {
            Ok(idx) => current.get(idx)?,
            Err(_) => current.get(part)?,
        };
    }
    Some(current)
}

/// Ids referenced by a relation value: `5`, `[1, 2]`, `{id}` or `[{id}, ...]`
pub fn collect_ids(value: &Value) -> Vec<i64> {
    match value {
        Value::Number(n) => n.as_i64().into_iter().collect(),
        Value::Object(o) => o.get("id").and_then(Value::as_i64).into_iter().collect(),
        Value::Array(items) => items.iter().flat_map(collect_ids).collect(),
        _ => Vec::new(),
    }
}

/// Render a raw cell according to its column format
pub fn format_cell(raw: &str, format: Option<CellFormat>) -> String {
    match format {
        Some(CellFormat::Date) => format_date(raw),
        Some(CellFormat::DateTime) => format_date_time(raw),
        None => raw.to_string(),
    }
}

/// `dd/mm/yyyy`, or the input unchanged when it is not a date
pub fn format_date(raw: &str) -> String {
    let head: String = raw.chars().take(10).collect();
    NaiveDate::parse_from_str(&head, "%Y-%m-%d")
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// `dd/mm/yyyy HH:MM` in local time, or the input unchanged
pub fn format_date_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}
