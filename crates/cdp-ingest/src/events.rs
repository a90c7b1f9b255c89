//! Event feed flattening.
//!
//! The police event feed is a JSON array of nested objects such as
//! `{"id": 1, "location": {"name": "Solna", "gps": "59.36,18.0"}}`. Nested
//! keys are joined with a separator (`location_gps`) and every scalar is kept
//! as text; typing happens later during inference.

use std::collections::HashMap;

use polars::prelude::*;
use serde_json::{Map, Value};

use crate::error::{IngestError, Result};

/// Flattens a JSON array of objects into a text frame.
///
/// Columns appear in first-seen order across all records. Keys missing from a
/// record and JSON `null` both become null cells; arrays are kept as their
/// JSON text.
pub fn flatten_records(json: &str, sep: &str) -> Result<DataFrame> {
    let value: Value = serde_json::from_str(json).map_err(|source| IngestError::Json {
        context: "event feed",
        source,
    })?;
    let Value::Array(records) = value else {
        return Err(IngestError::EventShape {
            found: json_kind(&value).to_string(),
        });
    };

    let mut names: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<Vec<Option<String>>> = Vec::new();

    for (row, record) in records.iter().enumerate() {
        let Value::Object(object) = record else {
            return Err(IngestError::EventShape {
                found: format!("{} at index {row}", json_kind(record)),
            });
        };
        let mut cells = Vec::new();
        flatten_object(object, None, sep, &mut cells);
        for (name, cell) in cells {
            let idx = match positions.get(&name) {
                Some(&idx) => idx,
                None => {
                    let idx = names.len();
                    positions.insert(name.clone(), idx);
                    names.push(name);
                    columns.push(vec![None; row]);
                    idx
                }
            };
            let column = &mut columns[idx];
            if column.len() > row {
                // a nested key collided with a flat one; the later wins
                column[row] = cell;
            } else {
                column.push(cell);
            }
        }
        for column in &mut columns {
            column.resize(row + 1, None);
        }
    }

    let columns: Vec<Column> = names
        .iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name.as_str().into(), values).into_column())
        .collect();
    let df = DataFrame::new(columns)?;
    tracing::debug!(rows = df.height(), columns = df.width(), "flattened event feed");
    Ok(df)
}

fn flatten_object(
    object: &Map<String, Value>,
    prefix: Option<&str>,
    sep: &str,
    out: &mut Vec<(String, Option<String>)>,
) {
    for (key, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{prefix}{sep}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_object(nested, Some(&name), sep, out),
            Value::Null => out.push((name, None)),
            Value::String(s) => out.push((name, Some(s.clone()))),
            Value::Number(n) => out.push((name, Some(n.to_string()))),
            Value::Bool(b) => out.push((name, Some(b.to_string()))),
            Value::Array(_) => out.push((name, Some(value.to_string()))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
