//! Column-level normalization applied before a result is charted.

use super::types::{ColumnType, ResultSet, Value};
use crate::error::{DashError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A coercion of one column to the type its chart needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "column", rename_all = "lowercase")]
pub enum Coercion {
    /// Parse a date-like text column into dates (or timestamps).
    Temporal(String),
    /// Render a column as discrete text categories, so numeric ids are not
    /// drawn on a continuous scale.
    Categorical(String),
}

impl Coercion {
    pub fn temporal(column: impl Into<String>) -> Self {
        Self::Temporal(column.into())
    }

    pub fn categorical(column: impl Into<String>) -> Self {
        Self::Categorical(column.into())
    }

    /// The column this coercion rewrites.
    pub fn column(&self) -> &str {
        match self {
            Self::Temporal(c) | Self::Categorical(c) => c,
        }
    }

    /// Applies the coercion in place.
    pub fn apply(&self, result: &mut ResultSet) -> Result<()> {
        match self {
            Self::Temporal(c) => to_temporal(result, c),
            Self::Categorical(c) => to_categorical(result, c),
        }
    }
}

/// Converts a column to dates, or to timestamps if any cell carries a time.
pub fn to_temporal(result: &mut ResultSet, column: &str) -> Result<()> {
    let idx = find_column(result, column)?;

    let mut any_time = false;
    let mut parsed = Vec::with_capacity(result.rows.len());
    for row in &result.rows {
        let value = parse_temporal(&row[idx]).ok_or_else(|| {
            DashError::render(format!(
                "Cannot parse '{}' in column '{column}' as a date",
                row[idx]
            ))
        })?;
        any_time |= matches!(value, Value::Timestamp(_));
        parsed.push(value);
    }

    for (row, value) in result.rows.iter_mut().zip(parsed) {
        row[idx] = match value {
            Value::Date(d) if any_time => Value::Timestamp(d.and_time(chrono::NaiveTime::MIN)),
            other => other,
        };
    }

    result.columns[idx].data_type = if any_time {
        ColumnType::Timestamp
    } else {
        ColumnType::Date
    };
    Ok(())
}

/// Converts a column to text categories. Nulls stay null.
pub fn to_categorical(result: &mut ResultSet, column: &str) -> Result<()> {
    let idx = find_column(result, column)?;

    for row in &mut result.rows {
        if !row[idx].is_null() {
            row[idx] = Value::String(row[idx].to_display_string());
        }
    }
    result.columns[idx].data_type = ColumnType::Text;
    Ok(())
}

fn find_column(result: &ResultSet, column: &str) -> Result<usize> {
    result
        .column_index(column)
        .ok_or_else(|| DashError::render(format!("Column '{column}' not found in result")))
}

fn parse_temporal(value: &Value) -> Option<Value> {
    match value {
        Value::Null | Value::Date(_) | Value::Timestamp(_) => Some(value.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(Value::Date(d));
            }
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(Value::Timestamp)
        }
        _ => None,
    }
}
