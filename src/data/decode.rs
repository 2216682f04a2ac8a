//! Decoding of query result files.
//!
//! The query service writes results as comma-separated values with a header
//! row. Every cell arrives as text; column types are inferred from the whole
//! column, and empty cells become nulls.

use super::types::{ColumnInfo, ColumnType, ResultSet, Row, Value};
use crate::error::{DashError, Result};
use tracing::debug;

/// Parses a CSV result file into a result set.
pub fn parse_csv(bytes: &[u8]) -> Result<ResultSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| DashError::fetch(format!("Invalid result header: {e}")))?
        .clone();

    if headers.is_empty() {
        return Err(DashError::fetch("Result file has no header row"));
    }

    let mut cells: Vec<Vec<String>> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| DashError::fetch(format!("Invalid result row {}: {e}", line + 1)))?;
        cells.push(record.iter().map(str::to_string).collect());
    }

    let columns: Vec<ColumnInfo> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let data_type = infer_type(cells.iter().map(|row| row[idx].as_str()));
            ColumnInfo::new(name, data_type)
        })
        .collect();

    let rows: Vec<Row> = cells
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&columns)
                .map(|(cell, col)| convert_cell(cell, col.data_type))
                .collect()
        })
        .collect();

    debug!(
        columns = columns.len(),
        rows = rows.len(),
        "Decoded result file"
    );

    Ok(ResultSet::with_data(columns, rows))
}

/// Picks the narrowest type every non-empty cell of a column fits.
fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut present = cells.filter(|c| !c.is_empty()).peekable();
    if present.peek().is_none() {
        return ColumnType::Text;
    }

    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    for cell in present {
        all_int &= cell.parse::<i64>().is_ok();
        all_float &= cell.parse::<f64>().is_ok();
        all_bool &= parse_bool(cell).is_some();
        if !(all_int || all_float || all_bool) {
            break;
        }
    }

    if all_int {
        ColumnType::Int
    } else if all_float {
        ColumnType::Float
    } else if all_bool {
        ColumnType::Bool
    } else {
        ColumnType::Text
    }
}

fn convert_cell(cell: String, data_type: ColumnType) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    // Inference guarantees the parses below succeed for non-empty cells.
    match data_type {
        ColumnType::Int => cell.parse().map(Value::Int).unwrap_or(Value::String(cell)),
        ColumnType::Float => cell
            .parse()
            .map(Value::Float)
            .unwrap_or(Value::String(cell)),
        ColumnType::Bool => parse_bool(&cell).map(Value::Bool).unwrap_or(Value::String(cell)),
        _ => Value::String(cell),
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
