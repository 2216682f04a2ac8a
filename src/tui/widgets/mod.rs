//! Dashboard widgets.
//!
//! One widget per chart kind, plus the panel frame and header bar. The
//! helpers below turn result columns into plot coordinates and labels.

pub mod bar;
pub mod header;
pub mod line;
pub mod panel;
pub mod scatter;
pub mod table;

use crate::dashboard::ColorEncoding;
use crate::data::{ColumnType, ResultSet};
use chrono::{DateTime, NaiveDate};
use ratatui::style::Color;
use ratatui::text::Span;
use std::str::FromStr;

/// Colours assigned to distinct values of a colour field, in order of first appearance.
pub const PALETTE: &[Color] = &[
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
    Color::White,
];

/// Resolves a fixed colour, falling back to `default` for field encodings,
/// absent colours, or hex strings that do not parse.
pub fn fixed_color(color: Option<&ColorEncoding>, default: Color) -> Color {
    match color {
        Some(ColorEncoding::Fixed(hex)) => Color::from_str(hex).unwrap_or(default),
        _ => default,
    }
}

/// (x, y) pairs for rows where both columns have a numeric reading.
pub fn points(result: &ResultSet, x: &str, y: &str) -> Vec<(f64, f64)> {
    let (Some(xi), Some(yi)) = (result.column_index(x), result.column_index(y)) else {
        return Vec::new();
    };
    result
        .rows
        .iter()
        .filter_map(|row| Some((row[xi].as_f64()?, row[yi].as_f64()?)))
        .collect()
}

/// Axis bounds covering every value. A single value is widened so the axis
/// has some extent.
pub fn bounds(values: impl IntoIterator<Item = f64>) -> [f64; 2] {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if lo == hi {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return [lo - pad, hi + pad];
    }
    [lo, hi]
}

/// Three labels (low, middle, high) for an axis over `bounds`.
pub fn axis_labels(bounds: [f64; 2], data_type: ColumnType) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::raw(axis_label(v, data_type)))
        .collect()
}

fn axis_label(value: f64, data_type: ColumnType) -> String {
    match data_type {
        ColumnType::Date => NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        ColumnType::Timestamp => DateTime::from_timestamp(value.round() as i64, 0)
            .map(|t| t.naive_utc().format("%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        _ => compact_number(value),
    }
}

/// Short human form of a number: `950`, `12.3K`, `4.5M`, `1.2B`.
pub fn compact_number(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };

    if suffix.is_empty() && scaled.fract() == 0.0 {
        format!("{scaled:.0}")
    } else if suffix.is_empty() {
        format!("{scaled:.2}")
    } else {
        format!("{scaled:.1}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColumnInfo, Value};

    #[test]
    fn test_compact_number() {
        assert_eq!(compact_number(950.0), "950");
        assert_eq!(compact_number(12.5), "12.50");
        assert_eq!(compact_number(12_345.0), "12.3K");
        assert_eq!(compact_number(4_500_000.0), "4.5M");
        assert_eq!(compact_number(-2_000.0), "-2.0K");
        assert_eq!(compact_number(1.2e9), "1.2B");
    }

    #[test]
    fn test_bounds() {
        assert_eq!(bounds([3.0, 1.0, 2.0]), [1.0, 3.0]);
        assert_eq!(bounds([10.0]), [9.0, 11.0]);
        assert_eq!(bounds([0.0]), [-1.0, 1.0]);
        assert_eq!(bounds([]), [0.0, 1.0]);
    }

    #[test]
    fn test_points_skip_nulls() {
        let result = ResultSet::with_data(
            vec![
                ColumnInfo::new("orders", ColumnType::Int),
                ColumnInfo::new("total_spend", ColumnType::Float),
            ],
            vec![
                vec![Value::Int(3), Value::Float(120.0)],
                vec![Value::Int(0), Value::Null],
            ],
        );
        assert_eq!(points(&result, "orders", "total_spend"), vec![(3.0, 120.0)]);
        assert!(points(&result, "orders", "missing").is_empty());
    }

    #[test]
    fn test_date_axis_labels() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let v = Value::Date(day).as_f64().unwrap();
        let labels = axis_labels([v, v + 2.0], ColumnType::Date);
        assert_eq!(labels[0].content, "2024-01-01");
        assert_eq!(labels[1].content, "2024-01-02");
        assert_eq!(labels[2].content, "2024-01-03");
    }

    #[test]
    fn test_fixed_color() {
        let red = ColorEncoding::Fixed("#FF4B4B".to_string());
        assert_eq!(fixed_color(Some(&red), Color::Cyan), Color::Rgb(0xFF, 0x4B, 0x4B));

        let bad = ColorEncoding::Fixed("not-a-colour".to_string());
        assert_eq!(fixed_color(Some(&bad), Color::Cyan), Color::Cyan);

        let field = ColorEncoding::Field("tier".to_string());
        assert_eq!(fixed_color(Some(&field), Color::Cyan), Color::Cyan);
    }
}
