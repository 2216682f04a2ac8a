//! Scatter plot with optional size and colour encodings.
//!
//! Terminal cells cannot draw circles of different radius, so the size field
//! is split into three equal-width buckets drawn with progressively heavier
//! markers. A colour field assigns each distinct value its own palette entry.

use super::{axis_labels, bounds, fixed_color, PALETTE};
use crate::dashboard::{ColorEncoding, PreparedChart};
use crate::data::ColumnType;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};

const SIZE_MARKERS: [Marker; 3] = [Marker::Braille, Marker::Dot, Marker::Block];

/// Points sharing one colour and one size bucket.
#[derive(Debug, Clone, PartialEq)]
struct Series {
    color: Color,
    bucket: usize,
    points: Vec<(f64, f64)>,
}

pub struct ScatterPlot<'a> {
    chart: &'a PreparedChart,
}

impl<'a> ScatterPlot<'a> {
    pub fn new(chart: &'a PreparedChart) -> Self {
        Self { chart }
    }

    fn series(&self) -> Vec<Series> {
        let directive = &self.chart.directive;
        let result = &self.chart.result;
        let (Some(xi), Some(yi)) = (
            result.column_index(&directive.x),
            result.column_index(&directive.y),
        ) else {
            return Vec::new();
        };
        let size_idx = directive.size.as_deref().and_then(|s| result.column_index(s));
        let color_idx = match &directive.color {
            Some(ColorEncoding::Field(field)) => result.column_index(field),
            _ => None,
        };
        let base = fixed_color(directive.color.as_ref(), Color::Green);

        let size_bounds = size_idx.map(|si| bounds(result.rows.iter().filter_map(|r| r[si].as_f64())));

        let mut categories: Vec<String> = Vec::new();
        let mut series: Vec<Series> = Vec::new();
        for row in &result.rows {
            let (Some(x), Some(y)) = (row[xi].as_f64(), row[yi].as_f64()) else {
                continue;
            };

            let bucket = match (size_idx, size_bounds) {
                (Some(si), Some(b)) => row[si].as_f64().map(|s| size_bucket(s, b)).unwrap_or(0),
                _ => 0,
            };
            let color = match color_idx {
                Some(ci) => {
                    let key = row[ci].to_display_string();
                    let pos = match categories.iter().position(|c| *c == key) {
                        Some(pos) => pos,
                        None => {
                            categories.push(key);
                            categories.len() - 1
                        }
                    };
                    PALETTE[pos % PALETTE.len()]
                }
                None => base,
            };

            match series.iter_mut().find(|s| s.color == color && s.bucket == bucket) {
                Some(s) => s.points.push((x, y)),
                None => series.push(Series {
                    color,
                    bucket,
                    points: vec![(x, y)],
                }),
            }
        }
        series
    }
}

/// Bucket 0, 1 or 2 for a size value within `bounds`.
fn size_bucket(value: f64, bounds: [f64; 2]) -> usize {
    let span = bounds[1] - bounds[0];
    if span <= 0.0 {
        return 0;
    }
    let frac = ((value - bounds[0]) / span).clamp(0.0, 1.0);
    ((frac * 3.0) as usize).min(2)
}

impl Widget for ScatterPlot<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let directive = &self.chart.directive;
        let series = self.series();

        let x_bounds = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));
        let y_bounds = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
        let x_type = self
            .chart
            .result
            .column(&directive.x)
            .map(|c| c.data_type)
            .unwrap_or(ColumnType::Float);

        let datasets: Vec<Dataset> = series
            .iter()
            .map(|s| {
                Dataset::default()
                    .marker(SIZE_MARKERS[s.bucket])
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(s.color))
                    .data(&s.points)
            })
            .collect();

        Chart::new(datasets)
            .legend_position(None)
            .x_axis(
                Axis::default()
                    .title(directive.x.as_str())
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds(x_bounds)
                    .labels(axis_labels(x_bounds, x_type)),
            )
            .y_axis(
                Axis::default()
                    .title(directive.y.as_str())
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds(y_bounds)
                    .labels(axis_labels(y_bounds, ColumnType::Float)),
            )
            .render(area, buf);
    }
}
