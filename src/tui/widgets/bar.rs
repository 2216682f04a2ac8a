//! Horizontal bar chart for categorical results.
//!
//! Bars keep the row order of the result, so `ORDER BY` in the query decides
//! the ranking. Bar lengths are the y value rounded to a whole number and
//! floored at zero; the printed value is the compact form of the exact value.

use super::{compact_number, fixed_color};
use crate::dashboard::PreparedChart;
use ratatui::{
    buffer::Buffer,
    layout::{Direction, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Widget},
};

pub struct CategoryBars<'a> {
    chart: &'a PreparedChart,
}

impl<'a> CategoryBars<'a> {
    pub fn new(chart: &'a PreparedChart) -> Self {
        Self { chart }
    }

    /// (label, value) pairs in row order. Rows with a non-numeric y are dropped.
    fn entries(&self) -> Vec<(String, f64)> {
        let directive = &self.chart.directive;
        let result = &self.chart.result;
        let (Some(xi), Some(yi)) = (
            result.column_index(&directive.x),
            result.column_index(&directive.y),
        ) else {
            return Vec::new();
        };
        result
            .rows
            .iter()
            .filter_map(|row| Some((row[xi].to_display_string(), row[yi].as_f64()?)))
            .collect()
    }
}

fn bar_length(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

impl Widget for CategoryBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = fixed_color(self.chart.directive.color.as_ref(), Color::LightBlue);
        let entries = self.entries();

        let bars: Vec<Bar> = entries
            .into_iter()
            .map(|(label, value)| {
                Bar::default()
                    .label(Line::from(label))
                    .value(bar_length(value))
                    .text_value(compact_number(value))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();

        BarChart::default()
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }
}
