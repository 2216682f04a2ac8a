//! Time-series line chart.

use super::{axis_labels, bounds, fixed_color, points};
use crate::dashboard::PreparedChart;
use crate::data::ColumnType;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};

pub struct LineChart<'a> {
    chart: &'a PreparedChart,
}

impl<'a> LineChart<'a> {
    pub fn new(chart: &'a PreparedChart) -> Self {
        Self { chart }
    }
}

impl Widget for LineChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let directive = &self.chart.directive;
        let result = &self.chart.result;
        let data = points(result, &directive.x, &directive.y);

        let x_type = result
            .column(&directive.x)
            .map(|c| c.data_type)
            .unwrap_or(ColumnType::Float);
        let x_bounds = bounds(data.iter().map(|p| p.0));
        let y_bounds = bounds(data.iter().map(|p| p.1));
        let color = fixed_color(directive.color.as_ref(), Color::Cyan);

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&data);

        Chart::new(vec![dataset])
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
