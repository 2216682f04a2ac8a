//! Tabular display of a result.
//!
//! The directive's x and y columns lead; every other column follows in
//! result order. Columns are sized to their content and scaled down when the
//! table is wider than the panel.

use crate::dashboard::PreparedChart;
use crate::data::Value;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const MAX_COLUMN_WIDTH: usize = 40;
const MIN_COLUMN_WIDTH: usize = 4;

pub struct ResultTable<'a> {
    chart: &'a PreparedChart,
    /// Result column indices in display order.
    order: Vec<usize>,
}

impl<'a> ResultTable<'a> {
    pub fn new(chart: &'a PreparedChart) -> Self {
        let order = column_order(chart);
        Self { chart, order }
    }

    fn calculate_column_widths(&self) -> Vec<usize> {
        let result = &self.chart.result;
        self.order
            .iter()
            .map(|&i| {
                let header = result.columns[i].name.chars().count();
                let widest = result
                    .rows
                    .iter()
                    .map(|row| row[i].to_display_string().chars().count())
                    .max()
                    .unwrap_or(0);
                header.max(widest).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let head: String = s.chars().take(max_width - 3).collect();
            format!("{head}...")
        }
    }

    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'static>> {
        let result = &self.chart.result;
        if self.order.is_empty() {
            return vec![Line::from(Span::styled(
                "(no columns)",
                Style::default().fg(Color::DarkGray),
            ))];
        }

        let widths = self.calculate_column_widths();
        let total: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale = if total > available_width && available_width > 0 {
            available_width as f64 / total as f64
        } else {
            1.0
        };
        let widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        let mut lines = Vec::with_capacity(result.row_count() + 5);
        lines.push(border(&widths, '┌', '┬', '┐'));
        lines.push(self.header_row(&widths));
        lines.push(border(&widths, '├', '┼', '┤'));
        for row in &result.rows {
            lines.push(self.data_row(row, &widths));
        }
        lines.push(border(&widths, '└', '┴', '┘'));

        let count = result.row_count();
        lines.push(Line::from(Span::styled(
            format!("{} row{}", count, if count == 1 { "" } else { "s" }),
            Style::default().fg(Color::DarkGray),
        )));
        lines
    }

    fn header_row(&self, widths: &[usize]) -> Line<'static> {
        let columns = &self.chart.result.columns;
        let cells = self.order.iter().zip(widths).map(|(&i, &width)| {
            let name = Self::truncate(&columns[i].name, width);
            Span::styled(
                format!(" {name:width$} "),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        });
        framed(cells)
    }

    fn data_row(&self, row: &[Value], widths: &[usize]) -> Line<'static> {
        let cells = self.order.iter().zip(widths).map(|(&i, &width)| {
            let value = &row[i];
            let text = Self::truncate(&value.to_display_string(), width);
            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };
            Span::styled(format!(" {text:width$} "), style)
        });
        framed(cells)
    }
}

/// x, then y, then the rest in result order. Missing names are ignored.
fn column_order(chart: &PreparedChart) -> Vec<usize> {
    let result = &chart.result;
    let mut order: Vec<usize> = [&chart.directive.x, &chart.directive.y]
        .into_iter()
        .filter_map(|name| result.column_index(name))
        .collect();
    order.dedup();
    for i in 0..result.columns.len() {
        if !order.contains(&i) {
            order.push(i);
        }
    }
    order
}

fn framed(cells: impl Iterator<Item = Span<'static>>) -> Line<'static> {
    let sep = || Span::styled("│", Style::default().fg(Color::DarkGray));
    let mut spans = vec![sep()];
    for cell in cells {
        spans.push(cell);
        spans.push(sep());
    }
    Line::from(spans)
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> Line<'static> {
    let inner: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
    let text = format!("{left}{}{right}", inner.join(&mid.to_string()));
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines(area.width as usize);
        for (i, line) in lines.iter().take(area.height as usize).enumerate() {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}
