//! Bordered box around one slot's output.

use super::{bar::CategoryBars, line::LineChart, scatter::ScatterPlot, table::ResultTable};
use crate::dashboard::ChartKind;
use crate::tui::app::{Panel, PanelBody};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct PanelWidget<'a> {
    panel: &'a Panel,
}

impl<'a> PanelWidget<'a> {
    pub fn new(panel: &'a Panel) -> Self {
        Self { panel }
    }
}

impl Widget for PanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let failed = matches!(self.panel.body, PanelBody::Error(_));
        let border_color = if failed { Color::Red } else { Color::DarkGray };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(" {} ", self.panel.title),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        match &self.panel.body {
            PanelBody::Chart(chart) => match chart.directive.kind {
                ChartKind::Line => LineChart::new(chart).render(inner, buf),
                ChartKind::Bar => CategoryBars::new(chart).render(inner, buf),
                ChartKind::Scatter => ScatterPlot::new(chart).render(inner, buf),
                ChartKind::Table => ResultTable::new(chart).render(inner, buf),
            },
            PanelBody::Error(error) => {
                let text = vec![
                    Line::from(Span::styled(
                        error.category(),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        error.to_string(),
                        Style::default().fg(Color::Red),
                    )),
                ];
                Paragraph::new(text)
                    .wrap(Wrap { trim: true })
                    .render(inner, buf);
            }
        }
    }
}
