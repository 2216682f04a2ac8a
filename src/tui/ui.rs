//! Screen layout: header, section tabs, panel grid, footer.

use super::app::{App, SectionView};
use super::widgets::{header::Header, panel::PanelWidget};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs, Widget},
    Frame,
};

const HELP: &str = " ←/→ section  r refresh  q quit";

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    draw(app, area, frame.buffer_mut());
}

/// Draws the whole screen into a buffer.
pub fn draw(app: &App, area: Rect, buf: &mut Buffer) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Subtitle
            Constraint::Length(1), // Tabs
            Constraint::Min(3),    // Panels
            Constraint::Length(1), // Footer
        ])
        .split(area);

    Header::new(&app.title, &app.service_info, app.loading).render(layout[0], buf);

    Paragraph::new(Span::styled(
        format!(" {}", app.subtitle),
        Style::default().fg(Color::Gray),
    ))
    .render(layout[1], buf);

    Tabs::new(app.tabs.iter().map(|t| Line::from(t.as_str())))
        .select(app.selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|")
        .render(layout[2], buf);

    match app.current_section() {
        Some(section) => draw_section(section, layout[3], buf),
        None => placeholder(app, layout[3], buf),
    }

    draw_footer(app, layout[4], buf);
}

fn draw_section(section: &SectionView, area: Rect, buf: &mut Buffer) {
    let rows: Vec<_> = section.visible_rows().collect();
    if rows.is_empty() {
        Paragraph::new("No data for this section.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .render(area, buf);
        return;
    }

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows.len() as u32); rows.len()])
        .split(area);

    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let columns = row.columns.max(row.panels.len()) as u32;
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns); columns as usize])
            .split(*row_area);
        for (panel, cell) in row.panels.iter().zip(cells.iter()) {
            PanelWidget::new(panel).render(*cell, buf);
        }
    }
}

fn placeholder(app: &App, area: Rect, buf: &mut Buffer) {
    let text = if app.loading || app.summary.is_none() {
        "Running queries..."
    } else {
        "No data for this section."
    };
    Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn draw_footer(app: &App, area: Rect, buf: &mut Buffer) {
    let status = match (&app.summary, &app.refreshed_at) {
        (Some(s), Some(at)) => format!(
            "{} charts, {} empty, {} failed | refreshed {} ",
            s.rendered, s.skipped, s.failed, at
        ),
        (Some(s), None) => format!(
            "{} charts, {} empty, {} failed ",
            s.rendered, s.skipped, s.failed
        ),
        _ => String::new(),
    };

    Paragraph::new(Span::styled(HELP, Style::default().fg(Color::DarkGray))).render(area, buf);
    Paragraph::new(Span::styled(status, Style::default().fg(Color::Gray)))
        .alignment(Alignment::Right)
        .render(area, buf);
}
