//! Header bar: dashboard title on the left, query service on the right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

pub struct Header<'a> {
    title: &'a str,
    service_info: &'a str,
    loading: bool,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, service_info: &'a str, loading: bool) -> Self {
        Self {
            title,
            service_info,
            loading,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left = Span::styled(format!(" {}", self.title), style);
        buf.set_span(area.x, area.y, &left, area.width);

        if self.loading {
            let text = "Running queries...";
            let width = text.len() as u16;
            let x = area.x + area.width.saturating_sub(width) / 2;
            buf.set_string(x, area.y, text, style.fg(Color::Yellow));
        }

        let right = format!(" [athena: {}] ", self.service_info);
        let right_width = right.chars().count() as u16;
        if right_width < area.width {
            buf.set_string(area.right() - right_width, area.y, &right, style);
        }
    }
}
