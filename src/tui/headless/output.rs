//! Output formatting for headless mode.

use super::HeadlessReport;
use crate::error::DashError;
use ratatui::buffer::Buffer;
use std::str::FromStr;

/// Output format for headless mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Every section's screen as plain text, followed by a summary line.
    #[default]
    Text,
    /// The report as pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(DashError::config(format!(
                "Invalid output format '{other}'. Expected: text, json"
            ))),
        }
    }
}

/// Renders a ratatui buffer to a string.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// Plain text of the buffer with trailing spaces and blank trailing lines removed.
    pub fn render(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut lines: Vec<String> = (0..area.height)
            .map(|y| {
                let line: String = (0..area.width)
                    .map(|x| buffer.cell((x, y)).map_or(" ", |c| c.symbol()))
                    .collect();
                line.trim_end_matches(' ').to_string()
            })
            .collect();

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        format!("{}\n", lines.join("\n"))
    }
}

/// Formats a headless report.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &HeadlessReport) -> String {
        match self.format {
            OutputFormat::Text => Self::format_text(report),
            OutputFormat::Json => Self::format_json(report),
        }
    }

    fn format_text(report: &HeadlessReport) -> String {
        let mut out = String::new();
        for section in &report.sections {
            out.push_str(&format!("=== {} ===\n{}\n", section.name, section.screen));
        }
        out.push_str(&format!(
            "Catalog '{}': {} rendered, {} empty, {} failed in {}ms\n",
            report.catalog,
            report.summary.rendered,
            report.summary.skipped,
            report.summary.failed,
            report.duration_ms
        ));
        out
    }

    fn format_json(report: &HeadlessReport) -> String {
        serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {}\"}}", e))
    }
}
