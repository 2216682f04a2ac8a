//! Headless mode.
//!
//! Runs one render pass without a terminal, draws every section into an
//! in-memory backend, and prints the screens as text or JSON. Useful for
//! scripting and for checking a deployment without an interactive session.

mod output;

pub use output::{HeadlessOutput, OutputFormat, ScreenRenderer};

use crate::dashboard::{DashboardRenderer, PassSummary};
use crate::error::{DashError, Result};
use crate::tui::app::{App, DashboardView};
use crate::tui::ui;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Settings for a headless run.
#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    pub format: OutputFormat,
    /// Path to write output (None = stdout).
    pub output_file: Option<PathBuf>,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
            format: OutputFormat::Text,
            output_file: None,
        }
    }
}

/// One section drawn as text.
#[derive(Debug, Clone, Serialize)]
pub struct SectionScreen {
    pub name: String,
    pub screen: String,
}

/// Everything a headless run produced.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    pub catalog: String,
    pub summary: PassSummary,
    pub sections: Vec<SectionScreen>,
    pub duration_ms: u64,
}

/// Draws every section of the app's current view at the given size.
pub fn render_sections(app: &mut App, width: u16, height: u16) -> Result<Vec<SectionScreen>> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| DashError::internal(format!("Failed to create test terminal: {e}")))?;

    let mut screens = Vec::with_capacity(app.tabs.len());
    for idx in 0..app.tabs.len() {
        app.selected = idx;
        terminal
            .draw(|frame| ui::render(frame, &*app))
            .map_err(|e| DashError::internal(format!("Failed to draw: {e}")))?;
        screens.push(SectionScreen {
            name: app.tabs[idx].clone(),
            screen: ScreenRenderer::render(terminal.backend().buffer()),
        });
    }
    app.selected = 0;
    Ok(screens)
}

/// Runs one pass and draws it.
pub async fn report(
    renderer: &DashboardRenderer<'_>,
    title: &str,
    options: &HeadlessOptions,
) -> Result<HeadlessReport> {
    let start = Instant::now();
    let mut app = App::new(
        title,
        renderer.catalog(),
        renderer.settings().display_string(),
    );

    app.begin_refresh();
    let mut view = DashboardView::new();
    let summary = renderer.render_pass(&mut view).await;
    app.finish_refresh(view, summary);

    let sections = render_sections(&mut app, options.width, options.height)?;
    Ok(HeadlessReport {
        catalog: renderer.catalog().name.clone(),
        summary,
        sections,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Runs one pass and writes the formatted screens to stdout or a file.
pub async fn run(
    renderer: &DashboardRenderer<'_>,
    title: &str,
    options: &HeadlessOptions,
) -> Result<PassSummary> {
    let report = report(renderer, title, options).await?;
    let formatted = HeadlessOutput::new(options.format).format(&report);

    match &options.output_file {
        Some(path) => {
            std::fs::write(path, &formatted).map_err(|e| {
                DashError::internal(format!("Failed to write {}: {e}", path.display()))
            })?;
            info!(path = %path.display(), "Headless output written");
        }
        None => print!("{formatted}"),
    }
    Ok(report.summary)
}
