//! Application state for the TUI.
//!
//! Holds the outcome of the latest render pass and which section is on
//! screen. [`DashboardView`] is the rendering surface a pass writes into.

use super::events::Event;
use crate::dashboard::{Catalog, PassSummary, PreparedChart, RenderSurface, Section};
use crate::error::DashError;
use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

/// What a slot shows after a pass.
#[derive(Debug, Clone)]
pub enum PanelBody {
    Chart(PreparedChart),
    Error(DashError),
}

/// A titled box in the dashboard grid.
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub body: PanelBody,
}

/// One row of panels. `columns` is the declared width of the row, which may
/// exceed the number of panels when slots were skipped.
#[derive(Debug, Clone, Default)]
pub struct RowView {
    pub columns: usize,
    pub panels: Vec<Panel>,
}

/// Everything one section produced.
#[derive(Debug, Clone, Default)]
pub struct SectionView {
    pub name: String,
    pub rows: Vec<RowView>,
}

impl SectionView {
    /// Rows with at least one panel.
    pub fn visible_rows(&self) -> impl Iterator<Item = &RowView> {
        self.rows.iter().filter(|r| !r.panels.is_empty())
    }
}

/// Rendering surface that collects a pass into section views.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub sections: Vec<SectionView>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total panels across all sections.
    pub fn panel_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.rows)
            .map(|r| r.panels.len())
            .sum()
    }

    fn push_panel(&mut self, title: &str, body: PanelBody) {
        if self.sections.is_empty() {
            self.sections.push(SectionView::default());
        }
        let Some(section) = self.sections.last_mut() else {
            return;
        };
        if section.rows.is_empty() {
            section.rows.push(RowView {
                columns: 1,
                panels: Vec::new(),
            });
        }
        if let Some(row) = section.rows.last_mut() {
            row.panels.push(Panel {
                title: title.to_string(),
                body,
            });
        }
    }
}

impl RenderSurface for DashboardView {
    fn begin_section(&mut self, section: &Section) {
        self.sections.push(SectionView {
            name: section.name.clone(),
            rows: Vec::new(),
        });
    }

    fn begin_row(&mut self, columns: usize) {
        if self.sections.is_empty() {
            self.sections.push(SectionView::default());
        }
        if let Some(section) = self.sections.last_mut() {
            section.rows.push(RowView {
                columns: columns.max(1),
                panels: Vec::new(),
            });
        }
    }

    fn chart(&mut self, title: &str, chart: PreparedChart) {
        self.push_panel(title, PanelBody::Chart(chart));
    }

    fn error(&mut self, title: &str, error: &DashError) {
        self.push_panel(title, PanelBody::Error(error.clone()));
    }
}

/// Main application state.
pub struct App {
    /// Page title shown in the header.
    pub title: String,
    /// Line under the title.
    pub subtitle: String,
    /// Query service summary for the header (database @ region).
    pub service_info: String,
    /// Section names, known before any query runs.
    pub tabs: Vec<String>,
    /// Index of the section on screen.
    pub selected: usize,
    /// Output of the latest pass.
    pub view: DashboardView,
    /// Counts from the latest pass.
    pub summary: Option<PassSummary>,
    /// Wall-clock time the latest pass finished, for the footer.
    pub refreshed_at: Option<String>,
    /// True while a pass is in progress.
    pub loading: bool,
    /// Set by the refresh key; the runner starts a new pass when it sees it.
    pub refresh_requested: bool,
    /// Whether the application should keep running.
    pub running: bool,
}

impl App {
    /// Creates a new application state for a catalog.
    pub fn new(title: impl Into<String>, catalog: &Catalog, service_info: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: catalog.subtitle.clone(),
            service_info: service_info.into(),
            tabs: catalog.sections.iter().map(|s| s.name.clone()).collect(),
            selected: 0,
            view: DashboardView::new(),
            summary: None,
            refreshed_at: None,
            loading: false,
            refresh_requested: true,
            running: true,
        }
    }

    /// Marks a pass as started.
    pub fn begin_refresh(&mut self) {
        self.refresh_requested = false;
        self.loading = true;
    }

    /// Installs the output of a finished pass.
    pub fn finish_refresh(&mut self, view: DashboardView, summary: PassSummary) {
        self.view = view;
        self.summary = Some(summary);
        self.refreshed_at = Some(chrono::Local::now().format("%H:%M:%S").to_string());
        self.loading = false;
    }

    /// The section currently on screen, if the latest pass produced it.
    pub fn current_section(&self) -> Option<&SectionView> {
        self.view.sections.get(self.selected)
    }

    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.selected = (self.selected + 1) % self.tabs.len();
        }
    }

    pub fn previous_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.selected = (self.selected + self.tabs.len() - 1) % self.tabs.len();
        }
    }

    /// Handles an application event.
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('r') | KeyCode::F(5) => self.refresh_requested = true,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.next_tab(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.previous_tab(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let idx = c.to_digit(10).unwrap_or(0) as usize;
                if idx >= 1 && idx <= self.tabs.len() {
                    self.selected = idx - 1;
                }
            }
            _ => {}
        }
    }
}
