//! Terminal dashboard.
//!
//! Draws the catalog's sections as tabs of chart panels using ratatui and
//! crossterm. A render pass runs on start and again whenever the user asks
//! for a refresh; the screen shows a loading state while it runs.

pub mod app;
mod events;
pub mod headless;
mod ui;
pub mod widgets;

pub use app::{App, DashboardView, Panel, PanelBody, RowView, SectionView};
pub use events::{Event, EventHandler};
pub use headless::{HeadlessOptions, OutputFormat};

use crate::dashboard::DashboardRenderer;
use crate::error::{DashError, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{debug, info};

/// Owns the terminal for the lifetime of the interactive session.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Switches the terminal to raw mode on the alternate screen.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| DashError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| DashError::internal(format!("Failed to enter alternate screen: {e}")))?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| DashError::internal(format!("Failed to create terminal: {e}")))
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| DashError::internal(format!("Failed to disable raw mode: {e}")))?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| DashError::internal(format!("Failed to leave alternate screen: {e}")))?;
        self.terminal
            .show_cursor()
            .map_err(|e| DashError::internal(format!("Failed to show cursor: {e}")))
    }

    fn draw(&mut self, app: &App) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| DashError::internal(format!("Failed to draw: {e}")))?;
        Ok(())
    }

    /// Runs the dashboard until the user quits.
    pub async fn run(&mut self, renderer: &DashboardRenderer<'_>, app: &mut App) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let outcome = self.event_loop(renderer, app).await;

        let _ = panic::take_hook();
        outcome
    }

    async fn event_loop(&mut self, renderer: &DashboardRenderer<'_>, app: &mut App) -> Result<()> {
        while app.running {
            if app.refresh_requested {
                app.begin_refresh();
                self.draw(app)?;

                let mut view = DashboardView::new();
                let summary = renderer.render_pass(&mut view).await;
                app.finish_refresh(view, summary);
            }

            self.draw(app)?;

            match self.event_handler.next()? {
                Event::Resize(width, height) => debug!(width, height, "Terminal resized"),
                Event::Tick => {}
                event => app.handle_event(event),
            }
        }
        info!("Dashboard closed");
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Opens the interactive dashboard.
pub async fn run(renderer: &DashboardRenderer<'_>, title: &str) -> Result<()> {
    let mut app = App::new(
        title,
        renderer.catalog(),
        renderer.settings().display_string(),
    );
    let mut tui = Tui::new()?;
    tui.run(renderer, &mut app).await
}
