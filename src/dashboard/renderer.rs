//! Render pass: run every slot's query in order and hand results to a surface.

use super::{Catalog, ChartDirective, ChartKind, Section, Slot};
use crate::athena::QuerySpec;
use crate::config::AthenaSettings;
use crate::data::ResultSet;
use crate::error::{DashError, Result};
use crate::query::QueryExecutor;
use serde::Serialize;
use tracing::{debug, info, warn};

/// A normalized result ready to draw with its directive.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedChart {
    pub directive: ChartDirective,
    pub result: ResultSet,
}

/// Receives the output of a render pass.
///
/// A slot whose query returned no rows produces no call at all.
pub trait RenderSurface {
    /// Starts a new named section.
    fn begin_section(&mut self, section: &Section);

    /// Starts a row of `columns` side-by-side slots within the current section.
    fn begin_row(&mut self, columns: usize);

    /// Draws a chart for a slot.
    fn chart(&mut self, title: &str, chart: PreparedChart);

    /// Shows a slot's failure inline.
    fn error(&mut self, title: &str, error: &DashError);
}

/// Counts of what happened to each slot in one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub rendered: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Applies a slot's coercions to its result and checks the directive's columns.
///
/// Line charts are sorted ascending by their x column.
pub fn prepare(slot: &Slot, mut result: ResultSet) -> Result<PreparedChart> {
    slot.directive.check_columns(&result)?;
    for coercion in &slot.coercions {
        coercion.apply(&mut result)?;
    }
    if slot.directive.kind == ChartKind::Line {
        result.sort_by_column(&slot.directive.x);
    }
    Ok(PreparedChart {
        directive: slot.directive.clone(),
        result,
    })
}

/// Runs a catalog top to bottom against one executor.
pub struct DashboardRenderer<'a> {
    catalog: &'a Catalog,
    settings: &'a AthenaSettings,
    executor: QueryExecutor<'a>,
}

impl<'a> DashboardRenderer<'a> {
    pub fn new(
        catalog: &'a Catalog,
        settings: &'a AthenaSettings,
        executor: QueryExecutor<'a>,
    ) -> Self {
        Self {
            catalog,
            settings,
            executor,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    pub fn settings(&self) -> &AthenaSettings {
        self.settings
    }

    /// Executes every slot in order, one query at a time.
    ///
    /// A failing slot is reported to the surface and the pass moves on.
    pub async fn render_pass(&self, surface: &mut dyn RenderSurface) -> PassSummary {
        info!(catalog = %self.catalog.name, "Starting render pass");
        let mut summary = PassSummary::default();

        for section in &self.catalog.sections {
            surface.begin_section(section);
            for row in &section.rows {
                surface.begin_row(row.len());
                for slot in row {
                    self.render_slot(slot, surface, &mut summary).await;
                }
            }
        }

        info!(
            rendered = summary.rendered,
            skipped = summary.skipped,
            failed = summary.failed,
            "Render pass finished"
        );
        summary
    }

    async fn render_slot(
        &self,
        slot: &Slot,
        surface: &mut dyn RenderSurface,
        summary: &mut PassSummary,
    ) {
        let query = QuerySpec::with_settings(slot.sql.as_str(), self.settings);
        let execution = self.executor.execute(&query).await;

        if let Some(failure) = execution.failure {
            summary.failed += 1;
            surface.error(&slot.title, &failure);
            return;
        }
        if execution.result.is_empty() {
            debug!(slot = %slot.title, "No rows; skipping");
            summary.skipped += 1;
            return;
        }

        match prepare(slot, execution.result) {
            Ok(chart) => {
                summary.rendered += 1;
                surface.chart(&slot.title, chart);
            }
            Err(e) => {
                warn!(slot = %slot.title, "{}: {}", e.category(), e);
                summary.failed += 1;
                surface.error(&slot.title, &e);
            }
        }
    }
}
