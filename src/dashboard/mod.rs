//! Dashboard catalog and renderer.
//!
//! A catalog is a fixed set of named sections. Each section holds rows of
//! slots; each slot pairs a query with the chart that displays its result.

pub mod catalog;
mod renderer;
mod validate;

pub use renderer::{prepare, DashboardRenderer, PassSummary, PreparedChart, RenderSurface};
pub use validate::{check_slot, projection_names, validate_catalog, FieldCheck, Projection};

use crate::data::{Coercion, ResultSet};
use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of visual element a directive produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Time-series line chart.
    Line,
    /// Categorical bar chart.
    Bar,
    /// Scatter plot, optionally encoding size and colour.
    Scatter,
    /// Raw tabular display.
    Table,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Scatter => "scatter",
            Self::Table => "table",
        };
        f.write_str(name)
    }
}

/// How a chart is coloured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorEncoding {
    /// One colour per distinct value of a column.
    Field(String),
    /// A single fixed colour, as a `#rrggbb` hex string.
    Fixed(String),
}

/// Declarative binding from result columns to a visual encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDirective {
    pub kind: ChartKind,
    pub x: String,
    pub y: String,
    pub size: Option<String>,
    pub color: Option<ColorEncoding>,
}

impl ChartDirective {
    fn new(kind: ChartKind, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            kind,
            x: x.into(),
            y: y.into(),
            size: None,
            color: None,
        }
    }

    pub fn line(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self::new(ChartKind::Line, x, y)
    }

    pub fn bar(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self::new(ChartKind::Bar, x, y)
    }

    pub fn scatter(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self::new(ChartKind::Scatter, x, y)
    }

    /// A table led by `x` and `y`; the remaining columns follow in result order.
    pub fn table(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self::new(ChartKind::Table, x, y)
    }

    pub fn with_size(mut self, field: impl Into<String>) -> Self {
        self.size = Some(field.into());
        self
    }

    pub fn with_color_field(mut self, field: impl Into<String>) -> Self {
        self.color = Some(ColorEncoding::Field(field.into()));
        self
    }

    pub fn with_fixed_color(mut self, hex: impl Into<String>) -> Self {
        self.color = Some(ColorEncoding::Fixed(hex.into()));
        self
    }

    /// Every column name the directive references.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.x.as_str(), self.y.as_str()];
        if let Some(size) = &self.size {
            fields.push(size);
        }
        if let Some(ColorEncoding::Field(color)) = &self.color {
            fields.push(color);
        }
        fields
    }

    /// Checks that every referenced field exists in `result`.
    pub fn check_columns(&self, result: &ResultSet) -> Result<()> {
        let missing: Vec<&str> = self
            .fields()
            .into_iter()
            .filter(|f| !result.has_column(f))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DashError::render(format!(
                "{} chart references missing column(s) {} (result has: {})",
                self.kind,
                missing.join(", "),
                result.column_names().join(", ")
            )))
        }
    }
}

/// One visualization: a titled query and the chart that shows its result.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub title: String,
    pub sql: String,
    pub directive: ChartDirective,
    /// Applied in order before the chart is drawn.
    pub coercions: Vec<Coercion>,
}

impl Slot {
    pub fn new(title: impl Into<String>, sql: impl Into<String>, directive: ChartDirective) -> Self {
        Self {
            title: title.into(),
            sql: sql.into(),
            directive,
            coercions: Vec::new(),
        }
    }

    pub fn coerce(mut self, coercion: Coercion) -> Self {
        self.coercions.push(coercion);
        self
    }
}

/// A named group of slots, laid out as rows of one or more columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub rows: Vec<Vec<Slot>>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Adds a row of side-by-side slots.
    pub fn row(mut self, slots: Vec<Slot>) -> Self {
        self.rows.push(slots);
        self
    }

    /// Adds a full-width slot.
    pub fn full(self, slot: Slot) -> Self {
        self.row(vec![slot])
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.rows.iter().flatten()
    }
}

/// A complete dashboard definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub name: String,
    pub subtitle: String,
    pub sections: Vec<Section>,
}

impl Catalog {
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.sections.iter().flat_map(|s| s.slots())
    }
}
