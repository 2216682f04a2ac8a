//! Query execution for the dashboard.
//!
//! This module isolates the submit/poll/fetch cycle from the renderer.

pub mod executor;

pub use executor::{Execution, QueryExecutor};
