//! retail-dash: a terminal dashboard over retail sales data in AWS Athena.
//!
//! This library exposes the core modules for use in integration tests.

pub mod athena;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod query;
pub mod tui;
