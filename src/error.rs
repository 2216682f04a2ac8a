//! Error types for the dashboard.
//!
//! Every failure a visualization slot can hit maps to one variant here, so the
//! renderer can show it inline without aborting the rest of the pass.

use thiserror::Error;

/// Main error type for dashboard operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashError {
    /// The query service rejected the request outright (bad SQL, permissions, bad output location).
    #[error("Failed to start query: {0}")]
    Submission(String),

    /// The query was accepted but finished FAILED or CANCELLED.
    #[error("Query failed: {0}")]
    Execution(String),

    /// The query succeeded but its result file could not be read or parsed.
    #[error("Failed to fetch results: {0}")]
    Fetch(String),

    /// The result could not be prepared for its chart (bad column, unparseable date, etc.)
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal setup, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashError {
    /// Creates a submission error with the given message.
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Creates an execution failure with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates a fetch error with the given message.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Creates a render error with the given message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Submission(_) => "Submission Error",
            Self::Execution(_) => "Execution Failure",
            Self::Fetch(_) => "Fetch Error",
            Self::Render(_) => "Render Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using DashError.
pub type Result<T> = std::result::Result<T, DashError>;
