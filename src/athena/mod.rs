//! Query service and object storage boundary.
//!
//! Provides trait-based interfaces for submitting queries and reading their
//! result files, so the executor can run against Athena/S3 or a scripted mock.

mod client;
mod mock;

pub use client::{AthenaService, S3ResultStore};
pub use mock::{MemoryResultStore, Script, ScriptedQueryService};

use crate::config::AthenaSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One query to run: SQL text, the database it runs against, and where the
/// service should stage its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    sql: String,
    database: String,
    result_location: String,
}

impl QuerySpec {
    pub fn new(
        sql: impl Into<String>,
        database: impl Into<String>,
        result_location: impl Into<String>,
    ) -> Self {
        Self {
            sql: sql.into(),
            database: database.into(),
            result_location: result_location.into(),
        }
    }

    /// Builds a query against the configured database and output location.
    pub fn with_settings(sql: impl Into<String>, settings: &AthenaSettings) -> Self {
        Self::new(
            sql,
            settings.database.clone(),
            settings.output_location.to_string(),
        )
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn result_location(&self) -> &str {
        &self.result_location
    }
}

/// Identifier the service hands back on submission. Only used to poll.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionHandle(String);

impl ExecutionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of a submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecutionStatus {
    /// Queued or running.
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    /// Returns true once the service will not change the status again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the service reports when asked about an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: ExecutionStatus,

    /// Service-provided reason for a state change, set on failure.
    pub reason: Option<String>,

    /// Where the service actually wrote the result file. Authoritative on
    /// success; may differ from the requested staging prefix.
    pub output_location: Option<String>,
}

impl StatusReport {
    pub fn running() -> Self {
        Self {
            status: ExecutionStatus::Running,
            reason: None,
            output_location: None,
        }
    }

    pub fn succeeded(output_location: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Succeeded,
            reason: None,
            output_location: Some(output_location.into()),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            reason: Some(reason.into()),
            output_location: None,
        }
    }

    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Cancelled,
            reason: Some(reason.into()),
            output_location: None,
        }
    }
}

/// An object-storage location, `s3://bucket/key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    /// Returns true if the location names a prefix rather than an object.
    pub fn is_prefix(&self) -> bool {
        self.key.is_empty() || self.key.ends_with('/')
    }
}

impl FromStr for S3Location {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("s3://")
            .ok_or_else(|| format!("Invalid S3 location '{s}': expected s3://bucket/key"))?;
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(format!("Invalid S3 location '{s}': missing bucket"));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

impl fmt::Display for S3Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Creates the Athena and S3 clients for the configured region.
///
/// Credentials come from the default provider chain, which reads the
/// process environment first.
pub async fn connect(settings: &AthenaSettings) -> (AthenaService, S3ResultStore) {
    let sdk_config = client::load_sdk_config(&settings.region).await;
    (
        AthenaService::new(&sdk_config, settings.workgroup.clone()),
        S3ResultStore::new(&sdk_config),
    )
}

/// Interface to the asynchronous query service.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Submits a query and returns its handle. Fails with a submission error
    /// if the service rejects the request.
    async fn submit(&self, query: &QuerySpec) -> Result<ExecutionHandle>;

    /// Fetches the current status of an execution.
    async fn status(&self, handle: &ExecutionHandle) -> Result<StatusReport>;
}

/// Interface to the object store holding result files.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Reads one object in full.
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}
