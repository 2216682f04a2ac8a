//! Scripted query service and in-memory result store for testing.
//!
//! Queries are matched against scripts by SQL fragment; each script decides
//! how many polls report RUNNING and how the execution ends.

use super::{ExecutionHandle, QuerySpec, QueryService, ResultStore, StatusReport};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// How a scripted execution behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// Submission is rejected with this message.
    Reject(String),
    /// Reports RUNNING `running_polls` times, then SUCCEEDED with the result
    /// written to `output_file` under the requested staging location.
    Succeed {
        running_polls: usize,
        output_file: String,
    },
    /// Reports RUNNING `running_polls` times, then FAILED with this reason.
    Fail { running_polls: usize, reason: String },
    /// Reports RUNNING `running_polls` times, then CANCELLED with this reason.
    Cancel { running_polls: usize, reason: String },
}

struct Execution {
    remaining_running: usize,
    terminal: StatusReport,
}

/// A query service that follows pre-arranged scripts.
#[derive(Default)]
pub struct ScriptedQueryService {
    scripts: Vec<(String, Script)>,
    executions: Mutex<HashMap<ExecutionHandle, Execution>>,
    submitted: Mutex<Vec<String>>,
    status_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl ScriptedQueryService {
    /// Creates a service with no scripts; every submission is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a script for queries whose SQL contains `fragment`.
    /// Earlier scripts win when several match.
    pub fn with_script(mut self, fragment: impl Into<String>, script: Script) -> Self {
        self.scripts.push((fragment.into(), script));
        self
    }

    pub fn succeed(self, fragment: impl Into<String>, running_polls: usize, output_file: impl Into<String>) -> Self {
        self.with_script(
            fragment,
            Script::Succeed {
                running_polls,
                output_file: output_file.into(),
            },
        )
    }

    pub fn fail(self, fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        self.with_script(
            fragment,
            Script::Fail {
                running_polls: 0,
                reason: reason.into(),
            },
        )
    }

    pub fn reject(self, fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        self.with_script(fragment, Script::Reject(reason.into()))
    }

    /// Number of status checks made so far, across all executions.
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// SQL of every accepted submission, in order.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn script_for(&self, sql: &str) -> Option<&Script> {
        self.scripts
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, script)| script)
    }
}

#[async_trait]
impl QueryService for ScriptedQueryService {
    async fn submit(&self, query: &QuerySpec) -> Result<ExecutionHandle> {
        let script = self
            .script_for(query.sql())
            .ok_or_else(|| DashError::submission("InvalidRequestException: no script for query"))?;

        let (remaining_running, terminal) = match script {
            Script::Reject(reason) => return Err(DashError::submission(reason.clone())),
            Script::Succeed {
                running_polls,
                output_file,
            } => (
                *running_polls,
                StatusReport::succeeded(format!("{}{}", query.result_location(), output_file)),
            ),
            Script::Fail {
                running_polls,
                reason,
            } => (*running_polls, StatusReport::failed(reason.clone())),
            Script::Cancel {
                running_polls,
                reason,
            } => (*running_polls, StatusReport::cancelled(reason.clone())),
        };

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = ExecutionHandle::new(format!("exec-{id}"));

        let mut executions = self
            .executions
            .lock()
            .map_err(|_| DashError::internal("mock execution table poisoned"))?;
        executions.insert(
            handle.clone(),
            Execution {
                remaining_running,
                terminal,
            },
        );
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(query.sql().to_string());
        }
        Ok(handle)
    }

    async fn status(&self, handle: &ExecutionHandle) -> Result<StatusReport> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        let mut executions = self
            .executions
            .lock()
            .map_err(|_| DashError::internal("mock execution table poisoned"))?;
        let execution = executions
            .get_mut(handle)
            .ok_or_else(|| DashError::execution(format!("Unknown execution {handle}")))?;

        if execution.remaining_running > 0 {
            execution.remaining_running -= 1;
            return Ok(StatusReport::running());
        }
        Ok(execution.terminal.clone())
    }
}

/// An object store holding result files in memory.
#[derive(Default)]
pub struct MemoryResultStore {
    objects: HashMap<String, Vec<u8>>,
    fetches: Mutex<Vec<String>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an object at the given URI.
    pub fn with_object(mut self, location: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(location.into(), body.into());
        self
    }

    /// Every location fetched so far, in order.
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if let Ok(mut fetches) = self.fetches.lock() {
            fetches.push(location.to_string());
        }
        self.objects
            .get(location)
            .cloned()
            .ok_or_else(|| DashError::fetch(format!("NoSuchKey: {location}")))
    }
}
