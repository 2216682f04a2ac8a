//! Query execution: submit, poll to a terminal status, fetch the result file.
//!
//! The poll loop has no upper bound. A query the service never finishes
//! blocks the render pass indefinitely.

use std::time::{Duration, Instant};

use crate::athena::{ExecutionStatus, QueryService, QuerySpec, ResultStore};
use crate::data::{parse_csv, ResultSet};
use crate::error::{DashError, Result};
use tracing::{debug, info, warn};

/// Runs queries against a query service and loads their results.
pub struct QueryExecutor<'a> {
    service: &'a dyn QueryService,
    store: &'a dyn ResultStore,
    poll_interval: Duration,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(
        service: &'a dyn QueryService,
        store: &'a dyn ResultStore,
        poll_interval: Duration,
    ) -> Self {
        Self {
            service,
            store,
            poll_interval,
        }
    }

    /// Executes a query without ever failing.
    ///
    /// On any failure the result is empty and the reason is carried in
    /// [`Execution::failure`] for the caller to show.
    pub async fn execute(&self, query: &QuerySpec) -> Execution {
        let start = Instant::now();
        let outcome = self.try_execute(query).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(result) => {
                info!(
                    rows = result.row_count(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Query completed"
                );
                Execution {
                    result,
                    failure: None,
                    elapsed,
                }
            }
            Err(e) => {
                warn!("{}: {}", e.category(), e);
                Execution {
                    result: ResultSet::new(),
                    failure: Some(e),
                    elapsed,
                }
            }
        }
    }

    /// Executes a query, returning the first failure as an error.
    pub async fn try_execute(&self, query: &QuerySpec) -> Result<ResultSet> {
        let handle = self.service.submit(query).await?;
        debug!(handle = %handle, database = query.database(), "Submitted query");

        let mut polls = 0usize;
        let report = loop {
            let report = self.service.status(&handle).await?;
            polls += 1;
            if report.status.is_terminal() {
                break report;
            }
            tokio::time::sleep(self.poll_interval).await;
        };
        debug!(handle = %handle, polls, status = %report.status, "Query reached terminal state");

        match report.status {
            ExecutionStatus::Succeeded => {
                let location = report.output_location.ok_or_else(|| {
                    DashError::fetch(format!("{handle} succeeded without an output location"))
                })?;
                let bytes = self.store.fetch(&location).await?;
                parse_csv(&bytes)
            }
            status => Err(DashError::execution(
                report
                    .reason
                    .unwrap_or_else(|| format!("query {handle} finished {status}")),
            )),
        }
    }
}

/// Outcome of [`QueryExecutor::execute`].
#[derive(Debug)]
pub struct Execution {
    /// The loaded result; empty on failure.
    pub result: ResultSet,
    /// Why the query produced nothing, if it failed.
    pub failure: Option<DashError>,
    /// Wall time from submission to loaded result.
    pub elapsed: Duration,
}
